/// Data structures and traits for TV schedule retrieval.
///
/// This module provides structures to represent shows and the episodes
/// airing on a given day, as well as traits for implementing schedule
/// providers.
mod cached;
mod tvmaze;
mod tvmaze_types;

pub use cached::CachedScheduleProvider;
pub use tvmaze::TvMazeClient;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during schedule retrieval operations.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// Request to the schedule provider failed
    #[error("Request failed: {0}")]
    RequestError(String),

    /// Failed to parse the provider's JSON response
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// No schedule exists for the requested country
    #[error("No schedule found for country: {0}")]
    CountryNotFound(String),
}

/// Represents a TV show as it appears in a schedule entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Show {
    /// The provider's identifier for this show
    pub id: u64,
    /// The name of the show
    pub name: String,
    /// The network or channel airing the show, if known
    pub network: Option<String>,
    /// Genres associated with the show
    pub genres: Vec<String>,
    /// A brief plain-text summary of the show
    pub summary: String,
}

/// Represents a single episode airing on a scheduled day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    /// The provider's identifier for this episode
    pub id: u64,
    /// The episode title
    pub name: String,
    /// The season number this episode belongs to
    pub season: u32,
    /// The episode number within the season (absent for specials)
    pub number: Option<u32>,
    /// The date the episode airs
    pub airdate: Option<NaiveDate>,
    /// The local air time as reported by the provider (may be empty)
    pub airtime: String,
    /// Runtime in minutes, if known
    pub runtime: Option<u32>,
    /// The show this episode belongs to
    pub show: Show,
}

/// Trait for providers that can fetch the TV schedule of a day.
///
/// Implementors of this trait retrieve the list of episodes airing in a
/// given country on a given date from some source, such as the TVMaze API
/// or a local cache in front of it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScheduleProvider: Send + Sync {
    /// Fetches the schedule for a country and date.
    ///
    /// # Arguments
    ///
    /// * `country` - ISO 3166-1 country code, e.g. "US"
    /// * `date` - The day to fetch the schedule for
    ///
    /// # Returns
    ///
    /// The episodes airing that day, in the order the provider reports
    /// them, or a ScheduleError
    async fn current_schedule(
        &self,
        country: &str,
        date: NaiveDate,
    ) -> Result<Vec<Episode>, ScheduleError>;
}
