//! TV Tonight - See what's on TV tonight and track your favorite shows
//!
//! This library provides the core functionality for fetching the day's TV
//! schedule, keeping a local list of favorite shows, and reducing both
//! into the view state consumed by the home screen.

mod cache;
mod favorites;
mod home;
mod schedule;

// Re-export error types
pub use cache::CacheError;
pub use favorites::FavoritesError;
pub use schedule::ScheduleError;

// Re-export core types
pub use cache::CacheStorage;
pub use favorites::{FavoriteShow, FavoriteShows, FavoriteShowsFile};
pub use home::{EpisodeViewData, HomeViewData, HomeViewModel, HomeViewState};
pub use schedule::{CachedScheduleProvider, Episode, ScheduleProvider, Show, TvMazeClient};

use std::io;
use thiserror::Error;

/// Top-level error type for TV Tonight operations
#[derive(Debug, Error)]
pub enum TvTonightError {
    /// Error during schedule retrieval
    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    /// Error during favorites operations
    #[error("Favorites error: {0}")]
    Favorites(#[from] FavoritesError),

    /// Error during cache operations
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
