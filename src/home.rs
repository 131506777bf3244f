//! Home screen view model
//!
//! This module holds the view state of the home screen and the logic that
//! produces it: fetch the day's schedule and the user's favorite show ids,
//! merge favorite status into each episode, and publish exactly one
//! terminal state per trigger through an observable state holder.

use crate::favorites::FavoriteShows;
use crate::schedule::{Episode, ScheduleProvider};
use chrono::NaiveDate;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::warn;

/// An episode annotated with the user's favorite status for its show.
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeViewData {
    /// The scheduled episode
    pub episode: Episode,
    /// Whether the episode's show is one of the user's favorites
    pub favorite: bool,
}

/// The data shown on a successfully loaded home screen.
#[derive(Debug, Clone, PartialEq)]
pub struct HomeViewData {
    /// Episodes airing today, in the order the provider reported them
    pub episodes: Vec<EpisodeViewData>,
}

/// The state of the home screen.
///
/// Every trigger publishes `Loading` followed by exactly one of the two
/// terminal states.
#[derive(Debug, Clone, PartialEq)]
pub enum HomeViewState {
    /// The schedule is being fetched
    Loading,
    /// The schedule was fetched and merged with favorite status
    Success(HomeViewData),
    /// The schedule could not be fetched; there is no partial data
    NetworkError,
}

/// View model for the home screen.
///
/// Holds the two injected collaborators and publishes `HomeViewState`
/// through a single-slot, last-value-wins channel. The view model is the
/// only writer; any number of observers may subscribe.
pub struct HomeViewModel<S, F> {
    schedule: Arc<S>,
    favorites: Arc<F>,
    country: String,
    date: NaiveDate,
    state: watch::Sender<HomeViewState>,
    /// The in-flight refresh task, if any
    refresh: Mutex<Option<JoinHandle<()>>>,
}

impl<S, F> HomeViewModel<S, F>
where
    S: ScheduleProvider + 'static,
    F: FavoriteShows + 'static,
{
    /// Creates a view model fetching the schedule of `country` on `date`.
    pub fn new(
        schedule: Arc<S>,
        favorites: Arc<F>,
        country: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        let (state, _) = watch::channel(HomeViewState::Loading);

        Self {
            schedule,
            favorites,
            country: country.into(),
            date,
            state,
            refresh: Mutex::new(None),
        }
    }

    /// Returns a receiver observing the home view state.
    ///
    /// Observers always see the latest published state; intermediate
    /// states may be skipped if the observer is slow.
    pub fn subscribe(&self) -> watch::Receiver<HomeViewState> {
        self.state.subscribe()
    }

    /// Returns a snapshot of the current view state.
    pub fn current_state(&self) -> HomeViewState {
        self.state.borrow().clone()
    }

    /// Screen-creation trigger.
    ///
    /// Publishes `Loading` synchronously, then fetches the schedule and
    /// the favorite-id set in the background and publishes the terminal
    /// state once both resolve. A trigger arriving while a fetch is still
    /// in flight aborts that fetch and starts over; a superseded fetch
    /// never publishes.
    pub fn on_screen_created(&self) {
        let mut refresh = self.refresh.lock().expect("refresh slot lock poisoned");
        if let Some(previous) = refresh.take() {
            previous.abort();
        }

        self.state.send_replace(HomeViewState::Loading);

        let schedule = Arc::clone(&self.schedule);
        let favorites = Arc::clone(&self.favorites);
        let country = self.country.clone();
        let date = self.date;
        let state = self.state.clone();

        *refresh = Some(tokio::spawn(async move {
            let next = load_home_data(&*schedule, &*favorites, &country, date).await;
            state.send_replace(next);
        }));
    }
}

impl<S, F> Drop for HomeViewModel<S, F> {
    fn drop(&mut self) {
        // The screen is gone; a fetch still in flight has nobody to inform.
        if let Ok(mut refresh) = self.refresh.lock() {
            if let Some(task) = refresh.take() {
                task.abort();
            }
        }
    }
}

/// Fetches schedule and favorites concurrently and reduces them to the
/// terminal view state.
async fn load_home_data<S, F>(
    schedule: &S,
    favorites: &F,
    country: &str,
    date: NaiveDate,
) -> HomeViewState
where
    S: ScheduleProvider,
    F: FavoriteShows,
{
    let (episodes, favorite_ids) = tokio::join!(
        schedule.current_schedule(country, date),
        favorites.all_favorite_show_ids(),
    );

    // Only schedule absence is a modeled failure; a broken favorites
    // store degrades to an empty set.
    let favorite_ids: HashSet<u64> = match favorite_ids {
        Ok(ids) => ids.into_iter().collect(),
        Err(err) => {
            warn!(error = %err, "failed to load favorite ids, showing none as favorite");
            HashSet::new()
        }
    };

    match episodes {
        Ok(episodes) if !episodes.is_empty() => HomeViewState::Success(HomeViewData {
            episodes: mark_favorites(episodes, &favorite_ids),
        }),
        Ok(_) => HomeViewState::NetworkError,
        Err(err) => {
            warn!(error = %err, "failed to load schedule");
            HomeViewState::NetworkError
        }
    }
}

/// Annotates each episode with the favorite status of its show.
///
/// The input order is preserved.
fn mark_favorites(episodes: Vec<Episode>, favorite_ids: &HashSet<u64>) -> Vec<EpisodeViewData> {
    episodes
        .into_iter()
        .map(|episode| EpisodeViewData {
            favorite: favorite_ids.contains(&episode.show.id),
            episode,
        })
        .collect()
}
