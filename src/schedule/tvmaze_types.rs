/// TVMaze API response types for deserialization.
///
/// These structures mirror the JSON response format of the TVMaze schedule
/// endpoint.
use chrono::NaiveDate;
use serde::Deserialize;

/// A single schedule entry from the TVMaze API.
///
/// The schedule endpoint returns a plain array of these objects, ordered
/// by air time.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeScheduleEntry {
    /// Episode identifier
    pub id: u64,
    /// Episode title (may be null for untitled episodes)
    pub name: Option<String>,
    /// Season number
    pub season: u32,
    /// Episode number within the season (null for specials)
    pub number: Option<u32>,
    /// Air date in ISO format (may be null)
    pub airdate: Option<NaiveDate>,
    /// Local air time like "20:00" (may be null or empty)
    pub airtime: Option<String>,
    /// Runtime in minutes (may be null)
    pub runtime: Option<u32>,
    /// The show this episode belongs to
    pub show: TvMazeShow,
}

/// A show object embedded in a schedule entry.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeShow {
    /// Show identifier
    pub id: u64,
    /// The name of the show
    pub name: String,
    /// The broadcasting network (null for web-only shows)
    pub network: Option<TvMazeNetwork>,
    /// Genres associated with the show
    #[serde(default)]
    pub genres: Vec<String>,
    /// Show summary in HTML format (may be null)
    pub summary: Option<String>,
}

/// A network object embedded in a show.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeNetwork {
    /// The name of the network
    pub name: String,
}
