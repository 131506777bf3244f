/// TVMaze schedule provider implementation.
use super::tvmaze_types::TvMazeScheduleEntry;
use super::{Episode, ScheduleError, ScheduleProvider, Show};
use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::debug;

/// Schedule provider for the TVMaze API.
///
/// This provider fetches the episodes airing in a country on a given date
/// from https://api.tvmaze.com using the schedule endpoint.
pub struct TvMazeClient {
    client: reqwest::Client,
    base_url: String,
}

impl TvMazeClient {
    /// Creates a new TVMaze client instance.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: "https://api.tvmaze.com".to_string(),
        }
    }

    /// Converts a TVMaze schedule entry to our internal Episode structure.
    fn convert_entry(entry: TvMazeScheduleEntry) -> Episode {
        Episode {
            id: entry.id,
            name: entry.name.unwrap_or_else(|| "TBA".to_string()),
            season: entry.season,
            number: entry.number,
            airdate: entry.airdate,
            airtime: entry.airtime.unwrap_or_default(),
            runtime: entry.runtime,
            show: Show {
                id: entry.show.id,
                name: entry.show.name,
                network: entry.show.network.map(|n| n.name),
                genres: entry.show.genres,
                summary: entry
                    .show
                    .summary
                    .map(|s| nanohtml2text::html2text(&s).trim().to_string())
                    .unwrap_or_default(),
            },
        }
    }

    /// Converts the raw schedule entries to internal episodes.
    ///
    /// The API returns entries ordered by air time; that order is kept.
    fn convert_schedule(entries: Vec<TvMazeScheduleEntry>) -> Vec<Episode> {
        entries.into_iter().map(Self::convert_entry).collect()
    }
}

impl Default for TvMazeClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScheduleProvider for TvMazeClient {
    async fn current_schedule(
        &self,
        country: &str,
        date: NaiveDate,
    ) -> Result<Vec<Episode>, ScheduleError> {
        // Build the API URL
        let url = format!("{}/schedule", self.base_url);
        let date = date.format("%Y-%m-%d").to_string();

        debug!(country, date = %date, "requesting schedule");

        // Make the HTTP request with query parameters
        let response = self
            .client
            .get(&url)
            .query(&[("country", country), ("date", date.as_str())])
            .send()
            .await
            .map_err(|e| ScheduleError::RequestError(e.to_string()))?;

        // Check if a schedule exists for the country
        if response.status() == 404 {
            return Err(ScheduleError::CountryNotFound(country.to_string()));
        }

        // Ensure request was successful
        if !response.status().is_success() {
            return Err(ScheduleError::RequestError(format!(
                "HTTP {} {}",
                response.status().as_u16(),
                response.status().canonical_reason().unwrap_or("Unknown")
            )));
        }

        // Parse the JSON response
        let entries: Vec<TvMazeScheduleEntry> = response
            .json()
            .await
            .map_err(|e| ScheduleError::ParseError(e.to_string()))?;

        debug!(count = entries.len(), "schedule received");

        // Convert to our internal structures
        Ok(Self::convert_schedule(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SCHEDULE_JSON: &str = r#"[
        {
            "id": 1850013,
            "name": "Pilot",
            "season": 1,
            "number": 1,
            "airdate": "2026-08-07",
            "airtime": "20:00",
            "runtime": 60,
            "show": {
                "id": 139,
                "name": "The Late Works",
                "network": { "name": "HBO" },
                "genres": ["Drama", "Comedy"],
                "summary": "<p>A show about <b>endings</b>.</p>"
            }
        },
        {
            "id": 1850014,
            "name": null,
            "season": 4,
            "number": null,
            "airdate": "2026-08-07",
            "airtime": "",
            "runtime": null,
            "show": {
                "id": 82,
                "name": "Night Quiz",
                "network": null,
                "summary": null
            }
        }
    ]"#;

    #[test]
    fn test_convert_schedule_preserves_order_and_fields() {
        let entries: Vec<TvMazeScheduleEntry> = serde_json::from_str(SCHEDULE_JSON).unwrap();
        let episodes = TvMazeClient::convert_schedule(entries);

        assert_eq!(episodes.len(), 2);

        assert_eq!(episodes[0].id, 1850013);
        assert_eq!(episodes[0].name, "Pilot");
        assert_eq!(episodes[0].season, 1);
        assert_eq!(episodes[0].number, Some(1));
        assert_eq!(episodes[0].airtime, "20:00");
        assert_eq!(episodes[0].runtime, Some(60));
        assert_eq!(episodes[0].show.id, 139);
        assert_eq!(episodes[0].show.name, "The Late Works");
        assert_eq!(episodes[0].show.network.as_deref(), Some("HBO"));
        // HTML tags are stripped from summaries
        assert_eq!(episodes[0].show.summary, "A show about endings.");

        // Entries with null fields fall back to sensible defaults
        assert_eq!(episodes[1].name, "TBA");
        assert_eq!(episodes[1].number, None);
        assert_eq!(episodes[1].airtime, "");
        assert_eq!(episodes[1].runtime, None);
        assert_eq!(episodes[1].show.network, None);
        assert_eq!(episodes[1].show.genres, Vec::<String>::new());
        assert_eq!(episodes[1].show.summary, "");
    }

    #[test]
    fn test_convert_entry_parses_airdate() {
        let entries: Vec<TvMazeScheduleEntry> = serde_json::from_str(SCHEDULE_JSON).unwrap();
        let episodes = TvMazeClient::convert_schedule(entries);

        assert_eq!(
            episodes[0].airdate,
            Some(NaiveDate::from_ymd_opt(2026, 8, 7).unwrap())
        );
    }
}
