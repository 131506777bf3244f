use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use dialoguer::MultiSelect;
use std::collections::HashSet;
use std::io;
use std::process;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;
use tracing_subscriber::EnvFilter;
use tv_tonight::{
    CacheStorage, CachedScheduleProvider, Episode, EpisodeViewData, FavoriteShow, FavoriteShows,
    FavoriteShowsFile, HomeViewData, HomeViewModel, HomeViewState, ScheduleProvider, Show,
    TvMazeClient, TvTonightError,
};

/// Schedules change rarely enough that an hour-old copy is fine.
const SCHEDULE_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Parser)]
#[command(name = "tv_tonight", version, about = "See what's on TV tonight")]
struct Cli {
    /// ISO country code to fetch the schedule for
    #[arg(short, long, default_value = "US", global = true)]
    country: String,

    /// Date to fetch (YYYY-MM-DD, defaults to today)
    #[arg(short, long, global = true)]
    date: Option<NaiveDate>,

    /// Bypass the local schedule cache
    #[arg(long, global = true)]
    no_cache: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Show the schedule with favorites highlighted (default)
    Tonight,
    /// Interactively pick favorites among the day's shows
    Mark,
    /// List the shows marked as favorite
    Favorites,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tv_tonight=info")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), TvTonightError> {
    let date = cli.date.unwrap_or_else(|| Local::now().date_naive());
    let favorites = Arc::new(FavoriteShowsFile::open_default()?);

    match cli.command.unwrap_or(Command::Tonight) {
        Command::Tonight => {
            let client = TvMazeClient::new();
            if cli.no_cache {
                show_tonight(client, favorites, &cli.country, date).await
            } else {
                match CacheStorage::open("schedule", Some(SCHEDULE_CACHE_TTL)) {
                    Ok(cache) => {
                        let provider = CachedScheduleProvider::new(client, cache);
                        show_tonight(provider, favorites, &cli.country, date).await
                    }
                    Err(err) => {
                        warn!(error = %err, "cache unavailable, fetching without it");
                        show_tonight(client, favorites, &cli.country, date).await
                    }
                }
            }
        }
        Command::Mark => mark_favorites(&cli.country, date, cli.no_cache, &favorites).await,
        Command::Favorites => list_favorites(&favorites).await,
    }
}

/// Drives the home view model and renders its terminal state.
async fn show_tonight<S>(
    provider: S,
    favorites: Arc<FavoriteShowsFile>,
    country: &str,
    date: NaiveDate,
) -> Result<(), TvTonightError>
where
    S: ScheduleProvider + 'static,
{
    let view_model = HomeViewModel::new(Arc::new(provider), favorites, country, date);
    let mut state = view_model.subscribe();

    view_model.on_screen_created();
    println!("Fetching the {} schedule for {}...", country, date);

    loop {
        let snapshot = state.borrow_and_update().clone();
        match snapshot {
            HomeViewState::Loading => {
                state
                    .changed()
                    .await
                    .expect("view model dropped while loading");
            }
            HomeViewState::Success(data) => {
                print_schedule(&data);
                return Ok(());
            }
            HomeViewState::NetworkError => {
                eprintln!("Could not load the schedule. Check your network connection and try again.");
                process::exit(1);
            }
        }
    }
}

fn print_schedule(data: &HomeViewData) {
    println!();
    for entry in &data.episodes {
        println!("{}", format_episode_line(entry));
    }

    let favorite_count = data.episodes.iter().filter(|e| e.favorite).count();
    println!(
        "\n{} episode(s), {} from favorite shows (★).",
        data.episodes.len(),
        favorite_count
    );
}

fn format_episode_line(entry: &EpisodeViewData) -> String {
    let episode = &entry.episode;
    let marker = if entry.favorite { "★" } else { " " };
    let airtime = if episode.airtime.is_empty() {
        "--:--"
    } else {
        episode.airtime.as_str()
    };
    let code = match episode.number {
        Some(number) => format!("S{:02}E{:02}", episode.season, number),
        None => "Special".to_string(),
    };
    let network = episode.show.network.as_deref().unwrap_or("-");

    format!(
        "{:>5}  {} {:<7}  {} - {} ({})",
        airtime, marker, code, episode.show.name, episode.name, network
    )
}

/// Interactive favorite picking over the day's shows.
async fn mark_favorites(
    country: &str,
    date: NaiveDate,
    no_cache: bool,
    favorites: &FavoriteShowsFile,
) -> Result<(), TvTonightError> {
    let episodes = fetch_schedule(country, date, no_cache).await?;

    // One entry per show, keeping the first-seen (air-time) order
    let mut shows: Vec<Show> = Vec::new();
    for episode in episodes {
        if !shows.iter().any(|s| s.id == episode.show.id) {
            shows.push(episode.show);
        }
    }

    if shows.is_empty() {
        println!("No shows airing in {} on {}.", country, date);
        return Ok(());
    }

    let current: HashSet<u64> = favorites
        .all_favorite_show_ids()
        .await?
        .into_iter()
        .collect();

    let labels: Vec<String> = shows
        .iter()
        .map(|s| match &s.network {
            Some(network) => format!("{} ({})", s.name, network),
            None => s.name.clone(),
        })
        .collect();
    let defaults: Vec<bool> = shows.iter().map(|s| current.contains(&s.id)).collect();

    let selection = MultiSelect::new()
        .with_prompt("Pick your favorite shows (space toggles, enter confirms)")
        .items(&labels)
        .defaults(&defaults)
        .interact()
        .map_err(io::Error::other)?;

    let selected: HashSet<u64> = selection.into_iter().map(|i| shows[i].id).collect();

    let mut added = 0;
    let mut removed = 0;
    for show in &shows {
        let is_selected = selected.contains(&show.id);
        let was_favorite = current.contains(&show.id);

        if is_selected && !was_favorite {
            favorites
                .add(FavoriteShow {
                    id: show.id,
                    name: show.name.clone(),
                })
                .await?;
            added += 1;
        } else if !is_selected && was_favorite {
            favorites.remove(show.id).await?;
            removed += 1;
        }
    }

    println!("Added {} favorite(s), removed {}.", added, removed);
    Ok(())
}

async fn list_favorites(favorites: &FavoriteShowsFile) -> Result<(), TvTonightError> {
    let all = favorites.all().await?;

    if all.is_empty() {
        println!("No favorite shows yet. Run `tv_tonight mark` to pick some.");
        return Ok(());
    }

    for favorite in &all {
        println!("★ {} (id {})", favorite.name, favorite.id);
    }
    println!("\n{} favorite show(s).", all.len());
    Ok(())
}

/// Fetches the day's schedule, going through the cache unless disabled.
async fn fetch_schedule(
    country: &str,
    date: NaiveDate,
    no_cache: bool,
) -> Result<Vec<Episode>, TvTonightError> {
    let client = TvMazeClient::new();

    if no_cache {
        return Ok(client.current_schedule(country, date).await?);
    }

    match CacheStorage::open("schedule", Some(SCHEDULE_CACHE_TTL)) {
        Ok(cache) => Ok(CachedScheduleProvider::new(client, cache)
            .current_schedule(country, date)
            .await?),
        Err(err) => {
            warn!(error = %err, "cache unavailable, fetching without it");
            Ok(client.current_schedule(country, date).await?)
        }
    }
}
