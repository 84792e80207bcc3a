use anyhow::Result;
use clap::Parser;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::time::Duration;

mod client;
mod config;
mod error;
mod models;
mod playlist;


use crate::client::{EventSource, OhMyRocknessClient, SeatGeekClient, SpotifyClient};
use crate::config::{OhMyRocknessConfig, SeatGeekConfig, SpotifyConfig, load_dotenv};
use crate::playlist::pacing::{AbortHandle, RateLimiter};
use crate::playlist::{EventSourceKind, PlaylistConfig, PlaylistGenerator, publish};

#[derive(Parser)]
#[command(name = "concert-playlist")]
#[command(about = "Build streaming playlists from upcoming local concerts")]
#[command(version)]
struct Args {
    /// Path to the playlist configuration JSON file
    #[arg(short = 'c', long = "config", default_value = "playlists.json")]
    config_file: String,

    /// Enable debug mode - print the selected tracks instead of creating playlists
    #[arg(short = 'd', long = "debug")]
    debug: bool,

    /// Quiet mode - reduce output verbosity
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,

    /// Seed for the track sampler, for reproducible playlists
    #[arg(long = "seed")]
    seed: Option<u64>,

    /// Stop catalog lookups for a playlist after this many seconds
    #[arg(long = "deadline-secs")]
    deadline_secs: Option<u64>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    // Validate that the playlist configuration file exists before proceeding
    if !std::path::Path::new(&args.config_file).exists() {
        eprintln!(
            "Error: Playlist configuration file '{}' not found.",
            args.config_file
        );
        eprintln!("Please ensure the file exists or specify a different file with --config.");
        return Err(anyhow::anyhow!(
            "Configuration file '{}' not found",
            args.config_file
        ));
    }

    // Load playlist configurations from JSON file
    println!("Loading playlist configurations from: {}", args.config_file);
    let playlist_configs = match PlaylistConfig::load_all_from_file(&args.config_file) {
        Ok(configs) => {
            println!("Loaded {} playlist configurations", configs.len());
            configs
        }
        Err(e) => {
            eprintln!("Failed to load playlist configurations: {e}");
            return Err(anyhow::anyhow!(
                "Failed to load playlist configurations: {}",
                e
            ));
        }
    };

    // Credentials from .env, only for the services this run touches
    load_dotenv();
    let needs = |kind: EventSourceKind| playlist_configs.iter().any(|c| c.source == kind);
    let seatgeek = if needs(EventSourceKind::SeatGeek) {
        Some(SeatGeekClient::new(SeatGeekConfig::from_env()?))
    } else {
        None
    };
    let ohmyrockness = if needs(EventSourceKind::OhMyRockness) {
        Some(OhMyRocknessClient::new(OhMyRocknessConfig::from_env()?))
    } else {
        None
    };
    let spotify_config = SpotifyConfig::from_env()?;
    if !args.debug {
        spotify_config.require_username()?;
    }
    let limiter = if spotify_config.request_interval.is_zero() {
        log::warn!("SPOTIFY_REQUEST_INTERVAL_MS is 0, catalog lookups will not be paced");
        RateLimiter::disabled()
    } else {
        RateLimiter::new(spotify_config.request_interval)
    };
    let spotify = SpotifyClient::new(spotify_config);

    let mut rng: Box<dyn RngCore> = match args.seed {
        Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
        None => Box::new(rand::thread_rng()),
    };

    let mut creation_results = Vec::new();

    for config in playlist_configs {
        let source: &dyn EventSource = match config.source {
            EventSourceKind::SeatGeek => match &seatgeek {
                Some(client) => client,
                None => continue,
            },
            EventSourceKind::OhMyRockness => match &ohmyrockness {
                Some(client) => client,
                None => continue,
            },
        };
        let abort = match args.deadline_secs {
            Some(secs) => AbortHandle::with_timeout(Duration::from_secs(secs)),
            None => AbortHandle::new(),
        };

        println!("\nGenerating playlist from {} events...", source.name());
        let generator = PlaylistGenerator::new(config);
        let playlist =
            match generator.generate_playlist(source, &spotify, &limiter, &abort, &mut *rng) {
                Ok(playlist) => playlist,
                Err(e) => {
                    eprintln!("✗ Failed to generate playlist: {e}");
                    creation_results.push((source.name().to_string(), false, format!("Error: {e}")));
                    continue;
                }
            };

        let metadata = &playlist.metadata;
        println!("\n{}", playlist.name);
        println!("{}", "=".repeat(playlist.name.len()));
        println!(
            "   Events: {} fetched | {} after filters",
            metadata.events_fetched, metadata.events_kept
        );
        println!(
            "   Performers: {} | Found in catalog: {} | Not found: {}",
            metadata.performers, metadata.performers_resolved, metadata.performers_missed
        );
        println!(
            "   Candidate tracks: {} | Selected: {} from {} performers",
            metadata.candidates, metadata.selected, metadata.performer_count
        );
        if let Some((min, max)) = metadata.popularity_range {
            println!(
                "   Popularity: {}-{} (avg {:.1})",
                min, max, metadata.avg_popularity
            );
        }
        if metadata.aborted {
            println!("   Catalog lookups stopped at the deadline; playlist is partial.");
        }

        if playlist.tracks.is_empty() {
            println!("No tracks found for this playlist - skipping playlist creation.");
            creation_results.push((playlist.name.clone(), false, "No tracks available".to_string()));
            continue;
        }

        if args.debug {
            // Debug mode: print playlist details instead of creating it
            println!(
                "\nDEBUG MODE: Playlist '{}' (would create via API, {})",
                playlist.name,
                if playlist.public { "public" } else { "private" }
            );
            for (i, track) in playlist.tracks.iter().enumerate() {
                println!(
                    "     {}. \"{}\" by {} [popularity {}]",
                    i + 1,
                    track.catalog_track_name,
                    track.performer_name,
                    track.popularity
                );
                println!("        URI: {}", track.catalog_track_uri);
            }
            creation_results.push((
                playlist.name.clone(),
                true,
                "Debug mode - not created".to_string(),
            ));
        } else {
            println!("\nCreating playlist '{}' via API...", playlist.name);
            match publish(&spotify, &playlist) {
                Ok(handle) => {
                    println!(
                        "✓ Successfully created playlist '{}' with ID: {}",
                        handle.name, handle.id
                    );
                    let detail = match &handle.url {
                        Some(url) => format!("Created with ID: {} ({})", handle.id, url),
                        None => format!("Created with ID: {}", handle.id),
                    };
                    creation_results.push((playlist.name.clone(), true, detail));
                }
                Err(e) => {
                    eprintln!("✗ Failed to create playlist '{}': {}", playlist.name, e);
                    creation_results.push((playlist.name.clone(), false, format!("Error: {e}")));
                }
            }
        }
    }

    // Summary of playlist creation results (suitable for cron job monitoring)
    println!("\n=== PLAYLIST CREATION SUMMARY ===");
    let successful_creations = creation_results
        .iter()
        .filter(|(_, success, _)| *success)
        .count();
    let total_attempts = creation_results.len();

    println!("Successfully created {successful_creations}/{total_attempts} playlists");

    for (name, success, message) in &creation_results {
        let status = if *success { "✓" } else { "✗" };
        println!("{status} {name}: {message}");
    }

    if successful_creations == total_attempts && total_attempts > 0 {
        println!("\nAll playlists created successfully.");
    } else if successful_creations > 0 {
        println!("\nPartial success: {successful_creations}/{total_attempts} playlists created.");
    } else {
        println!("\nNo playlists were created successfully.");
        return Err(anyhow::anyhow!("Playlist creation failed"));
    }

    Ok(())
}
