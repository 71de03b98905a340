//! `reschedule` CLI — consolidate work, exercise and social calendars.
//!
//! ## Usage
//!
//! ```sh
//! # Write the reference calendars into ./calendars
//! reschedule --data-dir calendars sample
//!
//! # Print the consolidated, conflict-free schedule as JSON
//! reschedule --data-dir calendars consolidate
//!
//! # Include the culled passes and what they lost to
//! reschedule --data-dir calendars consolidate --show-culled
//!
//! # Resolve every overlap, not just neighbouring ones
//! reschedule --data-dir calendars consolidate --strategy active-set
//!
//! # One source on its own, unresolved
//! reschedule --data-dir calendars exercise
//!
//! # List every clashing pair before resolution
//! reschedule --data-dir calendars clashes
//! ```
//!
//! Settings are read from `--config`, else `reschedule.toml` in the working
//! directory. Logs go to stderr; `RUST_LOG` overrides `-v`.

mod config;
mod store;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use clap::{Args, Parser, Subcommand};
use consolidation_engine::{
    find_clashes, Consolidator, Pass, PassView, ResolutionStrategy, UserPriorities,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::config::Settings;
use crate::store::{parse_timestamp, JsonFileStore};

#[derive(Parser)]
#[command(
    name = "reschedule",
    version,
    about = "Consolidate calendars into one conflict-free schedule"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the calendar JSON files (overrides the config)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// IANA timezone for timestamps without an offset (overrides the config)
    #[arg(long, global = true)]
    timezone: Option<String>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Args)]
struct Query {
    /// User whose schedule is built (defaults to the config's user_id)
    #[arg(short, long)]
    user: Option<u64>,
    /// Window start; accepted but not used to filter
    #[arg(long)]
    from: Option<String>,
    /// Window end; accepted but not used to filter
    #[arg(long)]
    to: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the reference calendars into the data directory
    Sample,
    /// Merge all calendars and drop clashing lower-priority passes
    Consolidate {
        #[command(flatten)]
        query: Query,
        /// adjacent-sweep (default) or active-set
        #[arg(long)]
        strategy: Option<String>,
        /// Also report the culled passes
        #[arg(long)]
        show_culled: bool,
    },
    /// Show the work calendar as passes
    Work {
        #[command(flatten)]
        query: Query,
    },
    /// Show the exercise calendar as padded passes
    Exercise {
        #[command(flatten)]
        query: Query,
    },
    /// Show the social calendar as passes
    Social {
        #[command(flatten)]
        query: Query,
    },
    /// List every clashing pair in the merged, unresolved schedule
    Clashes {
        #[command(flatten)]
        query: Query,
    },
}

#[derive(Serialize)]
struct CulledDto {
    #[serde(flatten)]
    pass: PassView,
    lost_to: String,
}

#[derive(Serialize)]
struct ReportDto {
    schedule: Vec<PassView>,
    culled: Vec<CulledDto>,
}

#[derive(Serialize)]
struct ClashDto {
    first: PassView,
    second: PassView,
    overlap_minutes: i64,
}

/// Resolved query parameters.
struct Window {
    user_id: u64,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(dir) = cli.data_dir {
        settings.data_dir = dir;
    }
    if let Some(tz) = cli.timezone {
        settings.timezone = tz;
    }
    let tz = settings.tz()?;
    let store = JsonFileStore::new(settings.data_dir.clone(), tz);

    match cli.command {
        Commands::Sample => {
            store.write_sample()?;
            eprintln!("Wrote sample calendars to {}", store.dir().display());
        }
        Commands::Consolidate {
            query,
            strategy,
            show_culled,
        } => {
            let strategy = match strategy {
                Some(s) => s.parse::<ResolutionStrategy>()?,
                None => settings.strategy,
            };
            let window = resolve_window(&query, &settings)?;
            let consolidator = consolidator(store, &settings)?.with_strategy(strategy);

            if show_culled {
                let report = consolidator
                    .consolidate_with_report(window.user_id, window.from, window.to)
                    .context("Failed to consolidate schedule")?;
                let dto = ReportDto {
                    schedule: report.kept.into_iter().map(PassView::from).collect(),
                    culled: report
                        .culled
                        .into_iter()
                        .map(|c| CulledDto {
                            pass: PassView::from(c.pass),
                            lost_to: c.lost_to.name,
                        })
                        .collect(),
                };
                print_json(&dto)?;
            } else {
                let schedule = consolidator
                    .get_consolidated_schedule(window.user_id, window.from, window.to)
                    .context("Failed to consolidate schedule")?;
                print_json(&schedule)?;
            }
        }
        Commands::Work { query } => {
            let window = resolve_window(&query, &settings)?;
            let passes = consolidator(store, &settings)?
                .get_work_schedule(window.user_id, window.from, window.to)
                .context("Failed to load work schedule")?;
            print_json(&passes)?;
        }
        Commands::Exercise { query } => {
            let window = resolve_window(&query, &settings)?;
            let passes = consolidator(store, &settings)?
                .get_exercise_schedule(window.user_id, window.from, window.to)
                .context("Failed to load exercise schedule")?;
            print_json(&passes)?;
        }
        Commands::Social { query } => {
            let window = resolve_window(&query, &settings)?;
            let passes = consolidator(store, &settings)?
                .get_private_life_schedule(window.user_id, window.from, window.to)
                .context("Failed to load social schedule")?;
            print_json(&passes)?;
        }
        Commands::Clashes { query } => {
            let window = resolve_window(&query, &settings)?;
            let merged: Vec<Pass> = consolidator(store, &settings)?
                .get_merged_schedule(window.user_id, window.from, window.to)
                .context("Failed to merge schedules")?;
            let clashes: Vec<ClashDto> = find_clashes(&merged)
                .into_iter()
                .map(|c| ClashDto {
                    first: PassView::from(c.first),
                    second: PassView::from(c.second),
                    overlap_minutes: c.overlap_minutes,
                })
                .collect();
            print_json(&clashes)?;
        }
    }

    Ok(())
}

/// Install a stderr subscriber; `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) -> Result<()> {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}

fn consolidator(
    store: JsonFileStore,
    settings: &Settings,
) -> Result<Consolidator<JsonFileStore, UserPriorities>> {
    Ok(Consolidator::new(store, settings.priority_provider()?))
}

/// Fill in the user and window, defaulting to the coming week.
fn resolve_window(query: &Query, settings: &Settings) -> Result<Window> {
    let tz = settings.tz()?;
    let from = match &query.from {
        Some(s) => parse_timestamp(s, tz).context("Invalid --from")?,
        None => Utc::now(),
    };
    let to = match &query.to {
        Some(s) => parse_timestamp(s, tz).context("Invalid --to")?,
        None => from + Duration::days(7),
    };
    if from > to {
        anyhow::bail!("--from must not be after --to");
    }
    Ok(Window {
        user_id: query.user.unwrap_or(settings.user_id),
        from,
        to,
    })
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}
