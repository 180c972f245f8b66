use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use thiserror::Error;

use caredash_lib::config::{self, DashboardConfig};
use caredash_lib::dashboard::{compute_dashboard_summary_with, DashboardError};
use caredash_lib::db::DatabaseError;
use caredash_lib::SqliteDataSource;

#[derive(Parser, Debug)]
#[command(name = "caredash")]
#[command(about = "Caredash - Dashboard summaries over patient-care records")]
#[command(version)]
struct Args {
    /// Records database [default: records.db under the app data directory]
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute the dashboard summary and print it as JSON
    Summary {
        /// Reference instant, RFC 3339 [default: current time]
        #[arg(long, value_parser = parse_now)]
        now: Option<DateTime<Utc>>,

        /// Calendar-day offset from UTC, in minutes (e.g. -180)
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        utc_offset: i32,

        /// Pretty-print the JSON output
        #[arg(short, long)]
        pretty: bool,
    },
    /// Create the records database and apply migrations
    Init,
}

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Dashboard(#[from] DashboardError),

    #[error("Cannot create {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to encode summary: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to start runtime: {0}")]
    Runtime(std::io::Error),
}

fn parse_now(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("expected an RFC 3339 timestamp: {e}"))
}

fn open_source(database: Option<PathBuf>) -> Result<SqliteDataSource, CliError> {
    let path = database.unwrap_or_else(config::default_database_path);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| CliError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(SqliteDataSource::open(path)?)
}

fn run(args: Args) -> Result<(), CliError> {
    match args.command {
        Command::Init => {
            let source = open_source(args.database)?;
            println!("Database ready at {}", source.db_path().display());
        }
        Command::Summary {
            now,
            utc_offset,
            pretty,
        } => {
            let source = open_source(args.database)?;
            let config = DashboardConfig {
                utc_offset_minutes: utc_offset,
                ..Default::default()
            };
            let now = now.unwrap_or_else(Utc::now);

            let runtime = tokio::runtime::Runtime::new().map_err(CliError::Runtime)?;
            let summary =
                runtime.block_on(compute_dashboard_summary_with(&source, now, &config))?;

            let json = if pretty {
                serde_json::to_string_pretty(&summary)?
            } else {
                serde_json::to_string(&summary)?
            };
            println!("{json}");
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    caredash_lib::init_tracing();
    tracing::debug!("{} v{}", config::APP_NAME, config::APP_VERSION);

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
