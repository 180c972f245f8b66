pub mod config;
pub mod dashboard; // Aggregation passes, reducers and the published-summary service
pub mod db;
pub mod models;
pub mod source; // DataSource trait + SQLite / in-memory adapters

use tracing_subscriber::EnvFilter;

pub use dashboard::{compute_dashboard_summary, DashboardError, DashboardService, Summary};
pub use source::{DataSource, FetchError, MemoryDataSource, SqliteDataSource};

/// Install the global `tracing` subscriber.
///
/// Honors `RUST_LOG`, otherwise falls back to `config::default_log_filter()`.
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .try_init();
}
