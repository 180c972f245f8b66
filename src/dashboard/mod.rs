//! Dashboard aggregation.
//!
//! One pass fetches patients, recent vital signs and upcoming appointments
//! concurrently, then reduces them into a `Summary`:
//! - `categories`: patient counts per category
//! - `series`: zero-filled daily vital-sign counts
//! - `recent`: the most recently created patients
//!
//! The reducers are pure and synchronous. `orchestrator` owns the fetch
//! barrier and `service` keeps the latest published summary for long-lived
//! callers.

pub mod calendar;
pub mod categories;
pub mod orchestrator;
pub mod recent;
pub mod series;
pub mod service;
pub mod types;

pub use calendar::*;
pub use categories::*;
pub use orchestrator::*;
pub use recent::*;
pub use series::*;
pub use service::*;
pub use types::*;

use thiserror::Error;

use crate::config::ConfigError;
use crate::source::FetchError;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Failed to fetch {source_name}: {cause}")]
    Fetch {
        source_name: &'static str,
        #[source]
        cause: FetchError,
    },

    #[error("Invalid dashboard configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Dashboard state lock poisoned")]
    LockPoisoned,
}

impl DashboardError {
    pub(crate) fn fetch(source_name: &'static str) -> impl FnOnce(FetchError) -> Self {
        move |cause| DashboardError::Fetch { source_name, cause }
    }
}
