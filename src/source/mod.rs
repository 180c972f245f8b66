//! Record sources the dashboard reads from.
//!
//! `DataSource` is the only way the aggregator reaches stored records.
//! Two implementations ship with the crate:
//! - `SqliteDataSource`: the on-disk records database
//! - `MemoryDataSource`: a fixed snapshot, for tests and embedding callers

mod memory;
mod sqlite;

use std::future::Future;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::db::DatabaseError;
use crate::models::{AppointmentRecord, PatientRecord, VitalSignEvent};

pub use memory::*;
pub use sqlite::*;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Fetch task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Source unavailable: {0}")]
    Unavailable(String),
}

/// Read access to the three record sets a dashboard pass needs.
///
/// Each call is independent; the aggregator issues them concurrently.
pub trait DataSource: Send + Sync {
    /// Every patient, most recently created first.
    ///
    /// The newest-first order is a contract: the recent-patients list is a
    /// plain prefix of this result.
    fn fetch_patients(
        &self,
    ) -> impl Future<Output = Result<Vec<PatientRecord>, FetchError>> + Send;

    /// Vital-sign readings recorded at or after `since_inclusive`.
    fn fetch_vital_sign_events(
        &self,
        since_inclusive: DateTime<Utc>,
    ) -> impl Future<Output = Result<Vec<VitalSignEvent>, FetchError>> + Send;

    /// Appointments with `from_inclusive <= date <= to_inclusive`.
    fn fetch_appointments(
        &self,
        from_inclusive: DateTime<Utc>,
        to_inclusive: DateTime<Utc>,
    ) -> impl Future<Output = Result<Vec<AppointmentRecord>, FetchError>> + Send;
}

impl<S: DataSource> DataSource for std::sync::Arc<S> {
    fn fetch_patients(
        &self,
    ) -> impl Future<Output = Result<Vec<PatientRecord>, FetchError>> + Send {
        (**self).fetch_patients()
    }

    fn fetch_vital_sign_events(
        &self,
        since_inclusive: DateTime<Utc>,
    ) -> impl Future<Output = Result<Vec<VitalSignEvent>, FetchError>> + Send {
        (**self).fetch_vital_sign_events(since_inclusive)
    }

    fn fetch_appointments(
        &self,
        from_inclusive: DateTime<Utc>,
        to_inclusive: DateTime<Utc>,
    ) -> impl Future<Output = Result<Vec<AppointmentRecord>, FetchError>> + Send {
        (**self).fetch_appointments(from_inclusive, to_inclusive)
    }
}
