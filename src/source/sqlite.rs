use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::Connection;

use super::{DataSource, FetchError};
use crate::db::{self, DatabaseError};
use crate::models::{AppointmentRecord, PatientRecord, VitalSignEvent};

/// Records database on disk.
///
/// Every fetch opens its own connection on the blocking pool, so the three
/// fetches of a dashboard pass run in parallel and nothing is shared
/// between passes.
#[derive(Debug, Clone)]
pub struct SqliteDataSource {
    db_path: PathBuf,
}

impl SqliteDataSource {
    /// Open (creating and migrating if needed) the database at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, DatabaseError> {
        let db_path = path.into();
        db::open_database(&db_path)?;
        Ok(Self { db_path })
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    async fn with_connection<T, F>(&self, query: F) -> Result<T, FetchError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, DatabaseError> + Send + 'static,
    {
        let path = self.db_path.clone();
        let result = tokio::task::spawn_blocking(move || {
            let conn = db::open_database(&path)?;
            query(&conn)
        })
        .await?;
        Ok(result?)
    }
}

impl DataSource for SqliteDataSource {
    async fn fetch_patients(&self) -> Result<Vec<PatientRecord>, FetchError> {
        let patients = self
            .with_connection(|conn| db::list_patients_newest_first(conn))
            .await?;
        tracing::debug!(count = patients.len(), "Fetched patients");
        Ok(patients)
    }

    async fn fetch_vital_sign_events(
        &self,
        since_inclusive: DateTime<Utc>,
    ) -> Result<Vec<VitalSignEvent>, FetchError> {
        let events = self
            .with_connection(move |conn| db::get_vital_signs_since(conn, &since_inclusive))
            .await?;
        tracing::debug!(count = events.len(), since = %since_inclusive, "Fetched vital signs");
        Ok(events)
    }

    async fn fetch_appointments(
        &self,
        from_inclusive: DateTime<Utc>,
        to_inclusive: DateTime<Utc>,
    ) -> Result<Vec<AppointmentRecord>, FetchError> {
        let appointments = self
            .with_connection(move |conn| {
                db::get_appointments_between(conn, &from_inclusive, &to_inclusive)
            })
            .await?;
        tracing::debug!(
            count = appointments.len(),
            from = %from_inclusive,
            to = %to_inclusive,
            "Fetched appointments"
        );
        Ok(appointments)
    }
}
