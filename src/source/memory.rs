use chrono::{DateTime, Utc};

use super::{DataSource, FetchError};
use crate::dashboard::DayCalendar;
use crate::models::{AppointmentRecord, PatientRecord, VitalSignEvent};

/// Which fetch a `MemoryDataSource` should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceTable {
    Patients,
    VitalSigns,
    Appointments,
}

impl SourceTable {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceTable::Patients => "patients",
            SourceTable::VitalSigns => "vital_signs",
            SourceTable::Appointments => "appointments",
        }
    }
}

/// An in-memory record snapshot.
///
/// Applies the same window rules as the SQLite source: patients come back
/// newest-first with unknown creation times last, records whose time cannot
/// be read are passed through, appointments are filtered inclusively and
/// sorted by date.
#[derive(Debug, Clone, Default)]
pub struct MemoryDataSource {
    patients: Vec<PatientRecord>,
    vital_signs: Vec<VitalSignEvent>,
    appointments: Vec<AppointmentRecord>,
    /// Interprets naive reading timestamps when applying `since`.
    calendar: DayCalendar,
    failing: Option<SourceTable>,
}

impl MemoryDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_patients(mut self, patients: Vec<PatientRecord>) -> Self {
        self.patients = patients;
        self
    }

    pub fn with_vital_signs(mut self, vital_signs: Vec<VitalSignEvent>) -> Self {
        self.vital_signs = vital_signs;
        self
    }

    pub fn with_appointments(mut self, appointments: Vec<AppointmentRecord>) -> Self {
        self.appointments = appointments;
        self
    }

    pub fn with_calendar(mut self, calendar: DayCalendar) -> Self {
        self.calendar = calendar;
        self
    }

    /// Make one fetch fail with `FetchError::Unavailable`.
    pub fn failing_on(mut self, table: SourceTable) -> Self {
        self.failing = Some(table);
        self
    }

    fn check(&self, table: SourceTable) -> Result<(), FetchError> {
        match self.failing {
            Some(failing) if failing == table => Err(FetchError::Unavailable(format!(
                "{} fetch failed",
                table.as_str()
            ))),
            _ => Ok(()),
        }
    }
}

impl DataSource for MemoryDataSource {
    async fn fetch_patients(&self) -> Result<Vec<PatientRecord>, FetchError> {
        self.check(SourceTable::Patients)?;
        let mut patients = self.patients.clone();
        patients.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(patients)
    }

    async fn fetch_vital_sign_events(
        &self,
        since_inclusive: DateTime<Utc>,
    ) -> Result<Vec<VitalSignEvent>, FetchError> {
        self.check(SourceTable::VitalSigns)?;
        Ok(self
            .vital_signs
            .iter()
            .filter(|vs| match self.calendar.instant_of(&vs.recorded_at) {
                Ok(at) => at >= since_inclusive,
                Err(_) => true,
            })
            .cloned()
            .collect())
    }

    async fn fetch_appointments(
        &self,
        from_inclusive: DateTime<Utc>,
        to_inclusive: DateTime<Utc>,
    ) -> Result<Vec<AppointmentRecord>, FetchError> {
        self.check(SourceTable::Appointments)?;
        let mut found: Vec<AppointmentRecord> = self
            .appointments
            .iter()
            .filter(|a| match a.date {
                Some(date) => date >= from_inclusive && date <= to_inclusive,
                None => true,
            })
            .cloned()
            .collect();
        found.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(found)
    }
}
