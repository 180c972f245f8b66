use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::AppointmentType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentRecord {
    pub id: String,
    pub patient_id: Option<String>,
    /// `None` when the stored value is not a timestamp the calendar reads.
    pub date: Option<DateTime<Utc>>,
    /// `None` when the stored type is not one we recognize.
    pub appointment_type: Option<AppointmentType>,
    pub notes: Option<String>,
}
