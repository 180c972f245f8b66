use serde::{Deserialize, Serialize};

use super::enums::VitalType;

/// A single vital sign reading.
///
/// `recorded_at` is kept as the text the store returned. Aggregation only
/// needs its calendar day, and an unparseable value must stay visible
/// rather than be coerced into a default date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalSignEvent {
    pub id: String,
    pub patient_id: Option<String>,
    /// `None` when the stored type is not one we recognize.
    pub vital_type: Option<VitalType>,
    pub value_primary: f64,
    pub value_secondary: Option<f64>, // diastolic for blood_pressure
    pub unit: String,
    pub recorded_at: String,
    pub notes: Option<String>,
}

impl VitalSignEvent {
    /// Reading with no patient link, notes or secondary value.
    pub fn new(vital_type: VitalType, value: f64, recorded_at: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            patient_id: None,
            vital_type: Some(vital_type),
            value_primary: value,
            value_secondary: None,
            unit: vital_type.default_unit().to_string(),
            recorded_at: recorded_at.into(),
            notes: None,
        }
    }
}
