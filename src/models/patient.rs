use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::enums::PatientCategory;

/// Category tag as received from the store.
///
/// Closed over the recognized categories; anything else is kept as a
/// distinct case so it can be counted and reported instead of becoming
/// an extra bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum CategoryLabel {
    Known(PatientCategory),
    Unrecognized(String),
    Missing,
}

impl CategoryLabel {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            None | Some("") => Self::Missing,
            Some(s) => match PatientCategory::from_label(s) {
                Some(category) => Self::Known(category),
                None => Self::Unrecognized(s.to_string()),
            },
        }
    }

    pub fn known(&self) -> Option<PatientCategory> {
        match self {
            Self::Known(category) => Some(*category),
            _ => None,
        }
    }

    /// Text to store or display for this label.
    pub fn as_raw(&self) -> Option<&str> {
        match self {
            Self::Known(category) => Some(category.as_str()),
            Self::Unrecognized(raw) => Some(raw),
            Self::Missing => None,
        }
    }
}

impl From<PatientCategory> for CategoryLabel {
    fn from(category: PatientCategory) -> Self {
        Self::Known(category)
    }
}

impl From<Option<String>> for CategoryLabel {
    fn from(raw: Option<String>) -> Self {
        Self::parse(raw.as_deref())
    }
}

impl From<CategoryLabel> for Option<String> {
    fn from(label: CategoryLabel) -> Self {
        label.as_raw().map(str::to_string)
    }
}

/// A patient as fetched for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub id: String,
    pub name: String,
    pub category: CategoryLabel,
    /// `None` when the stored value is not a timestamp.
    pub created_at: Option<NaiveDateTime>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_unrecognized_and_missing() {
        assert_eq!(
            CategoryLabel::parse(Some("hospital")),
            CategoryLabel::Known(PatientCategory::Hospital)
        );
        assert_eq!(
            CategoryLabel::parse(Some("ambulatory")),
            CategoryLabel::Unrecognized("ambulatory".into())
        );
        assert_eq!(CategoryLabel::parse(Some("")), CategoryLabel::Missing);
        assert_eq!(CategoryLabel::parse(None), CategoryLabel::Missing);
        assert_eq!(
            CategoryLabel::parse(Some(" home ")),
            CategoryLabel::Unrecognized(" home ".into())
        );
    }

    #[test]
    fn known_only_for_recognized() {
        assert_eq!(
            CategoryLabel::Known(PatientCategory::Home).known(),
            Some(PatientCategory::Home)
        );
        assert_eq!(CategoryLabel::Unrecognized("x".into()).known(), None);
        assert_eq!(CategoryLabel::Missing.known(), None);
    }

    #[test]
    fn label_serializes_as_plain_string() {
        let json = serde_json::to_string(&CategoryLabel::Known(PatientCategory::Home)).unwrap();
        assert_eq!(json, "\"home\"");
        let json = serde_json::to_string(&CategoryLabel::Unrecognized("vip".into())).unwrap();
        assert_eq!(json, "\"vip\"");
        let json = serde_json::to_string(&CategoryLabel::Missing).unwrap();
        assert_eq!(json, "null");
    }

    #[test]
    fn patient_deserializes_with_unknown_category() {
        let patient: PatientRecord = serde_json::from_str(
            r#"{"id":"p1","name":"Ana","category":"clinic","created_at":"2024-03-01T09:30:00"}"#,
        )
        .unwrap();
        assert_eq!(patient.category, CategoryLabel::Unrecognized("clinic".into()));
        assert_eq!(
            patient.created_at,
            NaiveDateTime::parse_from_str("2024-03-01 09:30:00", "%Y-%m-%d %H:%M:%S").ok()
        );

        let patient: PatientRecord = serde_json::from_str(
            r#"{"id":"p2","name":"Bia","category":null,"created_at":"2024-03-01T09:30:00"}"#,
        )
        .unwrap();
        assert_eq!(patient.category, CategoryLabel::Missing);
    }
}
