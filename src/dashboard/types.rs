use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{PatientCategory, PatientRecord};

/// Patient counts per recognized category. Every category is always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub home: u32,
    pub hospital: u32,
    pub freelance: u32,
}

impl CategoryCounts {
    pub fn get(&self, category: PatientCategory) -> u32 {
        match category {
            PatientCategory::Home => self.home,
            PatientCategory::Hospital => self.hospital,
            PatientCategory::Freelance => self.freelance,
        }
    }

    pub(crate) fn increment(&mut self, category: PatientCategory) {
        let slot = match category {
            PatientCategory::Home => &mut self.home,
            PatientCategory::Hospital => &mut self.hospital,
            PatientCategory::Freelance => &mut self.freelance,
        };
        *slot += 1;
    }

    /// `(category, count)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (PatientCategory, u32)> + '_ {
        PatientCategory::ALL.iter().map(move |&c| (c, self.get(c)))
    }

    /// Sum over recognized categories. Not the patient total.
    pub fn recognized_total(&self) -> u32 {
        self.home + self.hospital + self.freelance
    }
}

/// Output of the category counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryTally {
    pub counts: CategoryCounts,
    /// Every input entity, recognized or not.
    pub total: u32,
    /// Entities with an unrecognized or missing category.
    pub unrecognized: u32,
}

/// One calendar day of the vital-sign chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyBucket {
    /// `YYYY-MM-DD`; canonical for lookups and ordering.
    pub date_key: String,
    /// `DD/MM`; presentation only.
    pub label: String,
    pub count: u32,
}

/// Output of the daily series builder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DailySeries {
    pub buckets: Vec<DailyBucket>,
    /// Events whose timestamp could not be placed on a day.
    pub malformed: u32,
    /// Parseable events that fell outside the window.
    pub outside_window: u32,
}

impl DailySeries {
    pub fn total(&self) -> u32 {
        self.buckets.iter().map(|b| b.count).sum()
    }
}

/// Records skipped or doubtful during a pass.
///
/// Lets a zero in the summary be told apart from data that was dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationDiagnostics {
    pub unrecognized_categories: u32,
    /// Vital-sign readings left out of the chart.
    pub malformed_timestamps: u32,
    /// Patients whose creation time could not be read. Still counted.
    pub unreadable_creation_times: u32,
    /// Appointments skipped from the upcoming count.
    pub malformed_appointment_dates: u32,
    /// Fetched readings older than the chart window (expected, not an error).
    pub readings_outside_series: u32,
    /// The patient list was not newest-first, so `recent_patients` may not be recent.
    pub recent_order_violated: bool,
}

impl AggregationDiagnostics {
    pub fn is_clean(&self) -> bool {
        self.unrecognized_categories == 0
            && self.malformed_timestamps == 0
            && self.unreadable_creation_times == 0
            && self.malformed_appointment_dates == 0
            && !self.recent_order_violated
    }
}

/// Everything the dashboard shows, computed in one pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub generated_at: DateTime<Utc>,
    pub total_patients: u32,
    pub counts_by_category: CategoryCounts,
    pub vital_sign_event_count_30d: u32,
    pub upcoming_appointment_count_7d: u32,
    /// Oldest day first.
    pub daily_series: Vec<DailyBucket>,
    pub recent_patients: Vec<PatientRecord>,
    pub diagnostics: AggregationDiagnostics,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_iterate_in_category_order() {
        let counts = CategoryCounts {
            home: 1,
            hospital: 2,
            freelance: 0,
        };
        let pairs: Vec<_> = counts.iter().collect();
        assert_eq!(
            pairs,
            vec![
                (PatientCategory::Home, 1),
                (PatientCategory::Hospital, 2),
                (PatientCategory::Freelance, 0),
            ]
        );
        assert_eq!(counts.recognized_total(), 3);
    }

    #[test]
    fn counts_serialize_with_every_category() {
        let json = serde_json::to_value(CategoryCounts::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "home": 0, "hospital": 0, "freelance": 0 })
        );
    }

    #[test]
    fn diagnostics_clean_ignores_expected_exclusions() {
        let diagnostics = AggregationDiagnostics {
            readings_outside_series: 12,
            ..Default::default()
        };
        assert!(diagnostics.is_clean());

        let diagnostics = AggregationDiagnostics {
            malformed_timestamps: 1,
            ..Default::default()
        };
        assert!(!diagnostics.is_clean());

        let diagnostics = AggregationDiagnostics {
            malformed_appointment_dates: 1,
            ..Default::default()
        };
        assert!(!diagnostics.is_clean());
    }
}
