use crate::models::{CategoryLabel, PatientRecord};

use super::types::{CategoryCounts, CategoryTally};

/// Anything carrying a patient category tag.
pub trait Categorized {
    fn category(&self) -> &CategoryLabel;
}

impl Categorized for PatientRecord {
    fn category(&self) -> &CategoryLabel {
        &self.category
    }
}

impl Categorized for CategoryLabel {
    fn category(&self) -> &CategoryLabel {
        self
    }
}

/// Tallies entities per recognized category in a single pass.
///
/// Unrecognized and missing labels go to no bucket but still count toward
/// `total`, which is the input length rather than the bucket sum.
pub fn count_by_category<T: Categorized>(items: &[T]) -> CategoryTally {
    let mut counts = CategoryCounts::default();
    let mut unrecognized = 0u32;

    for item in items {
        match item.category().known() {
            Some(category) => counts.increment(category),
            None => {
                unrecognized += 1;
                tracing::warn!(
                    label = ?item.category().as_raw(),
                    "Unrecognized category excluded from category counts"
                );
            }
        }
    }

    CategoryTally {
        counts,
        total: items.len() as u32,
        unrecognized,
    }
}
