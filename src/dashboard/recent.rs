use chrono::NaiveDateTime;

use crate::models::PatientRecord;

/// Anything with a creation time, if one could be read.
pub trait Created {
    fn created_at(&self) -> Option<NaiveDateTime>;
}

impl Created for PatientRecord {
    fn created_at(&self) -> Option<NaiveDateTime> {
        self.created_at
    }
}

/// First `limit` items, unchanged and in input order.
///
/// Precondition: `items` is already newest-first. Nothing is re-sorted
/// here; if the source ignores the ordering, the result is simply a prefix.
pub fn project_recent<T: Clone>(items: &[T], limit: usize) -> Vec<T> {
    items.iter().take(limit).cloned().collect()
}

/// Whether `items` honors the newest-first precondition.
///
/// Items without a creation time carry no ordering evidence and are
/// ignored; the remaining ones must be non-increasing.
pub fn is_newest_first<T: Created>(items: &[T]) -> bool {
    let stamps: Vec<NaiveDateTime> = items.iter().filter_map(Created::created_at).collect();
    stamps.windows(2).all(|pair| pair[0] >= pair[1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CategoryLabel;

    fn patient(id: &str, created: &str) -> PatientRecord {
        PatientRecord {
            id: id.into(),
            name: id.to_uppercase(),
            category: CategoryLabel::Missing,
            created_at: NaiveDateTime::parse_from_str(created, "%Y-%m-%d %H:%M:%S").ok(),
        }
    }

    #[test]
    fn truncates_to_limit() {
        let items: Vec<u32> = (0..8).collect();
        assert_eq!(project_recent(&items, 5), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn shorter_input_returned_whole() {
        let items = vec!["a", "b"];
        assert_eq!(project_recent(&items, 5), items);
    }

    #[test]
    fn empty_input_gives_empty_output() {
        let items: Vec<PatientRecord> = Vec::new();
        assert!(project_recent(&items, 5).is_empty());
    }

    #[test]
    fn zero_limit_gives_empty_output() {
        assert!(project_recent(&[1, 2, 3], 0).is_empty());
    }

    #[test]
    fn result_is_prefix_of_input_for_any_limit() {
        let items: Vec<u32> = (0..6).collect();
        for limit in 0..10 {
            let projected = project_recent(&items, limit);
            assert_eq!(projected.len(), limit.min(items.len()));
            assert_eq!(&items[..projected.len()], projected.as_slice());
        }
    }

    #[test]
    fn does_not_reorder_unsorted_input() {
        let items = vec![
            patient("old", "2024-01-01 00:00:00"),
            patient("new", "2024-03-01 00:00:00"),
        ];
        assert!(!is_newest_first(&items));
        let projected = project_recent(&items, 5);
        assert_eq!(projected[0].id, "old");
    }

    #[test]
    fn newest_first_detection() {
        let items = vec![
            patient("c", "2024-03-01 00:00:00"),
            patient("b", "2024-03-01 00:00:00"),
            patient("a", "2024-02-01 00:00:00"),
        ];
        assert!(is_newest_first(&items));
        assert!(is_newest_first::<PatientRecord>(&[]));
    }

    #[test]
    fn unreadable_creation_times_are_ignored_by_order_check() {
        let items = vec![
            patient("c", "2024-03-01 00:00:00"),
            patient("x", "not a date"),
            patient("a", "2024-02-01 00:00:00"),
        ];
        assert!(items[1].created_at.is_none());
        assert!(is_newest_first(&items));
    }
}
