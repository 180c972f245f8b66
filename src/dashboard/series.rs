use chrono::NaiveDate;

use crate::models::VitalSignEvent;

use super::calendar::{date_key, date_label, DayCalendar};
use super::types::{DailyBucket, DailySeries};

/// Anything with a raw timestamp that can be bucketed by day.
pub trait Timestamped {
    fn timestamp(&self) -> &str;
}

impl Timestamped for VitalSignEvent {
    fn timestamp(&self) -> &str {
        &self.recorded_at
    }
}

impl Timestamped for &str {
    fn timestamp(&self) -> &str {
        *self
    }
}

/// Builds a zero-filled count series over the `days` calendar days ending
/// at and including `today`, oldest first.
///
/// Always returns exactly `days` buckets. Events outside the window are
/// ignored; events whose timestamp does not parse are skipped, counted in
/// `malformed` and logged.
pub fn build_daily_series<T: Timestamped>(
    events: &[T],
    days: u32,
    today: NaiveDate,
    calendar: &DayCalendar,
) -> DailySeries {
    let window = calendar.trailing_days(today, days);
    let mut counts = vec![0u32; window.len()];
    let mut malformed = 0u32;
    let mut outside_window = 0u32;

    if let Some(&first) = window.first() {
        for event in events {
            let day = match calendar.day_of(event.timestamp()) {
                Ok(day) => day,
                Err(e) => {
                    malformed += 1;
                    tracing::warn!(error = %e, "Skipping event with unparseable timestamp");
                    continue;
                }
            };

            let offset = (day - first).num_days();
            match usize::try_from(offset).ok().filter(|&i| i < counts.len()) {
                Some(i) => counts[i] += 1,
                None => outside_window += 1,
            }
        }
    } else {
        // Empty window: nothing can land, but bad timestamps are still reported.
        for event in events {
            match calendar.day_of(event.timestamp()) {
                Ok(_) => outside_window += 1,
                Err(e) => {
                    malformed += 1;
                    tracing::warn!(error = %e, "Skipping event with unparseable timestamp");
                }
            }
        }
    }

    let buckets = window
        .into_iter()
        .zip(counts)
        .map(|(day, count)| DailyBucket {
            date_key: date_key(day),
            label: date_label(day),
            count,
        })
        .collect();

    DailySeries {
        buckets,
        malformed,
        outside_window,
    }
}
