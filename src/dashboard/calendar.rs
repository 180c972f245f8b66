//! The one calendar-day policy shared by key generation and timestamp
//! truncation. Both sides of the daily series go through `DayCalendar`,
//! so a reading and the bucket it belongs to can never disagree on "day".

use chrono::{
    DateTime, Days, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc,
};
use thiserror::Error;

/// Naive layouts accepted in addition to RFC 3339. Tried in order.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Offset-bearing layouts RFC 3339 parsing rejects: Postgres style `+00`,
/// space separators and minute precision (`2024-03-12T10:00Z`).
const OFFSET_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%d %H:%M%#z",
];

/// A timestamp that cannot be placed on a calendar day.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Malformed timestamp: {raw:?}")]
pub struct MalformedTimestamp {
    pub raw: String,
}

/// Calendar days at a fixed UTC offset.
///
/// Offset-bearing timestamps are converted into the calendar's offset
/// before truncation. Naive timestamps are taken as already local to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCalendar {
    offset: FixedOffset,
}

impl Default for DayCalendar {
    fn default() -> Self {
        Self::utc()
    }
}

impl DayCalendar {
    pub fn utc() -> Self {
        Self { offset: Utc.fix() }
    }

    pub fn with_offset(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// The calendar day `now` falls on.
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.offset).date_naive()
    }

    /// Parse a raw timestamp into an instant at this calendar's offset.
    pub fn parse(&self, raw: &str) -> Result<DateTime<FixedOffset>, MalformedTimestamp> {
        let trimmed = raw.trim();
        let malformed = || MalformedTimestamp {
            raw: raw.to_string(),
        };
        if trimmed.is_empty() {
            return Err(malformed());
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(dt.with_timezone(&self.offset));
        }
        for fmt in OFFSET_DATETIME_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(trimmed, fmt) {
                return Ok(dt.with_timezone(&self.offset));
            }
        }

        let naive = NAIVE_DATETIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                    .ok()
                    .map(|d| d.and_time(NaiveTime::MIN))
            })
            .ok_or_else(malformed)?;

        self.offset
            .from_local_datetime(&naive)
            .single()
            .ok_or_else(malformed)
    }

    /// Truncate a raw timestamp to its calendar day.
    pub fn day_of(&self, raw: &str) -> Result<NaiveDate, MalformedTimestamp> {
        self.parse(raw).map(|dt| dt.date_naive())
    }

    /// The instant a raw timestamp denotes.
    pub fn instant_of(&self, raw: &str) -> Result<DateTime<Utc>, MalformedTimestamp> {
        self.parse(raw).map(|dt| dt.with_timezone(&Utc))
    }

    /// The `days` consecutive calendar days ending at `today`, oldest first.
    pub fn trailing_days(&self, today: NaiveDate, days: u32) -> Vec<NaiveDate> {
        (0..days)
            .rev()
            .filter_map(|back| today.checked_sub_days(Days::new(u64::from(back))))
            .collect()
    }
}

/// Canonical bucket key: `YYYY-MM-DD`.
pub fn date_key(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}

/// Display label: `DD/MM`, zero-padded.
pub fn date_label(day: NaiveDate) -> String {
    day.format("%d/%m").to_string()
}
