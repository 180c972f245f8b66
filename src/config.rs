use std::path::PathBuf;

use chrono::{DateTime, FixedOffset, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dashboard::DayCalendar;

/// Application-level constants
pub const APP_NAME: &str = "Caredash";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Trailing window for the vital-sign fetch (and its total count).
pub const VITAL_SIGNS_WINDOW_DAYS: i64 = 30;
/// Forward window for upcoming appointments.
pub const APPOINTMENT_WINDOW_DAYS: i64 = 7;
/// Length of the daily vital-sign chart. Independent of the fetch window.
pub const DAILY_SERIES_DAYS: u32 = 7;
/// How many patients the "recent" list shows.
pub const RECENT_PATIENTS_LIMIT: usize = 5;

/// Largest UTC offset chrono accepts, in minutes (exclusive of a full day).
const MAX_OFFSET_MINUTES: i32 = 24 * 60 - 1;
/// Upper bound for any configured window, roughly a century.
pub const MAX_WINDOW_DAYS: i64 = 36_600;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Window for {field} must not be negative, got {value}")]
    NegativeWindow { field: &'static str, value: i64 },

    #[error("Window for {field} exceeds {max} days, got {value}")]
    WindowTooLarge {
        field: &'static str,
        value: i64,
        max: i64,
    },

    #[error("UTC offset out of range: {0} minutes")]
    OffsetOutOfRange(i32),

    #[error("Window of {days} days around {now} is outside the supported date range")]
    WindowOutOfRange { now: DateTime<Utc>, days: i64 },
}

/// Windows and calendar policy for one dashboard pass.
///
/// Defaults reproduce the dashboard contract: 30-day vital-sign total,
/// 7-day appointment look-ahead, 7-day chart, 5 recent patients, UTC days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub vital_signs_window_days: i64,
    pub appointment_window_days: i64,
    pub daily_series_days: u32,
    pub recent_patients_limit: usize,
    /// Offset from UTC, in minutes, that defines a calendar day.
    pub utc_offset_minutes: i32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            vital_signs_window_days: VITAL_SIGNS_WINDOW_DAYS,
            appointment_window_days: APPOINTMENT_WINDOW_DAYS,
            daily_series_days: DAILY_SERIES_DAYS,
            recent_patients_limit: RECENT_PATIENTS_LIMIT,
            utc_offset_minutes: 0,
        }
    }
}

impl DashboardConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let windows = [
            ("vital_signs_window_days", self.vital_signs_window_days),
            ("appointment_window_days", self.appointment_window_days),
            ("daily_series_days", i64::from(self.daily_series_days)),
        ];
        for (field, value) in windows {
            if value < 0 {
                return Err(ConfigError::NegativeWindow { field, value });
            }
            if value > MAX_WINDOW_DAYS {
                return Err(ConfigError::WindowTooLarge {
                    field,
                    value,
                    max: MAX_WINDOW_DAYS,
                });
            }
        }
        if self.utc_offset_minutes.abs() > MAX_OFFSET_MINUTES {
            return Err(ConfigError::OffsetOutOfRange(self.utc_offset_minutes));
        }
        Ok(())
    }

    /// The calendar every day key of a pass is computed with.
    pub fn calendar(&self) -> Result<DayCalendar, ConfigError> {
        let offset = FixedOffset::east_opt(self.utc_offset_minutes * 60)
            .ok_or(ConfigError::OffsetOutOfRange(self.utc_offset_minutes))?;
        Ok(DayCalendar::with_offset(offset))
    }

    /// Start of the vital-sign fetch: `now` minus the trailing window.
    pub fn vital_signs_since(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>, ConfigError> {
        let days = self.vital_signs_window_days;
        TimeDelta::try_days(days)
            .and_then(|window| now.checked_sub_signed(window))
            .ok_or(ConfigError::WindowOutOfRange { now, days })
    }

    /// End of the appointment fetch: `now` plus the look-ahead window.
    pub fn appointments_until(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>, ConfigError> {
        let days = self.appointment_window_days;
        TimeDelta::try_days(days)
            .and_then(|window| now.checked_add_signed(window))
            .ok_or(ConfigError::WindowOutOfRange { now, days })
    }
}

/// Get the application data directory.
/// Falls back to the working directory when no home directory is known.
pub fn app_data_dir() -> PathBuf {
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Default location of the records database.
pub fn default_database_path() -> PathBuf {
    app_data_dir().join("records.db")
}

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "caredash=info,caredash_lib=info"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_dashboard_windows() {
        let config = DashboardConfig::default();
        assert_eq!(config.vital_signs_window_days, 30);
        assert_eq!(config.appointment_window_days, 7);
        assert_eq!(config.daily_series_days, 7);
        assert_eq!(config.recent_patients_limit, 5);
        assert_eq!(config.utc_offset_minutes, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn negative_window_rejected() {
        let config = DashboardConfig {
            appointment_window_days: -1,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NegativeWindow {
                field: "appointment_window_days",
                value: -1
            })
        );
    }

    #[test]
    fn oversized_window_rejected() {
        let config = DashboardConfig {
            daily_series_days: 1_000_000,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::WindowTooLarge {
                field: "daily_series_days",
                ..
            })
        ));
    }

    #[test]
    fn fetch_bounds_follow_windows() {
        use chrono::TimeZone;
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let config = DashboardConfig::default();
        assert_eq!(
            config.vital_signs_since(now).unwrap(),
            Utc.with_ymd_and_hms(2024, 2, 9, 12, 0, 0).unwrap()
        );
        assert_eq!(
            config.appointments_until(now).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 17, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn offset_out_of_range_rejected() {
        let config = DashboardConfig {
            utc_offset_minutes: 24 * 60,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OffsetOutOfRange(1440))
        ));
        assert!(config.calendar().is_err());
    }

    #[test]
    fn calendar_uses_configured_offset() {
        let config = DashboardConfig {
            utc_offset_minutes: -180,
            ..Default::default()
        };
        let calendar = config.calendar().unwrap();
        assert_eq!(calendar.offset().local_minus_utc(), -180 * 60);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: DashboardConfig =
            serde_json::from_str(r#"{ "daily_series_days": 14 }"#).unwrap();
        assert_eq!(config.daily_series_days, 14);
        assert_eq!(config.vital_signs_window_days, 30);
    }

    #[test]
    fn database_path_under_app_data() {
        let path = default_database_path();
        assert!(path.starts_with(app_data_dir()));
        assert!(path.ends_with("records.db"));
    }

    #[test]
    fn app_name_is_caredash() {
        assert_eq!(APP_NAME, "Caredash");
    }
}
