use chrono::{DateTime, Utc};

use crate::config::DashboardConfig;
use crate::models::{AppointmentRecord, PatientRecord, VitalSignEvent};
use crate::source::DataSource;

use super::calendar::DayCalendar;
use super::categories::count_by_category;
use super::recent::{is_newest_first, project_recent};
use super::series::build_daily_series;
use super::types::{AggregationDiagnostics, Summary};
use super::DashboardError;

/// Compute the dashboard summary with the default windows and UTC days.
pub async fn compute_dashboard_summary<S: DataSource>(
    source: &S,
    now: DateTime<Utc>,
) -> Result<Summary, DashboardError> {
    compute_dashboard_summary_with(source, now, &DashboardConfig::default()).await
}

/// Compute the dashboard summary for `now`.
///
/// The three fetches run concurrently. The first failure aborts the pass,
/// drops the fetches still in flight and is returned with the name of the
/// source that failed; no partial summary is produced.
pub async fn compute_dashboard_summary_with<S: DataSource>(
    source: &S,
    now: DateTime<Utc>,
    config: &DashboardConfig,
) -> Result<Summary, DashboardError> {
    config.validate()?;
    let calendar = config.calendar()?;
    let since = config.vital_signs_since(now)?;
    let until = config.appointments_until(now)?;

    tracing::info!(%now, %since, %until, "Starting dashboard pass");

    let (patients, vital_signs, appointments) = tokio::try_join!(
        async {
            source
                .fetch_patients()
                .await
                .map_err(DashboardError::fetch("patients"))
        },
        async {
            source
                .fetch_vital_sign_events(since)
                .await
                .map_err(DashboardError::fetch("vital_signs"))
        },
        async {
            source
                .fetch_appointments(now, until)
                .await
                .map_err(DashboardError::fetch("appointments"))
        },
    )
    .inspect_err(|e| tracing::error!(error = %e, "Dashboard pass failed"))?;

    let summary = aggregate(&patients, &vital_signs, &appointments, now, config, &calendar);

    tracing::info!(
        total_patients = summary.total_patients,
        vital_signs_30d = summary.vital_sign_event_count_30d,
        upcoming_appointments = summary.upcoming_appointment_count_7d,
        clean = summary.diagnostics.is_clean(),
        "Dashboard pass complete"
    );
    Ok(summary)
}

/// Reduce one fetched snapshot into a `Summary`. Pure and deterministic.
///
/// `vital_signs` is expected to hold the whole trailing fetch window; every
/// record in it counts toward the window total, while only the last
/// `daily_series_days` calendar days appear in the chart. Appointments
/// without a readable date are skipped from the upcoming count and reported.
pub fn aggregate(
    patients: &[PatientRecord],
    vital_signs: &[VitalSignEvent],
    appointments: &[AppointmentRecord],
    now: DateTime<Utc>,
    config: &DashboardConfig,
    calendar: &DayCalendar,
) -> Summary {
    let tally = count_by_category(patients);
    let series = build_daily_series(
        vital_signs,
        config.daily_series_days,
        calendar.today(now),
        calendar,
    );

    let recent_order_violated = !is_newest_first(patients);
    if recent_order_violated {
        tracing::warn!("Patients not ordered newest-first; recent list may not be recent");
    }

    let unreadable_creation_times = patients.iter().filter(|p| p.created_at.is_none()).count();
    let upcoming = appointments.iter().filter(|a| a.date.is_some()).count();
    let malformed_appointment_dates = appointments.len() - upcoming;
    if malformed_appointment_dates > 0 {
        tracing::warn!(
            skipped = malformed_appointment_dates,
            "Appointments without a readable date left out of the upcoming count"
        );
    }

    let diagnostics = AggregationDiagnostics {
        unrecognized_categories: tally.unrecognized,
        malformed_timestamps: series.malformed,
        unreadable_creation_times: unreadable_creation_times as u32,
        malformed_appointment_dates: malformed_appointment_dates as u32,
        readings_outside_series: series.outside_window,
        recent_order_violated,
    };
    tracing::debug!(?diagnostics, "Aggregation diagnostics");

    Summary {
        generated_at: now,
        total_patients: tally.total,
        counts_by_category: tally.counts,
        vital_sign_event_count_30d: vital_signs.len() as u32,
        upcoming_appointment_count_7d: upcoming as u32,
        daily_series: series.buckets,
        recent_patients: project_recent(patients, config.recent_patients_limit),
        diagnostics,
    }
}
