use std::str::FromStr;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use super::TIMESTAMP_FORMAT;
use crate::dashboard::DayCalendar;
use crate::db::DatabaseError;
use crate::models::{AppointmentRecord, AppointmentType};

/// Insert an appointment. The date is stored as UTC.
pub fn insert_appointment(
    conn: &Connection,
    appt: &AppointmentRecord,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO appointments (id, patient_id, date, appointment_type, notes)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            appt.id,
            appt.patient_id,
            appt.date.map(|at| at.format(TIMESTAMP_FORMAT).to_string()),
            appt.appointment_type.map(|t| t.as_str()),
            appt.notes,
        ],
    )?;
    Ok(())
}

/// Appointments with `from <= date <= to`, soonest first.
///
/// The window is applied by SQLite. A selected row whose date the calendar
/// cannot read comes back with `date: None` instead of failing the fetch.
pub fn get_appointments_between(
    conn: &Connection,
    from: &DateTime<Utc>,
    to: &DateTime<Utc>,
) -> Result<Vec<AppointmentRecord>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, date, appointment_type, notes
         FROM appointments
         WHERE datetime(date) >= datetime(?1) AND datetime(date) <= datetime(?2)
         ORDER BY datetime(date) ASC, id ASC",
    )?;
    let rows = stmt.query_map(
        params![
            from.format(TIMESTAMP_FORMAT).to_string(),
            to.format(TIMESTAMP_FORMAT).to_string(),
        ],
        row_to_appointment,
    )?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

fn row_to_appointment(row: &rusqlite::Row) -> Result<AppointmentRecord, rusqlite::Error> {
    let id: String = row.get(0)?;
    let date_raw: String = row.get(2)?;
    let type_str: Option<String> = row.get(3)?;

    let date = match DayCalendar::utc().instant_of(&date_raw) {
        Ok(at) => Some(at),
        Err(e) => {
            tracing::warn!(appointment = %id, error = %e, "Unreadable appointment date");
            None
        }
    };

    Ok(AppointmentRecord {
        id,
        patient_id: row.get(1)?,
        date,
        appointment_type: type_str.and_then(|s| AppointmentType::from_str(&s).ok()),
        notes: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;
    use chrono::TimeZone;

    fn make_appt(id: &str, date: DateTime<Utc>) -> AppointmentRecord {
        AppointmentRecord {
            id: id.to_string(),
            patient_id: None,
            date: Some(date),
            appointment_type: Some(AppointmentType::HomeVisit),
            notes: None,
        }
    }

    #[test]
    fn window_is_inclusive_on_both_ends() {
        let conn = open_memory_database().unwrap();
        let from = Utc.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2024, 3, 17, 9, 0, 0).unwrap();

        let before = make_appt("before", from - chrono::Duration::seconds(1));
        insert_appointment(&conn, &before).unwrap();
        insert_appointment(&conn, &make_appt("start", from)).unwrap();
        insert_appointment(&conn, &make_appt("middle", from + chrono::Duration::days(3))).unwrap();
        insert_appointment(&conn, &make_appt("end", to)).unwrap();
        insert_appointment(&conn, &make_appt("after", to + chrono::Duration::seconds(1))).unwrap();

        let ids: Vec<String> = get_appointments_between(&conn, &from, &to)
            .unwrap()
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec!["start", "middle", "end"]);
    }

    #[test]
    fn round_trip_preserves_fields() {
        let conn = open_memory_database().unwrap();
        let date = Utc.with_ymd_and_hms(2024, 3, 12, 14, 30, 0).unwrap();
        let mut appt = make_appt("a1", date);
        appt.notes = Some("Bring glucose log".into());
        insert_appointment(&conn, &appt).unwrap();

        let found = get_appointments_between(
            &conn,
            &(date - chrono::Duration::days(1)),
            &(date + chrono::Duration::days(1)),
        )
        .unwrap();
        assert_eq!(found, vec![appt]);
    }

    #[test]
    fn unknown_type_reads_as_none() {
        let conn = open_memory_database().unwrap();
        conn.execute(
            "INSERT INTO appointments (id, date, appointment_type)
             VALUES ('a1', '2024-03-12 10:00:00', 'telehealth')",
            [],
        )
        .unwrap();

        let from = Utc.with_ymd_and_hms(2024, 3, 12, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2024, 3, 13, 0, 0, 0).unwrap();
        let found = get_appointments_between(&conn, &from, &to).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].appointment_type, None);
    }

    #[test]
    fn minute_precision_zoned_date_is_read() {
        let conn = open_memory_database().unwrap();
        conn.execute(
            "INSERT INTO appointments (id, date) VALUES ('a1', '2024-03-12T10:00Z')",
            [],
        )
        .unwrap();

        let from = Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2024, 3, 17, 0, 0, 0).unwrap();
        let found = get_appointments_between(&conn, &from, &to).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(
            found[0].date,
            Some(Utc.with_ymd_and_hms(2024, 3, 12, 10, 0, 0).unwrap())
        );
    }

    #[test]
    fn date_sqlite_reads_but_calendar_does_not_comes_back_as_none() {
        let conn = open_memory_database().unwrap();
        // Julian day number: 2024-03-12 12:00 UTC for SQLite, not a calendar layout.
        conn.execute(
            "INSERT INTO appointments (id, date) VALUES ('jd', '2460382.0')",
            [],
        )
        .unwrap();
        insert_appointment(
            &conn,
            &make_appt("ok", Utc.with_ymd_and_hms(2024, 3, 13, 9, 0, 0).unwrap()),
        )
        .unwrap();

        let from = Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2024, 3, 17, 0, 0, 0).unwrap();
        let found = get_appointments_between(&conn, &from, &to).unwrap();
        let listed: Vec<(&str, bool)> = found
            .iter()
            .map(|a| (a.id.as_str(), a.date.is_some()))
            .collect();
        assert_eq!(listed, vec![("jd", false), ("ok", true)]);
    }

    #[test]
    fn empty_window_returns_nothing() {
        let conn = open_memory_database().unwrap();
        let from = Utc.with_ymd_and_hms(2024, 3, 12, 0, 0, 0).unwrap();
        let found = get_appointments_between(&conn, &from, &from).unwrap();
        assert!(found.is_empty());
    }
}
