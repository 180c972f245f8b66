use std::str::FromStr;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use super::TIMESTAMP_FORMAT;
use crate::db::DatabaseError;
use crate::models::{VitalSignEvent, VitalType};

/// Insert a vital sign record. `recorded_at` is stored exactly as given.
pub fn insert_vital_sign(conn: &Connection, vs: &VitalSignEvent) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO vital_signs
            (id, patient_id, vital_type, value_primary, value_secondary, unit, recorded_at, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            vs.id,
            vs.patient_id,
            vs.vital_type.map(|t| t.as_str()),
            vs.value_primary,
            vs.value_secondary,
            vs.unit,
            vs.recorded_at,
            vs.notes,
        ],
    )?;
    Ok(())
}

/// Vital signs recorded at or after `since`, oldest first.
///
/// Rows whose `recorded_at` SQLite cannot interpret are returned as well:
/// the window cannot be decided for them here, and dropping them would hide
/// bad data from the aggregator's diagnostics.
pub fn get_vital_signs_since(
    conn: &Connection,
    since: &DateTime<Utc>,
) -> Result<Vec<VitalSignEvent>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, vital_type, value_primary, value_secondary, unit, recorded_at, notes
         FROM vital_signs
         WHERE datetime(recorded_at) >= datetime(?1)
            OR datetime(recorded_at) IS NULL
         ORDER BY recorded_at ASC, id ASC",
    )?;
    let rows = stmt.query_map(
        params![since.format(TIMESTAMP_FORMAT).to_string()],
        row_to_vital_sign,
    )?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

fn row_to_vital_sign(row: &rusqlite::Row) -> Result<VitalSignEvent, rusqlite::Error> {
    let type_str: Option<String> = row.get(2)?;

    Ok(VitalSignEvent {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        vital_type: type_str.and_then(|s| VitalType::from_str(&s).ok()),
        value_primary: row.get(3)?,
        value_secondary: row.get(4)?,
        unit: row.get(5)?,
        recorded_at: row.get(6)?,
        notes: row.get(7)?,
    })
}
