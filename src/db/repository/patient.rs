use rusqlite::{params, Connection};

use super::TIMESTAMP_FORMAT;
use crate::dashboard::DayCalendar;
use crate::db::DatabaseError;
use crate::models::{CategoryLabel, PatientRecord};

/// Insert a patient record. Unrecognized categories are stored verbatim.
pub fn insert_patient(conn: &Connection, patient: &PatientRecord) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO patients (id, name, category, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![
            patient.id,
            patient.name,
            patient.category.as_raw(),
            patient
                .created_at
                .map(|at| at.format(TIMESTAMP_FORMAT).to_string()),
        ],
    )?;
    Ok(())
}

/// All patients, most recently created first.
///
/// Ordered by the instant SQLite reads from `created_at`, so mixed layouts
/// (`T` or space separated, with or without offset) sort together. Rows it
/// cannot read sort last; ties are broken by id.
pub fn list_patients_newest_first(conn: &Connection) -> Result<Vec<PatientRecord>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, category, created_at
         FROM patients
         ORDER BY datetime(created_at) DESC, id ASC",
    )?;
    let rows = stmt.query_map([], row_to_patient)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

fn row_to_patient(row: &rusqlite::Row) -> Result<PatientRecord, rusqlite::Error> {
    let id: String = row.get(0)?;
    let category: Option<String> = row.get(2)?;
    let created_raw: Option<String> = row.get(3)?;

    let created_at = created_raw.as_deref().and_then(|raw| {
        match DayCalendar::utc().parse(raw) {
            Ok(at) => Some(at.naive_utc()),
            Err(e) => {
                tracing::warn!(patient = %id, error = %e, "Unreadable patient creation time");
                None
            }
        }
    });

    Ok(PatientRecord {
        id,
        name: row.get(1)?,
        category: CategoryLabel::from(category),
        created_at,
    })
}
