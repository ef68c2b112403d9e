//! Database module for Klinik.
//!
//! This module provides the SQLite-backed implementation of the records API.
//! It owns the `patients` table, maps rows to [`Patient`] values and back, and
//! derives the server-side fields (audit timestamps, age, NORM) the screens
//! only ever display. The primary type exposed is [`SqlitePatients`].

use crate::api::{ApiError, PatientsApi};
use crate::format::{age_on, parse_date, timestamp};
use crate::models::{Addresses, Patient};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use time::OffsetDateTime;

/// Columns read for every patient query, in `patient_from_row` order.
const PATIENT_COLUMNS: &str = "id, norm, nik, bpjs_number, ihs_number, name, family_name, \
     birth_date, gender, email, phones, address_ktp, address_domisili, extra, created_at, updated_at";

/// Patient records stored in a local SQLite file.
///
/// A connection is opened per call, so the store can be shared freely
/// between the UI thread and request workers.
#[derive(Debug, Clone)]
pub struct SqlitePatients {
    path: PathBuf,
}

impl SqlitePatients {
    /// Creates a store for the database file at `path`.
    ///
    /// Nothing is opened until the first call; see [`SqlitePatients::init_db`].
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the underlying database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection, ApiError> {
        Ok(Connection::open(&self.path)?)
    }

    /// Initializes the database.
    ///
    /// Creates the database file if it doesn't exist and executes the embedded
    /// `schema.sql` to set up the `patients` table.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or the schema cannot
    /// be executed.
    pub fn init_db(&self) -> Result<(), ApiError> {
        let conn = self.connect()?;
        conn.execute_batch(include_str!("schema.sql"))?;
        tracing::info!(path = %self.path.display(), "patient database ready");
        Ok(())
    }

    /// Creates a new patient record.
    ///
    /// Both audit timestamps are set to the current time. When the record has
    /// no NORM, one is assigned from the row id.
    ///
    /// # Returns
    ///
    /// Returns the identifier of the new record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened, the record cannot be
    /// encoded, or the NORM is already taken.
    pub fn create(&self, patient: &Patient) -> Result<String, ApiError> {
        let conn = self.connect()?;
        let now = timestamp(OffsetDateTime::now_utc());
        conn.execute(
            "INSERT INTO patients (norm, nik, bpjs_number, ihs_number, name, family_name, birth_date, gender, email, phones, address_ktp, address_domisili, extra, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                patient.norm,
                patient.nik,
                patient.bpjs_number,
                patient.ihs_number,
                patient.name,
                patient.family_name,
                patient.birth_date,
                patient.gender,
                patient.email,
                serde_json::to_string(&patient.phones)?,
                patient.addresses.ktp,
                patient.addresses.domisili,
                serde_json::to_string(&patient.extra)?,
                now,
                now,
            ],
        )?;
        let id = conn.last_insert_rowid();
        conn.execute(
            "UPDATE patients SET norm = ? WHERE id = ? AND norm IS NULL",
            params![format!("{id:08}"), id],
        )?;
        Ok(id.to_string())
    }

    /// Inserts a few demonstration records when the table is empty.
    ///
    /// # Returns
    ///
    /// Returns the number of records inserted, `0` if the table already had data.
    pub fn seed_demo(&self) -> Result<usize, ApiError> {
        let conn = self.connect()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM patients", [], |row| row.get(0))?;
        if count > 0 {
            return Ok(0);
        }

        let demo = [
            ("Siti Aminah", "Aminah", "P", "1988-04-12", "3273015204880002"),
            ("Budi Santoso", "Santoso", "L", "1975-09-30", "3273013009750001"),
            ("Dewi Lestari", "Lestari", "P", "2001-01-05", "3273014501010003"),
        ];
        for (name, family_name, gender, birth_date, nik) in demo {
            self.create(&Patient {
                name: Some(name.to_string()),
                family_name: Some(family_name.to_string()),
                gender: Some(gender.to_string()),
                birth_date: Some(birth_date.to_string()),
                nik: Some(nik.to_string()),
                phones: vec!["0812-0000-0000".to_string()],
                addresses: Addresses {
                    ktp: Some("Jl. Asia Afrika No. 1, Bandung".to_string()),
                    domisili: None,
                },
                ..Default::default()
            })?;
        }
        tracing::info!(count = demo.len(), "seeded demo patients");
        Ok(demo.len())
    }
}

/// Parses a record identifier. Anything that is not a row id can't exist.
fn row_id(id: &str) -> Result<i64, ApiError> {
    id.trim()
        .parse::<i64>()
        .map_err(|_| ApiError::NotFound(id.to_string()))
}

fn json_column<T: serde::de::DeserializeOwned>(row: &Row<'_>, index: usize) -> rusqlite::Result<T> {
    let text: String = row.get(index)?;
    serde_json::from_str(&text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(e)))
}

/// Maps a row selected with [`PATIENT_COLUMNS`] to a [`Patient`].
fn patient_from_row(row: &Row<'_>) -> rusqlite::Result<Patient> {
    let id: i64 = row.get(0)?;
    let extra: Map<String, Value> = json_column(row, 13)?;
    Ok(Patient {
        id: Some(id.to_string()),
        norm: row.get(1)?,
        nik: row.get(2)?,
        bpjs_number: row.get(3)?,
        ihs_number: row.get(4)?,
        name: row.get(5)?,
        family_name: row.get(6)?,
        birth_date: row.get(7)?,
        gender: row.get(8)?,
        email: row.get(9)?,
        phones: json_column(row, 10)?,
        addresses: Addresses {
            ktp: row.get(11)?,
            domisili: row.get(12)?,
        },
        age: None,
        created_at: row.get(14)?,
        updated_at: row.get(15)?,
        extra,
    })
}

/// Fills in the age the backend derives from the birth date.
fn with_age(mut patient: Patient) -> Patient {
    let today = OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date();
    patient.age = patient
        .birth_date
        .as_deref()
        .and_then(parse_date)
        .and_then(|birth| age_on(birth, today));
    patient
}

impl PatientsApi for SqlitePatients {
    fn get_detail(&self, id: &str) -> Result<Patient, ApiError> {
        let row_id = row_id(id)?;
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {PATIENT_COLUMNS} FROM patients WHERE id = ?"
        ))?;
        let patient = stmt
            .query_row(params![row_id], patient_from_row)
            .optional()?;

        patient
            .map(with_age)
            .ok_or_else(|| ApiError::NotFound(id.to_string()))
    }

    /// Replaces every editable column. `created_at` is kept and `updated_at`
    /// is set to now; the audit values sent by the caller are ignored.
    fn update(&self, id: &str, patient: &Patient) -> Result<(), ApiError> {
        let row_id = row_id(id)?;
        let conn = self.connect()?;
        let changed = conn.execute(
            "UPDATE patients SET norm = ?, nik = ?, bpjs_number = ?, ihs_number = ?, name = ?, family_name = ?, birth_date = ?, gender = ?, email = ?, phones = ?, address_ktp = ?, address_domisili = ?, extra = ?, updated_at = ? WHERE id = ?",
            params![
                patient.norm,
                patient.nik,
                patient.bpjs_number,
                patient.ihs_number,
                patient.name,
                patient.family_name,
                patient.birth_date,
                patient.gender,
                patient.email,
                serde_json::to_string(&patient.phones)?,
                patient.addresses.ktp,
                patient.addresses.domisili,
                serde_json::to_string(&patient.extra)?,
                timestamp(OffsetDateTime::now_utc()),
                row_id,
            ],
        )?;
        if changed == 0 {
            return Err(ApiError::NotFound(id.to_string()));
        }
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<(), ApiError> {
        let row_id = row_id(id)?;
        let conn = self.connect()?;
        let changed = conn.execute("DELETE FROM patients WHERE id = ?", params![row_id])?;
        if changed == 0 {
            return Err(ApiError::NotFound(id.to_string()));
        }
        Ok(())
    }

    fn list(&self) -> Result<Vec<Patient>, ApiError> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {PATIENT_COLUMNS} FROM patients ORDER BY id"
        ))?;
        let patient_iter = stmt.query_map([], patient_from_row)?;

        let mut patients = Vec::new();
        for patient in patient_iter {
            patients.push(with_age(patient?));
        }
        Ok(patients)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ErrorKind;
    use serde_json::json;
    use tempfile::TempDir;

    fn store() -> (TempDir, SqlitePatients) {
        let dir = TempDir::new().unwrap();
        let store = SqlitePatients::new(dir.path().join("klinik.db"));
        store.init_db().unwrap();
        (dir, store)
    }

    fn patient(name: &str) -> Patient {
        Patient {
            name: Some(name.to_string()),
            birth_date: Some("1990-06-15".to_string()),
            gender: Some("L".to_string()),
            phones: vec!["0812-1".to_string(), "0812-2".to_string()],
            addresses: Addresses {
                ktp: Some("Bandung".to_string()),
                domisili: None,
            },
            ..Default::default()
        }
    }

    #[test]
    fn create_then_get_detail_fills_server_fields() {
        let (_dir, store) = store();
        let id = store.create(&patient("Budi")).unwrap();

        let loaded = store.get_detail(&id).unwrap();
        assert_eq!(loaded.id.as_deref(), Some(id.as_str()));
        assert_eq!(loaded.name.as_deref(), Some("Budi"));
        assert_eq!(loaded.phones, vec!["0812-1", "0812-2"]);
        assert_eq!(loaded.addresses.ktp.as_deref(), Some("Bandung"));
        assert_eq!(loaded.addresses.domisili, None);
        assert_eq!(loaded.norm, Some(format!("{:08}", id.parse::<i64>().unwrap())));
        assert!(loaded.created_at.is_some());
        assert!(loaded.age.is_some());
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let (_dir, store) = store();
        for id in ["42", "abc", ""] {
            let err = store.get_detail(id).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::NotFound);
        }
        assert_eq!(
            store.update("42", &patient("x")).unwrap_err().kind(),
            ErrorKind::NotFound
        );
        assert_eq!(store.delete("42").unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn update_round_trips_fields_and_extra_data() {
        let (_dir, store) = store();
        let id = store.create(&patient("Budi")).unwrap();

        let mut edited = store.get_detail(&id).unwrap();
        edited.email = Some("budi@example.com".to_string());
        edited.addresses.domisili = Some("Cimahi".to_string());
        edited.extra.insert("religion".to_string(), json!("Islam"));
        store.update(&id, &edited).unwrap();

        let reloaded = store.get_detail(&id).unwrap();
        assert_eq!(reloaded.email.as_deref(), Some("budi@example.com"));
        assert_eq!(reloaded.addresses.domisili.as_deref(), Some("Cimahi"));
        assert_eq!(reloaded.extra.get("religion"), Some(&json!("Islam")));
        assert_eq!(reloaded.created_at, edited.created_at);
    }

    #[test]
    fn duplicate_norm_is_a_validation_error() {
        let (_dir, store) = store();
        let first = store.create(&patient("A")).unwrap();
        let second = store.create(&patient("B")).unwrap();

        let mut clash = store.get_detail(&second).unwrap();
        clash.norm = store.get_detail(&first).unwrap().norm;
        assert_eq!(
            store.update(&second, &clash).unwrap_err().kind(),
            ErrorKind::Validation
        );
    }

    #[test]
    fn delete_removes_the_record() {
        let (_dir, store) = store();
        let id = store.create(&patient("Budi")).unwrap();
        store.delete(&id).unwrap();
        assert!(store.list().unwrap().is_empty());
        assert_eq!(store.get_detail(&id).unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn seeding_only_fills_an_empty_table() {
        let (_dir, store) = store();
        assert_eq!(store.seed_demo().unwrap(), 3);
        assert_eq!(store.seed_demo().unwrap(), 0);
        assert_eq!(store.list().unwrap().len(), 3);
    }
}
