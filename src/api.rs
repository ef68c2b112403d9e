//! The records API consumed by the patient screens.
//!
//! Screens only see [`PatientsApi`]. The SQLite store in [`crate::db`] is the
//! bundled implementation; tests substitute their own.

use crate::models::Patient;
use std::fmt;

/// Coarse classification of a failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Validation,
    Storage,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::NotFound => "data tidak ditemukan",
            ErrorKind::Validation => "data tidak valid",
            ErrorKind::Storage => "gangguan penyimpanan",
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("patient {0} not found")]
    NotFound(String),
    #[error("invalid patient data: {0}")]
    Validation(String),
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::NotFound(_) => ErrorKind::NotFound,
            ApiError::Validation(_) | ApiError::Encoding(_) => ErrorKind::Validation,
            ApiError::Database(rusqlite::Error::SqliteFailure(failure, _))
                if failure.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                ErrorKind::Validation
            }
            ApiError::Database(_) => ErrorKind::Storage,
        }
    }
}

/// Remote patient records.
///
/// Calls block; screens run them off the UI thread.
pub trait PatientsApi: Send + Sync {
    /// Fetches one record. Fails with [`ErrorKind::NotFound`] for unknown ids.
    fn get_detail(&self, id: &str) -> Result<Patient, ApiError>;

    /// Replaces the stored record with `patient`.
    fn update(&self, id: &str, patient: &Patient) -> Result<(), ApiError>;

    /// Removes the record.
    fn delete(&self, id: &str) -> Result<(), ApiError>;

    /// All records, for the listing screen.
    fn list(&self) -> Result<Vec<Patient>, ApiError>;
}

#[cfg(test)]
pub mod testing {
    //! In-memory [`PatientsApi`] for component tests.

    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MemoryPatients {
        pub records: Mutex<BTreeMap<String, Patient>>,
        pub fail_updates: Mutex<bool>,
        pub fail_deletes: Mutex<bool>,
        pub delete_calls: Mutex<usize>,
        pub update_calls: Mutex<usize>,
    }

    impl MemoryPatients {
        pub fn with(records: impl IntoIterator<Item = Patient>) -> Self {
            let api = Self::default();
            {
                let mut map = api.records.lock().unwrap();
                for patient in records {
                    let id = patient.id.clone().unwrap_or_default();
                    map.insert(id, patient);
                }
            }
            api
        }
    }

    impl PatientsApi for MemoryPatients {
        fn get_detail(&self, id: &str) -> Result<Patient, ApiError> {
            self.records
                .lock()
                .unwrap()
                .get(id)
                .cloned()
                .ok_or_else(|| ApiError::NotFound(id.to_string()))
        }

        fn update(&self, id: &str, patient: &Patient) -> Result<(), ApiError> {
            *self.update_calls.lock().unwrap() += 1;
            if *self.fail_updates.lock().unwrap() {
                return Err(ApiError::Validation("rejected".to_string()));
            }
            let mut records = self.records.lock().unwrap();
            match records.get_mut(id) {
                Some(stored) => {
                    *stored = patient.clone();
                    Ok(())
                }
                None => Err(ApiError::NotFound(id.to_string())),
            }
        }

        fn delete(&self, id: &str) -> Result<(), ApiError> {
            *self.delete_calls.lock().unwrap() += 1;
            if *self.fail_deletes.lock().unwrap() {
                return Err(ApiError::Database(rusqlite::Error::InvalidQuery));
            }
            self.records
                .lock()
                .unwrap()
                .remove(id)
                .map(|_| ())
                .ok_or_else(|| ApiError::NotFound(id.to_string()))
        }

        fn list(&self) -> Result<Vec<Patient>, ApiError> {
            Ok(self.records.lock().unwrap().values().cloned().collect())
        }
    }
}
