//! The single write connection. All mutations serialize through it, which
//! is what makes per-pattern read-modify-write cycles atomic.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;

use petri_core::errors::{PetriResult, StorageError};

use super::pragmas::apply_pragmas;
use crate::to_storage_err;

/// Mutex-guarded writer connection.
pub struct WriteConnection {
    conn: Mutex<Connection>,
}

impl WriteConnection {
    /// Open the writer for the given database file.
    pub fn open(path: &Path) -> PetriResult<Self> {
        let conn = Connection::open(path).map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory writer (for testing).
    pub fn open_in_memory() -> PetriResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run a closure holding the writer lock.
    pub fn with_conn<F, T>(&self, f: F) -> PetriResult<T>
    where
        F: FnOnce(&Connection) -> PetriResult<T>,
    {
        let guard = self.conn.lock().map_err(|e| StorageError::LockPoisoned {
            message: e.to_string(),
        })?;
        f(&guard)
    }
}
