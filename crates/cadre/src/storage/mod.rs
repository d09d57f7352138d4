//! SQLite persistence for every workflow repository.
//!
//! One connection guarded by a mutex is shared by all handlers. Writes that
//! touch more than one table run inside a transaction, which rolls back when
//! dropped without a commit.
//!
//! ## Tables
//!
//! - `users`
//! - `leadership_committees`, `appointment_decisions`
//! - `jobs`, `job_statuses`
//! - `requests`, `request_forwards`, `request_returns`

mod decisions;
mod jobs;
mod requests;
mod schema;
mod users;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use rusqlite::types::Type;
use rusqlite::{ffi, Connection};
use tracing::{debug, info};

use crate::workflows::repository::RepositoryError;

/// SQLite-backed implementation of the workflow repositories.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open or create the database file and bring its schema up to date.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        info!(path = %path.display(), "opening sqlite database");
        let conn = Connection::open(path).map_err(|source| StorageError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        if path != Path::new(":memory:") {
            conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;")
                .map_err(StorageError::Schema)?;
        }
        Self::initialise(conn)
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        debug!("opening in-memory sqlite database");
        let conn = Connection::open_in_memory().map_err(|source| StorageError::Open {
            path: PathBuf::from(":memory:"),
            source,
        })?;
        Self::initialise(conn)
    }

    fn initialise(conn: Connection) -> Result<Self, StorageError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(StorageError::Schema)?;
        schema::migrate(&conn).map_err(StorageError::Schema)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Cheap round trip used by the readiness probe.
    pub fn ping(&self) -> Result<(), RepositoryError> {
        self.with_conn(|conn| conn.query_row("SELECT 1", [], |_| Ok(())))
    }

    fn with_conn<T>(
        &self,
        f: impl FnOnce(&mut Connection) -> rusqlite::Result<T>,
    ) -> Result<T, RepositoryError> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|err| RepositoryError::Unavailable(format!("connection lock poisoned: {err}")))?;
        f(&mut conn).map_err(map_error)
    }
}

/// Failure to open or migrate the database.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to open database at {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
    #[error("failed to prepare database schema: {0}")]
    Schema(#[source] rusqlite::Error),
}

fn map_error(err: rusqlite::Error) -> RepositoryError {
    match &err {
        rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
                || failure.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
        {
            RepositoryError::Conflict
        }
        _ => RepositoryError::Unavailable(err.to_string()),
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unrecognised stored value `{0}`")]
struct UnknownValue(String);

/// Decode a text column through one of the domain `parse` functions.
fn parse_column<T>(
    index: usize,
    raw: String,
    parse: impl FnOnce(&str) -> Option<T>,
) -> rusqlite::Result<T> {
    match parse(&raw) {
        Some(value) => Ok(value),
        None => Err(rusqlite::Error::FromSqlConversionFailure(
            index,
            Type::Text,
            Box::new(UnknownValue(raw)),
        )),
    }
}

fn json_column<T: serde::de::DeserializeOwned>(index: usize, raw: &str) -> rusqlite::Result<T> {
    serde_json::from_str(raw).map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(err))
    })
}

fn to_json<T: serde::Serialize>(value: &T) -> rusqlite::Result<String> {
    serde_json::to_string(value).map_err(|err| rusqlite::Error::ToSqlConversionFailure(Box::new(err)))
}
