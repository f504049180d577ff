//! Connection ownership and schema creation.
//!
//! [`Database`] is constructed once at startup and borrowed by every
//! [`RecordStore`](crate::RecordStore) and
//! [`MigrationRegistry`](crate::MigrationRegistry). Opening it creates the
//! storage directory and schema when missing; reopening an existing file is
//! a no-op for the schema.
//!
//! # Example
//!
//! ```no_run
//! use odie_core::Table;
//! use odie_sqlite::Database;
//!
//! let db = Database::open("/tmp/odie/odie.db").unwrap();
//! let clients = db.store(Table::Clients).unwrap();
//! println!("{} clients", clients.get_all().unwrap().len());
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tracing::{debug, info};

use crate::error::{Result, StoreError};
use crate::registry::MigrationRegistry;
use crate::schema::SCHEMA_SQL;
use crate::store::{RecordStore, TableSpec};

/// Owns the SQLite connection for the lifetime of the process.
///
/// Foreign-key enforcement is switched on before the schema is created, so
/// every statement issued through [`connection`](Self::connection) observes
/// the cascade and restrict rules.
pub struct Database {
    conn: Connection,
    path: Option<PathBuf>,
}

impl Database {
    /// Opens (creating if needed) the database file at `path`.
    ///
    /// Missing parent directories are created first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory cannot be created, or
    /// [`StoreError::Database`] if the file cannot be opened or the schema
    /// cannot be applied.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
                info!(dir = %parent.display(), "created storage directory");
            }
        }

        let conn = Connection::open(path)?;
        let db = Self::init(conn, Some(path.to_path_buf()))?;
        debug!(path = %path.display(), "database opened");
        Ok(db)
    }

    /// Opens a private in-memory database with the full schema.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?, None)
    }

    fn init(mut conn: Connection, path: Option<PathBuf>) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        let tx = conn.transaction()?;
        tx.execute_batch(SCHEMA_SQL)?;
        tx.commit()?;

        Ok(Self { conn, path })
    }

    /// The shared connection, with foreign keys enforced.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// File backing this database, or `None` when in memory.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Creates a record store bound to `spec`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidIdentifier`] if the table or key name is
    /// not a plain identifier.
    pub fn store(&self, spec: impl Into<TableSpec>) -> Result<RecordStore<'_>> {
        RecordStore::new(self, spec)
    }

    /// The active-migration registry for this database.
    pub fn registry(&self) -> MigrationRegistry<'_> {
        MigrationRegistry::new(self)
    }

    /// Counts rows in `table`.
    pub fn count_rows(&self, table: &str) -> Result<usize> {
        crate::schema::validate_identifier(table)?;
        let count: i64 = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .map_err(|err| match err {
                rusqlite::Error::SqliteFailure(_, Some(ref msg)) if msg.contains("no such table") => {
                    StoreError::UnknownTable(table.to_string())
                }
                other => StoreError::Database(other),
            })?;
        Ok(count as usize)
    }

    /// Total rows inserted, updated or deleted on this connection so far.
    pub fn total_changes(&self) -> Result<u64> {
        let changes: i64 = self
            .conn
            .query_row("SELECT total_changes()", [], |row| row.get(0))?;
        Ok(changes as u64)
    }
}
