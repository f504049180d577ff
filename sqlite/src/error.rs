//! Error types for store operations.
//!
//! Provides a unified error type covering database access, schema
//! mismatches between submitted fields and tables, and active-migration
//! scoping failures.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite database operation failure (including constraint violations).
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Storage directory could not be created.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Table or column name is not a plain identifier.
    #[error("invalid identifier '{0}': must contain only alphanumeric characters and underscores")]
    InvalidIdentifier(String),

    /// Bound table does not exist in the database.
    #[error("unknown table: {0}")]
    UnknownTable(String),

    /// Submitted fields name columns the table does not have.
    #[error("invalid column(s) for {table}: {}", .columns.join(", "))]
    InvalidColumn {
        table: String,
        columns: Vec<String>,
    },

    /// A scoped insert was attempted while no migration is active.
    #[error("no active migration: activate a migration before adding records")]
    NoActiveMigration,

    /// Update called without any fields to change.
    #[error("nothing to update in {0}")]
    EmptyUpdate(String),

    /// Activation targeted a migration id that does not exist.
    #[error("migration not found: {0}")]
    MigrationNotFound(i64),
}

/// Convenience alias for results with [`StoreError`].
pub type Result<T> = std::result::Result<T, StoreError>;
