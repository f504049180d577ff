//! Core types shared by the odie store and terminal UI.
//!
//! This crate defines the data model that flows between SQLite and the
//! interactive screens:
//!
//! - [`Value`]: a single SQLite cell.
//! - [`Record`]: one loaded row, with its column order preserved.
//! - [`Fields`]: column values submitted to an insert or update.
//! - [`Table`]: the catalogue of persisted entities and their scoping.
//!
//! Field checks ([`non_empty`], [`absolute_path`], [`existing_directory`],
//! [`flag`]) report problems with prompted values as [`ValidationError`]s.
//!
//! # Example
//!
//! ```
//! use odie_core::*;
//!
//! let mut fields = Fields::new();
//! fields.insert("name".to_string(), Value::from("Acme"));
//! assert!(non_empty(&fields["name"].to_string()).is_ok());
//! assert!(Table::Clients.is_scoped());
//! ```

mod table;
mod types;
mod validate;

pub use table::{MIGRATION_COLUMN, Table};
pub use types::{Fields, Record, Value};
pub use validate::{Check, ValidationError, absolute_path, existing_directory, flag, non_empty};
