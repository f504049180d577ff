//! SQLite storage for migration tracking.
//!
//! This crate owns the on-disk schema (migrations, sites, clients, projects
//! and files), a table-agnostic record store, and the registry that tracks
//! which migration is active.
//!
//! # Architecture
//!
//! - **`schema`**: `CREATE TABLE` statements and identifier validation
//! - **`database`**: connection ownership, directory and schema creation
//! - **`store`**: generic insert/list/update/delete over [`Fields`](odie_core::Fields)
//! - **`registry`**: exclusive active-migration flag
//! - **`convert`**: mapping between core values and SQLite values
//!
//! # Quick start
//!
//! ```no_run
//! use odie_core::{Fields, Table, Value};
//! use odie_sqlite::Database;
//!
//! let db = Database::open("odie.db").unwrap();
//!
//! let mut migration = Fields::new();
//! migration.insert("name".into(), Value::from("Fileserver move"));
//! migration.insert("old_root".into(), Value::from("/srv/old"));
//! migration.insert("new_root".into(), Value::from("/srv/new"));
//! db.store(Table::Migrations).unwrap().add(migration).unwrap();
//! db.registry().set_active(1).unwrap();
//!
//! let mut client = Fields::new();
//! client.insert("name".into(), Value::from("Acme"));
//! db.store(Table::Clients).unwrap().add(client).unwrap();
//! ```
//!
//! Every statement runs on the single connection held by [`Database`], one
//! statement per implicit transaction, except activation which commits its
//! two updates together.

mod convert;
mod database;
mod error;
mod registry;
mod schema;
mod store;

pub use database::Database;
pub use error::{Result, StoreError};
pub use registry::MigrationRegistry;
pub use store::{RecordStore, TableSpec};
