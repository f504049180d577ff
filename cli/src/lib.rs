//! Interactive terminal front end for odie.
//!
//! Screens list the rows of one table a page at a time and offer actions
//! keyed by a single letter or digit. Capabilities attached to a screen
//! supply those actions: pagination, create/edit/delete, picking a row for
//! a foreign key, and entity-specific ones such as activating a migration.
//!
//! - **`ui`**: list state, action dispatch and the navigation loop
//! - **`screens`**: the dashboard and one screen per entity
//! - **`prompt`**, **`fields`**, **`validators`**: field-by-field input
//! - **`term`**: the terminal abstraction, real and scripted
//! - **`config`**, **`logging`**: runtime settings and tracing setup
//!
//! # Example
//!
//! ```no_run
//! use odie_cli::config::Config;
//! use odie_cli::term::StdTerminal;
//! use odie_cli::ui::{self, Session};
//! use odie_sqlite::Database;
//!
//! let config = Config::default();
//! let db = Database::open(config.database_path()).unwrap();
//! let mut term = StdTerminal::new();
//! let mut session = Session::new(&db, &mut term, &config);
//! let start = odie_cli::screens::dashboard(&session).unwrap();
//! ui::run(&mut session, start).unwrap();
//! ```

pub mod config;
pub mod error;
pub mod fields;
pub mod logging;
pub mod prompt;
pub mod screens;
pub mod term;
pub mod ui;
pub mod validators;

pub use error::{CliError, Result};
