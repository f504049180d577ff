//! Catalogue of the application's tables.

use std::fmt;

/// Column every scoped table uses to reference its owning migration.
pub const MIGRATION_COLUMN: &str = "migration_id";

/// The five persisted entities.
///
/// Every table except [`Table::Migrations`] is *scoped*: its rows belong to
/// exactly one migration and inserts are stamped with the active one.
///
/// # Examples
///
/// ```
/// use odie_core::Table;
///
/// assert_eq!(Table::Projects.name(), "projects");
/// assert!(Table::Projects.is_scoped());
/// assert!(!Table::Migrations.is_scoped());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Migrations,
    Sites,
    Clients,
    Projects,
    Files,
}

impl Table {
    /// All tables, parents before children.
    pub const ALL: [Table; 5] = [
        Table::Migrations,
        Table::Sites,
        Table::Clients,
        Table::Projects,
        Table::Files,
    ];

    /// SQL table name.
    pub fn name(self) -> &'static str {
        match self {
            Table::Migrations => "migrations",
            Table::Sites => "sites",
            Table::Clients => "clients",
            Table::Projects => "projects",
            Table::Files => "files",
        }
    }

    /// Singular, human-readable entity name.
    pub fn noun(self) -> &'static str {
        match self {
            Table::Migrations => "Migration",
            Table::Sites => "Site",
            Table::Clients => "Client",
            Table::Projects => "Project",
            Table::Files => "File",
        }
    }

    /// Plural, human-readable entity name used for screen titles.
    pub fn title(self) -> &'static str {
        match self {
            Table::Migrations => "Migrations",
            Table::Sites => "Sites",
            Table::Clients => "Clients",
            Table::Projects => "Projects",
            Table::Files => "Files",
        }
    }

    /// Whether inserts must carry the active migration id.
    pub fn is_scoped(self) -> bool {
        !matches!(self, Table::Migrations)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
