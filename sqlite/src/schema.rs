//! SQL schema for the migration-tracking tables.
//!
//! # Table structure
//!
//! - `migrations`: named relocation projects with old/new roots and the active flag
//! - `sites`: destination sites, unique by name within a migration
//! - `clients`: clients owning projects
//! - `projects`: projects referencing one site and one client
//! - `files`: files referencing one project, with a review flag
//!
//! Every table except `migrations` carries a `migration_id` with
//! `ON DELETE CASCADE`, so deleting a migration removes everything scoped
//! to it. References between scoped tables are restricting.

use crate::error::{Result, StoreError};

/// `CREATE TABLE IF NOT EXISTS` statements for all five tables.
pub(crate) const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS migrations (
    id INTEGER PRIMARY KEY,
    name TEXT UNIQUE NOT NULL,
    old_root TEXT NOT NULL,
    new_root TEXT NOT NULL,
    is_active INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS sites (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    migration_id INTEGER NOT NULL,
    UNIQUE (name, migration_id),
    FOREIGN KEY (migration_id) REFERENCES migrations(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS clients (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    migration_id INTEGER NOT NULL,
    FOREIGN KEY (migration_id) REFERENCES migrations(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS projects (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    site_id INTEGER NOT NULL,
    client_id INTEGER NOT NULL,
    migration_id INTEGER NOT NULL,
    FOREIGN KEY (site_id) REFERENCES sites(id),
    FOREIGN KEY (client_id) REFERENCES clients(id),
    FOREIGN KEY (migration_id) REFERENCES migrations(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS files (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    project_id INTEGER NOT NULL,
    flagged INTEGER NOT NULL DEFAULT 0,
    migration_id INTEGER NOT NULL,
    FOREIGN KEY (project_id) REFERENCES projects(id),
    FOREIGN KEY (migration_id) REFERENCES migrations(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_sites_migration ON sites(migration_id);
CREATE INDEX IF NOT EXISTS idx_clients_migration ON clients(migration_id);
CREATE INDEX IF NOT EXISTS idx_projects_migration ON projects(migration_id);
CREATE INDEX IF NOT EXISTS idx_files_migration ON files(migration_id);
CREATE INDEX IF NOT EXISTS idx_files_project ON files(project_id);
"#;

/// Validates that a table or column name contains only alphanumeric
/// characters and underscores, so it can be spliced into SQL text.
pub(crate) fn validate_identifier(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(StoreError::InvalidIdentifier(name.to_string()));
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(StoreError::InvalidIdentifier(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use odie_core::Table;
    use rusqlite::Connection;

    fn schema_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        conn.execute_batch(SCHEMA_SQL).unwrap();
        conn
    }

    #[test]
    fn test_valid_identifier() {
        assert!(validate_identifier("migrations").is_ok());
        assert!(validate_identifier("test_table2").is_ok());
    }

    #[test]
    fn test_invalid_identifier() {
        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("drop;--").is_err());
        assert!(validate_identifier("two words").is_err());
    }

    #[test]
    fn test_schema_sql_contains_all_tables() {
        for table in Table::ALL {
            assert!(
                SCHEMA_SQL.contains(&format!("CREATE TABLE IF NOT EXISTS {} (", table.name())),
                "missing table {table}"
            );
        }
    }

    #[test]
    fn test_schema_sql_is_idempotent() {
        let conn = schema_conn();
        conn.execute_batch(SCHEMA_SQL).unwrap();
    }

    #[test]
    fn test_scoped_rows_require_existing_migration() {
        let conn = schema_conn();
        let result = conn.execute(
            "INSERT INTO clients (name, migration_id) VALUES ('Acme', 99)",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_site_names_unique_per_migration() {
        let conn = schema_conn();
        conn.execute_batch(
            "INSERT INTO migrations (name, old_root, new_root) VALUES ('a', '/o', '/n');
             INSERT INTO migrations (name, old_root, new_root) VALUES ('b', '/o', '/n');
             INSERT INTO sites (name, migration_id) VALUES ('HQ', 1);
             INSERT INTO sites (name, migration_id) VALUES ('HQ', 2);",
        )
        .unwrap();

        let duplicate = conn.execute("INSERT INTO sites (name, migration_id) VALUES ('HQ', 1)", []);
        assert!(duplicate.is_err());
    }
}
