//! Active-migration bookkeeping.
//!
//! At most one row of `migrations` has `is_active = 1`. Scoped inserts read
//! the active id through [`MigrationRegistry::active_id`].

use odie_core::Record;
use rusqlite::OptionalExtension;
use tracing::info;

use crate::convert::row_to_record;
use crate::database::Database;
use crate::error::{Result, StoreError};

/// Reads and switches the active migration.
pub struct MigrationRegistry<'a> {
    db: &'a Database,
}

impl<'a> MigrationRegistry<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Makes `id` the only active migration.
    ///
    /// Clearing the old flag and setting the new one commit together.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MigrationNotFound`] without touching any flag
    /// when `id` does not exist.
    pub fn set_active(&self, id: i64) -> Result<()> {
        let tx = self.db.connection().unchecked_transaction()?;

        let exists: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM migrations WHERE id = ?1)",
            [id],
            |row| row.get(0),
        )?;
        if !exists {
            return Err(StoreError::MigrationNotFound(id));
        }

        tx.execute("UPDATE migrations SET is_active = 0 WHERE is_active != 0", [])?;
        tx.execute("UPDATE migrations SET is_active = 1 WHERE id = ?1", [id])?;
        tx.commit()?;

        info!(migration_id = id, "activated migration");
        Ok(())
    }

    /// Id of the active migration, if any.
    ///
    /// Should the flag ever be set on several rows, the lowest id wins.
    pub fn active_id(&self) -> Result<Option<i64>> {
        let id = self
            .db
            .connection()
            .query_row(
                "SELECT id FROM migrations WHERE is_active = 1 ORDER BY id LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    /// The full active migration row.
    pub fn active(&self) -> Result<Option<Record>> {
        let mut stmt = self
            .db
            .connection()
            .prepare("SELECT * FROM migrations WHERE is_active = 1 ORDER BY id LIMIT 1")?;
        let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let record = stmt
            .query_row([], |row| row_to_record(row, &names))
            .optional()?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_migrations(names: &[&str]) -> Database {
        let db = Database::open_in_memory().unwrap();
        for name in names {
            db.connection()
                .execute(
                    "INSERT INTO migrations (name, old_root, new_root) VALUES (?1, '/old', '/new')",
                    [name],
                )
                .unwrap();
        }
        db
    }

    fn active_count(db: &Database) -> i64 {
        db.connection()
            .query_row("SELECT COUNT(*) FROM migrations WHERE is_active = 1", [], |row| {
                row.get(0)
            })
            .unwrap()
    }

    #[test]
    fn test_no_active_migration_initially() {
        let db = with_migrations(&["a"]);
        let registry = db.registry();
        assert_eq!(registry.active_id().unwrap(), None);
        assert!(registry.active().unwrap().is_none());
    }

    #[test]
    fn test_set_active() {
        let db = with_migrations(&["a", "b"]);
        let registry = db.registry();
        registry.set_active(2).unwrap();
        assert_eq!(registry.active_id().unwrap(), Some(2));
        assert_eq!(registry.active().unwrap().unwrap().display("name"), "b");
    }

    #[test]
    fn test_set_active_switches_exclusively() {
        let db = with_migrations(&["a", "b"]);
        let registry = db.registry();
        registry.set_active(1).unwrap();
        registry.set_active(2).unwrap();
        assert_eq!(registry.active_id().unwrap(), Some(2));
        assert_eq!(active_count(&db), 1);
    }

    #[test]
    fn test_set_active_same_id_twice() {
        let db = with_migrations(&["a"]);
        let registry = db.registry();
        registry.set_active(1).unwrap();
        registry.set_active(1).unwrap();
        assert_eq!(registry.active_id().unwrap(), Some(1));
        assert_eq!(active_count(&db), 1);
    }

    #[test]
    fn test_set_active_missing_keeps_previous() {
        let db = with_migrations(&["a"]);
        let registry = db.registry();
        registry.set_active(1).unwrap();
        assert!(matches!(
            registry.set_active(42),
            Err(StoreError::MigrationNotFound(42))
        ));
        assert_eq!(registry.active_id().unwrap(), Some(1));
    }

    #[test]
    fn test_active_id_prefers_lowest_when_inconsistent() {
        let db = with_migrations(&["a", "b", "c"]);
        db.connection()
            .execute("UPDATE migrations SET is_active = 1 WHERE id IN (2, 3)", [])
            .unwrap();
        assert_eq!(db.registry().active_id().unwrap(), Some(2));
    }
}
