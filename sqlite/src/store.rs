//! Table-agnostic record access.
//!
//! A [`RecordStore`] binds to one table through a [`TableSpec`] and offers
//! insert, list, update and delete over loosely typed [`Fields`] and
//! [`Record`]s. Submitted column names are checked against the table's live
//! schema, which is fetched once per store and memoized. Stores for scoped
//! tables stamp every insert with the active migration.
//!
//! # Example
//!
//! ```no_run
//! use odie_core::{Fields, Table, Value};
//! use odie_sqlite::Database;
//!
//! let db = Database::open_in_memory().unwrap();
//! let clients = db.store(Table::Clients).unwrap();
//!
//! let mut fields = Fields::new();
//! fields.insert("name".into(), Value::from("Acme"));
//! // Fails with NoActiveMigration until a migration is activated.
//! assert!(clients.add(fields).is_err());
//! ```

use std::cell::OnceCell;
use std::collections::BTreeSet;

use odie_core::{Fields, MIGRATION_COLUMN, Record, Table, Value};
use rusqlite::params_from_iter;
use tracing::{debug, info};

use crate::convert::{row_to_record, to_sql};
use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::registry::MigrationRegistry;
use crate::schema::validate_identifier;

/// Binding of a store to one table.
///
/// # Examples
///
/// ```
/// use odie_core::Table;
/// use odie_sqlite::TableSpec;
///
/// let spec = TableSpec::from(Table::Migrations);
/// assert!(!spec.is_scoped());
///
/// let custom = TableSpec::new("audit_log").with_primary_key("entry_id").unscoped();
/// assert_eq!(custom.primary_key(), "entry_id");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSpec {
    name: String,
    primary_key: String,
    scoped: bool,
}

impl TableSpec {
    /// A scoped table keyed by `id`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primary_key: "id".to_string(),
            scoped: true,
        }
    }

    pub fn with_primary_key(mut self, primary_key: impl Into<String>) -> Self {
        self.primary_key = primary_key.into();
        self
    }

    /// Inserts into this table are not stamped with a migration.
    pub fn unscoped(mut self) -> Self {
        self.scoped = false;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    pub fn is_scoped(&self) -> bool {
        self.scoped
    }
}

impl From<Table> for TableSpec {
    fn from(table: Table) -> Self {
        let spec = TableSpec::new(table.name());
        if table.is_scoped() { spec } else { spec.unscoped() }
    }
}

/// Generic data access object for one table.
///
/// Every call runs as its own implicit transaction on the shared
/// connection. Updates and deletes that match no row are silent no-ops.
pub struct RecordStore<'a> {
    db: &'a Database,
    spec: TableSpec,
    columns: OnceCell<BTreeSet<String>>,
}

impl<'a> RecordStore<'a> {
    /// Creates a store for `spec` on `db`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidIdentifier`] if the table or primary key
    /// name is not a plain identifier.
    pub fn new(db: &'a Database, spec: impl Into<TableSpec>) -> Result<Self> {
        let spec = spec.into();
        validate_identifier(&spec.name)?;
        validate_identifier(&spec.primary_key)?;
        Ok(Self {
            db,
            spec,
            columns: OnceCell::new(),
        })
    }

    pub fn spec(&self) -> &TableSpec {
        &self.spec
    }

    pub fn table(&self) -> &str {
        &self.spec.name
    }

    /// The database this store reads from.
    pub fn database(&self) -> &'a Database {
        self.db
    }

    /// Column names of the bound table, fetched on first use.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownTable`] if the table has no columns
    /// (i.e. does not exist).
    pub fn columns(&self) -> Result<&BTreeSet<String>> {
        if let Some(columns) = self.columns.get() {
            return Ok(columns);
        }

        let mut stmt = self
            .db
            .connection()
            .prepare("SELECT name FROM pragma_table_info(?1)")?;
        let columns: BTreeSet<String> = stmt
            .query_map([&self.spec.name], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<_, _>>()?;

        if columns.is_empty() {
            return Err(StoreError::UnknownTable(self.spec.name.clone()));
        }
        debug!(table = %self.spec.name, count = columns.len(), "loaded column metadata");
        Ok(self.columns.get_or_init(|| columns))
    }

    /// Ensures every key in `fields` is a column of the bound table.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidColumn`] listing every offending key.
    pub fn validate_columns(&self, fields: &Fields) -> Result<()> {
        let columns = self.columns()?;
        let invalid: Vec<String> = fields
            .keys()
            .filter(|key| !columns.contains(key.as_str()))
            .cloned()
            .collect();

        if !invalid.is_empty() {
            return Err(StoreError::InvalidColumn {
                table: self.spec.name.clone(),
                columns: invalid,
            });
        }
        Ok(())
    }

    /// Inserts a row built from `fields`.
    ///
    /// For scoped tables the active migration id is injected as
    /// `migration_id`, replacing any value supplied by the caller.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidColumn`] for unknown keys,
    /// [`StoreError::NoActiveMigration`] for scoped tables when no migration
    /// is active, or [`StoreError::Database`] on constraint violations.
    pub fn add(&self, mut fields: Fields) -> Result<()> {
        self.validate_columns(&fields)?;

        if self.spec.scoped {
            let migration_id = MigrationRegistry::new(self.db)
                .active_id()?
                .ok_or(StoreError::NoActiveMigration)?;
            fields.insert(MIGRATION_COLUMN.to_string(), Value::Integer(migration_id));
        }

        let sql = if fields.is_empty() {
            format!("INSERT INTO {} DEFAULT VALUES", self.spec.name)
        } else {
            let columns: Vec<&str> = fields.keys().map(String::as_str).collect();
            let placeholders: Vec<String> = (1..=fields.len()).map(|i| format!("?{i}")).collect();
            format!(
                "INSERT INTO {} ({}) VALUES ({})",
                self.spec.name,
                columns.join(", "),
                placeholders.join(", ")
            )
        };

        self.db
            .connection()
            .execute(&sql, params_from_iter(fields.values().map(to_sql)))?;
        debug!(table = %self.spec.name, columns = fields.len(), "inserted row");
        Ok(())
    }

    /// Returns every row of the bound table in storage order.
    pub fn get_all(&self) -> Result<Vec<Record>> {
        let mut stmt = self
            .db
            .connection()
            .prepare(&format!("SELECT * FROM {}", self.spec.name))?;
        let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let records = stmt
            .query_map([], |row| row_to_record(row, &names))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// Updates the row with primary key `id`, changing only `fields`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidColumn`] for unknown keys or
    /// [`StoreError::EmptyUpdate`] when `fields` is empty.
    pub fn update(&self, id: i64, fields: &Fields) -> Result<()> {
        self.validate_columns(fields)?;
        if fields.is_empty() {
            return Err(StoreError::EmptyUpdate(self.spec.name.clone()));
        }

        let assignments: Vec<String> = fields
            .keys()
            .enumerate()
            .map(|(i, key)| format!("{key} = ?{}", i + 1))
            .collect();
        let sql = format!(
            "UPDATE {} SET {} WHERE {} = ?{}",
            self.spec.name,
            assignments.join(", "),
            self.spec.primary_key,
            fields.len() + 1
        );

        let params = fields
            .values()
            .map(to_sql)
            .chain(std::iter::once(rusqlite::types::Value::Integer(id)));
        let changed = self
            .db
            .connection()
            .execute(&sql, params_from_iter(params))?;
        debug!(table = %self.spec.name, id, changed, "updated row");
        Ok(())
    }

    /// Deletes the row with primary key `id`.
    pub fn delete(&self, id: i64) -> Result<()> {
        let sql = format!(
            "DELETE FROM {} WHERE {} = ?1",
            self.spec.name, self.spec.primary_key
        );
        let changed = self.db.connection().execute(&sql, [id])?;
        info!(table = %self.spec.name, id, changed, "deleted row");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, Value)]) -> Fields {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    /// Database with an extra test table and one active migration.
    fn setup() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.connection()
            .execute_batch(
                "CREATE TABLE test_table (
                    id INTEGER PRIMARY KEY,
                    name TEXT NOT NULL,
                    age INTEGER,
                    email TEXT,
                    migration_id INTEGER,
                    FOREIGN KEY (migration_id) REFERENCES migrations (id)
                );
                INSERT INTO migrations (name, old_root, new_root, is_active)
                VALUES ('Test Migration', '/old/root', '/new/root', 1);",
            )
            .unwrap();
        db
    }

    #[test]
    fn test_validate_columns_valid() {
        let db = setup();
        let store = RecordStore::new(&db, TableSpec::new("test_table")).unwrap();
        let f = fields(&[
            ("name", Value::from("John Doe")),
            ("age", Value::from(30)),
            ("email", Value::from("test@example.com")),
        ]);
        assert!(store.validate_columns(&f).is_ok());
    }

    #[test]
    fn test_validate_columns_lists_every_invalid_key() {
        let db = setup();
        let store = RecordStore::new(&db, TableSpec::new("test_table")).unwrap();
        let f = fields(&[
            ("name", Value::from("Alice")),
            ("invalid_column", Value::from("x")),
            ("another_bad", Value::from("y")),
        ]);

        match store.validate_columns(&f) {
            Err(StoreError::InvalidColumn { table, columns }) => {
                assert_eq!(table, "test_table");
                assert_eq!(columns, vec!["another_bad".to_string(), "invalid_column".to_string()]);
            }
            other => panic!("expected InvalidColumn, got {other:?}"),
        }
    }

    #[test]
    fn test_columns_are_memoized() {
        let db = setup();
        let store = RecordStore::new(&db, TableSpec::new("test_table")).unwrap();
        let first: *const BTreeSet<String> = store.columns().unwrap();
        let second: *const BTreeSet<String> = store.columns().unwrap();
        assert_eq!(first, second);
        assert!(store.columns().unwrap().contains("email"));
    }

    #[test]
    fn test_unknown_table() {
        let db = setup();
        let store = RecordStore::new(&db, TableSpec::new("missing")).unwrap();
        assert!(matches!(store.get_all(), Err(StoreError::Database(_))));
        assert!(matches!(
            store.validate_columns(&Fields::new()),
            Err(StoreError::UnknownTable(_))
        ));
    }

    #[test]
    fn test_new_rejects_bad_identifiers() {
        let db = setup();
        assert!(RecordStore::new(&db, TableSpec::new("bad name")).is_err());
        assert!(RecordStore::new(&db, TableSpec::new("ok").with_primary_key("")).is_err());
    }

    #[test]
    fn test_add_valid_data_stamps_migration() {
        let db = setup();
        let store = RecordStore::new(&db, TableSpec::new("test_table")).unwrap();
        store
            .add(fields(&[
                ("name", Value::from("John Doe")),
                ("age", Value::from(30)),
            ]))
            .unwrap();

        let rows = store.get_all().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].display("name"), "John Doe");
        assert_eq!(rows[0].get("age"), Some(&Value::Integer(30)));
        assert_eq!(rows[0].get("migration_id"), Some(&Value::Integer(1)));
    }

    #[test]
    fn test_add_invalid_data() {
        let db = setup();
        let store = RecordStore::new(&db, TableSpec::new("test_table")).unwrap();
        let result = store.add(fields(&[
            ("name", Value::from("John Doe")),
            ("invalid_column", Value::from("error")),
        ]));
        assert!(matches!(result, Err(StoreError::InvalidColumn { .. })));
        assert!(store.get_all().unwrap().is_empty());
    }

    #[test]
    fn test_add_without_active_migration() {
        let db = setup();
        db.connection()
            .execute("UPDATE migrations SET is_active = 0", [])
            .unwrap();
        let store = RecordStore::new(&db, TableSpec::new("test_table")).unwrap();

        let result = store.add(fields(&[("name", Value::from("Nobody"))]));
        assert!(matches!(result, Err(StoreError::NoActiveMigration)));
        assert!(store.get_all().unwrap().is_empty());
    }

    #[test]
    fn test_unscoped_add_ignores_active_migration() {
        let db = Database::open_in_memory().unwrap();
        let store = db.store(Table::Migrations).unwrap();
        store
            .add(fields(&[
                ("name", Value::from("M1")),
                ("old_root", Value::from("/old")),
                ("new_root", Value::from("/new")),
            ]))
            .unwrap();
        let rows = store.get_all().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("migration_id"), None);
        assert_eq!(rows[0].get("is_active"), Some(&Value::Integer(0)));
    }

    #[test]
    fn test_get_all() {
        let db = setup();
        let store = RecordStore::new(&db, TableSpec::new("test_table")).unwrap();
        store.add(fields(&[("name", Value::from("Alice"))])).unwrap();
        store.add(fields(&[("name", Value::from("Bob"))])).unwrap();
        let mut names: Vec<String> = store
            .get_all()
            .unwrap()
            .iter()
            .map(|r| r.display("name"))
            .collect();
        names.sort();
        assert_eq!(names, vec!["Alice", "Bob"]);
    }

    #[test]
    fn test_update_existing_record() {
        let db = setup();
        let store = RecordStore::new(&db, TableSpec::new("test_table")).unwrap();
        store
            .add(fields(&[("name", Value::from("Charlie")), ("age", Value::from(22))]))
            .unwrap();
        let id = store.get_all().unwrap()[0].id().unwrap();

        store
            .update(
                id,
                &fields(&[("name", Value::from("Charlie Updated")), ("age", Value::from(23))]),
            )
            .unwrap();

        let row = &store.get_all().unwrap()[0];
        assert_eq!(row.display("name"), "Charlie Updated");
        assert_eq!(row.get("age"), Some(&Value::Integer(23)));
    }

    #[test]
    fn test_update_invalid_column() {
        let db = setup();
        let store = RecordStore::new(&db, TableSpec::new("test_table")).unwrap();
        store.add(fields(&[("name", Value::from("David"))])).unwrap();
        let id = store.get_all().unwrap()[0].id().unwrap();
        let result = store.update(id, &fields(&[("invalid_column", Value::from("error"))]));
        assert!(matches!(result, Err(StoreError::InvalidColumn { .. })));
    }

    #[test]
    fn test_update_empty_fields() {
        let db = setup();
        let store = RecordStore::new(&db, TableSpec::new("test_table")).unwrap();
        assert!(matches!(
            store.update(1, &Fields::new()),
            Err(StoreError::EmptyUpdate(table)) if table == "test_table"
        ));
    }

    #[test]
    fn test_update_missing_id_is_noop() {
        let db = setup();
        let store = RecordStore::new(&db, TableSpec::new("test_table")).unwrap();
        store.add(fields(&[("name", Value::from("Eve"))])).unwrap();
        store
            .update(9999, &fields(&[("name", Value::from("Ghost"))]))
            .unwrap();
        let rows = store.get_all().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].display("name"), "Eve");
    }

    #[test]
    fn test_delete_existing_record() {
        let db = setup();
        let store = RecordStore::new(&db, TableSpec::new("test_table")).unwrap();
        store.add(fields(&[("name", Value::from("Eve"))])).unwrap();
        let id = store.get_all().unwrap()[0].id().unwrap();
        store.delete(id).unwrap();
        assert!(store.get_all().unwrap().is_empty());
    }

    #[test]
    fn test_delete_non_existing_record() {
        let db = setup();
        let store = RecordStore::new(&db, TableSpec::new("test_table")).unwrap();
        store.add(fields(&[("name", Value::from("Frank"))])).unwrap();
        store.delete(9999).unwrap();
        assert_eq!(store.get_all().unwrap().len(), 1);
    }

    #[test]
    fn test_custom_primary_key() {
        let db = Database::open_in_memory().unwrap();
        db.connection()
            .execute_batch("CREATE TABLE tags (tag_id INTEGER PRIMARY KEY, label TEXT)")
            .unwrap();
        let store = db
            .store(TableSpec::new("tags").with_primary_key("tag_id").unscoped())
            .unwrap();
        store.add(fields(&[("label", Value::from("urgent"))])).unwrap();
        let id = store.get_all().unwrap()[0]
            .get("tag_id")
            .and_then(Value::as_i64)
            .unwrap();

        store.update(id, &fields(&[("label", Value::from("later"))])).unwrap();
        assert_eq!(store.get_all().unwrap()[0].display("label"), "later");
        store.delete(id).unwrap();
        assert!(store.get_all().unwrap().is_empty());
    }
}
