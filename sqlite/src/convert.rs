//! Conversion between [`odie_core`] values and rusqlite values.

use odie_core::{Record, Value};
use rusqlite::Row;
use rusqlite::types::{Value as SqlValue, ValueRef};

/// Converts a core [`Value`] into an owned rusqlite parameter.
pub(crate) fn to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Integer(n) => SqlValue::Integer(*n),
        Value::Real(r) => SqlValue::Real(*r),
        Value::Text(s) => SqlValue::Text(s.clone()),
    }
}

/// Converts a borrowed SQLite cell into a core [`Value`].
///
/// Blobs and non-UTF-8 text are decoded lossily.
pub(crate) fn from_sql(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(n) => Value::Integer(n),
        ValueRef::Real(r) => Value::Real(r),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Value::Text(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

/// Builds a [`Record`] from a row, pairing cells with `columns` by index.
pub(crate) fn row_to_record(row: &Row<'_>, columns: &[String]) -> rusqlite::Result<Record> {
    let mut record = Record::new();
    for (index, column) in columns.iter().enumerate() {
        record.set(column.clone(), from_sql(row.get_ref(index)?));
    }
    Ok(record)
}
