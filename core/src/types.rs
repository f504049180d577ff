//! Record type definitions shared by the store and the interactive UI.
//!
//! Rows travel between SQLite and the screens as loosely typed
//! [`Record`]s: an ordered list of column names and [`Value`]s. Writes take
//! a [`Fields`] map, keyed by column name.

use std::collections::BTreeMap;
use std::fmt;

/// Column values submitted to an insert or update, keyed by column name.
///
/// A `BTreeMap` keeps the column order deterministic, which in turn keeps
/// the generated SQL and error messages stable.
pub type Fields = BTreeMap<String, Value>;

/// A single SQLite cell value.
///
/// Blobs are not stored by any table in this application; the store maps
/// them to lossy UTF-8 text when reading.
///
/// # Examples
///
/// ```
/// use odie_core::Value;
///
/// assert_eq!(Value::from("Acme").to_string(), "Acme");
/// assert_eq!(Value::from(7).as_i64(), Some(7));
/// assert_eq!(Value::Null.to_string(), "");
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// SQL `NULL`.
    #[default]
    Null,
    /// 64-bit signed integer.
    Integer(i64),
    /// Floating point number.
    Real(f64),
    /// UTF-8 text.
    Text(String),
}

impl Value {
    /// Returns the integer payload, parsing text that holds an integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            Value::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Returns the text payload, if this is a text value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Interprets the value as a boolean flag (`0`/`NULL` are false).
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Integer(n) => *n != 0,
            Value::Real(f) => *f != 0.0,
            Value::Text(s) => !matches!(s.trim(), "" | "0"),
        }
    }

    /// Compares two values by their rendered form.
    ///
    /// Prompted values are always text while stored values carry SQLite's
    /// column affinity, so `Integer(1)` and `Text("1")` must compare equal
    /// when deciding whether an edit changed anything.
    pub fn same_as(&self, other: &Value) -> bool {
        self.to_string() == other.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Integer(n) => write!(f, "{n}"),
            Value::Real(r) => write!(f, "{r}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Integer(value as i64)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

/// A row loaded from storage, preserving the table's column order.
///
/// # Examples
///
/// ```
/// use odie_core::{Record, Value};
///
/// let record = Record::new()
///     .with("id", 3)
///     .with("name", "HQ");
/// assert_eq!(record.id(), Some(3));
/// assert_eq!(record.display("name"), "HQ");
/// assert_eq!(record.get("missing"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    entries: Vec<(String, Value)>,
}

impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style variant of [`set`](Self::set).
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(column, value);
        self
    }

    /// Sets a column, replacing any existing value for it.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        let column = column.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(name, _)| *name == column) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// The `id` column as an integer.
    pub fn id(&self) -> Option<i64> {
        self.get("id").and_then(Value::as_i64)
    }

    /// Rendered value of a column; missing columns render as `N/A`.
    pub fn display(&self, column: &str) -> String {
        self.get(column)
            .map(Value::to_string)
            .unwrap_or_else(|| "N/A".to_string())
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (column, value) in iter {
            record.set(column, value);
        }
        record
    }
}
