//! Field descriptions driving create and edit prompts.

use odie_core::Table;

use crate::validators::{self, Validator};

/// One prompted column.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub validator: Validator,
    pub default: Option<String>,
    /// Relative entries are joined onto the default.
    pub is_path: bool,
    /// Value is picked from this table instead of typed.
    pub selection: Option<Table>,
}

impl FieldSpec {
    /// A free-text field with no checks.
    pub fn text(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            validator: Validator::Any,
            default: None,
            is_path: false,
            selection: None,
        }
    }

    /// A free-text field that may not be blank.
    pub fn required(key: &'static str, label: &'static str) -> Self {
        Self::text(key, label).with_validator(validators::non_empty())
    }

    /// A directory path, created on request when missing.
    pub fn directory(key: &'static str, label: &'static str) -> Self {
        Self {
            is_path: true,
            ..Self::text(key, label).with_validator(validators::directory())
        }
    }

    /// A foreign key chosen from `table`.
    pub fn select(key: &'static str, label: &'static str, table: Table) -> Self {
        Self {
            selection: Some(table),
            ..Self::text(key, label)
        }
    }

    /// A `0`/`1` flag.
    pub fn flag(key: &'static str, label: &'static str) -> Self {
        Self::text(key, label)
            .with_validator(validators::flag())
            .with_default("0")
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// Ordered fields of one entity.
pub type FieldSchema = Vec<FieldSpec>;
