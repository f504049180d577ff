//! Field value checks.
//!
//! Each check inspects one raw value entered at a prompt and reports the
//! first problem it finds. Checks are plain functions so they can be
//! composed into validators by the UI layer.
//!
//! # Examples
//!
//! ```
//! use odie_core::{ValidationError, absolute_path, non_empty};
//!
//! assert!(non_empty("Acme").is_ok());
//! assert_eq!(non_empty("  "), Err(ValidationError::Empty));
//! assert!(absolute_path("/srv/share").is_ok());
//! assert!(absolute_path("relative/dir").is_err());
//! ```

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// A single value check.
pub type Check = fn(&str) -> Result<(), ValidationError>;

/// Reasons a prompted value is not acceptable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Value is empty or whitespace-only.
    #[error("Value may not be empty.")]
    Empty,
    /// Value is not an absolute directory path.
    #[error("Invalid directory path: {0}")]
    NotAbsolutePath(String),
    /// Path is well-formed but no directory exists there.
    #[error("Directory does not exist: {0}")]
    MissingDirectory(String),
    /// Flag fields only accept `0` or `1`.
    #[error("Expected 0 or 1, got '{0}'.")]
    InvalidFlag(String),
}

static ABSOLUTE_PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/(?:[^/\x00]+/?)+$").expect("static regex must compile"));

/// Rejects empty and whitespace-only values.
pub fn non_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty);
    }
    Ok(())
}

/// Accepts absolute paths with at least one component, e.g. `/srv/share`.
pub fn absolute_path(value: &str) -> Result<(), ValidationError> {
    if !ABSOLUTE_PATH_RE.is_match(value) {
        return Err(ValidationError::NotAbsolutePath(value.to_string()));
    }
    Ok(())
}

/// Accepts paths that name an existing directory.
pub fn existing_directory(value: &str) -> Result<(), ValidationError> {
    if !Path::new(value).is_dir() {
        return Err(ValidationError::MissingDirectory(value.to_string()));
    }
    Ok(())
}

/// Accepts `0` or `1`.
pub fn flag(value: &str) -> Result<(), ValidationError> {
    match value.trim() {
        "0" | "1" => Ok(()),
        other => Err(ValidationError::InvalidFlag(other.to_string())),
    }
}
