//! Prompt validators.
//!
//! A [`Validator`] turns the pure checks from [`odie_core`] into a verdict
//! for the prompt loop. Recoverable validators get one chance to repair the
//! problem interactively, such as creating a missing directory.

use std::fs;
use std::io;

use odie_core::{Check, absolute_path, existing_directory, flag as flag_check, non_empty as non_empty_check};

use crate::term::Terminal;

/// Repairs a value that failed the fallback check. `Ok(true)` accepts it.
pub type Recovery = fn(&str, &mut dyn Terminal) -> io::Result<bool>;

/// Outcome of validating one entered value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    /// A plain check failed; ask for the field again.
    Retry,
    /// Recovery was declined or failed; abandon the prompt.
    Rejected,
}

/// How an entered value is judged.
#[derive(Clone)]
pub enum Validator {
    /// Accepts everything.
    Any,
    /// All checks must pass; a failure asks again.
    Checks(Vec<Check>),
    /// `checks` behave like [`Validator::Checks`]. A value that passes them
    /// but fails `fallback` is handed to `recover`.
    Recoverable {
        checks: Vec<Check>,
        fallback: Check,
        recover: Recovery,
    },
}

impl Validator {
    /// Judges `value`, printing the reason for any failure.
    pub fn validate(&self, value: &str, term: &mut dyn Terminal) -> io::Result<Verdict> {
        match self {
            Self::Any => Ok(Verdict::Accepted),
            Self::Checks(checks) => run_checks(checks, value, term),
            Self::Recoverable {
                checks,
                fallback,
                recover,
            } => {
                if run_checks(checks, value, term)? == Verdict::Retry {
                    return Ok(Verdict::Retry);
                }
                if fallback(value).is_ok() || recover(value, term)? {
                    Ok(Verdict::Accepted)
                } else {
                    Ok(Verdict::Rejected)
                }
            }
        }
    }
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Any => f.write_str("Any"),
            Self::Checks(checks) => write!(f, "Checks({})", checks.len()),
            Self::Recoverable { checks, .. } => write!(f, "Recoverable({})", checks.len()),
        }
    }
}

fn run_checks(checks: &[Check], value: &str, term: &mut dyn Terminal) -> io::Result<Verdict> {
    for check in checks {
        if let Err(err) = check(value) {
            term.error(&err.to_string())?;
            return Ok(Verdict::Retry);
        }
    }
    Ok(Verdict::Accepted)
}

/// Value must not be blank.
pub fn non_empty() -> Validator {
    Validator::Checks(vec![non_empty_check])
}

/// Value must be an absolute path to a directory, which the user may
/// choose to create when missing.
pub fn directory() -> Validator {
    Validator::Recoverable {
        checks: vec![non_empty_check, absolute_path],
        fallback: existing_directory,
        recover: create_directory,
    }
}

/// Value must be `0` or `1`.
pub fn flag() -> Validator {
    Validator::Checks(vec![flag_check])
}

fn create_directory(value: &str, term: &mut dyn Terminal) -> io::Result<bool> {
    if !term.confirm(&format!("Directory {value} was not found. Create it?"), true)? {
        return Ok(false);
    }
    match fs::create_dir_all(value) {
        Ok(()) => {
            tracing::info!(dir = value, "created directory");
            term.success(&format!("Directory {value} was created."))?;
            Ok(true)
        }
        Err(err) => {
            term.error(&format!("Failed to create {value}. {err}"))?;
            Ok(false)
        }
    }
}
