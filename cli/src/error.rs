//! Error types for the interactive front end.

use odie_sqlite::StoreError;
use thiserror::Error;

/// Errors raised while configuring or driving the terminal screens.
#[derive(Debug, Error)]
pub enum CliError {
    /// A storage operation failed.
    #[error("{0}")]
    Store(#[from] StoreError),

    /// Terminal or file I/O failed.
    #[error("I/O error: {0}")]
    Terminal(#[from] std::io::Error),

    /// The configuration file could not be parsed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The configuration parsed but holds an unusable value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A row index was not a number between 1 and `count`.
    #[error("invalid selection '{input}': enter a number between 1 and {count}")]
    InvalidSelection { input: String, count: usize },
}

impl CliError {
    /// Whether a screen may report this error and carry on.
    ///
    /// Terminal and configuration failures end the session.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Store(_) | Self::InvalidSelection { .. })
    }
}

/// Convenience alias for results with [`CliError`].
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_are_recoverable() {
        let err = CliError::from(StoreError::NoActiveMigration);
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("no active migration"));
    }

    #[test]
    fn test_terminal_errors_are_fatal() {
        let err = CliError::from(std::io::Error::from(std::io::ErrorKind::UnexpectedEof));
        assert!(!err.is_recoverable());
        assert!(!CliError::InvalidConfig("page_size".into()).is_recoverable());
    }

    #[test]
    fn test_invalid_selection_message() {
        let err = CliError::InvalidSelection {
            input: "9".into(),
            count: 3,
        };
        assert!(err.is_recoverable());
        assert_eq!(
            err.to_string(),
            "invalid selection '9': enter a number between 1 and 3"
        );
    }
}
