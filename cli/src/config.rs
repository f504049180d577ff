//! User configuration.
//!
//! Read from a YAML file; every key is optional.
//!
//! # Example YAML
//!
//! ```yaml
//! database: /srv/odie/odie.db
//! page_size: 15
//! default_sites:
//!   - Head Office
//!   - Warehouse
//! log_level: debug
//! ```

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{CliError, Result};

const APP_DIR: &str = "odie";
const FALLBACK_DIR: &str = ".odie";

/// Site names offered by the "seed default sites" action.
pub const DEFAULT_SITES: [&str; 5] = [
    "Measure",
    "Dustin & Partners",
    "Dustin Engineers",
    "DB2",
    "Hotie Holdings",
];

/// Runtime settings for the terminal application.
///
/// # Examples
///
/// ```
/// # use odie_cli::config::Config;
/// let config: Config = serde_yaml::from_str("page_size: 5").unwrap();
/// assert_eq!(config.page_size, 5);
/// assert_eq!(config.log_level, "info");
/// assert!(config.database.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Database file; defaults to `odie.db` in the data directory.
    pub database: Option<PathBuf>,
    /// Rows shown per list page.
    pub page_size: usize,
    /// Names inserted by the seed action on an empty site list.
    pub default_sites: Vec<String>,
    /// Log filter used when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: None,
            page_size: 10,
            default_sites: DEFAULT_SITES.iter().map(|s| s.to_string()).collect(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Terminal`] if the file cannot be read,
    /// [`CliError::Yaml`] if parsing fails, or [`CliError::InvalidConfig`]
    /// if a value is out of range.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        let reader = BufReader::new(file);
        let config: Self = serde_yaml::from_reader(reader)?;
        config.validate()?;
        debug!(path = %path.as_ref().display(), "loaded configuration");
        Ok(config)
    }

    /// Loads `path` if given, else the default config file.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Self::load_or_create(Self::default_path()),
        }
    }

    /// Loads `path` when it exists; otherwise returns the built-in defaults
    /// and writes them to `path` for the user to edit.
    ///
    /// A file that cannot be written is logged and otherwise ignored.
    pub fn load_or_create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::load(path);
        }
        let config = Self::default();
        if let Err(err) = config.save(path) {
            warn!(path = %path.display(), error = %err, "could not write default configuration");
        }
        Ok(config)
    }

    /// Writes the configuration as YAML, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Terminal`] if the file cannot be written, or
    /// [`CliError::Yaml`] if serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        debug!(path = %path.display(), "saved configuration");
        Ok(())
    }

    /// Checks values serde cannot express constraints for.
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(CliError::InvalidConfig(
                "page_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Database file to open: the configured one or the default location.
    pub fn database_path(&self) -> PathBuf {
        self.database
            .clone()
            .unwrap_or_else(|| data_dir().join("odie.db"))
    }

    /// `config.yaml` in the data directory.
    pub fn default_path() -> PathBuf {
        data_dir().join("config.yaml")
    }
}

/// Per-user application directory, or `./.odie` when the platform has none.
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from(FALLBACK_DIR))
}
