//! Tracing initialisation for the `odie` binary.
//!
//! Log lines go to a file so they never interleave with the interactive
//! screen. `RUST_LOG` takes precedence over the configured level.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Installs the global subscriber, appending to `log_file`.
///
/// Only the first call in a process takes effect.
///
/// # Errors
///
/// Returns an I/O error if the log directory or file cannot be created.
pub fn init(log_file: &Path, level: &str) -> std::io::Result<()> {
    if let Some(dir) = log_file.parent() {
        fs::create_dir_all(dir)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(log_file)?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .ok();

    tracing::info!(log_file = %log_file.display(), "logging initialised");
    Ok(())
}
