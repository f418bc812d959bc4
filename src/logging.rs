use std::fs::{self, OpenOptions};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a full filter directive, e.g. `tuck=debug`
pub const LOG_ENV: &str = "TUCK_LOG";

/// Where log lines go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    /// Append to a file. Used while the TUI owns the terminal.
    File(PathBuf),
}

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("invalid log filter {filter:?}: {source}")]
    Filter {
        filter: String,
        source: tracing_subscriber::filter::ParseError,
    },
    #[error("could not open log file {path}: {source}")]
    File { path: PathBuf, source: io::Error },
}

/// Level from `-v`/`-q` counts, falling back to the configured level
pub fn level_for(verbose: u8, quiet: u8, configured: &str) -> String {
    let level = match (verbose, quiet) {
        (_, q) if q >= 2 => "error",
        (_, 1) => "warn",
        (v, _) if v >= 2 => "trace",
        (1, _) => "debug",
        _ => configured,
    };
    level.to_string()
}

/// Install the global subscriber. `TUCK_LOG` wins over `default_filter`.
pub fn init(target: LogTarget, default_filter: &str) -> Result<(), LoggingError> {
    let filter = match EnvFilter::try_from_env(LOG_ENV) {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter).map_err(|e| LoggingError::Filter {
            filter: default_filter.to_string(),
            source: e,
        })?,
    };

    let result = match target {
        LogTarget::Stderr => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(io::stderr)
            .with_ansi(io::stderr().is_terminal())
            .try_init(),
        LogTarget::File(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|e| LoggingError::File {
                    path: path.clone(),
                    source: e,
                })?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|e| LoggingError::File {
                    path: path.clone(),
                    source: e,
                })?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init()
        }
    };

    if let Err(err) = result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }
    Ok(())
}
