//! Logging initialization for the library core.

use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;

use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::{BiblioError, Result};

/// Parse log level string to tracing Level.
fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Install the global tracing subscriber described by the config.
///
/// Log lines go to stdout and to the configured log file. At most one
/// subscriber can be installed per process; a second call fails.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter =
        EnvFilter::from_default_env().add_directive(parse_level(&config.level).into());
    let writer = std::io::stdout.and(open_log_file(&config.file)?);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .with(filter)
        .try_init()
        .map_err(|e| BiblioError::Config(format!("logging already initialized: {e}")))
}

/// Create the log file, creating its parent directory if needed.
fn open_log_file(path: &str) -> Result<Arc<File>> {
    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| BiblioError::Config(format!("log directory: {e}")))?;
    }
    let file =
        File::create(path).map_err(|e| BiblioError::Config(format!("log file: {e}")))?;
    Ok(Arc::new(file))
}
