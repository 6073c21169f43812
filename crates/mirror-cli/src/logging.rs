//! Tracing setup for the binary
//!
//! Every event goes to the console and, without ANSI colors, to a log file
//! opened in append mode.

use std::fs::OpenOptions;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::error::{CliError, Result};

/// `dirmirror_YYYYMMDD.log` in the working directory, dated today.
pub fn default_log_path() -> PathBuf {
    PathBuf::from(format!(
        "dirmirror_{}.log",
        chrono::Local::now().format("%Y%m%d")
    ))
}

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over the level picked by `verbose`. With
/// `console_to_stderr` the console layer writes to stderr so stdout stays
/// free for machine-readable output.
pub fn init(log_path: &Path, verbose: bool, console_to_stderr: bool) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .map_err(|source| CliError::LogFile {
            path: log_path.to_path_buf(),
            source,
        })?;

    let default_level = if verbose { "debug" } else { "info" };
    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| CliError::Logging(e.to_string()))?;

    let (console, ansi) = if console_to_stderr {
        (BoxMakeWriter::new(std::io::stderr), std::io::stderr().is_terminal())
    } else {
        (BoxMakeWriter::new(std::io::stdout), std::io::stdout().is_terminal())
    };
    let console_layer = fmt::layer()
        .with_writer(console)
        .with_ansi(ansi)
        .with_target(verbose)
        .compact();

    let file_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| CliError::Logging(e.to_string()))?;

    Ok(())
}
