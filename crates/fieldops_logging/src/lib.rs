#![deny(missing_docs)]
//! Logging for the fieldops workspace.
//!
//! Library crates log through the `ops_*` macros; the binary picks a
//! destination once at startup with [`initialize`]. Tests call
//! [`initialize_for_tests`].

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

#[doc(hidden)]
pub use log as __log;

/// Default log file, relative to the working directory.
pub const LOG_FILENAME: &str = "fieldops.log";

/// Crates whose records stay out of our logs; the transport is summarized
/// by the client's own request lines.
const QUIET_TARGETS: [&str; 3] = ["hyper", "h2", "rustls"];

/// Logs at trace level.
#[macro_export]
macro_rules! ops_trace {
    ($($arg:tt)*) => { $crate::__log::trace!($($arg)*) };
}

/// Logs at debug level.
#[macro_export]
macro_rules! ops_debug {
    ($($arg:tt)*) => { $crate::__log::debug!($($arg)*) };
}

/// Logs at info level.
#[macro_export]
macro_rules! ops_info {
    ($($arg:tt)*) => { $crate::__log::info!($($arg)*) };
}

/// Logs at warn level.
#[macro_export]
macro_rules! ops_warn {
    ($($arg:tt)*) => { $crate::__log::warn!($($arg)*) };
}

/// Logs at error level.
#[macro_export]
macro_rules! ops_error {
    ($($arg:tt)*) => { $crate::__log::error!($($arg)*) };
}

/// Where log records go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogDestination {
    /// Append to the given file.
    File(PathBuf),
    /// Write to stderr, keeping stdout for command output.
    Terminal,
    /// Stderr plus the given file.
    Both(PathBuf),
}

impl LogDestination {
    /// File destination at [`LOG_FILENAME`] in the working directory.
    pub fn default_file() -> PathBuf {
        PathBuf::from(".").join(LOG_FILENAME)
    }
}

/// Installs the global logger. Later calls are ignored.
pub fn initialize(destination: LogDestination, level: LevelFilter) {
    let config = build_config();

    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    if matches!(destination, LogDestination::Terminal | LogDestination::Both(_)) {
        loggers.push(TermLogger::new(
            level,
            config.clone(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ));
    }
    if let LogDestination::File(path) | LogDestination::Both(path) = &destination {
        if let Some(file_logger) = open_file_logger(path, level, config) {
            loggers.push(file_logger);
        }
    }
    if loggers.is_empty() {
        return;
    }

    let _ = CombinedLogger::init(loggers);
}

/// Terminal logger for tests; a no-op once any logger is installed.
pub fn initialize_for_tests() {
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        build_config(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

fn build_config() -> Config {
    let mut builder = ConfigBuilder::new();
    builder
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error);
    for target in QUIET_TARGETS {
        builder.add_filter_ignore_str(target);
    }
    builder.build()
}

fn open_file_logger(
    path: &Path,
    level: LevelFilter,
    config: Config,
) -> Option<Box<WriteLogger<File>>> {
    match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: could not open log file {:?}: {}", path, err);
            None
        }
    }
}
