//! Logging setup for the server and client binaries.
//!
//! Everything logs through the `log` facade; the binaries install
//! `env_logger` here. `RUST_LOG` overrides the configured level.

use log::LevelFilter;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Logger already initialized")]
    AlreadyInitialized,
}

/// Parse a level name, falling back to `Info` for anything unrecognized
pub fn parse_level(level: &str) -> LevelFilter {
    match level.to_ascii_uppercase().as_str() {
        "OFF" => LevelFilter::Off,
        "TRACE" => LevelFilter::Trace,
        "DEBUG" => LevelFilter::Debug,
        "INFO" => LevelFilter::Info,
        "WARN" => LevelFilter::Warn,
        "ERROR" => LevelFilter::Error,
        _ => LevelFilter::Info,
    }
}

/// Install the global logger with `default_level` unless `RUST_LOG` is set
pub fn init(default_level: &str) -> Result<(), LoggingError> {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(parse_level(default_level));
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder
        .try_init()
        .map_err(|_| LoggingError::AlreadyInitialized)
}
