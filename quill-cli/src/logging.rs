//! Setup routine for logging to the standard error.

use clap::ValueEnum;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::prelude::*;

/// Logging levels accepted on the command line.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoggingLevel {
    Critical,
    Debug,
    Error,
    Info,
    Warning,
}

impl From<LoggingLevel> for LevelFilter {
    fn from(level: LoggingLevel) -> Self {
        match level {
            // `tracing` has no level above errors.
            LoggingLevel::Critical | LoggingLevel::Error => LevelFilter::ERROR,
            LoggingLevel::Debug => LevelFilter::DEBUG,
            LoggingLevel::Info => LevelFilter::INFO,
            LoggingLevel::Warning => LevelFilter::WARN,
        }
    }
}

/// Log events at `level` and above to the standard error, as `time LEVEL message`.
pub fn setup_logging(level: LoggingLevel) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(LevelFilter::from(level)),
        )
        .init();
}
