//! Logging setup for hosts embedding the location manager
//!
//! The library only emits `tracing` events. Hosts that have no subscriber of
//! their own can install one here.

use tracing_subscriber::{fmt, EnvFilter, Registry};

const MODE_VAR: &str = "ASYNC_LOCATION_LOG_MODE";
const LEVEL_VAR: &str = "ASYNC_LOCATION_LOG_LEVEL";

/// Logging mode for different use cases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggingMode {
    /// No subscriber is installed
    Silent,
    /// Compact stderr output
    Development,
    /// Verbose output with thread ids and source locations
    Debug,
    /// One JSON object per line, for log collectors
    Structured,
}

impl LoggingMode {
    fn from_env_value(value: &str) -> Self {
        match value {
            "development" => LoggingMode::Development,
            "debug" => LoggingMode::Debug,
            "structured" | "json" => LoggingMode::Structured,
            _ => LoggingMode::Silent,
        }
    }
}

/// Logging configuration error
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to initialize tracing subscriber: {0}")]
    TracingInit(String),
}

/// Install a global subscriber for `mode`
///
/// Call once, early. A second call fails with [`LoggingError::TracingInit`].
///
/// # Environment Variables
///
/// - `ASYNC_LOCATION_LOG_LEVEL`: filter directive, e.g. `location_proxy=trace`
/// - `RUST_LOG`: used when the above is unset
pub fn init_logging(mode: LoggingMode) -> Result<(), LoggingError> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let result = match mode {
        LoggingMode::Silent => return Ok(()),
        LoggingMode::Development => Registry::default()
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_file(false)
                    .with_line_number(false)
                    .compact(),
            )
            .with(env_filter("info"))
            .try_init(),
        LoggingMode::Debug => Registry::default()
            .with(
                fmt::layer()
                    .pretty()
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(env_filter("debug"))
            .try_init(),
        LoggingMode::Structured => Registry::default()
            .with(fmt::layer().json().with_current_span(false))
            .with(env_filter("info"))
            .try_init(),
    };

    result.map_err(|e| LoggingError::TracingInit(e.to_string()))
}

/// Initialize logging from `ASYNC_LOCATION_LOG_MODE`
///
/// Accepts "development", "debug" and "structured". Anything else, including
/// an unset variable, means [`LoggingMode::Silent`].
pub fn init_logging_from_env() -> Result<(), LoggingError> {
    let mode = std::env::var(MODE_VAR)
        .map(|value| LoggingMode::from_env_value(&value))
        .unwrap_or(LoggingMode::Silent);

    init_logging(mode)
}

fn env_filter(default_level: &str) -> EnvFilter {
    if let Ok(level) = std::env::var(LEVEL_VAR) {
        EnvFilter::new(level)
    } else if let Ok(rust_log) = std::env::var("RUST_LOG") {
        EnvFilter::new(rust_log)
    } else {
        EnvFilter::new(default_level)
    }
}

/// Check if a global subscriber has been installed
pub fn is_initialized() -> bool {
    tracing::dispatcher::has_been_set()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_mode() {
        assert!(init_logging(LoggingMode::Silent).is_ok());
    }

    #[test]
    fn test_mode_from_env_value() {
        assert_eq!(LoggingMode::from_env_value("debug"), LoggingMode::Debug);
        assert_eq!(LoggingMode::from_env_value("json"), LoggingMode::Structured);
        assert_eq!(LoggingMode::from_env_value("verbose"), LoggingMode::Silent);
    }
}
