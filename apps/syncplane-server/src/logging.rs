//! Logging setup using tracing.
//!
//! Production deployments log one JSON object per event; `LOG_FORMAT=pretty`
//! switches to human-readable lines for local work. Request spans come from
//! the `TraceLayer` in the router, so every event inside a handler carries
//! the method and path of its request.

use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

impl LogFormat {
    /// Parse from the `LOG_FORMAT` environment variable value.
    pub fn from_env_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "pretty" | "text" => Some(Self::Pretty),
            _ => None,
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Pretty => write!(f, "pretty"),
        }
    }
}

/// Logging setup errors.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter '{directive}': {message}")]
    InvalidFilter { directive: String, message: String },

    #[error("a global subscriber is already installed")]
    AlreadyInitialized,
}

/// Build the event filter. `RUST_LOG` in the environment wins over `default`.
pub fn build_filter(default: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(default).map_err(|e| LoggingError::InvalidFilter {
            directive: default.to_string(),
            message: e.to_string(),
        })
    })
}

/// Install the global subscriber.
///
/// # Errors
///
/// Returns `LoggingError` if the filter does not parse or a subscriber is
/// already installed.
pub fn init_logging(filter: &str, format: LogFormat) -> Result<(), LoggingError> {
    let filter_layer = build_filter(filter)?;
    let registry = tracing_subscriber::registry().with(filter_layer);

    let installed = match format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_current_span(true)
                    .flatten_event(true),
            )
            .try_init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().with_target(true).compact())
            .try_init(),
    };
    installed.map_err(|_| LoggingError::AlreadyInitialized)?;

    tracing::info!(filter = %filter, format = %format, "Logging initialized");
    Ok(())
}

/// Initialize logging for tests (with simpler output).
#[cfg(test)]
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("debug")
        .try_init();
}
