//! Structured logging initialisation.
//!
//! The filter level can be overridden at runtime via the `RUST_LOG`
//! environment variable. When `RUST_LOG` is not set, the caller-supplied
//! `level` string is used (e.g. `"info"`, `"debug,verix=trace"`).

use serde::{Deserialize, Serialize};
use tracing::Subscriber;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Selects the output format for structured logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines for local development.
    #[default]
    Human,
    /// Newline-delimited JSON for log aggregation.
    Json,
}

/// Builds the subscriber for `format`, filtered by `filter`.
pub fn subscriber(format: LogFormat, filter: EnvFilter) -> Box<dyn Subscriber + Send + Sync> {
    match format {
        LogFormat::Human => Box::new(
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_target(true)),
        ),
        LogFormat::Json => Box::new(
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_target(true)),
        ),
    }
}

/// Installs the global tracing subscriber.
///
/// # Errors
/// Returns `TryInitError` if a global subscriber is already set.
pub fn init_logging(format: LogFormat, level: &str) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    subscriber(format, filter).try_init()
}
