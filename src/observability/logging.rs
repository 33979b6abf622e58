//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the global tracing subscriber
//! - Pick the log filter from the environment or configuration
//! - Select the output format
//!
//! # Design Decisions
//! - `RUST_LOG` overrides the configured level when set
//! - Initialization is fallible so a bad filter is reported, not ignored

use tracing_subscriber::{
    filter::ParseError, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError,
    EnvFilter, Layer, Registry,
};

use crate::config::{LogFormat, ObservabilityConfig};

/// Error type for logging initialization.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("invalid log filter {filter:?}: {source}")]
    Filter {
        filter: String,
        #[source]
        source: ParseError,
    },

    #[error("failed to install log subscriber: {0}")]
    Init(#[from] TryInitError),
}

/// Build the filter: `RUST_LOG` if set, otherwise the configured level.
pub fn env_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(level).map_err(|source| LoggingError::Filter {
        filter: level.to_string(),
        source,
    })
}

/// Install the global subscriber.
pub fn init(config: &ObservabilityConfig) -> Result<(), LoggingError> {
    let filter = env_filter(&config.log_level)?;

    let fmt_layer: Box<dyn Layer<Registry> + Send + Sync> = match config.log_format {
        LogFormat::Full => tracing_subscriber::fmt::layer().boxed(),
        LogFormat::Compact => tracing_subscriber::fmt::layer().compact().boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer().pretty().boxed(),
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(filter)
        .try_init()?;

    Ok(())
}
