//! Startup orchestration.
//!
//! # Responsibilities
//! - Load configuration and apply command-line overrides
//! - Initialize logging
//! - Run the configuration gate
//! - Build the server, bind the listener and serve until shutdown
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal and nothing is left running
//! - The listener is bound only after the configuration gate has passed

use std::path::PathBuf;

use tokio::net::TcpListener;

use crate::config::{load_config, ConfigError, ProxyConfig};
use crate::http::{ProxyServer, ServerError};
use crate::lifecycle::Shutdown;
use crate::observability::logging::{self, LoggingError};

/// Error type for startup. Every variant aborts the process.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Logging(#[from] LoggingError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Server(#[from] ServerError),
}

/// Values supplied on the command line. `None` keeps the settings file value.
#[derive(Debug, Clone, Default)]
pub struct StartupOptions {
    pub config_path: PathBuf,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
}

impl StartupOptions {
    /// Apply the overrides on top of the loaded settings.
    pub fn apply(&self, config: &mut ProxyConfig) {
        if let Some(host) = &self.host {
            config.proxy_server.host = Some(host.clone());
        }
        if let Some(port) = self.port {
            config.proxy_server.port = Some(port);
        }
        if let Some(level) = &self.log_level {
            config.observability.log_level = level.clone();
        }
    }
}

/// Start the proxy and serve until a termination signal arrives.
pub async fn run(options: StartupOptions) -> Result<(), StartupError> {
    let mut config = load_config(&options.config_path)?;
    options.apply(&mut config);

    logging::init(&config.observability)?;
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %options.config_path.display(),
        "spa-proxy starting"
    );

    let runtime = config.validate().map_err(|errors| {
        for error in &errors {
            tracing::error!(%error, "Invalid configuration");
        }
        ConfigError::Validation(errors)
    })?;

    tracing::info!(
        remote_server = %runtime.routing.remote_base_url,
        application_id = %runtime.routing.application_id,
        applications_root = %runtime.routing.applications_root,
        "Configuration loaded"
    );

    let server = ProxyServer::new(runtime.clone())?;

    let address = runtime.listen.to_string();
    let listener = TcpListener::bind((runtime.listen.host.as_str(), runtime.listen.port))
        .await
        .map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    shutdown.trigger_on_signal();

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
