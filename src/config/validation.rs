//! Configuration validation.
//!
//! # Responsibilities
//! - Check that required settings are present (remote server, application
//!   id, listening host and port)
//! - Check that the remote server URI is an absolute http(s) URL
//! - Check that the entry point is a usable route
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a pure function: ProxyConfig → Result<RuntimeConfig, Vec<ValidationError>>
//! - Runs once, before the listener is bound

use crate::config::runtime::{ListenAddress, RoutingConfig, RuntimeConfig};
use crate::config::schema::ProxyConfig;
use crate::routing::entry::{EntryPoint, EntryPointError};

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("remote server URI is not defined in settings file (remote_server.uri)")]
    MissingRemoteServer,

    #[error("remote server URI {uri:?} is invalid: {reason}")]
    InvalidRemoteServer { uri: String, reason: String },

    #[error("application ID is not defined in settings file (application_id)")]
    MissingApplicationId,

    #[error("proxy server host is not defined in settings file (proxy_server.host)")]
    MissingHost,

    #[error("proxy server port is not defined in settings file (proxy_server.port)")]
    MissingPort,

    #[error("entry point {entry:?} is invalid: {source}")]
    InvalidEntryPoint {
        entry: String,
        #[source]
        source: EntryPointError,
    },
}

impl ProxyConfig {
    /// Run the configuration gate.
    pub fn validate(&self) -> Result<RuntimeConfig, Vec<ValidationError>> {
        let mut errors = Vec::new();

        let remote_base_url = match non_empty(self.remote_server.uri.as_deref()) {
            Some(uri) => match check_remote_uri(uri) {
                Ok(()) => Some(uri.to_string()),
                Err(reason) => {
                    errors.push(ValidationError::InvalidRemoteServer {
                        uri: uri.to_string(),
                        reason,
                    });
                    None
                }
            },
            None => {
                errors.push(ValidationError::MissingRemoteServer);
                None
            }
        };

        let application_id = non_empty(self.application_id.as_deref()).map(str::to_string);
        if application_id.is_none() {
            errors.push(ValidationError::MissingApplicationId);
        }

        let host = non_empty(self.proxy_server.host.as_deref()).map(str::to_string);
        if host.is_none() {
            errors.push(ValidationError::MissingHost);
        }
        if self.proxy_server.port.is_none() {
            errors.push(ValidationError::MissingPort);
        }

        let entry = self.entry_point.as_deref().unwrap_or("/");
        if let Err(source) = EntryPoint::parse(entry) {
            errors.push(ValidationError::InvalidEntryPoint {
                entry: entry.to_string(),
                source,
            });
        }

        match (remote_base_url, application_id, host, self.proxy_server.port) {
            (Some(remote_base_url), Some(application_id), Some(host), Some(port))
                if errors.is_empty() =>
            {
                Ok(RuntimeConfig {
                    routing: RoutingConfig {
                        remote_base_url,
                        application_id,
                        applications_root: self.applications_root.clone().unwrap_or_default(),
                        entry_point: entry.to_string(),
                    },
                    listen: ListenAddress { host, port },
                    timeouts: self.timeouts.clone(),
                    limits: self.limits.clone(),
                    observability: self.observability.clone(),
                })
            }
            _ => Err(errors),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn check_remote_uri(uri: &str) -> Result<(), String> {
    let parsed = url::Url::parse(uri).map_err(|e| e.to_string())?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(format!("unsupported scheme {other:?}")),
    }
    if parsed.host_str().is_none() {
        return Err("missing host".to_string());
    }
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err("must not carry a query or fragment".to_string());
    }
    Ok(())
}
