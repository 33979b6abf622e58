//! Validated, immutable runtime configuration.
//!
//! Produced once by [`ProxyConfig::validate`](crate::config::ProxyConfig::validate)
//! and shared read-only with the resolver and the server afterwards.

use std::time::Duration;

use crate::config::schema::{LimitsConfig, ObservabilityConfig, TimeoutConfig};

/// Parameters the target-URL resolution depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingConfig {
    /// Scheme, host and optional port of the upstream server.
    pub remote_base_url: String,
    /// Segment inserted into upstream paths for application routes.
    pub application_id: String,
    /// Upstream prefix under which applications live. May be empty.
    pub applications_root: String,
    /// Local route the proxy listens on.
    pub entry_point: String,
}

/// Address the listener binds to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenAddress {
    pub host: String,
    pub port: u16,
}

impl std::fmt::Display for ListenAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Everything the proxy needs after the configuration gate has passed.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub routing: RoutingConfig,
    pub listen: ListenAddress,
    pub timeouts: TimeoutConfig,
    pub limits: LimitsConfig,
    pub observability: ObservabilityConfig,
}

impl TimeoutConfig {
    pub fn connect(&self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }

    pub fn request(&self) -> Option<Duration> {
        self.request_secs.map(Duration::from_secs)
    }

    pub fn pool_idle(&self) -> Duration {
        Duration::from_secs(self.pool_idle_secs)
    }
}
