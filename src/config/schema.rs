//! Configuration schema definitions.
//!
//! This module defines the settings file layout consumed by the proxy.
//! All types derive Serde traits for deserialization from config files.
//! Required fields are `Option`s here so that their absence can be
//! reported by validation with a descriptive error instead of a serde
//! parse failure.

use serde::{Deserialize, Serialize};

/// Root configuration for the proxy, as read from the settings file.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Upstream application server.
    pub remote_server: RemoteServerConfig,

    /// Identifier segment inserted into upstream paths for application routes.
    pub application_id: Option<String>,

    /// Upstream path prefix under which applications are hosted (e.g. "/apps").
    /// Absent or null means applications sit directly under the upstream root.
    pub applications_root: Option<String>,

    /// Local route this proxy listens on. Defaults to "/".
    pub entry_point: Option<String>,

    /// Listening socket.
    pub proxy_server: ListenerConfig,

    /// Upstream client timeouts.
    pub timeouts: TimeoutConfig,

    /// Request size limits.
    pub limits: LimitsConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,
}

/// Upstream server settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RemoteServerConfig {
    /// Scheme, host and optional port of the upstream (e.g. "https://upstream.example").
    pub uri: Option<String>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ListenerConfig {
    /// Host or IP address to bind.
    pub host: Option<String>,

    /// TCP port to bind.
    pub port: Option<u16>,
}

/// Timeout configuration for upstream requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Total upstream request timeout in seconds. Unset means no limit,
    /// which long-lived streaming responses need.
    pub request_secs: Option<u64>,

    /// How long idle pooled upstream connections are kept, in seconds.
    pub pool_idle_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 10,
            request_secs: None,
            pool_idle_secs: 90,
        }
    }
}

/// Request size limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Largest request body forwarded upstream, in bytes.
    pub max_request_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_request_body_bytes: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log filter (trace, debug, info, warn, error, or a full directive).
    pub log_level: String,

    /// Log line format.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Full,
        }
    }
}

/// Output format of the `fmt` log layer.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
    Pretty,
}
