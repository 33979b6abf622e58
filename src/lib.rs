//! Reverse proxy for single-page applications hosted under a sub-path of a
//! remote application server.
//!
//! Application routes are forwarded under
//! `{remote}{applications_root}/{application_id}/...`, while static assets
//! and the framework's `_blazor` endpoints are forwarded to the remote root.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::{ProxyConfig, RoutingConfig, RuntimeConfig};
pub use http::ProxyServer;
pub use lifecycle::Shutdown;
pub use routing::{AppResolver, TargetResolver};
