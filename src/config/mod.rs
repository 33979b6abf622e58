//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! settings file (JSON/TOML)
//!     → loader.rs (read & deserialize)
//!     → command-line overrides (host, port, log level)
//!     → validation.rs (required fields, URL and entry point checks)
//!     → RuntimeConfig (validated, immutable)
//!     → shared via Arc with the resolver and the server
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup; there is no reload
//! - Required fields are optional in the schema and enforced by validation
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod runtime;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use runtime::{ListenAddress, RoutingConfig, RuntimeConfig};
pub use schema::{
    LimitsConfig, ListenerConfig, LogFormat, ObservabilityConfig, ProxyConfig, RemoteServerConfig,
    TimeoutConfig,
};
pub use validation::ValidationError;
