//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields
//!     → request spans from tower-http's TraceLayer
//!
//! Consumers:
//!     → logging.rs (fmt layer on stdout, filtered by EnvFilter)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every request span and upstream call
//! - Filter comes from `RUST_LOG` first, then configuration

pub mod logging;
