//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path + query
//!     → entry.rs (strip entry point, extract path info)
//!     → classifier.rs (root-resolved or application-resolved)
//!     → resolver.rs (build upstream URL)
//!     → Return: target URL string
//! ```
//!
//! # Design Decisions
//! - Routing parameters fixed at startup, immutable at runtime
//! - No regex in hot path
//! - Deterministic: same input always yields the same URL
//! - Resolution cannot fail; any string input gives a URL

pub mod classifier;
pub mod entry;
pub mod resolver;

pub use classifier::{classify, is_root_resolved, Resolution};
pub use entry::EntryPoint;
pub use resolver::{AppResolver, TargetResolver};
