//! Target URL resolution.
//!
//! # Responsibilities
//! - Turn a request's path info and query into the upstream URL
//!
//! # Design Decisions
//! - Pure string concatenation: no percent-encoding or normalisation
//! - Exactly one trailing `/` is trimmed before the query is appended
//! - Immutable after construction (thread-safe without locks)

use std::fmt;

use crate::config::RoutingConfig;
use crate::routing::classifier::{classify, Resolution};

/// Computes the upstream URL for a request. Held by the HTTP layer as a
/// trait object so it can be swapped out in tests.
pub trait TargetResolver: Send + Sync + fmt::Debug {
    fn resolve_target_url(&self, path_info: &str, query: &str) -> String;
}

/// Resolver for a single application hosted on the remote server.
#[derive(Debug, Clone)]
pub struct AppResolver {
    config: RoutingConfig,
}

impl AppResolver {
    pub fn new(config: RoutingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }
}

impl TargetResolver for AppResolver {
    fn resolve_target_url(&self, path_info: &str, query: &str) -> String {
        build_target_url(&self.config, path_info, query, classify(path_info))
    }
}

/// Build the upstream URL for an already classified path.
pub fn build_target_url(
    config: &RoutingConfig,
    path_info: &str,
    query: &str,
    resolution: Resolution,
) -> String {
    let mut target = match resolution {
        Resolution::Root => format!("{}/{}", config.remote_base_url, path_info),
        Resolution::Application => format!(
            "{}{}/{}/{}",
            config.remote_base_url, config.applications_root, config.application_id, path_info
        ),
    };

    if target.len() > 1 && target.ends_with('/') {
        target.pop();
    }

    if !query.is_empty() {
        target.push('?');
        target.push_str(query);
    }

    target
}
