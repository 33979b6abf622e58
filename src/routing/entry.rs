//! Entry point route handling.
//!
//! # Responsibilities
//! - Normalise the configured entry point ("/", "/portal", "/portal/")
//! - Produce the axum route patterns to register
//! - Extract path info (the part after the entry point) from a request path
//!
//! # Design Decisions
//! - Prefix matching is segment aware: "/portal" does not match "/portalx"
//! - Path info is taken from the raw request path, still percent-encoded,
//!   so it can be concatenated into the upstream URL unchanged

/// Reason an entry point cannot be registered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntryPointError {
    #[error("must start with '/'")]
    MissingLeadingSlash,

    #[error("must not contain route syntax ('{{', '}}' or '*')")]
    RouteSyntax,
}

/// A validated entry point. `prefix` is empty for the root entry point and
/// otherwise starts with `/` and has no trailing `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPoint {
    prefix: String,
}

impl EntryPoint {
    pub fn parse(route: &str) -> Result<Self, EntryPointError> {
        if !route.starts_with('/') {
            return Err(EntryPointError::MissingLeadingSlash);
        }
        if route.contains(['{', '}', '*']) {
            return Err(EntryPointError::RouteSyntax);
        }
        Ok(Self {
            prefix: route.trim_end_matches('/').to_string(),
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Route patterns covering the entry point itself and everything below it.
    pub fn route_patterns(&self) -> Vec<String> {
        if self.prefix.is_empty() {
            vec!["/".to_string(), "/{*path_info}".to_string()]
        } else {
            vec![
                self.prefix.clone(),
                format!("{}/", self.prefix),
                format!("{}/{{*path_info}}", self.prefix),
            ]
        }
    }

    /// Path info for a request path, or `None` if the path is outside the
    /// entry point.
    pub fn path_info<'a>(&self, path: &'a str) -> Option<&'a str> {
        let rest = path.strip_prefix(self.prefix.as_str())?;
        if rest.is_empty() {
            return Some("");
        }
        rest.strip_prefix('/')
    }
}
