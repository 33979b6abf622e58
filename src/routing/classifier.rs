//! Path classification.
//!
//! # Responsibilities
//! - Decide whether a request path is served from the upstream root
//!   (framework endpoints, static assets) or from the application namespace
//!
//! # Design Decisions
//! - Plain string inspection, no regex
//! - Extension rule mirrors `\.[a-zA-Z0-9]+$` exactly: ASCII alphanumerics
//!   only, nothing after them

/// Prefix of the framework's real-time endpoint, always served from the root.
pub const FRAMEWORK_PREFIX: &str = "_blazor";

/// Where a request path lives on the upstream server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Forwarded directly under the upstream root.
    Root,
    /// Forwarded under the application namespace.
    Application,
}

/// Classify a path. First match wins: framework prefix, then file extension.
pub fn classify(path_info: &str) -> Resolution {
    if path_info.starts_with(FRAMEWORK_PREFIX) || has_file_extension(path_info) {
        Resolution::Root
    } else {
        Resolution::Application
    }
}

pub fn is_root_resolved(path_info: &str) -> bool {
    classify(path_info) == Resolution::Root
}

/// True when the path ends in `.` followed by one or more ASCII alphanumerics.
pub fn has_file_extension(path_info: &str) -> bool {
    match path_info.rfind('.') {
        Some(dot) => {
            let ext = &path_info[dot + 1..];
            !ext.is_empty() && ext.bytes().all(|b| b.is_ascii_alphanumeric())
        }
        None => false,
    }
}
