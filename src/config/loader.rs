//! Configuration loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::ProxyConfig;
use crate::config::validation::ValidationError;

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Settings file syntax, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Toml,
}

impl Format {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Format::Toml,
            _ => Format::Json,
        }
    }
}

/// Read and deserialize the settings file. Validation is a separate step so
/// that command-line overrides can be applied first.
pub fn load_config(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content, Format::from_path(path), path)
}

/// Deserialize settings text in the given format.
pub fn parse_config(content: &str, format: Format, path: &Path) -> Result<ProxyConfig, ConfigError> {
    match format {
        Format::Json => serde_json::from_str(content).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        }),
        Format::Toml => toml::from_str(content).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(Format::from_path(Path::new("settings.json")), Format::Json);
        assert_eq!(Format::from_path(Path::new("proxy.TOML")), Format::Toml);
        assert_eq!(Format::from_path(Path::new("settings")), Format::Json);
    }

    #[test]
    fn test_parse_toml() {
        let config = parse_config(
            r#"
                application_id = "myapp"
                applications_root = "/apps"

                [remote_server]
                uri = "https://upstream.example"

                [proxy_server]
                host = "127.0.0.1"
                port = 5000
            "#,
            Format::Toml,
            Path::new("proxy.toml"),
        )
        .unwrap();
        assert_eq!(config.application_id.as_deref(), Some("myapp"));
        assert_eq!(config.proxy_server.port, Some(5000));
    }

    #[test]
    fn test_parse_error_names_file() {
        let err = parse_config("{ not json", Format::Json, Path::new("settings.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Json { .. }));
        assert!(err.to_string().contains("settings.json"));
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/spa-proxy/settings.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_from_disk() {
        let path = std::env::temp_dir().join(format!("spa-proxy-loader-{}.json", std::process::id()));
        fs::write(
            &path,
            r#"{ "remote_server": { "uri": "http://localhost:9000" }, "application_id": "a" }"#,
        )
        .unwrap();
        let config = load_config(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(config.remote_server.uri.as_deref(), Some("http://localhost:9000"));
    }

    #[test]
    fn test_validation_error_display() {
        let err = ConfigError::Validation(vec![
            ValidationError::MissingRemoteServer,
            ValidationError::MissingPort,
        ]);
        let message = err.to_string();
        assert!(message.contains("remote_server.uri"));
        assert!(message.contains("proxy_server.port"));
    }
}
