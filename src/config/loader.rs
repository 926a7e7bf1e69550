//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::RelayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Read a TOML file into a config without validating it.
pub fn read_config(path: &Path) -> Result<RelayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Normalize and validate a fully assembled config.
///
/// Call this after every override has been applied.
pub fn finalize(mut config: RelayConfig) -> Result<RelayConfig, ConfigError> {
    let trimmed = config.upstream.base_url.trim_end_matches('/').len();
    config.upstream.base_url.truncate(trimmed);

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<RelayConfig, ConfigError> {
    finalize(read_config(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_valid_file() {
        let file = write_config(
            r#"
            [listener]
            port = 8080

            [upstream]
            base_url = "http://127.0.0.1:9000/mcp/"
            username = "svc"
            password = "pw"
            "#,
        );
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.listener.port, 8080);
        assert_eq!(config.upstream.base_url, "http://127.0.0.1:9000/mcp");
        assert_eq!(config.upstream.username, "svc");
        assert!(!config.upstream.uses_default_password());
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_parse_error() {
        let file = write_config("[upstream\nbase_url = ");
        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validation_error_lists_fields() {
        let file = write_config(
            r#"
            [upstream]
            base_url = "mcp"
            timeout_secs = 0
            "#,
        );
        let err = load_config(file.path()).unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Validation failed: "));
        assert!(message.contains("upstream.base_url"));
        assert!(message.contains("upstream.timeout_secs"));
    }

    #[test]
    fn test_finalize_trims_every_trailing_slash() {
        let mut config = RelayConfig::default();
        config.upstream.base_url = "https://relay.example.com/mcp//".into();
        let config = finalize(config).unwrap();
        assert_eq!(config.upstream.base_url, "https://relay.example.com/mcp");
    }
}
