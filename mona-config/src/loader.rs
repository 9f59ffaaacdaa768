//! Configuration file loading.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::schema::AppConfig;

/// Result alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file exists but could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Source [`std::io::Error`].
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid YAML or does not match the schema.
    #[error("invalid configuration YAML: {source}")]
    Yaml {
        /// Source [`serde_yaml::Error`].
        #[from]
        source: serde_yaml::Error,
    },
    /// A value is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Where a [`LoadedConfig`] came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Parsed from this file.
    File(PathBuf),
    /// The file was absent; built-in defaults apply.
    Defaults,
}

/// Configuration together with its origin.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// The effective configuration.
    pub config: AppConfig,
    /// Origin of the configuration.
    pub source: ConfigSource,
}

/// Loads configuration from `path`, falling back to defaults when the file
/// does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] when the file exists but cannot be read, and
/// [`ConfigError::Yaml`] or [`ConfigError::Invalid`] when its content is bad.
/// A malformed file is never silently replaced by defaults.
pub fn load_or_default(path: impl AsRef<Path>) -> ConfigResult<LoadedConfig> {
    let path = path.as_ref();
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            warn!(
                path = %path.display(),
                "configuration file not found, using built-in defaults"
            );
            return Ok(LoadedConfig {
                config: AppConfig::default(),
                source: ConfigSource::Defaults,
            });
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let config = AppConfig::from_yaml_str(&text)?;
    info!(path = %path.display(), model = %config.openai.model, "configuration loaded");
    Ok(LoadedConfig {
        config,
        source: ConfigSource::File(path.to_path_buf()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_path() -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("ai-config-{}.yaml", Uuid::new_v4()));
        path
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let loaded = load_or_default(temp_path()).unwrap();
        assert_eq!(loaded.source, ConfigSource::Defaults);
        assert_eq!(loaded.config, AppConfig::default());
    }

    #[test]
    fn reads_existing_file() {
        let path = temp_path();
        fs::write(&path, "openai:\n  model: gpt-4o\n").unwrap();

        let loaded = load_or_default(&path).unwrap();
        assert_eq!(loaded.source, ConfigSource::File(path.clone()));
        assert_eq!(loaded.config.openai.model, "gpt-4o");

        let _ = fs::remove_file(path);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let path = temp_path();
        fs::write(&path, "openai: [unterminated\n").unwrap();

        let err = load_or_default(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Yaml { .. }));

        let _ = fs::remove_file(path);
    }
}
