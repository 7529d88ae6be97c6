//! Configuration file loading for the CLI
//!
//! This module handles finding and loading TOML configuration files
//! from various locations (explicit path, local directory, system directory).

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use dmnkit::{DmnError, config::AppConfig};

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<ConfigError> for DmnError {
    fn from(err: ConfigError) -> Self {
        DmnError::Io(std::io::Error::other(err.to_string()))
    }
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (dmnkit/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed or holds invalid metrics
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, DmnError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new("dmnkit/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "dmnkit", "dmnkit") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

/// Load configuration from a TOML file
///
/// # Errors
///
/// Returns error if:
/// - File doesn't exist
/// - File cannot be read
/// - TOML parsing fails
/// - A list metric is not positive
fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, DmnError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;
    let config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

    validate(&config)?;
    Ok(config)
}

fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    match config.dnd().non_positive_metric() {
        Some(metric) => Err(ConfigError::Validation(format!(
            "dnd.{metric} must be positive"
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::tempdir;

    #[test]
    fn test_load_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[dnd]\nitem_height = 40\n\n[marshaller]\nindent = 4\n").unwrap();

        let config = load_config(Some(&path)).unwrap();

        assert_eq!(config.dnd().item_height(), 40);
        assert_eq!(config.dnd().indentation_size(), 60);
        assert_eq!(config.marshaller().indent(), 4);
    }

    #[test]
    fn test_missing_explicit_file() {
        let dir = tempdir().unwrap();

        let result = load_config(Some(dir.path().join("absent.toml")));

        assert!(result.is_err());
    }

    #[test]
    fn test_non_positive_metrics_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[dnd]\nitem_height = 0\n").unwrap();

        let err = load_config(Some(&path)).unwrap_err();

        assert!(err.to_string().contains("item_height"));
    }

    #[test]
    fn test_negative_indentation_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[dnd]\nindentation_size = -1\n").unwrap();

        let err = load_config(Some(&path)).unwrap_err();

        assert!(err.to_string().contains("indentation_size"));
    }
}
