//! Configuration file loading and discovery.
//!
//! Supports loading configuration from YAML files with automatic discovery.

use super::types::AppConfig;
use super::validation::{ConfigError, Validatable};
use std::path::{Path, PathBuf};

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Standard config file names to search for.
pub const CONFIG_FILE_NAMES: &[&str] = &[".sit.yaml", ".sit.yml", "sit.yaml"];

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory, then each parent directory
/// 3. User config directory (~/.config/sit/)
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(path.to_path_buf());
    }

    if let Ok(cwd) = std::env::current_dir() {
        if let Some(path) = find_config_upwards(&cwd) {
            return Some(path);
        }
    }

    dirs::config_dir().and_then(|dir| find_config_in_dir(&dir.join("sit")))
}

/// Find a config file in `start` or the closest ancestor that has one.
fn find_config_upwards(start: &Path) -> Option<PathBuf> {
    start.ancestors().find_map(find_config_in_dir)
}

/// Find a config file in a specific directory.
fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Error type for config file operations.
#[derive(Debug)]
pub enum ConfigFileError {
    /// File not found
    NotFound(PathBuf),
    /// IO error reading file
    Io(std::io::Error),
    /// YAML parsing error
    Parse(serde_yaml::Error),
    /// The file parsed but holds invalid values
    Invalid(Vec<ConfigError>),
}

impl std::fmt::Display for ConfigFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => {
                write!(f, "Config file not found: {}", path.display())
            }
            Self::Io(e) => write!(f, "Failed to read config file: {e}"),
            Self::Parse(e) => write!(f, "Failed to parse config file: {e}"),
            Self::Invalid(errors) => {
                let listed: Vec<String> = errors.iter().map(ToString::to_string).collect();
                write!(f, "Invalid configuration: {}", listed.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotFound(_) | Self::Invalid(_) => None,
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigFileError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_yaml::Error> for ConfigFileError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Parse(err)
    }
}

/// Load and validate an `AppConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    // An empty file is a valid, all-defaults config
    if content.trim().is_empty() {
        return Ok(AppConfig::default());
    }
    let config: AppConfig = serde_yaml::from_str(&content)?;
    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigFileError::Invalid(errors));
    }
    Ok(config)
}

/// Load the explicit or discovered config file, or the defaults when there is none.
///
/// A file that exists but fails to load or validate is an error.
pub fn load_or_default(
    explicit_path: Option<&Path>,
) -> Result<(AppConfig, Option<PathBuf>), ConfigFileError> {
    match discover_config_file(explicit_path) {
        Some(path) => {
            let config = load_config_file(&path)?;
            tracing::debug!("Loaded config from {}", path.display());
            Ok((config, Some(path)))
        }
        None => Ok((AppConfig::default(), None)),
    }
}

/// Generate an example config file content.
#[must_use]
pub fn generate_example_config() -> String {
    format!(
        "# sit configuration\n# Place this file at .sit.yaml in your project root or ~/.config/sit/sit.yaml\n\n{}",
        serde_yaml::to_string(&AppConfig::default()).unwrap_or_default()
    )
}

// ============================================================================
// Tests
// ============================================================================
