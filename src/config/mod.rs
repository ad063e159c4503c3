//! Configuration module for sit.
//!
//! This module provides:
//! - Type-safe configuration structures
//! - Validation for all configuration values
//! - YAML config file loading and discovery
//! - CLI argument merging
//!
//! # Configuration File
//!
//! Place a `.sit.yaml` file in your project root (or any parent directory)
//! or `sit.yaml` in `~/.config/sit/`:
//!
//! ```yaml
//! output:
//!   model: spdx
//! conversion:
//!   policy: strict
//! merge:
//!   relationship: contains
//! ```
//!
//! CLI flags override file values.

pub mod file;
mod types;
mod validation;

// Re-export main types
pub use types::{
    AppConfig, AppConfigBuilder, ConversionConfig, ExportConfig, MergeConfig, OutputConfig,
};
pub use validation::{ConfigError, Validatable};

// Re-export file utilities
pub use file::{
    discover_config_file, generate_example_config, load_config_file, load_or_default,
    ConfigFileError,
};

/// Generate a JSON Schema for the `AppConfig` configuration format.
///
/// This schema documents all configuration options that can be set in
/// `.sit.yaml` config files.
pub fn generate_json_schema() -> serde_json::Result<String> {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema)
}
