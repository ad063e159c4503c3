//! Configuration validation for sit.
//!
//! Provides validation traits and implementations for all configuration types.

use super::types::{parse_relation, AppConfig, ExportConfig, MergeConfig};
use crate::model::RelationshipType;

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for crate::error::SitError {
    fn from(err: ConfigError) -> Self {
        Self::config(err.field, err.message)
    }
}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.merge.validate());
        errors.extend(self.export.validate());
        errors
    }
}

impl Validatable for MergeConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.target.as_deref().is_some_and(|t| t.trim().is_empty()) {
            errors.push(ConfigError {
                field: "merge.target".to_string(),
                message: "Target component ID must not be empty".to_string(),
            });
        }
        if let Some(ref namespace) = self.namespace {
            let valid = !namespace.is_empty()
                && namespace
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));
            if !valid {
                errors.push(ConfigError {
                    field: "merge.namespace".to_string(),
                    message: format!(
                        "Invalid namespace '{namespace}'. Use letters, digits, '.', '-' or '_'"
                    ),
                });
            }
        }
        errors
    }
}

impl Validatable for ExportConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        for kind in &self.relation_filter {
            if let RelationshipType::Other(name) = parse_relation(kind) {
                errors.push(ConfigError {
                    field: "export.relation_filter".to_string(),
                    message: format!("Unknown relationship kind '{name}'"),
                });
            }
        }
        errors
    }
}
