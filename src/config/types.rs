//! Configuration types for sit operations.

use crate::export::ExportOptions;
use crate::formats::{EncodeOptions, LossPolicy};
use crate::merge::{MergeOptions, MergeRelationship};
use crate::model::{ComponentId, RelationshipType, SbomFormat};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Unified application configuration that can be loaded from CLI args or config files.
///
/// Every section has defaults, so a config file only needs the keys it
/// changes. CLI flags are applied on top by the binary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Output encoding
    pub output: OutputConfig,
    /// Lossy-mapping behaviour
    pub conversion: ConversionConfig,
    /// Merge defaults
    pub merge: MergeConfig,
    /// Export defaults
    pub export: ExportConfig,
}

impl AppConfig {
    /// Create a new `AppConfig` with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an `AppConfig` builder.
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Encoder options derived from the output and conversion sections
    #[must_use]
    pub fn encode_options(&self) -> EncodeOptions {
        EncodeOptions {
            policy: self.conversion.policy,
            pretty: self.output.pretty,
        }
    }

    #[must_use]
    pub fn merge_options(&self) -> MergeOptions {
        MergeOptions {
            relationship: self.merge.relationship,
            target: self.merge.target.as_deref().map(ComponentId::new),
            namespace: self.merge.namespace.clone(),
        }
    }

    #[must_use]
    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            relation_filter: self
                .export
                .relation_filter
                .iter()
                .map(|kind| parse_relation(kind))
                .collect(),
            max_depth: self.export.max_depth,
        }
    }
}

/// Relationship kind from its config/CLI spelling (`depends-on`, `DEPENDS_ON`)
pub(crate) fn parse_relation(value: &str) -> RelationshipType {
    value.trim().parse().unwrap_or_else(|e: Infallible| match e {})
}

// ============================================================================
// Builder for AppConfig
// ============================================================================

/// Builder for constructing `AppConfig` with fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    pub const fn model(mut self, model: SbomFormat) -> Self {
        self.config.output.model = model;
        self
    }

    pub const fn pretty(mut self, pretty: bool) -> Self {
        self.config.output.pretty = pretty;
        self
    }

    /// Fail on any lossy mapping instead of warning.
    pub const fn strict(mut self, strict: bool) -> Self {
        self.config.conversion.policy = if strict {
            LossPolicy::Strict
        } else {
            LossPolicy::Warn
        };
        self
    }

    pub const fn merge_relationship(mut self, relationship: MergeRelationship) -> Self {
        self.config.merge.relationship = relationship;
        self
    }

    pub fn merge_target(mut self, target: impl Into<String>) -> Self {
        self.config.merge.target = Some(target.into());
        self
    }

    pub fn merge_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.config.merge.namespace = Some(namespace.into());
        self
    }

    pub fn relation_filter<I, S>(mut self, kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.export.relation_filter = kinds.into_iter().map(Into::into).collect();
        self
    }

    pub const fn max_depth(mut self, depth: usize) -> Self {
        self.config.export.max_depth = Some(depth);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> AppConfig {
        self.config
    }
}

// ============================================================================
// Section Configurations
// ============================================================================

/// Output encoding settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format: middleware, spdx, cyclonedx, ossbom
    pub model: SbomFormat,
    /// Pretty-print JSON output
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            model: SbomFormat::Middleware,
            pretty: true,
        }
    }
}

/// Conversion settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ConversionConfig {
    /// What to do with constructs the target format cannot represent:
    /// `warn` drops them with a warning, `strict` fails
    pub policy: LossPolicy,
}

/// Merge settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct MergeConfig {
    /// Edge kind attaching the sub roots: depends-on or contains
    pub relationship: MergeRelationship,
    /// Component ID of the root document to attach under (default: its first root)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Prefix for renamed sub components (default: the sub document name)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

/// Export settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ExportConfig {
    /// Only follow these relationship kinds (e.g. `depends-on`); empty follows all
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub relation_filter: Vec<String>,
    /// Maximum traversal depth from the requested components
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
}
