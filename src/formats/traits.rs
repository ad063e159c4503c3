//! Adapter trait definitions, encode options and loss accounting.
//!
//! This module defines the `FormatAdapter` trait implemented once per
//! external schema, and the confidence scoring used for format detection.

use super::FieldSupport;
use crate::error::{Result, SitError};
use crate::model::{CanonicalSbom, SbomFormat};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Confidence level for format detection
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct FormatConfidence(f32);

impl FormatConfidence {
    /// No confidence - definitely not this format
    pub const NONE: Self = Self(0.0);
    /// Low confidence - might be this format
    pub const LOW: Self = Self(0.25);
    /// Medium confidence - likely this format
    pub const MEDIUM: Self = Self(0.5);
    /// High confidence - almost certainly this format
    pub const HIGH: Self = Self(0.75);
    /// Certain - definitely this format
    pub const CERTAIN: Self = Self(1.0);

    /// Create a new confidence value
    #[must_use]
    pub const fn new(value: f32) -> Self {
        Self(value.clamp(0.0, 1.0))
    }

    /// Get the confidence value
    #[must_use]
    pub const fn value(&self) -> f32 {
        self.0
    }

    /// Check if this confidence indicates the format can be decoded
    #[must_use]
    pub fn can_decode(&self) -> bool {
        self.0 >= 0.25
    }
}

impl Default for FormatConfidence {
    fn default() -> Self {
        Self::NONE
    }
}

/// Detection result from an adapter
#[derive(Debug, Clone)]
pub struct FormatDetection {
    /// Confidence that this adapter can handle the content
    pub confidence: FormatConfidence,
    /// Detected version if applicable
    pub version: Option<String>,
    /// Any issues detected that might affect decoding
    pub warnings: Vec<String>,
}

impl FormatDetection {
    /// Create a detection result indicating no match
    #[must_use]
    pub const fn no_match() -> Self {
        Self {
            confidence: FormatConfidence::NONE,
            version: None,
            warnings: Vec::new(),
        }
    }

    /// Create a detection result with confidence
    #[must_use]
    pub const fn with_confidence(confidence: FormatConfidence) -> Self {
        Self {
            confidence,
            version: None,
            warnings: Vec::new(),
        }
    }

    /// Set the detected version
    #[must_use]
    pub fn version(mut self, version: &str) -> Self {
        self.version = Some(version.to_string());
        self
    }

    /// Add a warning
    #[must_use]
    pub fn warning(mut self, warning: &str) -> Self {
        self.warnings.push(warning.to_string());
        self
    }
}

/// What an encoder does with a construct the target format cannot hold.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum LossPolicy {
    /// Drop the construct and record a [`LossWarning`]
    #[default]
    Warn,
    /// Fail with `UnsupportedMapping`
    Strict,
}

impl fmt::Display for LossPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warn => write!(f, "warn"),
            Self::Strict => write!(f, "strict"),
        }
    }
}

/// Options passed explicitly into every encode call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Strictness for lossy mappings
    pub policy: LossPolicy,
    /// Pretty-print the JSON output
    pub pretty: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            policy: LossPolicy::Warn,
            pretty: true,
        }
    }
}

impl EncodeOptions {
    /// Options that refuse any lossy mapping
    #[must_use]
    pub fn strict() -> Self {
        Self {
            policy: LossPolicy::Strict,
            ..Self::default()
        }
    }
}

/// Record of a construct dropped during encoding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LossWarning {
    /// Target format
    pub format: SbomFormat,
    /// Component ID, relationship, or `document`
    pub subject: String,
    /// Field or construct that was dropped
    pub field: String,
    /// Human-readable detail
    pub detail: String,
}

impl fmt::Display for LossWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: dropped {} of '{}': {}",
            self.format, self.field, self.subject, self.detail
        )
    }
}

/// Output of an encode call
#[derive(Debug, Clone)]
pub struct Encoded {
    /// Serialized document
    pub bytes: Vec<u8>,
    /// Constructs dropped under the warn policy
    pub warnings: Vec<LossWarning>,
}

impl Encoded {
    /// The document as UTF-8 text. Encoders only emit JSON, so this is lossless.
    #[must_use]
    pub fn as_text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }
}

/// Collects loss warnings while an encoder runs, or fails fast under the
/// strict policy.
#[derive(Debug)]
pub struct LossRecorder {
    format: SbomFormat,
    policy: LossPolicy,
    warnings: Vec<LossWarning>,
}

impl LossRecorder {
    #[must_use]
    pub fn new(format: SbomFormat, policy: LossPolicy) -> Self {
        Self {
            format,
            policy,
            warnings: Vec::new(),
        }
    }

    /// Record that `field` of `subject` cannot be represented.
    ///
    /// Returns `Err(UnsupportedMapping)` under the strict policy.
    pub fn drop_field(
        &mut self,
        subject: impl Into<String>,
        field: impl Into<String>,
        detail: impl Into<String>,
    ) -> Result<()> {
        let warning = LossWarning {
            format: self.format,
            subject: subject.into(),
            field: field.into(),
            detail: detail.into(),
        };
        match self.policy {
            LossPolicy::Strict => Err(SitError::unsupported(
                warning.format,
                warning.subject,
                warning.field,
                warning.detail,
            )),
            LossPolicy::Warn => {
                tracing::warn!(
                    format = %warning.format,
                    subject = %warning.subject,
                    field = %warning.field,
                    "{}",
                    warning.detail
                );
                self.warnings.push(warning);
                Ok(())
            }
        }
    }

    /// Record a loss only when `present` holds; convenience for optional fields.
    pub fn drop_if(
        &mut self,
        present: bool,
        subject: &str,
        field: &str,
        detail: impl Into<String>,
    ) -> Result<()> {
        if present {
            self.drop_field(subject, field, detail)
        } else {
            Ok(())
        }
    }

    #[must_use]
    pub fn warnings(&self) -> &[LossWarning] {
        &self.warnings
    }

    /// Finish encoding: pair the bytes with the collected warnings
    #[must_use]
    pub fn finish(self, bytes: Vec<u8>) -> Encoded {
        Encoded {
            bytes,
            warnings: self.warnings,
        }
    }
}

/// Trait for bidirectional format adapters.
///
/// One implementation per external schema. Adapters hold no state, so a
/// single instance serves concurrent requests with different options.
pub trait FormatAdapter: Send + Sync {
    /// Format handled by this adapter
    fn format(&self) -> SbomFormat;

    /// Schema versions accepted by `decode`
    fn supported_versions(&self) -> &'static [&'static str];

    /// Fields this format can represent
    fn field_support(&self) -> &'static FieldSupport {
        FieldSupport::for_format(self.format())
    }

    /// Detect if this adapter can handle the given content.
    ///
    /// Lightweight structural inspection without a full decode.
    fn detect(&self, content: &[u8]) -> FormatDetection;

    /// Decode an external document into a canonical graph.
    ///
    /// Fails with `MalformedDocument` if the content is not valid JSON,
    /// required top-level fields are missing, or the schema version is
    /// unsupported.
    fn decode(&self, content: &[u8]) -> Result<CanonicalSbom>;

    /// Encode a canonical graph into this format.
    ///
    /// Constructs the format cannot represent are handled per
    /// `options.policy`.
    fn encode(&self, sbom: &CanonicalSbom, options: &EncodeOptions) -> Result<Encoded>;

    /// Get confidence score for decoding this content
    fn confidence(&self, content: &[u8]) -> FormatConfidence {
        self.detect(content).confidence
    }
}
