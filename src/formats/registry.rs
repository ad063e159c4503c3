//! Adapter registry and format detection.
//!
//! Detection asks every registered adapter for a confidence score and takes
//! the best one above [`MIN_CONFIDENCE_THRESHOLD`]. Ties go to the adapter
//! registered first.

use super::traits::{FormatConfidence, FormatAdapter, FormatDetection};
use super::{CycloneDxAdapter, MiddlewareAdapter, OssbomAdapter, SpdxAdapter};
use crate::error::{MalformedKind, Result, SitError};
use crate::model::SbomFormat;

/// Minimum confidence threshold for accepting a format detection.
/// This is LOW confidence (0.25) - the adapter believes it might be able to handle the content.
pub const MIN_CONFIDENCE_THRESHOLD: f32 = 0.25;

/// Result of format detection.
#[derive(Debug, Clone)]
pub struct DetectionResult {
    /// The format that should handle this content
    pub format: SbomFormat,
    /// Confidence level of the detection.
    pub confidence: FormatConfidence,
    /// Detected version if available.
    pub version: Option<String>,
    /// Any warnings about the detection.
    pub warnings: Vec<String>,
}

impl DetectionResult {
    fn from_detection(format: SbomFormat, detection: FormatDetection) -> Self {
        Self {
            format,
            confidence: detection.confidence,
            version: detection.version,
            warnings: detection.warnings,
        }
    }
}

/// The set of format adapters, one per [`SbomFormat`].
pub struct FormatRegistry {
    adapters: Vec<Box<dyn FormatAdapter>>,
    min_confidence: f32,
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatRegistry")
            .field(
                "formats",
                &self.adapters.iter().map(|a| a.format()).collect::<Vec<_>>(),
            )
            .field("min_confidence", &self.min_confidence)
            .finish()
    }
}

impl FormatRegistry {
    /// Registry with every built-in adapter, in detection order.
    #[must_use]
    pub fn new() -> Self {
        Self {
            adapters: vec![
                Box::new(MiddlewareAdapter::new()),
                Box::new(SpdxAdapter::new()),
                Box::new(CycloneDxAdapter::new()),
                Box::new(OssbomAdapter::new()),
            ],
            min_confidence: MIN_CONFIDENCE_THRESHOLD,
        }
    }

    /// Create a registry with a custom confidence threshold.
    #[must_use]
    pub fn with_threshold(min_confidence: f32) -> Self {
        Self {
            min_confidence: min_confidence.clamp(0.0, 1.0),
            ..Self::new()
        }
    }

    /// The adapter for `format`
    #[must_use]
    pub fn adapter(&self, format: SbomFormat) -> &dyn FormatAdapter {
        self.adapters
            .iter()
            .find(|a| a.format() == format)
            .map(Box::as_ref)
            .unwrap_or_else(|| unreachable!("every SbomFormat has a registered adapter"))
    }

    /// Every adapter, in detection order
    pub fn adapters(&self) -> impl Iterator<Item = &dyn FormatAdapter> {
        self.adapters.iter().map(Box::as_ref)
    }

    /// Detect the format of `content`.
    ///
    /// Fails with `MalformedDocument` when no adapter reaches the threshold.
    pub fn detect(&self, content: &[u8]) -> Result<DetectionResult> {
        let mut best: Option<DetectionResult> = None;
        for adapter in &self.adapters {
            let detection = adapter.detect(content);
            tracing::trace!(
                format = %adapter.format(),
                confidence = detection.confidence.value(),
                "format detection"
            );
            let better = best
                .as_ref()
                .is_none_or(|b| detection.confidence.value() > b.confidence.value());
            if better && detection.confidence.value() > 0.0 {
                best = Some(DetectionResult::from_detection(adapter.format(), detection));
            }
        }

        match best {
            Some(result) if result.confidence.value() >= self.min_confidence => {
                tracing::debug!(
                    format = %result.format,
                    confidence = result.confidence.value(),
                    version = ?result.version,
                    "detected SBOM format"
                );
                for warning in &result.warnings {
                    tracing::warn!(format = %result.format, "{warning}");
                }
                Ok(result)
            }
            _ => Err(SitError::malformed(
                "SBOM",
                "format detection",
                MalformedKind::UndetectedFormat,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_format_registered() {
        let registry = FormatRegistry::new();
        for format in SbomFormat::ALL {
            assert_eq!(registry.adapter(format).format(), format);
        }
        let order: Vec<_> = registry.adapters().map(|a| a.format()).collect();
        assert_eq!(order, SbomFormat::ALL.to_vec());
    }

    #[test]
    fn test_detect_each_format() {
        let registry = FormatRegistry::new();
        let cases: [(&[u8], SbomFormat); 4] = [
            (
                br#"{"sbomFormat": "middleware", "schemaVersion": "1.0"}"#,
                SbomFormat::Middleware,
            ),
            (
                br#"{"spdxVersion": "SPDX-2.3", "SPDXID": "SPDXRef-DOCUMENT"}"#,
                SbomFormat::Spdx,
            ),
            (
                br#"{"bomFormat": "CycloneDX", "specVersion": "1.6"}"#,
                SbomFormat::CycloneDx,
            ),
            (br#"{"Format": "OSSBOM", "Version": "1.0"}"#, SbomFormat::Ossbom),
        ];
        for (content, expected) in cases {
            assert_eq!(registry.detect(content).unwrap().format, expected);
        }
    }

    #[test]
    fn test_undetectable_content() {
        let registry = FormatRegistry::new();
        for content in [&b"not json"[..], br#"{"hello": "world"}"#, b""] {
            let err = registry.detect(content).unwrap_err();
            assert!(matches!(
                err,
                SitError::MalformedDocument {
                    source: MalformedKind::UndetectedFormat,
                    ..
                }
            ));
        }
    }

    #[test]
    fn test_threshold() {
        let strict = FormatRegistry::with_threshold(0.9);
        // MEDIUM-confidence CycloneDX guess is rejected at a high threshold
        let content = br#"{"specVersion": "1.5", "components": []}"#;
        assert!(strict.detect(content).is_err());
        assert!(FormatRegistry::new().detect(content).is_ok());
    }
}
