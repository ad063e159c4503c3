//! Conversion gateway.
//!
//! The single place where a target [`SbomFormat`] is turned into an adapter
//! call. Generate, merge, export and convert all finish through
//! [`ConversionGateway::convert`]; inputs enter through
//! [`ConversionGateway::decode`].

use crate::error::Result;
use crate::formats::{DetectionResult, Encoded, EncodeOptions, FormatRegistry};
use crate::model::{CanonicalSbom, SbomFormat};

/// Stateless dispatcher between the canonical model and the adapters
#[derive(Debug, Default)]
pub struct ConversionGateway {
    registry: FormatRegistry,
}

impl ConversionGateway {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom registry (e.g. a different detection threshold)
    #[must_use]
    pub fn with_registry(registry: FormatRegistry) -> Self {
        Self { registry }
    }

    #[must_use]
    pub fn registry(&self) -> &FormatRegistry {
        &self.registry
    }

    /// Encode `sbom` in the `target` format.
    pub fn convert(
        &self,
        sbom: &CanonicalSbom,
        target: SbomFormat,
        options: &EncodeOptions,
    ) -> Result<Encoded> {
        let encoded = self.registry.adapter(target).encode(sbom, options)?;
        tracing::debug!(
            format = %target,
            bytes = encoded.bytes.len(),
            warnings = encoded.warnings.len(),
            "encoded SBOM"
        );
        Ok(encoded)
    }

    /// Decode `content`, auto-detecting the format unless `declared` is given.
    pub fn decode(&self, content: &[u8], declared: Option<SbomFormat>) -> Result<CanonicalSbom> {
        let format = match declared {
            Some(format) => format,
            None => self.registry.detect(content)?.format,
        };
        self.registry.adapter(format).decode(content)
    }

    /// Detect the format of `content` without decoding it.
    pub fn detect(&self, content: &[u8]) -> Result<DetectionResult> {
        self.registry.detect(content)
    }
}
