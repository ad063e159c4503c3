//! Encode stage: final format selection through the conversion gateway.

use crate::formats::{EncodeOptions, LossWarning};
use crate::gateway::ConversionGateway;
use crate::model::{CanonicalSbom, SbomFormat};
use anyhow::{Context, Result};

/// Encoded command output
#[derive(Debug, Clone)]
pub struct EncodedOutput {
    pub format: SbomFormat,
    pub bytes: Vec<u8>,
    pub warnings: Vec<LossWarning>,
}

/// Encode `sbom` as `model`, logging every loss warning and a summary.
pub fn encode_sbom(
    gateway: &ConversionGateway,
    sbom: &CanonicalSbom,
    model: SbomFormat,
    options: &EncodeOptions,
) -> Result<EncodedOutput> {
    let encoded = gateway
        .convert(sbom, model, options)
        .with_context(|| format!("Failed to encode SBOM as {model}"))?;

    for warning in &encoded.warnings {
        tracing::warn!("{warning}");
    }
    if !encoded.warnings.is_empty() {
        tracing::warn!(
            format = %model,
            dropped = encoded.warnings.len(),
            "{} construct(s) could not be represented in {model} and were dropped",
            encoded.warnings.len()
        );
    }

    Ok(EncodedOutput {
        format: model,
        bytes: encoded.bytes,
        warnings: encoded.warnings,
    })
}
