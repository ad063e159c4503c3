//! CLI command handlers.
//!
//! This module provides testable command handlers that are invoked by main.rs.
//! Each handler loads its inputs, runs one core operation, and hands the
//! resulting graph to [`emit`] for encoding and output.

mod convert;
mod export;
mod generate;
mod merge;

pub use convert::run_convert;
pub use export::run_export;
pub use generate::run_generate;
pub use merge::run_merge;

use crate::config::AppConfig;
use crate::formats::EncodeOptions;
use crate::gateway::ConversionGateway;
use crate::model::{CanonicalSbom, SbomFormat};
use crate::pipeline::{encode_sbom, write_output, EncodedOutput, OutputTarget};
use anyhow::Result;

/// Where and how a command writes its resulting SBOM
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSettings {
    /// Output format
    pub model: SbomFormat,
    /// Output destination
    pub target: OutputTarget,
    /// Encoder options
    pub options: EncodeOptions,
}

impl OutputSettings {
    /// Output settings from the effective configuration
    #[must_use]
    pub fn from_config(config: &AppConfig, target: OutputTarget) -> Self {
        Self {
            model: config.output.model,
            target,
            options: config.encode_options(),
        }
    }
}

/// Encode `sbom` with the configured model and write it out.
pub(crate) fn emit(
    gateway: &ConversionGateway,
    sbom: &CanonicalSbom,
    output: &OutputSettings,
) -> Result<EncodedOutput> {
    let encoded = encode_sbom(gateway, sbom, output.model, &output.options)?;
    write_output(&encoded.bytes, &output.target)?;
    tracing::info!(
        format = %encoded.format,
        target = %output.target,
        components = sbom.component_count(),
        warnings = encoded.warnings.len(),
        "operation completed"
    );
    Ok(encoded)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::path::{Path, PathBuf};

    /// Output settings writing `model` to `dir/name`
    pub fn file_output(dir: &Path, name: &str, model: SbomFormat) -> (OutputSettings, PathBuf) {
        let path = dir.join(name);
        let settings = OutputSettings {
            model,
            target: OutputTarget::File(path.clone()),
            options: EncodeOptions::default(),
        };
        (settings, path)
    }
}
