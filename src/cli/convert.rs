//! Convert command handler.
//!
//! Implements the `convert` subcommand: re-encode an SBOM in another format.

use super::{emit, OutputSettings};
use crate::gateway::ConversionGateway;
use crate::model::SbomFormat;
use crate::pipeline::{load_sbom, EncodedOutput};
use anyhow::Result;
use std::path::Path;

/// Run the convert command. `from` overrides format auto-detection.
pub fn run_convert(
    input: &Path,
    from: Option<SbomFormat>,
    output: &OutputSettings,
) -> Result<EncodedOutput> {
    let gateway = ConversionGateway::new();
    let loaded = load_sbom(&gateway, input, from)?;
    if loaded.format() == output.model {
        tracing::debug!("Input is already {}; re-encoding", output.model);
    }
    emit(&gateway, &loaded.sbom, output)
}
