//! Export command handler.
//!
//! Implements the `export` subcommand: cut the subgraph reachable from one
//! or more component IDs out of an SBOM.

use super::{emit, OutputSettings};
use crate::export::{ExportEngine, ExportOptions};
use crate::gateway::ConversionGateway;
use crate::pipeline::{load_sbom, EncodedOutput};
use anyhow::{Context, Result};
use std::path::Path;

/// Run the export command.
pub fn run_export(
    input: &Path,
    ids: &[String],
    options: ExportOptions,
    output: &OutputSettings,
) -> Result<EncodedOutput> {
    let gateway = ConversionGateway::new();
    let loaded = load_sbom(&gateway, input, None)?;

    let subgraph = ExportEngine::new(options)
        .export(&loaded.sbom, ids)
        .with_context(|| format!("Failed to export from {}", input.display()))?;

    emit(&gateway, &subgraph, output)
}
