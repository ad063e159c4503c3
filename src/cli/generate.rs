//! Generate command handler.
//!
//! Implements the `generate` subcommand: inventory a directory and write
//! the resulting SBOM.

use super::{emit, OutputSettings};
use crate::gateway::ConversionGateway;
use crate::generate::{FileInventoryGenerator, GenerateRequest, SbomGenerator};
use crate::pipeline::EncodedOutput;
use anyhow::{Context, Result};

/// Run the generate command.
pub fn run_generate(request: &GenerateRequest, output: &OutputSettings) -> Result<EncodedOutput> {
    let sbom = FileInventoryGenerator::new()
        .generate(request)
        .with_context(|| format!("Failed to generate SBOM for {}", request.path.display()))?;

    emit(&ConversionGateway::new(), &sbom, output)
}
