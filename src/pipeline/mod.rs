//! Pipeline orchestration for SBOM operations.
//!
//! Every command runs the same stages: load (read + decode) → transform
//! (generate, merge, export or nothing) → encode through the gateway →
//! write. The stages here do the file and stream I/O that the core leaves
//! to its callers.

mod encode_stage;
mod output;
mod parse;

pub use encode_stage::{encode_sbom, EncodedOutput};
pub use output::{write_output, OutputTarget};
pub use parse::{load_sbom, LoadedSbom};

/// Process exit codes, one per error class
pub mod exit_codes {
    /// Success
    pub const SUCCESS: i32 = 0;
    /// I/O, configuration, or any other failure
    pub const ERROR: i32 = 1;
    /// An input document is malformed or of an undetectable format
    pub const MALFORMED_DOCUMENT: i32 = 2;
    /// Strict policy rejected a lossy mapping
    pub const UNSUPPORTED_MAPPING: i32 = 3;
    /// A requested component ID is not in the graph
    pub const COMPONENT_NOT_FOUND: i32 = 4;
    /// Merge found the same component with different checksums
    pub const MERGE_CONFLICT: i32 = 5;
}

/// Exit code for a failed command: the code of the first [`SitError`] in
/// the chain, or [`exit_codes::ERROR`].
///
/// [`SitError`]: crate::SitError
#[must_use]
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<crate::SitError>())
        .map_or(exit_codes::ERROR, crate::SitError::exit_code)
}
