//! **SBOM interoperability: one graph model, four formats.**
//!
//! `sit` decodes SPDX, CycloneDX and OSSBOM documents into a single
//! canonical graph ([`CanonicalSbom`]), transforms that graph (merge two
//! SBOMs, export a subgraph), and encodes it back into any supported format.
//! Everything a target format cannot hold is either reported as a
//! [`LossWarning`] or refused outright, depending on the [`LossPolicy`].
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: the canonical graph. Components keyed by a graph-local
//!   [`ComponentId`], typed relationship edges, and root components.
//! - **[`formats`]**: one [`FormatAdapter`] per schema plus the
//!   [`FormatRegistry`] that detects formats by confidence score.
//! - **[`gateway`]**: the [`ConversionGateway`], the single place a target
//!   format is turned into an adapter call.
//! - **[`merge`]**: the [`MergeEngine`], attaching a sub graph under a
//!   component of a root graph with deterministic ID collision handling.
//! - **[`export`]**: the [`ExportEngine`], computing the transitive closure
//!   of one or more components.
//! - **[`generate`]**: the [`SbomGenerator`] collaborator producing an
//!   initial graph from a directory tree.
//! - **[`pipeline`]** and **[`cli`]**: file I/O and command handlers used by
//!   the `sit` binary.
//!
//! ## Getting Started: Converting an SBOM
//!
//! ```
//! use sit::{Component, ConversionGateway, EncodeOptions, Relationship, SbomFormat};
//! use sit::model::CanonicalSbom;
//!
//! # fn main() -> Result<(), sit::SitError> {
//! let mut sbom = CanonicalSbom::default();
//! sbom.add_component(Component::new("app", "app").with_version("1.0"));
//! sbom.add_component(Component::new("zlib", "zlib").with_version("1.3"));
//! sbom.add_relationship(Relationship::depends_on("app", "zlib"));
//! sbom.add_root("app");
//!
//! let gateway = ConversionGateway::new();
//! let encoded = gateway.convert(&sbom, SbomFormat::CycloneDx, &EncodeOptions::default())?;
//! assert!(encoded.warnings.is_empty());
//!
//! let back = gateway.decode(&encoded.bytes, None)?;
//! assert_eq!(back.component_count(), 2);
//! # Ok(())
//! # }
//! ```
//!
//! ### Exporting a Subgraph
//!
//! ```no_run
//! use sit::{ConversionGateway, ExportEngine};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let gateway = ConversionGateway::new();
//!     let sbom = gateway.decode(&std::fs::read("app.cdx.json")?, None)?;
//!
//!     let closure = ExportEngine::default().export(&sbom, ["pkg:npm/lodash@4.17.21"])?;
//!     println!("{} components reachable", closure.component_count());
//!     Ok(())
//! }
//! ```
//!
//! ## Command-Line Interface (CLI)
//!
//! This documentation is for the `sit` library crate. The `sit` binary
//! exposes `generate`, `merge`, `export` and `convert` subcommands on top of
//! it; run `sit --help` for details.

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    // Doc completeness: # Errors / # Panics sections are aspirational
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    // Format adapters map many optional fields in one pass
    clippy::too_many_lines
)]

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod formats;
pub mod gateway;
pub mod generate;
pub mod merge;
pub mod model;
pub mod pipeline;

// Re-export main types for convenience
pub use config::{AppConfig, AppConfigBuilder, ConfigError, Validatable};
pub use error::{ErrorContext, MalformedKind, Result, SitError};
pub use export::{ExportEngine, ExportOptions};
pub use formats::{
    EncodeOptions, Encoded, FormatAdapter, FormatRegistry, LossPolicy, LossWarning,
};
pub use gateway::ConversionGateway;
pub use generate::{FileInventoryGenerator, GenerateRequest, SbomGenerator};
pub use merge::{MergeEngine, MergeOptions, MergeRelationship, MergeReport};
pub use model::{
    CanonicalSbom, Component, ComponentId, ComponentType, Relationship, RelationshipType,
    SbomFormat,
};
