//! Middleware (canonical) JSON schema.
//!
//! A direct serialization of [`CanonicalSbom`], so encoding never loses
//! anything. Document metadata, including `sourceFormat` and the stored
//! extensions of other formats, is written verbatim.

use super::json::{self, require};
use super::traits::{Encoded, EncodeOptions, FormatAdapter, FormatConfidence, FormatDetection};
use crate::error::{MalformedKind, Result, SitError};
use crate::model::{CanonicalSbom, Component, ComponentId, DocumentMetadata, Relationship, SbomFormat};
use serde::{Deserialize, Serialize};

const FORMAT: SbomFormat = SbomFormat::Middleware;
const FORMAT_MARKER: &str = "middleware";
const SCHEMA_VERSION: &str = "1.0";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MiddlewareDocument {
    #[serde(default)]
    sbom_format: Option<String>,
    #[serde(default)]
    schema_version: Option<String>,
    #[serde(default)]
    metadata: Option<DocumentMetadata>,
    #[serde(default)]
    roots: Vec<ComponentId>,
    #[serde(default)]
    components: Vec<Component>,
    #[serde(default)]
    relationships: Vec<Relationship>,
}

/// Borrowing view used for encoding
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MiddlewareDocumentRef<'a> {
    sbom_format: &'static str,
    schema_version: &'static str,
    metadata: &'a DocumentMetadata,
    roots: &'a [ComponentId],
    components: Vec<&'a Component>,
    relationships: Vec<&'a Relationship>,
}

/// Adapter for the canonical middleware schema
#[derive(Debug, Default, Clone, Copy)]
pub struct MiddlewareAdapter;

impl MiddlewareAdapter {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl FormatAdapter for MiddlewareAdapter {
    fn format(&self) -> SbomFormat {
        FORMAT
    }

    fn supported_versions(&self) -> &'static [&'static str] {
        &[SCHEMA_VERSION]
    }

    fn detect(&self, content: &[u8]) -> FormatDetection {
        if !json::looks_like_json_object(content) {
            return FormatDetection::no_match();
        }
        let text = json::preview(content);
        if !text.contains("\"sbomFormat\"") {
            return FormatDetection::no_match();
        }
        if text.contains("\"middleware\"") {
            FormatDetection::with_confidence(FormatConfidence::CERTAIN).version(SCHEMA_VERSION)
        } else {
            FormatDetection::with_confidence(FormatConfidence::LOW)
                .warning("sbomFormat present but not 'middleware'")
        }
    }

    fn decode(&self, content: &[u8]) -> Result<CanonicalSbom> {
        let doc: MiddlewareDocument = json::from_slice(FORMAT, content)?;

        let marker = require(FORMAT, doc.sbom_format, "sbomFormat", "document")?;
        if marker != FORMAT_MARKER {
            return Err(SitError::malformed(
                FORMAT,
                "document",
                MalformedKind::InvalidValue {
                    field: "sbomFormat".into(),
                    message: format!("expected '{FORMAT_MARKER}', found '{marker}'"),
                },
            ));
        }
        let version = require(FORMAT, doc.schema_version, "schemaVersion", "document")?;
        if version != SCHEMA_VERSION {
            return Err(SitError::unsupported_version(
                FORMAT,
                version,
                self.supported_versions(),
            ));
        }
        let metadata = require(FORMAT, doc.metadata, "metadata", "document")?;

        let mut sbom = CanonicalSbom::new(metadata);
        for (idx, comp) in doc.components.into_iter().enumerate() {
            if sbom.contains(comp.id.as_str()) {
                return Err(SitError::malformed(
                    FORMAT,
                    format!("components[{idx}]"),
                    MalformedKind::DuplicateId(comp.id.into_inner()),
                ));
            }
            sbom.add_component(comp);
        }
        for root in doc.roots {
            sbom.add_root(root);
        }
        for rel in doc.relationships {
            sbom.add_relationship(rel);
        }

        // Errors below should name this format, not the recorded source
        let recorded = sbom.document.source_format;
        sbom.document.source_format = FORMAT;
        sbom.validate()?;
        sbom.document.source_format = recorded;
        Ok(sbom)
    }

    fn encode(&self, sbom: &CanonicalSbom, options: &EncodeOptions) -> Result<Encoded> {
        let doc = MiddlewareDocumentRef {
            sbom_format: FORMAT_MARKER,
            schema_version: SCHEMA_VERSION,
            metadata: &sbom.document,
            roots: &sbom.roots,
            components: sbom.components.values().collect(),
            relationships: sbom.relationships.iter().collect(),
        };
        let bytes = json::to_vec(FORMAT, &doc, options.pretty)?;
        Ok(Encoded {
            bytes,
            warnings: Vec::new(),
        })
    }
}
