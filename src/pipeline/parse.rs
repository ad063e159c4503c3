//! Input stage: read an SBOM file and decode it into the canonical model.

use crate::gateway::ConversionGateway;
use crate::model::{CanonicalSbom, SbomFormat};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// A decoded input document
#[derive(Debug, Clone)]
pub struct LoadedSbom {
    /// The canonical graph
    pub sbom: CanonicalSbom,
    /// File it was read from
    pub path: PathBuf,
}

impl LoadedSbom {
    /// Format the document was decoded from
    #[must_use]
    pub fn format(&self) -> SbomFormat {
        self.sbom.document.source_format
    }

    #[must_use]
    pub fn into_sbom(self) -> CanonicalSbom {
        self.sbom
    }
}

/// Read and decode `path`, auto-detecting its format unless `declared` is set.
pub fn load_sbom(
    gateway: &ConversionGateway,
    path: &Path,
    declared: Option<SbomFormat>,
) -> Result<LoadedSbom> {
    tracing::debug!("Reading SBOM: {}", path.display());

    let content = std::fs::read(path)
        .map_err(|e| crate::SitError::io(path, e))
        .with_context(|| format!("Failed to read SBOM file: {}", path.display()))?;
    let sbom = gateway
        .decode(&content, declared)
        .with_context(|| format!("Failed to decode SBOM: {}", path.display()))?;

    tracing::info!(
        path = %path.display(),
        format = %sbom.document.source_format,
        components = sbom.component_count(),
        relationships = sbom.relationship_count(),
        "loaded SBOM"
    );

    Ok(LoadedSbom {
        sbom,
        path: path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{exit_code_for, exit_codes};

    const CYCLONEDX: &str = r#"{
        "bomFormat": "CycloneDX",
        "specVersion": "1.5",
        "components": [{"bom-ref": "pkg:npm/a@1", "type": "library", "name": "a", "version": "1"}]
    }"#;

    #[test]
    fn test_load_detects_format() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("bom.json");
        std::fs::write(&path, CYCLONEDX).unwrap();

        let loaded = load_sbom(&ConversionGateway::new(), &path, None).unwrap();
        assert_eq!(loaded.format(), SbomFormat::CycloneDx);
        assert_eq!(loaded.path, path);
        assert!(loaded.into_sbom().contains("pkg:npm/a@1"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_sbom(
            &ConversionGateway::new(),
            Path::new("/nonexistent/bom.json"),
            None,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Failed to read SBOM file"));
        assert_eq!(exit_code_for(&err), exit_codes::ERROR);
    }

    #[test]
    fn test_load_malformed_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = load_sbom(&ConversionGateway::new(), &path, None).unwrap_err();
        assert_eq!(exit_code_for(&err), exit_codes::MALFORMED_DOCUMENT);
    }
}
