//! Merge command handler.
//!
//! Implements the `merge` subcommand: attach a sub SBOM under a component
//! of a root SBOM.

use super::{emit, OutputSettings};
use crate::gateway::ConversionGateway;
use crate::merge::{MergeEngine, MergeOptions};
use crate::pipeline::{load_sbom, EncodedOutput};
use anyhow::{Context, Result};
use std::path::Path;

/// Run the merge command.
pub fn run_merge(
    root_path: &Path,
    sub_path: &Path,
    options: MergeOptions,
    output: &OutputSettings,
) -> Result<EncodedOutput> {
    let gateway = ConversionGateway::new();
    let root = load_sbom(&gateway, root_path, None)?;
    let sub = load_sbom(&gateway, sub_path, None)?;

    let report = MergeEngine::new(options)
        .merge_detailed(&root.sbom, &sub.sbom)
        .with_context(|| {
            format!(
                "Failed to merge {} into {}",
                sub_path.display(),
                root_path.display()
            )
        })?;

    for (from, to) in &report.remapped {
        tracing::info!("Renamed sub component {from} -> {to}");
    }
    if !report.unified.is_empty() {
        tracing::info!(
            "Unified {} component(s) already present in the root SBOM",
            report.unified.len()
        );
    }

    emit(&gateway, &report.sbom, output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::test_support::file_output;
    use crate::model::SbomFormat;
    use crate::pipeline::{exit_code_for, exit_codes};

    const ROOT: &str = r#"{
        "sbomFormat": "middleware", "schemaVersion": "1.0",
        "metadata": {"name": "root", "created": "2024-01-01T00:00:00Z"},
        "roots": ["app"],
        "components": [
            {"id": "app", "name": "app", "type": "application"},
            {"id": "zlib", "name": "zlib", "version": "1.3",
             "hashes": [{"alg": "SHA-256", "content": "aaaa"}]}
        ],
        "relationships": [{"from": "app", "to": "zlib", "type": "DEPENDS_ON"}]
    }"#;

    fn sub(zlib_hash: &str) -> String {
        format!(
            r#"{{
            "sbomFormat": "middleware", "schemaVersion": "1.0",
            "metadata": {{"name": "plugin", "created": "2024-02-01T00:00:00Z"}},
            "roots": ["plugin"],
            "components": [
                {{"id": "plugin", "name": "plugin"}},
                {{"id": "zlib", "name": "zlib", "version": "1.3",
                 "hashes": [{{"alg": "SHA-256", "content": "{zlib_hash}"}}]}}
            ],
            "relationships": [{{"from": "plugin", "to": "zlib", "type": "DEPENDS_ON"}}]
        }}"#
        )
    }

    #[test]
    fn test_merge_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("root.json"), ROOT).unwrap();
        std::fs::write(dir.path().join("sub.json"), sub("aaaa")).unwrap();
        let (settings, path) = file_output(dir.path(), "out.json", SbomFormat::Middleware);

        run_merge(
            &dir.path().join("root.json"),
            &dir.path().join("sub.json"),
            MergeOptions::default(),
            &settings,
        )
        .unwrap();

        let merged = ConversionGateway::new()
            .decode(&std::fs::read(path).unwrap(), None)
            .unwrap();
        assert_eq!(merged.component_count(), 3);
        assert!(merged.contains("plugin"));
    }

    #[test]
    fn test_merge_conflict_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("root.json"), ROOT).unwrap();
        std::fs::write(dir.path().join("sub.json"), sub("bbbb")).unwrap();
        let (settings, path) = file_output(dir.path(), "out.json", SbomFormat::Middleware);

        let err = run_merge(
            &dir.path().join("root.json"),
            &dir.path().join("sub.json"),
            MergeOptions::default(),
            &settings,
        )
        .unwrap_err();
        assert_eq!(exit_code_for(&err), exit_codes::MERGE_CONFLICT);
        assert!(!path.exists());
    }
}
