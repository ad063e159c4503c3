//! Initial graph generation from a directory tree.
//!
//! The generator is a collaborator of the conversion core: it produces a
//! [`CanonicalSbom`] that then flows through the same gateway as every
//! decoded document.

use crate::error::{Result, SitError};
use crate::model::{
    CanonicalSbom, Component, ComponentId, ComponentType, Creator, DocumentMetadata,
    HashAlgorithm, Property, Relationship, RelationshipType,
};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Document property recording the build environment
pub const ENVIRONMENT_PROPERTY: &str = "sit:environment";

/// Input of a generation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    /// Directory to inventory
    pub path: PathBuf,
    /// Free-form environment label (e.g. "production")
    pub environment: String,
}

impl GenerateRequest {
    pub fn new(path: impl Into<PathBuf>, environment: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            environment: environment.into(),
        }
    }
}

/// Produces an initial canonical graph for a software package
pub trait SbomGenerator {
    fn generate(&self, request: &GenerateRequest) -> Result<CanonicalSbom>;
}

/// Inventories every regular file below a directory.
///
/// The directory becomes an `application` root; each file becomes a `file`
/// component carrying its SHA-256 and hangs off the root with a `CONTAINS`
/// edge. Hidden entries are skipped and the walk is sorted by path, so the
/// same tree always yields the same graph.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileInventoryGenerator;

impl FileInventoryGenerator {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl SbomGenerator for FileInventoryGenerator {
    fn generate(&self, request: &GenerateRequest) -> Result<CanonicalSbom> {
        let root_path = &request.path;
        let metadata =
            std::fs::metadata(root_path).map_err(|e| SitError::io(root_path, e))?;
        if !metadata.is_dir() {
            return Err(SitError::validation(format!(
                "{} is not a directory",
                root_path.display()
            )));
        }

        let root_name = directory_name(root_path);
        let root_id = ComponentId::new(root_name.as_str());

        let mut files = Vec::new();
        collect_files(root_path, &mut files)?;
        files.sort();

        let mut document = DocumentMetadata {
            name: Some(root_name.clone()),
            creators: vec![Creator::this_tool()],
            ..DocumentMetadata::default()
        };
        if !request.environment.is_empty() {
            document
                .properties
                .push(Property::new(ENVIRONMENT_PROPERTY, request.environment.as_str()));
        }

        let mut sbom = CanonicalSbom::new(document);
        sbom.add_component(
            Component::new(root_id.clone(), root_name.as_str())
                .with_type(ComponentType::Application),
        );
        sbom.add_root(root_id.clone());

        for path in &files {
            let relative = relative_name(root_path, path);
            let digest = sha256_file(path)?;
            let id = ComponentId::new(format!("{root_name}/{relative}"));
            tracing::debug!(file = %relative, "inventoried file");

            sbom.add_component(
                Component::new(id.clone(), relative)
                    .with_type(ComponentType::File)
                    .with_hash(HashAlgorithm::Sha256, digest),
            );
            sbom.add_relationship(Relationship::new(
                root_id.clone(),
                id,
                RelationshipType::Contains,
            ));
        }
        sbom.document.serial_number = Some(sbom.derive_serial());

        tracing::info!(
            path = %root_path.display(),
            files = files.len(),
            "generated file inventory"
        );
        Ok(sbom)
    }
}

fn directory_name(path: &Path) -> String {
    path.canonicalize()
        .ok()
        .as_deref()
        .and_then(Path::file_name)
        .or_else(|| path.file_name())
        .map_or_else(|| "root".to_string(), |n| n.to_string_lossy().into_owned())
}

/// Forward-slash path of `path` relative to `root`
fn relative_name(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|n| n.to_string_lossy().starts_with('.'))
}

fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let entries = std::fs::read_dir(dir).map_err(|e| SitError::io(dir, e))?;
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                continue;
            }
        };
        let path = entry.path();
        if is_hidden(&path) {
            continue;
        }
        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(e) => {
                tracing::warn!("Cannot stat {}: {}", path.display(), e);
                continue;
            }
        };
        if file_type.is_dir() {
            collect_files(&path, files)?;
        } else if file_type.is_file() {
            files.push(path);
        }
    }
    Ok(())
}

fn sha256_file(path: &Path) -> Result<String> {
    let mut file = std::fs::File::open(path).map_err(|e| SitError::io(path, e))?;
    let mut hasher = Sha256::new();
    std::io::copy(&mut file, &mut hasher).map_err(|e| SitError::io(path, e))?;
    Ok(format!("{:x}", hasher.finalize()))
}
