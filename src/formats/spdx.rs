//! SPDX 2.3 JSON adapter.
//!
//! Packages and files decode to components; relationships are normalised
//! to the forward canonical vocabulary (`DEPENDENCY_OF` becomes a swapped
//! `DEPENDS_ON`, and so on). `SPDXRef-DOCUMENT DESCRIBES x` marks `x` as a
//! root. `File` components encode as `files[]` elements unless they were
//! decoded from a package. Component IDs that are not valid SPDX element
//! IDs are carried in an annotation so they survive the round trip.

use super::json::{self, extension_fields, format_timestamp, parse_timestamp, require};
use super::traits::{
    Encoded, EncodeOptions, FormatAdapter, FormatConfidence, FormatDetection, LossRecorder,
};
use super::support::SPDX_FILE_SUPPORT;
use super::FieldSupport;
use crate::error::Result;
use crate::model::{
    normalize_relationship_name, spdx_element_id, CanonicalSbom, Component, ComponentId,
    ComponentType, Creator, CreatorType, DocumentMetadata, ExternalRefType, ExternalReference,
    Hash, HashAlgorithm, JsonObject, LicenseExpression, Organization, Relationship,
    RelationshipType, SbomFormat,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

const FORMAT: SbomFormat = SbomFormat::Spdx;
const OUTPUT_VERSION: &str = "SPDX-2.3";
const DOCUMENT_ID: &str = "SPDXRef-DOCUMENT";
const NOASSERTION: &str = "NOASSERTION";
const ID_ANNOTATION_PREFIX: &str = "sit:component-id=";
const ID_ANNOTATOR: &str = "Tool: sit";
/// Extension key marking a `File` component that came from a package
const PURPOSE_KEY: &str = "primaryPackagePurpose";

// ============================================================================
// Wire structures
// ============================================================================

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpdxDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    spdx_version: Option<String>,
    #[serde(rename = "SPDXID", default, skip_serializing_if = "Option::is_none")]
    spdx_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data_license: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    document_namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    creation_info: Option<SpdxCreationInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    document_describes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    packages: Vec<SpdxPackage>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    files: Vec<SpdxFile>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    relationships: Vec<SpdxRelationship>,
    #[serde(flatten)]
    extra: JsonObject,
}

const DOCUMENT_FIELDS: &[&str] = &[
    "spdxVersion",
    "SPDXID",
    "name",
    "dataLicense",
    "documentNamespace",
    "creationInfo",
    "documentDescribes",
    "packages",
    "files",
    "relationships",
];

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpdxCreationInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created: Option<String>,
    #[serde(default)]
    creators: Vec<String>,
    #[serde(flatten)]
    extra: JsonObject,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpdxPackage {
    #[serde(rename = "SPDXID", default, skip_serializing_if = "Option::is_none")]
    spdx_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    supplier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    originator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    download_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    homepage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    license_concluded: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    license_declared: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    copyright_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    primary_package_purpose: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    checksums: Vec<SpdxChecksum>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    external_refs: Vec<SpdxExternalRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    annotations: Vec<SpdxAnnotation>,
    #[serde(flatten)]
    extra: JsonObject,
}

const PACKAGE_FIELDS: &[&str] = &[
    "SPDXID",
    "name",
    "versionInfo",
    "supplier",
    "originator",
    "downloadLocation",
    "homepage",
    "licenseConcluded",
    "licenseDeclared",
    "copyrightText",
    "description",
    "primaryPackagePurpose",
    "checksums",
    "externalRefs",
    "annotations",
];

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpdxFile {
    #[serde(rename = "SPDXID", default, skip_serializing_if = "Option::is_none")]
    spdx_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    checksums: Vec<SpdxChecksum>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    license_concluded: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    license_info_in_files: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    copyright_text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    annotations: Vec<SpdxAnnotation>,
    #[serde(flatten)]
    extra: JsonObject,
}

const FILE_FIELDS: &[&str] = &[
    "SPDXID",
    "fileName",
    "checksums",
    "licenseConcluded",
    "licenseInfoInFiles",
    "copyrightText",
    "annotations",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpdxChecksum {
    algorithm: String,
    checksum_value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpdxExternalRef {
    reference_category: String,
    reference_type: String,
    reference_locator: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpdxAnnotation {
    annotator: String,
    annotation_date: String,
    annotation_type: String,
    comment: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpdxRelationship {
    spdx_element_id: String,
    relationship_type: String,
    related_spdx_element: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
}

// ============================================================================
// Vocabulary mapping
// ============================================================================

/// SPDX relationship type to canonical kind; `true` when the SPDX form
/// points the other way.
fn relationship_from_spdx(value: &str) -> (RelationshipType, bool) {
    use RelationshipType as R;
    match normalize_relationship_name(value).as_str() {
        "DEPENDENCY_OF" => (R::DependsOn, true),
        "DEV_DEPENDENCY_OF" => (R::DevDependsOn, true),
        "BUILD_DEPENDENCY_OF" => (R::BuildDependsOn, true),
        "TEST_DEPENDENCY_OF" => (R::TestDependsOn, true),
        "RUNTIME_DEPENDENCY_OF" => (R::RuntimeDependsOn, true),
        "OPTIONAL_DEPENDENCY_OF" => (R::OptionalDependsOn, true),
        "PROVIDED_DEPENDENCY_OF" => (R::ProvidedDependsOn, true),
        "CONTAINED_BY" => (R::Contains, true),
        "DESCRIBED_BY" => (R::Describes, true),
        "GENERATES" => (R::GeneratedFrom, true),
        "DESCENDANT_OF" => (R::AncestorOf, true),
        _ => (
            value
                .parse()
                .unwrap_or_else(|e: std::convert::Infallible| match e {}),
            false,
        ),
    }
}

/// Canonical kind to SPDX relationship type; `true` when endpoints swap.
fn relationship_to_spdx(kind: &RelationshipType) -> (String, bool) {
    use RelationshipType as R;
    let inverse = match kind {
        R::DevDependsOn => "DEV_DEPENDENCY_OF",
        R::BuildDependsOn => "BUILD_DEPENDENCY_OF",
        R::TestDependsOn => "TEST_DEPENDENCY_OF",
        R::RuntimeDependsOn => "RUNTIME_DEPENDENCY_OF",
        R::OptionalDependsOn => "OPTIONAL_DEPENDENCY_OF",
        R::ProvidedDependsOn => "PROVIDED_DEPENDENCY_OF",
        R::Other(name) => return (normalize_relationship_name(name), false),
        other => return (other.as_str().to_string(), false),
    };
    (inverse.to_string(), true)
}

fn hash_algorithm_name(algorithm: &HashAlgorithm) -> String {
    match algorithm {
        HashAlgorithm::Md5 => "MD5".into(),
        HashAlgorithm::Sha1 => "SHA1".into(),
        HashAlgorithm::Sha224 => "SHA224".into(),
        HashAlgorithm::Sha256 => "SHA256".into(),
        HashAlgorithm::Sha384 => "SHA384".into(),
        HashAlgorithm::Sha512 => "SHA512".into(),
        other => other.to_string(),
    }
}

fn purpose_from_type(component_type: &ComponentType) -> String {
    component_type.to_string().to_ascii_uppercase().replace('-', "_")
}

fn type_from_purpose(purpose: Option<&str>) -> ComponentType {
    match purpose {
        None => ComponentType::Library,
        Some(p) => p
            .replace('_', "-")
            .to_ascii_lowercase()
            .parse()
            .unwrap_or_else(|e: std::convert::Infallible| match e {}),
    }
}

fn non_placeholder(value: Option<String>) -> Option<String> {
    value.filter(|v| !LicenseExpression::is_placeholder(v))
}

/// Split `Person: Jane Doe (jane@example.com)` into type, name and email.
fn parse_creator(raw: &str) -> Creator {
    let (creator_type, rest) = if let Some(rest) = raw.strip_prefix("Tool:") {
        (CreatorType::Tool, rest)
    } else if let Some(rest) = raw.strip_prefix("Organization:") {
        (CreatorType::Organization, rest)
    } else if let Some(rest) = raw.strip_prefix("Person:") {
        (CreatorType::Person, rest)
    } else {
        (CreatorType::Tool, raw)
    };
    let rest = rest.trim();

    let (name, email) = match (rest.rfind('('), rest.ends_with(')')) {
        (Some(open), true) if creator_type != CreatorType::Tool => {
            let email = rest[open + 1..rest.len() - 1].trim();
            (
                rest[..open].trim().to_string(),
                (!email.is_empty()).then(|| email.to_string()),
            )
        }
        _ => (rest.to_string(), None),
    };

    Creator {
        creator_type,
        name,
        email,
    }
}

fn format_creator(creator: &Creator) -> String {
    match &creator.email {
        Some(email) => format!("{}: {} ({})", creator.creator_type, creator.name, email),
        None => format!("{}: {}", creator.creator_type, creator.name),
    }
}

fn strip_actor_prefix(value: &str) -> &str {
    value
        .strip_prefix("Organization:")
        .or_else(|| value.strip_prefix("Person:"))
        .or_else(|| value.strip_prefix("Tool:"))
        .unwrap_or(value)
        .trim()
}

// ============================================================================
// Adapter
// ============================================================================

/// SPDX 2.3 JSON adapter
#[derive(Debug, Default, Clone, Copy)]
pub struct SpdxAdapter;

impl SpdxAdapter {
    /// Create a new SPDX adapter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn extract_version(content: &str) -> Option<String> {
        let start = content.find("\"spdxVersion\"")?;
        let rest = &content[start..];
        let open = rest.find("SPDX-")?;
        let value = &rest[open..];
        let end = value.find('"')?;
        Some(value[..end].to_string())
    }

    fn decode_metadata(doc: &mut SpdxDocument, version: String) -> Result<DocumentMetadata> {
        let creation = require(FORMAT, doc.creation_info.take(), "creationInfo", "document")?;
        let created_raw = require(FORMAT, creation.created, "created", "creationInfo")?;
        let created = parse_timestamp(FORMAT, "creationInfo.created", &created_raw)?;

        let mut extensions = std::mem::take(&mut doc.extra);
        if !creation.extra.is_empty() {
            extensions.insert(
                "creationInfo".into(),
                serde_json::Value::Object(creation.extra),
            );
        }

        let mut metadata = DocumentMetadata {
            name: doc.name.take(),
            serial_number: doc.document_namespace.take(),
            created,
            creators: creation.creators.iter().map(|c| parse_creator(c)).collect(),
            source_format: FORMAT,
            spec_version: version,
            data_license: doc.data_license.take(),
            properties: Vec::new(),
            extensions: Default::default(),
        };
        metadata.extensions.set(FORMAT, extensions);
        Ok(metadata)
    }

    /// Component ID recorded in an annotation, if present; the annotation
    /// is removed from the list.
    fn take_id_annotation(annotations: &mut Vec<SpdxAnnotation>) -> Option<ComponentId> {
        let pos = annotations
            .iter()
            .position(|a| a.comment.starts_with(ID_ANNOTATION_PREFIX))?;
        let annotation = annotations.remove(pos);
        Some(ComponentId::new(
            &annotation.comment[ID_ANNOTATION_PREFIX.len()..],
        ))
    }

    fn decode_checksums(checksums: Vec<SpdxChecksum>) -> Vec<Hash> {
        checksums
            .into_iter()
            .map(|c| {
                Hash::new(
                    c.algorithm
                        .parse()
                        .unwrap_or_else(|e: std::convert::Infallible| match e {}),
                    c.checksum_value,
                )
            })
            .collect()
    }

    fn decode_package(pkg: SpdxPackage, index: usize) -> Result<(String, Component)> {
        let context = format!("packages[{index}]");
        let spdx_id = require(FORMAT, pkg.spdx_id, "SPDXID", &context)?;
        let name = require(FORMAT, pkg.name, "name", &context)?;

        let mut annotations = pkg.annotations;
        let id = Self::take_id_annotation(&mut annotations)
            .unwrap_or_else(|| ComponentId::new(&spdx_id));

        let mut comp = Component::new(id, name);
        comp.version = pkg.version_info;
        comp.component_type = type_from_purpose(pkg.primary_package_purpose.as_deref());
        comp.description = pkg.description;
        comp.copyright = non_placeholder(pkg.copyright_text);

        if let Some(supplier) = non_placeholder(pkg.supplier) {
            comp.supplier = Some(Organization::new(strip_actor_prefix(&supplier).to_string()));
        }
        if let Some(originator) = non_placeholder(pkg.originator) {
            comp.author = Some(strip_actor_prefix(&originator).to_string());
        }

        if let Some(declared) = non_placeholder(pkg.license_declared) {
            comp.licenses.add_declared(LicenseExpression::new(declared));
        }
        if let Some(concluded) = non_placeholder(pkg.license_concluded) {
            comp.licenses.concluded = Some(LicenseExpression::new(concluded));
        }

        comp.hashes = Self::decode_checksums(pkg.checksums);

        if let Some(location) = non_placeholder(pkg.download_location) {
            comp.external_refs
                .push(ExternalReference::new(ExternalRefType::Distribution, location));
        }
        if let Some(homepage) = non_placeholder(pkg.homepage) {
            comp.external_refs
                .push(ExternalReference::new(ExternalRefType::Website, homepage));
        }

        let mut kept_refs = Vec::new();
        for ext in pkg.external_refs {
            match (ext.reference_category.as_str(), ext.reference_type.as_str()) {
                ("PACKAGE-MANAGER" | "PACKAGE_MANAGER", "purl") if comp.purl.is_none() => {
                    comp.purl = Some(ext.reference_locator);
                }
                ("SECURITY", "cpe23Type" | "cpe22Type") => comp.cpes.push(ext.reference_locator),
                ("SECURITY", "advisory") => comp.external_refs.push(ExternalReference {
                    ref_type: ExternalRefType::Advisories,
                    url: ext.reference_locator,
                    comment: ext.comment,
                }),
                ("OTHER", ref_type) => comp.external_refs.push(ExternalReference {
                    ref_type: ref_type
                        .parse()
                        .unwrap_or_else(|e: std::convert::Infallible| match e {}),
                    url: ext.reference_locator,
                    comment: ext.comment,
                }),
                _ => kept_refs.push(ext),
            }
        }

        let mut extra = pkg.extra;
        if comp.component_type == ComponentType::File {
            extra.insert(PURPOSE_KEY.into(), "FILE".into());
        }
        if !kept_refs.is_empty() {
            if let Ok(value) = serde_json::to_value(&kept_refs) {
                extra.insert("externalRefs".into(), value);
            }
        }
        if !annotations.is_empty() {
            if let Ok(value) = serde_json::to_value(&annotations) {
                extra.insert("annotations".into(), value);
            }
        }
        comp.extensions.set(FORMAT, extra);

        Ok((spdx_id, comp))
    }

    fn decode_file(file: SpdxFile, index: usize) -> Result<(String, Component)> {
        let context = format!("files[{index}]");
        let spdx_id = require(FORMAT, file.spdx_id, "SPDXID", &context)?;
        let name = require(FORMAT, file.file_name, "fileName", &context)?;

        let mut annotations = file.annotations;
        let id = Self::take_id_annotation(&mut annotations)
            .unwrap_or_else(|| ComponentId::new(&spdx_id));

        let mut comp = Component::new(id, name).with_type(ComponentType::File);
        comp.hashes = Self::decode_checksums(file.checksums);
        comp.copyright = non_placeholder(file.copyright_text);
        if let Some(concluded) = non_placeholder(file.license_concluded) {
            comp.licenses.concluded = Some(LicenseExpression::new(concluded));
        }
        for info in file.license_info_in_files {
            if !LicenseExpression::is_placeholder(&info) {
                comp.licenses.add_declared(LicenseExpression::new(info));
            }
        }
        let mut extra = file.extra;
        if !annotations.is_empty() {
            if let Ok(value) = serde_json::to_value(&annotations) {
                extra.insert("annotations".into(), value);
            }
        }
        comp.extensions.set(FORMAT, extra);
        Ok((spdx_id, comp))
    }

    fn is_external_element(element: &str) -> bool {
        element == NOASSERTION || element == "NONE" || element.starts_with("DocumentRef-")
    }

    fn decode_document(&self, content: &[u8]) -> Result<CanonicalSbom> {
        let mut doc: SpdxDocument = json::from_slice(FORMAT, content)?;

        let version = require(FORMAT, doc.spdx_version.take(), "spdxVersion", "document")?;
        if !self.supported_versions().contains(&version.as_str()) {
            return Err(crate::error::SitError::unsupported_version(
                FORMAT,
                version,
                self.supported_versions(),
            ));
        }
        let document_id = require(FORMAT, doc.spdx_id.take(), "SPDXID", "document")?;
        require(FORMAT, doc.name.as_ref(), "name", "document")?;

        let metadata = Self::decode_metadata(&mut doc, version)?;
        let mut sbom = CanonicalSbom::new(metadata);

        // SPDX element ID -> component ID
        let mut elements: HashMap<String, ComponentId> = HashMap::new();

        for (idx, pkg) in std::mem::take(&mut doc.packages).into_iter().enumerate() {
            let (spdx_id, comp) = Self::decode_package(pkg, idx)?;
            Self::insert_element(&mut sbom, &mut elements, spdx_id, comp)?;
        }
        for (idx, file) in std::mem::take(&mut doc.files).into_iter().enumerate() {
            let (spdx_id, comp) = Self::decode_file(file, idx)?;
            Self::insert_element(&mut sbom, &mut elements, spdx_id, comp)?;
        }

        for described in &doc.document_describes {
            if let Some(id) = elements.get(described) {
                sbom.add_root(id.clone());
            }
        }

        for rel in &doc.relationships {
            let (kind, reversed) = relationship_from_spdx(&rel.relationship_type);
            let (from, to) = if reversed {
                (&rel.related_spdx_element, &rel.spdx_element_id)
            } else {
                (&rel.spdx_element_id, &rel.related_spdx_element)
            };

            if kind == RelationshipType::Describes && *from == document_id {
                match elements.get(to.as_str()) {
                    Some(id) => sbom.add_root(id.clone()),
                    None => tracing::warn!(element = %to, "document describes an unknown element"),
                }
                continue;
            }
            if *from == document_id || *to == document_id {
                tracing::debug!(
                    relationship = %rel.relationship_type,
                    "skipping document-level relationship"
                );
                continue;
            }
            if Self::is_external_element(from) || Self::is_external_element(to) {
                tracing::debug!(
                    from = %from, to = %to,
                    "skipping relationship to external or placeholder element"
                );
                continue;
            }

            match (elements.get(from.as_str()), elements.get(to.as_str())) {
                (Some(f), Some(t)) => {
                    sbom.add_relationship(Relationship::new(f.clone(), t.clone(), kind));
                }
                _ => tracing::warn!(
                    from = %from, to = %to, kind = %kind,
                    "dropping relationship that references an unknown SPDX element"
                ),
            }
        }

        tracing::debug!(
            components = sbom.component_count(),
            relationships = sbom.relationship_count(),
            "decoded SPDX document"
        );
        Ok(sbom)
    }

    fn insert_element(
        sbom: &mut CanonicalSbom,
        elements: &mut HashMap<String, ComponentId>,
        spdx_id: String,
        comp: Component,
    ) -> Result<()> {
        if elements.contains_key(&spdx_id) || sbom.contains(comp.id.as_str()) {
            return Err(crate::error::SitError::malformed(
                FORMAT,
                "element identifiers",
                crate::error::MalformedKind::DuplicateId(spdx_id),
            ));
        }
        elements.insert(spdx_id, comp.id.clone());
        sbom.add_component(comp);
        Ok(())
    }

    /// Assign a unique SPDX element ID to every component.
    fn element_ids(sbom: &CanonicalSbom) -> HashMap<ComponentId, String> {
        let mut taken: HashSet<String> = HashSet::from([DOCUMENT_ID.to_string()]);
        let mut ids = HashMap::with_capacity(sbom.component_count());
        for id in sbom.components.keys() {
            let base = spdx_element_id(id);
            let mut candidate = base.clone();
            let mut suffix = 2;
            while taken.contains(&candidate) {
                candidate = format!("{base}-{suffix}");
                suffix += 1;
            }
            taken.insert(candidate.clone());
            ids.insert(id.clone(), candidate);
        }
        ids
    }

    /// Whether a component is written as a `files[]` element
    fn is_file_element(comp: &Component) -> bool {
        comp.component_type == ComponentType::File
            && !comp
                .extensions
                .get(FORMAT)
                .is_some_and(|e| e.contains_key(PURPOSE_KEY))
    }

    /// Stored annotations plus the component ID annotation when the element
    /// ID differs from it.
    fn encode_annotations(
        comp: &Component,
        spdx_id: &str,
        annotation_date: &str,
    ) -> Vec<SpdxAnnotation> {
        let mut annotations: Vec<SpdxAnnotation> = comp
            .extensions
            .get(FORMAT)
            .and_then(|s| s.get("annotations"))
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default();
        if spdx_id != comp.id.as_str() {
            annotations.push(SpdxAnnotation {
                annotator: ID_ANNOTATOR.into(),
                annotation_date: annotation_date.to_string(),
                annotation_type: "OTHER".into(),
                comment: format!("{ID_ANNOTATION_PREFIX}{}", comp.id),
            });
        }
        annotations
    }

    fn encode_checksums(
        comp: &Component,
        support: &FieldSupport,
        recorder: &mut LossRecorder,
    ) -> Result<Vec<SpdxChecksum>> {
        let mut checksums = Vec::with_capacity(comp.hashes.len());
        for hash in &comp.hashes {
            if support.supports_hash(&hash.algorithm) {
                checksums.push(SpdxChecksum {
                    algorithm: hash_algorithm_name(&hash.algorithm),
                    checksum_value: hash.value.clone(),
                });
            } else {
                recorder.drop_field(
                    comp.id.as_str(),
                    "hashes",
                    format!("checksum algorithm '{}' is not an SPDX algorithm", hash.algorithm),
                )?;
            }
        }
        Ok(checksums)
    }

    fn encode_file(
        comp: &Component,
        spdx_id: &str,
        annotation_date: &str,
        recorder: &mut LossRecorder,
    ) -> Result<SpdxFile> {
        let support = &SPDX_FILE_SUPPORT;
        support.record_unsupported(comp, recorder)?;

        Ok(SpdxFile {
            spdx_id: Some(spdx_id.to_string()),
            file_name: Some(comp.name.clone()),
            checksums: Self::encode_checksums(comp, support, recorder)?,
            license_concluded: Some(
                comp.licenses
                    .concluded
                    .as_ref()
                    .map_or_else(|| NOASSERTION.into(), |l| l.expression.clone()),
            ),
            license_info_in_files: comp
                .licenses
                .declared
                .iter()
                .map(|l| l.expression.clone())
                .collect(),
            copyright_text: Some(
                comp.copyright
                    .clone()
                    .unwrap_or_else(|| NOASSERTION.into()),
            ),
            annotations: Self::encode_annotations(comp, spdx_id, annotation_date),
            extra: extension_fields(comp.extensions.get(FORMAT), FILE_FIELDS),
        })
    }

    fn encode_package(
        comp: &Component,
        spdx_id: &str,
        annotation_date: &str,
        recorder: &mut LossRecorder,
    ) -> Result<SpdxPackage> {
        let support = FieldSupport::for_format(FORMAT);
        let subject = comp.id.as_str();

        let stored = comp.extensions.get(FORMAT);
        let extra = extension_fields(stored, PACKAGE_FIELDS);
        let annotations = Self::encode_annotations(comp, spdx_id, annotation_date);

        let purpose = if support.supports_component_type(&comp.component_type) {
            Some(purpose_from_type(&comp.component_type))
        } else {
            recorder.drop_field(
                subject,
                "type",
                format!("'{}' has no primaryPackagePurpose value", comp.component_type),
            )?;
            None
        };

        support.record_unsupported(comp, recorder)?;

        // A single declared slot; several licenses become their conjunction
        let declared = match comp.licenses.declared.as_slice() {
            [] => None,
            [single] => Some(single.expression.clone()),
            many => LicenseExpression::conjunction(many).map(|e| e.expression),
        };
        let checksums = Self::encode_checksums(comp, support, recorder)?;

        let mut external_refs: Vec<SpdxExternalRef> = stored
            .and_then(|s| s.get("externalRefs"))
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default();
        if let Some(purl) = &comp.purl {
            external_refs.push(SpdxExternalRef {
                reference_category: "PACKAGE-MANAGER".into(),
                reference_type: "purl".into(),
                reference_locator: purl.clone(),
                comment: None,
            });
        }
        for cpe in &comp.cpes {
            let reference_type = if cpe.starts_with("cpe:2.3:") {
                "cpe23Type"
            } else {
                "cpe22Type"
            };
            external_refs.push(SpdxExternalRef {
                reference_category: "SECURITY".into(),
                reference_type: reference_type.into(),
                reference_locator: cpe.clone(),
                comment: None,
            });
        }

        let mut download_location = None;
        let mut homepage = None;
        for ext in &comp.external_refs {
            match ext.ref_type {
                ExternalRefType::Distribution if download_location.is_none() && ext.comment.is_none() => {
                    download_location = Some(ext.url.clone());
                }
                ExternalRefType::Website if homepage.is_none() && ext.comment.is_none() => {
                    homepage = Some(ext.url.clone());
                }
                ExternalRefType::Advisories => external_refs.push(SpdxExternalRef {
                    reference_category: "SECURITY".into(),
                    reference_type: "advisory".into(),
                    reference_locator: ext.url.clone(),
                    comment: ext.comment.clone(),
                }),
                _ => external_refs.push(SpdxExternalRef {
                    reference_category: "OTHER".into(),
                    reference_type: ext.ref_type.to_string(),
                    reference_locator: ext.url.clone(),
                    comment: ext.comment.clone(),
                }),
            }
        }

        Ok(SpdxPackage {
            spdx_id: Some(spdx_id.to_string()),
            name: Some(comp.name.clone()),
            version_info: comp.version.clone(),
            supplier: comp
                .supplier
                .as_ref()
                .map(|s| format!("Organization: {}", s.name)),
            originator: comp.author.as_ref().map(|a| {
                if a.starts_with("Person:") || a.starts_with("Organization:") {
                    a.clone()
                } else {
                    format!("Person: {a}")
                }
            }),
            download_location: Some(download_location.unwrap_or_else(|| NOASSERTION.into())),
            homepage,
            license_concluded: Some(
                comp.licenses
                    .concluded
                    .as_ref()
                    .map_or_else(|| NOASSERTION.into(), |l| l.expression.clone()),
            ),
            license_declared: Some(declared.unwrap_or_else(|| NOASSERTION.into())),
            copyright_text: Some(
                comp.copyright
                    .clone()
                    .unwrap_or_else(|| NOASSERTION.into()),
            ),
            description: comp.description.clone(),
            primary_package_purpose: purpose,
            checksums,
            external_refs,
            annotations,
            extra,
        })
    }
}

impl FormatAdapter for SpdxAdapter {
    fn format(&self) -> SbomFormat {
        FORMAT
    }

    fn supported_versions(&self) -> &'static [&'static str] {
        &["SPDX-2.2", "SPDX-2.3"]
    }

    fn detect(&self, content: &[u8]) -> FormatDetection {
        if !json::looks_like_json_object(content) {
            return FormatDetection::no_match();
        }
        let text = json::preview(content);
        let has_spdx_version = text.contains("\"spdxVersion\"");
        let has_spdx_id = text.contains("\"SPDXID\"");
        let has_data_license = text.contains("\"dataLicense\"");

        let confidence = if has_spdx_version && has_spdx_id {
            FormatConfidence::CERTAIN
        } else if has_spdx_version || (has_spdx_id && has_data_license) {
            FormatConfidence::HIGH
        } else {
            return FormatDetection::no_match();
        };

        let mut detection = FormatDetection::with_confidence(confidence);
        if let Some(v) = Self::extract_version(&text) {
            detection = detection.version(&v);
        }
        detection
    }

    fn decode(&self, content: &[u8]) -> Result<CanonicalSbom> {
        self.decode_document(content)
    }

    fn encode(&self, sbom: &CanonicalSbom, options: &EncodeOptions) -> Result<Encoded> {
        let mut recorder = LossRecorder::new(FORMAT, options.policy);
        let support = self.field_support();
        let doc_meta = &sbom.document;
        let created = format_timestamp(&doc_meta.created);

        recorder.drop_if(
            !doc_meta.properties.is_empty(),
            "document",
            "properties",
            "SPDX documents have no property list",
        )?;

        let element_ids = Self::element_ids(sbom);
        let mut packages = Vec::with_capacity(sbom.component_count());
        let mut files = Vec::new();
        for comp in sbom.components.values() {
            let spdx_id = &element_ids[&comp.id];
            if Self::is_file_element(comp) {
                files.push(Self::encode_file(comp, spdx_id, &created, &mut recorder)?);
            } else {
                packages.push(Self::encode_package(comp, spdx_id, &created, &mut recorder)?);
            }
        }

        let mut relationships: Vec<SpdxRelationship> = sbom
            .roots
            .iter()
            .filter_map(|root| element_ids.get(root))
            .map(|spdx_id| SpdxRelationship {
                spdx_element_id: DOCUMENT_ID.into(),
                relationship_type: "DESCRIBES".into(),
                related_spdx_element: spdx_id.clone(),
                comment: None,
            })
            .collect();

        for rel in &sbom.relationships {
            if !support.supports_relationship(&rel.kind) {
                recorder.drop_field(
                    format!("{} -> {}", rel.from, rel.to),
                    "relationship",
                    format!("{} has no SPDX relationship type", rel.kind),
                )?;
                continue;
            }
            let (Some(from), Some(to)) = (element_ids.get(&rel.from), element_ids.get(&rel.to))
            else {
                continue;
            };
            let (relationship_type, reversed) = relationship_to_spdx(&rel.kind);
            let (element, related) = if reversed { (to, from) } else { (from, to) };
            relationships.push(SpdxRelationship {
                spdx_element_id: element.clone(),
                relationship_type,
                related_spdx_element: related.clone(),
                comment: None,
            });
        }

        let mut creators: Vec<String> = doc_meta.creators.iter().map(format_creator).collect();
        if creators.is_empty() {
            creators.push(format_creator(&Creator::this_tool()));
        }

        let stored = doc_meta.extensions.get(FORMAT);
        let creation_extra = stored
            .and_then(|s| s.get("creationInfo"))
            .and_then(serde_json::Value::as_object)
            .cloned()
            .unwrap_or_default();
        let doc_extra = extension_fields(stored, DOCUMENT_FIELDS);

        let name = doc_meta
            .name
            .clone()
            .or_else(|| sbom.root_components().next().map(|c| c.name.clone()))
            .unwrap_or_else(|| "sbom".to_string());

        let doc = SpdxDocument {
            spdx_version: Some(OUTPUT_VERSION.into()),
            spdx_id: Some(DOCUMENT_ID.into()),
            name: Some(name),
            data_license: Some(
                doc_meta
                    .data_license
                    .clone()
                    .unwrap_or_else(|| "CC0-1.0".into()),
            ),
            document_namespace: Some(
                doc_meta
                    .serial_number
                    .clone()
                    .unwrap_or_else(|| sbom.derive_serial()),
            ),
            creation_info: Some(SpdxCreationInfo {
                created: Some(created),
                creators,
                extra: creation_extra,
            }),
            document_describes: Vec::new(),
            packages,
            files,
            relationships,
            extra: doc_extra,
        };

        let bytes = json::to_vec(FORMAT, &doc, options.pretty)?;
        Ok(recorder.finish(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{MalformedKind, SitError};

    const SAMPLE: &str = r#"{
        "spdxVersion": "SPDX-2.3",
        "SPDXID": "SPDXRef-DOCUMENT",
        "name": "demo",
        "dataLicense": "CC0-1.0",
        "documentNamespace": "https://example.com/demo-1",
        "creationInfo": {
            "created": "2024-01-15T08:00:00Z",
            "creators": ["Tool: builder-1.0", "Person: Jane Doe (jane@example.com)"],
            "licenseListVersion": "3.22"
        },
        "packages": [
            {
                "SPDXID": "SPDXRef-app",
                "name": "app",
                "versionInfo": "2.0",
                "downloadLocation": "NOASSERTION",
                "primaryPackagePurpose": "APPLICATION",
                "filesAnalyzed": false
            },
            {
                "SPDXID": "SPDXRef-zlib",
                "name": "zlib",
                "versionInfo": "1.3",
                "supplier": "Organization: zlib project",
                "downloadLocation": "https://zlib.net/zlib-1.3.tar.gz",
                "licenseConcluded": "Zlib",
                "licenseDeclared": "Zlib",
                "checksums": [{"algorithm": "SHA256", "checksumValue": "abc123"}],
                "externalRefs": [
                    {"referenceCategory": "PACKAGE-MANAGER", "referenceType": "purl",
                     "referenceLocator": "pkg:generic/zlib@1.3"},
                    {"referenceCategory": "PERSISTENT-ID", "referenceType": "swh",
                     "referenceLocator": "swh:1:cnt:94a9ed024d3859793618152ea559a168bbcbb5e2"}
                ]
            }
        ],
        "relationships": [
            {"spdxElementId": "SPDXRef-DOCUMENT", "relationshipType": "DESCRIBES",
             "relatedSpdxElement": "SPDXRef-app"},
            {"spdxElementId": "SPDXRef-zlib", "relationshipType": "DEPENDENCY_OF",
             "relatedSpdxElement": "SPDXRef-app"},
            {"spdxElementId": "SPDXRef-app", "relationshipType": "DEPENDS_ON",
             "relatedSpdxElement": "NOASSERTION"}
        ]
    }"#;

    #[test]
    fn test_decode_sample() {
        let sbom = SpdxAdapter::new().decode(SAMPLE.as_bytes()).unwrap();
        assert_eq!(sbom.roots, vec![ComponentId::new("SPDXRef-app")]);
        assert_eq!(sbom.component_count(), 2);
        assert_eq!(sbom.document.spec_version, "SPDX-2.3");
        assert_eq!(sbom.document.creators.len(), 2);
        assert_eq!(
            sbom.document.creators[1].email.as_deref(),
            Some("jane@example.com")
        );

        let zlib = sbom.component("SPDXRef-zlib").unwrap();
        assert_eq!(zlib.supplier.as_ref().unwrap().name, "zlib project");
        assert_eq!(zlib.purl.as_deref(), Some("pkg:generic/zlib@1.3"));
        assert_eq!(zlib.hash_value(&HashAlgorithm::Sha256), Some("abc123"));
        assert_eq!(zlib.external_refs[0].ref_type, ExternalRefType::Distribution);
        assert!(zlib
            .extensions
            .get(SbomFormat::Spdx)
            .is_some_and(|e| e.contains_key("externalRefs")));

        assert_eq!(
            sbom.component("SPDXRef-app").unwrap().component_type,
            ComponentType::Application
        );
        // DEPENDENCY_OF is normalised to a forward DEPENDS_ON edge
        assert!(sbom
            .relationships
            .contains(&Relationship::depends_on("SPDXRef-app", "SPDXRef-zlib")));
        assert_eq!(sbom.relationship_count(), 1);
    }

    #[test]
    fn test_decode_missing_version() {
        let err = SpdxAdapter::new()
            .decode(br#"{"SPDXID": "SPDXRef-DOCUMENT", "name": "x"}"#)
            .unwrap_err();
        match err {
            SitError::MalformedDocument {
                source: MalformedKind::MissingField { field, .. },
                ..
            } => assert_eq!(field, "spdxVersion"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_decode_unsupported_version() {
        let err = SpdxAdapter::new()
            .decode(br#"{"spdxVersion": "SPDX-1.2", "SPDXID": "SPDXRef-DOCUMENT", "name": "x"}"#)
            .unwrap_err();
        assert!(matches!(
            err,
            SitError::MalformedDocument {
                source: MalformedKind::UnsupportedVersion { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_round_trip_preserves_extensions() {
        let adapter = SpdxAdapter::new();
        let first = adapter.decode(SAMPLE.as_bytes()).unwrap();
        let encoded = adapter.encode(&first, &EncodeOptions::default()).unwrap();
        assert!(encoded.warnings.is_empty(), "{:?}", encoded.warnings);
        let text = encoded.as_text();
        assert!(text.contains("\"licenseListVersion\": \"3.22\""));
        assert!(text.contains("swh:1:cnt"));

        let second = adapter.decode(&encoded.bytes).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_non_spdx_ids_survive_via_annotation() {
        let mut sbom = CanonicalSbom::default();
        sbom.add_component(Component::new("pkg:npm/left-pad@1.3.0", "left-pad"));
        sbom.add_component(Component::new("pkg:npm/left_pad@1.3.0", "left_pad"));
        sbom.add_relationship(Relationship::depends_on(
            "pkg:npm/left-pad@1.3.0",
            "pkg:npm/left_pad@1.3.0",
        ));
        sbom.add_root("pkg:npm/left-pad@1.3.0");

        let adapter = SpdxAdapter::new();
        let encoded = adapter.encode(&sbom, &EncodeOptions::default()).unwrap();
        let text = encoded.as_text();
        // both sanitise to the same base, the second gets a suffix
        assert!(text.contains("SPDXRef-pkg-npm-left-pad-1.3.0\""));
        assert!(text.contains("SPDXRef-pkg-npm-left-pad-1.3.0-2\""));

        let back = adapter.decode(&encoded.bytes).unwrap();
        assert!(back.contains("pkg:npm/left-pad@1.3.0"));
        assert!(back.contains("pkg:npm/left_pad@1.3.0"));
        assert_eq!(back.roots, sbom.roots);
        assert_eq!(back.relationships, sbom.relationships);
    }

    #[test]
    fn test_inverse_kinds_encode_reversed() {
        let mut sbom = CanonicalSbom::default();
        sbom.add_component(Component::new("SPDXRef-a", "a"));
        sbom.add_component(Component::new("SPDXRef-b", "b"));
        sbom.add_relationship(Relationship::new(
            "SPDXRef-a",
            "SPDXRef-b",
            RelationshipType::DevDependsOn,
        ));
        let encoded = SpdxAdapter::new()
            .encode(&sbom, &EncodeOptions::default())
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&encoded.bytes).unwrap();
        let rel = &value["relationships"][0];
        assert_eq!(rel["spdxElementId"], "SPDXRef-b");
        assert_eq!(rel["relationshipType"], "DEV_DEPENDENCY_OF");
        assert_eq!(rel["relatedSpdxElement"], "SPDXRef-a");

        let back = SpdxAdapter::new().decode(&encoded.bytes).unwrap();
        assert_eq!(back.relationships, sbom.relationships);
    }

    #[test]
    fn test_unknown_relationship_kind_warns_or_refuses() {
        let mut sbom = CanonicalSbom::default();
        sbom.add_component(Component::new("SPDXRef-a", "a"));
        sbom.add_component(Component::new("SPDXRef-b", "b"));
        sbom.add_relationship(Relationship::new(
            "SPDXRef-a",
            "SPDXRef-b",
            RelationshipType::Other("IMPORTS".into()),
        ));

        let adapter = SpdxAdapter::new();
        let encoded = adapter.encode(&sbom, &EncodeOptions::default()).unwrap();
        assert_eq!(encoded.warnings.len(), 1);
        assert_eq!(encoded.warnings[0].field, "relationship");

        let err = adapter.encode(&sbom, &EncodeOptions::strict()).unwrap_err();
        assert!(err.to_string().contains("IMPORTS"));
    }

    #[test]
    fn test_files_decode_as_file_components() {
        let content = r#"{
            "spdxVersion": "SPDX-2.3", "SPDXID": "SPDXRef-DOCUMENT", "name": "files",
            "creationInfo": {"created": "2024-01-01T00:00:00Z", "creators": ["Tool: x"]},
            "files": [{"SPDXID": "SPDXRef-File-1", "fileName": "./src/main.c",
                       "checksums": [{"algorithm": "SHA1", "checksumValue": "ff"}],
                       "licenseInfoInFiles": ["MIT", "NOASSERTION"]}]
        }"#;
        let sbom = SpdxAdapter::new().decode(content.as_bytes()).unwrap();
        let file = sbom.component("SPDXRef-File-1").unwrap();
        assert_eq!(file.component_type, ComponentType::File);
        assert_eq!(file.name, "./src/main.c");
        assert_eq!(file.licenses.declared.len(), 1);
    }

    #[test]
    fn test_relationship_types_ignore_case() {
        let content = r#"{
            "spdxVersion": "SPDX-2.3", "SPDXID": "SPDXRef-DOCUMENT", "name": "case",
            "creationInfo": {"created": "2024-01-01T00:00:00Z", "creators": ["Tool: x"]},
            "packages": [
                {"SPDXID": "SPDXRef-a", "name": "a"},
                {"SPDXID": "SPDXRef-b", "name": "b"},
                {"SPDXID": "SPDXRef-c", "name": "c"}
            ],
            "relationships": [
                {"spdxElementId": "SPDXRef-DOCUMENT", "relationshipType": "describes",
                 "relatedSpdxElement": "SPDXRef-a"},
                {"spdxElementId": "SPDXRef-a", "relationshipType": "depends_on",
                 "relatedSpdxElement": "SPDXRef-b"},
                {"spdxElementId": "SPDXRef-c", "relationshipType": "dependency_of",
                 "relatedSpdxElement": "SPDXRef-a"},
                {"spdxElementId": "SPDXRef-b", "relationshipType": "example-of",
                 "relatedSpdxElement": "SPDXRef-c"}
            ]
        }"#;
        let adapter = SpdxAdapter::new();
        let sbom = adapter.decode(content.as_bytes()).unwrap();
        assert_eq!(sbom.roots, vec![ComponentId::new("SPDXRef-a")]);
        assert!(sbom
            .relationships
            .contains(&Relationship::depends_on("SPDXRef-a", "SPDXRef-b")));
        assert!(sbom
            .relationships
            .contains(&Relationship::depends_on("SPDXRef-a", "SPDXRef-c")));
        assert!(sbom.relationships.contains(&Relationship::new(
            "SPDXRef-b",
            "SPDXRef-c",
            RelationshipType::Other("example-of".into())
        )));

        // passthrough kinds are written in their canonical SPDX spelling
        let encoded = adapter.encode(&sbom, &EncodeOptions::strict()).unwrap();
        assert!(encoded.as_text().contains("\"EXAMPLE_OF\""));
    }

    #[test]
    fn test_file_purpose_package_stays_a_package() {
        let content = r#"{
            "spdxVersion": "SPDX-2.3", "SPDXID": "SPDXRef-DOCUMENT", "name": "purpose",
            "dataLicense": "CC0-1.0", "documentNamespace": "https://example.com/purpose",
            "creationInfo": {"created": "2024-01-01T00:00:00Z", "creators": ["Tool: x"]},
            "packages": [{"SPDXID": "SPDXRef-notes", "name": "NOTES",
                          "primaryPackagePurpose": "FILE", "filesAnalyzed": false}],
            "files": [{"SPDXID": "SPDXRef-File-1", "fileName": "./a.c",
                       "fileTypes": ["SOURCE"]}]
        }"#;
        let adapter = SpdxAdapter::new();
        let sbom = adapter.decode(content.as_bytes()).unwrap();
        assert_eq!(
            sbom.component("SPDXRef-notes").unwrap().component_type,
            ComponentType::File
        );

        let encoded = adapter.encode(&sbom, &EncodeOptions::strict()).unwrap();
        let doc: serde_json::Value = serde_json::from_slice(&encoded.bytes).unwrap();
        assert_eq!(doc["packages"].as_array().unwrap().len(), 1);
        assert_eq!(doc["packages"][0]["SPDXID"], "SPDXRef-notes");
        assert_eq!(doc["files"].as_array().unwrap().len(), 1);
        assert_eq!(doc["files"][0]["fileTypes"][0], "SOURCE");
        assert_eq!(adapter.decode(&encoded.bytes).unwrap(), sbom);
    }

    #[test]
    fn test_file_without_package_fields() {
        let mut sbom = CanonicalSbom::default();
        sbom.add_component(
            Component::new("SPDXRef-File-x", "./x.bin")
                .with_type(ComponentType::File)
                .with_version("1.0")
                .with_hash(HashAlgorithm::Sha1, "ff"),
        );
        let adapter = SpdxAdapter::new();
        let encoded = adapter.encode(&sbom, &EncodeOptions::default()).unwrap();
        assert_eq!(encoded.warnings.len(), 1);
        assert_eq!(encoded.warnings[0].field, "version");
        assert!(adapter.encode(&sbom, &EncodeOptions::strict()).is_err());

        let back = adapter.decode(&encoded.bytes).unwrap();
        let file = back.component("SPDXRef-File-x").unwrap();
        assert_eq!(file.component_type, ComponentType::File);
        assert_eq!(file.version, None);
        assert_eq!(file.hash_value(&HashAlgorithm::Sha1), Some("ff"));
    }

    #[test]
    fn test_detect() {
        let adapter = SpdxAdapter::new();
        let detection = adapter.detect(SAMPLE.as_bytes());
        assert_eq!(detection.confidence, FormatConfidence::CERTAIN);
        assert_eq!(detection.version.as_deref(), Some("SPDX-2.3"));
        assert_eq!(
            adapter.detect(br#"{"bomFormat": "CycloneDX"}"#).confidence,
            FormatConfidence::NONE
        );
    }

    #[test]
    fn test_parse_creator_forms() {
        let tool = parse_creator("Tool: sit-0.1.0");
        assert_eq!(tool.creator_type, CreatorType::Tool);
        assert_eq!(tool.name, "sit-0.1.0");
        let org = parse_creator("Organization: ACME ()");
        assert_eq!(org.name, "ACME");
        assert_eq!(org.email, None);
        assert_eq!(format_creator(&parse_creator("Person: Jo (jo@x.io)")), "Person: Jo (jo@x.io)");
    }
}
