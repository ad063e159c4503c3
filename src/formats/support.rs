//! Per-format field-support table.
//!
//! Static data derived from each standard's published schema: SPDX 2.3
//! (`spdx-schema.json`), CycloneDX 1.6 (`bom-1.6.schema.json`) and OSSBOM
//! 1.0. Encoders consult these tables instead of branching on format names;
//! anything a table rejects goes through the loss recorder.

use super::traits::LossRecorder;
use crate::error::Result;
use crate::model::{
    normalize_relationship_name, Component, ComponentType, HashAlgorithm, RelationshipType,
    SbomFormat,
};

/// How many values of a multi-valued field a format can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    None,
    One,
    Many,
}

/// Which `RelationshipType::Other` names pass through unchanged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Passthrough {
    None,
    Named(&'static [&'static str]),
    Any,
}

/// Canonical fields representable in one format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSupport {
    pub format: SbomFormat,
    /// Named relationship kinds with a native representation
    pub relationships: &'static [RelationshipType],
    /// `Other(..)` relationship kinds that pass through by name
    pub other_relationships: Passthrough,
    /// Hash algorithms with a native name; `None` accepts any
    pub hash_algorithms: Option<&'static [HashAlgorithm]>,
    /// `HashAlgorithm::Other` names that pass through
    pub other_hash_algorithms: Passthrough,
    /// Component types with a native value; `None` accepts any
    pub component_types: Option<&'static [ComponentType]>,
    pub version: bool,
    pub declared_licenses: Cardinality,
    pub concluded_license: bool,
    pub supplier: bool,
    pub supplier_urls: bool,
    pub author: bool,
    pub group: bool,
    pub description: bool,
    pub copyright: bool,
    pub purl: bool,
    pub cpes: Cardinality,
    pub external_refs: bool,
    pub properties: bool,
}

const ALL_NAMED_RELATIONSHIPS: &[RelationshipType] = &[
    RelationshipType::DependsOn,
    RelationshipType::DevDependsOn,
    RelationshipType::BuildDependsOn,
    RelationshipType::TestDependsOn,
    RelationshipType::RuntimeDependsOn,
    RelationshipType::OptionalDependsOn,
    RelationshipType::ProvidedDependsOn,
    RelationshipType::Contains,
    RelationshipType::Describes,
    RelationshipType::GeneratedFrom,
    RelationshipType::AncestorOf,
    RelationshipType::VariantOf,
    RelationshipType::CopyOf,
    RelationshipType::PatchFor,
    RelationshipType::DistributionArtifact,
    RelationshipType::StaticLink,
    RelationshipType::DynamicLink,
];

/// SPDX 2.3 relationship types without a canonical name, kept verbatim
pub const SPDX_EXTRA_RELATIONSHIPS: &[&str] = &[
    "AMENDS",
    "BUILD_TOOL_OF",
    "DATA_FILE_OF",
    "DEPENDENCY_MANIFEST_OF",
    "DEV_TOOL_OF",
    "DOCUMENTATION_OF",
    "EXAMPLE_OF",
    "EXPANDED_FROM_ARCHIVE",
    "FILE_ADDED",
    "FILE_DELETED",
    "FILE_MODIFIED",
    "HAS_PREREQUISITE",
    "METAFILE_OF",
    "OPTIONAL_COMPONENT_OF",
    "OTHER",
    "PACKAGE_OF",
    "PATCH_APPLIED",
    "PREREQUISITE_FOR",
    "REQUIREMENT_DESCRIPTION_FOR",
    "SPECIFICATION_FOR",
    "TEST_CASE_OF",
    "TEST_OF",
    "TEST_TOOL_OF",
];

/// SPDX 2.3 checksum algorithms outside the canonical enum
pub const SPDX_EXTRA_HASHES: &[&str] = &["MD2", "MD4", "MD6", "ADLER32"];

const SPDX_HASHES: &[HashAlgorithm] = &[
    HashAlgorithm::Md5,
    HashAlgorithm::Sha1,
    HashAlgorithm::Sha224,
    HashAlgorithm::Sha256,
    HashAlgorithm::Sha384,
    HashAlgorithm::Sha512,
    HashAlgorithm::Sha3_256,
    HashAlgorithm::Sha3_384,
    HashAlgorithm::Sha3_512,
    HashAlgorithm::Blake2b256,
    HashAlgorithm::Blake2b384,
    HashAlgorithm::Blake2b512,
    HashAlgorithm::Blake3,
];

const CYCLONEDX_HASHES: &[HashAlgorithm] = &[
    HashAlgorithm::Md5,
    HashAlgorithm::Sha1,
    HashAlgorithm::Sha256,
    HashAlgorithm::Sha384,
    HashAlgorithm::Sha512,
    HashAlgorithm::Sha3_256,
    HashAlgorithm::Sha3_384,
    HashAlgorithm::Sha3_512,
    HashAlgorithm::Blake2b256,
    HashAlgorithm::Blake2b384,
    HashAlgorithm::Blake2b512,
    HashAlgorithm::Blake3,
];

/// `primaryPackagePurpose` values
const SPDX_TYPES: &[ComponentType] = &[
    ComponentType::Application,
    ComponentType::Framework,
    ComponentType::Library,
    ComponentType::Container,
    ComponentType::OperatingSystem,
    ComponentType::Device,
    ComponentType::Firmware,
    ComponentType::Source,
    ComponentType::Archive,
    ComponentType::File,
    ComponentType::Install,
];

/// `files[]` elements carry no type of their own
const SPDX_FILE_TYPES: &[ComponentType] = &[ComponentType::File];

const CYCLONEDX_TYPES: &[ComponentType] = &[
    ComponentType::Application,
    ComponentType::Framework,
    ComponentType::Library,
    ComponentType::Container,
    ComponentType::Platform,
    ComponentType::OperatingSystem,
    ComponentType::Device,
    ComponentType::DeviceDriver,
    ComponentType::Firmware,
    ComponentType::File,
    ComponentType::MachineLearningModel,
    ComponentType::Data,
    ComponentType::CryptographicAsset,
];

pub static MIDDLEWARE_SUPPORT: FieldSupport = FieldSupport {
    format: SbomFormat::Middleware,
    relationships: ALL_NAMED_RELATIONSHIPS,
    other_relationships: Passthrough::Any,
    hash_algorithms: None,
    other_hash_algorithms: Passthrough::Any,
    component_types: None,
    version: true,
    declared_licenses: Cardinality::Many,
    concluded_license: true,
    supplier: true,
    supplier_urls: true,
    author: true,
    group: true,
    description: true,
    copyright: true,
    purl: true,
    cpes: Cardinality::Many,
    external_refs: true,
    properties: true,
};

pub static SPDX_SUPPORT: FieldSupport = FieldSupport {
    format: SbomFormat::Spdx,
    relationships: ALL_NAMED_RELATIONSHIPS,
    other_relationships: Passthrough::Named(SPDX_EXTRA_RELATIONSHIPS),
    hash_algorithms: Some(SPDX_HASHES),
    other_hash_algorithms: Passthrough::Named(SPDX_EXTRA_HASHES),
    component_types: Some(SPDX_TYPES),
    version: true,
    declared_licenses: Cardinality::One,
    concluded_license: true,
    supplier: true,
    supplier_urls: false,
    author: true,
    group: false,
    description: true,
    copyright: true,
    purl: true,
    cpes: Cardinality::Many,
    external_refs: true,
    properties: false,
};

pub static CYCLONEDX_SUPPORT: FieldSupport = FieldSupport {
    format: SbomFormat::CycloneDx,
    relationships: &[RelationshipType::DependsOn, RelationshipType::Contains],
    other_relationships: Passthrough::None,
    hash_algorithms: Some(CYCLONEDX_HASHES),
    other_hash_algorithms: Passthrough::None,
    component_types: Some(CYCLONEDX_TYPES),
    version: true,
    declared_licenses: Cardinality::Many,
    concluded_license: true,
    supplier: true,
    supplier_urls: true,
    author: true,
    group: true,
    description: true,
    copyright: true,
    purl: true,
    cpes: Cardinality::One,
    external_refs: true,
    properties: true,
};

pub static OSSBOM_SUPPORT: FieldSupport = FieldSupport {
    format: SbomFormat::Ossbom,
    relationships: &[
        RelationshipType::DependsOn,
        RelationshipType::Contains,
        RelationshipType::Describes,
        RelationshipType::GeneratedFrom,
    ],
    other_relationships: Passthrough::None,
    hash_algorithms: None,
    other_hash_algorithms: Passthrough::Any,
    component_types: None,
    version: true,
    declared_licenses: Cardinality::Many,
    concluded_license: false,
    supplier: true,
    supplier_urls: false,
    author: false,
    group: false,
    description: true,
    copyright: false,
    purl: true,
    cpes: Cardinality::None,
    external_refs: false,
    properties: false,
};

/// What an SPDX `files[]` element can hold; the type is implied
pub static SPDX_FILE_SUPPORT: FieldSupport = FieldSupport {
    format: SbomFormat::Spdx,
    relationships: ALL_NAMED_RELATIONSHIPS,
    other_relationships: Passthrough::Named(SPDX_EXTRA_RELATIONSHIPS),
    hash_algorithms: Some(SPDX_HASHES),
    other_hash_algorithms: Passthrough::Named(SPDX_EXTRA_HASHES),
    component_types: Some(SPDX_FILE_TYPES),
    version: false,
    declared_licenses: Cardinality::Many,
    concluded_license: true,
    supplier: false,
    supplier_urls: false,
    author: false,
    group: false,
    description: false,
    copyright: true,
    purl: false,
    cpes: Cardinality::None,
    external_refs: false,
    properties: false,
};

impl Passthrough {
    fn accepts(self, name: &str) -> bool {
        match self {
            Self::None => false,
            Self::Named(names) => names.contains(&name),
            Self::Any => true,
        }
    }
}

impl FieldSupport {
    /// The table for a format
    #[must_use]
    pub fn for_format(format: SbomFormat) -> &'static FieldSupport {
        match format {
            SbomFormat::Middleware => &MIDDLEWARE_SUPPORT,
            SbomFormat::Spdx => &SPDX_SUPPORT,
            SbomFormat::CycloneDx => &CYCLONEDX_SUPPORT,
            SbomFormat::Ossbom => &OSSBOM_SUPPORT,
        }
    }

    #[must_use]
    pub fn supports_relationship(&self, kind: &RelationshipType) -> bool {
        match kind {
            RelationshipType::Other(name) => self
                .other_relationships
                .accepts(&normalize_relationship_name(name)),
            named => self.relationships.contains(named),
        }
    }

    #[must_use]
    pub fn supports_hash(&self, algorithm: &HashAlgorithm) -> bool {
        match (algorithm, self.hash_algorithms) {
            (HashAlgorithm::Other(name), _) => self.other_hash_algorithms.accepts(name),
            (_, None) => true,
            (named, Some(list)) => list.contains(named),
        }
    }

    #[must_use]
    pub fn supports_component_type(&self, component_type: &ComponentType) -> bool {
        self.component_types
            .is_none_or(|list| list.contains(component_type))
    }

    /// Report every populated scalar or list field of `comp` the table
    /// cannot hold. Types, hashes and relationships are checked by the
    /// encoders as they write them.
    pub fn record_unsupported(&self, comp: &Component, recorder: &mut LossRecorder) -> Result<()> {
        let subject = comp.id.as_str();
        let format = self.format;
        let absent = || format!("no {format} field");

        recorder.drop_if(!self.version && comp.version.is_some(), subject, "version", absent())?;
        recorder.drop_if(!self.supplier && comp.supplier.is_some(), subject, "supplier", absent())?;
        recorder.drop_if(
            self.supplier
                && !self.supplier_urls
                && comp.supplier.as_ref().is_some_and(|s| !s.urls.is_empty()),
            subject,
            "supplier.url",
            format!("{format} supplier is a name only"),
        )?;
        recorder.drop_if(!self.author && comp.author.is_some(), subject, "author", absent())?;
        recorder.drop_if(!self.group && comp.group.is_some(), subject, "group", absent())?;
        recorder.drop_if(
            !self.description && comp.description.is_some(),
            subject,
            "description",
            absent(),
        )?;
        recorder.drop_if(
            !self.copyright && comp.copyright.is_some(),
            subject,
            "copyright",
            absent(),
        )?;
        recorder.drop_if(!self.purl && comp.purl.is_some(), subject, "purl", absent())?;
        recorder.drop_if(
            !self.concluded_license && comp.licenses.concluded.is_some(),
            subject,
            "licenses.concluded",
            format!("{format} records declared licenses only"),
        )?;

        match (self.declared_licenses, comp.licenses.declared.len()) {
            (Cardinality::None, n) if n > 0 => recorder.drop_field(
                subject,
                "licenses.declared",
                format!("{n} declared licenses have no {format} field"),
            )?,
            (Cardinality::One, n) if n > 1 => recorder.drop_field(
                subject,
                "licenses.declared",
                format!("{n} declared licenses combined into one AND expression"),
            )?,
            _ => {}
        }
        match (self.cpes, comp.cpes.len()) {
            (Cardinality::None, n) if n > 0 => recorder.drop_field(
                subject,
                "cpes",
                format!("{format} identifies components by purl only"),
            )?,
            (Cardinality::One, n) if n > 1 => recorder.drop_field(
                subject,
                "cpes",
                format!("{format} holds one CPE, {} dropped", n - 1),
            )?,
            _ => {}
        }

        recorder.drop_if(
            !self.external_refs && !comp.external_refs.is_empty(),
            subject,
            "externalRefs",
            format!(
                "{} external references have no {format} field",
                comp.external_refs.len()
            ),
        )?;
        recorder.drop_if(
            !self.properties && !comp.properties.is_empty(),
            subject,
            "properties",
            format!("{} properties have no {format} field", comp.properties.len()),
        )
    }
}
