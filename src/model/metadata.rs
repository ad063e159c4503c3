//! Metadata structures for SBOM documents and components.

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::str::FromStr;

/// Serialize an open enum through its `Display`/`FromStr` string form.
macro_rules! string_serde {
    ($ty:ty) => {
        impl serde::Serialize for $ty {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                Ok(raw.parse().unwrap_or_else(|e: Infallible| match e {}))
            }
        }
    };
}

/// SBOM format type
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum SbomFormat {
    /// Canonical middleware schema (lossless)
    #[default]
    Middleware,
    /// SPDX 2.3 JSON
    Spdx,
    /// CycloneDX 1.6 JSON
    #[value(name = "cyclonedx")]
    CycloneDx,
    /// OSSBOM 1.0 JSON
    Ossbom,
}

impl SbomFormat {
    /// Every supported format, in detection order.
    pub const ALL: [SbomFormat; 4] = [
        SbomFormat::Middleware,
        SbomFormat::Spdx,
        SbomFormat::CycloneDx,
        SbomFormat::Ossbom,
    ];

    /// Short lowercase key, as used on the command line and in configs.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Middleware => "middleware",
            Self::Spdx => "spdx",
            Self::CycloneDx => "cyclonedx",
            Self::Ossbom => "ossbom",
        }
    }
}

impl std::fmt::Display for SbomFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Middleware => write!(f, "middleware"),
            Self::Spdx => write!(f, "SPDX"),
            Self::CycloneDx => write!(f, "CycloneDX"),
            Self::Ossbom => write!(f, "OSSBOM"),
        }
    }
}

/// Document-level metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    /// Document name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Serial number or document namespace
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    /// Creation timestamp
    pub created: DateTime<Utc>,
    /// Creators/authors
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub creators: Vec<Creator>,
    /// Format the graph was decoded from
    #[serde(default)]
    pub source_format: SbomFormat,
    /// Specification version of the source document (e.g. "SPDX-2.3", "1.5")
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub spec_version: String,
    /// License of the SBOM document itself
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_license: Option<String>,
    /// Document-level key/value properties
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<Property>,
    /// Opaque fields of the source document
    #[serde(default, skip_serializing_if = "FormatExtensions::is_empty")]
    pub extensions: FormatExtensions,
}

impl Default for DocumentMetadata {
    fn default() -> Self {
        Self {
            name: None,
            serial_number: None,
            created: Utc::now(),
            creators: Vec::new(),
            source_format: SbomFormat::Middleware,
            spec_version: String::new(),
            data_license: None,
            properties: Vec::new(),
            extensions: FormatExtensions::default(),
        }
    }
}

impl DocumentMetadata {
    /// Value of the first document property with this name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }
}

/// Creator information
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Creator {
    /// Creator type
    pub creator_type: CreatorType,
    /// Creator name or identifier
    pub name: String,
    /// Optional email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Creator {
    pub fn tool(name: impl Into<String>) -> Self {
        Self {
            creator_type: CreatorType::Tool,
            name: name.into(),
            email: None,
        }
    }

    /// The creator of documents written by this crate.
    #[must_use]
    pub fn this_tool() -> Self {
        Self::tool(format!("sit-{}", env!("CARGO_PKG_VERSION")))
    }
}

/// Type of creator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CreatorType {
    Person,
    Organization,
    Tool,
}

impl std::fmt::Display for CreatorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Person => write!(f, "Person"),
            Self::Organization => write!(f, "Organization"),
            Self::Tool => write!(f, "Tool"),
        }
    }
}

/// Organization/supplier information
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Organization {
    /// Organization name
    pub name: String,
    /// Contact URLs
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub urls: Vec<String>,
}

impl Organization {
    /// Create a new organization with just a name
    #[must_use]
    pub const fn new(name: String) -> Self {
        Self {
            name,
            urls: Vec::new(),
        }
    }
}

/// Component type classification
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum ComponentType {
    Application,
    Framework,
    #[default]
    Library,
    Container,
    Platform,
    OperatingSystem,
    Device,
    DeviceDriver,
    Firmware,
    File,
    Source,
    Archive,
    Install,
    MachineLearningModel,
    Data,
    CryptographicAsset,
    Other(String),
}

impl std::fmt::Display for ComponentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Application => write!(f, "application"),
            Self::Framework => write!(f, "framework"),
            Self::Library => write!(f, "library"),
            Self::Container => write!(f, "container"),
            Self::Platform => write!(f, "platform"),
            Self::OperatingSystem => write!(f, "operating-system"),
            Self::Device => write!(f, "device"),
            Self::DeviceDriver => write!(f, "device-driver"),
            Self::Firmware => write!(f, "firmware"),
            Self::File => write!(f, "file"),
            Self::Source => write!(f, "source"),
            Self::Archive => write!(f, "archive"),
            Self::Install => write!(f, "install"),
            Self::MachineLearningModel => write!(f, "machine-learning-model"),
            Self::Data => write!(f, "data"),
            Self::CryptographicAsset => write!(f, "cryptographic-asset"),
            Self::Other(s) => write!(f, "{s}"),
        }
    }
}

impl FromStr for ComponentType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "application" => Self::Application,
            "framework" => Self::Framework,
            "library" => Self::Library,
            "container" => Self::Container,
            "platform" => Self::Platform,
            "operating-system" => Self::OperatingSystem,
            "device" => Self::Device,
            "device-driver" => Self::DeviceDriver,
            "firmware" => Self::Firmware,
            "file" => Self::File,
            "source" => Self::Source,
            "archive" => Self::Archive,
            "install" => Self::Install,
            "machine-learning-model" => Self::MachineLearningModel,
            "data" => Self::Data,
            "cryptographic-asset" => Self::CryptographicAsset,
            _ => Self::Other(s.to_string()),
        })
    }
}

string_serde!(ComponentType);

/// Cryptographic hash
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hash {
    /// Hash algorithm
    #[serde(rename = "alg")]
    pub algorithm: HashAlgorithm,
    /// Hash value (hex encoded)
    #[serde(rename = "content")]
    pub value: String,
}

impl Hash {
    /// Create a new hash
    #[must_use]
    pub fn new(algorithm: HashAlgorithm, value: impl Into<String>) -> Self {
        Self {
            algorithm,
            value: value.into(),
        }
    }
}

/// Hash algorithm types
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
    Sha3_256,
    Sha3_384,
    Sha3_512,
    Blake2b256,
    Blake2b384,
    Blake2b512,
    Blake3,
    Other(String),
}

impl std::fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Md5 => write!(f, "MD5"),
            Self::Sha1 => write!(f, "SHA-1"),
            Self::Sha224 => write!(f, "SHA-224"),
            Self::Sha256 => write!(f, "SHA-256"),
            Self::Sha384 => write!(f, "SHA-384"),
            Self::Sha512 => write!(f, "SHA-512"),
            Self::Sha3_256 => write!(f, "SHA3-256"),
            Self::Sha3_384 => write!(f, "SHA3-384"),
            Self::Sha3_512 => write!(f, "SHA3-512"),
            Self::Blake2b256 => write!(f, "BLAKE2b-256"),
            Self::Blake2b384 => write!(f, "BLAKE2b-384"),
            Self::Blake2b512 => write!(f, "BLAKE2b-512"),
            Self::Blake3 => write!(f, "BLAKE3"),
            Self::Other(s) => write!(f, "{s}"),
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = Infallible;

    /// Accepts both the CycloneDX (`SHA-256`) and SPDX (`SHA256`) spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_uppercase().replace(['-', '_'], "").as_str() {
            "MD5" => Self::Md5,
            "SHA1" => Self::Sha1,
            "SHA224" => Self::Sha224,
            "SHA256" => Self::Sha256,
            "SHA384" => Self::Sha384,
            "SHA512" => Self::Sha512,
            "SHA3256" => Self::Sha3_256,
            "SHA3384" => Self::Sha3_384,
            "SHA3512" => Self::Sha3_512,
            "BLAKE2B256" => Self::Blake2b256,
            "BLAKE2B384" => Self::Blake2b384,
            "BLAKE2B512" => Self::Blake2b512,
            "BLAKE3" => Self::Blake3,
            _ => Self::Other(s.to_string()),
        })
    }
}

string_serde!(HashAlgorithm);

/// External reference
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalReference {
    /// Reference type
    #[serde(rename = "type")]
    pub ref_type: ExternalRefType,
    /// URL or locator
    pub url: String,
    /// Comment or description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl ExternalReference {
    pub fn new(ref_type: ExternalRefType, url: impl Into<String>) -> Self {
        Self {
            ref_type,
            url: url.into(),
            comment: None,
        }
    }
}

/// External reference types, named after the CycloneDX vocabulary
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExternalRefType {
    Vcs,
    IssueTracker,
    Website,
    Advisories,
    Bom,
    MailingList,
    Documentation,
    Support,
    Distribution,
    DistributionIntake,
    License,
    BuildMeta,
    BuildSystem,
    ReleaseNotes,
    SecurityContact,
    Other(String),
}

impl std::fmt::Display for ExternalRefType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Vcs => write!(f, "vcs"),
            Self::IssueTracker => write!(f, "issue-tracker"),
            Self::Website => write!(f, "website"),
            Self::Advisories => write!(f, "advisories"),
            Self::Bom => write!(f, "bom"),
            Self::MailingList => write!(f, "mailing-list"),
            Self::Documentation => write!(f, "documentation"),
            Self::Support => write!(f, "support"),
            Self::Distribution => write!(f, "distribution"),
            Self::DistributionIntake => write!(f, "distribution-intake"),
            Self::License => write!(f, "license"),
            Self::BuildMeta => write!(f, "build-meta"),
            Self::BuildSystem => write!(f, "build-system"),
            Self::ReleaseNotes => write!(f, "release-notes"),
            Self::SecurityContact => write!(f, "security-contact"),
            Self::Other(s) => write!(f, "{s}"),
        }
    }
}

impl FromStr for ExternalRefType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "vcs" => Self::Vcs,
            "issue-tracker" => Self::IssueTracker,
            "website" => Self::Website,
            "advisories" => Self::Advisories,
            "bom" => Self::Bom,
            "mailing-list" => Self::MailingList,
            "documentation" => Self::Documentation,
            "support" => Self::Support,
            "distribution" => Self::Distribution,
            "distribution-intake" => Self::DistributionIntake,
            "license" => Self::License,
            "build-meta" => Self::BuildMeta,
            "build-system" => Self::BuildSystem,
            "release-notes" => Self::ReleaseNotes,
            "security-contact" => Self::SecurityContact,
            other => Self::Other(other.to_string()),
        })
    }
}

string_serde!(ExternalRefType);

/// Relationship kind between two components.
///
/// The vocabulary is always the forward direction; inverse SPDX forms
/// (`DEPENDENCY_OF`, `CONTAINED_BY`, ...) are normalised on decode.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RelationshipType {
    DependsOn,
    DevDependsOn,
    BuildDependsOn,
    TestDependsOn,
    RuntimeDependsOn,
    OptionalDependsOn,
    ProvidedDependsOn,
    Contains,
    Describes,
    GeneratedFrom,
    AncestorOf,
    VariantOf,
    CopyOf,
    PatchFor,
    DistributionArtifact,
    StaticLink,
    DynamicLink,
    /// Any other kind, kept by name
    Other(String),
}

impl RelationshipType {
    /// Canonical upper-snake name
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::DependsOn => "DEPENDS_ON",
            Self::DevDependsOn => "DEV_DEPENDS_ON",
            Self::BuildDependsOn => "BUILD_DEPENDS_ON",
            Self::TestDependsOn => "TEST_DEPENDS_ON",
            Self::RuntimeDependsOn => "RUNTIME_DEPENDS_ON",
            Self::OptionalDependsOn => "OPTIONAL_DEPENDS_ON",
            Self::ProvidedDependsOn => "PROVIDED_DEPENDS_ON",
            Self::Contains => "CONTAINS",
            Self::Describes => "DESCRIBES",
            Self::GeneratedFrom => "GENERATED_FROM",
            Self::AncestorOf => "ANCESTOR_OF",
            Self::VariantOf => "VARIANT_OF",
            Self::CopyOf => "COPY_OF",
            Self::PatchFor => "PATCH_FOR",
            Self::DistributionArtifact => "DISTRIBUTION_ARTIFACT",
            Self::StaticLink => "STATIC_LINK",
            Self::DynamicLink => "DYNAMIC_LINK",
            Self::Other(s) => s,
        }
    }

    /// True for `DEPENDS_ON` and its scoped variants.
    #[must_use]
    pub fn is_dependency(&self) -> bool {
        matches!(
            self,
            Self::DependsOn
                | Self::DevDependsOn
                | Self::BuildDependsOn
                | Self::TestDependsOn
                | Self::RuntimeDependsOn
                | Self::OptionalDependsOn
                | Self::ProvidedDependsOn
        )
    }
}

impl std::fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case- and separator-insensitive key for relationship names:
/// `dependency-of` and `DEPENDENCY_OF` both become `DEPENDENCY_OF`.
#[must_use]
pub fn normalize_relationship_name(name: &str) -> String {
    name.trim().to_ascii_uppercase().replace('-', "_")
}

impl FromStr for RelationshipType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match normalize_relationship_name(s).as_str() {
            "DEPENDS_ON" => Self::DependsOn,
            "DEV_DEPENDS_ON" => Self::DevDependsOn,
            "BUILD_DEPENDS_ON" => Self::BuildDependsOn,
            "TEST_DEPENDS_ON" => Self::TestDependsOn,
            "RUNTIME_DEPENDS_ON" => Self::RuntimeDependsOn,
            "OPTIONAL_DEPENDS_ON" => Self::OptionalDependsOn,
            "PROVIDED_DEPENDS_ON" => Self::ProvidedDependsOn,
            "CONTAINS" => Self::Contains,
            "DESCRIBES" => Self::Describes,
            "GENERATED_FROM" => Self::GeneratedFrom,
            "ANCESTOR_OF" => Self::AncestorOf,
            "VARIANT_OF" => Self::VariantOf,
            "COPY_OF" => Self::CopyOf,
            "PATCH_FOR" => Self::PatchFor,
            "DISTRIBUTION_ARTIFACT" => Self::DistributionArtifact,
            "STATIC_LINK" => Self::StaticLink,
            "DYNAMIC_LINK" => Self::DynamicLink,
            _ => Self::Other(s.to_string()),
        })
    }
}

string_serde!(RelationshipType);

/// Key-value property
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub value: String,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Opaque JSON object fields of a source document, per format
pub type JsonObject = serde_json::Map<String, serde_json::Value>;

/// Format-specific fields that don't map to the canonical model.
///
/// Adapters stash unrecognised object members here on decode and write
/// them back when encoding to the same format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatExtensions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spdx: Option<JsonObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cyclonedx: Option<JsonObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ossbom: Option<JsonObject>,
}

impl FormatExtensions {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spdx.is_none() && self.cyclonedx.is_none() && self.ossbom.is_none()
    }

    /// Extension fields stored for `format`.
    #[must_use]
    pub fn get(&self, format: SbomFormat) -> Option<&JsonObject> {
        match format {
            SbomFormat::Spdx => self.spdx.as_ref(),
            SbomFormat::CycloneDx => self.cyclonedx.as_ref(),
            SbomFormat::Ossbom => self.ossbom.as_ref(),
            SbomFormat::Middleware => None,
        }
    }

    /// Store extension fields for `format`; empty objects clear the slot.
    pub fn set(&mut self, format: SbomFormat, fields: JsonObject) {
        let value = if fields.is_empty() { None } else { Some(fields) };
        match format {
            SbomFormat::Spdx => self.spdx = value,
            SbomFormat::CycloneDx => self.cyclonedx = value,
            SbomFormat::Ossbom => self.ossbom = value,
            SbomFormat::Middleware => {}
        }
    }
}
