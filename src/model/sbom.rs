//! Core SBOM graph and component data structures.

use super::{
    ComponentId, ComponentType, DocumentMetadata, ExternalReference, FormatExtensions, Hash,
    HashAlgorithm, LicenseInfo, Organization, Property, RelationshipType,
};
use crate::error::{MalformedKind, Result, SitError};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::Xxh3;

/// Canonical SBOM document, the middleware representation every format
/// adapter decodes into and encodes from.
///
/// Equality ignores the insertion order of components and relationships,
/// but not the order of roots.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalSbom {
    /// Document-level metadata
    pub document: DocumentMetadata,
    /// Root components (what the document describes)
    pub roots: Vec<ComponentId>,
    /// Components indexed by ID, in insertion order
    pub components: IndexMap<ComponentId, Component>,
    /// Relationship edges, as an ordered set
    pub relationships: IndexSet<Relationship>,
}

impl CanonicalSbom {
    /// Create a new empty graph
    #[must_use]
    pub fn new(document: DocumentMetadata) -> Self {
        Self {
            document,
            roots: Vec::new(),
            components: IndexMap::new(),
            relationships: IndexSet::new(),
        }
    }

    /// Add a component to the graph.
    ///
    /// Returns `true` if a component with the same ID was already present
    /// and has been replaced.
    pub fn add_component(&mut self, component: Component) -> bool {
        self.components
            .insert(component.id.clone(), component)
            .is_some()
    }

    /// Add a relationship. Returns `false` if the same edge already existed.
    pub fn add_relationship(&mut self, relationship: Relationship) -> bool {
        self.relationships.insert(relationship)
    }

    /// Designate a root component (no-op if it is already a root)
    pub fn add_root(&mut self, id: impl Into<ComponentId>) {
        let id = id.into();
        if !self.roots.contains(&id) {
            self.roots.push(id);
        }
    }

    /// Get a component by ID
    #[must_use]
    pub fn component(&self, id: &str) -> Option<&Component> {
        self.components.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.components.contains_key(id)
    }

    /// Root components, in root order
    pub fn root_components(&self) -> impl Iterator<Item = &Component> {
        self.roots.iter().filter_map(|id| self.components.get(id))
    }

    #[must_use]
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    #[must_use]
    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    /// Check internal consistency: every root and every relationship
    /// endpoint must be a component of this graph.
    pub fn validate(&self) -> Result<()> {
        let format = self.document.source_format;
        for root in &self.roots {
            if !self.contains(root.as_str()) {
                return Err(SitError::malformed(
                    format,
                    "graph validation",
                    MalformedKind::UnknownRoot(root.to_string()),
                ));
            }
        }
        for rel in &self.relationships {
            if !self.contains(rel.from.as_str()) || !self.contains(rel.to.as_str()) {
                return Err(SitError::malformed(
                    format,
                    format!("graph validation: {} relationship", rel.kind),
                    MalformedKind::DanglingRelationship {
                        from: rel.from.to_string(),
                        to: rel.to.to_string(),
                    },
                ));
            }
        }
        Ok(())
    }

    /// Order-independent digest of the graph content.
    ///
    /// Covers components, relationships, roots and the document name and
    /// timestamp; the serial number itself is excluded.
    #[must_use]
    pub fn content_hash(&self) -> u128 {
        let mut hasher = Xxh3::new();

        if let Some(name) = &self.document.name {
            hasher.update(name.as_bytes());
        }
        hasher.update(self.document.created.to_rfc3339().as_bytes());

        let mut ids: Vec<&ComponentId> = self.components.keys().collect();
        ids.sort();
        for id in ids {
            if let Some(comp) = self.components.get(id) {
                if let Ok(json) = serde_json::to_vec(comp) {
                    hasher.update(&json);
                }
            }
        }

        let mut edges: Vec<&Relationship> = self.relationships.iter().collect();
        edges.sort();
        for edge in edges {
            hasher.update(edge.from.as_str().as_bytes());
            hasher.update(edge.kind.as_str().as_bytes());
            hasher.update(edge.to.as_str().as_bytes());
        }

        for root in &self.roots {
            hasher.update(root.as_str().as_bytes());
        }

        hasher.digest128()
    }

    /// Deterministic `urn:uuid:` serial derived from [`Self::content_hash`].
    #[must_use]
    pub fn derive_serial(&self) -> String {
        let mut bytes = self.content_hash().to_be_bytes();
        // RFC 9562 version 8 (custom), variant 10
        bytes[6] = (bytes[6] & 0x0f) | 0x80;
        bytes[8] = (bytes[8] & 0x3f) | 0x80;

        let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
        format!(
            "urn:uuid:{}-{}-{}-{}-{}",
            &hex[0..8],
            &hex[8..12],
            &hex[12..16],
            &hex[16..20],
            &hex[20..32]
        )
    }

    /// Build the arena index used for traversals
    #[must_use]
    pub fn build_index(&self) -> super::GraphIndex {
        super::GraphIndex::build(self)
    }
}

impl Default for CanonicalSbom {
    fn default() -> Self {
        Self::new(DocumentMetadata::default())
    }
}

/// Software component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    /// Graph-local identifier
    pub id: ComponentId,
    /// Component name
    pub name: String,
    /// Component version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Component type
    #[serde(default, rename = "type")]
    pub component_type: ComponentType,
    /// Supplier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<Organization>,
    /// Author
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Group/namespace (Maven group, npm scope)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Copyright text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
    /// Package URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purl: Option<String>,
    /// CPE identifiers
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cpes: Vec<String>,
    /// License information
    #[serde(default, skip_serializing_if = "LicenseInfo::is_empty")]
    pub licenses: LicenseInfo,
    /// Checksums
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hashes: Vec<Hash>,
    /// External references
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub external_refs: Vec<ExternalReference>,
    /// Key/value properties
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<Property>,
    /// Opaque format-specific fields
    #[serde(default, skip_serializing_if = "FormatExtensions::is_empty")]
    pub extensions: FormatExtensions,
}

impl Component {
    /// Create a new library component
    pub fn new(id: impl Into<ComponentId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            version: None,
            component_type: ComponentType::Library,
            supplier: None,
            author: None,
            group: None,
            description: None,
            copyright: None,
            purl: None,
            cpes: Vec::new(),
            licenses: LicenseInfo::default(),
            hashes: Vec::new(),
            external_refs: Vec::new(),
            properties: Vec::new(),
            extensions: FormatExtensions::default(),
        }
    }

    /// Builder: set version
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Builder: set component type
    #[must_use]
    pub fn with_type(mut self, component_type: ComponentType) -> Self {
        self.component_type = component_type;
        self
    }

    /// Builder: set PURL
    #[must_use]
    pub fn with_purl(mut self, purl: impl Into<String>) -> Self {
        self.purl = Some(purl.into());
        self
    }

    /// Builder: add a checksum
    #[must_use]
    pub fn with_hash(mut self, algorithm: HashAlgorithm, value: impl Into<String>) -> Self {
        self.hashes.push(Hash::new(algorithm, value));
        self
    }

    /// Value of the checksum computed with `algorithm`, if any
    #[must_use]
    pub fn hash_value(&self, algorithm: &HashAlgorithm) -> Option<&str> {
        self.hashes
            .iter()
            .find(|h| &h.algorithm == algorithm)
            .map(|h| h.value.as_str())
    }

    /// Get display name with version
    #[must_use]
    pub fn display_name(&self) -> String {
        self.version
            .as_ref()
            .map_or_else(|| self.name.clone(), |v| format!("{}@{}", self.name, v))
    }
}

/// Directed, typed edge between two components
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Relationship {
    /// Source component ID
    pub from: ComponentId,
    /// Target component ID
    pub to: ComponentId,
    /// Relationship kind
    #[serde(rename = "type")]
    pub kind: RelationshipType,
}

impl Relationship {
    /// Create a new relationship
    pub fn new(
        from: impl Into<ComponentId>,
        to: impl Into<ComponentId>,
        kind: RelationshipType,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            kind,
        }
    }

    /// Shorthand for a `DEPENDS_ON` edge
    pub fn depends_on(from: impl Into<ComponentId>, to: impl Into<ComponentId>) -> Self {
        Self::new(from, to, RelationshipType::DependsOn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn doc() -> DocumentMetadata {
        DocumentMetadata {
            name: Some("demo".into()),
            created: chrono::Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            ..DocumentMetadata::default()
        }
    }

    fn sample() -> CanonicalSbom {
        let mut sbom = CanonicalSbom::new(doc());
        sbom.add_component(Component::new("app", "app").with_type(ComponentType::Application));
        sbom.add_component(Component::new("lib", "lib").with_version("1.0"));
        sbom.add_relationship(Relationship::depends_on("app", "lib"));
        sbom.add_root("app");
        sbom
    }

    #[test]
    fn test_add_component_reports_replacement() {
        let mut sbom = CanonicalSbom::default();
        assert!(!sbom.add_component(Component::new("a", "a")));
        assert!(sbom.add_component(Component::new("a", "a2")));
        assert_eq!(sbom.component_count(), 1);
        assert_eq!(sbom.component("a").unwrap().name, "a2");
    }

    #[test]
    fn test_relationships_are_a_set() {
        let mut sbom = sample();
        assert!(!sbom.add_relationship(Relationship::depends_on("app", "lib")));
        assert!(sbom.add_relationship(Relationship::new(
            "app",
            "lib",
            RelationshipType::Contains
        )));
        assert_eq!(sbom.relationship_count(), 2);
    }

    #[test]
    fn test_component_equality_includes_extensions() {
        fn assert_total_eq<T: Eq>(_: &T) {}

        let plain = Component::new("lib", "lib").with_version("1.0");
        let mut extended = plain.clone();
        assert_total_eq(&plain);
        assert_eq!(plain, extended);

        let mut fields = crate::model::JsonObject::new();
        fields.insert("scope".into(), serde_json::json!("required"));
        extended
            .extensions
            .set(crate::model::SbomFormat::CycloneDx, fields);
        assert_ne!(plain, extended);
    }

    #[test]
    fn test_validate_rejects_dangling_edge() {
        let mut sbom = sample();
        assert!(sbom.validate().is_ok());
        sbom.add_relationship(Relationship::depends_on("lib", "ghost"));
        match sbom.validate() {
            Err(SitError::MalformedDocument { source, .. }) => assert_eq!(
                source,
                MalformedKind::DanglingRelationship {
                    from: "lib".into(),
                    to: "ghost".into()
                }
            ),
            other => panic!("expected dangling relationship, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_unknown_root() {
        let mut sbom = sample();
        sbom.add_root("nope");
        assert!(matches!(
            sbom.validate(),
            Err(SitError::MalformedDocument {
                source: MalformedKind::UnknownRoot(_),
                ..
            })
        ));
    }

    #[test]
    fn test_content_hash_ignores_insertion_order() {
        let a = sample();
        let mut b = CanonicalSbom::new(doc());
        b.add_component(Component::new("lib", "lib").with_version("1.0"));
        b.add_component(Component::new("app", "app").with_type(ComponentType::Application));
        b.add_relationship(Relationship::depends_on("app", "lib"));
        b.add_root("app");

        assert_eq!(a, b);
        assert_eq!(a.content_hash(), b.content_hash());
        assert_eq!(a.derive_serial(), b.derive_serial());
    }

    #[test]
    fn test_derive_serial_shape() {
        let serial = sample().derive_serial();
        assert!(serial.starts_with("urn:uuid:"));
        let uuid = serial.trim_start_matches("urn:uuid:");
        assert_eq!(uuid.len(), 36);
        assert_eq!(&uuid[14..15], "8");
    }

    #[test]
    fn test_content_hash_changes_with_content() {
        let a = sample();
        let mut b = sample();
        b.add_component(Component::new("extra", "extra"));
        assert_ne!(a.content_hash(), b.content_hash());
    }
}
