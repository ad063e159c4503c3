//! CycloneDX 1.6 JSON adapter.
//!
//! CycloneDX expresses containment by nesting `components` and dependencies
//! through the top-level `dependencies` array. Decoding flattens nesting into
//! `CONTAINS` edges; encoding rebuilds nesting when the containment edges
//! form a forest and reports the rest through the loss recorder. Nesting
//! stops at [`MAX_NESTING_DEPTH`]; deeper components are listed at the top
//! level and name their parent in a component property.

use super::json::{self, extension_fields, format_timestamp, parse_timestamp, require};
use super::traits::{
    Encoded, EncodeOptions, FormatAdapter, FormatConfidence, FormatDetection, LossRecorder,
};
use super::FieldSupport;
use crate::error::{MalformedKind, Result, SitError};
use crate::model::{
    CanonicalSbom, Component, ComponentId, ComponentType, Creator, CreatorType, DocumentMetadata,
    ExternalReference, Hash, JsonObject, LicenseExpression, Organization, Property, Relationship,
    RelationshipType, SbomFormat,
};
use chrono::{DateTime, Utc};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const FORMAT: SbomFormat = SbomFormat::CycloneDx;
const OUTPUT_VERSION: &str = "1.6";
const BOM_FORMAT: &str = "CycloneDX";
/// Metadata property naming an additional root component
const ROOT_PROPERTY: &str = "sit:cyclonedx:root";
/// Metadata property carrying the canonical document name
const NAME_PROPERTY: &str = "sit:cyclonedx:document-name";
/// Component property naming the container of a component written flat
const CONTAINED_BY_PROPERTY: &str = "sit:cyclonedx:contained-by";

/// Deepest `components` nesting the encoder writes. JSON parsers commonly
/// stop at 128 levels and every nesting level costs two.
pub const MAX_NESTING_DEPTH: usize = 32;

// ============================================================================
// Wire structures
// ============================================================================

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CdxBom {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    bom_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    spec_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    serial_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<CdxMetadata>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    components: Vec<CdxComponent>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    dependencies: Vec<CdxDependency>,
    #[serde(flatten)]
    extra: JsonObject,
}

const BOM_FIELDS: &[&str] = &[
    "bomFormat",
    "specVersion",
    "serialNumber",
    "version",
    "metadata",
    "components",
    "dependencies",
];

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CdxMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timestamp: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_tools",
        serialize_with = "serialize_tools",
        skip_serializing_if = "Vec::is_empty"
    )]
    tools: Vec<CdxTool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    authors: Vec<CdxAuthor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    manufacturer: Option<CdxOrganization>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    component: Option<Box<CdxComponent>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    properties: Vec<CdxProperty>,
    #[serde(flatten)]
    extra: JsonObject,
}

const METADATA_FIELDS: &[&str] = &[
    "timestamp",
    "tools",
    "authors",
    "manufacturer",
    "component",
    "properties",
];

#[derive(Debug, Clone, Deserialize)]
struct CdxTool {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CdxToolsObject {
    #[serde(default)]
    components: Vec<CdxTool>,
    #[serde(default)]
    services: Vec<CdxTool>,
}

/// Accept both the 1.4 array form and the 1.5+ object form of `tools`.
fn deserialize_tools<'de, D>(deserializer: D) -> std::result::Result<Vec<CdxTool>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, MapAccess, SeqAccess, Visitor};
    use std::fmt;

    struct ToolsVisitor;

    impl<'de> Visitor<'de> for ToolsVisitor {
        type Value = Vec<CdxTool>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an array of tools or an object with components/services")
        }

        fn visit_unit<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Self::Value, A::Error>
        where
            A: SeqAccess<'de>,
        {
            let mut tools = Vec::new();
            while let Some(tool) = seq.next_element::<CdxTool>()? {
                tools.push(tool);
            }
            Ok(tools)
        }

        fn visit_map<M>(self, map: M) -> std::result::Result<Self::Value, M::Error>
        where
            M: MapAccess<'de>,
        {
            let object: CdxToolsObject =
                Deserialize::deserialize(de::value::MapAccessDeserializer::new(map))?;
            Ok(object.components.into_iter().chain(object.services).collect())
        }
    }

    deserializer.deserialize_any(ToolsVisitor)
}

/// Always written in the 1.5+ object form.
fn serialize_tools<S>(tools: &[CdxTool], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    #[derive(Serialize)]
    struct ToolComponent<'a> {
        #[serde(rename = "type")]
        component_type: &'static str,
        name: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        version: Option<&'a str>,
    }
    #[derive(Serialize)]
    struct ToolsObject<'a> {
        components: Vec<ToolComponent<'a>>,
    }

    ToolsObject {
        components: tools
            .iter()
            .map(|t| ToolComponent {
                component_type: "application",
                name: t.name.as_deref().unwrap_or_default(),
                version: t.version.as_deref(),
            })
            .collect(),
    }
    .serialize(serializer)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CdxAuthor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    email: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CdxOrganization {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    url: Vec<String>,
    #[serde(flatten)]
    extra: JsonObject,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CdxComponent {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    component_type: Option<String>,
    #[serde(rename = "bom-ref", default, skip_serializing_if = "Option::is_none")]
    bom_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    supplier: Option<CdxOrganization>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    hashes: Vec<CdxHash>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    licenses: Vec<CdxLicenseChoice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    copyright: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cpe: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    purl: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    external_references: Vec<CdxExternalReference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    properties: Vec<CdxProperty>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    components: Vec<CdxComponent>,
    #[serde(flatten)]
    extra: JsonObject,
}

const COMPONENT_FIELDS: &[&str] = &[
    "type",
    "bom-ref",
    "supplier",
    "author",
    "group",
    "name",
    "version",
    "description",
    "hashes",
    "licenses",
    "copyright",
    "cpe",
    "purl",
    "externalReferences",
    "properties",
    "components",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CdxLicenseChoice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    license: Option<CdxLicense>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expression: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    acknowledgement: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CdxLicense {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    acknowledgement: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CdxHash {
    alg: String,
    content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CdxExternalReference {
    #[serde(rename = "type")]
    ref_type: String,
    url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CdxProperty {
    name: String,
    #[serde(default)]
    value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CdxDependency {
    #[serde(rename = "ref")]
    dep_ref: String,
    #[serde(default)]
    depends_on: Vec<String>,
}

// ============================================================================
// Adapter
// ============================================================================

/// CycloneDX 1.6 JSON adapter
#[derive(Debug, Default, Clone, Copy)]
pub struct CycloneDxAdapter;

/// Decoding state threaded through the component tree walk
struct DecodeState {
    sbom: CanonicalSbom,
    /// bom-ref -> component ID
    refs: HashMap<String, ComponentId>,
    /// (component, container bom-ref) from flattened containment
    flattened: Vec<(ComponentId, String)>,
}

impl CycloneDxAdapter {
    /// Create a new CycloneDX adapter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Extract version from JSON content (quick heuristic, not full parse)
    fn extract_version(content: &str) -> Option<String> {
        let idx = content.find("\"specVersion\"")?;
        let after = &content[idx + "\"specVersion\"".len()..];
        let colon = after.find(':')?;
        let value = &after[colon + 1..];
        let open = value.find('"')?;
        let rest = &value[open + 1..];
        let close = rest.find('"')?;
        Some(rest[..close].to_string())
    }

    fn decode_license(choice: CdxLicenseChoice) -> Option<(LicenseExpression, bool)> {
        let (expression, acknowledgement) = match (choice.license, choice.expression) {
            (Some(license), _) => (license.id.or(license.name)?, license.acknowledgement),
            (None, Some(expression)) => (expression, None),
            (None, None) => return None,
        };
        let concluded = acknowledgement
            .or(choice.acknowledgement)
            .is_some_and(|a| a == "concluded");
        Some((LicenseExpression::new(expression), concluded))
    }

    fn encode_license(license: &LicenseExpression, concluded: bool) -> CdxLicenseChoice {
        let acknowledgement = concluded.then(|| "concluded".to_string());
        if license.is_single_license_id() {
            CdxLicenseChoice {
                license: Some(CdxLicense {
                    id: Some(license.expression.clone()),
                    name: None,
                    acknowledgement,
                }),
                ..Default::default()
            }
        } else if license.is_valid_spdx {
            CdxLicenseChoice {
                expression: Some(license.expression.clone()),
                acknowledgement,
                ..Default::default()
            }
        } else {
            CdxLicenseChoice {
                license: Some(CdxLicense {
                    id: None,
                    name: Some(license.expression.clone()),
                    acknowledgement,
                }),
                ..Default::default()
            }
        }
    }

    fn decode_metadata(bom: &mut CdxBom, version: String) -> Result<(DocumentMetadata, Vec<String>)> {
        let mut metadata = DocumentMetadata {
            name: None,
            serial_number: bom.serial_number.take(),
            created: DateTime::<Utc>::default(),
            creators: Vec::new(),
            source_format: FORMAT,
            spec_version: version,
            data_license: None,
            properties: Vec::new(),
            extensions: Default::default(),
        };
        let mut root_refs = Vec::new();
        let mut doc_extra = std::mem::take(&mut bom.extra);

        if let Some(meta) = bom.metadata.as_mut() {
            if let Some(ts) = meta.timestamp.take() {
                metadata.created = parse_timestamp(FORMAT, "metadata.timestamp", &ts)?;
            }
            for tool in meta.tools.drain(..) {
                let Some(name) = tool.name else { continue };
                let name = match tool.version {
                    Some(v) => format!("{name}-{v}"),
                    None => name,
                };
                metadata.creators.push(Creator::tool(name));
            }
            for author in meta.authors.drain(..) {
                let Some(name) = author.name else { continue };
                metadata.creators.push(Creator {
                    creator_type: CreatorType::Person,
                    name,
                    email: author.email,
                });
            }
            if let Some(name) = meta.manufacturer.take().and_then(|m| m.name) {
                metadata.creators.push(Creator {
                    creator_type: CreatorType::Organization,
                    name,
                    email: None,
                });
            }
            for prop in meta.properties.drain(..) {
                match prop.name.as_str() {
                    ROOT_PROPERTY => root_refs.push(prop.value),
                    NAME_PROPERTY => metadata.name = Some(prop.value),
                    _ => metadata.properties.push(Property::new(prop.name, prop.value)),
                }
            }
            if !meta.extra.is_empty() {
                doc_extra.insert(
                    "metadata".into(),
                    serde_json::Value::Object(std::mem::take(&mut meta.extra)),
                );
            }
        }
        metadata.extensions.set(FORMAT, doc_extra);
        Ok((metadata, root_refs))
    }

    fn decode_component(
        state: &mut DecodeState,
        cdx: CdxComponent,
        parent: Option<&ComponentId>,
        context: &str,
    ) -> Result<()> {
        let name = require(FORMAT, cdx.name, "name", context)?;
        let id = match &cdx.bom_ref {
            Some(bom_ref) => ComponentId::new(bom_ref),
            None => ComponentId::synthetic(cdx.group.as_deref(), &name, cdx.version.as_deref()),
        };

        if state.sbom.contains(id.as_str()) {
            return Err(SitError::malformed(
                FORMAT,
                context,
                MalformedKind::DuplicateId(id.into_inner()),
            ));
        }

        let mut comp = Component::new(id.clone(), name);
        comp.version = cdx.version;
        comp.group = cdx.group;
        comp.description = cdx.description;
        comp.author = cdx.author;
        comp.copyright = cdx.copyright;
        comp.purl = cdx.purl;
        comp.cpes.extend(cdx.cpe);
        if let Some(t) = cdx.component_type {
            comp.component_type = t
                .parse()
                .unwrap_or_else(|e: std::convert::Infallible| match e {});
        }
        if let Some(supplier) = cdx.supplier {
            if let Some(name) = supplier.name {
                comp.supplier = Some(Organization {
                    name,
                    urls: supplier.url,
                });
            }
        }
        for choice in cdx.licenses {
            match Self::decode_license(choice) {
                Some((license, true)) if comp.licenses.concluded.is_none() => {
                    comp.licenses.concluded = Some(license);
                }
                Some((license, _)) => comp.licenses.add_declared(license),
                None => tracing::debug!(component = %id, "skipping empty license entry"),
            }
        }
        comp.hashes = cdx
            .hashes
            .into_iter()
            .map(|h| {
                Hash::new(
                    h.alg
                        .parse()
                        .unwrap_or_else(|e: std::convert::Infallible| match e {}),
                    h.content,
                )
            })
            .collect();
        comp.external_refs = cdx
            .external_references
            .into_iter()
            .map(|r| ExternalReference {
                ref_type: r
                    .ref_type
                    .parse()
                    .unwrap_or_else(|e: std::convert::Infallible| match e {}),
                url: r.url,
                comment: r.comment,
            })
            .collect();
        comp.properties = cdx
            .properties
            .into_iter()
            .map(|p| Property::new(p.name, p.value))
            .collect();
        if let Some(container) = comp
            .properties
            .iter()
            .find(|p| p.name == CONTAINED_BY_PROPERTY)
        {
            state.flattened.push((id.clone(), container.value.clone()));
        }
        comp.extensions.set(FORMAT, cdx.extra);

        if let Some(bom_ref) = cdx.bom_ref {
            state.refs.insert(bom_ref, id.clone());
        }
        state.sbom.add_component(comp);
        if let Some(parent) = parent {
            state.sbom.add_relationship(Relationship::new(
                parent.clone(),
                id.clone(),
                RelationshipType::Contains,
            ));
        }

        for (idx, child) in cdx.components.into_iter().enumerate() {
            let child_context = format!("{context}.components[{idx}]");
            Self::decode_component(state, child, Some(&id), &child_context)?;
        }
        Ok(())
    }

    fn decode_bom(&self, content: &[u8]) -> Result<CanonicalSbom> {
        let mut bom: CdxBom = json::from_slice(FORMAT, content)?;

        let bom_format = require(FORMAT, bom.bom_format.take(), "bomFormat", "document")?;
        if bom_format != BOM_FORMAT {
            return Err(SitError::malformed(
                FORMAT,
                "document",
                MalformedKind::InvalidValue {
                    field: "bomFormat".into(),
                    message: format!("expected '{BOM_FORMAT}', found '{bom_format}'"),
                },
            ));
        }
        let version = require(FORMAT, bom.spec_version.take(), "specVersion", "document")?;
        if !self.supported_versions().contains(&version.as_str()) {
            return Err(SitError::unsupported_version(
                FORMAT,
                version,
                self.supported_versions(),
            ));
        }

        let (metadata, root_refs) = Self::decode_metadata(&mut bom, version)?;
        let mut state = DecodeState {
            sbom: CanonicalSbom::new(metadata),
            refs: HashMap::new(),
            flattened: Vec::new(),
        };

        let mut metadata_root = None;
        if let Some(root) = bom.metadata.as_mut().and_then(|m| m.component.take()) {
            Self::decode_component(&mut state, *root, None, "metadata.component")?;
            metadata_root = state.sbom.components.keys().next().cloned();
        }

        for (idx, cdx) in std::mem::take(&mut bom.components).into_iter().enumerate() {
            // Some producers repeat the metadata component in the component list
            let repeats_root = metadata_root
                .as_ref()
                .is_some_and(|root| cdx.bom_ref.as_deref() == Some(root.as_str()));
            if repeats_root {
                tracing::debug!(component = ?cdx.bom_ref, "skipping repeated metadata component");
                continue;
            }
            Self::decode_component(&mut state, cdx, None, &format!("components[{idx}]"))?;
        }

        if let Some(root) = metadata_root {
            state.sbom.add_root(root);
        }
        for root_ref in root_refs {
            match state.refs.get(&root_ref) {
                Some(id) => state.sbom.add_root(id.clone()),
                None => {
                    tracing::debug!(bom_ref = %root_ref, "root property names no component");
                    state
                        .sbom
                        .document
                        .properties
                        .push(Property::new(ROOT_PROPERTY, root_ref));
                }
            }
        }

        for (child, container) in std::mem::take(&mut state.flattened) {
            let Some(parent) = state.refs.get(&container).cloned() else {
                tracing::debug!(
                    component = %child, bom_ref = %container,
                    "container property names no component"
                );
                continue;
            };
            state.sbom.add_relationship(Relationship::new(
                parent,
                child.clone(),
                RelationshipType::Contains,
            ));
            if let Some(comp) = state.sbom.components.get_mut(child.as_str()) {
                comp.properties
                    .retain(|p| p.name != CONTAINED_BY_PROPERTY || p.value != container);
            }
        }

        for dep in &bom.dependencies {
            let Some(from) = state.refs.get(&dep.dep_ref).cloned() else {
                tracing::warn!(bom_ref = %dep.dep_ref, "dropping dependencies of an unknown bom-ref");
                continue;
            };
            for target in &dep.depends_on {
                match state.refs.get(target) {
                    Some(to) => {
                        state
                            .sbom
                            .add_relationship(Relationship::depends_on(from.clone(), to.clone()));
                    }
                    None => tracing::warn!(
                        from = %from, to = %target,
                        "dropping dependency on an unknown bom-ref"
                    ),
                }
            }
        }

        tracing::debug!(
            components = state.sbom.component_count(),
            relationships = state.sbom.relationship_count(),
            "decoded CycloneDX document"
        );
        Ok(state.sbom)
    }

    /// Choose one parent per contained component, keeping the first edge
    /// seen and rejecting any edge that would close a cycle.
    fn containment_forest(
        sbom: &CanonicalSbom,
        top_root: Option<&ComponentId>,
        recorder: &mut LossRecorder,
    ) -> Result<IndexMap<ComponentId, ComponentId>> {
        let mut parents: IndexMap<ComponentId, ComponentId> = IndexMap::new();
        for rel in sbom
            .relationships
            .iter()
            .filter(|r| r.kind == RelationshipType::Contains)
        {
            let subject = format!("{} -> {}", rel.from, rel.to);
            if top_root == Some(&rel.to) {
                recorder.drop_field(
                    subject,
                    "relationship",
                    "the metadata component cannot be nested",
                )?;
                continue;
            }
            if parents.contains_key(&rel.to) {
                recorder.drop_field(
                    subject,
                    "relationship",
                    "component already nested under another parent",
                )?;
                continue;
            }
            let mut cursor = Some(&rel.from);
            let mut closes_cycle = false;
            while let Some(node) = cursor {
                if *node == rel.to {
                    closes_cycle = true;
                    break;
                }
                cursor = parents.get(node);
            }
            if closes_cycle {
                recorder.drop_field(subject, "relationship", "containment cycle")?;
                continue;
            }
            parents.insert(rel.to.clone(), rel.from.clone());
        }
        Ok(parents)
    }

    fn encode_component(
        comp: &Component,
        support: &FieldSupport,
        recorder: &mut LossRecorder,
    ) -> Result<CdxComponent> {
        let subject = comp.id.as_str();

        let component_type = if support.supports_component_type(&comp.component_type) {
            comp.component_type.to_string()
        } else {
            recorder.drop_field(
                subject,
                "type",
                format!("'{}' is not a CycloneDX component type, using 'library'", comp.component_type),
            )?;
            ComponentType::Library.to_string()
        };

        let mut licenses: Vec<CdxLicenseChoice> = comp
            .licenses
            .declared
            .iter()
            .map(|l| Self::encode_license(l, false))
            .collect();
        if let Some(concluded) = &comp.licenses.concluded {
            licenses.push(Self::encode_license(concluded, true));
        }

        let mut hashes = Vec::with_capacity(comp.hashes.len());
        for hash in &comp.hashes {
            if support.supports_hash(&hash.algorithm) {
                hashes.push(CdxHash {
                    alg: hash.algorithm.to_string(),
                    content: hash.value.clone(),
                });
            } else {
                recorder.drop_field(
                    subject,
                    "hashes",
                    format!("hash algorithm '{}' is not a CycloneDX algorithm", hash.algorithm),
                )?;
            }
        }

        support.record_unsupported(comp, recorder)?;

        Ok(CdxComponent {
            component_type: Some(component_type),
            bom_ref: Some(comp.id.to_string()),
            supplier: comp.supplier.as_ref().map(|s| CdxOrganization {
                name: Some(s.name.clone()),
                url: s.urls.clone(),
                extra: JsonObject::new(),
            }),
            author: comp.author.clone(),
            group: comp.group.clone(),
            name: Some(comp.name.clone()),
            version: comp.version.clone(),
            description: comp.description.clone(),
            hashes,
            licenses,
            copyright: comp.copyright.clone(),
            cpe: comp.cpes.first().cloned(),
            purl: comp.purl.clone(),
            external_references: comp
                .external_refs
                .iter()
                .map(|r| CdxExternalReference {
                    ref_type: r.ref_type.to_string(),
                    url: r.url.clone(),
                    comment: r.comment.clone(),
                })
                .collect(),
            properties: comp
                .properties
                .iter()
                .map(|p| CdxProperty {
                    name: p.name.clone(),
                    value: p.value.clone(),
                })
                .collect(),
            components: Vec::new(),
            extra: extension_fields(comp.extensions.get(FORMAT), COMPONENT_FIELDS),
        })
    }

    /// Assemble the nested tree under `id` from the flat encoded components.
    ///
    /// Children below [`MAX_NESTING_DEPTH`] are not nested; they are pushed
    /// to `overflow` with their parent instead.
    fn nest(
        id: &ComponentId,
        depth: usize,
        encoded: &mut HashMap<ComponentId, CdxComponent>,
        children: &IndexMap<ComponentId, Vec<ComponentId>>,
        overflow: &mut Vec<(ComponentId, ComponentId)>,
    ) -> Option<CdxComponent> {
        let mut node = encoded.remove(id)?;
        for kid in children.get(id).into_iter().flatten() {
            if depth + 1 >= MAX_NESTING_DEPTH {
                overflow.push((kid.clone(), id.clone()));
            } else if let Some(child) = Self::nest(kid, depth + 1, encoded, children, overflow) {
                node.components.push(child);
            }
        }
        Some(node)
    }

    fn encode_metadata(
        sbom: &CanonicalSbom,
        root_properties: Vec<CdxProperty>,
        recorder: &mut LossRecorder,
    ) -> Result<CdxMetadata> {
        let doc = &sbom.document;
        let mut tools = Vec::new();
        let mut authors = Vec::new();
        let mut manufacturer = None;
        for creator in &doc.creators {
            match creator.creator_type {
                CreatorType::Tool => tools.push(CdxTool {
                    name: Some(creator.name.clone()),
                    version: None,
                }),
                CreatorType::Person => authors.push(CdxAuthor {
                    name: Some(creator.name.clone()),
                    email: creator.email.clone(),
                }),
                CreatorType::Organization if manufacturer.is_none() => {
                    manufacturer = Some(CdxOrganization {
                        name: Some(creator.name.clone()),
                        ..Default::default()
                    });
                }
                CreatorType::Organization => recorder.drop_field(
                    "document",
                    "creators",
                    format!("only one manufacturer allowed, '{}' dropped", creator.name),
                )?,
            }
        }
        if doc.creators.is_empty() {
            tools.push(CdxTool {
                name: Some(Creator::this_tool().name),
                version: None,
            });
        }

        recorder.drop_if(
            doc.data_license.as_deref().is_some_and(|l| l != "CC0-1.0"),
            "document",
            "dataLicense",
            "CycloneDX has no document data license",
        )?;

        let mut properties = Vec::new();
        if let Some(name) = &doc.name {
            properties.push(CdxProperty {
                name: NAME_PROPERTY.into(),
                value: name.clone(),
            });
        }
        properties.extend(root_properties);
        properties.extend(doc.properties.iter().map(|p| CdxProperty {
            name: p.name.clone(),
            value: p.value.clone(),
        }));

        let extra = doc
            .extensions
            .get(FORMAT)
            .and_then(|e| e.get("metadata"))
            .and_then(serde_json::Value::as_object)
            .map(|m| extension_fields(Some(m), METADATA_FIELDS))
            .unwrap_or_default();

        Ok(CdxMetadata {
            timestamp: Some(format_timestamp(&doc.created)),
            tools,
            authors,
            manufacturer,
            component: None,
            properties,
            extra,
        })
    }
}

impl FormatAdapter for CycloneDxAdapter {
    fn format(&self) -> SbomFormat {
        FORMAT
    }

    fn supported_versions(&self) -> &'static [&'static str] {
        &["1.4", "1.5", "1.6"]
    }

    fn detect(&self, content: &[u8]) -> FormatDetection {
        if !json::looks_like_json_object(content) {
            return FormatDetection::no_match();
        }
        let text = json::preview(content);
        let has_bom_format = text.contains("\"bomFormat\"");
        let has_cyclonedx = text.contains("CycloneDX") || text.contains("cyclonedx");
        let has_spec_version = text.contains("\"specVersion\"");
        let has_schema = text.contains("\"$schema\"") && text.contains("cyclonedx");
        let version = Self::extract_version(&text);

        let mut detection = if has_bom_format && has_cyclonedx {
            FormatDetection::with_confidence(FormatConfidence::CERTAIN)
        } else if has_bom_format || has_schema {
            FormatDetection::with_confidence(FormatConfidence::HIGH)
        } else if has_spec_version && text.contains("\"components\"") {
            FormatDetection::with_confidence(FormatConfidence::MEDIUM)
                .warning("Missing bomFormat field - might not be CycloneDX")
        } else {
            return FormatDetection::no_match();
        };
        if let Some(v) = version {
            detection = detection.version(&v);
        }
        detection
    }

    fn decode(&self, content: &[u8]) -> Result<CanonicalSbom> {
        self.decode_bom(content)
    }

    fn encode(&self, sbom: &CanonicalSbom, options: &EncodeOptions) -> Result<Encoded> {
        let mut recorder = LossRecorder::new(FORMAT, options.policy);
        let support = self.field_support();

        let top_root = match sbom.roots.as_slice() {
            [single] => Some(single),
            _ => None,
        };
        let root_properties: Vec<CdxProperty> = if top_root.is_some() {
            Vec::new()
        } else {
            sbom.roots
                .iter()
                .map(|r| CdxProperty {
                    name: ROOT_PROPERTY.into(),
                    value: r.to_string(),
                })
                .collect()
        };

        let parents = Self::containment_forest(sbom, top_root, &mut recorder)?;
        let mut children: IndexMap<ComponentId, Vec<ComponentId>> = IndexMap::new();
        for (child, parent) in &parents {
            children.entry(parent.clone()).or_default().push(child.clone());
        }

        let mut dependencies: IndexMap<&ComponentId, IndexSet<String>> = sbom
            .components
            .keys()
            .map(|id| (id, IndexSet::new()))
            .collect();
        for rel in &sbom.relationships {
            match &rel.kind {
                RelationshipType::Contains => {}
                RelationshipType::DependsOn => {
                    if let Some(targets) = dependencies.get_mut(&rel.from) {
                        targets.insert(rel.to.to_string());
                    }
                }
                kind if kind.is_dependency() => {
                    recorder.drop_field(
                        format!("{} -> {}", rel.from, rel.to),
                        "relationship",
                        format!("{kind} encoded as a plain dependency"),
                    )?;
                    if let Some(targets) = dependencies.get_mut(&rel.from) {
                        targets.insert(rel.to.to_string());
                    }
                }
                kind => recorder.drop_field(
                    format!("{} -> {}", rel.from, rel.to),
                    "relationship",
                    format!("{kind} has no CycloneDX representation"),
                )?,
            }
        }

        let mut encoded: HashMap<ComponentId, CdxComponent> =
            HashMap::with_capacity(sbom.component_count());
        for comp in sbom.components.values() {
            encoded.insert(
                comp.id.clone(),
                Self::encode_component(comp, support, &mut recorder)?,
            );
        }

        let mut overflow = Vec::new();
        let mut metadata = Self::encode_metadata(sbom, root_properties, &mut recorder)?;
        if let Some(root) = top_root {
            metadata.component =
                Self::nest(root, 0, &mut encoded, &children, &mut overflow).map(Box::new);
        }

        let mut components = Vec::new();
        for id in sbom.components.keys() {
            if parents.contains_key(id) || top_root == Some(id) {
                continue;
            }
            if let Some(node) = Self::nest(id, 0, &mut encoded, &children, &mut overflow) {
                components.push(node);
            }
        }
        while !overflow.is_empty() {
            for (child, parent) in std::mem::take(&mut overflow) {
                let Some(mut node) = Self::nest(&child, 0, &mut encoded, &children, &mut overflow)
                else {
                    continue;
                };
                node.properties.push(CdxProperty {
                    name: CONTAINED_BY_PROPERTY.into(),
                    value: parent.to_string(),
                });
                components.push(node);
            }
        }

        let serial_number = sbom
            .document
            .serial_number
            .clone()
            .filter(|s| s.starts_with("urn:uuid:"))
            .unwrap_or_else(|| sbom.derive_serial());

        let bom = CdxBom {
            bom_format: Some(BOM_FORMAT.into()),
            spec_version: Some(OUTPUT_VERSION.into()),
            serial_number: Some(serial_number),
            version: Some(1),
            metadata: Some(metadata),
            components,
            dependencies: dependencies
                .into_iter()
                .map(|(id, targets)| CdxDependency {
                    dep_ref: id.to_string(),
                    depends_on: targets.into_iter().collect(),
                })
                .collect(),
            extra: extension_fields(sbom.document.extensions.get(FORMAT), BOM_FIELDS),
        };

        let bytes = json::to_vec(FORMAT, &bom, options.pretty)?;
        Ok(recorder.finish(bytes))
    }
}
