//! OSSBOM 1.0 JSON adapter.
//!
//! OSSBOM is a flat schema with PascalCase keys:
//!
//! ```json
//! {
//!   "Format": "OSSBOM", "Version": "1.0",
//!   "DocumentName": "...", "DocumentNamespace": "...", "Timestamp": "...",
//!   "Creators": [{"Type": "Tool", "Name": "..."}],
//!   "Roots": ["id"],
//!   "Components": [{"Id": "...", "Name": "...", "Version": "...", "Type": "...",
//!                   "Supplier": "...", "Purl": "...", "Ecosystem": "...",
//!                   "Licenses": ["MIT"], "Hashes": [{"Algorithm": "...", "Value": "..."}],
//!                   "Description": "..."}],
//!   "Relationships": [{"From": "id", "To": "id", "Type": "DEPENDS_ON"}]
//! }
//! ```
//!
//! `Ecosystem` is derived from the purl type when encoding and ignored on
//! decode.

use super::json::{self, extension_fields, format_timestamp, parse_timestamp, require};
use super::traits::{
    Encoded, EncodeOptions, FormatAdapter, FormatConfidence, FormatDetection, LossRecorder,
};
use crate::error::{MalformedKind, Result, SitError};
use crate::model::{
    CanonicalSbom, Component, ComponentId, Creator, CreatorType, DocumentMetadata, Ecosystem,
    Hash, JsonObject, LicenseExpression, Organization, Relationship, RelationshipType, SbomFormat,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const FORMAT: SbomFormat = SbomFormat::Ossbom;
const FORMAT_MARKER: &str = "OSSBOM";
const OUTPUT_VERSION: &str = "1.0";

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OssbomDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    document_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    document_namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timestamp: Option<String>,
    #[serde(default)]
    creators: Vec<OssbomCreator>,
    #[serde(default)]
    roots: Vec<String>,
    #[serde(default)]
    components: Vec<OssbomComponent>,
    #[serde(default)]
    relationships: Vec<OssbomRelationship>,
    #[serde(flatten)]
    extra: JsonObject,
}

const DOCUMENT_FIELDS: &[&str] = &[
    "Format",
    "Version",
    "DocumentName",
    "DocumentNamespace",
    "Timestamp",
    "Creators",
    "Roots",
    "Components",
    "Relationships",
];

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OssbomCreator {
    #[serde(rename = "Type", default, skip_serializing_if = "Option::is_none")]
    creator_type: Option<String>,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    email: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OssbomComponent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    #[serde(rename = "Type", default, skip_serializing_if = "Option::is_none")]
    component_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    supplier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    purl: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ecosystem: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    licenses: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    hashes: Vec<OssbomHash>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(flatten)]
    extra: JsonObject,
}

const COMPONENT_FIELDS: &[&str] = &[
    "Id",
    "Name",
    "Version",
    "Type",
    "Supplier",
    "Purl",
    "Ecosystem",
    "Licenses",
    "Hashes",
    "Description",
];

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OssbomHash {
    algorithm: String,
    value: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OssbomRelationship {
    from: String,
    to: String,
    #[serde(rename = "Type")]
    kind: String,
}

/// OSSBOM 1.0 JSON adapter
#[derive(Debug, Default, Clone, Copy)]
pub struct OssbomAdapter;

impl OssbomAdapter {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn decode_creator(creator: OssbomCreator) -> Creator {
        let creator_type = match creator.creator_type.as_deref() {
            Some(t) if t.eq_ignore_ascii_case("person") => CreatorType::Person,
            Some(t) if t.eq_ignore_ascii_case("organization") => CreatorType::Organization,
            _ => CreatorType::Tool,
        };
        Creator {
            creator_type,
            name: creator.name,
            email: creator.email,
        }
    }

    fn decode_component(raw: OssbomComponent, index: usize) -> Result<Component> {
        let context = format!("Components[{index}]");
        let id = require(FORMAT, raw.id, "Id", &context)?;
        let name = require(FORMAT, raw.name, "Name", &context)?;

        let mut comp = Component::new(id, name);
        comp.version = raw.version;
        comp.description = raw.description;
        comp.purl = raw.purl;
        if let Some(t) = raw.component_type {
            comp.component_type = t
                .parse()
                .unwrap_or_else(|e: std::convert::Infallible| match e {});
        }
        comp.supplier = raw.supplier.map(Organization::new);
        for license in raw.licenses {
            comp.licenses.add_declared(LicenseExpression::new(license));
        }
        comp.hashes = raw
            .hashes
            .into_iter()
            .map(|h| {
                Hash::new(
                    h.algorithm
                        .parse()
                        .unwrap_or_else(|e: std::convert::Infallible| match e {}),
                    h.value,
                )
            })
            .collect();
        comp.extensions.set(FORMAT, raw.extra);
        Ok(comp)
    }

    fn decode_document(&self, content: &[u8]) -> Result<CanonicalSbom> {
        let doc: OssbomDocument = json::from_slice(FORMAT, content)?;

        let marker = require(FORMAT, doc.format, "Format", "document")?;
        if marker != FORMAT_MARKER {
            return Err(SitError::malformed(
                FORMAT,
                "document",
                MalformedKind::InvalidValue {
                    field: "Format".into(),
                    message: format!("expected '{FORMAT_MARKER}', found '{marker}'"),
                },
            ));
        }
        let version = require(FORMAT, doc.version, "Version", "document")?;
        if !self.supported_versions().contains(&version.as_str()) {
            return Err(SitError::unsupported_version(
                FORMAT,
                version,
                self.supported_versions(),
            ));
        }

        let created = match doc.timestamp {
            Some(ts) => parse_timestamp(FORMAT, "Timestamp", &ts)?,
            None => DateTime::<Utc>::default(),
        };
        let mut metadata = DocumentMetadata {
            name: doc.document_name,
            serial_number: doc.document_namespace,
            created,
            creators: doc.creators.into_iter().map(Self::decode_creator).collect(),
            source_format: FORMAT,
            spec_version: version,
            data_license: None,
            properties: Vec::new(),
            extensions: Default::default(),
        };
        metadata.extensions.set(FORMAT, doc.extra);

        let mut sbom = CanonicalSbom::new(metadata);
        for (idx, raw) in doc.components.into_iter().enumerate() {
            let comp = Self::decode_component(raw, idx)?;
            if sbom.contains(comp.id.as_str()) {
                return Err(SitError::malformed(
                    FORMAT,
                    format!("Components[{idx}]"),
                    MalformedKind::DuplicateId(comp.id.into_inner()),
                ));
            }
            sbom.add_component(comp);
        }

        for root in doc.roots {
            sbom.add_root(root);
        }
        for rel in doc.relationships {
            let kind = rel
                .kind
                .parse()
                .unwrap_or_else(|e: std::convert::Infallible| match e {});
            sbom.add_relationship(Relationship::new(rel.from, rel.to, kind));
        }

        sbom.validate()?;
        Ok(sbom)
    }
}

impl FormatAdapter for OssbomAdapter {
    fn format(&self) -> SbomFormat {
        FORMAT
    }

    fn supported_versions(&self) -> &'static [&'static str] {
        &["1.0"]
    }

    fn detect(&self, content: &[u8]) -> FormatDetection {
        if !json::looks_like_json_object(content) {
            return FormatDetection::no_match();
        }
        let text = json::preview(content);
        let has_marker = text.contains("\"Format\"") && text.contains("\"OSSBOM\"");
        if has_marker {
            let mut detection = FormatDetection::with_confidence(FormatConfidence::CERTAIN);
            if text.contains("\"Version\": \"1.0\"") || text.contains("\"Version\":\"1.0\"") {
                detection = detection.version(OUTPUT_VERSION);
            }
            return detection;
        }
        if text.contains("\"Components\"") && text.contains("\"Relationships\"") {
            return FormatDetection::with_confidence(FormatConfidence::MEDIUM)
                .warning("Missing Format marker - might not be OSSBOM");
        }
        FormatDetection::no_match()
    }

    fn decode(&self, content: &[u8]) -> Result<CanonicalSbom> {
        self.decode_document(content)
    }

    fn encode(&self, sbom: &CanonicalSbom, options: &EncodeOptions) -> Result<Encoded> {
        let mut recorder = LossRecorder::new(FORMAT, options.policy);
        let support = self.field_support();
        let doc = &sbom.document;

        recorder.drop_if(
            !doc.properties.is_empty(),
            "document",
            "properties",
            "OSSBOM documents have no property list",
        )?;
        recorder.drop_if(
            doc.data_license.as_deref().is_some_and(|l| l != "CC0-1.0"),
            "document",
            "dataLicense",
            "OSSBOM has no document data license",
        )?;

        let mut components = Vec::with_capacity(sbom.component_count());
        for comp in sbom.components.values() {
            support.record_unsupported(comp, &mut recorder)?;

            components.push(OssbomComponent {
                id: Some(comp.id.to_string()),
                name: Some(comp.name.clone()),
                version: comp.version.clone(),
                component_type: Some(comp.component_type.to_string()),
                supplier: comp.supplier.as_ref().map(|s| s.name.clone()),
                purl: comp.purl.clone(),
                ecosystem: comp
                    .purl
                    .as_deref()
                    .and_then(Ecosystem::from_purl)
                    .map(|e| e.to_string()),
                licenses: comp
                    .licenses
                    .declared
                    .iter()
                    .map(|l| l.expression.clone())
                    .collect(),
                hashes: comp
                    .hashes
                    .iter()
                    .map(|h| OssbomHash {
                        algorithm: h.algorithm.to_string(),
                        value: h.value.clone(),
                    })
                    .collect(),
                description: comp.description.clone(),
                extra: extension_fields(comp.extensions.get(FORMAT), COMPONENT_FIELDS),
            });
        }

        let mut relationships = Vec::with_capacity(sbom.relationship_count());
        for rel in &sbom.relationships {
            let kind = if support.supports_relationship(&rel.kind) {
                rel.kind.clone()
            } else if rel.kind.is_dependency() {
                recorder.drop_field(
                    format!("{} -> {}", rel.from, rel.to),
                    "relationship",
                    format!("{} encoded as a plain dependency", rel.kind),
                )?;
                RelationshipType::DependsOn
            } else {
                recorder.drop_field(
                    format!("{} -> {}", rel.from, rel.to),
                    "relationship",
                    format!("{} has no OSSBOM relationship type", rel.kind),
                )?;
                continue;
            };
            relationships.push(OssbomRelationship {
                from: rel.from.to_string(),
                to: rel.to.to_string(),
                kind: kind.to_string(),
            });
        }

        let creators = if doc.creators.is_empty() {
            vec![Creator::this_tool()]
        } else {
            doc.creators.clone()
        };

        let out = OssbomDocument {
            format: Some(FORMAT_MARKER.into()),
            version: Some(OUTPUT_VERSION.into()),
            document_name: doc.name.clone(),
            document_namespace: Some(
                doc.serial_number
                    .clone()
                    .unwrap_or_else(|| sbom.derive_serial()),
            ),
            timestamp: Some(format_timestamp(&doc.created)),
            creators: creators
                .into_iter()
                .map(|c| OssbomCreator {
                    creator_type: Some(c.creator_type.to_string()),
                    name: c.name,
                    email: c.email,
                })
                .collect(),
            roots: sbom.roots.iter().map(ComponentId::to_string).collect(),
            components,
            relationships,
            extra: extension_fields(doc.extensions.get(FORMAT), DOCUMENT_FIELDS),
        };

        let bytes = json::to_vec(FORMAT, &out, options.pretty)?;
        Ok(recorder.finish(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HashAlgorithm;

    const SAMPLE: &str = r#"{
        "Format": "OSSBOM",
        "Version": "1.0",
        "DocumentName": "service",
        "DocumentNamespace": "urn:uuid:0f3a4d61-58d7-4d8a-9ab2-1c1c3a59f7c4",
        "Timestamp": "2024-02-02T02:02:02Z",
        "Creators": [{"Type": "Tool", "Name": "collector-0.9"}],
        "Roots": ["svc"],
        "Components": [
            {"Id": "svc", "Name": "service", "Version": "3.1", "Type": "application"},
            {"Id": "pkg:pypi/requests@2.31.0", "Name": "requests", "Version": "2.31.0",
             "Purl": "pkg:pypi/requests@2.31.0", "Ecosystem": "pypi",
             "Licenses": ["Apache-2.0"], "Supplier": "PSF",
             "Hashes": [{"Algorithm": "CRC32", "Value": "deadbeef"}],
             "Scope": "runtime"}
        ],
        "Relationships": [
            {"From": "svc", "To": "pkg:pypi/requests@2.31.0", "Type": "DEPENDS_ON"}
        ],
        "Annotations": ["reviewed"]
    }"#;

    #[test]
    fn test_decode_sample() {
        let sbom = OssbomAdapter::new().decode(SAMPLE.as_bytes()).unwrap();
        assert_eq!(sbom.roots, vec![ComponentId::new("svc")]);
        assert_eq!(sbom.component_count(), 2);
        let requests = sbom.component("pkg:pypi/requests@2.31.0").unwrap();
        assert_eq!(
            requests.hash_value(&HashAlgorithm::Other("CRC32".into())),
            Some("deadbeef")
        );
        assert_eq!(requests.supplier.as_ref().unwrap().name, "PSF");
        assert!(requests
            .extensions
            .get(SbomFormat::Ossbom)
            .is_some_and(|e| e.contains_key("Scope")));
        assert!(sbom
            .relationships
            .contains(&Relationship::depends_on("svc", "pkg:pypi/requests@2.31.0")));
    }

    #[test]
    fn test_round_trip() {
        let adapter = OssbomAdapter::new();
        let first = adapter.decode(SAMPLE.as_bytes()).unwrap();
        let encoded = adapter.encode(&first, &EncodeOptions::default()).unwrap();
        assert!(encoded.warnings.is_empty(), "{:?}", encoded.warnings);
        assert!(encoded.as_text().contains("\"Annotations\""));
        assert!(encoded.as_text().contains("\"Ecosystem\": \"pypi\""));
        let second = adapter.decode(&encoded.bytes).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_dangling_relationship_is_malformed() {
        let content = r#"{"Format": "OSSBOM", "Version": "1.0",
            "Components": [{"Id": "a", "Name": "a"}],
            "Relationships": [{"From": "a", "To": "b", "Type": "DEPENDS_ON"}]}"#;
        let err = OssbomAdapter::new().decode(content.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            SitError::MalformedDocument {
                source: MalformedKind::DanglingRelationship { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_missing_component_id() {
        let content = r#"{"Format": "OSSBOM", "Version": "1.0", "Components": [{"Name": "x"}]}"#;
        let err = OssbomAdapter::new().decode(content.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Components[0]"));
    }

    #[test]
    fn test_lossy_fields_are_reported() {
        let mut sbom = CanonicalSbom::default();
        let mut comp = Component::new("a", "a");
        comp.copyright = Some("(c) ACME".into());
        comp.cpes.push("cpe:2.3:a:acme:a:1:*:*:*:*:*:*:*".into());
        sbom.add_component(comp);
        sbom.add_component(Component::new("b", "b"));
        sbom.add_relationship(Relationship::new("a", "b", RelationshipType::StaticLink));

        let adapter = OssbomAdapter::new();
        let encoded = adapter.encode(&sbom, &EncodeOptions::default()).unwrap();
        let fields: Vec<_> = encoded.warnings.iter().map(|w| w.field.as_str()).collect();
        assert_eq!(fields, vec!["copyright", "cpes", "relationship"]);
        assert!(adapter.encode(&sbom, &EncodeOptions::strict()).is_err());
    }

    #[test]
    fn test_detect() {
        let adapter = OssbomAdapter::new();
        let detection = adapter.detect(SAMPLE.as_bytes());
        assert_eq!(detection.confidence, FormatConfidence::CERTAIN);
        assert_eq!(detection.version.as_deref(), Some("1.0"));
        assert_eq!(
            adapter.detect(br#"{"bomFormat": "CycloneDX"}"#).confidence,
            FormatConfidence::NONE
        );
    }
}
