//! Property-based tests for the graph operations.
//!
//! Random graphs (including cycles and self-loops) must survive the
//! middleware schema unchanged, export must return a closed subgraph, and
//! merging a graph with itself must unify every component. Graphs with a
//! deep containment chain must keep every component through SPDX and
//! CycloneDX.

use proptest::prelude::*;
use sit::formats::EncodeOptions;
use sit::model::{
    CanonicalSbom, Component, ComponentId, ComponentType, Relationship, RelationshipType,
    SbomFormat,
};
use sit::{ConversionGateway, ExportEngine, MergeEngine};
use std::collections::BTreeSet;

const KINDS: [RelationshipType; 4] = [
    RelationshipType::DependsOn,
    RelationshipType::Contains,
    RelationshipType::DevDependsOn,
    RelationshipType::GeneratedFrom,
];

/// Every fifth component is an unversioned file, the rest are versioned
/// libraries.
fn component(id: String, name: String, idx: usize) -> Component {
    if idx % 5 == 4 {
        Component::new(id, name).with_type(ComponentType::File)
    } else {
        Component::new(id, name).with_version("1.0")
    }
}

/// Graph with `names.len()` components `c0..cN`, edges by index, and the
/// first component as root.
fn build_graph(names: &[String], edges: &[(usize, usize, usize)]) -> CanonicalSbom {
    let mut sbom = CanonicalSbom::default();
    sbom.document.name = Some("prop".to_string());
    for (idx, name) in names.iter().enumerate() {
        sbom.add_component(component(format!("c{idx}"), name.clone(), idx));
    }
    let n = names.len();
    for &(from, to, kind) in edges {
        sbom.add_relationship(Relationship::new(
            format!("c{}", from % n),
            format!("c{}", to % n),
            KINDS[kind % KINDS.len()].clone(),
        ));
    }
    sbom.add_root("c0");
    sbom
}

fn graph_strategy() -> impl Strategy<Value = CanonicalSbom> {
    (
        prop::collection::vec("[a-z][a-z0-9-]{0,12}", 1..24),
        prop::collection::vec((0usize..64, 0usize..64, 0usize..4), 0..48),
    )
        .prop_map(|(names, edges)| build_graph(&names, &edges))
}

/// A random graph with `c0 CONTAINS d0 CONTAINS d1 ...` appended
fn deep_graph_strategy() -> impl Strategy<Value = CanonicalSbom> {
    (graph_strategy(), 65usize..110).prop_map(|(mut sbom, depth)| {
        let mut parent = ComponentId::new("c0");
        for idx in 0..depth {
            let id = ComponentId::new(format!("d{idx}"));
            sbom.add_component(component(id.to_string(), format!("deep-{idx}"), idx));
            sbom.add_relationship(Relationship::new(
                parent,
                id.clone(),
                RelationshipType::Contains,
            ));
            parent = id;
        }
        sbom
    })
}

fn ids(sbom: &CanonicalSbom) -> BTreeSet<&str> {
    sbom.components.keys().map(ComponentId::as_str).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn middleware_round_trip_is_identity(sbom in graph_strategy()) {
        let gateway = ConversionGateway::new();
        let encoded = gateway
            .convert(&sbom, SbomFormat::Middleware, &EncodeOptions::default())
            .unwrap();
        prop_assert!(encoded.warnings.is_empty());
        let back = gateway.decode(&encoded.bytes, None).unwrap();
        prop_assert_eq!(back, sbom);
    }

    #[test]
    fn export_is_closed(sbom in graph_strategy(), start in 0usize..24) {
        let id = format!("c{}", start % sbom.component_count());
        let out = ExportEngine::default().export(&sbom, [id.as_str()]).unwrap();

        prop_assert!(out.contains(&id));
        prop_assert!(out.validate().is_ok());
        for comp in out.components.values() {
            prop_assert_eq!(sbom.component(comp.id.as_str()), Some(comp));
        }
        // Closed under outgoing edges
        for rel in &sbom.relationships {
            if out.contains(rel.from.as_str()) {
                prop_assert!(out.contains(rel.to.as_str()));
                prop_assert!(out.relationships.contains(rel));
            }
        }
    }

    #[test]
    fn self_merge_unifies_everything(sbom in graph_strategy()) {
        let report = MergeEngine::default().merge_detailed(&sbom, &sbom).unwrap();
        prop_assert_eq!(report.sbom.component_count(), sbom.component_count());
        prop_assert_eq!(report.unified.len(), sbom.component_count());
        prop_assert!(report.remapped.is_empty());
        prop_assert!(report.sbom.validate().is_ok());
    }

    #[test]
    fn spdx_keeps_ids_and_files(sbom in deep_graph_strategy()) {
        let gateway = ConversionGateway::new();
        let encoded = gateway
            .convert(&sbom, SbomFormat::Spdx, &EncodeOptions::default())
            .unwrap();
        let doc: serde_json::Value = serde_json::from_slice(&encoded.bytes).unwrap();
        let file_count = sbom
            .components
            .values()
            .filter(|c| c.component_type == ComponentType::File)
            .count();
        prop_assert_eq!(doc["files"].as_array().map_or(0, Vec::len), file_count);

        let back = gateway.decode(&encoded.bytes, Some(SbomFormat::Spdx)).unwrap();
        prop_assert_eq!(ids(&back), ids(&sbom));
        prop_assert_eq!(back.roots, sbom.roots);
    }

    #[test]
    fn cyclonedx_keeps_ids_and_deep_containment(sbom in deep_graph_strategy()) {
        let gateway = ConversionGateway::new();
        let encoded = gateway
            .convert(&sbom, SbomFormat::CycloneDx, &EncodeOptions::default())
            .unwrap();
        let back = gateway.decode(&encoded.bytes, Some(SbomFormat::CycloneDx)).unwrap();
        prop_assert_eq!(ids(&back), ids(&sbom));
        for rel in &sbom.relationships {
            if rel.to.as_str().starts_with('d') {
                prop_assert!(back.relationships.contains(rel), "lost {:?}", rel);
            }
        }
    }

    #[test]
    fn warn_policy_never_fails_on_encode(sbom in graph_strategy()) {
        let gateway = ConversionGateway::new();
        for format in SbomFormat::ALL {
            let encoded = gateway.convert(&sbom, format, &EncodeOptions::default());
            prop_assert!(encoded.is_ok(), "{format}: {:?}", encoded.err());
        }
    }
}
