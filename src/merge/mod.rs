//! Merge engine: attach a sub graph under a component of a root graph.
//!
//! Sub components whose ID is free in the root graph keep it. On a
//! collision the two components are compared:
//!
//! - same identity (name, version, purl and every shared checksum) → the
//!   sub component is unified with the existing one
//! - same name and version but a different checksum for a shared
//!   algorithm → [`SitError::MergeConflict`]
//! - anything else → the sub component is renamed into a namespace
//!
//! Every sub root is then attached to the target component of the root
//! graph. The result is deterministic for a given pair of inputs.

use crate::error::{MalformedKind, Result, SitError};
use crate::model::{
    is_spdx_element_id, sanitize_id_fragment, CanonicalSbom, Component, ComponentId,
    Relationship, RelationshipType, SPDX_REF_PREFIX,
};
use clap::ValueEnum;
use indexmap::{IndexMap, IndexSet};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Edge kind used to attach the sub roots to the target
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum MergeRelationship {
    #[default]
    DependsOn,
    Contains,
}

impl MergeRelationship {
    #[must_use]
    pub fn kind(self) -> RelationshipType {
        match self {
            Self::DependsOn => RelationshipType::DependsOn,
            Self::Contains => RelationshipType::Contains,
        }
    }
}

impl std::fmt::Display for MergeRelationship {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DependsOn => write!(f, "depends-on"),
            Self::Contains => write!(f, "contains"),
        }
    }
}

/// Merge options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOptions {
    /// Edge kind from the target to each sub root
    pub relationship: MergeRelationship,
    /// Component of the root graph the sub graph hangs from; defaults to
    /// the first root
    pub target: Option<ComponentId>,
    /// Prefix for renamed sub components; defaults to the sub document name
    pub namespace: Option<String>,
}

/// Outcome of a merge, with the identifier bookkeeping
#[derive(Debug, Clone)]
pub struct MergeReport {
    /// The merged graph
    pub sbom: CanonicalSbom,
    /// Renamed sub components, original ID → new ID
    pub remapped: IndexMap<ComponentId, ComponentId>,
    /// Sub component IDs unified with an existing root component
    pub unified: IndexSet<ComponentId>,
}

/// How a colliding sub component relates to the root component
enum Collision {
    Same,
    Conflict(String),
    Distinct,
}

fn classify(existing: &Component, incoming: &Component) -> Collision {
    if existing.name != incoming.name || existing.version != incoming.version {
        return Collision::Distinct;
    }
    for hash in &incoming.hashes {
        if let Some(value) = existing.hash_value(&hash.algorithm) {
            if !value.eq_ignore_ascii_case(&hash.value) {
                return Collision::Conflict(format!(
                    "{} checksum differs (root {value}, sub {})",
                    hash.algorithm, hash.value
                ));
            }
        }
    }
    if existing.purl == incoming.purl {
        Collision::Same
    } else {
        Collision::Distinct
    }
}

/// Namespaced form of `id`; SPDX element IDs stay valid SPDX IDs.
fn namespaced(namespace: &str, id: &ComponentId) -> String {
    if is_spdx_element_id(id.as_str()) {
        let rest = &id.as_str()[SPDX_REF_PREFIX.len()..];
        format!("{SPDX_REF_PREFIX}{namespace}-{rest}")
    } else {
        format!("{namespace}:{id}")
    }
}

/// Graph merge engine
#[derive(Debug, Clone, Default)]
pub struct MergeEngine {
    options: MergeOptions,
}

impl MergeEngine {
    #[must_use]
    pub fn new(options: MergeOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn options(&self) -> &MergeOptions {
        &self.options
    }

    /// Merge `sub` into `root`.
    pub fn merge(&self, root: &CanonicalSbom, sub: &CanonicalSbom) -> Result<CanonicalSbom> {
        self.merge_detailed(root, sub).map(|report| report.sbom)
    }

    /// Merge `sub` into `root` and report how identifiers were resolved.
    pub fn merge_detailed(&self, root: &CanonicalSbom, sub: &CanonicalSbom) -> Result<MergeReport> {
        root.validate()?;
        sub.validate()?;

        let target = self.resolve_target(root)?;
        if sub.roots.is_empty() {
            return Err(SitError::malformed(
                sub.document.source_format,
                "merge sub document",
                MalformedKind::MissingRoot,
            ));
        }
        let namespace = self.namespace(sub);

        let mut merged = root.clone();
        let mut taken: HashSet<ComponentId> = root
            .components
            .keys()
            .chain(sub.components.keys())
            .cloned()
            .collect();
        let mut mapping: IndexMap<ComponentId, ComponentId> = IndexMap::new();
        let mut remapped = IndexMap::new();
        let mut unified = IndexSet::new();

        for comp in sub.components.values() {
            let Some(existing) = merged.components.get_mut(&comp.id) else {
                mapping.insert(comp.id.clone(), comp.id.clone());
                continue;
            };
            match classify(existing, comp) {
                Collision::Same => {
                    for hash in &comp.hashes {
                        if existing.hash_value(&hash.algorithm).is_none() {
                            existing.hashes.push(hash.clone());
                        }
                    }
                    tracing::debug!(id = %comp.id, "unified identical component");
                    mapping.insert(comp.id.clone(), comp.id.clone());
                    unified.insert(comp.id.clone());
                }
                Collision::Conflict(reason) => {
                    return Err(SitError::conflict(comp.id.clone(), reason));
                }
                Collision::Distinct => {
                    let base = namespaced(&namespace, &comp.id);
                    let mut candidate = ComponentId::new(&base);
                    let mut suffix = 2;
                    while taken.contains(&candidate) {
                        candidate = ComponentId::new(format!("{base}-{suffix}"));
                        suffix += 1;
                    }
                    taken.insert(candidate.clone());
                    tracing::debug!(from = %comp.id, to = %candidate, "renamed colliding component");
                    mapping.insert(comp.id.clone(), candidate.clone());
                    remapped.insert(comp.id.clone(), candidate);
                }
            }
        }

        for comp in sub.components.values() {
            if unified.contains(&comp.id) {
                continue;
            }
            let mut copy = comp.clone();
            copy.id = mapping[&comp.id].clone();
            merged.add_component(copy);
        }

        for rel in &sub.relationships {
            merged.add_relationship(Relationship::new(
                mapping[&rel.from].clone(),
                mapping[&rel.to].clone(),
                rel.kind.clone(),
            ));
        }

        let kind = self.options.relationship.kind();
        for sub_root in &sub.roots {
            let attached = &mapping[sub_root];
            if *attached == target {
                tracing::debug!(id = %attached, "sub root is the target, no attach edge");
                continue;
            }
            merged.add_relationship(Relationship::new(target.clone(), attached.clone(), kind.clone()));
        }

        merged.document.created = root.document.created.max(sub.document.created);
        for creator in &sub.document.creators {
            if !merged.document.creators.contains(creator) {
                merged.document.creators.push(creator.clone());
            }
        }
        merged.document.serial_number = Some(merged.derive_serial());

        tracing::info!(
            target_component = %target,
            added = sub.component_count() - unified.len(),
            unified = unified.len(),
            remapped = remapped.len(),
            "merged SBOMs"
        );

        Ok(MergeReport {
            sbom: merged,
            remapped,
            unified,
        })
    }

    fn resolve_target(&self, root: &CanonicalSbom) -> Result<ComponentId> {
        match &self.options.target {
            Some(target) if root.contains(target.as_str()) => Ok(target.clone()),
            Some(target) => Err(SitError::not_found(target.clone(), "merge target")),
            None => root.roots.first().cloned().ok_or_else(|| {
                SitError::malformed(
                    root.document.source_format,
                    "merge root document",
                    MalformedKind::MissingRoot,
                )
            }),
        }
    }

    fn namespace(&self, sub: &CanonicalSbom) -> String {
        let raw = self
            .options
            .namespace
            .clone()
            .or_else(|| sub.document.name.clone())
            .or_else(|| sub.root_components().next().map(|c| c.name.clone()))
            .unwrap_or_else(|| "sub".to_string());
        sanitize_id_fragment(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Creator, HashAlgorithm};
    use chrono::{TimeZone, Utc};

    fn graph(name: &str, components: &[Component], edges: &[(&str, &str)], root: &str) -> CanonicalSbom {
        let mut sbom = CanonicalSbom::default();
        sbom.document.name = Some(name.into());
        sbom.document.created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        for c in components {
            sbom.add_component(c.clone());
        }
        for (from, to) in edges {
            sbom.add_relationship(Relationship::depends_on(*from, *to));
        }
        sbom.add_root(root);
        sbom
    }

    #[test]
    fn test_disjoint_merge_attaches_sub_root() {
        let root = graph("root", &[Component::new("app", "app")], &[], "app");
        let sub = graph(
            "sub",
            &[Component::new("lib", "lib"), Component::new("zlib", "zlib")],
            &[("lib", "zlib")],
            "lib",
        );
        let merged = MergeEngine::default().merge(&root, &sub).unwrap();

        assert_eq!(merged.component_count(), 3);
        assert_eq!(merged.roots, vec![ComponentId::new("app")]);
        assert!(merged
            .relationships
            .contains(&Relationship::depends_on("app", "lib")));
        assert!(merged
            .relationships
            .contains(&Relationship::depends_on("lib", "zlib")));
        assert!(merged.document.serial_number.is_some());
        merged.validate().unwrap();
    }

    #[test]
    fn test_identical_component_is_unified() {
        let shared = Component::new("openssl", "openssl")
            .with_version("3.0")
            .with_hash(HashAlgorithm::Sha256, "aa");
        let root = graph(
            "root",
            &[Component::new("app", "app"), shared.clone()],
            &[("app", "openssl")],
            "app",
        );
        let sub_shared = shared.clone().with_hash(HashAlgorithm::Sha1, "bb");
        let sub = graph(
            "sub",
            &[Component::new("svc", "svc"), sub_shared],
            &[("svc", "openssl")],
            "svc",
        );

        let report = MergeEngine::default().merge_detailed(&root, &sub).unwrap();
        assert_eq!(report.unified.len(), 1);
        assert!(report.unified.contains("openssl"));
        assert!(report.remapped.is_empty());
        let merged = report.sbom;
        assert_eq!(merged.component_count(), 3);
        let openssl = merged.component("openssl").unwrap();
        assert_eq!(openssl.hashes.len(), 2);
        assert!(merged
            .relationships
            .contains(&Relationship::depends_on("svc", "openssl")));
    }

    #[test]
    fn test_hash_mismatch_is_a_conflict() {
        let root = graph(
            "root",
            &[
                Component::new("app", "app"),
                Component::new("X", "x").with_version("1").with_hash(HashAlgorithm::Sha256, "aa"),
            ],
            &[("app", "X")],
            "app",
        );
        let sub = graph(
            "sub",
            &[Component::new("X", "x").with_version("1").with_hash(HashAlgorithm::Sha256, "bb")],
            &[],
            "X",
        );
        let err = MergeEngine::default().merge(&root, &sub).unwrap_err();
        match err {
            SitError::MergeConflict { id, reason } => {
                assert_eq!(id.as_str(), "X");
                assert!(reason.contains("SHA-256"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_distinct_collision_is_namespaced() {
        let root = graph(
            "root",
            &[Component::new("app", "app"), Component::new("util", "util").with_version("1")],
            &[("app", "util")],
            "app",
        );
        let sub = graph(
            "plugin pack",
            &[
                Component::new("plugin", "plugin"),
                Component::new("util", "util").with_version("2"),
            ],
            &[("plugin", "util")],
            "plugin",
        );
        let report = MergeEngine::default().merge_detailed(&root, &sub).unwrap();
        let new_id = ComponentId::new("plugin-pack:util");
        assert_eq!(report.remapped.get("util"), Some(&new_id));

        let merged = report.sbom;
        assert_eq!(merged.component("util").unwrap().version.as_deref(), Some("1"));
        assert_eq!(
            merged.component("plugin-pack:util").unwrap().version.as_deref(),
            Some("2")
        );
        assert!(merged
            .relationships
            .contains(&Relationship::depends_on("plugin", "plugin-pack:util")));
        merged.validate().unwrap();
    }

    #[test]
    fn test_spdx_ids_stay_spdx_ids_and_get_suffixes() {
        let root = graph(
            "root",
            &[
                Component::new("SPDXRef-app", "app"),
                Component::new("SPDXRef-lib", "lib").with_version("1"),
                Component::new("SPDXRef-ns-lib", "taken"),
            ],
            &[],
            "SPDXRef-app",
        );
        let sub = graph(
            "sub",
            &[Component::new("SPDXRef-lib", "lib").with_version("2")],
            &[],
            "SPDXRef-lib",
        );
        let options = MergeOptions {
            namespace: Some("ns".into()),
            ..Default::default()
        };
        let report = MergeEngine::new(options).merge_detailed(&root, &sub).unwrap();
        assert_eq!(
            report.remapped.get("SPDXRef-lib").map(ComponentId::as_str),
            Some("SPDXRef-ns-lib-2")
        );
        assert!(report.sbom.relationships.contains(&Relationship::depends_on(
            "SPDXRef-app",
            "SPDXRef-ns-lib-2"
        )));
    }

    #[test]
    fn test_explicit_target_and_contains() {
        let root = graph(
            "root",
            &[Component::new("app", "app"), Component::new("plugins", "plugins")],
            &[("app", "plugins")],
            "app",
        );
        let sub = graph("sub", &[Component::new("p1", "p1")], &[], "p1");
        let options = MergeOptions {
            relationship: MergeRelationship::Contains,
            target: Some("plugins".into()),
            namespace: None,
        };
        let merged = MergeEngine::new(options).merge(&root, &sub).unwrap();
        assert!(merged.relationships.contains(&Relationship::new(
            "plugins",
            "p1",
            RelationshipType::Contains
        )));
    }

    #[test]
    fn test_missing_target() {
        let root = graph("root", &[Component::new("app", "app")], &[], "app");
        let sub = graph("sub", &[Component::new("lib", "lib")], &[], "lib");
        let options = MergeOptions {
            target: Some("nope".into()),
            ..Default::default()
        };
        let err = MergeEngine::new(options).merge(&root, &sub).unwrap_err();
        assert!(matches!(err, SitError::ComponentNotFound { .. }));
    }

    #[test]
    fn test_rootless_inputs_are_malformed() {
        let mut root = graph("root", &[Component::new("app", "app")], &[], "app");
        let mut sub = graph("sub", &[Component::new("lib", "lib")], &[], "lib");
        sub.roots.clear();
        assert!(matches!(
            MergeEngine::default().merge(&root, &sub).unwrap_err(),
            SitError::MalformedDocument {
                source: MalformedKind::MissingRoot,
                ..
            }
        ));
        sub.add_root("lib");
        root.roots.clear();
        assert!(MergeEngine::default().merge(&root, &sub).is_err());
    }

    #[test]
    fn test_large_overlap_unifies_every_shared_component() {
        let shared: Vec<Component> = (0..5_000)
            .map(|i| Component::new(format!("pkg-{i}"), format!("pkg-{i}")).with_version("1"))
            .collect();
        let mut root_components = vec![Component::new("app", "app")];
        root_components.extend(shared.iter().cloned());
        let mut sub_components = vec![Component::new("svc", "svc")];
        sub_components.extend(shared.iter().cloned());

        let root = graph("root", &root_components, &[], "app");
        let sub = graph("sub", &sub_components, &[], "svc");
        let report = MergeEngine::default().merge_detailed(&root, &sub).unwrap();

        assert_eq!(report.unified.len(), 5_000);
        assert_eq!(report.unified.first().map(ComponentId::as_str), Some("pkg-0"));
        assert_eq!(report.sbom.component_count(), 5_002);
        assert!(report.remapped.is_empty());
    }

    #[test]
    fn test_unified_sub_root_does_not_self_attach() {
        let app = Component::new("app", "app").with_version("1");
        let root = graph("root", &[app.clone()], &[], "app");
        let sub = graph("sub", &[app], &[], "app");
        let merged = MergeEngine::default().merge(&root, &sub).unwrap();
        assert_eq!(merged.relationship_count(), 0);
    }

    #[test]
    fn test_metadata_and_determinism() {
        let mut root = graph("root", &[Component::new("app", "app")], &[], "app");
        root.document.creators.push(Creator::tool("a"));
        let mut sub = graph("sub", &[Component::new("lib", "lib")], &[], "lib");
        sub.document.created = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        sub.document.creators.push(Creator::tool("a"));
        sub.document.creators.push(Creator::tool("b"));

        let engine = MergeEngine::default();
        let first = engine.merge(&root, &sub).unwrap();
        let second = engine.merge(&root, &sub).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.document.created, sub.document.created);
        assert_eq!(first.document.creators.len(), 2);
        assert_eq!(first.document.name.as_deref(), Some("root"));
    }

    #[test]
    fn test_dangling_input_is_rejected() {
        let root = graph("root", &[Component::new("app", "app")], &[("app", "ghost")], "app");
        let sub = graph("sub", &[Component::new("lib", "lib")], &[], "lib");
        assert!(matches!(
            MergeEngine::default().merge(&root, &sub).unwrap_err(),
            SitError::MalformedDocument { .. }
        ));
    }
}
