//! Subgraph export.
//!
//! Computes everything reachable from a set of start components along
//! outgoing edges and returns it as a standalone graph whose roots are the
//! start components.

use crate::error::{Result, SitError};
use crate::model::{CanonicalSbom, ComponentId, GraphIndex, RelationshipType};
use std::collections::VecDeque;

/// Export options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportOptions {
    /// Only follow (and keep) edges of these kinds; empty follows all
    pub relation_filter: Vec<RelationshipType>,
    /// Maximum number of hops from a start component; `None` is unlimited
    pub max_depth: Option<usize>,
}

impl ExportOptions {
    fn admits(&self, kind: &RelationshipType) -> bool {
        self.relation_filter.is_empty() || self.relation_filter.contains(kind)
    }
}

/// Subgraph export engine
#[derive(Debug, Clone, Default)]
pub struct ExportEngine {
    options: ExportOptions,
}

impl ExportEngine {
    #[must_use]
    pub fn new(options: ExportOptions) -> Self {
        Self { options }
    }

    /// Export the subgraph reachable from `ids`.
    ///
    /// Every ID is checked before traversal starts; a missing one fails the
    /// whole export with `ComponentNotFound`.
    pub fn export<I, S>(&self, sbom: &CanonicalSbom, ids: I) -> Result<CanonicalSbom>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut requested: Vec<ComponentId> = Vec::new();
        for id in ids {
            let id = ComponentId::new(id.as_ref());
            if !requested.contains(&id) {
                requested.push(id);
            }
        }
        if requested.is_empty() {
            return Err(SitError::validation(
                "export requires at least one component id",
            ));
        }

        let missing: Vec<&ComponentId> = requested
            .iter()
            .filter(|id| !sbom.contains(id.as_str()))
            .collect();
        if let Some(first) = missing.first() {
            let listed = missing
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            return Err(SitError::not_found(
                (*first).clone(),
                format!("export start; missing: {listed}"),
            ));
        }

        let index = sbom.build_index();
        let visited = self.reachable(sbom, &index, &requested);

        let mut out = CanonicalSbom::new(sbom.document.clone());
        for (handle, comp) in sbom.components.values().enumerate() {
            if visited[handle] {
                out.add_component(comp.clone());
            }
        }
        for rel in &sbom.relationships {
            if self.options.admits(&rel.kind)
                && out.contains(rel.from.as_str())
                && out.contains(rel.to.as_str())
            {
                out.add_relationship(rel.clone());
            }
        }
        for id in requested {
            out.add_root(id);
        }
        out.document.serial_number = Some(out.derive_serial());

        tracing::info!(
            start = out.roots.len(),
            components = out.component_count(),
            relationships = out.relationship_count(),
            "exported subgraph"
        );
        Ok(out)
    }

    /// Breadth-first reachability with a visited bitmap.
    fn reachable(&self, sbom: &CanonicalSbom, index: &GraphIndex, start: &[ComponentId]) -> Vec<bool> {
        let mut visited = vec![false; index.len()];
        let mut queue: VecDeque<(usize, usize)> = VecDeque::new();

        for id in start {
            if let Some(handle) = index.position(id.as_str()) {
                if !visited[handle] {
                    visited[handle] = true;
                    queue.push_back((handle, 0));
                }
            }
        }

        while let Some((handle, depth)) = queue.pop_front() {
            if self.options.max_depth.is_some_and(|max| depth >= max) {
                continue;
            }
            for edge in index.successors(handle) {
                if visited[edge.target] {
                    continue;
                }
                let admitted = sbom
                    .relationships
                    .get_index(edge.relationship)
                    .is_some_and(|rel| self.options.admits(&rel.kind));
                if admitted {
                    visited[edge.target] = true;
                    queue.push_back((edge.target, depth + 1));
                }
            }
        }
        visited
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Component, Relationship};

    /// app → {lib, tool}; lib → zlib; tool -dev→ lint; orphan
    fn sample() -> CanonicalSbom {
        let mut sbom = CanonicalSbom::default();
        for id in ["app", "lib", "zlib", "tool", "lint", "orphan"] {
            sbom.add_component(Component::new(id, id));
        }
        sbom.add_relationship(Relationship::depends_on("app", "lib"));
        sbom.add_relationship(Relationship::depends_on("app", "tool"));
        sbom.add_relationship(Relationship::depends_on("lib", "zlib"));
        sbom.add_relationship(Relationship::new(
            "tool",
            "lint",
            RelationshipType::DevDependsOn,
        ));
        sbom.add_root("app");
        sbom
    }

    #[test]
    fn test_export_transitive_closure() {
        let out = ExportEngine::default().export(&sample(), ["lib"]).unwrap();
        let ids: Vec<_> = out.components.keys().map(ComponentId::as_str).collect();
        assert_eq!(ids, vec!["lib", "zlib"]);
        assert_eq!(out.roots, vec![ComponentId::new("lib")]);
        assert_eq!(out.relationship_count(), 1);
        out.validate().unwrap();
    }

    #[test]
    fn test_export_keeps_source_order_and_request_order() {
        let out = ExportEngine::default()
            .export(&sample(), ["tool", "lib", "tool"])
            .unwrap();
        let ids: Vec<_> = out.components.keys().map(ComponentId::as_str).collect();
        assert_eq!(ids, vec!["lib", "zlib", "tool", "lint"]);
        assert_eq!(
            out.roots,
            vec![ComponentId::new("tool"), ComponentId::new("lib")]
        );
    }

    #[test]
    fn test_export_cycle_terminates() {
        let mut sbom = CanonicalSbom::default();
        for id in ["A", "B", "C"] {
            sbom.add_component(Component::new(id, id));
        }
        sbom.add_relationship(Relationship::depends_on("A", "B"));
        sbom.add_relationship(Relationship::depends_on("B", "C"));
        sbom.add_relationship(Relationship::depends_on("C", "A"));

        let out = ExportEngine::default().export(&sbom, ["B"]).unwrap();
        assert_eq!(out.component_count(), 3);
        assert_eq!(out.relationship_count(), 3);
        assert_eq!(out.roots, vec![ComponentId::new("B")]);
    }

    #[test]
    fn test_missing_ids_fail_before_traversal() {
        let err = ExportEngine::default()
            .export(&sample(), ["lib", "ghost", "phantom"])
            .unwrap_err();
        match err {
            SitError::ComponentNotFound { id, context } => {
                assert_eq!(id.as_str(), "ghost");
                assert!(context.contains("phantom"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_empty_request() {
        let err = ExportEngine::default()
            .export(&sample(), Vec::<String>::new())
            .unwrap_err();
        assert!(matches!(err, SitError::Validation(_)));
    }

    #[test]
    fn test_relation_filter() {
        let options = ExportOptions {
            relation_filter: vec![RelationshipType::DependsOn],
            max_depth: None,
        };
        let out = ExportEngine::new(options).export(&sample(), ["app"]).unwrap();
        assert!(!out.contains("lint"));
        assert!(out.contains("zlib"));
        assert!(out
            .relationships
            .iter()
            .all(|r| r.kind == RelationshipType::DependsOn));
    }

    #[test]
    fn test_max_depth() {
        let options = ExportOptions {
            relation_filter: Vec::new(),
            max_depth: Some(1),
        };
        let out = ExportEngine::new(options).export(&sample(), ["app"]).unwrap();
        let ids: Vec<_> = out.components.keys().map(ComponentId::as_str).collect();
        assert_eq!(ids, vec!["app", "lib", "tool"]);

        let zero = ExportEngine::new(ExportOptions {
            max_depth: Some(0),
            ..Default::default()
        })
        .export(&sample(), ["app"])
        .unwrap();
        assert_eq!(zero.component_count(), 1);
    }

    #[test]
    fn test_export_whole_graph_from_root() {
        let sbom = sample();
        let out = ExportEngine::default().export(&sbom, ["app"]).unwrap();
        assert_eq!(out.component_count(), 5);
        assert_eq!(out.relationship_count(), 4);
        assert_ne!(out.document.serial_number, sbom.document.serial_number);
    }
}
