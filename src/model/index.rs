//! Arena index over a canonical graph.
//!
//! `GraphIndex` assigns every component a dense `usize` handle (its
//! position in the component map) and stores outgoing edges as adjacency
//! lists of handles. Traversals then work on plain integer slices and a
//! visited bitmap instead of hashing IDs at every step.
//!
//! # Example
//!
//! ```ignore
//! let index = GraphIndex::build(&sbom);
//! let start = index.position("pkg-a").unwrap();
//! let reached: Vec<usize> = index.successors(start).iter().map(|e| e.target).collect();
//! ```

use super::{CanonicalSbom, ComponentId};
use std::collections::HashMap;

/// Outgoing edge in the index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexedEdge {
    /// Handle of the target component
    pub target: usize,
    /// Position of the relationship in the graph's relationship set
    pub relationship: usize,
}

/// Precomputed adjacency index for efficient traversal.
#[derive(Debug, Clone)]
#[must_use]
pub struct GraphIndex {
    /// Handle by component ID
    positions: HashMap<ComponentId, usize>,
    /// Outgoing edges by source handle
    outgoing: Vec<Vec<IndexedEdge>>,
}

impl GraphIndex {
    /// Build the index. O(n + m).
    ///
    /// Relationships with an endpoint outside the graph are not indexed.
    pub fn build(sbom: &CanonicalSbom) -> Self {
        let positions: HashMap<ComponentId, usize> = sbom
            .components
            .keys()
            .enumerate()
            .map(|(idx, id)| (id.clone(), idx))
            .collect();

        let mut outgoing = vec![Vec::new(); positions.len()];

        for (rel_idx, rel) in sbom.relationships.iter().enumerate() {
            let (Some(&from), Some(&to)) = (
                positions.get(rel.from.as_str()),
                positions.get(rel.to.as_str()),
            ) else {
                continue;
            };
            outgoing[from].push(IndexedEdge {
                target: to,
                relationship: rel_idx,
            });
        }

        Self {
            positions,
            outgoing,
        }
    }

    /// Handle of a component ID
    #[must_use]
    pub fn position(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    /// Outgoing edges of a handle
    #[must_use]
    pub fn successors(&self, handle: usize) -> &[IndexedEdge] {
        self.outgoing.get(handle).map_or(&[], Vec::as_slice)
    }

    /// Number of indexed components
    #[must_use]
    pub fn len(&self) -> usize {
        self.outgoing.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outgoing.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Component, Relationship};

    fn chain() -> CanonicalSbom {
        let mut sbom = CanonicalSbom::default();
        for id in ["a", "b", "c"] {
            sbom.add_component(Component::new(id, id));
        }
        sbom.add_relationship(Relationship::depends_on("a", "b"));
        sbom.add_relationship(Relationship::depends_on("b", "c"));
        sbom
    }

    #[test]
    fn test_index_positions_follow_insertion_order() {
        let index = GraphIndex::build(&chain());
        assert_eq!(index.len(), 3);
        assert_eq!(index.position("a"), Some(0));
        assert_eq!(index.position("c"), Some(2));
        assert_eq!(index.position("b"), Some(1));
        assert_eq!(index.position("zzz"), None);
    }

    #[test]
    fn test_successors_carry_relationship_position() {
        let index = GraphIndex::build(&chain());
        let a = index.position("a").unwrap();
        assert_eq!(
            index.successors(a),
            &[IndexedEdge {
                target: 1,
                relationship: 0
            }]
        );
        let b = index.position("b").unwrap();
        assert_eq!(index.successors(b)[0].relationship, 1);
        assert!(index.successors(99).is_empty());
    }

    #[test]
    fn test_dangling_edges_are_skipped() {
        let mut sbom = chain();
        sbom.add_relationship(Relationship::depends_on("c", "ghost"));
        let index = GraphIndex::build(&sbom);
        assert!(index.successors(2).is_empty());
    }
}
