//! `DependencyGraph`, built from file-level import edges.

use serde::{Deserialize, Serialize};

/// A node in the dependency graph: one per analyzed file (or unresolved
/// external, when the builder chooses to surface one — the default builder
/// drops externals per the state machine).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    /// Node id, equal to the file path.
    pub id: String,
    /// Basename, for display.
    pub name: String,
    /// Grouping tag, typically the language.
    pub group: String,
    /// Node type (`"file"`, `"docker-base"`, ...).
    #[serde(rename = "type")]
    pub node_type: String,
    /// Visual size hint: `100 + 20 * out_degree`.
    pub size: u32,
}

/// A directed edge in the dependency graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphLink {
    /// Source node id.
    pub source: String,
    /// Target node id.
    pub target: String,
    /// Edge weight; always `>= 1`.
    pub value: u32,
}

/// `{nodes, links}` import graph over the working set.
///
/// Invariants: every link's `source`/`target` is present in `nodes`; no
/// duplicate link for the same ordered pair within a single edge class;
/// `value >= 1`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DependencyGraph {
    /// Graph nodes.
    pub nodes: Vec<GraphNode>,
    /// Graph edges.
    pub links: Vec<GraphLink>,
}

impl DependencyGraph {
    /// An empty graph.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether every link references nodes present in `nodes`. Used by tests and as a defensive assertion point after
    /// construction.
    #[must_use]
    pub fn links_reference_known_nodes(&self) -> bool {
        let ids: std::collections::HashSet<&str> =
            self.nodes.iter().map(|n| n.id.as_str()).collect();
        self.links
            .iter()
            .all(|l| ids.contains(l.source.as_str()) && ids.contains(l.target.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_graph_trivially_satisfies_the_link_invariant() {
        assert!(DependencyGraph::empty().links_reference_known_nodes());
    }

    #[test]
    fn detects_a_dangling_link() {
        let graph = DependencyGraph {
            nodes: vec![GraphNode {
                id: "a.py".into(),
                name: "a.py".into(),
                group: "python-like".into(),
                node_type: "file".into(),
                size: 100,
            }],
            links: vec![GraphLink {
                source: "a.py".into(),
                target: "missing.py".into(),
                value: 1,
            }],
        };
        assert!(!graph.links_reference_known_nodes());
    }
}
