//! The dependency graph builder port (C7).

use crate::entities::{DependencyGraph, WorkingFile};

/// Builds a file-level import graph over a working set. Pure: no network,
/// no global state.
pub trait DependencyGraphBuilder: Send + Sync {
    /// Extract import edges across `files` and assemble the graph.
    fn build(&self, files: &[WorkingFile]) -> DependencyGraph;
}
