pub mod dedup;
pub mod edge;
pub mod node;

use std::collections::HashMap;

use petgraph::Directed;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableGraph};
use serde::Serialize;

use edge::ImportEdge;
use node::NodeAttrs;

/// A node as received by a sink: ordered labels plus attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeRecord {
    pub labels: Vec<String>,
    #[serde(flatten)]
    pub attrs: NodeAttrs,
}

/// In-memory import graph: a directed petgraph StableGraph keyed by canonical id.
pub struct ImportGraph {
    pub graph: StableGraph<NodeRecord, ImportEdge, Directed>,
    /// Maps canonical module ids (the `file` attribute) to node indices.
    pub file_index: HashMap<String, NodeIndex>,
}

impl ImportGraph {
    pub fn new() -> Self {
        Self {
            graph: StableGraph::new(),
            file_index: HashMap::new(),
        }
    }

    /// Add a node. If a node with the same `file` already exists, returns the existing index.
    pub fn add_node(&mut self, record: NodeRecord) -> NodeIndex {
        if let Some(&existing) = self.file_index.get(&record.attrs.file) {
            return existing;
        }
        let file = record.attrs.file.clone();
        let idx = self.graph.add_node(record);
        self.file_index.insert(file, idx);
        idx
    }

    /// Match both endpoints by canonical id and create the edge.
    ///
    /// Returns `None` without modifying the graph when either endpoint is missing.
    pub fn add_edge(&mut self, edge: ImportEdge) -> Option<EdgeIndex> {
        let from = *self.file_index.get(&edge.importer)?;
        let to = *self.file_index.get(&edge.imported)?;
        Some(self.graph.add_edge(from, to, edge))
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn clear(&mut self) {
        self.graph.clear();
        self.file_index.clear();
    }
}

impl Default for ImportGraph {
    fn default() -> Self {
        Self::new()
    }
}
