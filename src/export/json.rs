use petgraph::visit::{EdgeRef, IntoEdgeReferences};
use serde::Serialize;

use crate::graph::edge::ImportEdge;
use crate::graph::{ImportGraph, NodeRecord};

#[derive(Serialize)]
struct GraphDocument<'a> {
    nodes: Vec<&'a NodeRecord>,
    edges: Vec<&'a ImportEdge>,
}

/// Pretty-printed JSON of every node and every matched edge, in insertion order.
pub fn render_json(graph: &ImportGraph) -> Result<String, serde_json::Error> {
    let doc = GraphDocument {
        nodes: graph.graph.node_indices().map(|i| &graph.graph[i]).collect(),
        edges: graph
            .graph
            .edge_references()
            .map(|e| e.weight())
            .collect(),
    };
    serde_json::to_string_pretty(&doc)
}
