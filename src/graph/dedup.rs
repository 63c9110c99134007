use std::collections::HashSet;

use super::edge::ImportEdge;

/// Collapse edges that are identical across all five fields.
///
/// The first occurrence of each edge is kept, in input order.
pub fn dedupe_edges(edges: Vec<ImportEdge>) -> Vec<ImportEdge> {
    let mut seen: HashSet<ImportEdge> = HashSet::with_capacity(edges.len());
    let mut unique = Vec::with_capacity(edges.len());
    for edge in edges {
        if seen.insert(edge.clone()) {
            unique.push(edge);
        }
    }
    unique
}
