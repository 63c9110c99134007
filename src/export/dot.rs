use std::collections::BTreeMap;
use std::fmt::Write;

use petgraph::stable_graph::NodeIndex;
use petgraph::visit::{EdgeRef, IntoEdgeReferences};

use crate::graph::ImportGraph;

/// Sanitize a string for use as a DOT node ID or subgraph name.
///
/// Replaces non-alphanumeric characters with `_`. Prepends `n` if the result
/// starts with a digit (DOT IDs must not start with a digit).
pub fn sanitize_dot_id(s: &str) -> String {
    let mut result: String = s
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if result.starts_with(|c: char| c.is_ascii_digit()) {
        result.insert(0, 'n');
    }
    if result.is_empty() {
        result = "node".to_string();
    }
    result
}

/// Escape a string for use inside a double-quoted DOT attribute.
fn escape_label(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// DOT fillcolor for a node's primary label.
fn kind_fillcolor(kind: &str) -> &'static str {
    match kind {
        "Feature" => "#A9DFBF",
        "Page" => "#AED6F1",
        _ => "#EAECEE",
    }
}

/// Render the graph as DOT, clustering nodes by grouping id (`module`).
///
/// Node IDs are `n<index>` so that distinct files never collide after sanitizing.
pub fn render_dot(graph: &ImportGraph) -> String {
    let mut out = String::new();
    writeln!(out, "digraph imports {{").unwrap();
    writeln!(out, "    rankdir=LR;").unwrap();
    writeln!(out, "    node [shape=box style=filled fontname=monospace];").unwrap();

    let mut clusters: BTreeMap<&str, Vec<NodeIndex>> = BTreeMap::new();
    for idx in graph.graph.node_indices() {
        clusters
            .entry(graph.graph[idx].attrs.module.as_str())
            .or_default()
            .push(idx);
    }

    for (module, members) in &clusters {
        writeln!(out, "    subgraph cluster_{} {{", sanitize_dot_id(module)).unwrap();
        writeln!(out, "        label=\"{}\";", escape_label(module)).unwrap();
        for &idx in members {
            let node = &graph.graph[idx];
            let kind = node.labels.first().map(String::as_str).unwrap_or("File");
            writeln!(
                out,
                "        n{} [label=\"{}\" tooltip=\"{}\" fillcolor=\"{}\"];",
                idx.index(),
                escape_label(&node.attrs.name),
                escape_label(&node.attrs.file),
                kind_fillcolor(kind)
            )
            .unwrap();
        }
        writeln!(out, "    }}").unwrap();
    }

    for edge in graph.graph.edge_references() {
        let weight = edge.weight();
        let style = if weight.side_effects_only {
            "style=dotted"
        } else {
            "style=solid"
        };
        let label = if weight.name == weight.alias {
            weight.name.clone()
        } else {
            format!("{} as {}", weight.name, weight.alias)
        };
        writeln!(
            out,
            "    n{} -> n{} [label=\"{}\" {}];",
            edge.source().index(),
            edge.target().index(),
            escape_label(&label),
            style
        )
        .unwrap();
    }

    writeln!(out, "}}").unwrap();
    out
}
