use std::io::Write;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::StoreWriteError;
use crate::export::model::ExportFormat;
use crate::export::render;
use crate::graph::edge::ImportEdge;
use crate::graph::{ImportGraph, NodeRecord};

use super::GraphSink;

/// Holds the graph in a petgraph StableGraph, with the same match-then-create
/// edge semantics as a graph database.
///
/// When constructed with [`MemorySink::rendering`], the final graph is written
/// to the output in the chosen format on [`GraphSink::close`].
pub struct MemorySink {
    graph: ImportGraph,
    output: Option<(ExportFormat, Box<dyn Write + Send>)>,
    /// Edges whose importer or imported id matched no node.
    unmatched_edges: usize,
    closed: bool,
}

impl MemorySink {
    /// A sink that only keeps the graph in memory.
    pub fn new() -> Self {
        Self {
            graph: ImportGraph::new(),
            output: None,
            unmatched_edges: 0,
            closed: false,
        }
    }

    /// A sink that renders the graph to `out` when closed.
    pub fn rendering(format: ExportFormat, out: Box<dyn Write + Send>) -> Self {
        Self {
            output: Some((format, out)),
            ..Self::new()
        }
    }

    #[cfg(test)]
    pub fn graph(&self) -> &ImportGraph {
        &self.graph
    }

    #[cfg(test)]
    pub fn unmatched_edges(&self) -> usize {
        self.unmatched_edges
    }

    fn ensure_open(&self) -> Result<(), StoreWriteError> {
        if self.closed {
            Err(StoreWriteError::Closed)
        } else {
            Ok(())
        }
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GraphSink for MemorySink {
    async fn wipe_all(&mut self) -> Result<(), StoreWriteError> {
        self.ensure_open()?;
        self.graph.clear();
        self.unmatched_edges = 0;
        Ok(())
    }

    async fn create_node(&mut self, node: &NodeRecord) -> Result<(), StoreWriteError> {
        self.ensure_open()?;
        self.graph.add_node(node.clone());
        Ok(())
    }

    async fn create_edge(&mut self, edge: &ImportEdge) -> Result<(), StoreWriteError> {
        self.ensure_open()?;
        if self.graph.add_edge(edge.clone()).is_none() {
            debug!(
                "no node pair for {} -> {} ({} as {})",
                edge.importer, edge.imported, edge.name, edge.alias
            );
            self.unmatched_edges += 1;
        }
        Ok(())
    }

    async fn close(&mut self) -> Result<(), StoreWriteError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        info!(
            "memory graph holds {} nodes and {} edges ({} edges matched no node)",
            self.graph.node_count(),
            self.graph.edge_count(),
            self.unmatched_edges
        );
        if let Some((format, mut out)) = self.output.take() {
            let rendered = render(&self.graph, format)?;
            out.write_all(rendered.as_bytes())?;
            if !rendered.ends_with('\n') {
                out.write_all(b"\n")?;
            }
            out.flush()?;
        }
        Ok(())
    }
}
