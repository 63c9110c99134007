pub mod cypher;
pub mod memory;

use async_trait::async_trait;

use crate::error::StoreWriteError;
use crate::graph::NodeRecord;
use crate::graph::edge::ImportEdge;

pub use cypher::CypherSink;
pub use memory::MemorySink;

/// Persistence boundary for the import graph.
///
/// Sinks own their connection or output handle. The pipeline issues one call
/// at a time and awaits each before the next; the caller that created the sink
/// is responsible for calling [`GraphSink::close`] on every exit path.
#[async_trait]
pub trait GraphSink: Send {
    /// Remove every node and relationship from the store.
    async fn wipe_all(&mut self) -> Result<(), StoreWriteError>;

    /// Create one node with the given ordered labels and attributes.
    async fn create_node(&mut self, node: &NodeRecord) -> Result<(), StoreWriteError>;

    /// Match the importer and imported nodes by canonical id (`file`) and
    /// relate them. A failed match is not an error.
    async fn create_edge(&mut self, edge: &ImportEdge) -> Result<(), StoreWriteError>;

    /// Flush and release the underlying resource.
    async fn close(&mut self) -> Result<(), StoreWriteError>;
}
