use std::fmt::Write as _;
use std::io::Write;

use async_trait::async_trait;

use crate::error::StoreWriteError;
use crate::graph::NodeRecord;
use crate::graph::edge::ImportEdge;

use super::GraphSink;

/// Writes the graph as a Cypher script, one statement per line.
///
/// The script is replayable against a Neo4j-compatible store
/// (`cypher-shell < graph.cypher`): it starts by wiping the database, creates
/// every node, then matches endpoints by `file` to create `IMPORTS`
/// relationships. Edges whose endpoints do not exist match nothing and are
/// silently skipped by the store.
pub struct CypherSink {
    out: Option<Box<dyn Write + Send>>,
}

impl CypherSink {
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self { out: Some(out) }
    }

    fn write_statement(&mut self, statement: &str) -> Result<(), StoreWriteError> {
        let out = self.out.as_mut().ok_or(StoreWriteError::Closed)?;
        writeln!(out, "{statement};")?;
        Ok(())
    }
}

#[async_trait]
impl GraphSink for CypherSink {
    async fn wipe_all(&mut self) -> Result<(), StoreWriteError> {
        self.write_statement("MATCH (n) DETACH DELETE n")
    }

    async fn create_node(&mut self, node: &NodeRecord) -> Result<(), StoreWriteError> {
        let statement = node_statement(node)?;
        self.write_statement(&statement)
    }

    async fn create_edge(&mut self, edge: &ImportEdge) -> Result<(), StoreWriteError> {
        let statement = edge_statement(edge)?;
        self.write_statement(&statement)
    }

    async fn close(&mut self) -> Result<(), StoreWriteError> {
        if let Some(mut out) = self.out.take() {
            out.flush()?;
        }
        Ok(())
    }
}

/// `CREATE (n:File:Checkout {name: "...", ...})`
pub fn node_statement(node: &NodeRecord) -> Result<String, StoreWriteError> {
    let attrs = &node.attrs;
    let mut labels = String::new();
    for label in &node.labels {
        labels.push(':');
        labels.push_str(&cypher_label(label));
    }

    let mut statement = format!("CREATE (n{labels} {{");
    write!(
        statement,
        "name: {}, file: {}, feature: {}, module: {}, spec: {}, pact: {}, page: {}, fixture: {}",
        cypher_string(&attrs.name)?,
        cypher_string(&attrs.file)?,
        attrs.feature,
        cypher_string(&attrs.module)?,
        attrs.spec,
        attrs.pact,
        attrs.page,
        attrs.fixture,
    )
    .map_err(|e| StoreWriteError::Rejected(e.to_string()))?;
    statement.push_str("})");
    Ok(statement)
}

/// `MATCH (a), (b) WHERE a.file = ... AND b.file = ... CREATE (a)-[:IMPORTS {...}]->(b)`
pub fn edge_statement(edge: &ImportEdge) -> Result<String, StoreWriteError> {
    let importer = cypher_string(&edge.importer)?;
    let imported = cypher_string(&edge.imported)?;
    Ok(format!(
        "MATCH (a), (b) WHERE a.file = {importer} AND b.file = {imported} \
         CREATE (a)-[:IMPORTS {{item: {}, as: {}, in: {importer}, from: {imported}, sideEffectsOnly: {}}}]->(b)",
        cypher_string(&edge.name)?,
        cypher_string(&edge.alias)?,
        edge.side_effects_only,
    ))
}

/// Double-quoted string literal. JSON escaping is a subset of what Cypher accepts.
fn cypher_string(value: &str) -> Result<String, StoreWriteError> {
    Ok(serde_json::to_string(value)?)
}

/// Plain identifiers are written as-is, anything else is backtick-quoted.
fn cypher_label(label: &str) -> String {
    let mut chars = label.chars();
    let plain = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if plain {
        label.to_owned()
    } else {
        format!("`{}`", label.replace('`', "``"))
    }
}
