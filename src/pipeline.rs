use std::path::Path;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::ScanRules;
use crate::error::{ScanError, StoreWriteError};
use crate::graph::NodeRecord;
use crate::graph::dedup::dedupe_edges;
use crate::graph::edge::ImportEdge;
use crate::graph::node::SourceFile;
use crate::parser::{StatementKind, extract_statements};
use crate::progress::Progress;
use crate::resolver::ModuleResolver;
use crate::sink::GraphSink;
use crate::walker::walk_project;

/// Counters collected over one build.
#[derive(Debug, Default, Clone, Serialize)]
pub struct BuildStats {
    /// Source files found by the scanner.
    pub file_count: usize,
    /// Node creation requests accepted by the sink.
    pub nodes_written: usize,
    /// Edges extracted across both passes, before deduplication.
    pub raw_edges: usize,
    /// Edges left after deduplication.
    pub unique_edges: usize,
    /// Edge creation requests accepted by the sink.
    pub edges_written: usize,
    /// Sink writes (wipe, node or edge) that were rejected and skipped.
    pub failed_writes: usize,
    /// Wall-clock time for the build in seconds.
    pub elapsed_secs: f64,
}

/// Everything the pipeline needs besides the sink.
pub struct BuildContext<'a> {
    pub root: &'a Path,
    pub rules: &'a ScanRules,
    pub resolver: &'a ModuleResolver,
    pub progress: &'a Progress,
}

/// Rebuild the graph in `sink` from the source tree under `ctx.root`.
///
/// Stages run strictly in sequence, each fully materialized before the next:
///
/// 1. wipe the sink
/// 2. scan the tree
/// 3. classify files and insert one node per file
/// 4. read sources and extract edges (re-export pass, then import pass)
/// 5. deduplicate edges
/// 6. insert edges
///
/// Every sink call is awaited before the next is issued. Rejected writes are
/// logged and counted; scan and read failures abort the build. The sink is not
/// closed here: its owner closes it whatever this returns.
pub async fn build_graph(
    sink: &mut dyn GraphSink,
    ctx: &BuildContext<'_>,
) -> Result<BuildStats, ScanError> {
    let started = Instant::now();
    let mut stats = BuildStats::default();

    // -----------------------------------------------------------------------
    // Stage 1: wipe.
    // -----------------------------------------------------------------------
    let wipe = ctx.progress.stage("wiping db", 1);
    if let Err(err) = sink.wipe_all().await {
        warn!("failed to wipe graph store: {err}");
        stats.failed_writes += 1;
    }
    wipe.finish();

    // -----------------------------------------------------------------------
    // Stage 2: scan.
    // -----------------------------------------------------------------------
    let scan = ctx.progress.stage("loading source code", 1);
    let paths = walk_project(ctx.root, ctx.rules)?;
    scan.finish();
    stats.file_count = paths.len();
    info!("found {} source file(s) under {}", paths.len(), ctx.root.display());

    // -----------------------------------------------------------------------
    // Stage 3: classify and insert nodes.
    // -----------------------------------------------------------------------
    let files: Vec<SourceFile> = paths
        .iter()
        .map(|path| SourceFile::classify(path, ctx.root))
        .collect();

    let nodes = ctx.progress.stage("inserting nodes", files.len() as u64);
    for file in &files {
        let record = NodeRecord {
            labels: file.labels(),
            attrs: file.attrs(),
        };
        match sink.create_node(&record).await {
            Ok(()) => stats.nodes_written += 1,
            Err(err) => record_failure(&mut stats, "node", &file.id, err),
        }
        nodes.inc();
    }
    nodes.finish();

    // -----------------------------------------------------------------------
    // Stage 4: extract and resolve.
    // -----------------------------------------------------------------------
    let sources = read_sources(&files)?;
    let parsing = ctx.progress.stage("parsing imports", (files.len() * 2) as u64);
    let mut edges = Vec::new();
    for kind in [StatementKind::ReExport, StatementKind::Import] {
        for (file, source) in files.iter().zip(&sources) {
            edges.extend(extract_edges(file, source, kind, ctx.resolver));
            parsing.inc();
        }
    }
    parsing.finish();
    stats.raw_edges = edges.len();

    // -----------------------------------------------------------------------
    // Stage 5: dedupe.
    // -----------------------------------------------------------------------
    let dedupe = ctx.progress.stage("deduping imports", edges.len() as u64);
    let edges = dedupe_edges(edges);
    dedupe.finish();
    stats.unique_edges = edges.len();
    info!(
        "extracted {} edge(s), {} after deduplication",
        stats.raw_edges, stats.unique_edges
    );

    // -----------------------------------------------------------------------
    // Stage 6: insert edges.
    // -----------------------------------------------------------------------
    let inserting = ctx.progress.stage("inserting edges", edges.len() as u64);
    for edge in &edges {
        match sink.create_edge(edge).await {
            Ok(()) => stats.edges_written += 1,
            Err(err) => {
                let what = format!("{} -> {}", edge.importer, edge.imported);
                record_failure(&mut stats, "edge", &what, err);
            }
        }
        inserting.inc();
    }
    inserting.finish();

    stats.elapsed_secs = started.elapsed().as_secs_f64();
    Ok(stats)
}

/// Extract, parse and resolve every statement of `kind` in one file.
pub fn extract_edges(
    file: &SourceFile,
    source: &str,
    kind: StatementKind,
    resolver: &ModuleResolver,
) -> Vec<ImportEdge> {
    let mut edges = Vec::new();
    for statement in extract_statements(source, kind) {
        let imported = resolver.resolve(&statement.specifier, file);
        debug!(
            "{}: {:?} {} -> {}",
            file.id, statement.kind, statement.specifier, imported
        );
        for binding in statement.bindings() {
            edges.push(ImportEdge::new(&file.id, &imported, binding));
        }
    }
    edges
}

/// Read every source as text. Invalid UTF-8 is replaced, not rejected; only
/// I/O failures are fatal.
fn read_sources(files: &[SourceFile]) -> Result<Vec<String>, ScanError> {
    files
        .iter()
        .map(|file| {
            let bytes = std::fs::read(&file.path).map_err(|source| ScanError::Read {
                path: file.path.clone(),
                source,
            })?;
            Ok(match String::from_utf8(bytes) {
                Ok(text) => text,
                Err(err) => {
                    debug!("{} is not valid UTF-8, decoding lossily", file.id);
                    String::from_utf8_lossy(err.as_bytes()).into_owned()
                }
            })
        })
        .collect()
}

fn record_failure(stats: &mut BuildStats, what: &str, id: &str, err: StoreWriteError) {
    warn!("failed to create {what} {id}: {err}");
    stats.failed_writes += 1;
}
