use serde::Serialize;

use crate::graph::node::SourceFile;
use crate::pipeline::BuildStats;

/// Print a summary of the build to stderr.
///
/// stdout is reserved for sink output (Cypher script or rendered graph), so the
/// summary always goes to stderr; `json = true` emits a pretty-printed object.
pub fn print_summary(stats: &BuildStats, json: bool) {
    if json {
        match serde_json::to_string_pretty(stats) {
            Ok(s) => eprintln!("{}", s),
            Err(e) => eprintln!("error serialising stats: {}", e),
        }
        return;
    }

    eprintln!(
        "Indexed {} files in {:.2}s",
        stats.file_count, stats.elapsed_secs
    );
    eprintln!("  {} nodes written", stats.nodes_written);
    eprintln!(
        "  {} edges extracted, {} unique, {} written",
        stats.raw_edges, stats.unique_edges, stats.edges_written
    );

    if stats.failed_writes > 0 {
        eprintln!("  {} writes rejected by the sink", stats.failed_writes);
    }
}

#[derive(Serialize)]
struct FileEntry<'a> {
    file: &'a str,
    name: &'a str,
    labels: Vec<String>,
    path: String,
}

/// Print the scanned files, one `id<TAB>labels` line each, or a JSON array.
pub fn print_files(files: &[SourceFile], json: bool) {
    if json {
        let entries: Vec<FileEntry> = files
            .iter()
            .map(|f| FileEntry {
                file: &f.id,
                name: &f.name,
                labels: f.labels(),
                path: f.path.display().to_string(),
            })
            .collect();
        match serde_json::to_string_pretty(&entries) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("error serialising file list: {}", e),
        }
        return;
    }

    for file in files {
        println!("{}\t{}", file.id, file.labels().join(":"));
    }
}
