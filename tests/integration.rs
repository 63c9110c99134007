/// Integration test suite: builds small JS/TS trees in temp directories and drives the
/// compiled `import-graph` binary against them.
///
/// The `CARGO_BIN_EXE_import-graph` environment variable is set by Cargo during `cargo test`
/// to point to the compiled binary for the current profile.
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_import-graph"))
}

fn run(args: &[&str]) -> Output {
    Command::new(binary())
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to invoke import-graph binary")
}

/// Run an import-graph command and assert it exits successfully.
/// Returns (stdout, stderr).
fn run_success(args: &[&str]) -> (String, String) {
    let out = run(args);
    let stdout = String::from_utf8_lossy(&out.stdout).to_string();
    let stderr = String::from_utf8_lossy(&out.stderr).to_string();
    assert!(
        out.status.success(),
        "command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
        args,
        out.status,
        stdout,
        stderr
    );
    (stdout, stderr)
}

/// Run an import-graph command and assert it exits with a non-zero status.
fn run_failure(args: &[&str]) -> String {
    let out = run(args);
    let stderr = String::from_utf8_lossy(&out.stderr).to_string();
    assert!(
        !out.status.success(),
        "command {:?} expected to fail but exited successfully\nstderr: {}",
        args,
        stderr
    );
    stderr
}

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// A small frontend tree:
///
/// - `src/checkout/index.ts`: feature entry re-exporting its parts
/// - `src/checkout/cart.ts`: imports a sibling, a package and a polyfill
/// - `src/checkout/total.ts`
/// - `src/design-system/index.ts`: feature with a hyphenated name
/// - `pages/cart.tsx`: page importing a bare feature reference
/// - `src/checkout/specs/cart.spec.ts`: spec file
fn frontend_tree() -> TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path();
    write(
        root,
        "src/checkout/index.ts",
        "export { Cart } from './cart';\nexport * from './total';\n",
    );
    write(
        root,
        "src/checkout/cart.ts",
        "import React, { useMemo as memo } from 'react';\nimport { sum } from './total';\nimport './polyfill';\nimport { Button } from '../design-system';\n",
    );
    write(root, "src/checkout/total.ts", "export const sum = 1;\n");
    write(root, "src/design-system/index.ts", "export const Button = 1;\n");
    write(
        root,
        "pages/cart.tsx",
        "import Checkout from 'src/checkout';\nimport * as ds from '../src/design-system';\n",
    );
    write(
        root,
        "src/checkout/specs/cart.spec.ts",
        "import { Cart } from '../cart';\n",
    );
    write(root, "src/checkout/README.md", "import nothing from 'here'\n");
    dir
}

fn build_json(root: &Path, extra: &[&str]) -> serde_json::Value {
    let path = root.to_str().unwrap();
    let mut args = vec!["build", path, "--sink", "memory", "--format", "json", "--quiet"];
    args.extend_from_slice(extra);
    let (stdout, _) = run_success(&args);
    serde_json::from_str(&stdout).expect("build output is not valid JSON")
}

fn has_edge(graph: &serde_json::Value, from_file: &str, to_file: &str, item: &str, alias: &str) -> bool {
    graph["edges"].as_array().unwrap().iter().any(|e| {
        e["in"] == from_file && e["from"] == to_file && e["item"] == item && e["as"] == alias
    })
}

// ---------------------------------------------------------------------------
// build
// ---------------------------------------------------------------------------

/// The minimal tree: `a/index.ts` importing `./b` yields one node per file and one edge.
#[test]
fn test_build_minimal_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a/index.ts", "import b from './b'\n");
    write(dir.path(), "a/b.ts", "");

    let graph = build_json(dir.path(), &["--include-dir", "^a$"]);

    let nodes = graph["nodes"].as_array().unwrap();
    let files: Vec<&str> = nodes.iter().map(|n| n["file"].as_str().unwrap()).collect();
    assert_eq!(files, vec!["a/b", "a/index"]);

    let edges = graph["edges"].as_array().unwrap();
    assert_eq!(edges.len(), 1);
    assert_eq!(
        edges[0],
        serde_json::json!({
            "in": "a/index",
            "from": "a/b",
            "item": "default",
            "as": "b",
            "sideEffectsOnly": false
        })
    );
}

#[test]
fn test_build_frontend_tree_nodes() {
    let dir = frontend_tree();
    let graph = build_json(dir.path(), &[]);

    let nodes = graph["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 6, "README.md must not be indexed");

    let node = |file: &str| {
        nodes
            .iter()
            .find(|n| n["file"] == file)
            .unwrap_or_else(|| panic!("missing node {file}"))
            .clone()
    };

    let feature = node("src/checkout/index");
    assert_eq!(feature["name"], "checkout");
    assert_eq!(feature["feature"], true);
    assert_eq!(feature["labels"], serde_json::json!(["Feature"]));

    let design = node("src/design-system/index");
    assert_eq!(design["module"], "DesignSystem");

    let cart = node("src/checkout/cart");
    assert_eq!(cart["labels"], serde_json::json!(["File", "Checkout"]));

    let spec = node("src/checkout/specs/cart.spec");
    assert_eq!(spec["spec"], true);
    assert_eq!(spec["labels"], serde_json::json!(["File", "Checkout", "Spec"]));

    let page = node("pages/cart");
    assert_eq!(page["page"], true);
    assert_eq!(page["labels"], serde_json::json!(["Page"]));
}

#[test]
fn test_build_frontend_tree_edges() {
    let dir = frontend_tree();
    let graph = build_json(dir.path(), &[]);

    // Re-exports from the feature entry.
    assert!(has_edge(&graph, "src/checkout/index", "src/checkout/cart", "Cart", "Cart"));
    assert!(has_edge(&graph, "src/checkout/index", "src/checkout/total", "*", "*"));
    // Sibling import and feature references normalized to their index entry.
    assert!(has_edge(&graph, "src/checkout/cart", "src/checkout/total", "sum", "sum"));
    assert!(has_edge(&graph, "src/checkout/cart", "src/design-system/index", "Button", "Button"));
    assert!(has_edge(&graph, "pages/cart", "src/checkout/index", "default", "Checkout"));
    assert!(has_edge(&graph, "pages/cart", "src/design-system/index", "*", "ds"));
    assert!(has_edge(&graph, "src/checkout/specs/cart.spec", "src/checkout/cart", "Cart", "Cart"));

    // Edges to packages and unscanned files match no node and are not in the graph.
    assert!(!has_edge(&graph, "src/checkout/cart", "react", "default", "React"));
    assert!(!graph["edges"]
        .as_array()
        .unwrap()
        .iter()
        .any(|e| e["from"] == "src/checkout/polyfill"));
}

#[test]
fn test_build_is_reproducible() {
    let dir = frontend_tree();
    let first = build_json(dir.path(), &[]);
    let second = build_json(dir.path(), &[]);
    assert_eq!(first, second);
}

#[test]
fn test_build_cypher_script() {
    let dir = frontend_tree();
    let out = dir.path().join("graph.cypher");
    let root = dir.path().to_str().unwrap();
    run_success(&["build", root, "--quiet", "--output", out.to_str().unwrap()]);

    let script = fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = script.lines().collect();
    assert_eq!(lines[0], "MATCH (n) DETACH DELETE n;");

    let creates = lines.iter().filter(|l| l.starts_with("CREATE (n:")).count();
    assert_eq!(creates, 6);
    assert!(lines.contains(
        &"CREATE (n:Feature {name: \"checkout\", file: \"src/checkout/index\", feature: true, module: \"Checkout\", spec: false, pact: false, page: false, fixture: false});"
    ));

    // Unmatched edges are still emitted; the store drops them.
    assert!(script.contains(
        "MATCH (a), (b) WHERE a.file = \"src/checkout/cart\" AND b.file = \"react\" \
         CREATE (a)-[:IMPORTS {item: \"useMemo\", as: \"memo\", in: \"src/checkout/cart\", from: \"react\", sideEffectsOnly: false}]->(b);"
    ));
    assert!(script.contains(
        "CREATE (a)-[:IMPORTS {item: \"./polyfill\", as: \"./polyfill\", in: \"src/checkout/cart\", from: \"src/checkout/polyfill\", sideEffectsOnly: true}]->(b);"
    ));

    // Nodes come before edges, and no edge line is duplicated.
    let first_match = lines.iter().skip(1).position(|l| l.starts_with("MATCH")).unwrap() + 1;
    assert!(lines[first_match..].iter().all(|l| l.starts_with("MATCH")));
    let mut edge_lines: Vec<&str> = lines[first_match..].to_vec();
    let total = edge_lines.len();
    edge_lines.sort_unstable();
    edge_lines.dedup();
    assert_eq!(edge_lines.len(), total);
}

#[test]
fn test_build_dot_output() {
    let dir = frontend_tree();
    let root = dir.path().to_str().unwrap();
    let (stdout, _) = run_success(&["build", root, "--sink", "memory", "--format", "dot", "--quiet"]);
    assert!(stdout.starts_with("digraph imports {"));
    assert!(stdout.contains("subgraph cluster_Checkout {"));
    assert!(stdout.contains("label=\"default as Checkout\""));
}

#[test]
fn test_build_json_summary_on_stderr() {
    let dir = frontend_tree();
    let root = dir.path().to_str().unwrap();
    let out = dir.path().join("graph.cypher");
    let (stdout, stderr) = run_success(&[
        "build",
        root,
        "--quiet",
        "--json",
        "--output",
        out.to_str().unwrap(),
    ]);
    assert!(stdout.is_empty());
    let stats: serde_json::Value = serde_json::from_str(&stderr).expect("summary is not valid JSON");
    assert_eq!(stats["file_count"], 6);
    assert_eq!(stats["nodes_written"], 6);
    assert_eq!(stats["failed_writes"], 0);
    assert!(stats["raw_edges"].as_u64().unwrap() >= stats["unique_edges"].as_u64().unwrap());
}

/// A scan failure aborts the build, but the sink is still closed (flushed) first.
#[test]
fn test_build_missing_root_fails_after_closing_sink() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing");
    let out = dir.path().join("graph.cypher");
    let stderr = run_failure(&[
        "build",
        missing.to_str().unwrap(),
        "--quiet",
        "--output",
        out.to_str().unwrap(),
    ]);
    assert!(stderr.contains("import graph build failed"), "stderr: {stderr}");
    let script = fs::read_to_string(&out).unwrap();
    assert_eq!(script, "MATCH (n) DETACH DELETE n;\n");
}

#[test]
fn test_build_invalid_pattern_fails() {
    let dir = frontend_tree();
    let stderr = run_failure(&["build", dir.path().to_str().unwrap(), "--include-file", "("]);
    assert!(stderr.contains("include_file"), "stderr: {stderr}");
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

#[test]
fn test_config_file_aliases_and_exclude() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(
        root,
        "import-graph.toml",
        "exclude = [\"legacy\"]\n[aliases]\n\"@/\" = \"src/\"\n",
    );
    write(root, "src/app/index.ts", "import { api } from '@/api';\n");
    write(root, "src/api/index.ts", "");
    write(root, "src/legacy/index.ts", "");

    let graph = build_json(root, &[]);
    let files: Vec<&str> = graph["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["file"].as_str().unwrap())
        .collect();
    assert_eq!(files, vec!["src/api/index", "src/app/index"]);
    assert!(has_edge(&graph, "src/app/index", "src/api/index", "api", "api"));
}

#[test]
fn test_config_invalid_exclude_glob_fails() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "import-graph.toml", "exclude = [\"src/[\"]\n");
    write(dir.path(), "src/a.ts", "");
    let stderr = run_failure(&["files", dir.path().to_str().unwrap()]);
    assert!(stderr.contains("invalid exclude pattern"), "stderr: {stderr}");
}

#[test]
fn test_explicit_config_root() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "frontend/src/a.ts", "");
    let config = dir.path().join("graph.toml");
    fs::write(&config, "root = \"frontend\"\n").unwrap();

    let (stdout, _) = run_success(&["files", "--config", config.to_str().unwrap()]);
    assert_eq!(stdout.trim(), "src/a\tFile:A");
}

// ---------------------------------------------------------------------------
// files
// ---------------------------------------------------------------------------

#[test]
fn test_files_json() {
    let dir = frontend_tree();
    let (stdout, _) = run_success(&["files", dir.path().to_str().unwrap(), "--json"]);
    let files: serde_json::Value = serde_json::from_str(&stdout).expect("files --json is not valid JSON");
    let files = files.as_array().unwrap();
    assert_eq!(files.len(), 6);
    let ids: Vec<&str> = files.iter().map(|f| f["file"].as_str().unwrap()).collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    assert!(ids.contains(&"pages/cart"));
    assert!(ids.contains(&"src/checkout/index"));
    assert_eq!(ids.len(), sorted.len());
}

#[test]
fn test_files_include_root() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "setup.ts", "");
    write(dir.path(), "src/a.ts", "");
    let root = dir.path().to_str().unwrap();

    let (without, _) = run_success(&["files", root]);
    assert_eq!(without.lines().collect::<Vec<_>>(), vec!["src/a\tFile:A"]);

    let (with, _) = run_success(&["files", root, "--include-root"]);
    assert_eq!(
        with.lines().collect::<Vec<_>>(),
        vec!["setup\tFile:Setup", "src/a\tFile:A"]
    );
}
