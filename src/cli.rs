use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::export::model::ExportFormat;

/// Derive a file-level import graph from a JS/TS source tree.
///
/// import-graph scans the tree, extracts every `import ... from` and
/// `export ... from` statement, resolves module specifiers to root-relative
/// module ids, and loads one node per file and one edge per binding into a
/// graph sink.
#[derive(Parser, Debug)]
#[command(
    name = "import-graph",
    version,
    about,
    long_about = None,
    propagate_version = true,
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where the graph is written.
#[derive(Clone, Copy, Debug, ValueEnum, Default, PartialEq, Eq)]
pub enum SinkKind {
    /// A Cypher script replayable with `cypher-shell` (default).
    #[default]
    Cypher,
    /// An in-memory graph rendered with `--format` when the build finishes.
    Memory,
}

/// Options shared by every command that scans a tree.
#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    /// Root of the source tree. Defaults to `root` from the config file, then `.`.
    pub path: Option<PathBuf>,

    /// Config file to use instead of `<root>/import-graph.toml`.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Regex a directory's root-relative path must match to be descended into.
    #[arg(long)]
    pub include_dir: Option<String>,

    /// Regex a file's root-relative path must match to be indexed.
    #[arg(long)]
    pub include_file: Option<String>,

    /// Include files directly under the root.
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub include_root: Option<bool>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Wipe the sink and rebuild the whole graph from the source tree.
    Build {
        #[command(flatten)]
        scan: ScanArgs,

        /// Graph sink to load.
        #[arg(long, value_enum, default_value_t = SinkKind::Cypher)]
        sink: SinkKind,

        /// Render format for the memory sink.
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,

        /// Write sink output to this file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the build summary as JSON.
        #[arg(long)]
        json: bool,

        /// Hide progress bars.
        #[arg(short, long)]
        quiet: bool,
    },

    /// List the files a build would index, with their module ids and labels.
    Files {
        #[command(flatten)]
        scan: ScanArgs,

        /// Output as a JSON array.
        #[arg(long)]
        json: bool,
    },
}
