mod cli;
mod config;
mod error;
mod export;
mod graph;
mod output;
mod parser;
mod pipeline;
mod progress;
mod resolver;
mod sink;
mod walker;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use path_clean::PathClean;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, ScanArgs, SinkKind};
use config::{ImportGraphConfig, ScanRules};
use export::model::ExportFormat;
use graph::node::SourceFile;
use pipeline::{BuildContext, build_graph};
use progress::Progress;
use resolver::ModuleResolver;
use sink::{CypherSink, GraphSink, MemorySink};
use walker::walk_project;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Build {
            scan,
            sink,
            format,
            output,
            json,
            quiet,
        } => {
            let project = Project::from_args(&scan)?;
            let progress = Progress::new(quiet);
            let mut sink = open_sink(sink, format, output.as_deref())?;

            info!("building import graph for {}", project.root.display());
            let ctx = BuildContext {
                root: &project.root,
                rules: &project.rules,
                resolver: &project.resolver,
                progress: &progress,
            };
            let result = build_graph(sink.as_mut(), &ctx).await;

            // The sink is released on every path before any build error propagates.
            let cleanup = progress.stage("cleaning up", 1);
            let closed = sink.close().await;
            cleanup.finish();

            let stats = result.context("import graph build failed")?;
            closed.context("failed to close graph sink")?;
            output::print_summary(&stats, json);
        }
        Commands::Files { scan, json } => {
            let project = Project::from_args(&scan)?;
            let files: Vec<SourceFile> = walk_project(&project.root, &project.rules)?
                .iter()
                .map(|path| SourceFile::classify(path, &project.root))
                .collect();
            output::print_files(&files, json);
        }
    }

    Ok(())
}

/// Log level from `-v` count unless `RUST_LOG` is set. Logs go to stderr.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Scan root, compiled rules and resolver for one invocation.
struct Project {
    root: PathBuf,
    rules: ScanRules,
    resolver: ModuleResolver,
}

impl Project {
    /// Merge the config file with command-line overrides.
    ///
    /// Root precedence: positional path, then `root` from the config file
    /// (relative to the file's directory), then the current directory.
    fn from_args(args: &ScanArgs) -> Result<Self> {
        let search_dir = args.path.clone().unwrap_or_else(|| PathBuf::from("."));
        let (mut config, config_dir) = match &args.config {
            Some(file) => {
                let config = ImportGraphConfig::load_file(file)?;
                let dir = file.parent().map(Path::to_path_buf).unwrap_or_default();
                (config, dir)
            }
            None => (ImportGraphConfig::load(&search_dir), search_dir.clone()),
        };

        if let Some(include_dir) = &args.include_dir {
            config.include_dir = include_dir.clone();
        }
        if let Some(include_file) = &args.include_file {
            config.include_file = include_file.clone();
        }
        if let Some(include_root) = args.include_root {
            config.include_root = include_root;
        }

        let root = match (&args.path, &config.root) {
            (Some(path), _) => path.clone(),
            (None, Some(root)) => config_dir.join(root),
            (None, None) => search_dir,
        };
        let root = std::path::absolute(&root)
            .with_context(|| format!("failed to resolve root {}", root.display()))?
            .clean();

        let rules = config.scan_rules()?;
        let resolver = ModuleResolver::new(&root, config.aliases.clone());
        Ok(Self {
            root,
            rules,
            resolver,
        })
    }
}

fn open_sink(
    kind: SinkKind,
    format: ExportFormat,
    output: Option<&Path>,
) -> Result<Box<dyn GraphSink>> {
    let out: Box<dyn Write + Send> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(std::io::stdout())),
    };

    Ok(match kind {
        SinkKind::Cypher => Box::new(CypherSink::new(out)),
        SinkKind::Memory => Box::new(MemorySink::rendering(format, out)),
    })
}
