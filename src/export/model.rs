/// Output format for rendering the in-memory graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ExportFormat {
    /// `{"nodes": [...], "edges": [...]}` with store attribute names (default).
    #[default]
    Json,
    /// Graphviz DOT, one cluster per grouping id.
    Dot,
}
