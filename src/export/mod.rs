pub mod dot;
pub mod json;
pub mod model;

use crate::graph::ImportGraph;

use model::ExportFormat;

/// Render the graph in the requested format.
pub fn render(graph: &ImportGraph, format: ExportFormat) -> Result<String, serde_json::Error> {
    match format {
        ExportFormat::Json => json::render_json(graph),
        ExportFormat::Dot => Ok(dot::render_dot(graph)),
    }
}
