//! Graph snapshot save/load to the data directory (JSON).

use crate::types::FlowGraph;
use std::path::Path;
use tracing::instrument;

/// Default filename for the graph snapshot under the data directory.
pub const SNAPSHOT_FILENAME: &str = "flow.json";

/// Saves `graph` to `path` as `{nodes, edges}` JSON, creating parent directories.
#[instrument(level = "trace", skip(path, graph))]
pub fn save_snapshot(path: &Path, graph: &FlowGraph) -> Result<(), std::io::Error> {
  let json = serde_json::to_string_pretty(graph)
    .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent)?;
  }
  std::fs::write(path, json)
}

/// Loads a graph from `path`. The id counter resumes after the highest stored id.
#[instrument(level = "trace", skip(path))]
pub fn load_snapshot(path: &Path) -> Result<FlowGraph, std::io::Error> {
  let bytes = std::fs::read(path)?;
  serde_json::from_slice(&bytes)
    .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

/// Loads `path` if it exists, otherwise returns an empty graph.
pub fn load_or_default(path: &Path) -> Result<FlowGraph, std::io::Error> {
  match load_snapshot(path) {
    Ok(graph) => Ok(graph),
    Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(FlowGraph::new()),
    Err(e) => Err(e),
  }
}
