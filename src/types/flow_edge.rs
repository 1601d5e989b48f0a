//! A directed edge between two nodes.

use serde::{Deserialize, Serialize};

/// A directed edge. Multiple edges may share a source or a target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowEdge {
  pub id: String,
  pub source: String,
  pub target: String,
}

impl FlowEdge {
  pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
    let source = source.into();
    let target = target.into();
    Self {
      id: format!("edge-{}-{}", source, target),
      source,
      target,
    }
  }
}
