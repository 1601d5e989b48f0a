//! Backward traversal from a target node to the configuration nodes feeding it.

use std::collections::{HashMap, HashSet};

use tracing::instrument;

use crate::types::{FlowEdge, FlowNode};

/// Collects every configuration node reachable by walking edges backward from `target_id`.
///
/// Depth-first, in edge order. A node is appended when first discovered, before its own
/// upstream is walked, so the result is in discovery order. Non-configuration nodes (an
/// intermediate `llm`, say) are walked through but not returned. Each node is visited at
/// most once, which makes cycles and diamonds safe, and the target itself is never
/// returned. Edges whose source is missing are skipped.
#[instrument(level = "trace", skip(nodes, edges))]
pub fn collect_context_nodes<'a>(
  target_id: &str,
  nodes: &'a [FlowNode],
  edges: &'a [FlowEdge],
) -> Vec<&'a FlowNode> {
  let by_id: HashMap<&str, &'a FlowNode> = nodes.iter().map(|n| (n.id.as_str(), n)).collect();
  let mut incoming: HashMap<&str, Vec<&'a str>> = HashMap::new();
  for edge in edges {
    incoming
      .entry(edge.target.as_str())
      .or_default()
      .push(edge.source.as_str());
  }

  let mut visited: HashSet<&str> = HashSet::new();
  let mut collected = Vec::new();
  visited.insert(target_id);
  // Each frame is a node's incoming sources and the position of the next one to try.
  let mut stack: Vec<(&[&'a str], usize)> = Vec::new();
  if let Some(sources) = incoming.get(target_id) {
    stack.push((sources.as_slice(), 0));
  }
  while let Some(frame) = stack.last_mut() {
    let (sources, next) = *frame;
    let Some(&source_id) = sources.get(next) else {
      stack.pop();
      continue;
    };
    frame.1 += 1;
    let Some(&source) = by_id.get(source_id) else {
      continue;
    };
    if !visited.insert(source.id.as_str()) {
      continue;
    }
    if source.is_configuration() {
      collected.push(source);
    }
    if let Some(upstream) = incoming.get(source_id) {
      stack.push((upstream.as_slice(), 0));
    }
  }
  collected
}
