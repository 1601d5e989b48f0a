//! The whole user-edited flow graph.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{ConfigStatus, FlowEdge, FlowNode, NodeData, NodeType, Position};
use crate::collector;
use crate::error::GraphError;

/// Position of the first node on an empty canvas.
const FIRST_POSITION: Position = Position { x: 400.0, y: 150.0 };
/// Offset of each new node from the previously added one.
const CASCADE_OFFSET: (f64, f64) = (300.0, 50.0);

static ID_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"-(\d+)$").expect("static regex"));

/// Persisted form of a graph: `{nodes, edges}`, order-preserving.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphSnapshot {
  #[serde(default)]
  pub nodes: Vec<FlowNode>,
  #[serde(default)]
  pub edges: Vec<FlowEdge>,
}

/// Flow graph: ordered nodes, ordered edges, and the id counter.
///
/// Ids are `<type>-<n>` with `n` taken from a counter that only grows, so ids
/// of deleted nodes are never handed out again within a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "GraphSnapshot", into = "GraphSnapshot")]
pub struct FlowGraph {
  nodes: Vec<FlowNode>,
  edges: Vec<FlowEdge>,
  /// `None` once every suffix up to `u64::MAX` has been handed out.
  next_id: Option<u64>,
}

impl Default for FlowGraph {
  fn default() -> Self {
    Self {
      nodes: Vec::new(),
      edges: Vec::new(),
      next_id: Some(1),
    }
  }
}

impl From<GraphSnapshot> for FlowGraph {
  fn from(s: GraphSnapshot) -> Self {
    FlowGraph::from_parts(s.nodes, s.edges)
  }
}

impl From<FlowGraph> for GraphSnapshot {
  fn from(g: FlowGraph) -> Self {
    GraphSnapshot {
      nodes: g.nodes,
      edges: g.edges,
    }
  }
}

impl FlowGraph {
  pub fn new() -> Self {
    Self::default()
  }

  /// Builds a graph from loaded parts; the id counter resumes after the highest numeric id suffix.
  pub fn from_parts(nodes: Vec<FlowNode>, edges: Vec<FlowEdge>) -> Self {
    let max_id = nodes
      .iter()
      .filter_map(|n| ID_SUFFIX.captures(&n.id))
      .filter_map(|c| c[1].parse::<u64>().ok())
      .max()
      .unwrap_or(0);
    Self {
      nodes,
      edges,
      next_id: max_id.checked_add(1),
    }
  }

  pub fn nodes(&self) -> &[FlowNode] {
    &self.nodes
  }

  pub fn edges(&self) -> &[FlowEdge] {
    &self.edges
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty() && self.edges.is_empty()
  }

  pub fn snapshot(&self) -> GraphSnapshot {
    GraphSnapshot {
      nodes: self.nodes.clone(),
      edges: self.edges.clone(),
    }
  }

  pub fn node(&self, id: &str) -> Option<&FlowNode> {
    self.nodes.iter().find(|n| n.id == id)
  }

  pub fn incoming_edges(&self, node_id: &str) -> Vec<&FlowEdge> {
    self.edges.iter().filter(|e| e.target == node_id).collect()
  }

  pub fn outgoing_edges(&self, node_id: &str) -> Vec<&FlowEdge> {
    self.edges.iter().filter(|e| e.source == node_id).collect()
  }

  /// Configuration nodes upstream of `target_id`, in discovery order.
  pub fn collect_context(&self, target_id: &str) -> Vec<&FlowNode> {
    collector::collect_context_nodes(target_id, &self.nodes, &self.edges)
  }

  /// Appends a node with the given payload and returns its new id.
  ///
  /// Fails only when a loaded graph already used the largest id suffix.
  pub fn add_node(&mut self, data: NodeData) -> Result<String, GraphError> {
    let n = self.next_id.ok_or(GraphError::IdsExhausted)?;
    let id = format!("{}-{}", data.node_type(), n);
    self.next_id = n.checked_add(1);
    let position = self
      .nodes
      .last()
      .map(|n| Position::new(n.position.x + CASCADE_OFFSET.0, n.position.y + CASCADE_OFFSET.1))
      .unwrap_or(FIRST_POSITION);
    self
      .nodes
      .push(FlowNode::new(id.clone(), data).with_position(position));
    Ok(id)
  }

  /// Appends a node of `node_type` with its default payload.
  pub fn add_default_node(&mut self, node_type: NodeType) -> Result<String, GraphError> {
    self.add_node(NodeData::default_for(node_type))
  }

  /// Connects `source` to `target`. Connecting an already connected pair returns the existing edge id.
  pub fn connect(&mut self, source: &str, target: &str) -> Result<String, GraphError> {
    if source == target {
      return Err(GraphError::SelfLoop(source.to_string()));
    }
    for id in [source, target] {
      if self.node(id).is_none() {
        return Err(GraphError::NodeNotFound(id.to_string()));
      }
    }
    if let Some(existing) = self
      .edges
      .iter()
      .find(|e| e.source == source && e.target == target)
    {
      return Ok(existing.id.clone());
    }
    let edge = FlowEdge::new(source, target);
    let id = edge.id.clone();
    self.edges.push(edge);
    Ok(id)
  }

  pub fn disconnect(&mut self, edge_id: &str) -> Result<FlowEdge, GraphError> {
    let idx = self
      .edges
      .iter()
      .position(|e| e.id == edge_id)
      .ok_or_else(|| GraphError::EdgeNotFound(edge_id.to_string()))?;
    Ok(self.edges.remove(idx))
  }

  /// Removes a node and every edge touching it.
  pub fn remove_node(&mut self, id: &str) -> Result<FlowNode, GraphError> {
    let idx = self
      .nodes
      .iter()
      .position(|n| n.id == id)
      .ok_or_else(|| GraphError::NodeNotFound(id.to_string()))?;
    self.edges.retain(|e| e.source != id && e.target != id);
    Ok(self.nodes.remove(idx))
  }

  /// Replaces a node's payload. The payload must keep the node's type.
  pub fn replace_data(&mut self, id: &str, data: NodeData) -> Result<(), GraphError> {
    let node = self
      .nodes
      .iter_mut()
      .find(|n| n.id == id)
      .ok_or_else(|| GraphError::NodeNotFound(id.to_string()))?;
    if node.node_type() != data.node_type() {
      return Err(GraphError::TypeMismatch {
        id: id.to_string(),
        expected: node.node_type(),
        found: data.node_type(),
      });
    }
    node.data = data;
    Ok(())
  }

  pub fn move_node(&mut self, id: &str, position: Position) -> Result<(), GraphError> {
    let node = self
      .nodes
      .iter_mut()
      .find(|n| n.id == id)
      .ok_or_else(|| GraphError::NodeNotFound(id.to_string()))?;
    node.position = position;
    Ok(())
  }

  /// Drops every node and edge. The id counter keeps counting.
  pub fn clear(&mut self) {
    self.nodes.clear();
    self.edges.clear();
  }

  /// Status of a structured configuration node; `None` for other node types or unknown ids.
  pub fn config_status(&self, id: &str) -> Option<ConfigStatus> {
    let node = self.node(id)?;
    let configured = match &node.data {
      NodeData::AudienceProfile(d) => d.profile.is_some(),
      NodeData::BrandVoice(d) => d.voice.is_some(),
      NodeData::ContentStandards(d) => d.standards.is_some(),
      NodeData::CoreMessage(d) => d.message.as_ref().is_some_and(|m| m.is_configured()),
      NodeData::Context(_) | NodeData::Llm(_) | NodeData::Content(_) | NodeData::PromptView(_) => {
        return None;
      }
    };
    Some(if !configured {
      ConfigStatus::Empty
    } else if self.edges.iter().any(|e| e.source == id) {
      ConfigStatus::Connected
    } else {
      ConfigStatus::Configured
    })
  }

  /// Mutable access to a node's payload, used by the snapshot store on its private copy.
  pub(crate) fn data_mut(&mut self, id: &str) -> Option<&mut NodeData> {
    self
      .nodes
      .iter_mut()
      .find(|n| n.id == id)
      .map(|n| &mut n.data)
  }
}
