//! Tests for `FlowGraph` editing operations.

use super::{
  BrandVoice, BrandVoiceData, ConfigStatus, CoreMessage, CoreMessageData, FlowEdge, FlowGraph,
  FlowNode, NodeData, NodeType, Position,
};
use crate::error::GraphError;

fn sample() -> (FlowGraph, String, String, String) {
  let mut g = FlowGraph::new();
  let voice = g.add_default_node(NodeType::BrandVoice).unwrap();
  let llm = g.add_default_node(NodeType::Llm).unwrap();
  let content = g.add_default_node(NodeType::Content).unwrap();
  g.connect(&voice, &llm).unwrap();
  g.connect(&llm, &content).unwrap();
  (g, voice, llm, content)
}

#[test]
fn ids_combine_type_and_counter() {
  let (g, voice, llm, content) = sample();
  assert_eq!(voice, "brandVoice-1");
  assert_eq!(llm, "llm-2");
  assert_eq!(content, "content-3");
  assert_eq!(g.nodes().len(), 3);
}

#[test]
fn ids_never_reused_after_delete() {
  let (mut g, _, _, content) = sample();
  g.remove_node(&content).unwrap();
  let next = g.add_default_node(NodeType::Content).unwrap();
  assert_eq!(next, "content-4");
}

#[test]
fn positions_cascade() {
  let (g, ..) = sample();
  assert_eq!(g.nodes()[0].position, Position::new(400.0, 150.0));
  assert_eq!(g.nodes()[1].position, Position::new(700.0, 200.0));
  assert_eq!(g.nodes()[2].position, Position::new(1000.0, 250.0));
}

#[test]
fn connect_rejects_self_loop() {
  let (mut g, _, llm, _) = sample();
  assert_eq!(g.connect(&llm, &llm), Err(GraphError::SelfLoop(llm.clone())));
}

#[test]
fn connect_rejects_unknown_node() {
  let (mut g, _, llm, _) = sample();
  assert_eq!(
    g.connect("ghost-9", &llm),
    Err(GraphError::NodeNotFound("ghost-9".to_string()))
  );
}

#[test]
fn connect_same_pair_twice_is_idempotent() {
  let (mut g, voice, llm, _) = sample();
  let before = g.edges().len();
  let id = g.connect(&voice, &llm).unwrap();
  assert_eq!(id, format!("edge-{}-{}", voice, llm));
  assert_eq!(g.edges().len(), before);
}

#[test]
fn incoming_and_outgoing_edges() {
  let (g, voice, llm, content) = sample();
  let incoming = g.incoming_edges(&llm);
  assert_eq!(incoming.len(), 1);
  assert_eq!(incoming[0].source, voice);
  let out = g.outgoing_edges(&llm);
  assert_eq!(out.len(), 1);
  assert_eq!(out[0].target, content);
  assert!(g.outgoing_edges(&content).is_empty());
}

#[test]
fn remove_node_drops_touching_edges() {
  let (mut g, _, llm, _) = sample();
  let removed = g.remove_node(&llm).unwrap();
  assert_eq!(removed.node_type(), NodeType::Llm);
  assert!(g.edges().is_empty());
  assert!(g.remove_node(&llm).is_err());
}

#[test]
fn disconnect_removes_one_edge() {
  let (mut g, voice, llm, _) = sample();
  let edge = g.disconnect(&format!("edge-{}-{}", voice, llm)).unwrap();
  assert_eq!(edge.source, voice);
  assert_eq!(g.edges().len(), 1);
  assert_eq!(
    g.disconnect("edge-x-y"),
    Err(GraphError::EdgeNotFound("edge-x-y".to_string()))
  );
}

#[test]
fn replace_data_keeps_type() {
  let (mut g, voice, llm, _) = sample();
  let data = NodeData::BrandVoice(BrandVoiceData::with_voice(BrandVoice {
    tone: vec!["Warm".to_string()],
    ..BrandVoice::default()
  }));
  g.replace_data(&voice, data.clone()).unwrap();
  assert_eq!(g.node(&voice).unwrap().data, data);

  let err = g.replace_data(&llm, data).unwrap_err();
  assert_eq!(
    err,
    GraphError::TypeMismatch {
      id: llm,
      expected: NodeType::Llm,
      found: NodeType::BrandVoice,
    }
  );
}

#[test]
fn config_status_transitions() {
  let mut g = FlowGraph::new();
  let msg = g.add_default_node(NodeType::CoreMessage).unwrap();
  assert_eq!(g.config_status(&msg), Some(ConfigStatus::Empty));

  let short = NodeData::CoreMessage(CoreMessageData::with_message(CoreMessage::new("Buy now", None)));
  g.replace_data(&msg, short).unwrap();
  assert_eq!(g.config_status(&msg), Some(ConfigStatus::Empty));

  let long = NodeData::CoreMessage(CoreMessageData::with_message(CoreMessage::new(
    "Rates just dropped to a 3-month low.",
    None,
  )));
  g.replace_data(&msg, long).unwrap();
  assert_eq!(g.config_status(&msg), Some(ConfigStatus::Configured));

  let llm = g.add_default_node(NodeType::Llm).unwrap();
  g.connect(&msg, &llm).unwrap();
  assert_eq!(g.config_status(&msg), Some(ConfigStatus::Connected));
  assert_eq!(g.config_status(&llm), None);
  assert_eq!(g.config_status("missing"), None);
}

#[test]
fn from_parts_restores_counter() {
  let nodes = vec![
    FlowNode::new("llm-7", NodeData::default_for(NodeType::Llm)),
    FlowNode::new("content-12", NodeData::default_for(NodeType::Content)),
    FlowNode::new("custom", NodeData::default_for(NodeType::Content)),
  ];
  let mut g = FlowGraph::from_parts(nodes, vec![FlowEdge::new("llm-7", "content-12")]);
  assert_eq!(g.add_default_node(NodeType::Context).unwrap(), "context-13");
}

#[test]
fn serializes_as_nodes_and_edges_only() {
  let (g, ..) = sample();
  let json = serde_json::to_value(&g).unwrap();
  let obj = json.as_object().unwrap();
  assert_eq!(obj.len(), 2);
  assert_eq!(obj["nodes"].as_array().unwrap().len(), 3);
  assert_eq!(obj["edges"].as_array().unwrap().len(), 2);
  let back: FlowGraph = serde_json::from_value(json).unwrap();
  assert_eq!(back, g);
}

#[test]
fn clear_keeps_counter() {
  let (mut g, ..) = sample();
  g.clear();
  assert!(g.is_empty());
  assert_eq!(g.add_default_node(NodeType::Llm).unwrap(), "llm-4");
}

#[test]
fn loading_the_largest_id_suffix_exhausts_the_counter() {
  let json = serde_json::json!({
    "nodes": [{
      "id": "llm-18446744073709551615",
      "type": "llm",
      "position": { "x": 0.0, "y": 0.0 },
      "data": serde_json::to_value(NodeData::default_for(NodeType::Llm)).unwrap()
    }],
    "edges": []
  });
  let mut g: FlowGraph = serde_json::from_value(json).unwrap();
  assert_eq!(g.nodes().len(), 1);
  assert_eq!(g.add_default_node(NodeType::Content), Err(GraphError::IdsExhausted));
  assert_eq!(g.nodes().len(), 1);
}

#[test]
fn counter_hands_out_the_last_suffix_once() {
  let last = u64::MAX - 1;
  let nodes = vec![FlowNode::new(
    format!("llm-{}", last),
    NodeData::default_for(NodeType::Llm),
  )];
  let mut g = FlowGraph::from_parts(nodes, vec![]);
  assert_eq!(
    g.add_default_node(NodeType::Content).unwrap(),
    format!("content-{}", u64::MAX)
  );
  assert_eq!(g.add_default_node(NodeType::Content), Err(GraphError::IdsExhausted));
}
