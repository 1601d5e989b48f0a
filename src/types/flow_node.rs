//! A node on the flow canvas.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use super::{
  AudienceProfileData, BrandVoiceData, ContentData, ContentStandardsData, ContextData,
  CoreMessageData, LlmData, NodeType, PromptViewData,
};

/// Canvas coordinates. Carried for the editor; the engine never reads them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
  pub x: f64,
  pub y: f64,
}

impl Position {
  pub fn new(x: f64, y: f64) -> Self {
    Self { x, y }
  }
}

/// Typed payload of a node. The variant is the node's type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NodeData {
  Context(ContextData),
  Llm(LlmData),
  Content(ContentData),
  PromptView(PromptViewData),
  AudienceProfile(AudienceProfileData),
  BrandVoice(BrandVoiceData),
  ContentStandards(ContentStandardsData),
  CoreMessage(CoreMessageData),
}

impl NodeData {
  pub fn node_type(&self) -> NodeType {
    match self {
      NodeData::Context(_) => NodeType::Context,
      NodeData::Llm(_) => NodeType::Llm,
      NodeData::Content(_) => NodeType::Content,
      NodeData::PromptView(_) => NodeType::PromptView,
      NodeData::AudienceProfile(_) => NodeType::AudienceProfile,
      NodeData::BrandVoice(_) => NodeType::BrandVoice,
      NodeData::ContentStandards(_) => NodeType::ContentStandards,
      NodeData::CoreMessage(_) => NodeType::CoreMessage,
    }
  }

  /// Payload a freshly created node of `node_type` starts with.
  pub fn default_for(node_type: NodeType) -> Self {
    match node_type {
      NodeType::Context => NodeData::Context(ContextData::default()),
      NodeType::Llm => NodeData::Llm(LlmData::default()),
      NodeType::Content => NodeData::Content(ContentData::default()),
      NodeType::PromptView => NodeData::PromptView(PromptViewData::default()),
      NodeType::AudienceProfile => NodeData::AudienceProfile(AudienceProfileData::default()),
      NodeType::BrandVoice => NodeData::BrandVoice(BrandVoiceData::default()),
      NodeType::ContentStandards => NodeData::ContentStandards(ContentStandardsData::default()),
      NodeType::CoreMessage => NodeData::CoreMessage(CoreMessageData::default()),
    }
  }

  /// Decodes a payload whose shape is selected by `node_type`. `null` means all defaults.
  pub fn from_value(node_type: NodeType, value: serde_json::Value) -> Result<Self, serde_json::Error> {
    let value = match value {
      serde_json::Value::Null => serde_json::Value::Object(serde_json::Map::new()),
      v => v,
    };
    Ok(match node_type {
      NodeType::Context => NodeData::Context(serde_json::from_value(value)?),
      NodeType::Llm => NodeData::Llm(serde_json::from_value(value)?),
      NodeType::Content => NodeData::Content(serde_json::from_value(value)?),
      NodeType::PromptView => NodeData::PromptView(serde_json::from_value(value)?),
      NodeType::AudienceProfile => NodeData::AudienceProfile(serde_json::from_value(value)?),
      NodeType::BrandVoice => NodeData::BrandVoice(serde_json::from_value(value)?),
      NodeType::ContentStandards => NodeData::ContentStandards(serde_json::from_value(value)?),
      NodeType::CoreMessage => NodeData::CoreMessage(serde_json::from_value(value)?),
    })
  }

  pub fn label(&self) -> &str {
    match self {
      NodeData::Context(d) => &d.label,
      NodeData::Llm(d) => &d.label,
      NodeData::Content(d) => &d.label,
      NodeData::PromptView(d) => &d.label,
      NodeData::AudienceProfile(d) => &d.label,
      NodeData::BrandVoice(d) => &d.label,
      NodeData::ContentStandards(d) => &d.label,
      NodeData::CoreMessage(d) => &d.label,
    }
  }
}

/// A node: unique id, canvas position, typed payload.
///
/// Serialized as `{id, type, position, data}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawNode")]
pub struct FlowNode {
  pub id: String,
  pub position: Position,
  pub data: NodeData,
}

impl FlowNode {
  pub fn new(id: impl Into<String>, data: NodeData) -> Self {
    Self {
      id: id.into(),
      position: Position::default(),
      data,
    }
  }

  pub fn with_position(mut self, position: Position) -> Self {
    self.position = position;
    self
  }

  pub fn node_type(&self) -> NodeType {
    self.data.node_type()
  }

  pub fn is_configuration(&self) -> bool {
    self.node_type().is_configuration()
  }

  pub fn as_llm(&self) -> Option<&LlmData> {
    match &self.data {
      NodeData::Llm(d) => Some(d),
      _ => None,
    }
  }
}

impl Serialize for FlowNode {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut s = serializer.serialize_struct("FlowNode", 4)?;
    s.serialize_field("id", &self.id)?;
    s.serialize_field("type", &self.node_type())?;
    s.serialize_field("position", &self.position)?;
    s.serialize_field("data", &self.data)?;
    s.end()
  }
}

/// Wire form of a node before its payload is decoded against its type.
#[derive(Deserialize)]
struct RawNode {
  id: String,
  #[serde(rename = "type")]
  node_type: NodeType,
  #[serde(default)]
  position: Position,
  #[serde(default)]
  data: serde_json::Value,
}

impl TryFrom<RawNode> for FlowNode {
  type Error = serde_json::Error;

  fn try_from(raw: RawNode) -> Result<Self, Self::Error> {
    Ok(FlowNode {
      id: raw.id,
      position: raw.position,
      data: NodeData::from_value(raw.node_type, raw.data)?,
    })
  }
}
