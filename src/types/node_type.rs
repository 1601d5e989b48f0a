//! The closed set of node types on the flow canvas.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Node type tag. Serialized in camelCase (`audienceProfile`, `promptView`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeType {
  Context,
  Llm,
  Content,
  PromptView,
  AudienceProfile,
  BrandVoice,
  ContentStandards,
  CoreMessage,
}

impl NodeType {
  pub const ALL: [NodeType; 8] = [
    NodeType::Context,
    NodeType::Llm,
    NodeType::Content,
    NodeType::PromptView,
    NodeType::AudienceProfile,
    NodeType::BrandVoice,
    NodeType::ContentStandards,
    NodeType::CoreMessage,
  ];

  /// Wire name of the type; also the prefix of generated node ids.
  pub fn as_str(&self) -> &'static str {
    match self {
      NodeType::Context => "context",
      NodeType::Llm => "llm",
      NodeType::Content => "content",
      NodeType::PromptView => "promptView",
      NodeType::AudienceProfile => "audienceProfile",
      NodeType::BrandVoice => "brandVoice",
      NodeType::ContentStandards => "contentStandards",
      NodeType::CoreMessage => "coreMessage",
    }
  }

  /// True for the types collected upstream of a generator and rendered into prompts.
  pub fn is_configuration(&self) -> bool {
    match self {
      NodeType::Context
      | NodeType::AudienceProfile
      | NodeType::BrandVoice
      | NodeType::ContentStandards
      | NodeType::CoreMessage => true,
      NodeType::Llm | NodeType::Content | NodeType::PromptView => false,
    }
  }
}

impl fmt::Display for NodeType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}
