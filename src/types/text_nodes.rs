//! Free-text nodes: generated content and the read-only prompt view.

use serde::{Deserialize, Serialize};

/// Payload of a `content` node; receives generator output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentData {
  pub label: String,
  pub content: String,
}

impl Default for ContentData {
  fn default() -> Self {
    Self {
      label: "Content".to_string(),
      content: String::new(),
    }
  }
}

/// Payload of a `promptView` node. `prompt` is derived from the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptViewData {
  pub label: String,
  pub prompt: String,
}

impl Default for PromptViewData {
  fn default() -> Self {
    Self {
      label: "Prompt View".to_string(),
      prompt: String::new(),
    }
  }
}
