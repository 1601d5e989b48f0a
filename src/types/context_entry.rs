//! Free-form context node (tone, audience, style guide, user scenario).

use serde::{Deserialize, Serialize};

/// Kind of a free-form context entry. Unknown kinds survive a round-trip as [ContextType::Other].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ContextType {
  Tone,
  Audience,
  StyleGuide,
  UserScenario,
  Other(String),
}

impl ContextType {
  /// Label used for this kind in rendered prompts.
  pub fn label(&self) -> &'static str {
    match self {
      ContextType::Tone => "Tone",
      ContextType::Audience => "Audience",
      ContextType::StyleGuide => "Style Guide",
      ContextType::UserScenario => "User Scenario",
      ContextType::Other(_) => "Context",
    }
  }

  pub fn as_str(&self) -> &str {
    match self {
      ContextType::Tone => "tone",
      ContextType::Audience => "audience",
      ContextType::StyleGuide => "styleGuide",
      ContextType::UserScenario => "userScenario",
      ContextType::Other(s) => s,
    }
  }
}

impl From<String> for ContextType {
  fn from(s: String) -> Self {
    match s.as_str() {
      "tone" => ContextType::Tone,
      "audience" => ContextType::Audience,
      "styleGuide" => ContextType::StyleGuide,
      "userScenario" => ContextType::UserScenario,
      _ => ContextType::Other(s),
    }
  }
}

impl From<ContextType> for String {
  fn from(t: ContextType) -> Self {
    t.as_str().to_string()
  }
}

/// Payload of a `context` node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContextData {
  pub label: String,
  pub context_type: ContextType,
  pub value: String,
}

impl ContextData {
  pub fn new(context_type: ContextType, value: impl Into<String>) -> Self {
    Self {
      context_type,
      value: value.into(),
      ..Self::default()
    }
  }
}

impl Default for ContextData {
  fn default() -> Self {
    Self {
      label: "Context".to_string(),
      context_type: ContextType::Tone,
      value: String::new(),
    }
  }
}
