//! Core message payload.

use serde::{Deserialize, Serialize};

/// Minimum trimmed length (in characters) for a core message to count as configured.
pub const MIN_CONFIGURED_MESSAGE_LEN: usize = 10;

/// The one thing the copy has to say, with optional situational context.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreMessage {
  pub message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub context: Option<String>,
}

impl CoreMessage {
  pub fn new(message: impl Into<String>, context: Option<&str>) -> Self {
    Self {
      message: message.into(),
      context: context.map(str::to_string),
    }
  }

  /// True once the message is long enough to drive generation from the UI's point of view.
  pub fn is_configured(&self) -> bool {
    self.message.trim().chars().count() >= MIN_CONFIGURED_MESSAGE_LEN
  }
}

/// Payload of a `coreMessage` node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CoreMessageData {
  pub label: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub message: Option<CoreMessage>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub selected_example_id: Option<String>,
}

impl CoreMessageData {
  pub fn with_message(message: CoreMessage) -> Self {
    Self {
      message: Some(message),
      ..Self::default()
    }
  }
}

impl Default for CoreMessageData {
  fn default() -> Self {
    Self {
      label: "Core Message".to_string(),
      message: None,
      selected_example_id: None,
    }
  }
}
