//! Generator node payload: provider configuration plus runtime status.

use serde::{Deserialize, Serialize};

use super::{GenerationStatus, ModelParams};

/// Payload of an `llm` node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LlmData {
  pub label: String,
  pub provider: String,
  pub model: String,
  pub temperature: f32,
  pub max_tokens: u32,
  pub status: GenerationStatus,
  /// Running or final output of the latest generation.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub output: Option<String>,
  /// Failure reason of the latest generation.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
}

impl LlmData {
  pub fn params(&self) -> ModelParams {
    ModelParams {
      temperature: Some(self.temperature),
      max_tokens: Some(self.max_tokens),
      top_p: None,
    }
  }
}

impl Default for LlmData {
  fn default() -> Self {
    Self {
      label: "LLM".to_string(),
      provider: "openai".to_string(),
      model: "gpt-4".to_string(),
      temperature: ModelParams::DEFAULT_TEMPERATURE,
      max_tokens: ModelParams::DEFAULT_MAX_TOKENS,
      status: GenerationStatus::Idle,
      output: None,
      error: None,
    }
  }
}
