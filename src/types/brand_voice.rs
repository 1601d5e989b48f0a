//! Brand voice payload.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
  pub preferred: Vec<String>,
  pub avoided: Vec<String>,
}

/// How the brand sounds: tone and style words, rules, personality, vocabulary.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BrandVoice {
  pub tone: Vec<String>,
  pub style: Vec<String>,
  pub dos: Vec<String>,
  pub donts: Vec<String>,
  pub personality: String,
  pub vocabulary: Vocabulary,
}

/// Payload of a `brandVoice` node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BrandVoiceData {
  pub label: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub voice: Option<BrandVoice>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub selected_preset_id: Option<String>,
}

impl BrandVoiceData {
  pub fn with_voice(voice: BrandVoice) -> Self {
    Self {
      voice: Some(voice),
      ..Self::default()
    }
  }
}

impl Default for BrandVoiceData {
  fn default() -> Self {
    Self {
      label: "Brand Voice".to_string(),
      voice: None,
      selected_preset_id: None,
    }
  }
}
