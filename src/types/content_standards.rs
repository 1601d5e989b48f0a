//! Content standards payload.

use serde::{Deserialize, Serialize};

/// Rules the generated copy must follow. Enforcement is left to the model.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContentStandards {
  pub compliance_rules: Vec<String>,
  pub style_guide_rules: Vec<String>,
  pub accessibility_requirements: Vec<String>,
  pub inclusivity_guidelines: Vec<String>,
  pub plain_language_requirements: bool,
  /// Grade level, 1 to 12.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub max_reading_level: Option<u8>,
}

/// Payload of a `contentStandards` node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContentStandardsData {
  pub label: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub standards: Option<ContentStandards>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub selected_preset_id: Option<String>,
}

impl ContentStandardsData {
  pub fn with_standards(standards: ContentStandards) -> Self {
    Self {
      standards: Some(standards),
      ..Self::default()
    }
  }
}

impl Default for ContentStandardsData {
  fn default() -> Self {
    Self {
      label: "Content Standards".to_string(),
      standards: None,
      selected_preset_id: None,
    }
  }
}
