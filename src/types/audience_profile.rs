//! Audience profile payload.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Demographic description; every field is free text.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Demographics {
  pub age_range: String,
  pub income: String,
  pub education: String,
  pub location: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Psychographics {
  pub values: Vec<String>,
  pub interests: Vec<String>,
  pub pain_points: Vec<String>,
  pub goals: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AudiencePreferences {
  pub communication_style: String,
  pub tech_savviness: String,
  pub decision_making_factors: Vec<String>,
}

/// A target audience persona.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AudienceProfile {
  pub id: String,
  pub name: String,
  pub demographics: Demographics,
  pub psychographics: Psychographics,
  pub preferences: AudiencePreferences,
  /// Optional domain-specific extension, carried but never rendered.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub domain_specific: Option<BTreeMap<String, serde_json::Value>>,
}

/// Payload of an `audienceProfile` node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AudienceProfileData {
  pub label: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub profile: Option<AudienceProfile>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub selected_preset_id: Option<String>,
}

impl AudienceProfileData {
  pub fn with_profile(profile: AudienceProfile) -> Self {
    Self {
      profile: Some(profile),
      ..Self::default()
    }
  }
}

impl Default for AudienceProfileData {
  fn default() -> Self {
    Self {
      label: "Audience Profile".to_string(),
      profile: None,
      selected_preset_id: None,
    }
  }
}
