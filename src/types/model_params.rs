//! Sampling parameters forwarded to a provider.

use serde::{Deserialize, Serialize};

/// Sampling parameters; unset values fall back to the provider defaults below.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModelParams {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub temperature: Option<f32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub max_tokens: Option<u32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub top_p: Option<f32>,
}

impl ModelParams {
  pub const DEFAULT_TEMPERATURE: f32 = 0.7;
  pub const DEFAULT_MAX_TOKENS: u32 = 2000;
  pub const DEFAULT_TOP_P: f32 = 1.0;

  pub fn temperature(&self) -> f32 {
    self.temperature.unwrap_or(Self::DEFAULT_TEMPERATURE)
  }

  pub fn max_tokens(&self) -> u32 {
    self.max_tokens.unwrap_or(Self::DEFAULT_MAX_TOKENS)
  }

  pub fn top_p(&self) -> f32 {
    self.top_p.unwrap_or(Self::DEFAULT_TOP_P)
  }
}
