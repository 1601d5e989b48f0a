//! Runtime configuration from flags and environment.

use std::path::PathBuf;

use crate::session::SESSION_FILENAME;
use crate::snapshot_io::SNAPSHOT_FILENAME;

pub const DEFAULT_BIND: &str = "127.0.0.1:3001";
pub const DEFAULT_API_URL: &str = "http://localhost:3001/api";
pub const DEFAULT_DATA_DIR: &str = ".promptweave";

pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_ANTHROPIC_API_KEY: &str = "ANTHROPIC_API_KEY";
pub const ENV_OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
pub const ENV_ANTHROPIC_BASE_URL: &str = "ANTHROPIC_BASE_URL";
pub const ENV_BIND: &str = "PROMPTWEAVE_BIND";
pub const ENV_API_URL: &str = "PROMPTWEAVE_API_URL";
pub const ENV_DATA_DIR: &str = "PROMPTWEAVE_DATA_DIR";

/// Vendor credentials. A provider without a key is simply not offered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderKeys {
  pub openai_api_key: Option<String>,
  pub anthropic_api_key: Option<String>,
  /// Overrides the vendor endpoint (proxies, tests).
  pub openai_base_url: Option<String>,
  pub anthropic_base_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
  /// Address the generation service listens on.
  pub bind: String,
  /// Base URL the client uses to reach the generation service.
  pub api_url: String,
  /// Holds the graph snapshot and the session id.
  pub data_dir: PathBuf,
  pub providers: ProviderKeys,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      bind: DEFAULT_BIND.to_string(),
      api_url: DEFAULT_API_URL.to_string(),
      data_dir: PathBuf::from(DEFAULT_DATA_DIR),
      providers: ProviderKeys::default(),
    }
  }
}

impl AppConfig {
  /// Defaults overridden by the process environment.
  pub fn from_env() -> Self {
    Self::default().with_env(|key| std::env::var(key).ok())
  }

  /// Applies overrides from `lookup`. Empty values count as unset.
  pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
    if let Some(v) = get(ENV_BIND) {
      self.bind = v;
    }
    if let Some(v) = get(ENV_API_URL) {
      self.api_url = v;
    }
    if let Some(v) = get(ENV_DATA_DIR) {
      self.data_dir = PathBuf::from(v);
    }
    let keys = &mut self.providers;
    keys.openai_api_key = get(ENV_OPENAI_API_KEY).or(keys.openai_api_key.take());
    keys.anthropic_api_key = get(ENV_ANTHROPIC_API_KEY).or(keys.anthropic_api_key.take());
    keys.openai_base_url = get(ENV_OPENAI_BASE_URL).or(keys.openai_base_url.take());
    keys.anthropic_base_url = get(ENV_ANTHROPIC_BASE_URL).or(keys.anthropic_base_url.take());
    self
  }

  pub fn snapshot_path(&self) -> PathBuf {
    self.data_dir.join(SNAPSHOT_FILENAME)
  }

  pub fn session_path(&self) -> PathBuf {
    self.data_dir.join(SESSION_FILENAME)
  }
}
