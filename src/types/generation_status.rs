//! Runtime status of an llm node.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Runtime status of an llm node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationStatus {
  #[default]
  Idle,
  Generating,
  Done,
  Error,
}

impl fmt::Display for GenerationStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GenerationStatus::Idle => write!(f, "idle"),
      GenerationStatus::Generating => write!(f, "generating"),
      GenerationStatus::Done => write!(f, "done"),
      GenerationStatus::Error => write!(f, "error"),
    }
  }
}
