//! Session identity: one random id per installation, persisted under the data directory.
//!
//! The id is created once at startup and handed to whoever needs it; nothing in the
//! library reads it from global state.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

/// Default filename for the session id under the data directory.
pub const SESSION_FILENAME: &str = "session_id";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
  /// Fresh random (v4) id.
  pub fn generate() -> Self {
    Self(Uuid::new_v4().to_string())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Reads the id stored at `path`, or creates and stores a new one when the
  /// file is missing or blank.
  #[instrument(level = "trace", skip(path))]
  pub fn load_or_create(path: &Path) -> Result<Self, std::io::Error> {
    match std::fs::read_to_string(path) {
      Ok(s) if !s.trim().is_empty() => return Ok(Self(s.trim().to_string())),
      Ok(_) => {}
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
      Err(e) => return Err(e),
    }
    let id = Self::generate();
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, id.as_str())?;
    info!(session = %id, "created new session");
    Ok(id)
  }

  /// Forgets the stored id. The next `load_or_create` starts a new session.
  #[instrument(level = "trace", skip(path))]
  pub fn clear(path: &Path) -> Result<(), std::io::Error> {
    match std::fs::remove_file(path) {
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
      other => other,
    }
  }
}

impl From<&str> for SessionId {
  fn from(s: &str) -> Self {
    Self(s.to_string())
  }
}

impl fmt::Display for SessionId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}
