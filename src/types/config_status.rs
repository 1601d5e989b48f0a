//! Configuration status shown on structured configuration nodes.

use serde::{Deserialize, Serialize};

/// Whether a configuration node has usable data and feeds anything.
///
/// Derived from the graph on demand; the prompt renderer never consults it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigStatus {
  Empty,
  Configured,
  Connected,
}
