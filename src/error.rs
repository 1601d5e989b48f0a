//! Error types for graph editing, providers, generation, and the HTTP surface.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::types::NodeType;

/// Rejected graph edits. Traversal and rendering never produce these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
  #[error("node '{0}' not found")]
  NodeNotFound(String),

  #[error("edge '{0}' not found")]
  EdgeNotFound(String),

  #[error("node '{0}' cannot connect to itself")]
  SelfLoop(String),

  #[error("no node ids left: the graph already uses the largest id suffix")]
  IdsExhausted,

  #[error("node '{id}' is a {expected} node, payload is {found}")]
  TypeMismatch {
    id: String,
    expected: NodeType,
    found: NodeType,
  },
}

/// Failures talking to an LLM vendor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
  #[error("Provider \"{0}\" not found or not configured")]
  NotConfigured(String),

  #[error("request failed: {0}")]
  Http(String),

  #[error("{provider} API error ({status}): {body}")]
  Api {
    provider: String,
    status: u16,
    body: String,
  },

  #[error("stream error: {0}")]
  Stream(String),

  #[error("failed to decode provider event: {0}")]
  Decode(String),
}

/// Failures of the generation orchestrator before or around a stream.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
  #[error("node '{0}' not found")]
  NodeNotFound(String),

  #[error("node '{0}' is not an llm node")]
  NotAGenerator(String),

  #[error("generation request rejected: {0}")]
  Validation(String),

  #[error("generation backend failed: {0}")]
  Backend(String),
}

/// Errors returned by the generation service before any stream starts.
#[derive(Error, Debug)]
pub enum ApiError {
  #[error("{0}")]
  Validation(String),

  #[error("{0}")]
  ProviderUnavailable(#[from] ProviderError),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    // Every rejection happens before streaming, and all of them are client errors.
    let status = StatusCode::BAD_REQUEST;
    let body = Json(json!({
      "error": self.to_string(),
      "status": status.as_u16()
    }));
    (status, body).into_response()
  }
}

pub type ApiResult<T> = Result<T, ApiError>;
