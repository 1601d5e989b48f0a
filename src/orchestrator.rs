//! Generation orchestrator: prompt in, streamed text out, results written back to the graph.
//!
//! Every call to [GenerationOrchestrator::generate] gets a fresh token for its llm
//! node. A newer call on the same node replaces the token, and every graph write
//! re-checks it under the token lock, so a superseded stream can never write.
//! Different nodes generate independently.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::error::GenerationError;
use crate::prompt::prompt_for;
use crate::session::SessionId;
use crate::store::GraphStore;
use crate::types::{FlowGraph, GenerationStatus, ModelParams, NodeData};

pub use crate::sse::{EventStream, StreamEvent};

/// Rejection message when a generation request lacks a required field.
pub const MISSING_GENERATE_FIELDS: &str =
  "Missing required fields: sessionId, prompt, model, provider";

/// Reason recorded when a stream ends without `done` or `error`.
pub const UNTERMINATED_STREAM: &str = "generation stream ended without a completion event";

/// Body of a generation request.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerateRequest {
  pub session_id: String,
  pub prompt: String,
  pub provider: String,
  pub model: String,
  pub params: ModelParams,
}

impl GenerateRequest {
  /// Every string field must be non-empty.
  pub fn validate(&self) -> Result<(), GenerationError> {
    let required = [&self.session_id, &self.prompt, &self.model, &self.provider];
    if required.iter().any(|f| f.is_empty()) {
      return Err(GenerationError::Validation(
        MISSING_GENERATE_FIELDS.to_string(),
      ));
    }
    Ok(())
  }
}

/// Something that turns a request into an ordered event stream.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
  async fn generate(&self, request: GenerateRequest) -> Result<EventStream, GenerationError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
  /// Output was committed to the llm node and its downstream content nodes.
  Completed { output: String, prompt: String },
  /// The failure reason was recorded on the llm node; downstream nodes untouched.
  Failed { reason: String },
  /// A newer generation (or a cancel) took over this node; nothing more was written.
  Superseded,
}

pub struct GenerationOrchestrator {
  session: SessionId,
  backend: Arc<dyn GenerationBackend>,
  store: GraphStore,
  /// Current token per llm node id.
  tokens: Mutex<InFlight>,
}

#[derive(Default)]
struct InFlight {
  next: u64,
  by_node: HashMap<String, u64>,
}

impl GenerationOrchestrator {
  pub fn new(session: SessionId, backend: Arc<dyn GenerationBackend>, store: GraphStore) -> Self {
    Self {
      session,
      backend,
      store,
      tokens: Mutex::new(InFlight::default()),
    }
  }

  pub fn store(&self) -> &GraphStore {
    &self.store
  }

  /// Builds the prompt from the current graph and streams a generation for `node_id`.
  ///
  /// `Err` only for requests that never started (unknown node, not an llm).
  #[instrument(level = "trace", skip(self))]
  pub async fn generate(&self, node_id: &str) -> Result<GenerationOutcome, GenerationError> {
    let graph = self.store.snapshot();
    let node = graph
      .node(node_id)
      .ok_or_else(|| GenerationError::NodeNotFound(node_id.to_string()))?;
    let llm = node
      .as_llm()
      .ok_or_else(|| GenerationError::NotAGenerator(node_id.to_string()))?;
    let prompt = prompt_for(&graph, node_id).system_prompt;
    let request = GenerateRequest {
      session_id: self.session.to_string(),
      prompt: prompt.clone(),
      provider: llm.provider.clone(),
      model: llm.model.clone(),
      params: llm.params(),
    };
    drop(graph);

    let token = self.begin(node_id);
    info!(node = node_id, provider = %request.provider, model = %request.model, "generation started");

    let mut events = match self.backend.generate(request).await {
      Ok(events) => events,
      Err(e) => return Ok(self.fail(node_id, token, e.to_string())),
    };

    let mut output = String::new();
    while let Some(event) = events.next().await {
      match event {
        StreamEvent::Chunk { content } => {
          output.push_str(&content);
          let written = self.write_if_current(node_id, token, |g| {
            if let Some(NodeData::Llm(d)) = g.data_mut(node_id) {
              d.output.get_or_insert_with(String::new).push_str(&content);
            }
          });
          if !written {
            debug!(node = node_id, token, "superseded stream dropped");
            return Ok(GenerationOutcome::Superseded);
          }
        }
        StreamEvent::Done => return Ok(self.complete(node_id, token, output, prompt)),
        StreamEvent::Error { error } => return Ok(self.fail(node_id, token, error)),
      }
    }
    Ok(self.fail(node_id, token, UNTERMINATED_STREAM.to_string()))
  }

  /// Invalidates the in-flight generation of `node_id`, if any, and resets the node to idle.
  pub fn cancel(&self, node_id: &str) -> bool {
    let mut tokens = self.lock_tokens();
    if tokens.by_node.remove(node_id).is_none() {
      return false;
    }
    self.store.update_generation_state(|g| {
      if let Some(NodeData::Llm(d)) = g.data_mut(node_id) {
        d.status = GenerationStatus::Idle;
      }
    });
    debug!(node = node_id, "generation cancelled");
    true
  }

  fn lock_tokens(&self) -> std::sync::MutexGuard<'_, InFlight> {
    self.tokens.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// Issues a new token for `node_id` and marks the node as generating.
  fn begin(&self, node_id: &str) -> u64 {
    let mut tokens = self.lock_tokens();
    tokens.next += 1;
    let token = tokens.next;
    tokens.by_node.insert(node_id.to_string(), token);
    self.store.update_generation_state(|g| {
      if let Some(NodeData::Llm(d)) = g.data_mut(node_id) {
        d.status = GenerationStatus::Generating;
        d.output = Some(String::new());
        d.error = None;
      }
    });
    token
  }

  /// Applies `f` only while `token` is still current for `node_id`.
  fn write_if_current(&self, node_id: &str, token: u64, f: impl FnOnce(&mut FlowGraph)) -> bool {
    let tokens = self.lock_tokens();
    if tokens.by_node.get(node_id) != Some(&token) {
      return false;
    }
    self.store.update_generation_state(f);
    true
  }

  /// Like [Self::write_if_current] but also retires the token.
  fn finish_if_current(&self, node_id: &str, token: u64, f: impl FnOnce(&mut FlowGraph)) -> bool {
    let mut tokens = self.lock_tokens();
    if tokens.by_node.get(node_id) != Some(&token) {
      return false;
    }
    tokens.by_node.remove(node_id);
    self.store.update_generation_state(f);
    true
  }

  fn complete(&self, node_id: &str, token: u64, output: String, prompt: String) -> GenerationOutcome {
    let committed = output.clone();
    let written = self.finish_if_current(node_id, token, |g| {
      if let Some(NodeData::Llm(d)) = g.data_mut(node_id) {
        d.status = GenerationStatus::Done;
        d.output = Some(committed.clone());
        d.error = None;
      }
      let targets: Vec<String> = g
        .outgoing_edges(node_id)
        .into_iter()
        .map(|e| e.target.clone())
        .collect();
      for target in targets {
        if let Some(NodeData::Content(c)) = g.data_mut(&target) {
          c.content = committed.clone();
        }
      }
    });
    if !written {
      debug!(node = node_id, token, "superseded stream completed");
      return GenerationOutcome::Superseded;
    }
    info!(node = node_id, chars = output.chars().count(), "generation completed");
    GenerationOutcome::Completed { output, prompt }
  }

  fn fail(&self, node_id: &str, token: u64, reason: String) -> GenerationOutcome {
    let recorded = reason.clone();
    let written = self.finish_if_current(node_id, token, |g| {
      if let Some(NodeData::Llm(d)) = g.data_mut(node_id) {
        d.status = GenerationStatus::Error;
        d.error = Some(recorded);
      }
    });
    if !written {
      debug!(node = node_id, token, "superseded stream failed");
      return GenerationOutcome::Superseded;
    }
    warn!(node = node_id, reason = %reason, "generation failed");
    GenerationOutcome::Failed { reason }
  }
}
