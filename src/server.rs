//! HTTP surface: provider discovery, streamed generation, streamed evaluation.
//!
//! Routes live under `/api`. Request validation and provider lookup happen before
//! the response starts, so those failures are plain JSON errors. Once streaming
//! has begun, failures arrive as a single `error` event.

use axum::extract::State;
use axum::response::sse::{Event, Sse};
use axum::routing::{get, post};
use axum::{Json, Router};
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::orchestrator::{GenerateRequest, MISSING_GENERATE_FIELDS};
use crate::providers::{ProviderInfo, ProviderRegistry, provider_event_stream};
use crate::sse::EventStream;
use crate::types::ModelParams;

pub const MISSING_EVALUATE_FIELDS: &str =
  "Missing required fields: sessionId, content, model, provider";

/// Body of an evaluation request.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EvaluateRequest {
  pub session_id: String,
  pub content: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub context: Option<String>,
  pub provider: String,
  pub model: String,
  pub params: ModelParams,
}

impl EvaluateRequest {
  pub fn validate(&self) -> ApiResult<()> {
    let required = [&self.session_id, &self.content, &self.model, &self.provider];
    if required.iter().any(|f| f.is_empty()) {
      return Err(ApiError::Validation(MISSING_EVALUATE_FIELDS.to_string()));
    }
    Ok(())
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvidersResponse {
  pub providers: Vec<ProviderInfo>,
}

/// Wraps `content` in the fixed review instructions sent to the model.
pub fn evaluation_prompt(content: &str, context: Option<&str>) -> String {
  let context = match context.filter(|c| !c.is_empty()) {
    Some(c) => format!("Context:\n{}\n\n", c),
    None => String::new(),
  };
  format!(
    "You are a UX content evaluator. Please analyze the following content and provide constructive feedback.\n\n\
     {context}Content to evaluate:\n{content}\n\n\
     Please evaluate this content on:\n\
     1. Clarity - Is the message clear and easy to understand?\n\
     2. Tone - Is the tone appropriate for the context and audience?\n\
     3. Conciseness - Is it appropriately concise without sacrificing clarity?\n\
     4. Grammar & Style - Are there any grammar issues or style improvements?\n\n\
     Provide specific, actionable feedback."
  )
}

#[derive(Clone)]
struct AppState {
  registry: ProviderRegistry,
}

/// Builds the service router with tracing and permissive CORS.
pub fn router(registry: ProviderRegistry) -> Router {
  let api = Router::new()
    .route("/providers", get(list_providers))
    .route("/generate", post(generate))
    .route("/evaluate", post(evaluate))
    .with_state(AppState { registry });
  Router::new()
    .nest("/api", api)
    .layer(TraceLayer::new_for_http())
    .layer(CorsLayer::permissive())
}

/// Serves `router(registry)` on `bind` until Ctrl-C.
pub async fn serve(bind: &str, registry: ProviderRegistry) -> Result<(), std::io::Error> {
  let listener = tokio::net::TcpListener::bind(bind).await?;
  info!(addr = %listener.local_addr()?, "generation service listening");
  axum::serve(listener, router(registry))
    .with_graceful_shutdown(async {
      let _ = tokio::signal::ctrl_c().await;
      info!("shutting down");
    })
    .await
}

fn sse_response(events: EventStream) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
  Sse::new(events.map(|event| Event::default().json_data(&event)))
}

async fn list_providers(State(state): State<AppState>) -> Json<ProvidersResponse> {
  Json(ProvidersResponse {
    providers: state.registry.list(),
  })
}

async fn generate(
  State(state): State<AppState>,
  Json(request): Json<GenerateRequest>,
) -> ApiResult<Sse<impl Stream<Item = Result<Event, axum::Error>>>> {
  request
    .validate()
    .map_err(|_| ApiError::Validation(MISSING_GENERATE_FIELDS.to_string()))?;
  let provider = state.registry.get(&request.provider)?;
  info!(
    session = %request.session_id,
    provider = %request.provider,
    model = %request.model,
    "generation request accepted"
  );
  Ok(sse_response(provider_event_stream(
    provider,
    request.prompt,
    request.model,
    request.params,
  )))
}

async fn evaluate(
  State(state): State<AppState>,
  Json(request): Json<EvaluateRequest>,
) -> ApiResult<Sse<impl Stream<Item = Result<Event, axum::Error>>>> {
  request.validate()?;
  let provider = state.registry.get(&request.provider)?;
  info!(
    session = %request.session_id,
    provider = %request.provider,
    model = %request.model,
    "evaluation request accepted"
  );
  let prompt = evaluation_prompt(&request.content, request.context.as_deref());
  Ok(sse_response(provider_event_stream(
    provider,
    prompt,
    request.model,
    request.params,
  )))
}
