//! LLM vendors behind one streaming trait, plus discovery and an in-process backend.
//!
//! A provider turns a prompt into a stream of text deltas. [provider_event_stream]
//! frames those deltas as [StreamEvent]s the same way for the HTTP service and for
//! [LocalBackend], so both paths end every stream with exactly one terminal event.

mod anthropic;
mod openai;
#[cfg(test)]
mod openai_test;

use std::pin::Pin;
use std::sync::Arc;

use async_stream::stream;
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub use anthropic::{ANTHROPIC_MODELS, AnthropicEvent, AnthropicProvider, parse_anthropic_event};
pub use openai::{OPENAI_MODELS, OpenAiEvent, OpenAiProvider, parse_openai_event};

use crate::config::ProviderKeys;
use crate::error::{GenerationError, ProviderError};
use crate::orchestrator::{GenerateRequest, GenerationBackend};
use crate::sse::{EventStream, StreamEvent};
use crate::types::ModelParams;

/// Text deltas in arrival order. Ends after the last delta or the first error.
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String, ProviderError>> + Send>>;

#[async_trait]
pub trait LlmProvider: Send + Sync {
  /// Identifier used in requests, e.g. `openai`.
  fn name(&self) -> &str;

  /// Models this provider accepts.
  fn models(&self) -> Vec<String>;

  /// Sends `prompt` as a single user message and streams the reply.
  async fn stream(
    &self,
    prompt: &str,
    model: &str,
    params: ModelParams,
  ) -> Result<TextStream, ProviderError>;
}

/// Entry in the discovery list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInfo {
  pub name: String,
  pub models: Vec<String>,
}

/// Configured providers, in registration order.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
  providers: Vec<Arc<dyn LlmProvider>>,
}

impl ProviderRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Registers every vendor that has a key. Missing keys are logged, never fatal.
  pub fn from_config(keys: &ProviderKeys) -> Self {
    let mut registry = Self::new();
    match &keys.openai_api_key {
      Some(key) => {
        registry = registry.with_provider(Arc::new(OpenAiProvider::new(
          key.clone(),
          keys.openai_base_url.clone(),
        )));
        info!("OpenAI provider initialized");
      }
      None => warn!("OpenAI API key not found, provider unavailable"),
    }
    match &keys.anthropic_api_key {
      Some(key) => {
        registry = registry.with_provider(Arc::new(AnthropicProvider::new(
          key.clone(),
          keys.anthropic_base_url.clone(),
        )));
        info!("Anthropic provider initialized");
      }
      None => warn!("Anthropic API key not found, provider unavailable"),
    }
    registry
  }

  /// Adds `provider`, replacing any earlier one with the same name.
  pub fn with_provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
    self.providers.retain(|p| p.name() != provider.name());
    self.providers.push(provider);
    self
  }

  pub fn get(&self, name: &str) -> Result<Arc<dyn LlmProvider>, ProviderError> {
    self
      .providers
      .iter()
      .find(|p| p.name() == name)
      .cloned()
      .ok_or_else(|| ProviderError::NotConfigured(name.to_string()))
  }

  pub fn list(&self) -> Vec<ProviderInfo> {
    self
      .providers
      .iter()
      .map(|p| ProviderInfo {
        name: p.name().to_string(),
        models: p.models(),
      })
      .collect()
  }

  pub fn is_empty(&self) -> bool {
    self.providers.is_empty()
  }
}

/// Runs `provider` and frames its output: one `chunk` per delta, then `done`, or a
/// single `error` as soon as anything fails. Chunks already sent stay sent.
pub fn provider_event_stream(
  provider: Arc<dyn LlmProvider>,
  prompt: String,
  model: String,
  params: ModelParams,
) -> EventStream {
  Box::pin(stream! {
    let mut text = match provider.stream(&prompt, &model, params).await {
      Ok(text) => text,
      Err(e) => {
        warn!(provider = %provider.name(), error = %e, "provider request failed");
        yield StreamEvent::error(e.to_string());
        return;
      }
    };
    while let Some(delta) = text.next().await {
      match delta {
        Ok(content) => yield StreamEvent::chunk(content),
        Err(e) => {
          warn!(provider = %provider.name(), error = %e, "provider stream failed");
          yield StreamEvent::error(e.to_string());
          return;
        }
      }
    }
    yield StreamEvent::Done;
  })
}

/// Generates in-process against a [ProviderRegistry], without the HTTP hop.
#[derive(Clone)]
pub struct LocalBackend {
  registry: ProviderRegistry,
}

impl LocalBackend {
  pub fn new(registry: ProviderRegistry) -> Self {
    Self { registry }
  }
}

#[async_trait]
impl GenerationBackend for LocalBackend {
  async fn generate(&self, request: GenerateRequest) -> Result<EventStream, GenerationError> {
    request.validate()?;
    let provider = self
      .registry
      .get(&request.provider)
      .map_err(|e| GenerationError::Backend(e.to_string()))?;
    Ok(provider_event_stream(
      provider,
      request.prompt,
      request.model,
      request.params,
    ))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use futures::stream;

  struct Scripted {
    deltas: Vec<Result<&'static str, ProviderError>>,
  }

  #[async_trait]
  impl LlmProvider for Scripted {
    fn name(&self) -> &str {
      "scripted"
    }

    fn models(&self) -> Vec<String> {
      vec!["m1".to_string()]
    }

    async fn stream(
      &self,
      _prompt: &str,
      _model: &str,
      _params: ModelParams,
    ) -> Result<TextStream, ProviderError> {
      let items: Vec<_> = self
        .deltas
        .iter()
        .map(|d| d.clone().map(str::to_string))
        .collect();
      Ok(Box::pin(stream::iter(items)))
    }
  }

  async fn events(deltas: Vec<Result<&'static str, ProviderError>>) -> Vec<StreamEvent> {
    provider_event_stream(
      Arc::new(Scripted { deltas }),
      "p".to_string(),
      "m1".to_string(),
      ModelParams::default(),
    )
    .collect()
    .await
  }

  #[tokio::test]
  async fn chunks_then_done() {
    let got = events(vec![Ok("a"), Ok("b")]).await;
    assert_eq!(
      got,
      vec![StreamEvent::chunk("a"), StreamEvent::chunk("b"), StreamEvent::Done]
    );
  }

  #[tokio::test]
  async fn error_mid_stream_terminates() {
    let got = events(vec![
      Ok("a"),
      Err(ProviderError::Stream("reset".to_string())),
      Ok("never"),
    ])
    .await;
    assert_eq!(
      got,
      vec![StreamEvent::chunk("a"), StreamEvent::error("stream error: reset")]
    );
  }

  #[test]
  fn registry_without_keys_is_empty() {
    let registry = ProviderRegistry::from_config(&ProviderKeys::default());
    assert!(registry.is_empty());
    assert!(matches!(
      registry.get("openai"),
      Err(ProviderError::NotConfigured(_))
    ));
  }

  #[test]
  fn registry_lists_configured_providers_in_order() {
    let keys = ProviderKeys {
      openai_api_key: Some("sk".to_string()),
      anthropic_api_key: Some("ak".to_string()),
      ..ProviderKeys::default()
    };
    let list = ProviderRegistry::from_config(&keys).list();
    let names: Vec<&str> = list.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["openai", "anthropic"]);
    assert_eq!(list[0].models, vec!["gpt-4", "gpt-4-turbo", "gpt-3.5-turbo"]);
  }

  #[test]
  fn only_keyed_providers_are_listed() {
    let keys = ProviderKeys {
      anthropic_api_key: Some("ak".to_string()),
      ..ProviderKeys::default()
    };
    let list = ProviderRegistry::from_config(&keys).list();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].name, "anthropic");
  }

  #[tokio::test]
  async fn local_backend_rejects_unknown_provider() {
    let backend = LocalBackend::new(ProviderRegistry::new());
    let request = GenerateRequest {
      session_id: "s".to_string(),
      prompt: "p".to_string(),
      provider: "nope".to_string(),
      model: "m".to_string(),
      params: ModelParams::default(),
    };
    match backend.generate(request).await {
      Err(GenerationError::Backend(msg)) => {
        assert_eq!(msg, "Provider \"nope\" not found or not configured")
      }
      Err(other) => panic!("unexpected error {:?}", other),
      Ok(_) => panic!("expected an error"),
    }
  }

  #[tokio::test]
  async fn local_backend_streams_registered_provider() {
    let registry = ProviderRegistry::new().with_provider(Arc::new(Scripted {
      deltas: vec![Ok("hi")],
    }));
    let backend = LocalBackend::new(registry);
    let request = GenerateRequest {
      session_id: "s".to_string(),
      prompt: "p".to_string(),
      provider: "scripted".to_string(),
      model: "m1".to_string(),
      params: ModelParams::default(),
    };
    let got: Vec<StreamEvent> = backend.generate(request).await.unwrap().collect().await;
    assert_eq!(got, vec![StreamEvent::chunk("hi"), StreamEvent::Done]);
  }
}
