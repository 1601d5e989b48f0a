//! OpenAI chat completions, streamed.

use async_stream::stream;
use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures::StreamExt;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument};

use super::{LlmProvider, TextStream};
use crate::error::ProviderError;
use crate::types::ModelParams;

const NAME: &str = "openai";
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DONE_SENTINEL: &str = "[DONE]";

pub const OPENAI_MODELS: [&str; 3] = ["gpt-4", "gpt-4-turbo", "gpt-3.5-turbo"];

#[derive(Deserialize)]
struct ChatChunk {
  #[serde(default)]
  choices: Vec<ChunkChoice>,
}

#[derive(Deserialize)]
struct ChunkChoice {
  #[serde(default)]
  delta: ChunkDelta,
}

#[derive(Deserialize, Default)]
struct ChunkDelta {
  content: Option<String>,
}

/// One decoded `data:` line of an OpenAI stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenAiEvent {
  Delta(String),
  /// The `[DONE]` sentinel.
  Done,
  /// Role announcements, empty deltas, finish markers.
  Skip,
}

pub fn parse_openai_event(data: &str) -> Result<OpenAiEvent, ProviderError> {
  if data.trim() == DONE_SENTINEL {
    return Ok(OpenAiEvent::Done);
  }
  let chunk: ChatChunk =
    serde_json::from_str(data).map_err(|e| ProviderError::Decode(e.to_string()))?;
  Ok(
    match chunk
      .choices
      .into_iter()
      .next()
      .and_then(|c| c.delta.content)
    {
      Some(text) if !text.is_empty() => OpenAiEvent::Delta(text),
      _ => OpenAiEvent::Skip,
    },
  )
}

pub struct OpenAiProvider {
  client: reqwest::Client,
  api_key: String,
  base_url: String,
}

impl OpenAiProvider {
  pub fn new(api_key: String, base_url: Option<String>) -> Self {
    Self {
      client: reqwest::Client::new(),
      api_key,
      base_url: base_url
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
        .trim_end_matches('/')
        .to_string(),
    }
  }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
  fn name(&self) -> &str {
    NAME
  }

  fn models(&self) -> Vec<String> {
    OPENAI_MODELS.iter().map(|m| m.to_string()).collect()
  }

  #[instrument(level = "trace", skip(self, prompt))]
  async fn stream(
    &self,
    prompt: &str,
    model: &str,
    params: ModelParams,
  ) -> Result<TextStream, ProviderError> {
    let body = json!({
      "model": model,
      "messages": [{ "role": "user", "content": prompt }],
      "temperature": params.temperature(),
      "max_tokens": params.max_tokens(),
      "top_p": params.top_p(),
      "stream": true,
    });
    let response = self
      .client
      .post(format!("{}/chat/completions", self.base_url))
      .bearer_auth(&self.api_key)
      .json(&body)
      .send()
      .await
      .map_err(|e| ProviderError::Http(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      return Err(ProviderError::Api {
        provider: NAME.to_string(),
        status: status.as_u16(),
        body,
      });
    }
    debug!(model, "openai stream opened");

    let mut events = Box::pin(response.bytes_stream().eventsource());
    Ok(Box::pin(stream! {
      while let Some(event) = events.next().await {
        let event = match event {
          Ok(event) => event,
          Err(e) => {
            yield Err(ProviderError::Stream(e.to_string()));
            return;
          }
        };
        match parse_openai_event(&event.data) {
          Ok(OpenAiEvent::Delta(text)) => yield Ok(text),
          Ok(OpenAiEvent::Skip) => {}
          Ok(OpenAiEvent::Done) => return,
          Err(e) => {
            yield Err(e);
            return;
          }
        }
      }
    }))
  }
}
