//! Anthropic messages API, streamed.

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

const NAME: &str = "anthropic";
const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
const API_VERSION: &str = "2023-06-01";

pub const ANTHROPIC_MODELS: [&str; 3] = [
  "claude-3-5-sonnet-20241022",
  "claude-3-opus-20240229",
  "claude-3-sonnet-20240229",
];

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum StreamPayload {
  ContentBlockDelta { delta: BlockDelta },
  MessageStop,
  Error { error: ErrorBody },
  #[serde(other)]
  Other,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum BlockDelta {
  TextDelta {
    #[serde(default)]
    text: String,
  },
  #[serde(other)]
  Other,
}

#[derive(Deserialize)]
struct ErrorBody {
  message: Option<String>,
}

/// One decoded `data:` payload of an Anthropic stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnthropicEvent {
  /// `content_block_delta` carrying a `text_delta`.
  Text(String),
  /// `message_stop`
  Stop,
  /// In-stream `error` event.
  Error(String),
  /// Pings, block starts and stops, message deltas.
  Skip,
}

pub fn parse_anthropic_event(data: &str) -> Result<AnthropicEvent, ProviderError> {
  let payload: StreamPayload =
    serde_json::from_str(data).map_err(|e| ProviderError::Decode(e.to_string()))?;
  Ok(match payload {
    StreamPayload::ContentBlockDelta {
      delta: BlockDelta::TextDelta { text },
    } if !text.is_empty() => AnthropicEvent::Text(text),
    StreamPayload::MessageStop => AnthropicEvent::Stop,
    StreamPayload::Error { error } => {
      AnthropicEvent::Error(error.message.unwrap_or_else(|| "unknown error".to_string()))
    }
    StreamPayload::ContentBlockDelta { .. } | StreamPayload::Other => AnthropicEvent::Skip,
  })
}

pub struct AnthropicProvider {
  client: reqwest::Client,
  api_key: String,
  base_url: String,
}

impl AnthropicProvider {
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
impl LlmProvider for AnthropicProvider {
  fn name(&self) -> &str {
    NAME
  }

  fn models(&self) -> Vec<String> {
    ANTHROPIC_MODELS.iter().map(|m| m.to_string()).collect()
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
      "max_tokens": params.max_tokens(),
      "temperature": params.temperature(),
      "top_p": params.top_p(),
      "messages": [{ "role": "user", "content": prompt }],
      "stream": true,
    });
    let response = self
      .client
      .post(format!("{}/messages", self.base_url))
      .header("x-api-key", &self.api_key)
      .header("anthropic-version", API_VERSION)
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
    debug!(model, "anthropic stream opened");

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
        match parse_anthropic_event(&event.data) {
          Ok(AnthropicEvent::Text(text)) => yield Ok(text),
          Ok(AnthropicEvent::Skip) => {}
          Ok(AnthropicEvent::Stop) => return,
          Ok(AnthropicEvent::Error(message)) => {
            yield Err(ProviderError::Stream(message));
            return;
          }
          Err(e) => {
            yield Err(e);
            return;
          }
        }
      }
    }))
  }
}
