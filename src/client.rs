//! Client of the generation service.
//!
//! Decodes the service's event stream into [StreamEvent]s and stops after the first
//! terminal event. Transport or decode failures surface as one `error` event.

use async_stream::stream;
use async_trait::async_trait;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{GenerationError, ProviderError};
use crate::orchestrator::{GenerateRequest, GenerationBackend};
use crate::providers::ProviderInfo;
use crate::server::{EvaluateRequest, ProvidersResponse};
use crate::sse::{EventStream, StreamEvent, decode_event_stream};

#[derive(Deserialize)]
struct ErrorBody {
  error: String,
}

#[derive(Clone)]
pub struct HttpGenerationClient {
  http: reqwest::Client,
  base_url: String,
}

impl HttpGenerationClient {
  /// `base_url` includes the `/api` prefix, e.g. `http://localhost:3001/api`.
  pub fn new(base_url: impl Into<String>) -> Self {
    Self {
      http: reqwest::Client::new(),
      base_url: base_url.into().trim_end_matches('/').to_string(),
    }
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  #[instrument(level = "trace", skip(self))]
  pub async fn providers(&self) -> Result<Vec<ProviderInfo>, ProviderError> {
    let response = self
      .http
      .get(format!("{}/providers", self.base_url))
      .send()
      .await
      .map_err(|e| ProviderError::Http(e.to_string()))?;
    let status = response.status();
    if !status.is_success() {
      return Err(ProviderError::Api {
        provider: "service".to_string(),
        status: status.as_u16(),
        body: response.text().await.unwrap_or_default(),
      });
    }
    let body: ProvidersResponse = response
      .json()
      .await
      .map_err(|e| ProviderError::Decode(e.to_string()))?;
    Ok(body.providers)
  }

  /// Streams a review of `request.content`.
  #[instrument(level = "trace", skip(self, request))]
  pub async fn evaluate(&self, request: EvaluateRequest) -> Result<EventStream, GenerationError> {
    self.open_stream("evaluate", &request).await
  }

  async fn open_stream<T: Serialize>(
    &self,
    path: &str,
    body: &T,
  ) -> Result<EventStream, GenerationError> {
    let response = self
      .http
      .post(format!("{}/{}", self.base_url, path))
      .json(body)
      .send()
      .await
      .map_err(|e| GenerationError::Backend(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
      let text = response.text().await.unwrap_or_default();
      let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|b| b.error)
        .unwrap_or(text);
      return Err(if status == reqwest::StatusCode::BAD_REQUEST {
        GenerationError::Validation(message)
      } else {
        GenerationError::Backend(format!("{}: {}", status, message))
      });
    }
    debug!(path, "event stream opened");

    let mut events = Box::pin(decode_event_stream(response.bytes_stream()));
    Ok(Box::pin(stream! {
      while let Some(event) = events.next().await {
        match event {
          Ok(event) => {
            let terminal = event.is_terminal();
            yield event;
            if terminal {
              return;
            }
          }
          Err(e) => {
            yield StreamEvent::error(e.to_string());
            return;
          }
        }
      }
    }))
  }
}

#[async_trait]
impl GenerationBackend for HttpGenerationClient {
  #[instrument(level = "trace", skip(self, request))]
  async fn generate(&self, request: GenerateRequest) -> Result<EventStream, GenerationError> {
    request.validate()?;
    self.open_stream("generate", &request).await
  }
}
