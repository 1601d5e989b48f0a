//! Wire codec for generation event streams.
//!
//! Each event is one JSON object framed as `data: <json>\n\n`. A stream carries any
//! number of `chunk` events and ends with exactly one `done` or `error`.

use std::pin::Pin;

use eventsource_stream::Eventsource;
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StreamEvent {
  Chunk { content: String },
  Done,
  Error { error: String },
}

/// Ordered, finite stream of generation events.
pub type EventStream = Pin<Box<dyn Stream<Item = StreamEvent> + Send>>;

impl StreamEvent {
  pub fn chunk(content: impl Into<String>) -> Self {
    StreamEvent::Chunk {
      content: content.into(),
    }
  }

  pub fn error(error: impl Into<String>) -> Self {
    StreamEvent::Error {
      error: error.into(),
    }
  }

  /// True for `done` and `error`.
  pub fn is_terminal(&self) -> bool {
    !matches!(self, StreamEvent::Chunk { .. })
  }

  /// `data: <json>\n\n`
  pub fn to_frame(&self) -> Result<String, serde_json::Error> {
    Ok(format!("data: {}\n\n", serde_json::to_string(self)?))
  }

  /// Parses the payload of one `data:` line.
  pub fn from_data(data: &str) -> Result<Self, serde_json::Error> {
    serde_json::from_str(data)
  }
}

/// Decodes a raw SSE byte stream into events. Frames may be split across chunks.
pub fn decode_event_stream<S, B, E>(
  bytes: S,
) -> impl Stream<Item = Result<StreamEvent, ProviderError>> + Send
where
  S: Stream<Item = Result<B, E>> + Send + 'static,
  B: AsRef<[u8]> + Send,
  E: std::fmt::Display + Send,
{
  bytes.eventsource().map(|event| match event {
    Ok(event) => {
      StreamEvent::from_data(&event.data).map_err(|e| ProviderError::Decode(e.to_string()))
    }
    Err(e) => Err(ProviderError::Stream(e.to_string())),
  })
}
