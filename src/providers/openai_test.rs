use crate::error::ProviderError;
use crate::providers::{LlmProvider, OpenAiEvent, OpenAiProvider, parse_openai_event};

#[test]
fn content_delta_is_text() {
  let data = r#"{"id":"c1","choices":[{"index":0,"delta":{"content":"Hello"},"finish_reason":null}]}"#;
  assert_eq!(
    parse_openai_event(data).unwrap(),
    OpenAiEvent::Delta("Hello".to_string())
  );
}

#[test]
fn role_and_empty_deltas_are_skipped() {
  let role = r#"{"choices":[{"delta":{"role":"assistant","content":""}}]}"#;
  let finish = r#"{"choices":[{"delta":{},"finish_reason":"stop"}]}"#;
  let none = r#"{"choices":[]}"#;
  for data in [role, finish, none] {
    assert_eq!(parse_openai_event(data).unwrap(), OpenAiEvent::Skip);
  }
}

#[test]
fn done_sentinel_ends_stream() {
  assert_eq!(parse_openai_event("[DONE]").unwrap(), OpenAiEvent::Done);
}

#[test]
fn garbage_is_a_decode_error() {
  assert!(matches!(
    parse_openai_event("{oops"),
    Err(ProviderError::Decode(_))
  ));
}

#[test]
fn advertises_catalogue() {
  let p = OpenAiProvider::new("sk".to_string(), Some("http://localhost:9/v1/".to_string()));
  assert_eq!(p.name(), "openai");
  assert_eq!(p.models(), vec!["gpt-4", "gpt-4-turbo", "gpt-3.5-turbo"]);
}
