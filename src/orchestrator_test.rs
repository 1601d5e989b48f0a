//! Tests for the generation orchestrator.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::error::GenerationError;
use crate::orchestrator::{
  EventStream, GenerateRequest, GenerationBackend, GenerationOrchestrator, GenerationOutcome,
  MISSING_GENERATE_FIELDS, StreamEvent, UNTERMINATED_STREAM,
};
use crate::session::SessionId;
use crate::store::GraphStore;
use crate::types::{
  ContextData, ContextType, FlowGraph, GenerationStatus, LlmData, ModelParams, NodeData, NodeType,
};

/// Replays a fixed script per call and records the requests it saw.
#[derive(Default)]
struct ScriptedBackend {
  scripts: Mutex<VecDeque<Vec<StreamEvent>>>,
  requests: Mutex<Vec<GenerateRequest>>,
}

impl ScriptedBackend {
  fn new(scripts: Vec<Vec<StreamEvent>>) -> Arc<Self> {
    Arc::new(Self {
      scripts: Mutex::new(scripts.into()),
      requests: Mutex::new(Vec::new()),
    })
  }

  fn prompts(&self) -> Vec<String> {
    self
      .requests
      .lock()
      .unwrap()
      .iter()
      .map(|r| r.prompt.clone())
      .collect()
  }
}

#[async_trait]
impl GenerationBackend for ScriptedBackend {
  async fn generate(&self, request: GenerateRequest) -> Result<EventStream, GenerationError> {
    request.validate()?;
    self.requests.lock().unwrap().push(request);
    let script = self.scripts.lock().unwrap().pop_front().unwrap_or_default();
    Ok(Box::pin(futures::stream::iter(script)))
  }
}

/// Hands out streams fed by the test through channels.
struct ChannelBackend {
  streams: Mutex<VecDeque<mpsc::Receiver<StreamEvent>>>,
}

#[async_trait]
impl GenerationBackend for ChannelBackend {
  async fn generate(&self, _request: GenerateRequest) -> Result<EventStream, GenerationError> {
    let rx = self
      .streams
      .lock()
      .unwrap()
      .pop_front()
      .ok_or_else(|| GenerationError::Backend("no stream left".to_string()))?;
    Ok(Box::pin(ReceiverStream::new(rx)))
  }
}

struct Wired {
  store: GraphStore,
  context: String,
  llm: String,
  content: String,
}

fn wired_graph() -> Wired {
  let mut g = FlowGraph::new();
  let context = g.add_node(NodeData::Context(ContextData::new(ContextType::Tone, "Warm"))).unwrap();
  let llm = g.add_default_node(NodeType::Llm).unwrap();
  let content = g.add_default_node(NodeType::Content).unwrap();
  g.connect(&context, &llm).unwrap();
  g.connect(&llm, &content).unwrap();
  Wired {
    store: GraphStore::new(g),
    context,
    llm,
    content,
  }
}

fn orchestrator(store: &GraphStore, backend: Arc<dyn GenerationBackend>) -> GenerationOrchestrator {
  GenerationOrchestrator::new(SessionId::from("session-1"), backend, store.clone())
}

fn llm_data(store: &GraphStore, id: &str) -> LlmData {
  store.snapshot().node(id).unwrap().as_llm().unwrap().clone()
}

fn content_text(store: &GraphStore, id: &str) -> String {
  match &store.snapshot().node(id).unwrap().data {
    NodeData::Content(c) => c.content.clone(),
    other => panic!("unexpected payload {:?}", other),
  }
}

#[test]
fn request_validation_names_all_fields() {
  let err = GenerateRequest::default().validate().unwrap_err();
  assert_eq!(err, GenerationError::Validation(MISSING_GENERATE_FIELDS.to_string()));
  let ok = GenerateRequest {
    session_id: "s".to_string(),
    prompt: "p".to_string(),
    provider: "openai".to_string(),
    model: "gpt-4".to_string(),
    params: ModelParams::default(),
  };
  assert!(ok.validate().is_ok());
}

#[tokio::test]
async fn completion_propagates_to_downstream_content() {
  let w = wired_graph();
  let backend = ScriptedBackend::new(vec![vec![
    StreamEvent::chunk("Hello"),
    StreamEvent::chunk(", world"),
    StreamEvent::Done,
  ]]);
  let orch = orchestrator(&w.store, backend.clone());

  let outcome = orch.generate(&w.llm).await.unwrap();
  match outcome {
    GenerationOutcome::Completed { output, prompt } => {
      assert_eq!(output, "Hello, world");
      assert!(prompt.contains("Tone: Warm\n"));
    }
    other => panic!("unexpected outcome {:?}", other),
  }
  let llm = llm_data(&w.store, &w.llm);
  assert_eq!(llm.status, GenerationStatus::Done);
  assert_eq!(llm.output.as_deref(), Some("Hello, world"));
  assert_eq!(content_text(&w.store, &w.content), "Hello, world");
}

#[tokio::test]
async fn request_carries_node_settings_and_session() {
  let w = wired_graph();
  w.store
    .try_update(|g| {
      let mut llm = g.node(&w.llm).unwrap().as_llm().unwrap().clone();
      llm.provider = "anthropic".to_string();
      llm.model = "claude-3-opus-20240229".to_string();
      llm.temperature = 0.2;
      g.replace_data(&w.llm, NodeData::Llm(llm))
    })
    .unwrap();
  let backend = ScriptedBackend::new(vec![vec![StreamEvent::Done]]);
  let orch = orchestrator(&w.store, backend.clone());
  orch.generate(&w.llm).await.unwrap();

  let requests = backend.requests.lock().unwrap();
  assert_eq!(requests[0].session_id, "session-1");
  assert_eq!(requests[0].provider, "anthropic");
  assert_eq!(requests[0].model, "claude-3-opus-20240229");
  assert_eq!(requests[0].params.temperature, Some(0.2));
  assert_eq!(requests[0].params.max_tokens, Some(2000));
}

#[tokio::test]
async fn prompt_is_rebuilt_for_every_generation() {
  let w = wired_graph();
  let backend = ScriptedBackend::new(vec![vec![StreamEvent::Done], vec![StreamEvent::Done]]);
  let orch = orchestrator(&w.store, backend.clone());

  orch.generate(&w.llm).await.unwrap();
  w.store
    .try_update(|g| {
      g.replace_data(
        &w.context,
        NodeData::Context(ContextData::new(ContextType::Tone, "Stern")),
      )
    })
    .unwrap();
  orch.generate(&w.llm).await.unwrap();

  let prompts = backend.prompts();
  assert!(prompts[0].contains("Tone: Warm"));
  assert!(prompts[1].contains("Tone: Stern"));
}

#[tokio::test]
async fn error_event_is_recorded_and_downstream_untouched() {
  let w = wired_graph();
  w.store.update(|g| {
    if let Some(NodeData::Content(c)) = g.data_mut(&w.content) {
      c.content = "previous".to_string();
    }
  });
  let backend = ScriptedBackend::new(vec![vec![
    StreamEvent::chunk("partial"),
    StreamEvent::error("rate limited"),
  ]]);
  let orch = orchestrator(&w.store, backend);

  let outcome = orch.generate(&w.llm).await.unwrap();
  assert_eq!(
    outcome,
    GenerationOutcome::Failed {
      reason: "rate limited".to_string()
    }
  );
  let llm = llm_data(&w.store, &w.llm);
  assert_eq!(llm.status, GenerationStatus::Error);
  assert_eq!(llm.error.as_deref(), Some("rate limited"));
  assert_eq!(content_text(&w.store, &w.content), "previous");
}

#[tokio::test]
async fn stream_without_terminal_event_fails() {
  let w = wired_graph();
  let backend = ScriptedBackend::new(vec![vec![StreamEvent::chunk("cut off")]]);
  let orch = orchestrator(&w.store, backend);
  let outcome = orch.generate(&w.llm).await.unwrap();
  assert_eq!(
    outcome,
    GenerationOutcome::Failed {
      reason: UNTERMINATED_STREAM.to_string()
    }
  );
  assert_eq!(content_text(&w.store, &w.content), "");
}

#[tokio::test]
async fn backend_rejection_is_recorded_on_node() {
  let w = wired_graph();
  let channel = Arc::new(ChannelBackend {
    streams: Mutex::new(VecDeque::new()),
  });
  let orch = orchestrator(&w.store, channel);
  let outcome = orch.generate(&w.llm).await.unwrap();
  assert!(matches!(outcome, GenerationOutcome::Failed { .. }));
  assert_eq!(llm_data(&w.store, &w.llm).status, GenerationStatus::Error);
}

#[tokio::test]
async fn unknown_and_non_llm_nodes_are_rejected() {
  let w = wired_graph();
  let orch = orchestrator(&w.store, ScriptedBackend::new(vec![]));
  assert_eq!(
    orch.generate("llm-99").await.unwrap_err(),
    GenerationError::NodeNotFound("llm-99".to_string())
  );
  assert_eq!(
    orch.generate(&w.content).await.unwrap_err(),
    GenerationError::NotAGenerator(w.content.clone())
  );
}

#[tokio::test]
async fn only_content_nodes_receive_output() {
  let w = wired_graph();
  let (second, view) = w.store.update(|g| {
    let second = g.add_default_node(NodeType::Content).unwrap();
    let view = g.add_default_node(NodeType::PromptView).unwrap();
    g.connect(&w.llm, &second).unwrap();
    g.connect(&w.llm, &view).unwrap();
    (second, view)
  });
  let backend = ScriptedBackend::new(vec![vec![StreamEvent::chunk("copy"), StreamEvent::Done]]);
  orchestrator(&w.store, backend).generate(&w.llm).await.unwrap();

  assert_eq!(content_text(&w.store, &w.content), "copy");
  assert_eq!(content_text(&w.store, &second), "copy");
  match &w.store.snapshot().node(&view).unwrap().data {
    NodeData::PromptView(v) => assert!(v.prompt.contains("Tone: Warm")),
    other => panic!("unexpected payload {:?}", other),
  }
}

async fn wait_for_output(store: &GraphStore, llm: &str, expected: &str) {
  let mut rx = store.subscribe();
  tokio::time::timeout(Duration::from_secs(5), async {
    loop {
      let current = rx
        .borrow_and_update()
        .node(llm)
        .and_then(|n| n.as_llm())
        .and_then(|d| d.output.clone());
      if current.as_deref() == Some(expected) {
        return;
      }
      rx.changed().await.unwrap();
    }
  })
  .await
  .expect("output never reached expected value");
}

#[tokio::test]
async fn superseded_stream_never_writes() {
  let w = wired_graph();
  let (tx_old, rx_old) = mpsc::channel(8);
  let (tx_new, rx_new) = mpsc::channel(8);
  let backend = Arc::new(ChannelBackend {
    streams: Mutex::new(VecDeque::from([rx_old, rx_new])),
  });
  let orch = Arc::new(orchestrator(&w.store, backend));

  let old = tokio::spawn({
    let orch = orch.clone();
    let llm = w.llm.clone();
    async move { orch.generate(&llm).await }
  });
  tx_old.send(StreamEvent::chunk("old-1")).await.unwrap();
  wait_for_output(&w.store, &w.llm, "old-1").await;

  let new = tokio::spawn({
    let orch = orch.clone();
    let llm = w.llm.clone();
    async move { orch.generate(&llm).await }
  });
  tx_new.send(StreamEvent::chunk("new-1")).await.unwrap();
  wait_for_output(&w.store, &w.llm, "new-1").await;

  tx_old.send(StreamEvent::chunk("old-2")).await.unwrap();
  // The superseded task may already have dropped its receiver.
  let _ = tx_old.send(StreamEvent::Done).await;
  assert_eq!(old.await.unwrap().unwrap(), GenerationOutcome::Superseded);
  assert_eq!(llm_data(&w.store, &w.llm).output.as_deref(), Some("new-1"));
  assert_eq!(content_text(&w.store, &w.content), "");

  tx_new.send(StreamEvent::Done).await.unwrap();
  match new.await.unwrap().unwrap() {
    GenerationOutcome::Completed { output, .. } => assert_eq!(output, "new-1"),
    other => panic!("unexpected outcome {:?}", other),
  }
  assert_eq!(content_text(&w.store, &w.content), "new-1");
}

#[tokio::test]
async fn cancel_supersedes_in_flight_generation() {
  let w = wired_graph();
  let (tx, rx) = mpsc::channel(8);
  let backend = Arc::new(ChannelBackend {
    streams: Mutex::new(VecDeque::from([rx])),
  });
  let orch = Arc::new(orchestrator(&w.store, backend));
  let running = tokio::spawn({
    let orch = orch.clone();
    let llm = w.llm.clone();
    async move { orch.generate(&llm).await }
  });
  tx.send(StreamEvent::chunk("a")).await.unwrap();
  wait_for_output(&w.store, &w.llm, "a").await;

  assert!(orch.cancel(&w.llm));
  assert!(!orch.cancel(&w.llm));
  assert_eq!(llm_data(&w.store, &w.llm).status, GenerationStatus::Idle);

  tx.send(StreamEvent::Done).await.unwrap();
  assert_eq!(running.await.unwrap().unwrap(), GenerationOutcome::Superseded);
  assert_eq!(content_text(&w.store, &w.content), "");
}
