//! # promptweave
//!
//! Graph-driven prompt assembly and streamed UX copy generation.
//!
//! ## Architecture
//!
//! A [FlowGraph](types::FlowGraph) holds configuration nodes (audience, brand voice,
//! standards, core message, free-form context) wired into llm nodes. For a target
//! node, [collector] walks the graph upstream and [prompt] renders the collected
//! nodes into a system prompt.
//!
//! The graph lives in a copy-on-write [GraphStore](store::GraphStore). The
//! [GenerationOrchestrator](orchestrator::GenerationOrchestrator) runs one streamed
//! generation per llm node against a [GenerationBackend](orchestrator::GenerationBackend):
//! either the HTTP [client] of the generation service, or the in-process
//! [LocalBackend](providers::LocalBackend). The service itself ([server]) relays
//! provider output as server-sent events.

pub mod client;
pub mod collector;
pub mod config;
pub mod error;
pub mod orchestrator;
#[cfg(test)]
mod orchestrator_test;
pub mod presets;
pub mod prompt;
pub mod providers;
pub mod server;
pub mod session;
pub mod snapshot_io;
pub mod sse;
pub mod store;
pub mod types;

pub use client::HttpGenerationClient;
pub use collector::collect_context_nodes;
pub use config::AppConfig;
pub use error::{ApiError, GenerationError, GraphError, ProviderError};
pub use orchestrator::{GenerateRequest, GenerationBackend, GenerationOrchestrator, GenerationOutcome};
pub use prompt::{AssembledPrompt, assemble_prompt, prompt_for};
pub use providers::{LlmProvider, LocalBackend, ProviderRegistry};
pub use session::SessionId;
pub use sse::{EventStream, StreamEvent};
pub use store::{GraphStore, spawn_autosave};
pub use types::{FlowEdge, FlowGraph, FlowNode, NodeData, NodeType};
