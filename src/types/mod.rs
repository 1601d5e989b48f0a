//! Flow graph model: nodes, edges, and the per-type configuration payloads.
//!
//! A node's payload is a [NodeData] variant, so the node type and the shape of its
//! data can never disagree. Snapshots serialize as `{nodes, edges}` with each node
//! written as `{id, type, position, data}`.

mod audience_profile;
mod brand_voice;
mod config_status;
mod content_standards;
mod context_entry;
mod core_message;
mod flow_edge;
mod flow_graph;
#[cfg(test)]
mod flow_graph_test;
mod flow_node;
mod generation_status;
mod llm_config;
mod model_params;
mod node_type;
mod text_nodes;

pub use audience_profile::{
  AudiencePreferences, AudienceProfile, AudienceProfileData, Demographics, Psychographics,
};
pub use brand_voice::{BrandVoice, BrandVoiceData, Vocabulary};
pub use config_status::ConfigStatus;
pub use content_standards::{ContentStandards, ContentStandardsData};
pub use context_entry::{ContextData, ContextType};
pub use core_message::{CoreMessage, CoreMessageData, MIN_CONFIGURED_MESSAGE_LEN};
pub use flow_edge::FlowEdge;
pub use flow_graph::{FlowGraph, GraphSnapshot};
pub use flow_node::{FlowNode, NodeData, Position};
pub use generation_status::GenerationStatus;
pub use llm_config::LlmData;
pub use model_params::ModelParams;
pub use node_type::NodeType;
pub use text_nodes::{ContentData, PromptViewData};
