//! Renders collected configuration nodes into a single system prompt.
//!
//! Sections always appear in the same order (audience, brand voice, content
//! standards, core message, free-form context lines) whatever order the nodes were
//! collected in. Only the first node of each structured type is used; later
//! duplicates are ignored rather than merged.

use serde::Serialize;
use tracing::instrument;

use crate::types::{
  AudienceProfile, BrandVoice, ContentStandards, ContextData, CoreMessage, FlowGraph, FlowNode,
  NodeData, NodeType,
};

pub const PREAMBLE: &str =
  "You are a UX writing assistant. Generate appropriate UX content based on the following context:\n\n";
pub const NO_CONTEXT: &str = "No specific context provided. Generate general UX content.\n";
pub const CLOSING: &str =
  "\nGenerate clear, concise, and user-friendly content that adheres to the context above.";

/// Characters of the core message shown in its summary entry.
const MESSAGE_SUMMARY_CHARS: usize = 50;

/// One contributing section, for display next to the prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextSummary {
  #[serde(rename = "type")]
  pub kind: String,
  pub value: String,
}

impl ContextSummary {
  fn new(kind: impl Into<String>, value: impl Into<String>) -> Self {
    Self {
      kind: kind.into(),
      value: value.into(),
    }
  }
}

/// Rendered prompt plus the sections that contributed to it, in prompt order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssembledPrompt {
  pub system_prompt: String,
  pub contexts: Vec<ContextSummary>,
}

/// First node of each structured type plus every free-form context node.
#[derive(Default)]
struct Picked<'a> {
  audience: Option<Option<&'a AudienceProfile>>,
  voice: Option<Option<&'a BrandVoice>>,
  standards: Option<Option<&'a ContentStandards>>,
  message: Option<Option<&'a CoreMessage>>,
  legacy: Vec<&'a ContextData>,
}

impl<'a> Picked<'a> {
  fn from_nodes(nodes: &[&'a FlowNode]) -> Self {
    let mut p = Picked::default();
    for node in nodes {
      match &node.data {
        NodeData::AudienceProfile(d) => {
          p.audience.get_or_insert(d.profile.as_ref());
        }
        NodeData::BrandVoice(d) => {
          p.voice.get_or_insert(d.voice.as_ref());
        }
        NodeData::ContentStandards(d) => {
          p.standards.get_or_insert(d.standards.as_ref());
        }
        NodeData::CoreMessage(d) => {
          p.message.get_or_insert(d.message.as_ref());
        }
        NodeData::Context(d) => p.legacy.push(d),
        NodeData::Llm(_) | NodeData::Content(_) | NodeData::PromptView(_) => {}
      }
    }
    p
  }
}

/// Renders `nodes` (as returned by the collector) into a prompt. Pure and deterministic.
#[instrument(level = "trace", skip(nodes), fields(node_count = nodes.len()))]
pub fn assemble_prompt(nodes: &[&FlowNode]) -> AssembledPrompt {
  let picked = Picked::from_nodes(nodes);
  let mut prompt = String::from(PREAMBLE);
  let mut contexts = Vec::new();

  if let Some(profile) = picked.audience.flatten() {
    contexts.push(render_audience(&mut prompt, profile));
  }
  if let Some(voice) = picked.voice.flatten() {
    contexts.push(render_brand_voice(&mut prompt, voice));
  }
  if let Some(standards) = picked.standards.flatten() {
    contexts.push(render_standards(&mut prompt, standards));
  }
  if let Some(message) = picked.message.flatten().filter(|m| !m.message.is_empty()) {
    contexts.push(render_core_message(&mut prompt, message));
  }
  for entry in picked.legacy {
    let value = entry.value.trim();
    if value.is_empty() {
      continue;
    }
    let label = entry.context_type.label();
    prompt.push_str(&format!("{}: {}\n", label, value));
    contexts.push(ContextSummary::new(label, value));
  }

  if contexts.is_empty() {
    prompt.push_str(NO_CONTEXT);
  }
  prompt.push_str(CLOSING);

  AssembledPrompt {
    system_prompt: prompt,
    contexts,
  }
}

/// Collects from `target_id` and renders in one step.
pub fn prompt_for(graph: &FlowGraph, target_id: &str) -> AssembledPrompt {
  assemble_prompt(&graph.collect_context(target_id))
}

fn push_joined(out: &mut String, label: &str, items: &[String]) {
  if !items.is_empty() {
    out.push_str(&format!("{}: {}\n", label, items.join(", ")));
  }
}

fn push_bullets(out: &mut String, heading: &str, items: &[String]) {
  if items.is_empty() {
    return;
  }
  out.push_str(heading);
  for item in items {
    out.push_str(&format!("  - {}\n", item));
  }
}

fn render_audience(out: &mut String, profile: &AudienceProfile) -> ContextSummary {
  let demo = &profile.demographics;
  let psycho = &profile.psychographics;
  out.push_str("--- AUDIENCE PROFILE ---\n");
  out.push_str(&format!("Name: {}\n\n", profile.name));
  out.push_str("Demographics:\n");
  out.push_str(&format!("  Age: {}\n", demo.age_range));
  out.push_str(&format!("  Income: {}\n", demo.income));
  out.push_str(&format!("  Education: {}\n", demo.education));
  out.push_str(&format!("  Location: {}\n\n", demo.location));
  push_joined(out, "Values", &psycho.values);
  push_joined(out, "Interests", &psycho.interests);
  push_joined(out, "Pain Points", &psycho.pain_points);
  push_joined(out, "Goals", &psycho.goals);
  out.push_str(&format!(
    "\nCommunication Style: {}\n",
    profile.preferences.communication_style
  ));
  out.push_str(&format!(
    "Tech Savviness: {}\n\n",
    profile.preferences.tech_savviness
  ));
  ContextSummary::new("Audience", profile.name.clone())
}

fn render_brand_voice(out: &mut String, voice: &BrandVoice) -> ContextSummary {
  out.push_str("--- BRAND VOICE ---\n");
  push_joined(out, "Tone", &voice.tone);
  push_joined(out, "Style", &voice.style);
  if !voice.personality.is_empty() {
    out.push_str(&format!("\nPersonality: {}\n", voice.personality));
  }
  push_bullets(out, "\nDo:\n", &voice.dos);
  push_bullets(out, "\nDon't:\n", &voice.donts);
  if !voice.vocabulary.preferred.is_empty() {
    out.push('\n');
    push_joined(out, "Preferred Terms", &voice.vocabulary.preferred);
  }
  push_joined(out, "Avoided Terms", &voice.vocabulary.avoided);
  out.push('\n');
  ContextSummary::new("Brand Voice", voice.tone.join(", "))
}

fn render_standards(out: &mut String, standards: &ContentStandards) -> ContextSummary {
  out.push_str("--- CONTENT STANDARDS ---\n");
  push_bullets(out, "Compliance:\n", &standards.compliance_rules);
  push_bullets(out, "\nStyle Guide:\n", &standards.style_guide_rules);
  push_bullets(out, "\nAccessibility:\n", &standards.accessibility_requirements);
  push_bullets(out, "\nInclusivity:\n", &standards.inclusivity_guidelines);
  if standards.plain_language_requirements {
    out.push_str("\nPlain Language Required: Yes\n");
  }
  if let Some(level) = standards.max_reading_level {
    out.push_str(&format!("Maximum Reading Level: Grade {}\n", level));
  }
  out.push('\n');
  let value = match standards.max_reading_level {
    Some(level) => format!("Reading Level {}", level),
    None => "Reading Level not set".to_string(),
  };
  ContextSummary::new("Standards", value)
}

fn render_core_message(out: &mut String, message: &CoreMessage) -> ContextSummary {
  out.push_str("--- CORE MESSAGE ---\n");
  out.push_str(&format!("{}\n", message.message));
  if let Some(context) = message.context.as_deref().filter(|c| !c.is_empty()) {
    out.push_str(&format!("\nContext: {}\n", context));
  }
  out.push('\n');
  let short: String = message.message.chars().take(MESSAGE_SUMMARY_CHARS).collect();
  ContextSummary::new("Message", short)
}

/// Text a prompt view node should display.
///
/// Empty with no incoming edges. If a direct upstream node is an llm, the first such
/// llm (edge order) decides the prompt; otherwise the view collects from itself.
pub fn prompt_view_text(graph: &FlowGraph, view_id: &str) -> String {
  let incoming = graph.incoming_edges(view_id);
  if incoming.is_empty() {
    return String::new();
  }
  let llm_source = incoming
    .iter()
    .filter_map(|e| graph.node(&e.source))
    .find(|n| n.node_type() == NodeType::Llm);
  let target = llm_source.map(|n| n.id.as_str()).unwrap_or(view_id);
  prompt_for(graph, target).system_prompt
}

/// Recomputes the derived text of every prompt view in `graph`.
pub fn refresh_prompt_views(graph: &mut FlowGraph) {
  let updates: Vec<(String, String)> = graph
    .nodes()
    .iter()
    .filter(|n| n.node_type() == NodeType::PromptView)
    .map(|n| (n.id.clone(), prompt_view_text(graph, &n.id)))
    .collect();
  for (id, text) in updates {
    if let Some(NodeData::PromptView(view)) = graph.data_mut(&id) {
      view.prompt = text;
    }
  }
}
