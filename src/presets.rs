//! Built-in configuration templates for the structured context nodes.
//!
//! Audience profiles and core-message examples are looked up by id; brand voices
//! and content standards by position.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde_json::json;

use crate::error::GraphError;
use crate::types::{
  AudiencePreferences, AudienceProfile, AudienceProfileData, BrandVoice, BrandVoiceData,
  ContentStandards, ContentStandardsData, CoreMessage, CoreMessageData, Demographics, FlowGraph,
  NodeData, NodeType, Psychographics, Vocabulary,
};

/// A ready-made core message with a title and a category.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageExample {
  pub id: &'static str,
  pub title: &'static str,
  pub kind: &'static str,
  pub message: CoreMessage,
}

fn strings(items: &[&str]) -> Vec<String> {
  items.iter().map(|s| s.to_string()).collect()
}

static AUDIENCE_PROFILES: Lazy<Vec<AudienceProfile>> = Lazy::new(|| {
  vec![
    AudienceProfile {
      id: "first-time-millennial".to_string(),
      name: "First-Time Millennial Buyer".to_string(),
      demographics: Demographics {
        age_range: "28-38".to_string(),
        income: "$50,000-$85,000".to_string(),
        education: "Bachelor's degree or higher".to_string(),
        location: "Suburban areas, 30-45 min from city center".to_string(),
      },
      psychographics: Psychographics {
        values: strings(&["Financial stability", "Work-life balance", "Community"]),
        interests: strings(&[
          "Home improvement DIY",
          "Smart home technology",
          "Sustainable living",
        ]),
        pain_points: strings(&[
          "Complex mortgage process",
          "Competitive market pressure",
          "Hidden costs and fees",
          "Limited inventory in desired areas",
        ]),
        goals: strings(&[
          "Build equity instead of renting",
          "Find affordable starter home",
          "Space for growing family",
          "Good school district",
        ]),
      },
      preferences: AudiencePreferences {
        communication_style: "Clear, educational, supportive".to_string(),
        tech_savviness: "High - mobile-first, expects seamless digital experience".to_string(),
        decision_making_factors: strings(&[
          "Price",
          "School district",
          "Commute time",
          "Future resale value",
        ]),
      },
      domain_specific: Some(BTreeMap::from([
        ("buyerType".to_string(), json!("first-time")),
        (
          "searchBehavior".to_string(),
          json!("Extensive research, saves many homes, compares neighborhoods"),
        ),
        (
          "primaryConcerns".to_string(),
          json!(["Affordability", "Future resale value", "Maintenance costs"]),
        ),
      ])),
    },
    AudienceProfile {
      id: "move-up-buyer".to_string(),
      name: "Move-Up Buyer (Gen X)".to_string(),
      demographics: Demographics {
        age_range: "45-55".to_string(),
        income: "$120,000-$200,000".to_string(),
        education: "Bachelor's or Master's degree".to_string(),
        location: "Established neighborhoods, suburban or urban".to_string(),
      },
      psychographics: Psychographics {
        values: strings(&["Quality", "Comfort", "Status", "Investment"]),
        interests: strings(&[
          "Home upgrades",
          "Entertaining",
          "Outdoor spaces",
          "Smart home features",
        ]),
        pain_points: strings(&[
          "Coordinating sale and purchase timing",
          "Market volatility concerns",
          "Finding the right upgrade features",
          "Downsizing vs upgrading decisions",
        ]),
        goals: strings(&[
          "More space for family needs",
          "Better location or amenities",
          "Investment growth",
          "Lifestyle improvement",
        ]),
      },
      preferences: AudiencePreferences {
        communication_style: "Professional, data-driven, respectful of their experience"
          .to_string(),
        tech_savviness: "Moderate to high - comfortable with digital tools".to_string(),
        decision_making_factors: strings(&[
          "ROI",
          "Amenities",
          "Neighborhood reputation",
          "Resale potential",
        ]),
      },
      domain_specific: Some(BTreeMap::from([
        ("buyerType".to_string(), json!("move-up")),
        (
          "searchBehavior".to_string(),
          json!("Targeted search with specific must-haves, compares value propositions"),
        ),
        (
          "primaryConcerns".to_string(),
          json!([
            "Timing the market",
            "Maximizing current home sale",
            "Quality upgrades"
          ]),
        ),
      ])),
    },
  ]
});

static BRAND_VOICES: Lazy<Vec<BrandVoice>> = Lazy::new(|| {
  vec![
    BrandVoice {
      tone: strings(&["Helpful", "Professional", "Approachable", "Trustworthy"]),
      style: strings(&["Clear", "Concise", "Action-oriented", "Empathetic"]),
      dos: strings(&[
        "Use simple, everyday language",
        "Be specific and actionable",
        "Show empathy for user situation",
        "Provide clear next steps",
        "Use active voice",
        "Highlight benefits over features",
      ]),
      donts: strings(&[
        "Use real estate jargon without explanation",
        "Be overly salesy or pushy",
        "Make assumptions about financial situation",
        "Use fear-based messaging",
        "Overwhelm with too many options",
        "Use vague or ambiguous language",
      ]),
      personality: "A knowledgeable, supportive guide who understands the emotional and practical aspects of home buying. We empower users with information while respecting their journey and decisions.".to_string(),
      vocabulary: Vocabulary {
        preferred: strings(&[
          "home",
          "explore",
          "discover",
          "save",
          "match",
          "opportunity",
          "find",
          "guide",
          "help",
          "recommend",
        ]),
        avoided: strings(&[
          "deal",
          "urgent",
          "miss out",
          "limited time",
          "exclusive",
          "act now",
          "once in a lifetime",
          "must see",
        ]),
      },
    },
    BrandVoice {
      tone: strings(&["Energetic", "Confident", "Modern", "Direct"]),
      style: strings(&["Bold", "Brief", "Punchy", "Benefit-focused"]),
      dos: strings(&[
        "Start with the benefit",
        "Use strong action verbs",
        "Keep it short and punchy",
        "Create sense of momentum",
        "Speak directly to the reader",
        "Use numbers and data points",
      ]),
      donts: strings(&[
        "Be long-winded",
        "Hedge or qualify excessively",
        "Use passive voice",
        "Bury the lead",
        "Use corporate speak",
        "Overcomplicate simple ideas",
      ]),
      personality: "A confident expert who cuts through the noise and delivers what you need to know. Direct, modern, and focused on results.".to_string(),
      vocabulary: Vocabulary {
        preferred: strings(&[
          "unlock",
          "power",
          "boost",
          "maximize",
          "transform",
          "results",
          "win",
          "advantage",
          "smart",
          "fast",
        ]),
        avoided: strings(&[
          "perhaps",
          "maybe",
          "consider",
          "might",
          "possibly",
          "we think",
          "sort of",
          "basically",
        ]),
      },
    },
    BrandVoice {
      tone: strings(&["Warm", "Friendly", "Conversational", "Encouraging"]),
      style: strings(&["Casual", "Relatable", "Storytelling", "Personal"]),
      dos: strings(&[
        "Use contractions (you're, we're, it's)",
        "Ask questions to engage",
        "Share relatable scenarios",
        "Celebrate small wins",
        "Use everyday analogies",
        "Be genuinely encouraging",
      ]),
      donts: strings(&[
        "Be too formal or stiff",
        "Use technical jargon",
        "Sound robotic or templated",
        "Lecture or talk down",
        "Be overly promotional",
        "Force humor",
      ]),
      personality: "A friendly neighbor who genuinely cares about your success. Approachable, understanding, and always ready with helpful advice.".to_string(),
      vocabulary: Vocabulary {
        preferred: strings(&[
          "you're",
          "we're",
          "let's",
          "check out",
          "take a look",
          "perfect for",
          "just right",
          "easy",
          "simple",
          "great",
        ]),
        avoided: strings(&[
          "utilize",
          "facilitate",
          "implement",
          "leverage",
          "synergy",
          "paradigm",
          "ecosystem",
          "solution",
        ]),
      },
    },
  ]
});

static CONTENT_STANDARDS: Lazy<Vec<ContentStandards>> = Lazy::new(|| {
  vec![
    ContentStandards {
      compliance_rules: strings(&[
        "Fair Housing Act compliance - no discriminatory language",
        "RESPA compliance - accurate mortgage information",
        "Truth in Advertising - no misleading claims",
        "Data privacy compliance - transparent data use",
        "ADA compliance for digital content",
      ]),
      style_guide_rules: strings(&[
        "Sentence length maximum 20 words",
        "One idea per sentence",
        "Active voice preferred",
        "Specific over general terms",
        "Numbers as numerals (3 beds, not three beds)",
        "Avoid double negatives",
        "Use parallel structure in lists",
      ]),
      accessibility_requirements: strings(&[
        "WCAG 2.1 AA compliant content",
        "Screen reader friendly formatting",
        "Clear heading hierarchy",
        "Descriptive link text (no \"click here\")",
        "Alt text for images when applicable",
        "Sufficient color contrast",
        "No reliance on color alone for meaning",
      ]),
      inclusivity_guidelines: strings(&[
        "Gender-neutral language",
        "Avoid assumptions about family structure",
        "Culturally sensitive terminology",
        "Economic situation neutral",
        "Accessibility-first language (avoid \"see\" or \"look\")",
        "Age-neutral language",
        "No assumptions about ability or disability",
      ]),
      plain_language_requirements: true,
      max_reading_level: Some(8),
    },
    ContentStandards {
      compliance_rules: strings(&[
        "Industry-specific regulatory compliance",
        "Brand guidelines adherence",
        "Legal disclaimer requirements",
        "Copyright and attribution standards",
      ]),
      style_guide_rules: strings(&[
        "Maintain consistent tone throughout",
        "Use AP Style for dates and numbers",
        "Oxford comma required",
        "Spell out acronyms on first use",
        "No exclamation points in body copy",
      ]),
      accessibility_requirements: strings(&[
        "WCAG 2.1 Level AAA where possible",
        "Captions for all video content",
        "Transcripts for audio content",
        "Keyboard navigation support",
        "Focus indicators visible",
      ]),
      inclusivity_guidelines: strings(&[
        "Use person-first language",
        "Avoid idioms that may not translate",
        "Consider global audience",
        "Avoid cultural assumptions",
        "Use \"they\" as singular pronoun",
      ]),
      plain_language_requirements: true,
      max_reading_level: Some(10),
    },
  ]
});

static MESSAGE_EXAMPLES: Lazy<Vec<MessageExample>> = Lazy::new(|| {
  vec![
    MessageExample {
      id: "search-expansion",
      title: "Search expansion",
      kind: "discovery",
      message: CoreMessage::new(
        "There are homes within your buyability that are being excluded in your saved search.",
        Some("User has a saved search with specific criteria that might be too restrictive"),
      ),
    },
    MessageExample {
      id: "price-drop",
      title: "Price drop alert",
      kind: "opportunity",
      message: CoreMessage::new(
        "A home you viewed last month just reduced its price by $15,000.",
        Some("Previously viewed property now more affordable"),
      ),
    },
    MessageExample {
      id: "new-listing",
      title: "New listing match",
      kind: "discovery",
      message: CoreMessage::new(
        "A new home that matches all your search criteria just hit the market.",
        Some("Fresh listing that fits user preferences perfectly"),
      ),
    },
    MessageExample {
      id: "showing-reminder",
      title: "Showing reminder",
      kind: "reminder",
      message: CoreMessage::new(
        "Your home showing is scheduled for tomorrow at 2 PM.",
        Some("Upcoming appointment reminder"),
      ),
    },
  ]
});

pub fn audience_profiles() -> &'static [AudienceProfile] {
  &AUDIENCE_PROFILES
}

pub fn audience_profile(id: &str) -> Option<&'static AudienceProfile> {
  AUDIENCE_PROFILES.iter().find(|p| p.id == id)
}

pub fn brand_voices() -> &'static [BrandVoice] {
  &BRAND_VOICES
}

pub fn brand_voice(index: usize) -> Option<&'static BrandVoice> {
  BRAND_VOICES.get(index)
}

pub fn content_standards() -> &'static [ContentStandards] {
  &CONTENT_STANDARDS
}

pub fn content_standard(index: usize) -> Option<&'static ContentStandards> {
  CONTENT_STANDARDS.get(index)
}

pub fn message_examples() -> &'static [MessageExample] {
  &MESSAGE_EXAMPLES
}

pub fn message_example(id: &str) -> Option<&'static MessageExample> {
  MESSAGE_EXAMPLES.iter().find(|m| m.id == id)
}

pub fn default_audience_profile() -> &'static AudienceProfile {
  &AUDIENCE_PROFILES[0]
}

pub fn default_brand_voice() -> &'static BrandVoice {
  &BRAND_VOICES[0]
}

pub fn default_content_standards() -> &'static ContentStandards {
  &CONTENT_STANDARDS[0]
}

/// Ids of the nodes in [demo_graph].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoIds {
  pub audience: String,
  pub brand_voice: String,
  pub standards: String,
  pub message: String,
  pub llm: String,
  pub content: String,
  pub prompt_view: String,
}

/// A starter graph: every structured context type feeds one llm, which feeds a
/// content node and a prompt view.
pub fn demo_graph() -> Result<(FlowGraph, DemoIds), GraphError> {
  let mut g = FlowGraph::new();
  let audience = g.add_node(NodeData::AudienceProfile(AudienceProfileData {
    selected_preset_id: Some(default_audience_profile().id.clone()),
    ..AudienceProfileData::with_profile(default_audience_profile().clone())
  }))?;
  let brand_voice = g.add_node(NodeData::BrandVoice(BrandVoiceData {
    selected_preset_id: Some("0".to_string()),
    ..BrandVoiceData::with_voice(default_brand_voice().clone())
  }))?;
  let standards = g.add_node(NodeData::ContentStandards(ContentStandardsData {
    selected_preset_id: Some("0".to_string()),
    ..ContentStandardsData::with_standards(default_content_standards().clone())
  }))?;
  let example = &MESSAGE_EXAMPLES[0];
  let message = g.add_node(NodeData::CoreMessage(CoreMessageData {
    selected_example_id: Some(example.id.to_string()),
    ..CoreMessageData::with_message(example.message.clone())
  }))?;
  let llm = g.add_default_node(NodeType::Llm)?;
  let content = g.add_default_node(NodeType::Content)?;
  let prompt_view = g.add_default_node(NodeType::PromptView)?;

  let edges = [
    (&audience, &llm),
    (&brand_voice, &llm),
    (&standards, &llm),
    (&message, &llm),
    (&llm, &content),
    (&llm, &prompt_view),
  ];
  for (source, target) in edges {
    g.connect(source, target)?;
  }

  Ok((
    g,
    DemoIds {
      audience,
      brand_voice,
      standards,
      message,
      llm,
      content,
      prompt_view,
    },
  ))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::prompt::prompt_for;
  use crate::types::ConfigStatus;

  #[test]
  fn lookups_by_id_and_index() {
    assert_eq!(
      audience_profile("move-up-buyer").unwrap().name,
      "Move-Up Buyer (Gen X)"
    );
    assert!(audience_profile("nobody").is_none());
    assert_eq!(brand_voice(2).unwrap().tone[0], "Warm");
    assert!(brand_voice(3).is_none());
    assert_eq!(content_standard(1).unwrap().max_reading_level, Some(10));
    assert_eq!(message_example("price-drop").unwrap().kind, "opportunity");
  }

  #[test]
  fn defaults_are_first_entries() {
    assert_eq!(default_audience_profile().id, "first-time-millennial");
    assert_eq!(default_brand_voice(), &brand_voices()[0]);
    assert_eq!(default_content_standards(), &content_standards()[0]);
  }

  #[test]
  fn preset_messages_count_as_configured() {
    assert!(message_examples().iter().all(|m| m.message.is_configured()));
  }

  #[test]
  fn demo_graph_is_fully_wired() {
    let (graph, ids) = demo_graph().unwrap();
    assert_eq!(graph.nodes().len(), 7);
    assert_eq!(graph.edges().len(), 6);
    for id in [&ids.audience, &ids.brand_voice, &ids.standards, &ids.message] {
      assert_eq!(graph.config_status(id), Some(ConfigStatus::Connected));
    }
    let prompt = prompt_for(&graph, &ids.llm);
    let kinds: Vec<&str> = prompt.contexts.iter().map(|c| c.kind.as_str()).collect();
    assert_eq!(kinds, vec!["Audience", "Brand Voice", "Standards", "Message"]);
    assert!(prompt.system_prompt.contains("Values: Financial stability, Work-life balance, Community\n"));
  }
}
