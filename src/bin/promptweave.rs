//! CLI: run the generation service, or work with the saved flow graph.
//!
//! Usage: `promptweave [OPTIONS] <COMMAND>`
//!
//! The graph snapshot lives at `<data-dir>/flow.json` and the session id at
//! `<data-dir>/session_id`.
//!
//! Set RUST_LOG=promptweave=trace for TRACE-level span enter/exit and events.

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use futures::StreamExt;
use promptweave::config::{AppConfig, DEFAULT_API_URL, DEFAULT_BIND, DEFAULT_DATA_DIR};
use promptweave::orchestrator::{GenerationBackend, GenerationOrchestrator, GenerationOutcome};
use promptweave::server::EvaluateRequest;
use promptweave::snapshot_io::{load_or_default, load_snapshot, save_snapshot};
use promptweave::sse::StreamEvent;
use promptweave::types::ModelParams;
use promptweave::{
  GraphStore, HttpGenerationClient, LocalBackend, ProviderRegistry, SessionId, presets, prompt,
  server, spawn_autosave,
};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

/// Compose UX-copy prompts from a flow graph and generate copy with an LLM.
#[derive(Parser, Debug)]
#[command(name = "promptweave")]
#[command(
  after_help = r#"Environment variables (override the matching flags when set):
  PROMPTWEAVE_BIND       Address for `serve` (default: 127.0.0.1:3001).
  PROMPTWEAVE_API_URL    Generation service used by `generate` and `providers`.
  PROMPTWEAVE_DATA_DIR   Directory holding flow.json and session_id.
  OPENAI_API_KEY         Enables the openai provider.
  ANTHROPIC_API_KEY      Enables the anthropic provider.
  OPENAI_BASE_URL, ANTHROPIC_BASE_URL   Override vendor endpoints.

Examples:
  promptweave init
  promptweave preview llm-5
  promptweave serve &
  promptweave generate llm-5"#
)]
struct Args {
  /// Directory for the graph snapshot and session id. Overridden by PROMPTWEAVE_DATA_DIR.
  #[arg(long, value_name = "DIR", default_value = DEFAULT_DATA_DIR)]
  data_dir: PathBuf,

  /// Generation service base URL. Overridden by PROMPTWEAVE_API_URL.
  #[arg(long, value_name = "URL", default_value = DEFAULT_API_URL)]
  api_url: String,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Run the generation service.
  Serve {
    /// Listen address. Overridden by PROMPTWEAVE_BIND.
    #[arg(long, value_name = "ADDR", default_value = DEFAULT_BIND)]
    bind: String,
  },
  /// Write a demo graph built from the presets.
  Init {
    /// Overwrite an existing snapshot.
    #[arg(long)]
    force: bool,
  },
  /// Print the prompt that would be sent for a node.
  Preview {
    #[arg(value_name = "NODE_ID")]
    node_id: String,
  },
  /// Generate copy for an llm node and store the result in the graph.
  Generate {
    #[arg(value_name = "NODE_ID")]
    node_id: String,
    /// Call providers in-process instead of going through the service.
    #[arg(long)]
    local: bool,
  },
  /// Review a piece of copy and stream the feedback.
  Evaluate {
    content: String,
    #[arg(long)]
    context: Option<String>,
    #[arg(long, default_value = "openai")]
    provider: String,
    #[arg(long, default_value = "gpt-4")]
    model: String,
  },
  /// List the providers the service offers.
  Providers {
    /// List the providers configured in this process instead.
    #[arg(long)]
    local: bool,
  },
}

fn fail(context: &str, e: impl std::fmt::Display) -> ! {
  eprintln!("{}: {}", context, e);
  process::exit(1);
}

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_span_events(FmtSpan::ENTER | FmtSpan::EXIT)
    .init();

  let args = Args::parse();

  // Env vars override flags.
  let mut config = AppConfig {
    data_dir: args.data_dir.clone(),
    api_url: args.api_url.clone(),
    ..AppConfig::default()
  };
  if let Command::Serve { bind } = &args.command {
    config.bind = bind.clone();
  }
  let config = config.with_env(|key| std::env::var(key).ok());
  info!(data_dir = %config.data_dir.display(), api_url = %config.api_url, "options (env or flags)");

  match args.command {
    Command::Serve { .. } => {
      let registry = ProviderRegistry::from_config(&config.providers);
      if registry.is_empty() {
        warn!("no provider configured; generation requests will be rejected");
      }
      if let Err(e) = server::serve(&config.bind, registry).await {
        fail("Server error", e);
      }
    }
    Command::Init { force } => init(&config, force),
    Command::Preview { node_id } => preview(&config, &node_id),
    Command::Generate { node_id, local } => generate(&config, &node_id, local).await,
    Command::Evaluate {
      content,
      context,
      provider,
      model,
    } => {
      let session = SessionId::load_or_create(&config.session_path())
        .unwrap_or_else(|e| fail("Error reading session id", e));
      let request = EvaluateRequest {
        session_id: session.to_string(),
        content,
        context,
        provider,
        model,
        params: ModelParams::default(),
      };
      let client = HttpGenerationClient::new(&config.api_url);
      let mut events = client
        .evaluate(request)
        .await
        .unwrap_or_else(|e| fail("Evaluation error", e));
      while let Some(event) = events.next().await {
        match event {
          StreamEvent::Chunk { content } => print!("{}", content),
          StreamEvent::Done => println!(),
          StreamEvent::Error { error } => fail("\nEvaluation error", error),
        }
      }
    }
    Command::Providers { local } => {
      let providers = if local {
        ProviderRegistry::from_config(&config.providers).list()
      } else {
        HttpGenerationClient::new(&config.api_url)
          .providers()
          .await
          .unwrap_or_else(|e| fail("Error listing providers", e))
      };
      if providers.is_empty() {
        println!("No providers configured.");
      }
      for p in providers {
        println!("{}: {}", p.name, p.models.join(", "));
      }
    }
  }
}

fn init(config: &AppConfig, force: bool) {
  let path = config.snapshot_path();
  if path.exists() && !force {
    fail(
      "Refusing to overwrite",
      format!("{} exists (use --force)", path.display()),
    );
  }
  let (graph, ids) = presets::demo_graph().unwrap_or_else(|e| fail("Error building demo graph", e));
  if let Err(e) = save_snapshot(&path, &graph) {
    fail("Error writing snapshot", e);
  }
  info!(path = %path.display(), nodes = graph.nodes().len(), "demo graph written");
  println!("Demo graph written to {}", path.display());
  println!("  llm node: {}", ids.llm);
  println!("  content node: {}", ids.content);
  println!("  prompt view: {}", ids.prompt_view);
}

fn preview(config: &AppConfig, node_id: &str) {
  let graph =
    load_snapshot(&config.snapshot_path()).unwrap_or_else(|e| fail("Error reading snapshot", e));
  if graph.node(node_id).is_none() {
    fail("Unknown node", node_id);
  }
  print!("{}", prompt::prompt_for(&graph, node_id).system_prompt);
}

async fn generate(config: &AppConfig, node_id: &str, local: bool) {
  let path = config.snapshot_path();
  let graph = load_or_default(&path).unwrap_or_else(|e| fail("Error reading snapshot", e));
  let session = SessionId::load_or_create(&config.session_path())
    .unwrap_or_else(|e| fail("Error reading session id", e));

  let backend: Arc<dyn GenerationBackend> = if local {
    Arc::new(LocalBackend::new(ProviderRegistry::from_config(
      &config.providers,
    )))
  } else {
    Arc::new(HttpGenerationClient::new(&config.api_url))
  };
  let store = GraphStore::new(graph);
  let autosave = spawn_autosave(&store, path.clone());
  let orchestrator = GenerationOrchestrator::new(session, backend, store.clone());

  let outcome = orchestrator
    .generate(node_id)
    .await
    .unwrap_or_else(|e| fail("Generation error", e));

  autosave.abort();
  if let Err(e) = save_snapshot(&path, &store.snapshot()) {
    fail("Error writing snapshot", e);
  }

  match outcome {
    GenerationOutcome::Completed { output, .. } => println!("{}", output),
    GenerationOutcome::Failed { reason } => fail("Generation failed", reason),
    GenerationOutcome::Superseded => fail("Generation superseded", node_id),
  }
}
