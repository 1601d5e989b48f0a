//! Copy-on-write store for the flow graph.
//!
//! Readers get an `Arc<FlowGraph>` that never changes under them. Every mutation
//! clones the current graph, applies the edit, recomputes prompt views, and swaps
//! the new snapshot in, notifying subscribers.

use std::convert::Infallible;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

use crate::prompt::refresh_prompt_views;
use crate::snapshot_io::save_snapshot;
use crate::types::FlowGraph;

/// Shared handle to the current graph snapshot. Cloning shares the same store.
#[derive(Clone)]
pub struct GraphStore {
  tx: Arc<watch::Sender<Arc<FlowGraph>>>,
  write_lock: Arc<Mutex<()>>,
}

impl Default for GraphStore {
  fn default() -> Self {
    Self::new(FlowGraph::new())
  }
}

impl GraphStore {
  pub fn new(mut graph: FlowGraph) -> Self {
    refresh_prompt_views(&mut graph);
    let (tx, _rx) = watch::channel(Arc::new(graph));
    Self {
      tx: Arc::new(tx),
      write_lock: Arc::new(Mutex::new(())),
    }
  }

  /// Current snapshot.
  pub fn snapshot(&self) -> Arc<FlowGraph> {
    self.tx.borrow().clone()
  }

  /// Applies an infallible edit and publishes the result.
  pub fn update<R>(&self, f: impl FnOnce(&mut FlowGraph) -> R) -> R {
    match self.try_update(|g| Ok::<R, Infallible>(f(g))) {
      Ok(r) => r,
      Err(never) => match never {},
    }
  }

  /// Applies a fallible edit to a private copy. On `Err` the published snapshot
  /// is left untouched and subscribers are not notified.
  pub fn try_update<T, E>(&self, f: impl FnOnce(&mut FlowGraph) -> Result<T, E>) -> Result<T, E> {
    let _writer = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
    let mut next = FlowGraph::clone(&self.tx.borrow());
    let out = f(&mut next)?;
    refresh_prompt_views(&mut next);
    self.tx.send_replace(Arc::new(next));
    Ok(out)
  }

  /// Publishes an edit to generation state only (llm status, output, error, and
  /// content text). Those fields never feed a prompt, so prompt views are not
  /// recomputed.
  pub(crate) fn update_generation_state(&self, f: impl FnOnce(&mut FlowGraph)) {
    let _writer = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
    let mut next = FlowGraph::clone(&self.tx.borrow());
    f(&mut next);
    self.tx.send_replace(Arc::new(next));
  }

  /// Replaces the whole graph, e.g. after loading a snapshot.
  pub fn replace(&self, mut graph: FlowGraph) {
    let _writer = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
    refresh_prompt_views(&mut graph);
    self.tx.send_replace(Arc::new(graph));
  }

  pub fn subscribe(&self) -> watch::Receiver<Arc<FlowGraph>> {
    self.tx.subscribe()
  }
}

/// Writes the graph to `path` after every change. Empty graphs are not written,
/// so clearing the canvas never wipes the last saved snapshot.
///
/// The task ends when every handle to the store has been dropped.
#[instrument(level = "trace", skip(store))]
pub fn spawn_autosave(store: &GraphStore, path: PathBuf) -> JoinHandle<()> {
  let mut rx = store.subscribe();
  tokio::spawn(async move {
    while rx.changed().await.is_ok() {
      let graph = rx.borrow_and_update().clone();
      if graph.is_empty() {
        debug!("skipping autosave of empty graph");
        continue;
      }
      let target = path.clone();
      match tokio::task::spawn_blocking(move || save_snapshot(&target, &graph)).await {
        Ok(Ok(())) => debug!(path = %path.display(), "graph autosaved"),
        Ok(Err(e)) => warn!(path = %path.display(), error = %e, "autosave failed"),
        Err(e) => warn!(error = %e, "autosave task failed"),
      }
    }
  })
}
