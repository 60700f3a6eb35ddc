// halfpipe/src/registry.rs

//! Defines `StepRegistry<V>`, an append-only map from step id to value that
//! remembers insertion order and refuses duplicate ids.
//!
//! Lookups go through a `HashMap`; iteration order comes from a separate `Vec`
//! of ids. Both are private, so the duplicate and ordering guarantees cannot be
//! bypassed from outside this module.

use crate::error::{PipelineError, PipelineResult};
use std::collections::HashMap;
use std::fmt;
use tracing::{event, Level};

pub struct StepRegistry<V> {
  keys: Vec<String>,
  entries: HashMap<String, V>,
}

impl<V> StepRegistry<V> {
  /// Creates a new, empty registry.
  pub fn new() -> Self {
    Self {
      keys: Vec::new(),
      entries: HashMap::new(),
    }
  }

  /// Appends `value` under `id`.
  ///
  /// Fails with `PipelineError::DuplicateStep` if `id` is already present, in
  /// which case the registry is left exactly as it was.
  pub fn add(&mut self, id: impl Into<String>, value: V) -> PipelineResult<()> {
    let id = id.into();
    if self.entries.contains_key(&id) {
      event!(Level::WARN, step_id = %id, "Rejected duplicate step id.");
      return Err(PipelineError::DuplicateStep { step_id: id });
    }
    event!(Level::TRACE, step_id = %id, position = self.keys.len(), "Registered step.");
    self.keys.push(id.clone());
    self.entries.insert(id, value);
    Ok(())
  }

  /// Ids in insertion order.
  pub fn keys(&self) -> &[String] {
    &self.keys
  }

  pub fn get(&self, id: &str) -> Option<&V> {
    self.entries.get(id)
  }

  pub fn contains(&self, id: &str) -> bool {
    self.entries.contains_key(id)
  }

  /// `(id, value)` pairs in insertion order.
  pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
    self
      .keys
      .iter()
      .filter_map(move |id| self.entries.get(id).map(|value| (id.as_str(), value)))
  }

  pub fn len(&self) -> usize {
    self.keys.len()
  }

  pub fn is_empty(&self) -> bool {
    self.keys.is_empty()
  }
}

impl<V> Default for StepRegistry<V> {
  fn default() -> Self {
    Self::new()
  }
}

impl<V> fmt::Debug for StepRegistry<V> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("StepRegistry").field("keys", &self.keys).finish()
  }
}
