// halfpipe/src/pipeline/definition.rs

//! Contains the `Pipeline<Err>` struct definition and the methods for
//! registering steps.

use crate::core::step::Step;
use crate::error::{PipelineError, PipelineResult};
use crate::registry::StepRegistry;
use std::fmt;

const DEFAULT_PIPELINE_NAME: &str = "pipeline";

/// A named, ordered collection of steps, generic over the error type `Err`
/// that its steps return.
///
/// `Err` must be `From<PipelineError>` so that `run` can report a cancellation
/// in the same error type the steps use. Errors returned by steps are passed
/// through untouched.
///
/// Steps can only be appended. Once the pipeline is built it is read-only and
/// can be run any number of times, including concurrently through `&self`.
pub struct Pipeline<Err = PipelineError>
where
  Err: std::error::Error + From<PipelineError> + Send + Sync + 'static,
{
  pub(crate) name: String,
  pub(crate) steps: StepRegistry<Box<dyn Step<Err>>>,
}

impl<Err> Pipeline<Err>
where
  Err: std::error::Error + From<PipelineError> + Send + Sync + 'static,
{
  /// Creates an empty pipeline.
  pub fn new() -> Self {
    Self::named(DEFAULT_PIPELINE_NAME)
  }

  /// Creates an empty pipeline with a name used in logs.
  pub fn named(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      steps: StepRegistry::new(),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  /// Appends `step` under `id`.
  ///
  /// Returns `PipelineError::DuplicateStep` if `id` is already registered; the
  /// pipeline is not modified in that case.
  pub fn add_step<S>(&mut self, id: impl Into<String>, step: S) -> PipelineResult<()>
  where
    S: Step<Err> + 'static,
  {
    self.steps.add(id, Box::new(step))
  }

  /// Like `add_step`, but panics on a duplicate id.
  ///
  /// Meant for static registration at startup, where a duplicate id is a
  /// programming error rather than something to recover from.
  pub fn must_add_step<S>(&mut self, id: impl Into<String>, step: S)
  where
    S: Step<Err> + 'static,
  {
    if let Err(err) = self.add_step(id, step) {
      panic!("halfpipe setup error in pipeline '{}': {}", self.name, err);
    }
  }

  /// Step ids in the order `run` will execute them.
  pub fn steps(&self) -> &[String] {
    self.steps.keys()
  }

  pub fn len(&self) -> usize {
    self.steps.len()
  }

  pub fn is_empty(&self) -> bool {
    self.steps.is_empty()
  }
}

impl<Err> Default for Pipeline<Err>
where
  Err: std::error::Error + From<PipelineError> + Send + Sync + 'static,
{
  fn default() -> Self {
    Self::new()
  }
}

impl<Err> fmt::Debug for Pipeline<Err>
where
  Err: std::error::Error + From<PipelineError> + Send + Sync + 'static,
{
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Pipeline")
      .field("name", &self.name)
      .field("steps", &self.steps.keys())
      .finish()
  }
}
