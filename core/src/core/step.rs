// halfpipe/src/core/step.rs

//! Defines the `Step` capability and `FnStep`, the adapter that turns a single
//! closure into a step.

use crate::core::context::Context;
use crate::core::outcome::Outcome;
use crate::error::PipelineError;
use async_trait::async_trait;
use std::future::Future;
use std::pin::Pin;

/// A unit of work that can be registered in a `Pipeline`.
///
/// A step receives the context produced by the previous step (or the initial
/// context) and returns the context for the next one. On failure it returns a
/// `Failure` holding its error and whatever context it wants the caller to see.
///
/// The runner awaits `run` to completion before starting the next step, so a
/// step never overlaps with another step of the same run.
#[async_trait]
pub trait Step<Err = PipelineError>: Send + Sync
where
  Err: Send + 'static,
{
  async fn run(&self, ctx: Context) -> Outcome<Err>;
}

/// Boxed form of the closure held by `FnStep`.
pub type StepFn<Err> = Box<dyn Fn(Context) -> Pin<Box<dyn Future<Output = Outcome<Err>> + Send>> + Send + Sync>;

/// A step whose whole behaviour is a single async closure.
///
/// ```ignore
/// let step = FnStep::new(|ctx: Context| async move {
///   Ok::<_, Failure<PipelineError>>(ctx.with_value("greeting", "hello"))
/// });
/// ```
pub struct FnStep<Err = PipelineError> {
  action: StepFn<Err>,
}

impl<Err> FnStep<Err>
where
  Err: Send + 'static,
{
  pub fn new<F, Fut>(action: F) -> Self
  where
    F: Fn(Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Outcome<Err>> + Send + 'static,
  {
    Self {
      action: Box::new(move |ctx| Box::pin(action(ctx))),
    }
  }
}

#[async_trait]
impl<Err> Step<Err> for FnStep<Err>
where
  Err: Send + 'static,
{
  async fn run(&self, ctx: Context) -> Outcome<Err> {
    (self.action)(ctx).await
  }
}

impl<Err> std::fmt::Debug for FnStep<Err> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("FnStep").finish_non_exhaustive()
  }
}
