// halfpipe/src/core/outcome.rs

//! The result of running a step or a whole pipeline.

use crate::core::context::Context;
use std::fmt;

/// Result of a step invocation or of `Pipeline::run`.
///
/// `Ok` carries the context to hand to the next step. `Err` carries the error
/// together with the context at the point of failure, so a context is always
/// returned.
pub type Outcome<Err> = Result<Context, Failure<Err>>;

/// An error paired with the context that was current when it happened.
pub struct Failure<Err> {
  pub context: Context,
  pub error: Err,
}

impl<Err> Failure<Err> {
  pub fn new(context: Context, error: Err) -> Self {
    Self { context, error }
  }

  pub fn context(&self) -> &Context {
    &self.context
  }

  pub fn error(&self) -> &Err {
    &self.error
  }

  pub fn into_error(self) -> Err {
    self.error
  }

  pub fn into_parts(self) -> (Context, Err) {
    (self.context, self.error)
  }
}

impl Context {
  /// Pairs this context with `error`, for returning `Err(ctx.fail(e))` from a step.
  pub fn fail<Err>(self, error: impl Into<Err>) -> Failure<Err> {
    Failure::new(self, error.into())
  }
}

impl<Err: fmt::Debug> fmt::Debug for Failure<Err> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Failure")
      .field("error", &self.error)
      .field("context", &self.context)
      .finish()
  }
}

impl<Err: fmt::Display> fmt::Display for Failure<Err> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt::Display::fmt(&self.error, f)
  }
}
