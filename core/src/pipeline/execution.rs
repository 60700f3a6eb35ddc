// halfpipe/src/pipeline/execution.rs

//! Contains `Pipeline::run()`, which executes the registered steps in order.

use crate::core::context::Context;
use crate::core::outcome::{Failure, Outcome};
use crate::error::PipelineError;
use crate::pipeline::definition::Pipeline;
use tracing::{event, instrument, Instrument, Level};

impl<Err> Pipeline<Err>
where
  Err: std::error::Error + From<PipelineError> + Send + Sync + 'static,
{
  /// Executes every step in registration order, threading the context from
  /// one step into the next.
  ///
  /// Before each step the current context is checked for cancellation; if it
  /// is cancelled the run stops with `PipelineError::Cancelled` (converted into
  /// `Err`) and the context as it was at that point. A step already running is
  /// never interrupted.
  ///
  /// The first step that fails ends the run. Its `Failure` is returned exactly
  /// as the step produced it and no later step runs.
  ///
  /// With no steps, the input context is returned as is (cancelled or not).
  #[instrument(
        name = "Pipeline::run",
        skip_all,
        fields(
            pipeline = %self.name,
            pipeline_error_type = %std::any::type_name::<Err>(),
            num_steps = self.steps.len(),
        )
    )]
  pub async fn run(&self, ctx: Context) -> Outcome<Err> {
    event!(Level::DEBUG, "Pipeline execution starting.");

    let mut ctx = ctx;
    for (step_idx, (step_id, step)) in self.steps.iter().enumerate() {
      if let Some(reason) = ctx.cancel_reason() {
        event!(Level::INFO, step_id, step_index = step_idx, %reason, "Pipeline cancelled before step.");
        return Err(Failure::new(ctx, Err::from(PipelineError::Cancelled { reason })));
      }

      let step_span = tracing::info_span!("pipeline_step_execution", step_id, step_index = step_idx);
      ctx = match step.run(ctx).instrument(step_span.clone()).await {
        Ok(next_ctx) => next_ctx,
        Err(failure) => {
          step_span.in_scope(|| event!(Level::ERROR, error = %failure.error, "Step failed."));
          return Err(failure);
        }
      };
      step_span.in_scope(|| event!(Level::DEBUG, "Step finished successfully."));
    }

    event!(Level::DEBUG, "Pipeline execution completed successfully.");
    Ok(ctx)
  }
}
