// halfpipe/examples/error_handling.rs

use halfpipe::{Context, Failure, FnStep, Pipeline, PipelineError};
use tracing::{error, info};

// 1. Define a custom application error type
#[derive(Debug, thiserror::Error)]
enum ExampleAppError {
  #[error("A custom application error occurred: {0}")]
  CustomError(String),

  #[error("Pipeline error: {0}")]
  Pipeline(#[from] PipelineError), // Lets the runner report cancellation in this type
}

fn recording_step(name: &'static str) -> FnStep<ExampleAppError> {
  FnStep::new(move |ctx: Context| async move {
    info!("Executing {}", name);
    let mut processed = ctx.value::<Vec<&str>>("processed").cloned().unwrap_or_default();
    processed.push(name);
    Ok(ctx.with_value("processed", processed))
  })
}

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();
  info!("--- Error Handling Example ---");

  info!("Scenario 1: a step returns a custom error");
  run_pipeline_with_step_error().await;

  info!("Scenario 2: registering a duplicate step id");
  register_duplicate_step();
}

async fn run_pipeline_with_step_error() {
  let mut pipeline = Pipeline::<ExampleAppError>::named("error_handling");
  pipeline.must_add_step("step_one", recording_step("step_one"));
  pipeline.must_add_step(
    "step_two_fails",
    FnStep::new(|ctx: Context| async move {
      info!("Executing step_two_fails - this will error");
      Err(Failure::new(
        ctx,
        ExampleAppError::CustomError("Something went wrong in step_two!".to_string()),
      ))
    }),
  );
  pipeline.must_add_step("step_three", recording_step("step_three")); // Should not run

  match pipeline.run(Context::new()).await {
    Ok(ctx) => error!("Pipeline unexpectedly succeeded: {:?}", ctx),
    Err(Failure { context, error }) => {
      info!("Pipeline failed as expected: {}", error);
      assert!(matches!(error, ExampleAppError::CustomError(_)));
      // The context up to the failing step is still available.
      let processed = context.value::<Vec<&str>>("processed").cloned().unwrap_or_default();
      info!("Steps processed before failure: {:?}", processed);
      assert_eq!(processed, vec!["step_one"]);
    }
  }
}

fn register_duplicate_step() {
  let mut pipeline = Pipeline::<ExampleAppError>::new();
  pipeline.must_add_step("load", recording_step("load"));
  match pipeline.add_step("load", recording_step("load_again")) {
    Ok(()) => error!("Duplicate step id was unexpectedly accepted"),
    Err(e) => {
      info!("Registration rejected as expected: {}", e);
      assert!(e.is_duplicate_step());
    }
  }
  assert_eq!(pipeline.steps(), ["load"]);
}
