// halfpipe/examples/basic_pipeline.rs

use halfpipe::{Context, Failure, FnStep, Pipeline, PipelineError};
use tracing::info;

const COUNTER: &str = "counter";
const LOG: &str = "message_log";

// Reads the counter and log, applies `op` and returns the extended context.
fn arithmetic_step(label: &'static str, op: fn(i64) -> i64) -> FnStep<PipelineError> {
  FnStep::new(move |ctx: Context| async move {
    let counter = op(*ctx.value::<i64>(COUNTER).unwrap_or(&0));
    let mut log = ctx.value::<Vec<String>>(LOG).cloned().unwrap_or_default();
    let msg = format!("{} executed: counter = {}", label, counter);
    info!("{}", msg);
    log.push(msg);
    Ok(ctx.with_value(COUNTER, counter).with_value(LOG, log))
  })
}

#[tokio::main]
async fn main() -> Result<(), PipelineError> {
  // Initialize tracing (optional, for demonstration)
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Basic Pipeline Example ---");

  // 1. Create a pipeline and register its steps, in execution order
  let mut pipeline = Pipeline::<PipelineError>::named("basic");
  pipeline.must_add_step("step_alpha", arithmetic_step("Alpha", |n| n + 1));
  pipeline.must_add_step("step_beta", arithmetic_step("Beta", |n| n * 2));
  pipeline.must_add_step("step_gamma", arithmetic_step("Gamma", |n| n - 1));
  info!("Registered steps: {:?}", pipeline.steps());

  // 2. Create an initial context
  let initial = Context::new().with_value(COUNTER, 5_i64);

  // 3. Run the pipeline
  info!("Starting pipeline execution...");
  let final_ctx = pipeline.run(initial).await.map_err(Failure::into_error)?;

  // 4. Inspect the results
  let counter = *final_ctx.value::<i64>(COUNTER).unwrap_or(&0);
  info!("Final counter value: {}", counter);
  for entry in final_ctx.value::<Vec<String>>(LOG).into_iter().flatten() {
    info!("- {}", entry);
  }

  // Expected: (5+1)*2 - 1 = 11
  assert_eq!(counter, 11);
  Ok(())
}
