// halfpipe/examples/cancellation.rs

use halfpipe::{Context, FnStep, Pipeline, PipelineError};
use std::time::Duration;
use tracing::info;

fn sleepy_step(name: &'static str, millis: u64) -> FnStep<PipelineError> {
  FnStep::new(move |ctx: Context| async move {
    info!("{} started", name);
    tokio::time::sleep(Duration::from_millis(millis)).await;
    info!("{} finished", name);
    Ok(ctx.with_value(name, true))
  })
}

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();
  info!("--- Cancellation Example ---");

  let mut pipeline = Pipeline::<PipelineError>::named("cancellation");
  pipeline.must_add_step("fetch", sleepy_step("fetch", 50));
  pipeline.must_add_step("transform", sleepy_step("transform", 50));
  pipeline.must_add_step("store", sleepy_step("store", 50));

  // Cancel from another task while "fetch" is still running. "fetch" is allowed
  // to finish; "transform" never starts.
  let (ctx, cancel) = Context::new().with_cancel();
  tokio::spawn(async move {
    tokio::time::sleep(Duration::from_millis(20)).await;
    cancel.cancel_with("operator requested shutdown");
  });

  match pipeline.run(ctx).await {
    Ok(_) => info!("Pipeline completed"),
    Err(failure) => {
      info!("Pipeline stopped: {}", failure.error);
      assert!(failure.error.is_cancelled());
      assert!(failure.context.contains_key("fetch"));
      assert!(!failure.context.contains_key("transform"));
    }
  }

  // A timeout behaves the same way, reported as a deadline.
  let (ctx, _cancel) = Context::new().with_timeout(Duration::from_millis(70));
  if let Err(failure) = pipeline.run(ctx).await {
    info!("Pipeline stopped: {}", failure.error);
  }
}
