// tests/cancellation_tests.rs
mod common;

use common::*;
use halfpipe::{CancelHandle, CancelReason, Context, FnStep, Pipeline, PipelineError};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

#[tokio::test]
async fn test_pre_cancelled_context_runs_no_step() {
  setup_tracing();
  let counter = new_counter();
  let mut pipeline = Pipeline::<TestError>::new();
  pipeline.must_add_step("first", counting_step(counter.clone()));
  pipeline.must_add_step("second", counting_step(counter.clone()));

  let (ctx, cancel) = Context::new().with_cancel();
  cancel.cancel();

  let failure = pipeline.run(ctx.clone()).await.unwrap_err();
  assert_eq!(failure.error, TestError::Pipeline("context canceled".to_string()));
  assert!(Context::ptr_eq(&failure.context, &ctx));
  assert_eq!(count(&counter), 0);
}

#[tokio::test]
async fn test_cancelled_error_with_default_error_type() {
  setup_tracing();
  let mut pipeline = Pipeline::<PipelineError>::new();
  pipeline.must_add_step("noop", FnStep::new(|ctx: Context| async move { Ok(ctx) }));

  let (ctx, cancel) = Context::new().with_cancel();
  cancel.cancel_with("shutting down");

  let err = pipeline.run(ctx).await.unwrap_err().into_error();
  assert!(err.is_cancelled());
  assert_eq!(err.cancel_reason(), Some(&CancelReason::Cause("shutting down".to_string())));
  assert_eq!(err.to_string(), "context canceled: shutting down");
}

/// A step that cancels the run's context while it is executing.
fn cancelling_step(handle: Arc<Mutex<Option<CancelHandle>>>) -> FnStep<TestError> {
  FnStep::new(move |ctx: Context| {
    let handle = handle.clone();
    async move {
      if let Some(handle) = handle.lock().unwrap().as_ref() {
        handle.cancel();
      }
      Ok(ctx.with_value("cancelling_step_finished", true))
    }
  })
}

#[tokio::test]
async fn test_cancellation_during_step_stops_the_next_step() {
  setup_tracing();
  let slot = Arc::new(Mutex::new(None));
  let after = new_counter();
  let mut pipeline = Pipeline::<TestError>::new();
  pipeline.must_add_step("cancel", cancelling_step(slot.clone()));
  pipeline.must_add_step("after", counting_step(after.clone()));

  let (ctx, cancel) = Context::new().with_cancel();
  *slot.lock().unwrap() = Some(cancel);

  let failure = pipeline.run(ctx).await.unwrap_err();
  // The running step was allowed to finish and its context is returned.
  assert_eq!(failure.context.value::<bool>("cancelling_step_finished"), Some(&true));
  assert_eq!(failure.error, TestError::Pipeline("context canceled".to_string()));
  assert_eq!(count(&after), 0);
}

#[tokio::test]
async fn test_cancelling_after_last_step_still_completes() {
  setup_tracing();
  let slot = Arc::new(Mutex::new(None));
  let mut pipeline = Pipeline::<TestError>::new();
  pipeline.must_add_step("only", cancelling_step(slot.clone()));

  let (ctx, cancel) = Context::new().with_cancel();
  *slot.lock().unwrap() = Some(cancel);

  let ctx = pipeline.run(ctx).await.unwrap();
  assert!(ctx.is_cancelled());
}

#[tokio::test]
async fn test_expired_deadline_cancels_run() {
  setup_tracing();
  let counter = new_counter();
  let mut pipeline = Pipeline::<PipelineError>::new();
  let step_counter = counter.clone();
  pipeline.must_add_step(
    "late",
    FnStep::new(move |ctx: Context| {
      let counter = step_counter.clone();
      async move {
        counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Ok(ctx)
      }
    }),
  );

  let (ctx, _cancel) = Context::new().with_deadline(Instant::now() - Duration::from_millis(1));
  let err = pipeline.run(ctx).await.unwrap_err().into_error();
  assert_eq!(err.cancel_reason(), Some(&CancelReason::DeadlineExceeded));
  assert_eq!(count(&counter), 0);
}

#[tokio::test]
async fn test_timeout_elapsing_inside_a_step_stops_the_next() {
  setup_tracing();
  let after = new_counter();
  let mut pipeline = Pipeline::<TestError>::new();
  pipeline.must_add_step(
    "slow",
    FnStep::new(|ctx: Context| async move {
      tokio::time::sleep(Duration::from_millis(30)).await;
      Ok(ctx)
    }),
  );
  pipeline.must_add_step("after", counting_step(after.clone()));

  let (ctx, _cancel) = Context::new().with_timeout(Duration::from_millis(5));
  let failure = pipeline.run(ctx).await.unwrap_err();
  assert_eq!(
    failure.error,
    TestError::Pipeline("context deadline exceeded".to_string())
  );
  assert_eq!(count(&after), 0);
}

#[tokio::test]
async fn test_context_derived_by_a_step_stays_cancellable() {
  setup_tracing();
  let slot: Arc<Mutex<Option<CancelHandle>>> = Arc::new(Mutex::new(None));
  let after = new_counter();
  let mut pipeline = Pipeline::<TestError>::new();
  pipeline.must_add_step(
    "derive",
    FnStep::new(|ctx: Context| async move { Ok(ctx.with_value("derived", 1_u8)) }),
  );
  pipeline.must_add_step("cancel", cancelling_step(slot.clone()));
  pipeline.must_add_step("after", counting_step(after.clone()));

  let (ctx, cancel) = Context::new().with_cancel();
  *slot.lock().unwrap() = Some(cancel);

  let failure = pipeline.run(ctx).await.unwrap_err();
  assert_eq!(failure.context.value::<u8>("derived"), Some(&1));
  assert_eq!(count(&after), 0);
}
