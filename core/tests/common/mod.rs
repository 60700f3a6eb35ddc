// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use halfpipe::{Context, Failure, FnStep, PipelineError};
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};

// --- Common Error Type for Tests ---
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)] // Clone, PartialEq, Eq for assertions
pub enum TestError {
  #[error("Pipeline error: {0}")]
  Pipeline(String), // Store as String for Eq comparison

  #[error("{0}")]
  Step(String),
}

impl From<PipelineError> for TestError {
  fn from(pe: PipelineError) -> Self {
    TestError::Pipeline(pe.to_string())
  }
}

/// Key under which marker steps record the ids of the steps that ran.
pub const TRAIL_KEY: &str = "trail";

pub fn trail(ctx: &Context) -> Vec<String> {
  ctx.value::<Vec<String>>(TRAIL_KEY).cloned().unwrap_or_default()
}

// --- Common Step Creators ---

/// A step that appends `marker` to the trail and bumps `counter`.
pub fn marker_step(marker: &'static str, counter: Arc<AtomicUsize>) -> FnStep<TestError> {
  FnStep::new(move |ctx: Context| {
    let counter = counter.clone();
    async move {
      counter.fetch_add(1, Ordering::SeqCst);
      let mut markers = trail(&ctx);
      markers.push(marker.to_string());
      tracing::debug!(target: "test_steps", marker, "marker step executed, trail: {:?}", markers);
      Ok(ctx.with_value(TRAIL_KEY, markers))
    }
  })
}

/// A step that bumps `counter` and fails with `message`, returning the context it received.
pub fn failing_step(message: &'static str, counter: Arc<AtomicUsize>) -> FnStep<TestError> {
  FnStep::new(move |ctx: Context| {
    let counter = counter.clone();
    async move {
      counter.fetch_add(1, Ordering::SeqCst);
      tracing::warn!(target: "test_steps", "failing with: '{}'", message);
      Err(Failure::new(ctx, TestError::Step(message.to_string())))
    }
  })
}

/// A step that does nothing but count its invocations.
pub fn counting_step(counter: Arc<AtomicUsize>) -> FnStep<TestError> {
  FnStep::new(move |ctx: Context| {
    let counter = counter.clone();
    async move {
      counter.fetch_add(1, Ordering::SeqCst);
      Ok(ctx)
    }
  })
}

pub fn new_counter() -> Arc<AtomicUsize> {
  Arc::new(AtomicUsize::new(0))
}

pub fn count(counter: &Arc<AtomicUsize>) -> usize {
  counter.load(Ordering::SeqCst)
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Global counter for tests that exercise shared, process-wide side effects ---
pub static GLOBAL_STEP_COUNTER: Lazy<Arc<AtomicUsize>> = Lazy::new(|| Arc::new(AtomicUsize::new(0)));

pub fn reset_counters() {
  GLOBAL_STEP_COUNTER.store(0, Ordering::SeqCst);
}
