// halfpipe/src/lib.rs

//! Halfpipe: a minimal sequential pipeline runner.
//!
//! A `Pipeline` is a named, ordered collection of steps. Running it invokes
//! each step in registration order with an execution `Context`, hands the
//! context each step returns to the next one, and stops at the first error or
//! as soon as the context is observed to be cancelled between two steps.
//!
//!  - Steps implement the async `Step` trait, or wrap a closure in `FnStep`.
//!  - Step ids are unique; registration order is execution order.
//!  - `Context` is an immutable key-value carrier with cooperative
//!    cancellation, deadlines and caller-supplied cancellation causes.
//!  - A failed run still returns a context, paired with the error in `Failure`.
//!
//! ```ignore
//! let mut pipeline = Pipeline::<PipelineError>::named("greeting");
//! pipeline.must_add_step("hello", FnStep::new(|ctx: Context| async move {
//!   Ok(ctx.with_value("greeting", "hello"))
//! }));
//! let ctx = pipeline.run(Context::new()).await.map_err(Failure::into_error)?;
//! assert_eq!(ctx.value::<&str>("greeting"), Some(&"hello"));
//! ```

pub mod core;
pub mod error;
pub mod pipeline;
pub mod registry;

// --- Re-exports for the Public API ---

pub use crate::core::cancel::{CancelHandle, CancelReason};
pub use crate::core::context::Context;
pub use crate::core::outcome::{Failure, Outcome};
pub use crate::core::step::{FnStep, Step, StepFn};

pub use crate::pipeline::definition::Pipeline;
pub use crate::registry::StepRegistry;

pub use crate::error::{PipelineError, PipelineResult};
