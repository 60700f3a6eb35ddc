pub mod cancel;
pub mod context;
pub mod outcome;
pub mod step;

// Re-export key types for easier access from other modules (and lib.rs)
pub use cancel::{CancelHandle, CancelReason};
pub use context::Context;
pub use outcome::{Failure, Outcome};
pub use step::{FnStep, Step, StepFn};
