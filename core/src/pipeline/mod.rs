// halfpipe/src/pipeline/mod.rs

//! Defines the `Pipeline` struct, step registration and execution.

pub mod definition;
pub mod execution;

// Re-export the main Pipeline struct
pub use definition::Pipeline;
