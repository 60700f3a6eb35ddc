// halfpipe/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

use crate::core::cancel::CancelReason;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("duplicate id for step: {step_id}")]
    DuplicateStep { step_id: String },

    /// Raised by the runner when the context was cancelled before a step started.
    #[error("{reason}")]
    Cancelled { reason: CancelReason },

    #[error("{source}")]
    StepFailure {
        #[source]
        source: AnyhowError,
    },
}

impl PipelineError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, PipelineError::Cancelled { .. })
    }

    pub fn is_duplicate_step(&self) -> bool {
        matches!(self, PipelineError::DuplicateStep { .. })
    }

    /// The cancellation reason, if this error came from an observed cancellation.
    pub fn cancel_reason(&self) -> Option<&CancelReason> {
        match self {
            PipelineError::Cancelled { reason } => Some(reason),
            _ => None,
        }
    }
}

// Lets steps using the default error type write `anyhow` code and `?` freely.
impl From<AnyhowError> for PipelineError {
    fn from(err: AnyhowError) -> Self {
        // Don't bury a PipelineError that was already bubbled through anyhow.
        match err.downcast::<PipelineError>() {
            Ok(pipeline_err) => pipeline_err,
            Err(err) => PipelineError::StepFailure { source: err },
        }
    }
}

impl From<CancelReason> for PipelineError {
    fn from(reason: CancelReason) -> Self {
        PipelineError::Cancelled { reason }
    }
}

pub type PipelineResult<T, E = PipelineError> = std::result::Result<T, E>;
