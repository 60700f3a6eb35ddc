// halfpipe/src/core/cancel.rs

//! Cooperative cancellation for execution contexts.
//!
//! A `CancelSignal` is a node in a parent-linked chain. A context observes
//! cancellation when any node in its chain has been cancelled or has passed its
//! deadline, so cancelling a parent reaches every context derived from it while
//! cancelling a child leaves the parent untouched.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

/// Why a context stopped being live.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CancelReason {
  #[error("context canceled")]
  Cancelled,
  #[error("context deadline exceeded")]
  DeadlineExceeded,
  /// Cancelled with a caller-supplied cause.
  #[error("context canceled: {0}")]
  Cause(String),
}

#[derive(Debug)]
pub(crate) struct CancelSignal {
  reason: Mutex<Option<CancelReason>>,
  deadline: Option<Instant>,
  parent: Option<Arc<CancelSignal>>,
}

impl CancelSignal {
  pub(crate) fn new(parent: Option<Arc<CancelSignal>>, deadline: Option<Instant>) -> Arc<Self> {
    Arc::new(CancelSignal {
      reason: Mutex::new(None),
      deadline,
      parent,
    })
  }

  /// Records `reason` unless the signal was already cancelled. Returns true if
  /// this call performed the cancellation.
  fn cancel(&self, reason: CancelReason) -> bool {
    let mut slot = self.reason.lock();
    if slot.is_some() {
      return false;
    }
    *slot = Some(reason);
    true
  }

  /// Walks the chain from this node towards the root and returns the first
  /// reason found.
  pub(crate) fn reason(&self) -> Option<CancelReason> {
    let now = Instant::now();
    let mut current = Some(self);
    while let Some(signal) = current {
      if let Some(reason) = signal.reason.lock().clone() {
        return Some(reason);
      }
      if signal.deadline.map_or(false, |deadline| now >= deadline) {
        return Some(CancelReason::DeadlineExceeded);
      }
      current = signal.parent.as_deref();
    }
    None
  }

  /// Earliest deadline anywhere in the chain.
  pub(crate) fn deadline(&self) -> Option<Instant> {
    let mut earliest: Option<Instant> = None;
    let mut current = Some(self);
    while let Some(signal) = current {
      if let Some(deadline) = signal.deadline {
        earliest = Some(earliest.map_or(deadline, |e| e.min(deadline)));
      }
      current = signal.parent.as_deref();
    }
    earliest
  }
}

/// Caller-side handle that cancels the context it was created with (and every
/// context later derived from that one).
///
/// Dropping the handle does not cancel anything.
#[derive(Debug, Clone)]
pub struct CancelHandle {
  signal: Arc<CancelSignal>,
}

impl CancelHandle {
  pub(crate) fn new(signal: Arc<CancelSignal>) -> Self {
    Self { signal }
  }

  /// Cancels with `CancelReason::Cancelled`. Idempotent.
  pub fn cancel(&self) {
    if self.signal.cancel(CancelReason::Cancelled) {
      tracing::debug!("Context cancelled.");
    }
  }

  /// Cancels with a caller-supplied cause. Only the first cancellation's reason is kept.
  pub fn cancel_with(&self, cause: impl Into<String>) {
    let cause = cause.into();
    if self.signal.cancel(CancelReason::Cause(cause.clone())) {
      tracing::debug!(%cause, "Context cancelled with cause.");
    }
  }

  pub fn is_cancelled(&self) -> bool {
    self.signal.reason().is_some()
  }
}
