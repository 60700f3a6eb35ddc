// halfpipe/src/core/context.rs

//! Defines `Context`, the immutable key-value carrier threaded through every step.
//!
//! A `Context` is a persistent structure: `with_value` and the cancellation
//! constructors return a new `Context` that links back to the receiver, which
//! itself never changes. Cloning is cheap (two `Arc` clones), so steps take
//! contexts by value and hand back whichever context the next step should see.

use crate::core::cancel::{CancelHandle, CancelReason, CancelSignal};
use std::any::Any;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

struct ValueNode {
  key: String,
  value: Arc<dyn Any + Send + Sync>,
  parent: Option<Arc<ValueNode>>,
}

/// Execution context for a pipeline run.
///
/// Carries typed values under string keys plus an optional cancellation signal.
/// The empty context (`Context::new()` or `Context::default()`) has no values
/// and can never be cancelled.
#[derive(Clone, Default)]
pub struct Context {
  values: Option<Arc<ValueNode>>,
  signal: Option<Arc<CancelSignal>>,
}

impl Context {
  pub fn new() -> Self {
    Self::default()
  }

  /// Returns a new context in which `key` maps to `value`. The receiver is unchanged.
  ///
  /// A later binding of the same key shadows the earlier one.
  pub fn with_value<V>(&self, key: impl Into<String>, value: V) -> Context
  where
    V: Any + Send + Sync,
  {
    Context {
      values: Some(Arc::new(ValueNode {
        key: key.into(),
        value: Arc::new(value),
        parent: self.values.clone(),
      })),
      signal: self.signal.clone(),
    }
  }

  /// Looks up the newest binding for `key`. Returns `None` if the key is absent
  /// or its value is not a `V`.
  pub fn value<V: Any>(&self, key: &str) -> Option<&V> {
    self.find(key).and_then(|node| node.value.downcast_ref::<V>())
  }

  pub fn contains_key(&self, key: &str) -> bool {
    self.find(key).is_some()
  }

  /// Visible keys, newest first. Shadowed bindings are listed once.
  pub fn keys(&self) -> Vec<&str> {
    let mut seen = HashSet::new();
    self
      .nodes()
      .filter(|node| seen.insert(node.key.as_str()))
      .map(|node| node.key.as_str())
      .collect()
  }

  /// Derives a cancellable context. Cancelling the returned handle cancels the
  /// new context and everything derived from it, never the receiver.
  pub fn with_cancel(&self) -> (Context, CancelHandle) {
    self.derive_signal(None)
  }

  /// Derives a context that reports `CancelReason::DeadlineExceeded` once
  /// `deadline` has passed. The handle allows cancelling it earlier.
  pub fn with_deadline(&self, deadline: Instant) -> (Context, CancelHandle) {
    self.derive_signal(Some(deadline))
  }

  /// Like `with_deadline(now + timeout)`. A timeout too large to represent as an
  /// `Instant` yields a cancellable context with no deadline.
  pub fn with_timeout(&self, timeout: Duration) -> (Context, CancelHandle) {
    match Instant::now().checked_add(timeout) {
      Some(deadline) => self.with_deadline(deadline),
      None => self.derive_signal(None),
    }
  }

  /// Earliest deadline that applies to this context, if any.
  pub fn deadline(&self) -> Option<Instant> {
    self.signal.as_ref().and_then(|signal| signal.deadline())
  }

  /// `Some(reason)` once this context, or any context it was derived from, has
  /// been cancelled or has passed its deadline.
  pub fn cancel_reason(&self) -> Option<CancelReason> {
    self.signal.as_ref().and_then(|signal| signal.reason())
  }

  pub fn is_cancelled(&self) -> bool {
    self.cancel_reason().is_some()
  }

  /// True when both contexts share the same value chain and the same signal,
  /// i.e. one is an unmodified clone of the other.
  pub fn ptr_eq(a: &Context, b: &Context) -> bool {
    fn same<T: ?Sized>(x: &Option<Arc<T>>, y: &Option<Arc<T>>) -> bool {
      match (x, y) {
        (Some(x), Some(y)) => Arc::ptr_eq(x, y),
        (None, None) => true,
        _ => false,
      }
    }
    same(&a.values, &b.values) && same(&a.signal, &b.signal)
  }

  fn derive_signal(&self, deadline: Option<Instant>) -> (Context, CancelHandle) {
    let signal = CancelSignal::new(self.signal.clone(), deadline);
    let ctx = Context {
      values: self.values.clone(),
      signal: Some(signal.clone()),
    };
    (ctx, CancelHandle::new(signal))
  }

  fn find(&self, key: &str) -> Option<&ValueNode> {
    self.nodes().find(|node| node.key == key)
  }

  fn nodes(&self) -> impl Iterator<Item = &ValueNode> {
    std::iter::successors(self.values.as_deref(), |node| node.parent.as_deref())
  }
}

impl fmt::Debug for Context {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Context")
      .field("keys", &self.keys())
      .field("cancel_reason", &self.cancel_reason())
      .field("deadline", &self.deadline())
      .finish()
  }
}
