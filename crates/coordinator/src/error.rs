//! Access and submission error types.

use std::time::Duration;

use thiserror::Error;

use crate::context::ContextId;

/// Errors establishing an access scope over shared state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessError {
	/// A mutation was attempted off the owner context. Fatal for the
	/// attempted operation; never retried, and has no side effect.
	#[error("write attempted outside owner context (expected {expected}, found {found:?})")]
	WrongContext {
		/// The context that owns mutation of this state.
		expected: ContextId,
		/// The context the attempt ran in, if any.
		found: Option<ContextId>,
	},

	/// A read scope could not be established within the bounded wait because
	/// a mutation is in flight. Callers retry with backoff or abandon.
	#[error("read scope unavailable after {waited:?}: mutation in progress")]
	ConcurrentMutation {
		/// How long the acquisition waited before giving up.
		waited: Duration,
	},
}

/// Errors submitting a hand-off to the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitError {
	/// The coordinator mailbox is closed.
	#[error("coordinator mailbox is closed")]
	Closed,
	/// The mailbox is full and the send was non-blocking.
	#[error("coordinator mailbox is full")]
	Full,
}
