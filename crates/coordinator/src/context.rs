//! Execution-context identity.
//!
//! Ownership of a shared model is tagged with an explicit [`ContextId`]
//! rather than ambient thread identity: the coordinator task runs inside its
//! context via a tokio task-local, and mutation entry points compare the
//! current id against the owner id. A task outside any context reads as
//! `None` and can never pass the owner check.

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for generating unique context IDs.
static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(1);

tokio::task_local! {
	static CURRENT_CONTEXT: ContextId;
}

/// Identity of one logical execution context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(u64);

impl ContextId {
	/// Allocates a fresh context ID.
	pub fn next() -> Self {
		Self(NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed))
	}

	/// Returns the context the current task is running in, if any.
	pub fn current() -> Option<Self> {
		CURRENT_CONTEXT.try_with(|id| *id).ok()
	}
}

impl fmt::Display for ContextId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "ctx-{}", self.0)
	}
}

/// Runs a future inside the given execution context.
pub async fn in_context<F>(id: ContextId, fut: F) -> F::Output
where
	F: Future,
{
	CURRENT_CONTEXT.scope(id, fut).await
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn current_is_none_outside_any_context() {
		assert_eq!(ContextId::current(), None);
	}

	#[tokio::test]
	async fn in_context_sets_and_restores_identity() {
		let id = ContextId::next();
		let seen = in_context(id, async { ContextId::current() }).await;
		assert_eq!(seen, Some(id));
		assert_eq!(ContextId::current(), None);
	}

	#[tokio::test]
	async fn contexts_nest_innermost_wins() {
		let outer = ContextId::next();
		let inner = ContextId::next();
		let (seen_inner, seen_outer) = in_context(outer, async {
			let seen_inner = in_context(inner, async { ContextId::current() }).await;
			(seen_inner, ContextId::current())
		})
		.await;
		assert_eq!(seen_inner, Some(inner));
		assert_eq!(seen_outer, Some(outer));
	}
}
