//! Shared state with read/write scopes.
//!
//! Any task may acquire a read scope; acquisition waits a bounded time for an
//! in-flight mutation to finish and then fails with
//! [`AccessError::ConcurrentMutation`]. Write scopes are gated on the owner
//! [`ContextId`] first, so a mutation attempted off the coordinator fails
//! with [`AccessError::WrongContext`] before touching the lock.
//!
//! A scope guarantees nothing beyond its own lifetime: references derived
//! inside one scope must be revalidated in the next.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::context::ContextId;
use crate::error::AccessError;

struct Inner<T> {
	owner: ContextId,
	read_wait: Duration,
	cell: RwLock<T>,
}

/// Cloneable handle to state owned by one coordinator context.
pub struct Shared<T> {
	inner: Arc<Inner<T>>,
}

impl<T> Clone for Shared<T> {
	fn clone(&self) -> Self {
		Self {
			inner: Arc::clone(&self.inner),
		}
	}
}

impl<T> std::fmt::Debug for Shared<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Shared")
			.field("owner", &self.inner.owner)
			.field("read_wait", &self.inner.read_wait)
			.finish_non_exhaustive()
	}
}

/// Scope granting shared read access until dropped.
pub struct ReadScope<'a, T> {
	guard: RwLockReadGuard<'a, T>,
}

impl<T> Deref for ReadScope<'_, T> {
	type Target = T;

	fn deref(&self) -> &T {
		&self.guard
	}
}

impl<T: std::fmt::Debug> std::fmt::Debug for ReadScope<'_, T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		self.guard.fmt(f)
	}
}

/// Scope granting exclusive write access until dropped.
pub struct WriteScope<'a, T> {
	guard: RwLockWriteGuard<'a, T>,
}

impl<T> Deref for WriteScope<'_, T> {
	type Target = T;

	fn deref(&self) -> &T {
		&self.guard
	}
}

impl<T> DerefMut for WriteScope<'_, T> {
	fn deref_mut(&mut self) -> &mut T {
		&mut self.guard
	}
}

impl<T: std::fmt::Debug> std::fmt::Debug for WriteScope<'_, T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		self.guard.fmt(f)
	}
}

impl<T: Send + Sync> Shared<T> {
	/// Wraps a value owned by the given context.
	pub fn new(value: T, owner: ContextId, read_wait: Duration) -> Self {
		Self {
			inner: Arc::new(Inner {
				owner,
				read_wait,
				cell: RwLock::new(value),
			}),
		}
	}

	/// Returns the owning context.
	pub fn owner(&self) -> ContextId {
		self.inner.owner
	}

	/// Returns the bounded wait applied to read acquisitions.
	pub fn read_wait(&self) -> Duration {
		self.inner.read_wait
	}

	/// Acquires a read scope, waiting at most the configured bound.
	///
	/// Read scopes overlap freely with each other; writer fairness comes
	/// from the underlying lock, so a waiting writer is not starved by a
	/// stream of new readers.
	///
	/// # Errors
	///
	/// [`AccessError::ConcurrentMutation`] when the bound elapses with a
	/// mutation still in flight.
	pub async fn read(&self) -> Result<ReadScope<'_, T>, AccessError> {
		let waited = self.inner.read_wait;
		match tokio::time::timeout(waited, self.inner.cell.read()).await {
			Ok(guard) => Ok(ReadScope { guard }),
			Err(_) => {
				tracing::warn!(owner = %self.inner.owner, ?waited, "shared.read.timeout");
				Err(AccessError::ConcurrentMutation { waited })
			}
		}
	}

	/// Acquires a read scope without waiting at all.
	///
	/// # Errors
	///
	/// [`AccessError::ConcurrentMutation`] when the lock is held exclusively
	/// right now.
	pub fn try_read(&self) -> Result<ReadScope<'_, T>, AccessError> {
		self.inner
			.cell
			.try_read()
			.map(|guard| ReadScope { guard })
			.map_err(|_| AccessError::ConcurrentMutation { waited: Duration::ZERO })
	}

	/// Acquires a write scope from the owner context.
	///
	/// Blocks until every outstanding read scope releases.
	///
	/// # Errors
	///
	/// [`AccessError::WrongContext`] when invoked from any other context; the
	/// failure has no side effect on the state.
	pub async fn write(&self) -> Result<WriteScope<'_, T>, AccessError> {
		let found = ContextId::current();
		if found != Some(self.inner.owner) {
			return Err(AccessError::WrongContext {
				expected: self.inner.owner,
				found,
			});
		}
		Ok(WriteScope {
			guard: self.inner.cell.write().await,
		})
	}
}
