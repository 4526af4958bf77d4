//! The coordinator task and its handle.
//!
//! One coordinator task owns mutation of one shared value. Hand-offs arrive
//! through a bounded mailbox and are applied in submission order inside write
//! scopes; readers elsewhere use [`CoordinatorHandle::read`] or a cloned
//! [`Shared`]. The coordinator never cancels submitted work on its own:
//! long-running workers poll [`CoordinatorHandle::cancellation`] at their own
//! granularity.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::class::TaskClass;
use crate::context::{ContextId, in_context};
use crate::error::{AccessError, SubmitError};
use crate::mailbox::{Mailbox, MailboxSender, OverflowPolicy, SendOutcome};
use crate::shared::{ReadScope, Shared};
use crate::spawn;

/// One queued mutation of the coordinated value.
type Handoff<T> = Box<dyn FnOnce(&mut T) + Send>;

/// Configuration for one coordinator.
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
	/// Hand-off queue capacity.
	pub mailbox_capacity: usize,
	/// Hand-off queue overflow policy.
	pub overflow: OverflowPolicy,
	/// Bounded wait applied to read scope acquisitions.
	pub read_wait: Duration,
}

impl Default for CoordinatorConfig {
	fn default() -> Self {
		Self {
			mailbox_capacity: 128,
			overflow: OverflowPolicy::Backpressure,
			read_wait: Duration::from_millis(100),
		}
	}
}

/// How to stop a coordinator.
#[derive(Debug, Clone, Copy)]
pub enum ShutdownMode {
	/// Close the mailbox, apply everything already queued, then stop.
	Graceful {
		/// Bound on waiting for the drain.
		timeout: Duration,
	},
	/// Cancel immediately; queued hand-offs are discarded.
	Immediate,
}

/// Summary of one coordinator shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShutdownReport {
	applied: u64,
	completed: bool,
}

impl ShutdownReport {
	/// Total hand-offs applied over the coordinator's lifetime.
	pub fn applied(&self) -> u64 {
		self.applied
	}

	/// True when the queue drained fully before the coordinator stopped.
	pub fn completed(&self) -> bool {
		self.completed
	}
}

/// Handle to one running coordinator.
pub struct CoordinatorHandle<T> {
	name: Arc<str>,
	context: ContextId,
	shared: Shared<T>,
	sender: MailboxSender<Handoff<T>>,
	cancel: CancellationToken,
	join: Arc<Mutex<Option<JoinHandle<u64>>>>,
}

impl<T> Clone for CoordinatorHandle<T> {
	fn clone(&self) -> Self {
		Self {
			name: Arc::clone(&self.name),
			context: self.context,
			shared: self.shared.clone(),
			sender: self.sender.clone(),
			cancel: self.cancel.clone(),
			join: Arc::clone(&self.join),
		}
	}
}

impl<T> std::fmt::Debug for CoordinatorHandle<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("CoordinatorHandle")
			.field("name", &self.name)
			.field("context", &self.context)
			.finish_non_exhaustive()
	}
}

/// Spawns a coordinator task owning `value`.
pub fn spawn_coordinator<T>(name: impl Into<String>, value: T, config: CoordinatorConfig) -> CoordinatorHandle<T>
where
	T: Send + Sync + 'static,
{
	let name: Arc<str> = name.into().into();
	let context = ContextId::next();
	let shared = Shared::new(value, context, config.read_wait);
	let (sender, mut receiver) = Mailbox::<Handoff<T>>::new(config.mailbox_capacity, config.overflow).split();
	let cancel = CancellationToken::new();

	let loop_name = Arc::clone(&name);
	let loop_shared = shared.clone();
	let loop_cancel = cancel.clone();
	let join = spawn::spawn(
		TaskClass::Interactive,
		in_context(context, async move {
			tracing::debug!(coordinator = %loop_name, %context, "coordinator.started");
			let mut applied = 0u64;
			loop {
				tokio::select! {
					// Cancellation preempts queued work: once cancelled,
					// no further hand-off is applied.
					biased;
					_ = loop_cancel.cancelled() => {
						tracing::debug!(coordinator = %loop_name, applied, "coordinator.cancelled");
						break;
					}
					handoff = receiver.recv() => match handoff {
						Some(handoff) => match loop_shared.write().await {
							Ok(mut scope) => {
								handoff(&mut *scope);
								applied += 1;
							}
							// The loop runs inside the owner context, so the
							// gate cannot reject it; bail rather than spin.
							Err(err) => {
								tracing::error!(coordinator = %loop_name, error = %err, "coordinator.write_denied");
								break;
							}
						},
						None => {
							tracing::debug!(coordinator = %loop_name, applied, "coordinator.drained");
							break;
						}
					}
				}
			}
			// Queued hand-offs own their reply channels; dropping them here
			// resolves every pending `apply` with `SubmitError::Closed`.
			let dropped = receiver.drain_pending().await;
			if dropped > 0 {
				tracing::debug!(coordinator = %loop_name, dropped, "coordinator.dropped_queued");
			}
			applied
		}),
	);

	CoordinatorHandle {
		name,
		context,
		shared,
		sender,
		cancel,
		join: Arc::new(Mutex::new(Some(join))),
	}
}

impl<T: Send + Sync + 'static> CoordinatorHandle<T> {
	/// Returns the coordinator's name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Returns the coordinator's execution context.
	pub fn context(&self) -> ContextId {
		self.context
	}

	/// Returns a handle for read access from any task.
	pub fn shared(&self) -> Shared<T> {
		self.shared.clone()
	}

	/// Acquires a read scope on the coordinated value.
	///
	/// # Errors
	///
	/// [`AccessError::ConcurrentMutation`] when the bounded wait elapses.
	pub async fn read(&self) -> Result<ReadScope<'_, T>, AccessError> {
		self.shared.read().await
	}

	/// Submits a mutation hand-off; applied in submission order.
	///
	/// # Errors
	///
	/// [`SubmitError::Closed`] after shutdown.
	pub async fn submit<F>(&self, f: F) -> Result<SendOutcome, SubmitError>
	where
		F: FnOnce(&mut T) + Send + 'static,
	{
		self.sender.send(Box::new(f)).await
	}

	/// Non-blocking submit.
	///
	/// # Errors
	///
	/// [`SubmitError::Full`] when the queue is at capacity under
	/// backpressure, [`SubmitError::Closed`] after shutdown.
	pub async fn try_submit<F>(&self, f: F) -> Result<SendOutcome, SubmitError>
	where
		F: FnOnce(&mut T) + Send + 'static,
	{
		self.sender.try_send(Box::new(f)).await
	}

	/// Submits a mutation and awaits its result.
	///
	/// # Errors
	///
	/// [`SubmitError::Closed`] when the coordinator stops before applying it.
	pub async fn apply<F, R>(&self, f: F) -> Result<R, SubmitError>
	where
		F: FnOnce(&mut T) -> R + Send + 'static,
		R: Send + 'static,
	{
		let (tx, rx) = tokio::sync::oneshot::channel();
		self.submit(move |value| {
			let _ = tx.send(f(value));
		})
		.await?;
		rx.await.map_err(|_| SubmitError::Closed)
	}

	/// Returns a child cancellation token for long-running worker use.
	pub fn cancellation(&self) -> CancellationToken {
		self.cancel.child_token()
	}

	/// Requests immediate cancellation of the coordinator loop.
	pub fn cancel(&self) {
		self.cancel.cancel();
	}

	/// Returns the number of queued hand-offs.
	pub async fn pending(&self) -> usize {
		self.sender.len().await
	}

	/// Stops the coordinator and reports what was applied.
	///
	/// A second shutdown of the same coordinator reports zero work and
	/// `completed() == false`.
	pub async fn shutdown(&self, mode: ShutdownMode) -> ShutdownReport {
		let join = self.join.lock().await.take();
		let Some(mut join) = join else {
			return ShutdownReport {
				applied: 0,
				completed: false,
			};
		};

		match mode {
			ShutdownMode::Graceful { timeout } => {
				self.sender.close().await;
				match tokio::time::timeout(timeout, &mut join).await {
					Ok(Ok(applied)) => ShutdownReport { applied, completed: true },
					Ok(Err(err)) => {
						tracing::error!(coordinator = %self.name, error = %err, "coordinator.join_failed");
						ShutdownReport {
							applied: 0,
							completed: false,
						}
					}
					Err(_) => {
						tracing::warn!(coordinator = %self.name, ?timeout, "coordinator.drain_timeout");
						self.cancel.cancel();
						let applied = join.await.unwrap_or_default();
						ShutdownReport { applied, completed: false }
					}
				}
			}
			ShutdownMode::Immediate => {
				self.cancel.cancel();
				self.sender.close().await;
				let applied = join.await.unwrap_or_default();
				ShutdownReport { applied, completed: false }
			}
		}
	}
}
