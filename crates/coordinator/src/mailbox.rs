//! Bounded single-consumer hand-off mailbox.
//!
//! Hand-offs are drained by exactly one receiver (the coordinator task), in
//! submission order. Overflow behavior is a policy choice: backpressure the
//! sender, drop the newest submission, or keep only the latest one.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::{Mutex, Notify};

use crate::error::SubmitError;

/// Overflow policy for a bounded mailbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverflowPolicy {
	/// Wait for capacity when full. The only policy that never drops, and
	/// the default for coordinator hand-offs.
	Backpressure,
	/// Drop the newest message when full.
	DropNewest,
	/// Keep only the latest message.
	LatestWins,
}

/// Outcome from enqueueing a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
	/// Message was enqueued without replacement.
	Enqueued,
	/// Message was dropped because policy is drop-newest and the queue was full.
	DroppedNewest,
	/// Queued messages were replaced by this one.
	ReplacedQueue,
}

struct State<T> {
	queue: VecDeque<T>,
	closed: bool,
}

struct Inner<T> {
	capacity: usize,
	policy: OverflowPolicy,
	state: Mutex<State<T>>,
	notify_recv: Notify,
	notify_send: Notify,
}

/// Bounded mailbox; split into a sender and the single receiver.
pub struct Mailbox<T> {
	inner: Arc<Inner<T>>,
}

/// Multi-producer mailbox sender.
pub struct MailboxSender<T> {
	inner: Arc<Inner<T>>,
}

/// The single mailbox receiver.
pub struct MailboxReceiver<T> {
	inner: Arc<Inner<T>>,
}

impl<T> Clone for MailboxSender<T> {
	fn clone(&self) -> Self {
		Self {
			inner: Arc::clone(&self.inner),
		}
	}
}

impl<T> Mailbox<T> {
	/// Creates a bounded mailbox.
	///
	/// # Panics
	///
	/// Panics if `capacity` is zero.
	pub fn new(capacity: usize, policy: OverflowPolicy) -> Self {
		assert!(capacity > 0, "mailbox capacity must be > 0");
		Self {
			inner: Arc::new(Inner {
				capacity,
				policy,
				state: Mutex::new(State {
					queue: VecDeque::with_capacity(capacity),
					closed: false,
				}),
				notify_recv: Notify::new(),
				notify_send: Notify::new(),
			}),
		}
	}

	/// Splits into a cloneable sender and the single receiver.
	pub fn split(self) -> (MailboxSender<T>, MailboxReceiver<T>) {
		let sender = MailboxSender {
			inner: Arc::clone(&self.inner),
		};
		let receiver = MailboxReceiver { inner: self.inner };
		(sender, receiver)
	}
}

impl<T> MailboxSender<T> {
	/// Requests mailbox closure. The receiver drains existing items then
	/// observes `None`.
	pub async fn close(&self) {
		let mut state = self.inner.state.lock().await;
		state.closed = true;
		drop(state);
		self.inner.notify_recv.notify_waiters();
		self.inner.notify_send.notify_waiters();
	}

	/// Non-blocking enqueue. Under `Backpressure` a full queue reports
	/// [`SubmitError::Full`] instead of waiting.
	pub async fn try_send(&self, msg: T) -> Result<SendOutcome, SubmitError> {
		let mut state = self.inner.state.lock().await;
		enqueue_with_policy(&self.inner, &mut state, msg)
	}

	/// Enqueue honoring policy (`Backpressure` waits for capacity).
	pub async fn send(&self, msg: T) -> Result<SendOutcome, SubmitError> {
		if self.inner.policy == OverflowPolicy::Backpressure {
			loop {
				// Register the notification future *before* checking capacity
				// to avoid a lost wakeup between drop(lock) and await.
				let notified = self.inner.notify_send.notified();

				let mut state = self.inner.state.lock().await;
				if state.closed {
					return Err(SubmitError::Closed);
				}
				if state.queue.len() < self.inner.capacity {
					state.queue.push_back(msg);
					drop(state);
					self.inner.notify_recv.notify_one();
					return Ok(SendOutcome::Enqueued);
				}
				drop(state);
				notified.await;
			}
		}

		let mut state = self.inner.state.lock().await;
		enqueue_with_policy(&self.inner, &mut state, msg)
	}

	/// Returns the current queue length.
	pub async fn len(&self) -> usize {
		self.inner.state.lock().await.queue.len()
	}

	/// Returns the queue capacity.
	pub fn capacity(&self) -> usize {
		self.inner.capacity
	}
}

impl<T> MailboxReceiver<T> {
	/// Receives one message. Returns `None` once the mailbox is closed and
	/// drained.
	pub async fn recv(&mut self) -> Option<T> {
		loop {
			let notified = self.inner.notify_recv.notified();

			let mut state = self.inner.state.lock().await;
			if let Some(msg) = state.queue.pop_front() {
				drop(state);
				self.inner.notify_send.notify_one();
				return Some(msg);
			}
			if state.closed {
				return None;
			}
			drop(state);
			notified.await;
		}
	}

	/// Closes the mailbox and drops everything still queued.
	///
	/// Returns the number of dropped messages. Senders observe
	/// [`SubmitError::Closed`] afterwards.
	pub async fn drain_pending(&mut self) -> usize {
		let mut state = self.inner.state.lock().await;
		state.closed = true;
		let dropped = state.queue.len();
		state.queue.clear();
		drop(state);
		self.inner.notify_send.notify_waiters();
		dropped
	}

	/// Returns the current queue length.
	pub async fn len(&self) -> usize {
		self.inner.state.lock().await.queue.len()
	}
}

/// Non-blocking enqueue for all policies.
fn enqueue_with_policy<T>(inner: &Inner<T>, state: &mut State<T>, msg: T) -> Result<SendOutcome, SubmitError> {
	if state.closed {
		return Err(SubmitError::Closed);
	}

	match inner.policy {
		OverflowPolicy::LatestWins => {
			let had_items = !state.queue.is_empty();
			state.queue.clear();
			state.queue.push_back(msg);
			inner.notify_recv.notify_one();
			if had_items {
				Ok(SendOutcome::ReplacedQueue)
			} else {
				Ok(SendOutcome::Enqueued)
			}
		}
		OverflowPolicy::DropNewest => {
			if state.queue.len() >= inner.capacity {
				return Ok(SendOutcome::DroppedNewest);
			}
			state.queue.push_back(msg);
			inner.notify_recv.notify_one();
			Ok(SendOutcome::Enqueued)
		}
		OverflowPolicy::Backpressure => {
			if state.queue.len() >= inner.capacity {
				return Err(SubmitError::Full);
			}
			state.queue.push_back(msg);
			inner.notify_recv.notify_one();
			Ok(SendOutcome::Enqueued)
		}
	}
}

#[cfg(test)]
mod tests {
	use std::time::Duration;

	use super::*;

	#[tokio::test]
	async fn delivers_in_submission_order() {
		let (tx, mut rx) = Mailbox::new(8, OverflowPolicy::Backpressure).split();
		for i in 0..5 {
			tx.send(i).await.unwrap();
		}
		for i in 0..5 {
			assert_eq!(rx.recv().await, Some(i));
		}
	}

	#[tokio::test]
	async fn backpressure_try_send_reports_full() {
		let (tx, _rx) = Mailbox::new(1, OverflowPolicy::Backpressure).split();
		tx.try_send(1).await.unwrap();
		assert_eq!(tx.try_send(2).await, Err(SubmitError::Full));
	}

	#[tokio::test]
	async fn backpressure_send_waits_for_capacity() {
		let (tx, mut rx) = Mailbox::new(1, OverflowPolicy::Backpressure).split();
		tx.send(1).await.unwrap();

		let tx2 = tx.clone();
		let blocked = tokio::spawn(async move { tx2.send(2).await });
		tokio::time::sleep(Duration::from_millis(10)).await;
		assert!(!blocked.is_finished());

		assert_eq!(rx.recv().await, Some(1));
		blocked.await.unwrap().unwrap();
		assert_eq!(rx.recv().await, Some(2));
	}

	#[tokio::test]
	async fn latest_wins_keeps_only_the_newest() {
		let (tx, mut rx) = Mailbox::new(4, OverflowPolicy::LatestWins).split();
		tx.send(1).await.unwrap();
		assert_eq!(tx.send(2).await, Ok(SendOutcome::ReplacedQueue));
		assert_eq!(rx.recv().await, Some(2));
	}

	#[tokio::test]
	async fn drop_newest_discards_overflow() {
		let (tx, mut rx) = Mailbox::new(1, OverflowPolicy::DropNewest).split();
		assert_eq!(tx.send(1).await, Ok(SendOutcome::Enqueued));
		assert_eq!(tx.send(2).await, Ok(SendOutcome::DroppedNewest));
		assert_eq!(rx.recv().await, Some(1));
	}

	#[tokio::test]
	async fn drain_pending_drops_queued_messages() {
		let (tx, mut rx) = Mailbox::new(4, OverflowPolicy::Backpressure).split();
		tx.send(1).await.unwrap();
		tx.send(2).await.unwrap();

		assert_eq!(rx.drain_pending().await, 2);
		assert_eq!(tx.send(3).await, Err(SubmitError::Closed));
		assert_eq!(rx.recv().await, None);
	}

	#[tokio::test]
	async fn close_drains_then_ends() {
		let (tx, mut rx) = Mailbox::new(4, OverflowPolicy::Backpressure).split();
		tx.send(1).await.unwrap();
		tx.close().await;
		assert_eq!(tx.send(2).await, Err(SubmitError::Closed));
		assert_eq!(rx.recv().await, Some(1));
		assert_eq!(rx.recv().await, None);
	}
}
