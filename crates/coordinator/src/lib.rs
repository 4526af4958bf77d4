//! Coordinator-context runtime primitives.
//!
//! All mutation of a shared model is serialized onto one designated tokio
//! task, the coordinator. Worker tasks hand mutations off through a bounded
//! FIFO mailbox and read through bounded-wait read scopes; the owner context
//! id is checked at every write entry point, so a mutation attempted off the
//! coordinator fails with [`error::AccessError::WrongContext`] instead of
//! racing.

mod class;
/// Execution-context identity.
pub mod context;
/// The coordinator task and its handle.
pub mod coordinator;
/// Access and submission error types.
pub mod error;
/// Bounded single-consumer hand-off mailbox.
pub mod mailbox;
/// Shared state with read/write scopes.
pub mod shared;
mod spawn;

pub use class::TaskClass;
pub use context::{ContextId, in_context};
pub use coordinator::{CoordinatorConfig, CoordinatorHandle, ShutdownMode, ShutdownReport, spawn_coordinator};
pub use error::{AccessError, SubmitError};
pub use mailbox::{Mailbox, MailboxReceiver, MailboxSender, OverflowPolicy, SendOutcome};
pub use shared::{ReadScope, Shared, WriteScope};
pub use spawn::{spawn, spawn_blocking};
