/// Scheduling class attached to spawned work.
///
/// The class is recorded as a tracing field at spawn time, so task activity
/// can be filtered by role. Coordinator loops run as [`TaskClass::Interactive`];
/// worker tasks that compute off-context and hand results back are
/// [`TaskClass::Background`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskClass {
	/// Work on the latency path: coordinator loops and anything a caller
	/// actively awaits.
	Interactive,
	/// Deferred async work; may lag under load.
	Background,
	/// Work routed to the blocking pool.
	Blocking,
}

impl TaskClass {
	pub(crate) const fn as_str(self) -> &'static str {
		match self {
			Self::Interactive => "interactive",
			Self::Background => "background",
			Self::Blocking => "blocking",
		}
	}
}
