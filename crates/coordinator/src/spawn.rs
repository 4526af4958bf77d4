use std::future::Future;
use std::sync::OnceLock;

use tokio::task::JoinHandle;

use crate::TaskClass;

fn runtime_handle() -> tokio::runtime::Handle {
	if let Ok(handle) = tokio::runtime::Handle::try_current() {
		return handle;
	}

	static GLOBAL_RT: OnceLock<tokio::runtime::Runtime> = OnceLock::new();
	let runtime = GLOBAL_RT.get_or_init(|| {
		tokio::runtime::Builder::new_multi_thread()
			.enable_time()
			.worker_threads(2)
			.thread_name("arbor-coordinator-global")
			.build()
			.expect("failed to build arbor-coordinator global tokio runtime")
	});
	runtime.handle().clone()
}

/// Spawns an async task with shared classification metadata.
pub fn spawn<F>(class: TaskClass, fut: F) -> JoinHandle<F::Output>
where
	F: Future + Send + 'static,
	F::Output: Send + 'static,
{
	tracing::trace!(task_class = class.as_str(), "coordinator.spawn");
	runtime_handle().spawn(fut)
}

/// Spawns blocking work with shared classification metadata.
pub fn spawn_blocking<F, R>(class: TaskClass, f: F) -> JoinHandle<R>
where
	F: FnOnce() -> R + Send + 'static,
	R: Send + 'static,
{
	tracing::trace!(task_class = class.as_str(), "coordinator.spawn_blocking");
	runtime_handle().spawn_blocking(f)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn spawn_runs_on_the_current_runtime() {
		let handle = spawn(TaskClass::Background, async { 21 * 2 });
		assert_eq!(handle.await.unwrap(), 42);
	}

	#[tokio::test]
	async fn spawn_blocking_runs_off_the_async_thread() {
		let handle = spawn_blocking(TaskClass::Blocking, || (0u64..100).sum::<u64>());
		assert_eq!(handle.await.unwrap(), 4950);
	}
}
