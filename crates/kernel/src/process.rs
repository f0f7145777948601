use crate::{AppError, AppResult, ResultExt};
use std::future::Future;
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::Command;
use tokio::runtime::{Builder as RuntimeBuilder, Handle};

/// Runs `command` to completion with piped output, bounded by `timeout`.
///
/// The deadline covers the whole `output()` future, pipe draining included, so a
/// grandchild holding stdout open cannot outlive it. On expiry the child is killed.
pub async fn run_with_timeout(
    mut command: Command,
    timeout: Duration,
    label: &'static str,
) -> AppResult<Output> {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    let child = command
        .spawn()
        .with_code("process_spawn_failed", "spawn process failed")
        .with_ctx("process", label)?;

    match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(output) => output
            .with_code("process_wait_failed", "wait for process failed")
            .with_ctx("process", label),
        Err(_elapsed) => {
            tracing::warn!(
                event = "process_timeout",
                process = label,
                timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX)
            );
            Err(AppError::new("process_timeout", "process timed out")
                .with_context("process", label)
                .with_context("timeoutMs", timeout.as_millis().to_string()))
        }
    }
}

/// [`run_with_timeout`] for synchronous callers on the blocking pool.
///
/// Reuses the ambient runtime when there is one, else drives a throwaway
/// current-thread runtime. Must not be called from an async task.
pub fn run_with_timeout_blocking(
    command: Command,
    timeout: Duration,
    label: &'static str,
) -> AppResult<Output> {
    block_on(label, run_with_timeout(command, timeout, label))
}

fn block_on<F>(label: &'static str, future: F) -> AppResult<Output>
where
    F: Future<Output = AppResult<Output>>,
{
    if let Ok(handle) = Handle::try_current() {
        return handle.block_on(future);
    }
    let runtime = RuntimeBuilder::new_current_thread()
        .enable_all()
        .build()
        .with_code("process_runtime_failed", "start process runtime failed")
        .with_ctx("process", label)?;
    runtime.block_on(future)
}

#[cfg(test)]
#[path = "../tests/process/process_tests.rs"]
mod tests;
