use crate::{AppError, AppResult};
use tokio::task::JoinError;

const OPERATION_KEY: &str = "operation";

/// Runs `job` on the blocking pool.
///
/// Every error coming back carries the `operation` label, whether the job returned it or
/// the task died; a panic's message is kept as the error cause.
pub async fn run_blocking<T, F>(label: &'static str, job: F) -> AppResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> AppResult<T> + Send + 'static,
{
    match tokio::task::spawn_blocking(job).await {
        Ok(result) => result.map_err(|error| tag_operation(error, label)),
        Err(error) => Err(join_failure(label, error)),
    }
}

fn tag_operation(error: AppError, label: &'static str) -> AppError {
    if error.context_value(OPERATION_KEY).is_some() {
        error
    } else {
        error.with_context(OPERATION_KEY, label)
    }
}

fn join_failure(label: &'static str, error: JoinError) -> AppError {
    let (code, message) = if error.is_cancelled() {
        ("blocking_task_canceled", "blocking task canceled")
    } else if error.is_panic() {
        ("blocking_task_panicked", "blocking task panicked")
    } else {
        ("blocking_task_failed", "blocking task failed")
    };
    tracing::warn!(event = "blocking_task_join_failed", operation = label, error_code = code);

    let failure = AppError::new(code, message).with_context(OPERATION_KEY, label);
    match panic_message(error) {
        Some(detail) => failure.with_cause(detail),
        None => failure,
    }
}

fn panic_message(error: JoinError) -> Option<String> {
    let payload = error.try_into_panic().ok()?;
    payload
        .downcast_ref::<&str>()
        .map(|text| (*text).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
}

#[cfg(test)]
#[path = "../../tests/runtime/blocking_tests.rs"]
mod tests;
