use crate::config::{
    DEFAULT_KEEP_DAYS, LOG_FILE_PREFIX, LOG_FILE_SUFFIX, LOG_LEVEL_ENV, resolve_log_level_from,
};
use anyhow::Context;
use dockyard_protocol::{AppError, ResultExt};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use std::time::{Duration, SystemTime};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{Builder as RollingBuilder, Rotation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Debug, Clone)]
pub struct LoggingGuard {
    log_dir: PathBuf,
    level: String,
}

impl LoggingGuard {
    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn level(&self) -> &str {
        &self.level
    }
}

fn worker_guard_slot() -> &'static Mutex<Option<WorkerGuard>> {
    static SLOT: OnceLock<Mutex<Option<WorkerGuard>>> = OnceLock::new();
    SLOT.get_or_init(|| Mutex::new(None))
}

pub fn resolve_log_level() -> String {
    let env_level = std::env::var(LOG_LEVEL_ENV).ok();
    resolve_log_level_from(env_level.as_deref())
}

/// Installs the JSON file layer (daily rolling) plus a compact console layer in debug builds.
///
/// Safe to call more than once: a second call keeps the first subscriber and only returns
/// the resolved directory and level.
pub fn init_logging(log_dir: &Path) -> Result<LoggingGuard, AppError> {
    fs::create_dir_all(log_dir)
        .with_context(|| format!("create log dir failed: {}", log_dir.display()))
        .with_code("log_dir_create_failed", "create log directory failed")
        .with_ctx("logDir", log_dir.display().to_string())?;
    let removed = cleanup_expired_logs(log_dir, DEFAULT_KEEP_DAYS)?;

    let level = resolve_log_level();
    let log_dir = log_dir.to_path_buf();
    if tracing::dispatcher::has_been_set() {
        return Ok(LoggingGuard { log_dir, level });
    }

    let file_appender = RollingBuilder::new()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix(LOG_FILE_SUFFIX)
        .build(&log_dir)
        .with_context(|| format!("create log appender failed: {}", log_dir.display()))
        .with_code("log_appender_create_failed", "create log appender failed")
        .with_ctx("logDir", log_dir.display().to_string())?;
    let (file_writer, worker_guard) = tracing_appender::non_blocking(file_appender);

    if let Ok(mut slot) = worker_guard_slot().lock() {
        *slot = Some(worker_guard);
    }

    let env_filter = EnvFilter::new(level.clone());
    let file_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_ansi(false)
        .with_writer(file_writer)
        .with_current_span(false)
        .with_span_list(false);

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer);
    #[cfg(debug_assertions)]
    let subscriber = subscriber.with(
        tracing_subscriber::fmt::layer()
            .compact()
            .with_ansi(true)
            .with_target(true)
            .with_writer(std::io::stderr),
    );

    subscriber
        .try_init()
        .with_context(|| format!("init log subscriber failed: level={level}"))
        .with_code("log_subscriber_init_failed", "init log subscriber failed")
        .with_ctx("logLevel", level.clone())?;

    tracing::info!(
        event = "logging_initialized",
        level = level.as_str(),
        log_dir = %log_dir.display(),
        expired_removed = removed
    );
    Ok(LoggingGuard { log_dir, level })
}

/// Deletes `dockyard*.log*` files whose mtime is older than `keep_days`. Returns how many were removed.
pub fn cleanup_expired_logs(log_dir: &Path, keep_days: u64) -> Result<usize, AppError> {
    let entries = match fs::read_dir(log_dir) {
        Ok(entries) => entries,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(error) => {
            return Err(AppError::new("log_cleanup_failed", "cleanup expired logs failed")
                .with_source(error)
                .with_context("logDir", log_dir.display().to_string()));
        }
    };

    let keep = Duration::from_secs(keep_days.max(1).saturating_mul(24 * 60 * 60));
    let now = SystemTime::now();
    let mut removed = 0usize;
    for entry in entries.flatten() {
        let path = entry.path();
        if !is_managed_log_file(path.as_path()) {
            continue;
        }
        let Ok(modified) = entry.metadata().and_then(|meta| meta.modified()) else {
            continue;
        };
        let expired = now
            .duration_since(modified)
            .map(|age| age > keep)
            .unwrap_or(false);
        if expired && fs::remove_file(&path).is_ok() {
            removed += 1;
        }
    }
    Ok(removed)
}

fn is_managed_log_file(path: &Path) -> bool {
    path.is_file()
        && path
            .file_name()
            .and_then(|value| value.to_str())
            .is_some_and(|name| {
                name.starts_with(LOG_FILE_PREFIX) && name.contains(&format!(".{LOG_FILE_SUFFIX}"))
            })
}

#[cfg(test)]
#[path = "../tests/logging/logging_tests.rs"]
mod tests;
