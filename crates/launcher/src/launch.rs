use anyhow::Context;
use dockyard_protocol::{AppError, AppResult, ResultExt};
use std::path::PathBuf;
use std::process::Command;

/// Hands the bundle to `open`. Blocking until the opener exits.
///
/// The path is validated on every platform; off macOS a valid path is `unsupported_platform`.
pub fn open_bundle(path: &str) -> AppResult<()> {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return Err(AppError::new("launch_path_invalid", "launch path is empty"));
    }

    let path_buf = PathBuf::from(trimmed);
    if !path_buf.exists() {
        return Err(AppError::not_found("launch_path_not_found")
            .with_context("path", path_buf.to_string_lossy().to_string()));
    }

    dockyard_kernel::platform::ensure_automation_supported()
        .map_err(|error| error.with_context("path", trimmed))?;

    let status = Command::new("open")
        .arg(&path_buf)
        .status()
        .with_context(|| format!("failed to invoke open: {trimmed}"))
        .with_code("launch_failed", "launch application failed")?;

    if status.success() {
        Ok(())
    } else {
        Err(AppError::new("launch_failed", "launch application failed")
            .with_context("status", status.to_string())
            .with_context("path", trimmed))
    }
}

/// `true` once the opener accepted the path.
pub fn launch_application(path: &str) -> bool {
    match open_bundle(path) {
        Ok(()) => {
            tracing::info!(event = "app_launched", app_path = path);
            true
        }
        Err(error) => {
            tracing::warn!(
                event = "app_launch_failed",
                app_path = path,
                error_code = error.code.as_str(),
                error_detail = error.to_string()
            );
            false
        }
    }
}

#[cfg(test)]
#[path = "../tests/launch/launch_tests.rs"]
mod tests;
