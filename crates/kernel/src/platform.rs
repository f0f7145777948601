use crate::{AppError, AppResult};

/// Bundle scanning and UI automation are only wired for macOS.
pub const fn automation_supported() -> bool {
    cfg!(target_os = "macos")
}

pub fn ensure_automation_supported() -> AppResult<()> {
    ensure_supported(automation_supported())
}

pub(crate) fn ensure_supported(supported: bool) -> AppResult<()> {
    if supported {
        Ok(())
    } else {
        Err(AppError::unsupported_platform())
    }
}

pub fn home_dir() -> Option<std::path::PathBuf> {
    std::env::var_os("HOME")
        .filter(|value| !value.is_empty())
        .map(std::path::PathBuf::from)
        .or_else(|| std::env::var_os("USERPROFILE").map(std::path::PathBuf::from))
}

#[cfg(test)]
#[path = "../tests/platform/platform_tests.rs"]
mod tests;
