use crate::config::AutomationConfig;
use crate::geometry::target_rect;
use crate::reply::CODE_PARSE_FAILED;
use crate::runner::{ScriptRunner, execute_script};
use crate::scripts;
use dockyard_protocol::models::{ScreenBounds, WindowAction, WindowDescriptor, WindowRect};
use dockyard_protocol::{AppError, AppResult};

pub const CODE_WINDOW_NOT_FOUND: &str = "window_not_found";

/// Titled windows of every visible process. Unreadable output degrades to an empty list.
pub fn list_windows(runner: &dyn ScriptRunner) -> AppResult<Vec<WindowDescriptor>> {
    match execute_script::<Vec<WindowDescriptor>, _>(runner, "get_windows", scripts::list_windows) {
        Ok(windows) => Ok(windows
            .into_iter()
            .filter(|window| !window.title.is_empty())
            .collect()),
        Err(error) if error.code == CODE_PARSE_FAILED => {
            tracing::warn!(
                event = "window_list_parse_failed",
                error_detail = error.causes.join(" | ")
            );
            Ok(Vec::new())
        }
        Err(error) => Err(error),
    }
}

pub fn screen_bounds(runner: &dyn ScriptRunner) -> AppResult<ScreenBounds> {
    execute_script(runner, "screen_bounds", scripts::screen_bounds)
}

/// Moves the frontmost window to the frame `action` maps to.
pub fn resize_frontmost(
    runner: &dyn ScriptRunner,
    config: &AutomationConfig,
    action: &str,
) -> AppResult<WindowRect> {
    let action = action.parse::<WindowAction>()?;
    let bounds = screen_bounds(runner)?;
    let rect = target_rect(bounds, action, config);
    execute_script::<bool, _>(runner, "resize_window", || scripts::resize_frontmost(rect))?;
    tracing::info!(
        event = "window_resized",
        action = action.as_str(),
        x = rect.x,
        y = rect.y,
        width = rect.width,
        height = rect.height
    );
    Ok(rect)
}

pub fn minimize_window(runner: &dyn ScriptRunner, title: &str) -> AppResult<()> {
    ensure_title(title)?;
    execute_script::<bool, _>(runner, "minimize_window", || scripts::minimize_window(title))
        .map(|_| ())
}

pub fn focus_window(runner: &dyn ScriptRunner, title: &str) -> AppResult<()> {
    ensure_title(title)?;
    execute_script::<bool, _>(runner, "focus_window", || scripts::focus_window(title)).map(|_| ())
}

// Untitled windows are never listed, so an empty title cannot match anything.
fn ensure_title(title: &str) -> AppResult<()> {
    if title.is_empty() {
        return Err(AppError::not_found(CODE_WINDOW_NOT_FOUND).with_context("title", title));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/windows/windows_tests.rs"]
mod tests;
