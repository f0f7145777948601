use crate::config::AutomationConfig;
use crate::runner::{OsascriptRunner, ScriptRunner};
use crate::{menus, windows};
use dockyard_kernel::run_blocking;
use dockyard_protocol::models::{ActionResultDto, MenuItemsDto, WindowListDto};
use dockyard_protocol::{AppError, AppResult};
use std::sync::Arc;

/// Request/response entry points for window and menu automation.
///
/// Holds no per-call state; every call builds, runs and parses its own script on the
/// blocking pool.
#[derive(Clone)]
pub struct AutomationBridge {
    runner: Arc<dyn ScriptRunner>,
    config: Arc<AutomationConfig>,
    supported: bool,
}

impl AutomationBridge {
    pub fn new(config: AutomationConfig) -> Self {
        let runner = Arc::new(OsascriptRunner::new(config.script_timeout));
        Self::with_runner(runner, config)
    }

    pub fn with_runner(runner: Arc<dyn ScriptRunner>, config: AutomationConfig) -> Self {
        Self {
            runner,
            config: Arc::new(config),
            supported: dockyard_kernel::platform::automation_supported(),
        }
    }

    pub fn with_platform_support(mut self, supported: bool) -> Self {
        self.supported = supported;
        self
    }

    pub async fn get_windows(&self) -> AppResult<WindowListDto> {
        self.invoke("get_windows", |runner, _| windows::list_windows(runner))
            .await
            .map(|windows| WindowListDto { windows })
    }

    pub async fn resize_window(&self, action: &str) -> AppResult<ActionResultDto> {
        let action = action.to_string();
        self.invoke("resize_window", move |runner, config| {
            windows::resize_frontmost(runner, config, &action)
        })
        .await
        .map(|_| ActionResultDto::ok())
    }

    pub async fn minimize_window(&self, title: &str) -> AppResult<ActionResultDto> {
        let title = title.to_string();
        self.invoke("minimize_window", move |runner, _| {
            windows::minimize_window(runner, &title)
        })
        .await
        .map(|()| ActionResultDto::ok())
    }

    pub async fn focus_window(&self, title: &str) -> AppResult<ActionResultDto> {
        let title = title.to_string();
        self.invoke("focus_window", move |runner, _| windows::focus_window(runner, &title))
            .await
            .map(|()| ActionResultDto::ok())
    }

    pub async fn get_menu_items(&self) -> AppResult<MenuItemsDto> {
        self.invoke("get_menu_items", menus::list_menu_items).await
    }

    pub async fn execute_menu_item(&self, path: &str) -> AppResult<ActionResultDto> {
        let path = path.to_string();
        self.invoke("execute_menu_item", move |runner, config| {
            menus::execute_menu_item(runner, config, &path)
        })
        .await
        .map(|()| ActionResultDto::ok())
    }

    async fn invoke<T, F>(&self, operation: &'static str, job: F) -> AppResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn ScriptRunner, &AutomationConfig) -> AppResult<T> + Send + 'static,
    {
        if !self.supported {
            tracing::debug!(
                event = "automation_unsupported_platform",
                operation,
                platform = std::env::consts::OS
            );
            return Err(AppError::unsupported_platform().with_context("operation", operation));
        }

        let runner = self.runner.clone();
        let config = self.config.clone();
        let result = run_blocking(operation, move || job(runner.as_ref(), config.as_ref())).await;
        match &result {
            Ok(_) => tracing::debug!(event = "automation_call_completed", operation),
            Err(error) if error.is_not_found() => tracing::info!(
                event = "automation_target_missing",
                operation,
                error_code = error.code.as_str()
            ),
            Err(error) => tracing::warn!(
                event = "automation_call_failed",
                operation,
                error_code = error.code.as_str(),
                error_detail = error.to_string()
            ),
        }
        result
    }
}

#[cfg(test)]
#[path = "../tests/bridge/bridge_tests.rs"]
mod tests;
