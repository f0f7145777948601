use crate::reply::{CODE_PARSE_FAILED, parse_reply};
use anyhow::Context;
use dockyard_protocol::{AppError, AppResult, ResultExt};
use serde::de::DeserializeOwned;
use tokio::process::Command;
use std::time::Duration;

/// One synthesized JavaScript-for-Automation program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutomationScript {
    pub label: &'static str,
    pub source: String,
}

impl AutomationScript {
    pub fn new(label: &'static str, source: impl Into<String>) -> Self {
        Self {
            label,
            source: source.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutomationPhase {
    BuildingScript,
    Executing,
    Parsing,
    Succeeded,
    Failed,
}

impl AutomationPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BuildingScript => "building-script",
            Self::Executing => "executing",
            Self::Parsing => "parsing",
            Self::Succeeded => "success",
            Self::Failed => "error",
        }
    }
}

pub(crate) fn trace_phase(operation: &'static str, phase: AutomationPhase) {
    tracing::debug!(
        event = "automation_phase",
        operation,
        phase = phase.as_str()
    );
}

/// Walks one call through build, execute and parse, tracing each phase.
pub(crate) fn execute_script<T, B>(
    runner: &dyn ScriptRunner,
    operation: &'static str,
    build: B,
) -> AppResult<T>
where
    T: DeserializeOwned,
    B: FnOnce() -> AutomationScript,
{
    trace_phase(operation, AutomationPhase::BuildingScript);
    let script = build();
    trace_phase(operation, AutomationPhase::Executing);
    let outcome = runner
        .run(&script)
        .and_then(|raw| {
            trace_phase(operation, AutomationPhase::Parsing);
            parse_reply::<T>(script.label, &raw)
        });
    match &outcome {
        Ok(_) => trace_phase(operation, AutomationPhase::Succeeded),
        Err(error) => tracing::debug!(
            event = "automation_phase",
            operation,
            phase = AutomationPhase::Failed.as_str(),
            error_code = error.code.as_str()
        ),
    }
    outcome
}

/// Executes a script and hands back its raw standard output. Blocking.
pub trait ScriptRunner: Send + Sync + 'static {
    fn run(&self, script: &AutomationScript) -> AppResult<String>;
}

/// `osascript -l JavaScript`, killed once the timeout elapses.
#[derive(Debug, Clone)]
pub struct OsascriptRunner {
    timeout: Duration,
}

impl OsascriptRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl ScriptRunner for OsascriptRunner {
    fn run(&self, script: &AutomationScript) -> AppResult<String> {
        tracing::debug!(event = "osascript_executing", script = script.label);
        let mut command = Command::new("osascript");
        command
            .arg("-l")
            .arg("JavaScript")
            .arg("-e")
            .arg(&script.source);
        let output = dockyard_kernel::run_with_timeout_blocking(command, self.timeout, "osascript")
            .map_err(|error| error.with_context("script", script.label))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            tracing::warn!(
                event = "osascript_failed",
                script = script.label,
                status = %output.status,
                stderr = %stderr
            );
            return Err(AppError::new("automation_failed", "automation script failed")
                .with_context("script", script.label)
                .with_context("status", output.status.to_string())
                .with_cause(stderr));
        }

        let stdout = String::from_utf8(output.stdout)
            .context("osascript printed non utf-8 output")
            .with_code(CODE_PARSE_FAILED, "parse automation output failed")
            .with_ctx("script", script.label)?
            .trim()
            .to_string();
        tracing::debug!(
            event = "osascript_completed",
            script = script.label,
            output_bytes = stdout.len()
        );
        Ok(stdout)
    }
}

#[cfg(test)]
#[path = "../tests/runner/runner_tests.rs"]
mod tests;
