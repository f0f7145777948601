use dockyard_protocol::{AppError, AppResult};
use serde::Deserialize;
use serde::de::DeserializeOwned;

pub(crate) const CODE_PARSE_FAILED: &str = "automation_parse_failed";

/// The single JSON document every automation script prints.
#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum ScriptReply<T> {
    Ok { data: T },
    Error { code: String, message: String },
}

pub(crate) fn parse_reply<T: DeserializeOwned>(label: &'static str, raw: &str) -> AppResult<T> {
    let reply = serde_json::from_str::<ScriptReply<T>>(raw.trim()).map_err(|error| {
        AppError::new(CODE_PARSE_FAILED, "parse automation output failed")
            .with_context("script", label)
            .with_context("line", error.line().to_string())
            .with_context("column", error.column().to_string())
            .with_cause(error.to_string())
    })?;

    match reply {
        ScriptReply::Ok { data } => Ok(data),
        ScriptReply::Error { code, message } => {
            Err(AppError::new(code, message).with_context("script", label))
        }
    }
}

#[cfg(test)]
#[path = "../tests/reply/reply_tests.rs"]
mod tests;
