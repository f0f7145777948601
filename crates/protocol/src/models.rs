use crate::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDescriptor {
    pub name: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl ApplicationDescriptor {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            icon: None,
        }
    }

    pub fn with_icon(mut self, icon: Option<String>) -> Self {
        self.icon = icon.filter(|value| !value.is_empty());
        self
    }

    /// An icon counts only when it carries bytes; `Some("")` is treated as absent.
    pub fn has_icon(&self) -> bool {
        self.icon.as_deref().is_some_and(|value| !value.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowDescriptor {
    pub app_name: String,
    pub title: String,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub is_minimized: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemDescriptor {
    pub name: String,
    pub path: String,
    pub has_sub_menu: bool,
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WindowAction {
    LeftHalf,
    RightHalf,
    Maximize,
    Center,
}

impl WindowAction {
    pub const ALL: [WindowAction; 4] = [
        WindowAction::LeftHalf,
        WindowAction::RightHalf,
        WindowAction::Maximize,
        WindowAction::Center,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::LeftHalf => "left-half",
            Self::RightHalf => "right-half",
            Self::Maximize => "maximize",
            Self::Center => "center",
        }
    }
}

impl Display for WindowAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WindowAction {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == normalized)
            .ok_or_else(|| {
                AppError::new("unknown_window_action", "unknown window action")
                    .with_context("action", value)
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenBounds {
    pub width: i32,
    pub height: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatsDto {
    pub total_apps: usize,
    pub apps_with_icons: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowListDto {
    pub windows: Vec<WindowDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemsDto {
    pub app_name: String,
    pub menu_items: Vec<MenuItemDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResultDto {
    pub success: bool,
}

impl ActionResultDto {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReplyDto {
    pub error: String,
    pub code: String,
}

impl From<&AppError> for ErrorReplyDto {
    fn from(value: &AppError) -> Self {
        Self {
            error: value.message.clone(),
            code: value.code.clone(),
        }
    }
}

/// Renders an entry-point result as the `{ ... } | { error }` reply shape.
pub fn reply_json<T: Serialize>(result: &AppResult<T>) -> Value {
    let rendered = match result {
        Ok(value) => serde_json::to_value(value),
        Err(error) => serde_json::to_value(ErrorReplyDto::from(error)),
    };
    rendered.unwrap_or_else(|error| {
        serde_json::json!({ "error": "reply serialization failed", "code": "reply_serialize_failed", "detail": error.to_string() })
    })
}

#[cfg(test)]
#[path = "../tests/models/models_tests.rs"]
mod tests;
