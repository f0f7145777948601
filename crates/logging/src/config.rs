pub(crate) const LOG_LEVEL_ENV: &str = "DOCKYARD_LOG_LEVEL";
pub(crate) const DEFAULT_KEEP_DAYS: u64 = 7;
pub(crate) const LOG_FILE_PREFIX: &str = "dockyard";
pub(crate) const LOG_FILE_SUFFIX: &str = "log";

pub(crate) fn normalize_level(value: &str) -> Option<&'static str> {
    match value.trim().to_ascii_lowercase().as_str() {
        "trace" => Some("trace"),
        "debug" => Some("debug"),
        "info" => Some("info"),
        "warn" | "warning" => Some("warn"),
        "error" => Some("error"),
        _ => None,
    }
}

pub(crate) fn resolve_log_level_from(env_value: Option<&str>) -> String {
    if let Some(level) = env_value.and_then(normalize_level) {
        return level.to_string();
    }

    if cfg!(debug_assertions) {
        "debug".to_string()
    } else {
        "info".to_string()
    }
}
