use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

fn camel_boundary_regex() -> Option<&'static Regex> {
    static REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    REGEX
        .get_or_init(|| Regex::new(r"([a-z])([A-Z])").ok())
        .as_ref()
}

/// `GitHubDesktop.app` -> `Git Hub Desktop`, `visual-studio_code.app` -> `visual studio code`.
pub(crate) fn display_name_from_bundle(file_name: &str) -> String {
    let stem = strip_bundle_extension(file_name);
    let split = match camel_boundary_regex() {
        Some(regex) => regex.replace_all(stem, "$1 $2").into_owned(),
        None => stem.to_string(),
    };
    let normalized = split
        .replace(['-', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if normalized.is_empty() {
        file_name.trim().to_string()
    } else {
        normalized
    }
}

fn strip_bundle_extension(file_name: &str) -> &str {
    let trimmed = file_name.trim();
    let has_bundle_extension = Path::new(trimmed)
        .extension()
        .and_then(|value| value.to_str())
        .is_some_and(|value| value.eq_ignore_ascii_case(crate::BUNDLE_EXTENSION));
    if !has_bundle_extension {
        return trimmed;
    }
    let cut = trimmed.len() - crate::BUNDLE_EXTENSION.len() - 1;
    &trimmed[..cut]
}

pub(crate) fn sort_key(name: &str) -> String {
    name.to_lowercase()
}

#[cfg(test)]
#[path = "../tests/naming/naming_tests.rs"]
mod tests;
