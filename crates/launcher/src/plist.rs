use dockyard_protocol::{AppError, AppResult, ResultExt};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
#[cfg(target_os = "macos")]
use std::time::Duration;

const BINARY_MAGIC: &[u8] = b"bplist00";
const MAX_NESTING: usize = 64;
#[cfg(target_os = "macos")]
const PLUTIL_TIMEOUT: Duration = Duration::from_secs(5);

/// Subset of the property-list value model needed to walk bundle descriptors.
#[derive(Debug, Clone, PartialEq)]
pub enum PlistValue {
    Dict(Vec<(String, PlistValue)>),
    Array(Vec<PlistValue>),
    String(String),
    Integer(i64),
    Bool(bool),
    /// `real`, `date`, `data`: kept as raw text, never interpreted.
    Other(String),
}

impl PlistValue {
    pub fn get(&self, key: &str) -> Option<&PlistValue> {
        match self {
            Self::Dict(entries) => entries
                .iter()
                .find(|(entry_key, _)| entry_key == key)
                .map(|(_, value)| value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[PlistValue]> {
        match self {
            Self::Array(values) => Some(values.as_slice()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Open(&'a str),
    Close(&'a str),
    Empty(&'a str),
    Text(&'a str),
}

fn noise_regex() -> Option<&'static Regex> {
    static REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    REGEX
        .get_or_init(|| Regex::new(r"(?s)<\?.*?\?>|<!--.*?-->|<!DOCTYPE[^>]*>").ok())
        .as_ref()
}

fn tag_regex() -> Option<&'static Regex> {
    static REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    REGEX
        .get_or_init(|| Regex::new(r"<(/?)([A-Za-z][A-Za-z0-9]*)[^>]*?(/?)>").ok())
        .as_ref()
}

fn parse_error(reason: &str) -> AppError {
    AppError::new("plist_parse_failed", "parse property list failed").with_context("reason", reason)
}

/// Parses an XML property list into a [`PlistValue`] tree.
pub fn parse_plist(content: &str) -> AppResult<PlistValue> {
    let (Some(noise), Some(tags)) = (noise_regex(), tag_regex()) else {
        return Err(parse_error("pattern_unavailable"));
    };
    let cleaned = noise.replace_all(content, "");
    let tokens = tokenize(cleaned.as_ref(), tags);
    let mut cursor = 0usize;

    let root = match tokens.first() {
        Some(Token::Open("plist")) => {
            cursor += 1;
            let value = parse_value(&tokens, &mut cursor, 0)?;
            expect(&tokens, &mut cursor, Token::Close("plist"))?;
            value
        }
        Some(_) => parse_value(&tokens, &mut cursor, 0)?,
        None => return Err(parse_error("empty_document")),
    };
    Ok(root)
}

fn tokenize<'a>(content: &'a str, tags: &Regex) -> Vec<Token<'a>> {
    let mut tokens = Vec::new();
    let mut last = 0usize;
    for captures in tags.captures_iter(content) {
        let Some(whole) = captures.get(0) else {
            continue;
        };
        let text = &content[last..whole.start()];
        if !text.trim().is_empty() {
            tokens.push(Token::Text(text));
        }
        last = whole.end();

        let name = captures.get(2).map(|value| value.as_str()).unwrap_or_default();
        let closing = captures.get(1).is_some_and(|value| !value.as_str().is_empty());
        let self_closing = captures.get(3).is_some_and(|value| !value.as_str().is_empty());
        tokens.push(match (closing, self_closing) {
            (true, _) => Token::Close(name),
            (false, true) => Token::Empty(name),
            (false, false) => Token::Open(name),
        });
    }
    let tail = &content[last..];
    if !tail.trim().is_empty() {
        tokens.push(Token::Text(tail));
    }
    tokens
}

fn expect(tokens: &[Token<'_>], cursor: &mut usize, wanted: Token<'_>) -> AppResult<()> {
    match tokens.get(*cursor) {
        Some(token) if *token == wanted => {
            *cursor += 1;
            Ok(())
        }
        Some(_) => Err(parse_error("unexpected_token")),
        None => Err(parse_error("unexpected_end")),
    }
}

fn read_text(tokens: &[Token<'_>], cursor: &mut usize, tag: &str) -> AppResult<String> {
    let text = match tokens.get(*cursor) {
        Some(Token::Text(text)) => {
            *cursor += 1;
            decode_entities(text)
        }
        _ => String::new(),
    };
    expect(tokens, cursor, Token::Close(tag))?;
    Ok(text)
}

fn parse_value(tokens: &[Token<'_>], cursor: &mut usize, depth: usize) -> AppResult<PlistValue> {
    if depth > MAX_NESTING {
        return Err(parse_error("too_deep"));
    }
    let Some(token) = tokens.get(*cursor).copied() else {
        return Err(parse_error("unexpected_end"));
    };
    *cursor += 1;

    match token {
        Token::Empty("dict") => Ok(PlistValue::Dict(Vec::new())),
        Token::Empty("array") => Ok(PlistValue::Array(Vec::new())),
        Token::Empty("string") => Ok(PlistValue::String(String::new())),
        Token::Empty("true") => Ok(PlistValue::Bool(true)),
        Token::Empty("false") => Ok(PlistValue::Bool(false)),
        Token::Empty(_) => Ok(PlistValue::Other(String::new())),
        Token::Open("dict") => parse_dict(tokens, cursor, depth),
        Token::Open("array") => {
            let mut values = Vec::new();
            loop {
                if tokens.get(*cursor) == Some(&Token::Close("array")) {
                    *cursor += 1;
                    return Ok(PlistValue::Array(values));
                }
                values.push(parse_value(tokens, cursor, depth + 1)?);
            }
        }
        Token::Open("string") => Ok(PlistValue::String(read_text(tokens, cursor, "string")?)),
        Token::Open("integer") => {
            let raw = read_text(tokens, cursor, "integer")?;
            raw.trim()
                .parse::<i64>()
                .map(PlistValue::Integer)
                .map_err(|_| parse_error("invalid_integer").with_context("value", raw))
        }
        Token::Open("true") => {
            expect(tokens, cursor, Token::Close("true"))?;
            Ok(PlistValue::Bool(true))
        }
        Token::Open("false") => {
            expect(tokens, cursor, Token::Close("false"))?;
            Ok(PlistValue::Bool(false))
        }
        Token::Open(other) => Ok(PlistValue::Other(read_text(tokens, cursor, other)?)),
        Token::Close(_) => Err(parse_error("unexpected_close")),
        Token::Text(_) => Err(parse_error("unexpected_text")),
    }
}

fn parse_dict(tokens: &[Token<'_>], cursor: &mut usize, depth: usize) -> AppResult<PlistValue> {
    let mut entries = Vec::new();
    loop {
        match tokens.get(*cursor) {
            Some(Token::Close("dict")) => {
                *cursor += 1;
                return Ok(PlistValue::Dict(entries));
            }
            Some(Token::Open("key")) => {
                *cursor += 1;
                let key = read_text(tokens, cursor, "key")?;
                let value = parse_value(tokens, cursor, depth + 1)?;
                entries.push((key, value));
            }
            Some(_) => return Err(parse_error("expected_key")),
            None => return Err(parse_error("unexpected_end")),
        }
    }
}

fn decode_entities(raw: &str) -> String {
    raw.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

pub fn descriptor_path(bundle: &Path) -> PathBuf {
    bundle.join("Contents").join("Info.plist")
}

/// Reads `Contents/Info.plist`, converting binary lists to XML first.
pub fn read_bundle_descriptor(bundle: &Path) -> AppResult<PlistValue> {
    let path = descriptor_path(bundle);
    let bytes = fs::read(&path)
        .with_code("plist_read_failed", "read bundle descriptor failed")
        .with_ctx("path", path.to_string_lossy())?;
    let content = if bytes.starts_with(BINARY_MAGIC) {
        convert_binary_plist(&path)?
    } else {
        String::from_utf8_lossy(&bytes).into_owned()
    };
    parse_plist(&content).map_err(|error| error.with_context("path", path.to_string_lossy()))
}

#[cfg(target_os = "macos")]
fn convert_binary_plist(path: &Path) -> AppResult<String> {
    let mut command = tokio::process::Command::new("plutil");
    command.args(["-convert", "xml1", "-o", "-"]).arg(path);
    let output = dockyard_kernel::run_with_timeout_blocking(command, PLUTIL_TIMEOUT, "plutil")?;
    if !output.status.success() {
        return Err(
            AppError::new("plist_convert_failed", "convert binary property list failed")
                .with_context("path", path.to_string_lossy())
                .with_cause(String::from_utf8_lossy(&output.stderr).trim().to_string()),
        );
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(not(target_os = "macos"))]
fn convert_binary_plist(path: &Path) -> AppResult<String> {
    Err(AppError::new(
        "plist_binary_unsupported",
        "binary property list unsupported on this platform",
    )
    .with_context("path", path.to_string_lossy()))
}

/// Icon container file name referenced by a descriptor, `.icns` appended when missing.
///
/// Lookup order: `CFBundleIconFile`, then the first entry of
/// `CFBundleIcons/CFBundlePrimaryIcon/CFBundleIconFiles`, then the first entry of a
/// top-level `CFBundleIconFiles` array.
pub fn icon_file_name(descriptor: &PlistValue) -> Option<String> {
    let primary_icon_files = || {
        descriptor
            .get("CFBundleIcons")
            .and_then(|icons| icons.get("CFBundlePrimaryIcon"))
            .and_then(|primary| primary.get("CFBundleIconFiles"))
            .and_then(first_string)
    };
    let top_level_icon_files = || descriptor.get("CFBundleIconFiles").and_then(first_string);

    descriptor
        .get("CFBundleIconFile")
        .and_then(PlistValue::as_str)
        .and_then(normalize_container_name)
        .or_else(|| primary_icon_files().and_then(normalize_container_name))
        .or_else(|| top_level_icon_files().and_then(normalize_container_name))
}

fn first_string(value: &PlistValue) -> Option<&str> {
    value.as_array()?.first()?.as_str()
}

pub(crate) fn normalize_container_name(value: &str) -> Option<String> {
    let file_name = Path::new(value.trim())
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::trim)
        .filter(|name| !name.is_empty())?;
    let has_extension = Path::new(file_name)
        .extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| extension.eq_ignore_ascii_case(crate::CONTAINER_EXTENSION));
    if has_extension {
        Some(file_name.to_string())
    } else {
        Some(format!("{file_name}.{}", crate::CONTAINER_EXTENSION))
    }
}

#[cfg(test)]
#[path = "../tests/plist/plist_tests.rs"]
mod tests;
