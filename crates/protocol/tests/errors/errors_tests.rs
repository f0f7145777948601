use super::*;

#[derive(Debug)]
struct LeafError;

impl Display for LeafError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("leaf failure")
    }
}

impl StdError for LeafError {}

#[test]
fn unsupported_platform_should_carry_sentinel_message() {
    let error = AppError::unsupported_platform();
    assert_eq!(error.code, CODE_UNSUPPORTED_PLATFORM);
    assert_eq!(error.message, "unsupported platform");
    assert!(error.is_unsupported_platform());
    assert_eq!(error.context_value("platform"), Some(std::env::consts::OS));
}

#[test]
fn not_found_should_keep_caller_code() {
    let error = AppError::not_found("window_not_found").with_context("title", "Inbox");
    assert_eq!(error.code, "window_not_found");
    assert_eq!(error.message, "not found");
    assert!(error.is_not_found());
    assert_eq!(error.context_value("title"), Some("Inbox"));
}

#[test]
fn from_anyhow_should_preserve_app_error() {
    let original = AppError::new("icon_decode_failed", "icon decode failed");
    let restored = AppError::from_anyhow(anyhow::Error::new(original));
    assert_eq!(restored.code, "icon_decode_failed");
}

#[test]
fn from_anyhow_should_collect_chain_without_duplicates() {
    let error = anyhow::Error::new(LeafError).context("outer step");
    let mapped = AppError::from_anyhow(error);
    assert_eq!(mapped.code, DEFAULT_CODE);
    assert_eq!(mapped.causes, vec!["outer step".to_string(), "leaf failure".to_string()]);
}

#[test]
fn result_ext_should_override_code_and_message() {
    let result: Result<(), LeafError> = Err(LeafError);
    let error = result
        .with_code("automation_failed", "automation failed")
        .expect_err("expected error");
    assert_eq!(error.code, "automation_failed");
    assert_eq!(error.message, "automation failed");
    assert_eq!(error.causes, vec!["leaf failure".to_string()]);
}

#[test]
fn with_source_should_record_source_type_once() {
    let error = AppError::new("x", "y").with_source(LeafError).with_source(LeafError);
    let source_types = error
        .context
        .iter()
        .filter(|item| item.key == "sourceType")
        .count();
    assert_eq!(source_types, 1);
}
