use super::*;

#[test]
fn ensure_supported_should_return_sentinel_when_unsupported() {
    let error = ensure_supported(false).expect_err("unsupported must fail");
    assert!(error.is_unsupported_platform());
    assert_eq!(error.message, "unsupported platform");
}

#[test]
fn ensure_supported_should_pass_when_supported() {
    assert!(ensure_supported(true).is_ok());
}

#[test]
fn ensure_automation_supported_should_follow_target_os() {
    assert_eq!(
        ensure_automation_supported().is_ok(),
        cfg!(target_os = "macos")
    );
}
