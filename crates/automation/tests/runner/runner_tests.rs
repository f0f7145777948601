use super::*;

#[test]
fn phases_should_render_state_names() {
    let rendered = [
        AutomationPhase::BuildingScript,
        AutomationPhase::Executing,
        AutomationPhase::Parsing,
        AutomationPhase::Succeeded,
        AutomationPhase::Failed,
    ]
    .map(AutomationPhase::as_str);
    assert_eq!(
        rendered,
        ["building-script", "executing", "parsing", "success", "error"]
    );
}

#[cfg(not(target_os = "macos"))]
#[test]
fn osascript_runner_should_fail_where_osascript_is_missing() {
    let runner = OsascriptRunner::new(Duration::from_secs(2));
    let script = AutomationScript::new("sum_check", "1 + 1");
    let error = runner.run(&script).expect_err("osascript unavailable");
    assert_eq!(error.code, "process_spawn_failed");
    assert_eq!(error.context_value("script"), Some("sum_check"));
}
