use super::*;
use crate::runner::AutomationScript;
use std::collections::VecDeque;
use std::sync::Mutex;

#[derive(Default)]
struct RecordingRunner {
    replies: Mutex<VecDeque<AppResult<String>>>,
    scripts: Mutex<Vec<AutomationScript>>,
}

impl RecordingRunner {
    fn replying(replies: &[&str]) -> Self {
        Self {
            replies: Mutex::new(replies.iter().map(|reply| Ok(reply.to_string())).collect()),
            scripts: Mutex::new(Vec::new()),
        }
    }

    fn labels(&self) -> Vec<&'static str> {
        self.scripts
            .lock()
            .expect("scripts lock")
            .iter()
            .map(|script| script.label)
            .collect()
    }
}

impl ScriptRunner for RecordingRunner {
    fn run(&self, script: &AutomationScript) -> AppResult<String> {
        self.scripts.lock().expect("scripts lock").push(script.clone());
        self.replies
            .lock()
            .expect("replies lock")
            .pop_front()
            .unwrap_or_else(|| Err(AppError::new("automation_failed", "no scripted reply")))
    }
}

#[test]
fn list_windows_should_parse_and_skip_untitled_windows() {
    let runner = RecordingRunner::replying(&[r#"{"status":"ok","data":[
        {"appName":"Finder","title":"Downloads","x":0,"y":25,"width":900,"height":600,"isMinimized":false},
        {"appName":"Finder","title":"","x":0,"y":0,"width":1,"height":1,"isMinimized":false},
        {"appName":"Mail","title":"Inbox","x":40,"y":60,"width":1000,"height":700,"isMinimized":true}
    ]}"#]);

    let windows = list_windows(&runner).expect("list windows");
    let titles = windows
        .iter()
        .map(|window| window.title.as_str())
        .collect::<Vec<_>>();
    assert_eq!(titles, vec!["Downloads", "Inbox"]);
    assert!(windows[1].is_minimized);
    assert_eq!(runner.labels(), vec!["list_windows"]);
}

#[test]
fn list_windows_should_fall_back_to_empty_on_unparsable_output() {
    let runner = RecordingRunner::replying(&["garbage that is not json"]);
    assert_eq!(list_windows(&runner).expect("fallback"), Vec::new());
}

#[test]
fn list_windows_should_propagate_invocation_failures() {
    let runner = RecordingRunner::default();
    let error = list_windows(&runner).expect_err("runner failure");
    assert_eq!(error.code, "automation_failed");
}

#[test]
fn resize_frontmost_should_reject_unknown_actions_before_scripting() {
    let runner = RecordingRunner::default();
    let error = resize_frontmost(&runner, &AutomationConfig::default(), "top-third")
        .expect_err("unknown action");
    assert_eq!(error.code, "unknown_window_action");
    assert!(runner.labels().is_empty());
}

#[test]
fn resize_frontmost_should_query_bounds_then_apply_rectangle() {
    let runner = RecordingRunner::replying(&[
        r#"{"status":"ok","data":{"width":1440,"height":875}}"#,
        r#"{"status":"ok","data":true}"#,
    ]);

    let rect = resize_frontmost(&runner, &AutomationConfig::default(), "left-half")
        .expect("resize window");
    assert_eq!(
        rect,
        WindowRect {
            x: 0,
            y: 25,
            width: 720,
            height: 875,
        }
    );
    assert_eq!(runner.labels(), vec!["screen_bounds", "resize_window"]);
    let scripts = runner.scripts.lock().expect("scripts lock");
    assert!(scripts[1].source.contains("windows[0].size = [720, 875];"));
}

#[test]
fn focus_window_should_report_not_found_for_unknown_titles() {
    let runner = RecordingRunner::replying(&[
        r#"{"status":"error","code":"window_not_found","message":"not found"}"#,
    ]);

    let error = focus_window(&runner, "NoSuchTitle").expect_err("missing window");
    assert_eq!(error.code, CODE_WINDOW_NOT_FOUND);
    assert!(error.is_not_found());
    assert_eq!(runner.labels(), vec!["focus_window"]);
}

#[test]
fn minimize_window_should_skip_scripting_for_empty_titles() {
    let runner = RecordingRunner::default();
    let error = minimize_window(&runner, "").expect_err("empty title");
    assert!(error.is_not_found());
    assert!(runner.labels().is_empty());
}

#[test]
fn minimize_window_should_embed_exact_title() {
    let runner = RecordingRunner::replying(&[r#"{"status":"ok","data":true}"#]);
    minimize_window(&runner, "Budget \"2026\"").expect("minimize");
    let scripts = runner.scripts.lock().expect("scripts lock");
    assert!(scripts[0].source.contains(r#""Budget \"2026\"""#));
}
