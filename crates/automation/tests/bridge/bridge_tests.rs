use super::*;
use crate::runner::AutomationScript;
use std::sync::Mutex;

struct RecordingRunner {
    reply: String,
    labels: Mutex<Vec<&'static str>>,
}

impl RecordingRunner {
    fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            labels: Mutex::new(Vec::new()),
        })
    }

    fn labels(&self) -> Vec<&'static str> {
        self.labels.lock().expect("labels lock").clone()
    }
}

impl ScriptRunner for RecordingRunner {
    fn run(&self, script: &AutomationScript) -> AppResult<String> {
        self.labels.lock().expect("labels lock").push(script.label);
        Ok(self.reply.clone())
    }
}

fn bridge(runner: Arc<RecordingRunner>, supported: bool) -> AutomationBridge {
    AutomationBridge::with_runner(runner, AutomationConfig::default())
        .with_platform_support(supported)
}

#[tokio::test]
async fn every_entry_point_should_be_gated_on_unsupported_platforms() {
    let runner = RecordingRunner::replying(r#"{"status":"ok","data":true}"#);
    let bridge = bridge(runner.clone(), false);

    let errors = vec![
        bridge.get_windows().await.map(|_| ()),
        bridge.resize_window("maximize").await.map(|_| ()),
        bridge.minimize_window("Inbox").await.map(|_| ()),
        bridge.focus_window("Inbox").await.map(|_| ()),
        bridge.get_menu_items().await.map(|_| ()),
        bridge.execute_menu_item("File > Save").await.map(|_| ()),
    ];
    for result in errors {
        let error = result.expect_err("unsupported platform");
        assert!(error.is_unsupported_platform());
        assert_eq!(error.message, "unsupported platform");
    }
    assert!(runner.labels().is_empty());
}

#[tokio::test]
async fn get_windows_should_wrap_list_in_dto() {
    let runner = RecordingRunner::replying(
        r#"{"status":"ok","data":[{"appName":"Notes","title":"Groceries","x":1,"y":2,"width":3,"height":4,"isMinimized":false}]}"#,
    );
    let listed = bridge(runner.clone(), true)
        .get_windows()
        .await
        .expect("windows");
    assert_eq!(listed.windows.len(), 1);
    assert_eq!(listed.windows[0].title, "Groceries");
    assert_eq!(runner.labels(), vec!["list_windows"]);
}

#[tokio::test]
async fn execute_menu_item_should_reject_short_paths_without_running_scripts() {
    let runner = RecordingRunner::replying(r#"{"status":"ok","data":true}"#);
    let error = bridge(runner.clone(), true)
        .execute_menu_item("File")
        .await
        .expect_err("short path");
    assert_eq!(error.code, "invalid_menu_path");
    assert!(runner.labels().is_empty());
}

#[tokio::test]
async fn focus_window_should_return_not_found_for_unknown_title() {
    let runner = RecordingRunner::replying(
        r#"{"status":"error","code":"window_not_found","message":"not found"}"#,
    );
    let error = bridge(runner, true)
        .focus_window("NoSuchTitle")
        .await
        .expect_err("unknown title");
    assert!(error.is_not_found());
}

#[tokio::test]
async fn resize_window_should_report_unknown_action() {
    let runner = RecordingRunner::replying(r#"{"status":"ok","data":true}"#);
    let error = bridge(runner.clone(), true)
        .resize_window("diagonal")
        .await
        .expect_err("unknown action");
    assert_eq!(error.code, "unknown_window_action");
    assert!(runner.labels().is_empty());
}

#[tokio::test]
async fn execute_menu_item_should_succeed_with_ok_reply() {
    let runner = RecordingRunner::replying(r#"{"status":"ok","data":true}"#);
    let reply = bridge(runner.clone(), true)
        .execute_menu_item("Format > Font > Bold")
        .await
        .expect("execute");
    assert!(reply.success);
    assert_eq!(runner.labels(), vec!["click_menu_path"]);
}
