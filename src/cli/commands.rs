use crate::service::Dockyard;
use clap::ArgMatches;
use dockyard_automation::AutomationConfig;
use dockyard_launcher::{DiscoveryConfig, DiscoveryEvent};
use dockyard_protocol::AppResult;
use dockyard_protocol::models::reply_json;
use serde::Serialize;
use serde_json::{Value, json};
use std::path::PathBuf;
use std::process::ExitCode;

pub async fn run_command(matches: &ArgMatches) -> ExitCode {
    let Some((name, sub_matches)) = matches.subcommand() else {
        tracing::error!(event = "cli_command_missing");
        return ExitCode::FAILURE;
    };
    tracing::info!(event = "cli_command_started", command = name);

    let dockyard = build_dockyard(sub_matches);
    match name {
        "scan" => handle_scan(&dockyard, sub_matches.get_flag("events")).await,
        "search" => {
            let term = sub_matches
                .get_one::<String>("term")
                .map(String::as_str)
                .unwrap_or_default();
            handle_search(&dockyard, term).await
        }
        "windows" => print_reply(&dockyard.get_windows().await),
        "menus" => print_reply(&dockyard.get_menu_items().await),
        "exec-menu" => {
            let path = required(sub_matches, "path");
            print_reply(&dockyard.execute_menu_item(path).await)
        }
        "resize" => {
            let action = required(sub_matches, "action");
            print_reply(&dockyard.resize_window(action).await)
        }
        "minimize" => {
            let title = required(sub_matches, "title");
            print_reply(&dockyard.minimize_window(title).await)
        }
        "focus" => {
            let title = required(sub_matches, "title");
            print_reply(&dockyard.focus_window(title).await)
        }
        "launch" => {
            let path = required(sub_matches, "path");
            let launched = dockyard.launch_application(path).await;
            print_value(&json!({ "success": launched }));
            exit_code(launched)
        }
        other => {
            tracing::error!(event = "cli_command_unknown", command = other);
            ExitCode::FAILURE
        }
    }
}

fn build_dockyard(matches: &ArgMatches) -> Dockyard {
    let roots = matches
        .try_get_many::<PathBuf>("root")
        .ok()
        .flatten()
        .map(|values| values.cloned().collect::<Vec<_>>())
        .unwrap_or_default();
    if roots.is_empty() {
        return Dockyard::from_env();
    }

    // Explicit roots are scanned on any platform.
    let discovery = DiscoveryConfig::from_env().with_roots(roots);
    Dockyard::new(discovery, AutomationConfig::default()).with_scan_support(true)
}

fn required<'a>(matches: &'a ArgMatches, name: &str) -> &'a str {
    matches
        .get_one::<String>(name)
        .map(String::as_str)
        .unwrap_or_default()
}

async fn handle_scan(dockyard: &Dockyard, print_events: bool) -> ExitCode {
    let handle = dockyard.scan_applications().await;
    let scan_id = handle.scan_id;
    let mut events = handle.events;
    let printer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            if print_events {
                print_value(&event_json(&event));
            }
        }
    });

    let summary = handle.completion.wait().await;
    let _ = printer.await;
    let stats = dockyard.cache_stats();
    tracing::info!(
        event = "cli_scan_completed",
        scan_id,
        total_apps = stats.total_apps,
        apps_with_icons = stats.apps_with_icons
    );

    let reply = summary.map(|summary| {
        json!({
            "scan": summary,
            "stats": stats,
            "apps": dockyard.snapshot(),
        })
    });
    print_reply(&reply)
}

async fn handle_search(dockyard: &Dockyard, term: &str) -> ExitCode {
    let scanned = dockyard.scan_applications().await.wait().await;
    let reply = scanned.map(|_| json!({ "term": term, "apps": dockyard.search(term) }));
    print_reply(&reply)
}

fn event_json(event: &DiscoveryEvent) -> Value {
    json!({
        "kind": event.kind(),
        "scanId": event.scan_id(),
        "apps": event.apps(),
    })
}

fn print_reply<T: Serialize>(result: &AppResult<T>) -> ExitCode {
    if let Err(error) = result {
        tracing::warn!(
            event = "cli_command_failed",
            error_code = error.code.as_str(),
            error_detail = error.to_string()
        );
    }
    print_value(&reply_json(result));
    exit_code(result.is_ok())
}

fn print_value(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(rendered) => println!("{rendered}"),
        Err(error) => eprintln!("render reply failed: {error}"),
    }
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
