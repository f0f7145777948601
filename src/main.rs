use dockyard_lib::cli::{build_cli, run_command};
use dockyard_lib::default_log_dir;
use std::path::PathBuf;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let matches = build_cli().get_matches();
    let log_dir = matches
        .get_one::<PathBuf>("log-dir")
        .cloned()
        .unwrap_or_else(default_log_dir);

    match dockyard_logging::init_logging(&log_dir) {
        Ok(guard) => tracing::info!(
            event = "app_startup",
            log_dir = %guard.log_dir().display(),
            log_level = guard.level()
        ),
        Err(error) => eprintln!("logging disabled: {error}"),
    }

    run_command(&matches).await
}
