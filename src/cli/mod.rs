mod app;
mod commands;

pub use app::build_cli;
pub use commands::run_command;
