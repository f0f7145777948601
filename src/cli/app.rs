use clap::{Arg, ArgAction, Command};
use std::path::PathBuf;

pub fn build_cli() -> Command {
    Command::new("dockyard")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Discover installed applications and drive window/menu automation")
        .arg(
            Arg::new("log-dir")
                .long("log-dir")
                .help("Directory for rolling JSON log files")
                .value_parser(clap::value_parser!(PathBuf))
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("scan")
                .about("Scan application bundles and resolve their icons")
                .arg(root_arg())
                .arg(
                    Arg::new("events")
                        .long("events")
                        .help("Print every discovery event as one JSON line")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("search")
                .about("Scan, then search applications by name")
                .arg(
                    Arg::new("term")
                        .help("Case-insensitive name fragment; empty lists the quick actions")
                        .default_value(""),
                )
                .arg(root_arg()),
        )
        .subcommand(Command::new("windows").about("List titled windows of visible processes"))
        .subcommand(Command::new("menus").about("List menu items of the frontmost application"))
        .subcommand(
            Command::new("exec-menu")
                .about("Click a menu item by breadcrumb path, e.g. \"File > Save\"")
                .arg(Arg::new("path").required(true)),
        )
        .subcommand(
            Command::new("resize")
                .about("Move the frontmost window: left-half, right-half, maximize, center")
                .arg(Arg::new("action").required(true)),
        )
        .subcommand(
            Command::new("minimize")
                .about("Minimize the first window with this exact title")
                .arg(Arg::new("title").required(true)),
        )
        .subcommand(
            Command::new("focus")
                .about("Raise the first window with this exact title")
                .arg(Arg::new("title").required(true)),
        )
        .subcommand(
            Command::new("launch")
                .about("Open an application bundle")
                .arg(Arg::new("path").required(true)),
        )
}

fn root_arg() -> Arg {
    Arg::new("root")
        .long("root")
        .help("Scan this directory instead of the default roots (repeatable)")
        .value_parser(clap::value_parser!(PathBuf))
        .action(ArgAction::Append)
}

#[cfg(test)]
#[path = "../../tests/cli/app_tests.rs"]
mod tests;
