pub mod bridge;
pub mod config;
pub mod geometry;
pub mod menus;
mod reply;
pub mod runner;
pub mod scripts;
pub mod windows;

pub use bridge::AutomationBridge;
pub use config::AutomationConfig;
pub use geometry::target_rect;
pub use menus::{join_menu_path, split_menu_path};
pub use runner::{AutomationPhase, AutomationScript, OsascriptRunner, ScriptRunner};
