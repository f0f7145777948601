pub mod cli;
mod service;

pub use dockyard_automation::{AutomationBridge, AutomationConfig};
pub use dockyard_launcher::{DiscoveryConfig, DiscoveryEvent, Observer, Subscription};
pub use dockyard_protocol::models;
pub use dockyard_protocol::{AppError, AppResult};
pub use service::{Dockyard, ScanCompletion, ScanHandle, ScanSummary};

use std::path::PathBuf;

/// `~/.dockyard/logs`, else a directory under the system temp dir.
pub fn default_log_dir() -> PathBuf {
    dockyard_kernel::platform::home_dir()
        .map(|home| home.join(".dockyard").join("logs"))
        .unwrap_or_else(|| std::env::temp_dir().join("dockyard-logs"))
}
