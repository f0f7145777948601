pub mod cache;
pub mod config;
pub mod container;
pub mod icon;
pub mod launch;
mod naming;
pub mod plist;
pub mod scan;
pub mod scheduler;

pub use cache::{DiscoveryCache, Observer, Subscription};
pub use config::DiscoveryConfig;
pub use container::decode_icon_container;
pub use icon::{FileIconProvider, IconResolver, NoFileIconProvider, SystemFileIconProvider};
pub use launch::{launch_application, open_bundle};
pub use scan::{scan_applications, scan_roots};
pub use scheduler::{BatchRunSummary, DiscoveryEvent, IconBatchScheduler, IconSource};

pub(crate) const BUNDLE_EXTENSION: &str = "app";
pub(crate) const CONTAINER_EXTENSION: &str = "icns";
