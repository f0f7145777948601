mod config;
mod logging;

pub use logging::{LoggingGuard, cleanup_expired_logs, init_logging, resolve_log_level};
