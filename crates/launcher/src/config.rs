use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BATCH_SIZE: usize = 3;
pub const DEFAULT_INITIAL_DELAY_MS: u64 = 100;
pub const DEFAULT_BATCH_DELAY_MS: u64 = 50;
pub const DEFAULT_QUICK_ACTION_LIMIT: usize = 10;
pub const DEFAULT_CHANNEL_CAPACITY: usize = 32;

const ENV_BATCH_SIZE: &str = "DOCKYARD_ICON_BATCH_SIZE";
const ENV_BATCH_DELAY_MS: &str = "DOCKYARD_ICON_BATCH_DELAY_MS";
const ENV_INITIAL_DELAY_MS: &str = "DOCKYARD_ICON_INITIAL_DELAY_MS";
const ENV_QUICK_ACTION_LIMIT: &str = "DOCKYARD_QUICK_ACTION_LIMIT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryConfig {
    /// Visited in order; on duplicate bundle paths the earlier root wins.
    pub roots: Vec<PathBuf>,
    pub batch_size: usize,
    pub initial_delay: Duration,
    pub batch_delay: Duration,
    pub quick_action_limit: usize,
    pub channel_capacity: usize,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            roots: default_roots(),
            batch_size: DEFAULT_BATCH_SIZE,
            initial_delay: Duration::from_millis(DEFAULT_INITIAL_DELAY_MS),
            batch_delay: Duration::from_millis(DEFAULT_BATCH_DELAY_MS),
            quick_action_limit: DEFAULT_QUICK_ACTION_LIMIT,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl DiscoveryConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            batch_size: parse_clamped(lookup(ENV_BATCH_SIZE), 1, 32)
                .map(|value| value as usize)
                .unwrap_or(defaults.batch_size),
            batch_delay: parse_clamped(lookup(ENV_BATCH_DELAY_MS), 0, 10_000)
                .map(Duration::from_millis)
                .unwrap_or(defaults.batch_delay),
            initial_delay: parse_clamped(lookup(ENV_INITIAL_DELAY_MS), 0, 10_000)
                .map(Duration::from_millis)
                .unwrap_or(defaults.initial_delay),
            quick_action_limit: parse_clamped(lookup(ENV_QUICK_ACTION_LIMIT), 1, 100)
                .map(|value| value as usize)
                .unwrap_or(defaults.quick_action_limit),
            ..defaults
        }
    }

    pub fn with_roots(mut self, roots: Vec<PathBuf>) -> Self {
        self.roots = roots;
        self
    }

    pub fn without_delays(mut self) -> Self {
        self.initial_delay = Duration::ZERO;
        self.batch_delay = Duration::ZERO;
        self
    }
}

/// System apps, main apps, then per-user apps.
pub fn default_roots() -> Vec<PathBuf> {
    let mut roots = vec![
        PathBuf::from("/System/Applications"),
        PathBuf::from("/Applications"),
    ];
    if let Some(home) = dockyard_kernel::platform::home_dir() {
        roots.push(home.join("Applications"));
    }
    roots
}

fn parse_clamped(value: Option<String>, min: u64, max: u64) -> Option<u64> {
    value
        .and_then(|raw| raw.trim().parse::<u64>().ok())
        .map(|parsed| parsed.clamp(min, max))
}

#[cfg(test)]
#[path = "../tests/config/config_tests.rs"]
mod tests;
