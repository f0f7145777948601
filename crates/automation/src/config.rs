use std::time::Duration;

pub const DEFAULT_MENU_SEPARATOR: &str = " > ";
pub const DEFAULT_MAX_MENU_DEPTH: usize = 4;
pub const DEFAULT_MENU_BAR_OFFSET: i32 = 25;
pub const DEFAULT_SCRIPT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq)]
pub struct AutomationConfig {
    pub menu_separator: String,
    /// Breadcrumb components kept, menu bar item included.
    pub max_menu_depth: usize,
    pub menu_bar_offset: i32,
    pub center_width_fraction: f64,
    pub center_height_fraction: f64,
    pub script_timeout: Duration,
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            menu_separator: DEFAULT_MENU_SEPARATOR.to_string(),
            max_menu_depth: DEFAULT_MAX_MENU_DEPTH,
            menu_bar_offset: DEFAULT_MENU_BAR_OFFSET,
            center_width_fraction: 0.7,
            center_height_fraction: 0.8,
            script_timeout: DEFAULT_SCRIPT_TIMEOUT,
        }
    }
}
