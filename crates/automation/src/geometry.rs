use crate::config::AutomationConfig;
use dockyard_protocol::models::{ScreenBounds, WindowAction, WindowRect};

/// Target frame for `action` on a usable area of `width x height` below the menu bar.
pub fn target_rect(bounds: ScreenBounds, action: WindowAction, config: &AutomationConfig) -> WindowRect {
    let width = bounds.width.max(0);
    let height = bounds.height.max(0);
    let offset = config.menu_bar_offset;

    match action {
        WindowAction::LeftHalf => WindowRect {
            x: 0,
            y: offset,
            width: width / 2,
            height,
        },
        WindowAction::RightHalf => WindowRect {
            x: width / 2,
            y: offset,
            width: width - width / 2,
            height,
        },
        WindowAction::Maximize => WindowRect {
            x: 0,
            y: offset,
            width,
            height,
        },
        WindowAction::Center => {
            let center_width = scale(width, config.center_width_fraction);
            let center_height = scale(height, config.center_height_fraction);
            WindowRect {
                x: (width - center_width) / 2,
                y: offset + (height - center_height) / 2,
                width: center_width,
                height: center_height,
            }
        }
    }
}

fn scale(length: i32, fraction: f64) -> i32 {
    (f64::from(length) * fraction.clamp(0.0, 1.0)).floor() as i32
}

#[cfg(test)]
#[path = "../tests/geometry/geometry_tests.rs"]
mod tests;
