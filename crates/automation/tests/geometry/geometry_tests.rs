use super::*;

const SCREEN: ScreenBounds = ScreenBounds {
    width: 1441,
    height: 875,
};

fn rect(action: WindowAction) -> WindowRect {
    target_rect(SCREEN, action, &AutomationConfig::default())
}

#[test]
fn left_half_should_cover_left_column_below_menu_bar() {
    assert_eq!(
        rect(WindowAction::LeftHalf),
        WindowRect {
            x: 0,
            y: 25,
            width: 720,
            height: 875,
        }
    );
}

#[test]
fn right_half_should_complement_left_half() {
    let left = rect(WindowAction::LeftHalf);
    let right = rect(WindowAction::RightHalf);
    assert_eq!(right.x, left.width);
    assert_eq!(left.width + right.width, SCREEN.width);
    assert_eq!(right.y, 25);
    assert_eq!(right.height, SCREEN.height);
}

#[test]
fn maximize_should_fill_usable_area() {
    assert_eq!(
        rect(WindowAction::Maximize),
        WindowRect {
            x: 0,
            y: 25,
            width: 1441,
            height: 875,
        }
    );
}

#[test]
fn center_should_use_configured_fractions() {
    assert_eq!(
        rect(WindowAction::Center),
        WindowRect {
            x: 216,
            y: 25 + 87,
            width: 1008,
            height: 700,
        }
    );
}

#[test]
fn target_rect_should_be_deterministic_for_every_action() {
    for action in WindowAction::ALL {
        assert_eq!(rect(action), rect(action));
    }
}

#[test]
fn negative_bounds_should_clamp_to_zero() {
    let degenerate = ScreenBounds {
        width: -10,
        height: -10,
    };
    let maximized = target_rect(degenerate, WindowAction::Maximize, &AutomationConfig::default());
    assert_eq!((maximized.width, maximized.height), (0, 0));
}
