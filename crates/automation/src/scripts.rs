//! JavaScript-for-Automation sources. Every script prints exactly one JSON envelope:
//! `{"status":"ok","data":...}` or `{"status":"error","code":...,"message":...}`.
//!
//! Dynamic values are spliced in as JSON literals only.

use crate::runner::AutomationScript;
use dockyard_protocol::models::WindowRect;
use serde_json::Value;

const PRELUDE: &str = r#"function reply(data) {
  return JSON.stringify({ status: "ok", data: data });
}
function fail(code, message) {
  return JSON.stringify({ status: "error", code: code, message: message });
}
function frontmostProcess(events) {
  const front = events.processes.whose({ frontmost: true })();
  return front.length > 0 ? front[0] : null;
}
function readOr(read, fallback) {
  try {
    const value = read();
    return value === undefined || value === null ? fallback : value;
  } catch (error) {
    return fallback;
  }
}
"#;

const LIST_WINDOWS_BODY: &str = r#"function run() {
  try {
    const events = Application("System Events");
    const windows = [];
    for (const proc of events.processes.whose({ visible: true })()) {
      const appName = readOr(() => proc.name(), "");
      for (const win of readOr(() => proc.windows(), [])) {
        const title = readOr(() => win.name(), "");
        if (!title) continue;
        const position = readOr(() => win.position(), [0, 0]);
        const size = readOr(() => win.size(), [0, 0]);
        const minimized = readOr(() => win.attributes.byName("AXMinimized").value(), false);
        windows.push({
          appName: appName,
          title: String(title),
          x: Math.round(Number(position[0]) || 0),
          y: Math.round(Number(position[1]) || 0),
          width: Math.round(Number(size[0]) || 0),
          height: Math.round(Number(size[1]) || 0),
          isMinimized: minimized === true
        });
      }
    }
    return reply(windows);
  } catch (error) {
    return fail("automation_failed", String(error));
  }
}
"#;

const SCREEN_BOUNDS_BODY: &str = r#"ObjC.import("AppKit");
function run() {
  const screen = $.NSScreen.mainScreen;
  if (!screen || screen.isNil()) return fail("screen_not_found", "not found");
  const frame = screen.visibleFrame;
  return reply({ width: Math.floor(frame.size.width), height: Math.floor(frame.size.height) });
}
"#;

const RESIZE_FRONTMOST_BODY: &str = r#"function run() {
  try {
    const proc = frontmostProcess(Application("System Events"));
    if (!proc) return fail("no_frontmost_process", "no frontmost process");
    const windows = proc.windows();
    if (windows.length === 0) return fail("window_not_found", "not found");
    windows[0].position = [__X__, __Y__];
    windows[0].size = [__WIDTH__, __HEIGHT__];
    return reply(true);
  } catch (error) {
    return fail("automation_failed", String(error));
  }
}
"#;

const WINDOW_BY_TITLE_BODY: &str = r#"const TARGET_TITLE = __TITLE__;
function run() {
  try {
    const events = Application("System Events");
    for (const proc of events.processes.whose({ visible: true })()) {
      for (const win of readOr(() => proc.windows(), [])) {
        if (readOr(() => win.name(), null) !== TARGET_TITLE) continue;
__ACTION__
        return reply(true);
      }
    }
    return fail("window_not_found", "not found");
  } catch (error) {
    return fail("automation_failed", String(error));
  }
}
"#;

const MINIMIZE_ACTION: &str = r#"        win.attributes.byName("AXMinimized").value = true;"#;
const FOCUS_ACTION: &str = r#"        proc.frontmost = true;
        win.actions.byName("AXRaise").perform();"#;

const MENU_TREE_BODY: &str = r#"const MAX_DEPTH = __MAX_DEPTH__;
function readMenu(menu, depth) {
  const items = [];
  for (const item of readOr(() => menu.menuItems(), [])) {
    const name = readOr(() => item.name(), "");
    if (!name) continue;
    const enabled = readOr(() => item.enabled(), true);
    const menus = readOr(() => item.menus(), []);
    const hasSubMenu = menus.length > 0;
    const children = hasSubMenu && depth < MAX_DEPTH ? readMenu(menus[0], depth + 1) : [];
    items.push({ name: String(name), enabled: enabled !== false, hasSubMenu: hasSubMenu, children: children });
  }
  return items;
}
function run() {
  try {
    const proc = frontmostProcess(Application("System Events"));
    if (!proc) return fail("no_frontmost_process", "no frontmost process");
    const items = [];
    for (const barItem of readOr(() => proc.menuBars[0].menuBarItems(), [])) {
      const name = readOr(() => barItem.name(), "");
      if (!name) continue;
      const menus = readOr(() => barItem.menus(), []);
      const children = menus.length > 0 ? readMenu(menus[0], 2) : [];
      items.push({ name: String(name), enabled: true, hasSubMenu: true, children: children });
    }
    return reply({ appName: String(readOr(() => proc.name(), "")), items: items });
  } catch (error) {
    return fail("automation_failed", String(error));
  }
}
"#;

const CLICK_MENU_HEAD: &str = r#"function run() {
  try {
    const proc = frontmostProcess(Application("System Events"));
    if (!proc) return fail("no_frontmost_process", "no frontmost process");
"#;

const CLICK_MENU_TAIL: &str = r#"  } catch (error) {
    return fail("automation_failed", String(error));
  }
}
"#;

/// One hop of a menu path: the menu bar item first, then nested menu items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuStep {
    MenuBarItem(String),
    MenuItem(String),
}

impl MenuStep {
    pub fn name(&self) -> &str {
        match self {
            Self::MenuBarItem(name) | Self::MenuItem(name) => name.as_str(),
        }
    }
}

pub fn js_string(value: &str) -> String {
    Value::String(value.to_string()).to_string()
}

fn with_prelude(label: &'static str, body: &str) -> AutomationScript {
    AutomationScript::new(label, format!("{PRELUDE}{body}"))
}

pub fn list_windows() -> AutomationScript {
    with_prelude("list_windows", LIST_WINDOWS_BODY)
}

pub fn screen_bounds() -> AutomationScript {
    with_prelude("screen_bounds", SCREEN_BOUNDS_BODY)
}

pub fn resize_frontmost(rect: WindowRect) -> AutomationScript {
    let body = RESIZE_FRONTMOST_BODY
        .replace("__X__", &rect.x.to_string())
        .replace("__Y__", &rect.y.to_string())
        .replace("__WIDTH__", &rect.width.to_string())
        .replace("__HEIGHT__", &rect.height.to_string());
    with_prelude("resize_window", &body)
}

pub fn minimize_window(title: &str) -> AutomationScript {
    window_by_title("minimize_window", title, MINIMIZE_ACTION)
}

pub fn focus_window(title: &str) -> AutomationScript {
    window_by_title("focus_window", title, FOCUS_ACTION)
}

fn window_by_title(label: &'static str, title: &str, action: &str) -> AutomationScript {
    // The action goes in first so a title containing a placeholder stays inert.
    let body = WINDOW_BY_TITLE_BODY
        .replace("__ACTION__", action)
        .replace("__TITLE__", &js_string(title));
    with_prelude(label, &body)
}

pub fn menu_tree(max_depth: usize) -> AutomationScript {
    let body = MENU_TREE_BODY.replace("__MAX_DEPTH__", &max_depth.max(1).to_string());
    with_prelude("menu_tree", &body)
}

/// Each step opens one nested scope that bails out with `menu_item_not_found`;
/// the click only happens in the innermost scope, after every lookup succeeded.
pub fn click_menu_path(steps: &[MenuStep]) -> AutomationScript {
    let mut body = String::from(CLICK_MENU_HEAD);
    let mut depth = 2usize;
    let mut parent = String::from("proc.menuBars[0]");
    for (index, step) in steps.iter().enumerate() {
        let indent = "  ".repeat(depth);
        let lookup = match step {
            MenuStep::MenuBarItem(name) => {
                format!("{parent}.menuBarItems.byName({})", js_string(name))
            }
            MenuStep::MenuItem(name) => {
                format!("{parent}.menus[0].menuItems.byName({})", js_string(name))
            }
        };
        body.push_str(&format!("{indent}{{\n"));
        body.push_str(&format!("{indent}  const step{index} = {lookup};\n"));
        body.push_str(&format!(
            "{indent}  if (!step{index}.exists()) return fail(\"menu_item_not_found\", \"not found\");\n"
        ));
        parent = format!("step{index}");
        depth += 1;
    }

    let indent = "  ".repeat(depth);
    if let Some(last) = steps.len().checked_sub(1) {
        body.push_str(&format!(
            "{indent}if (readOr(() => step{last}.enabled(), true) === false) return fail(\"menu_item_disabled\", \"menu item disabled\");\n"
        ));
        body.push_str(&format!("{indent}step{last}.click();\n"));
    }
    body.push_str(&format!("{indent}return reply(true);\n"));
    for level in (2..depth).rev() {
        body.push_str(&format!("{}}}\n", "  ".repeat(level)));
    }
    body.push_str(CLICK_MENU_TAIL);
    with_prelude("click_menu_path", &body)
}

#[cfg(test)]
#[path = "../tests/scripts/scripts_tests.rs"]
mod tests;
