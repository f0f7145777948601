use crate::config::AutomationConfig;
use crate::runner::{ScriptRunner, execute_script};
use crate::scripts::{self, MenuStep};
use dockyard_protocol::models::{MenuItemDescriptor, MenuItemsDto};
use dockyard_protocol::{AppError, AppResult};
use serde::Deserialize;

pub const CODE_INVALID_MENU_PATH: &str = "invalid_menu_path";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MenuTree {
    pub(crate) app_name: String,
    #[serde(default)]
    pub(crate) items: Vec<MenuNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MenuNode {
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) enabled: Option<bool>,
    #[serde(default)]
    pub(crate) has_sub_menu: bool,
    #[serde(default)]
    pub(crate) children: Vec<MenuNode>,
}

pub fn split_menu_path(path: &str, separator: &str) -> Vec<String> {
    path.split(separator).map(ToString::to_string).collect()
}

pub fn join_menu_path<S: AsRef<str>>(components: &[S], separator: &str) -> String {
    components
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(separator)
}

/// Menu items of the frontmost application as executable breadcrumbs.
pub fn list_menu_items(
    runner: &dyn ScriptRunner,
    config: &AutomationConfig,
) -> AppResult<MenuItemsDto> {
    let depth = config.max_menu_depth;
    let tree = execute_script::<MenuTree, _>(runner, "get_menu_items", || scripts::menu_tree(depth))?;
    let menu_items = flatten_menu_tree(&tree.items, config);
    tracing::debug!(
        event = "menu_items_listed",
        app_name = tree.app_name.as_str(),
        total_items = menu_items.len()
    );
    Ok(MenuItemsDto {
        app_name: tree.app_name,
        menu_items,
    })
}

/// Menu bar items are roots only; every emitted path has at least two components.
pub(crate) fn flatten_menu_tree(
    bar_items: &[MenuNode],
    config: &AutomationConfig,
) -> Vec<MenuItemDescriptor> {
    let mut flattened = Vec::new();
    for bar_item in bar_items {
        let mut ancestors = vec![bar_item.name.as_str()];
        if !is_addressable(&ancestors, config) {
            continue;
        }
        collect_items(&bar_item.children, &mut ancestors, config, &mut flattened);
    }
    flattened
}

fn collect_items<'a>(
    nodes: &'a [MenuNode],
    ancestors: &mut Vec<&'a str>,
    config: &AutomationConfig,
    flattened: &mut Vec<MenuItemDescriptor>,
) {
    if ancestors.len() >= config.max_menu_depth {
        return;
    }
    for node in nodes {
        ancestors.push(node.name.as_str());
        if !is_addressable(ancestors.as_slice(), config) {
            ancestors.pop();
            continue;
        }
        flattened.push(MenuItemDescriptor {
            name: node.name.clone(),
            path: join_menu_path(ancestors.as_slice(), &config.menu_separator),
            has_sub_menu: node.has_sub_menu || !node.children.is_empty(),
            enabled: node.enabled.unwrap_or(true),
        });
        collect_items(&node.children, ancestors, config, flattened);
        ancestors.pop();
    }
}

/// The breadcrumb for `components` must split back into exactly `components`.
pub(crate) fn is_addressable(components: &[&str], config: &AutomationConfig) -> bool {
    if components.iter().any(|name| name.trim().is_empty()) {
        return false;
    }
    let joined = join_menu_path(components, &config.menu_separator);
    split_menu_path(&joined, &config.menu_separator)
        .iter()
        .map(String::as_str)
        .eq(components.iter().copied())
}

/// Clicks the item at `path`; a missing step is `menu_item_not_found` and nothing is clicked.
pub fn execute_menu_item(
    runner: &dyn ScriptRunner,
    config: &AutomationConfig,
    path: &str,
) -> AppResult<()> {
    let steps = menu_steps(path, config)?;
    execute_script::<bool, _>(runner, "execute_menu_item", || scripts::click_menu_path(&steps))?;
    tracing::info!(event = "menu_item_executed", depth = steps.len());
    Ok(())
}

pub(crate) fn menu_steps(path: &str, config: &AutomationConfig) -> AppResult<Vec<MenuStep>> {
    let components = split_menu_path(path, &config.menu_separator);
    if components.len() < 2 || components.iter().any(|component| component.trim().is_empty()) {
        return Err(
            AppError::new(CODE_INVALID_MENU_PATH, "menu path needs a menu and an item")
                .with_context("path", path)
                .with_context("components", components.len().to_string()),
        );
    }

    Ok(components
        .into_iter()
        .enumerate()
        .map(|(index, name)| {
            if index == 0 {
                MenuStep::MenuBarItem(name)
            } else {
                MenuStep::MenuItem(name)
            }
        })
        .collect())
}

#[cfg(test)]
#[path = "../tests/menus/menus_tests.rs"]
mod tests;
