// Context menu model - the host's menu settings and the rotate-values toggle item
use super::dashboard::Dashboard;
use super::filter::Filter;
use serde::{Deserialize, Serialize};

/// Menu name the host uses for a dashboard filter's context menu.
pub const DASHBOARD_FILTER_MENU: &str = "dashboard-filter";
pub const ROTATE_FILTER_ITEM_ID: &str = "rotate-filter";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuScope {
    pub item: Filter,
    pub dashboard: Dashboard,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuSettings {
    pub name: String,
    #[serde(default)]
    pub items: Vec<MenuItem>,
    pub scope: MenuScope,
}

impl MenuSettings {
    pub fn dashboard_filter(filter: Filter, dashboard: Dashboard) -> Self {
        Self {
            name: DASHBOARD_FILTER_MENU.to_string(),
            items: Vec::new(),
            scope: MenuScope {
                item: filter,
                dashboard,
            },
        }
    }

    pub fn item(&self, id: &str) -> Option<&MenuItem> {
        self.items.iter().find(|item| item.id == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuItemKind {
    Toggle,
}

/// Arguments the host hands back to a menu command when it is evaluated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandArgs {
    pub filter: Filter,
    pub dashboard: Dashboard,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: MenuItemKind,
    pub command: RotateValuesCommand,
    #[serde(rename = "commandArgs")]
    pub command_args: CommandArgs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotateValuesCommand {
    pub title: String,
    pub desc: String,
}

impl Default for RotateValuesCommand {
    fn default() -> Self {
        Self {
            title: "Rotate Values".to_string(),
            desc: "Rotate the filter's selected value at an interval".to_string(),
        }
    }
}

impl RotateValuesCommand {
    /// Only dashboard owners may toggle, and only on single-select member filters.
    pub fn can_execute(&self, args: &CommandArgs) -> bool {
        args.dashboard.is_owned() && args.filter.is_single_select()
    }

    pub fn is_checked(&self, args: &CommandArgs) -> bool {
        args.filter
            .key()
            .is_some_and(|key| args.dashboard.is_rotating(&key))
    }
}

impl MenuItem {
    pub fn rotate_values(filter: Filter, dashboard: Dashboard) -> Self {
        Self {
            id: ROTATE_FILTER_ITEM_ID.to_string(),
            kind: MenuItemKind::Toggle,
            command: RotateValuesCommand::default(),
            command_args: CommandArgs { filter, dashboard },
        }
    }

    pub fn can_execute(&self) -> bool {
        self.command.can_execute(&self.command_args)
    }

    pub fn is_checked(&self) -> bool {
        self.command.is_checked(&self.command_args)
    }
}
