// Tab context menu: the close variants offered on right click.

use serde::{Deserialize, Serialize};

use super::navigation::Router;
use super::tabs::TabRegistry;
use crate::error::TabResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TabAction {
    Close,
    CloseOthers,
    CloseRight,
    CloseLeft,
    CloseAll,
}

impl TabAction {
    pub const ALL: [TabAction; 5] = [
        TabAction::Close,
        TabAction::CloseOthers,
        TabAction::CloseRight,
        TabAction::CloseLeft,
        TabAction::CloseAll,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TabAction::Close => "Close",
            TabAction::CloseOthers => "Close Others",
            TabAction::CloseRight => "Close to Right",
            TabAction::CloseLeft => "Close to Left",
            TabAction::CloseAll => "Close All",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            TabAction::Close => "pi pi-times",
            TabAction::CloseOthers => "pi pi-fw pi-copy",
            TabAction::CloseRight => "pi pi-fw pi-arrow-right",
            TabAction::CloseLeft => "pi pi-fw pi-arrow-left",
            TabAction::CloseAll => "pi pi-fw pi-trash",
        }
    }

    /// Runs the action against the tab at `index`.
    pub fn apply<R: Router>(self, registry: &mut TabRegistry<R>, index: usize) -> TabResult<()> {
        match self {
            TabAction::Close => registry.remove_tab(index),
            TabAction::CloseOthers => registry.close_other(index),
            TabAction::CloseRight => registry.close_right(index),
            TabAction::CloseLeft => registry.close_left(index),
            TabAction::CloseAll => {
                registry.close_all();
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextMenuItem {
    pub label: String,
    pub icon: String,
    pub action: TabAction,
    pub index: usize,
}

/// Menu entries for a right click on the tab at `index`.
pub fn context_menu(index: usize) -> Vec<ContextMenuItem> {
    TabAction::ALL
        .iter()
        .map(|&action| ContextMenuItem {
            label: action.label().to_string(),
            icon: action.icon().to_string(),
            action,
            index,
        })
        .collect()
}
