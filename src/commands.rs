// UI-facing commands. One JSON object per user interaction, dispatched against
// the session's AppState; navigations are completed before the reply is built.

use serde::{Deserialize, Serialize};

use crate::modules::context_menu::{context_menu, ContextMenuItem, TabAction};
use crate::modules::hidden_tabs::{hidden_tabs, HiddenTab, Span};
use crate::modules::navigation::{RouteTarget, Router};
use crate::state::{AppState, NavItem, TabId, TabsPayload};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum Command {
    /// A menu item was clicked: open (or select) its tab and navigate.
    Open { item: NavItem },
    Select { index: usize },
    Close { index: usize },
    CloseOthers { index: usize },
    CloseLeft { index: usize },
    CloseRight { index: usize },
    CloseAll,
    Reorder { from: usize, to: usize },
    SyncOrder { order: Vec<TabId> },
    /// Navigation that bypasses the tab strip (links, address bar).
    Navigate { url: String },
    Back,
    Forward,
    Menu { index: usize },
    Hidden { container: Span, tabs: Vec<Span> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum Reply {
    UpdateTabs(TabsPayload),
    ContextMenu { items: Vec<ContextMenuItem> },
    HiddenTabs { items: Vec<HiddenTab> },
    Error { message: String },
}

impl AppState {
    pub fn dispatch(&mut self, command: Command) -> Reply {
        let result = self.apply(command);
        self.settle();
        match result {
            Ok(Some(reply)) => reply,
            Ok(None) => Reply::UpdateTabs(self.payload()),
            Err(message) => Reply::Error { message },
        }
    }

    fn apply(&mut self, command: Command) -> Result<Option<Reply>, String> {
        let registry = &mut self.registry;
        let tab_result = match command {
            Command::Open { item } => {
                let target = item.target().cloned();
                registry.add_tab(&item);
                if let Some(target) = target {
                    registry.router_mut().navigate(&target);
                }
                Ok(())
            }
            Command::Select { index } => registry.select_tab(index),
            Command::Close { index } => TabAction::Close.apply(registry, index),
            Command::CloseOthers { index } => TabAction::CloseOthers.apply(registry, index),
            Command::CloseLeft { index } => TabAction::CloseLeft.apply(registry, index),
            Command::CloseRight { index } => TabAction::CloseRight.apply(registry, index),
            Command::CloseAll => TabAction::CloseAll.apply(registry, 0),
            Command::Reorder { from, to } => registry.reorder_tabs(from, to),
            Command::SyncOrder { order } => {
                registry.sync_order(&order);
                Ok(())
            }
            Command::Navigate { url } => {
                registry.router_mut().navigate_by_url(&url);
                Ok(())
            }
            Command::Back => {
                registry.router_mut().back();
                Ok(())
            }
            Command::Forward => {
                registry.router_mut().forward();
                Ok(())
            }
            Command::Menu { index } => {
                if index >= registry.len() {
                    return Err(format!("no tab at index {}", index));
                }
                return Ok(Some(Reply::ContextMenu { items: context_menu(index) }));
            }
            Command::Hidden { container, tabs } => {
                let items = hidden_tabs(
                    registry.strip(),
                    container,
                    &tabs,
                    &self.settings.all_tabs_visible_label,
                );
                return Ok(Some(Reply::HiddenTabs { items }));
            }
        };
        tab_result.map(|()| None).map_err(|e| e.to_string())
    }

    /// Completes queued navigations in order, feeding each to the registry.
    pub fn settle(&mut self) {
        while let Some(result) = self.registry.router_mut().process_next() {
            match result {
                Ok(event) => self.registry.on_navigation_end(&event),
                Err(e) => log::warn!("[Router] Navigation failed: {}", e),
            }
        }
    }

    /// Initial navigation to the home view.
    pub fn start(&mut self) {
        let home = RouteTarget::from(self.settings.home_path.as_str());
        self.registry.router_mut().navigate(&home);
        self.settle();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::router::admin_routes;
    use crate::settings::Settings;

    fn app() -> AppState {
        let mut app = AppState::new(Settings::default(), admin_routes());
        app.start();
        app
    }

    fn cmd(json: &str) -> Command {
        serde_json::from_str(json).unwrap()
    }

    fn open(app: &mut AppState, name: &str) -> TabsPayload {
        let json = format!(
            r#"{{"cmd":"open","item":{{"label":"{0}","routerLink":["/management/{0}"]}}}}"#,
            name
        );
        match app.dispatch(cmd(&json)) {
            Reply::UpdateTabs(payload) => payload,
            other => panic!("unexpected reply {:?}", other),
        }
    }

    fn leaf_id(app: &AppState) -> u64 {
        app.registry.router().leaf_view().unwrap().id
    }

    #[test]
    fn test_start_lands_on_dashboard() {
        let app = app();
        assert_eq!(app.registry.router().url(), "/");
        assert_eq!(app.registry.router().leaf_view().unwrap().component, "Dashboard");
        assert_eq!(app.payload().active_tab_index, -1);
    }

    #[test]
    fn test_open_navigates_and_activates() {
        let mut app = app();
        open(&mut app, "menu");
        let payload = open(&mut app, "user");
        assert_eq!(payload.current_url, "/management/user");
        assert_eq!(payload.active_tab_index, 1);
        assert_eq!(payload.tabs.len(), 2);
    }

    #[test]
    fn test_switching_tabs_reattaches_views() {
        let mut app = app();
        open(&mut app, "menu");
        let menu_view = leaf_id(&app);
        open(&mut app, "user");

        app.dispatch(cmd(r#"{"cmd":"select","index":0}"#));
        assert_eq!(leaf_id(&app), menu_view);
        assert_eq!(app.payload().active_tab_index, 0);
    }

    #[test]
    fn test_closed_tab_gets_a_fresh_view() {
        let mut app = app();
        open(&mut app, "menu");
        let menu_view = leaf_id(&app);
        open(&mut app, "user");

        app.dispatch(cmd(r#"{"cmd":"close","index":0}"#));
        assert!(!app.registry.cache().borrow().contains("/management/menu"));

        open(&mut app, "menu");
        assert_ne!(leaf_id(&app), menu_view);
    }

    #[test]
    fn test_closing_active_tab_leaves_no_orphan() {
        let mut app = app();
        open(&mut app, "menu");
        open(&mut app, "user");

        // user is active; closing it navigates to menu and detaches user on the way out
        let reply = app.dispatch(cmd(r#"{"cmd":"close","index":1}"#));
        match reply {
            Reply::UpdateTabs(payload) => assert_eq!(payload.current_url, "/management/menu"),
            other => panic!("unexpected reply {:?}", other),
        }
        let cache = app.registry.cache().borrow();
        assert!(!cache.contains("/management/user"));
    }

    #[test]
    fn test_back_reselects_tab() {
        let mut app = app();
        open(&mut app, "menu");
        open(&mut app, "organization");
        app.dispatch(Command::Back);
        assert_eq!(app.payload().active_tab_index, 0);
        app.dispatch(Command::Forward);
        assert_eq!(app.payload().active_tab_index, 1);
    }

    #[test]
    fn test_external_navigation_keeps_selection() {
        let mut app = app();
        open(&mut app, "menu");
        app.dispatch(cmd(r#"{"cmd":"navigate","url":"/management/user"}"#));
        let payload = app.payload();
        assert_eq!(payload.current_url, "/management/user");
        assert_eq!(payload.active_tab_index, 0);

        // leaving the untabbed view must not leave it retained
        app.dispatch(cmd(r#"{"cmd":"select","index":0}"#));
        assert!(!app.registry.cache().borrow().contains("/management/user"));
    }

    #[test]
    fn test_close_all_returns_home() {
        let mut app = app();
        open(&mut app, "menu");
        open(&mut app, "user");
        app.dispatch(Command::CloseAll);
        let payload = app.payload();
        assert!(payload.tabs.is_empty());
        assert_eq!(payload.active_tab_index, -1);
        assert_eq!(payload.current_url, "/");
        assert!(app.registry.cache().borrow().is_empty());
    }

    #[test]
    fn test_invalid_index_is_reported() {
        let mut app = app();
        open(&mut app, "menu");
        let reply = app.dispatch(cmd(r#"{"cmd":"select","index":5}"#));
        assert_eq!(
            reply,
            Reply::Error { message: "tab index 5 out of range (open tabs: 1)".to_string() }
        );
        assert!(matches!(app.dispatch(Command::Menu { index: 1 }), Reply::Error { .. }));
    }

    #[test]
    fn test_close_right_past_the_end_changes_nothing() {
        let mut app = app();
        open(&mut app, "menu");
        match app.dispatch(cmd(r#"{"cmd":"close_right","index":18446744073709551615}"#)) {
            Reply::UpdateTabs(payload) => {
                assert_eq!(payload.tabs.len(), 1);
                assert_eq!(payload.active_tab_index, 0);
                assert_eq!(payload.current_url, "/management/menu");
            }
            other => panic!("unexpected reply {:?}", other),
        }
    }

    #[test]
    fn test_menu_and_hidden_replies() {
        let mut app = app();
        open(&mut app, "menu");
        open(&mut app, "user");

        match app.dispatch(Command::Menu { index: 0 }) {
            Reply::ContextMenu { items } => assert_eq!(items.len(), 5),
            other => panic!("unexpected reply {:?}", other),
        }

        let hidden = cmd(concat!(
            r#"{"cmd":"hidden","container":{"left":0,"right":150},"#,
            r#""tabs":[{"left":0,"right":100},{"left":100,"right":200}]}"#,
        ));
        match app.dispatch(hidden) {
            Reply::HiddenTabs { items } => {
                assert_eq!(items.len(), 1);
                assert_eq!(items[0].label, "user");
                assert!(items[0].active);
            }
            other => panic!("unexpected reply {:?}", other),
        }
    }

    #[test]
    fn test_reply_json_shape() {
        let app = app();
        let json = serde_json::to_value(Reply::UpdateTabs(app.payload())).unwrap();
        assert_eq!(json["event"], "update-tabs");
        assert_eq!(json["activeTabIndex"], -1);
    }
}
