// Shared state structs to avoid circular dependencies.
// These are used by the registry, the commands layer and main.rs.

use serde::{Deserialize, Serialize};

use crate::modules::navigation::RouteTarget;
use crate::modules::route_cache::{RetentionPolicy, RouteCache};
use crate::modules::router::{MemoryRouter, RouteConfig};
use crate::modules::tabs::TabRegistry;
use crate::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TabId(pub u64);

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    pub id: TabId,
    pub label: String,
    #[serde(rename = "routerLink")]
    pub target: RouteTarget,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// A navigable menu entry, the input to `TabRegistry::add_tab`.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NavItem {
    pub label: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub router_link: Option<RouteTarget>,
}

impl NavItem {
    pub fn new(label: impl Into<String>, target: impl Into<RouteTarget>) -> Self {
        Self {
            label: label.into(),
            icon: None,
            router_link: Some(target.into()),
        }
    }

    /// The target, if it can be navigated to at all.
    pub fn target(&self) -> Option<&RouteTarget> {
        self.router_link.as_ref().filter(|t| !t.is_empty())
    }
}

/// Open tabs plus the active selection, published as one value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TabStrip {
    pub tabs: Vec<Tab>,
    pub active: Option<usize>,
}

impl TabStrip {
    pub fn active_tab(&self) -> Option<&Tab> {
        self.active.and_then(|i| self.tabs.get(i))
    }

    /// `-1` when nothing is active, as the tab strip UI expects.
    pub fn active_index_or_sentinel(&self) -> i64 {
        self.active.map_or(-1, |i| i as i64)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TabsPayload {
    pub tabs: Vec<Tab>,
    pub active_tab_index: i64,
    pub current_url: String,
}

impl TabsPayload {
    pub fn new(strip: &TabStrip, current_url: String) -> Self {
        Self {
            tabs: strip.tabs.clone(),
            active_tab_index: strip.active_index_or_sentinel(),
            current_url,
        }
    }
}

/// One registry + cache + router per application session.
pub struct AppState {
    pub settings: Settings,
    pub registry: TabRegistry<MemoryRouter>,
}

impl AppState {
    pub fn new(settings: Settings, routes: Vec<RouteConfig>) -> Self {
        let cache = RouteCache::shared(RetentionPolicy::from(&settings));
        let router = MemoryRouter::new(routes, cache.clone());
        let registry = TabRegistry::new(router, cache);
        Self { settings, registry }
    }

    pub fn payload(&self) -> TabsPayload {
        TabsPayload::new(self.registry.strip(), self.registry.router().url().to_string())
    }
}
