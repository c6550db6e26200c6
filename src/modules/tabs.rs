// Tab registry module - ordered open tabs + active selection.
// Every close invalidates the closed tab's retained view; navigation events keep
// the active index in step with the current URL.

use std::collections::HashMap;

use log::{debug, info, warn};

use super::navigation::{location_key, NavigationEnd, RouteTarget, Router};
use super::route_cache::SharedRouteCache;
use super::signal::{Signal, SubscriptionId};
use crate::error::{TabError, TabResult};
use crate::state::{NavItem, Tab, TabId, TabStrip};

pub struct TabRegistry<R: Router> {
    strip: Signal<TabStrip>,
    router: R,
    cache: SharedRouteCache<R::Handle>,
    next_id: u64,
}

impl<R: Router> TabRegistry<R> {
    pub fn new(router: R, cache: SharedRouteCache<R::Handle>) -> Self {
        Self {
            strip: Signal::new(TabStrip::default()),
            router,
            cache,
            next_id: 1,
        }
    }

    pub fn strip(&self) -> &TabStrip {
        self.strip.get()
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.strip.get().tabs
    }

    pub fn active_index(&self) -> Option<usize> {
        self.strip.get().active
    }

    pub fn len(&self) -> usize {
        self.tabs().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs().is_empty()
    }

    pub fn router(&self) -> &R {
        &self.router
    }

    pub fn router_mut(&mut self) -> &mut R {
        &mut self.router
    }

    pub fn cache(&self) -> &SharedRouteCache<R::Handle> {
        &self.cache
    }

    /// Observers get every published strip, synchronously.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&TabStrip) + 'static,
    {
        self.strip.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.strip.unsubscribe(id)
    }

    fn check(&self, index: usize) -> TabResult<()> {
        let len = self.len();
        if index < len {
            Ok(())
        } else {
            warn!("[Tabs] Rejected index {} (open tabs: {})", index, len);
            Err(TabError::IndexOutOfRange { index, len })
        }
    }

    fn publish(&mut self, strip: TabStrip) {
        debug_assert!(match strip.active {
            None => strip.tabs.is_empty(),
            Some(i) => i < strip.tabs.len(),
        });
        self.strip.set(strip);
    }

    fn tab_keys(&self, tabs: &[Tab]) -> Vec<String> {
        tabs.iter().map(|t| self.router.resolve(&t.target)).collect()
    }

    /// `open` are the tabs that stay; their views survive a suffix match.
    fn clear_tab_cache(&self, tab: &Tab, open: &[Tab]) {
        let key = self.router.resolve(&tab.target);
        let owned = self.tab_keys(open);
        self.cache.borrow_mut().invalidate_unowned(&key, &owned);
    }

    fn navigate(&mut self, target: &RouteTarget) {
        self.router.navigate(target);
    }

    /// Opens `item` as a tab, or selects it if its target is already open.
    /// Returns the index that became active.
    pub fn add_tab(&mut self, item: &NavItem) -> Option<usize> {
        let target = item.target()?;
        let mut strip = self.strip.get().clone();

        let index = match strip.tabs.iter().position(|t| &t.target == target) {
            Some(existing) => existing,
            None => {
                let id = TabId(self.next_id);
                self.next_id += 1;
                strip.tabs.push(Tab {
                    id,
                    label: item.label.clone(),
                    target: target.clone(),
                    icon: item.icon.clone(),
                });
                debug!("[Tabs] Opened '{}'", item.label);
                strip.tabs.len() - 1
            }
        };
        strip.active = Some(index);
        self.publish(strip);
        Some(index)
    }

    pub fn select_tab(&mut self, index: usize) -> TabResult<()> {
        self.check(index)?;
        let mut strip = self.strip.get().clone();
        strip.active = Some(index);
        let target = strip.tabs[index].target.clone();
        self.publish(strip);
        self.navigate(&target);
        Ok(())
    }

    pub fn remove_tab(&mut self, index: usize) -> TabResult<()> {
        self.check(index)?;
        let mut strip = self.strip.get().clone();
        let removed = strip.tabs.remove(index);
        self.clear_tab_cache(&removed, &strip.tabs);
        info!("[Tabs] Closed '{}'", removed.label);

        let mut next = None;
        if strip.tabs.is_empty() {
            strip.active = None;
            next = Some(RouteTarget::root());
        } else {
            match strip.active {
                Some(active) if active == index => {
                    let moved = index.min(strip.tabs.len() - 1);
                    strip.active = Some(moved);
                    next = Some(strip.tabs[moved].target.clone());
                }
                Some(active) if active > index => strip.active = Some(active - 1),
                _ => {}
            }
        }

        self.publish(strip);
        if let Some(target) = next {
            self.navigate(&target);
        }
        Ok(())
    }

    /// Moves the tab at `from` to `to` (clamped to the last position).
    /// The active tab stays active wherever it ends up.
    pub fn reorder_tabs(&mut self, from: usize, to: usize) -> TabResult<()> {
        self.check(from)?;
        let mut strip = self.strip.get().clone();
        let to = to.min(strip.tabs.len() - 1);
        let active_id = strip.active_tab().map(|t| t.id);

        let moved = strip.tabs.remove(from);
        strip.tabs.insert(to, moved);
        strip.active = active_id.and_then(|id| strip.tabs.iter().position(|t| t.id == id));

        debug!("[Tabs] Moved tab {} -> {}", from, to);
        self.publish(strip);
        Ok(())
    }

    /// Reorders tabs to follow `order`, as reported by a drag-and-drop strip.
    /// Tabs missing from `order` keep their relative order at the end.
    /// Returns true if the order changed.
    pub fn sync_order(&mut self, order: &[TabId]) -> bool {
        if self.is_empty() || order.is_empty() {
            return false;
        }
        let mut strip = self.strip.get().clone();
        let old_order: Vec<TabId> = strip.tabs.iter().map(|t| t.id).collect();
        let active_id = strip.active_tab().map(|t| t.id);

        let mut by_id: HashMap<TabId, Tab> = strip.tabs.drain(..).map(|t| (t.id, t)).collect();
        let mut reordered: Vec<Tab> = order.iter().filter_map(|id| by_id.remove(id)).collect();
        reordered.extend(old_order.iter().filter_map(|id| by_id.remove(id)));

        let changed = reordered.iter().map(|t| t.id).ne(old_order.iter().copied());
        if changed {
            strip.tabs = reordered;
            strip.active = active_id.and_then(|id| strip.tabs.iter().position(|t| t.id == id));
            self.publish(strip);
        }
        changed
    }

    pub fn close_all(&mut self) {
        for tab in self.tabs() {
            self.clear_tab_cache(tab, &[]);
        }
        info!("[Tabs] Closed all {} tab(s)", self.len());
        self.publish(TabStrip::default());
        self.navigate(&RouteTarget::root());
    }

    pub fn close_other(&mut self, index: usize) -> TabResult<()> {
        self.check(index)?;
        let strip = self.strip.get().clone();
        let kept = strip.tabs[index].clone();
        let open = std::slice::from_ref(&kept);
        for (i, tab) in strip.tabs.iter().enumerate() {
            if i != index {
                self.clear_tab_cache(tab, open);
            }
        }
        info!("[Tabs] Closed all but '{}'", kept.label);

        let target = kept.target.clone();
        self.publish(TabStrip { tabs: vec![kept], active: Some(0) });
        self.navigate(&target);
        Ok(())
    }

    /// Closes every tab left of `index`.
    pub fn close_left(&mut self, index: usize) -> TabResult<()> {
        if index == 0 {
            return Ok(());
        }
        self.check(index)?;
        let mut strip = self.strip.get().clone();
        let closed: Vec<Tab> = strip.tabs.drain(..index).collect();
        for tab in &closed {
            self.clear_tab_cache(tab, &strip.tabs);
        }
        info!("[Tabs] Closed {} tab(s) to the left", closed.len());

        let mut next = None;
        match strip.active {
            Some(active) if active >= index => strip.active = Some(active - index),
            _ => {
                strip.active = Some(0);
                next = Some(strip.tabs[0].target.clone());
            }
        }

        self.publish(strip);
        if let Some(target) = next {
            self.navigate(&target);
        }
        Ok(())
    }

    /// Closes every tab right of `index`.
    pub fn close_right(&mut self, index: usize) -> TabResult<()> {
        if index >= self.len().saturating_sub(1) {
            return Ok(());
        }
        let mut strip = self.strip.get().clone();
        let closed: Vec<Tab> = strip.tabs.drain(index + 1..).collect();
        for tab in &closed {
            self.clear_tab_cache(tab, &strip.tabs);
        }
        info!("[Tabs] Closed {} tab(s) to the right", closed.len());

        let mut next = None;
        if matches!(strip.active, Some(active) if active > index) {
            strip.active = Some(index);
            next = Some(strip.tabs[index].target.clone());
        }

        self.publish(strip);
        if let Some(target) = next {
            self.navigate(&target);
        }
        Ok(())
    }

    /// Tracks a completed navigation from any source.
    ///
    /// Selects the tab whose target resolves to the new URL, if one is open,
    /// then drops retained views that no open tab owns.
    pub fn on_navigation_end(&mut self, event: &NavigationEnd) {
        let current = location_key(&event.url);
        let keys = self.tab_keys(self.tabs());

        if let Some(index) = keys.iter().position(|k| *k == current) {
            if self.active_index() != Some(index) {
                let mut strip = self.strip.get().clone();
                strip.active = Some(index);
                self.publish(strip);
            }
        }

        self.cache.borrow_mut().retain_paths(&keys);
    }
}
