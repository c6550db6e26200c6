// Route retention strategy - pure logic + keyed store of detached views.
// The router consults this on every navigation; the tab registry invalidates it.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use log::{debug, trace};

use super::navigation::{has_segment_prefix, normalize_path};
use crate::settings::Settings;

/// Identity of a route configuration entry in the host route table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteConfigId(pub usize);

/// What the cache needs to know about one activated route.
pub trait RouteSnapshot {
    /// Path segments from root to this route, joined and normalized.
    fn canonical_path(&self) -> String;

    fn has_component(&self) -> bool;

    /// True when the route's configuration declares nested child routes.
    fn has_children(&self) -> bool;

    /// The configuration this route was matched against. `None` for the root.
    fn config_id(&self) -> Option<RouteConfigId>;
}

/// Paths that are never retained, whatever view they render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetentionPolicy {
    pub home_path: String,
    pub auth_prefixes: Vec<String>,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            home_path: "/".to_string(),
            auth_prefixes: vec!["/auth".to_string()],
        }
    }
}

impl From<&Settings> for RetentionPolicy {
    fn from(settings: &Settings) -> Self {
        Self {
            home_path: settings.home_path.clone(),
            auth_prefixes: settings.auth_prefixes.clone(),
        }
    }
}

impl RetentionPolicy {
    fn is_home(&self, path: &str) -> bool {
        path.is_empty() || path == normalize_path(&self.home_path)
    }

    fn is_auth(&self, path: &str) -> bool {
        self.auth_prefixes
            .iter()
            .any(|prefix| has_segment_prefix(path, prefix))
    }
}

pub type SharedRouteCache<H> = Rc<RefCell<RouteCache<H>>>;

#[derive(Debug)]
pub struct RouteCache<H> {
    handles: BTreeMap<String, H>,
    policy: RetentionPolicy,
}

impl<H> Default for RouteCache<H> {
    fn default() -> Self {
        Self::new(RetentionPolicy::default())
    }
}

impl<H> RouteCache<H> {
    pub fn new(policy: RetentionPolicy) -> Self {
        Self {
            handles: BTreeMap::new(),
            policy,
        }
    }

    pub fn shared(policy: RetentionPolicy) -> SharedRouteCache<H> {
        Rc::new(RefCell::new(Self::new(policy)))
    }

    /// Only leaf content views are retained: they need a component, must not
    /// be the home or an auth view, and must not declare child routes.
    pub fn should_detach(&self, route: &impl RouteSnapshot) -> bool {
        if !route.has_component() || route.has_children() {
            return false;
        }
        let path = route.canonical_path();
        !self.policy.is_home(&path) && !self.policy.is_auth(&path)
    }

    pub fn store(&mut self, route: &impl RouteSnapshot, handle: Option<H>) {
        if let Some(handle) = handle {
            let key = route.canonical_path();
            trace!("[RouteCache] Stored view for '{}'", key);
            self.handles.insert(key, handle);
        }
    }

    pub fn should_attach(&self, route: &impl RouteSnapshot) -> bool {
        self.handles.contains_key(&route.canonical_path())
    }

    /// Returns the retained view, leaving it stored for later navigations.
    pub fn retrieve(&self, route: &impl RouteSnapshot) -> Option<&H> {
        self.handles.get(&route.canonical_path())
    }

    /// Same configuration means the live view is kept as-is.
    pub fn should_reuse(&self, future: &impl RouteSnapshot, current: &impl RouteSnapshot) -> bool {
        future.config_id() == current.config_id()
    }

    /// Drops the retained view for `path`. Returns the removed key, if any.
    ///
    /// Falls back to the shortest stored key that ends with `path` on a
    /// segment boundary, for callers holding a path without its prefix.
    pub fn invalidate(&mut self, path: &str) -> Option<String> {
        self.invalidate_unowned(path, &[])
    }

    /// `invalidate`, except the suffix fallback never picks a key in `owned`.
    pub fn invalidate_unowned(&mut self, path: &str, owned: &[String]) -> Option<String> {
        let normalized = normalize_path(path);
        if self.handles.remove(&normalized).is_some() {
            debug!("[RouteCache] Invalidated '{}'", normalized);
            return Some(normalized);
        }
        if normalized.is_empty() {
            return None;
        }

        let fallback = self
            .handles
            .keys()
            .filter(|key| ends_on_segment(key, &normalized) && !owned.contains(*key))
            .min_by_key(|key| key.len())
            .cloned()?;
        self.handles.remove(&fallback);
        debug!("[RouteCache] Invalidated '{}' via suffix '{}'", fallback, normalized);
        Some(fallback)
    }

    /// Keeps only entries whose key is one of `open`.
    pub fn retain_paths(&mut self, open: &[String]) -> usize {
        let before = self.handles.len();
        self.handles.retain(|key, _| open.iter().any(|p| p == key));
        let dropped = before - self.handles.len();
        if dropped > 0 {
            debug!("[RouteCache] Pruned {} orphaned view(s)", dropped);
        }
        dropped
    }

    pub fn contains(&self, path: &str) -> bool {
        self.handles.contains_key(&normalize_path(path))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.handles.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

fn ends_on_segment(key: &str, suffix: &str) -> bool {
    match key.strip_suffix(suffix) {
        Some(head) => suffix.starts_with('/') || head.is_empty() || head.ends_with('/'),
        None => false,
    }
}
