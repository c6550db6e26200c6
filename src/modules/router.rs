// In-memory routing facility.
// Matches URLs against a route table, keeps back/forward history, and runs the
// detach/attach/reuse pipeline against the shared RouteCache on every navigation.

use std::collections::VecDeque;

use log::{debug, trace};

use super::navigation::{
    canonical_path, location_key, path_segments, serialize_target, NavigationEnd, RouteTarget,
    Router,
};
use super::route_cache::{RouteConfigId, RouteSnapshot, SharedRouteCache};
use crate::error::NavigationError;

/// Maximum redirect depth to prevent infinite redirect loops.
const MAX_REDIRECT_DEPTH: usize = 5;

const WILDCARD: &str = "**";

/// One entry of the route table, as written by the application.
#[derive(Debug, Clone, Default)]
pub struct RouteConfig {
    pub path: String,
    pub component: Option<String>,
    pub redirect_to: Option<String>,
    pub children: Vec<RouteConfig>,
}

impl RouteConfig {
    pub fn component(path: &str, component: &str) -> Self {
        Self {
            path: path.to_string(),
            component: Some(component.to_string()),
            ..Self::default()
        }
    }

    /// A route rendering `component` with nested child routes.
    pub fn layout(path: &str, component: &str, children: Vec<RouteConfig>) -> Self {
        Self {
            path: path.to_string(),
            component: Some(component.to_string()),
            children,
            ..Self::default()
        }
    }

    /// Child routes grouped under a path, with no view of its own.
    pub fn group(path: &str, children: Vec<RouteConfig>) -> Self {
        Self {
            path: path.to_string(),
            children,
            ..Self::default()
        }
    }

    /// Redirect to an absolute path. `"**"` matches anything left unmatched.
    pub fn redirect(path: &str, to: &str) -> Self {
        Self {
            path: path.to_string(),
            redirect_to: Some(to.to_string()),
            ..Self::default()
        }
    }
}

/// The admin console's route table.
pub fn admin_routes() -> Vec<RouteConfig> {
    vec![
        RouteConfig::layout(
            "",
            "AppLayout",
            vec![
                RouteConfig::component("", "Dashboard"),
                RouteConfig::group(
                    "management",
                    vec![
                        RouteConfig::component("menu", "MenuManagement"),
                        RouteConfig::component("organization", "OrganizationManagement"),
                        RouteConfig::component("user", "UserManagement"),
                        RouteConfig::redirect(WILDCARD, "/notfound"),
                    ],
                ),
            ],
        ),
        RouteConfig::group(
            "auth",
            vec![
                RouteConfig::component("login", "Login"),
                RouteConfig::component("access", "Access"),
                RouteConfig::component("error", "Error"),
            ],
        ),
        RouteConfig::component("notfound", "Notfound"),
        RouteConfig::redirect(WILDCARD, "/notfound"),
    ]
}

#[derive(Debug)]
struct RouteNode {
    segments: Vec<String>,
    wildcard: bool,
    component: Option<String>,
    redirect_to: Option<String>,
    children: Vec<RouteConfigId>,
}

#[derive(Debug, Default)]
struct RouteTable {
    nodes: Vec<RouteNode>,
    roots: Vec<RouteConfigId>,
}

struct MatchedLevel {
    config: RouteConfigId,
    segments: Vec<String>,
}

enum MatchOutcome {
    Matched,
    Redirect(String),
    NoMatch,
}

impl RouteTable {
    fn build(routes: Vec<RouteConfig>) -> Self {
        let mut table = RouteTable::default();
        let roots = routes.into_iter().map(|r| table.insert(r)).collect();
        table.roots = roots;
        table
    }

    fn insert(&mut self, route: RouteConfig) -> RouteConfigId {
        let id = RouteConfigId(self.nodes.len());
        self.nodes.push(RouteNode {
            wildcard: route.path == WILDCARD,
            segments: path_segments(&route.path),
            component: route.component,
            redirect_to: route.redirect_to,
            children: Vec::new(),
        });
        let children: Vec<_> = route.children.into_iter().map(|c| self.insert(c)).collect();
        self.nodes[id.0].children = children;
        id
    }

    fn node(&self, id: RouteConfigId) -> &RouteNode {
        &self.nodes[id.0]
    }

    fn match_in(
        &self,
        ids: &[RouteConfigId],
        segments: &[String],
        out: &mut Vec<MatchedLevel>,
    ) -> MatchOutcome {
        for &id in ids {
            let node = self.node(id);

            if node.wildcard {
                if let Some(to) = &node.redirect_to {
                    return MatchOutcome::Redirect(to.clone());
                }
                out.push(MatchedLevel { config: id, segments: segments.to_vec() });
                return MatchOutcome::Matched;
            }

            let n = node.segments.len();
            if segments.len() < n || segments[..n] != node.segments[..] {
                continue;
            }
            let rest = &segments[n..];

            if let Some(to) = &node.redirect_to {
                if rest.is_empty() {
                    return MatchOutcome::Redirect(to.clone());
                }
                continue;
            }

            if !node.children.is_empty() {
                out.push(MatchedLevel { config: id, segments: node.segments.clone() });
                match self.match_in(&node.children, rest, out) {
                    MatchOutcome::NoMatch => {
                        out.pop();
                        continue;
                    }
                    outcome => return outcome,
                }
            }

            if rest.is_empty() {
                out.push(MatchedLevel { config: id, segments: node.segments.clone() });
                return MatchOutcome::Matched;
            }
        }
        MatchOutcome::NoMatch
    }
}

/// One level of the activated route tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivatedRoute {
    pub config: Option<RouteConfigId>,
    pub path: String,
    pub component: Option<String>,
    pub has_children: bool,
}

impl RouteSnapshot for ActivatedRoute {
    fn canonical_path(&self) -> String {
        self.path.clone()
    }

    fn has_component(&self) -> bool {
        self.component.is_some()
    }

    fn has_children(&self) -> bool {
        self.has_children
    }

    fn config_id(&self) -> Option<RouteConfigId> {
        self.config
    }
}

/// A rendered component instance living in an outlet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewInstance {
    pub id: u64,
    pub component: String,
    pub path: String,
}

/// Views of a detached subtree, top-most first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetachedView {
    pub views: Vec<Option<ViewInstance>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NavigationKind {
    Push,
    Traverse(usize),
}

#[derive(Debug, Clone)]
struct PendingNavigation {
    url: String,
    kind: NavigationKind,
}

pub struct MemoryRouter {
    table: RouteTable,
    cache: SharedRouteCache<DetachedView>,
    url: String,
    tree: Vec<ActivatedRoute>,
    outlets: Vec<Option<ViewInstance>>,
    pending: VecDeque<PendingNavigation>,
    history: Vec<String>,
    cursor: usize,
    next_view_id: u64,
}

impl MemoryRouter {
    pub fn new(routes: Vec<RouteConfig>, cache: SharedRouteCache<DetachedView>) -> Self {
        Self {
            table: RouteTable::build(routes),
            cache,
            url: String::new(),
            tree: vec![Self::root()],
            outlets: vec![None],
            pending: VecDeque::new(),
            history: Vec::new(),
            cursor: 0,
            next_view_id: 1,
        }
    }

    fn root() -> ActivatedRoute {
        ActivatedRoute {
            config: None,
            path: String::new(),
            component: None,
            has_children: true,
        }
    }

    /// The URL of the last completed navigation. Empty before the first one.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn tree(&self) -> &[ActivatedRoute] {
        &self.tree
    }

    /// The innermost rendered view.
    pub fn leaf_view(&self) -> Option<&ViewInstance> {
        self.outlets.iter().rev().find_map(Option::as_ref)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Queues a navigation to a raw location (external link, address bar).
    pub fn navigate_by_url(&mut self, location: &str) {
        self.enqueue(location, NavigationKind::Push);
    }

    pub fn can_go_back(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.cursor + 1 < self.history.len()
    }

    pub fn back(&mut self) -> bool {
        if !self.can_go_back() {
            return false;
        }
        let index = self.cursor - 1;
        let url = self.history[index].clone();
        self.enqueue(&url, NavigationKind::Traverse(index));
        true
    }

    pub fn forward(&mut self) -> bool {
        if !self.can_go_forward() {
            return false;
        }
        let index = self.cursor + 1;
        let url = self.history[index].clone();
        self.enqueue(&url, NavigationKind::Traverse(index));
        true
    }

    fn enqueue(&mut self, location: &str, kind: NavigationKind) {
        let key = location_key(location);
        let url = if key.is_empty() { "/".to_string() } else { key };
        trace!("[Router] Queued navigation to '{}'", url);
        self.pending.push_back(PendingNavigation { url, kind });
    }

    /// Completes the oldest queued navigation.
    ///
    /// Navigations to the current URL are ignored and do not produce an event.
    pub fn process_next(&mut self) -> Option<Result<NavigationEnd, NavigationError>> {
        while let Some(next) = self.pending.pop_front() {
            if next.kind == NavigationKind::Push && next.url == self.url {
                trace!("[Router] Ignoring navigation to current url '{}'", next.url);
                continue;
            }
            return Some(self.complete(next));
        }
        None
    }

    fn complete(
        &mut self,
        navigation: PendingNavigation,
    ) -> Result<NavigationEnd, NavigationError> {
        let (url, levels) = self.recognize(&navigation.url)?;
        let future = self.build_tree(&levels);

        let common = {
            let cache = self.cache.borrow();
            self.tree
                .iter()
                .zip(future.iter())
                .take_while(|(current, next)| cache.should_reuse(*next, *current))
                .count()
        };

        self.deactivate_from(common);
        self.activate_from(&future, common);
        self.tree = future;

        match navigation.kind {
            NavigationKind::Push => {
                if !self.history.is_empty() {
                    self.history.truncate(self.cursor + 1);
                }
                self.history.push(url.clone());
                self.cursor = self.history.len() - 1;
            }
            NavigationKind::Traverse(index) => self.cursor = index,
        }

        debug!("[Router] Navigation end '{}'", url);
        self.url = url.clone();
        Ok(NavigationEnd { url })
    }

    /// Resolves redirects and returns the final URL with its matched levels.
    fn recognize(&self, url: &str) -> Result<(String, Vec<MatchedLevel>), NavigationError> {
        let mut url = url.to_string();
        for _ in 0..=MAX_REDIRECT_DEPTH {
            let segments = path_segments(&url);
            let mut levels = Vec::new();
            match self.table.match_in(&self.table.roots, &segments, &mut levels) {
                MatchOutcome::Matched => return Ok((url, levels)),
                MatchOutcome::Redirect(to) => {
                    debug!("[Router] Redirect '{}' -> '{}'", url, to);
                    url = to;
                }
                MatchOutcome::NoMatch => return Err(NavigationError::NoMatch(url)),
            }
        }
        Err(NavigationError::RedirectLoop(url))
    }

    fn build_tree(&self, levels: &[MatchedLevel]) -> Vec<ActivatedRoute> {
        let mut tree = vec![Self::root()];
        let mut from_root = vec![String::new()];
        for level in levels {
            let node = self.table.node(level.config);
            from_root.extend(level.segments.iter().cloned());
            tree.push(ActivatedRoute {
                config: Some(level.config),
                path: canonical_path(&from_root),
                component: node.component.clone(),
                has_children: !node.children.is_empty(),
            });
        }
        tree
    }

    /// Detaches the top-most retainable route at or below `from`, destroying the rest.
    fn deactivate_from(&mut self, from: usize) {
        for level in from..self.tree.len() {
            let route = &self.tree[level];
            let detach = self.cache.borrow().should_detach(route);
            if detach {
                let views = self.outlets.get(level..).map(<[_]>::to_vec).unwrap_or_default();
                let handle = DetachedView { views };
                self.cache.borrow_mut().store(route, Some(handle));
                debug!("[Router] Detached '{}'", route.path);
                break;
            }
            if let Some(Some(view)) = self.outlets.get(level) {
                trace!("[Router] Destroyed {} for '{}'", view.component, view.path);
            }
        }
        self.outlets.truncate(from);
    }

    fn activate_from(&mut self, future: &[ActivatedRoute], from: usize) {
        let mut level = from;
        while level < future.len() {
            let route = &future[level];
            let retained = {
                let cache = self.cache.borrow();
                if cache.should_attach(route) {
                    cache.retrieve(route).cloned()
                } else {
                    None
                }
            };
            if let Some(detached) = retained {
                debug!("[Router] Reattached '{}'", route.path);
                self.outlets.extend(detached.views);
                break;
            }
            let view = route.component.as_ref().map(|component| {
                let id = self.next_view_id;
                self.next_view_id += 1;
                ViewInstance { id, component: component.clone(), path: route.path.clone() }
            });
            self.outlets.push(view);
            level += 1;
        }
        self.outlets.truncate(future.len());
    }
}

impl Router for MemoryRouter {
    type Handle = DetachedView;

    fn navigate(&mut self, target: &RouteTarget) {
        let url = serialize_target(target);
        self.enqueue(&url, NavigationKind::Push);
    }

    fn current_path(&self) -> String {
        self.url.clone()
    }
}
