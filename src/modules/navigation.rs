// Pure navigation logic - no host/UI types allowed.
// Path canonicalization, route targets and the routing facility seam.

use serde::{Deserialize, Serialize};
use url::Url;

/// Base used to resolve relative locations into a full URL.
const APP_ORIGIN: &str = "http://localhost/";

/// Ordered route commands, e.g. `["/management/menu"]` or `["/management", "user"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteTarget(pub Vec<String>);

impl RouteTarget {
    pub fn new<I, S>(commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(commands.into_iter().map(Into::into).collect())
    }

    pub fn root() -> Self {
        Self::new(["/"])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn commands(&self) -> &[String] {
        &self.0
    }
}

impl From<&str> for RouteTarget {
    fn from(path: &str) -> Self {
        Self::new([path])
    }
}

/// Collapses runs of `/` into one and strips exactly one trailing `/`.
///
/// `"/a//b/"` and `"/a/b"` both become `"/a/b"`; the root `"/"` becomes `""`.
pub fn normalize_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for ch in path.chars() {
        if ch == '/' && out.ends_with('/') {
            continue;
        }
        out.push(ch);
    }
    if out.ends_with('/') {
        out.pop();
    }
    out
}

/// Joins path segments from root to leaf with `/`, then normalizes.
pub fn canonical_path<I, S>(segments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let joined = segments
        .into_iter()
        .map(|s| s.as_ref().to_string())
        .collect::<Vec<_>>()
        .join("/");
    normalize_path(&joined)
}

/// Splits a path into its non-empty segments.
pub fn path_segments(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Builds the absolute URL a target navigates to.
///
/// Every command is split on `/`, each piece is percent-encoded, and the
/// pieces are joined under a leading `/`.
pub fn serialize_target(target: &RouteTarget) -> String {
    let pieces: Vec<String> = target
        .commands()
        .iter()
        .flat_map(|command| path_segments(command))
        .map(|piece| urlencoding::encode(&piece).into_owned())
        .collect();
    format!("/{}", pieces.join("/"))
}

/// Cache key for a target: the canonical form of its serialized URL.
pub fn target_key(target: &RouteTarget) -> String {
    normalize_path(&serialize_target(target))
}

/// True when `path` equals `prefix` or continues it past a `/` boundary.
pub fn has_segment_prefix(path: &str, prefix: &str) -> bool {
    let prefix = normalize_path(prefix);
    if prefix.is_empty() {
        return false;
    }
    match path.strip_prefix(prefix.as_str()) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Canonical path of a location, which may be absolute (`http://host/a?x=1`)
/// or app-relative (`/a#top`). Query and fragment are dropped.
pub fn location_key(location: &str) -> String {
    let parsed = Url::parse(location).or_else(|_| {
        Url::parse(APP_ORIGIN).and_then(|base| base.join(location))
    });
    match parsed {
        Ok(url) => normalize_path(url.path()),
        Err(_) => normalize_path(location),
    }
}

/// Signals that a navigation finished; carries the resulting current URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationEnd {
    pub url: String,
}

/// The host routing facility consumed by the tab registry.
pub trait Router {
    /// Retained view state produced by detaching a view.
    type Handle;

    /// Resolves a target into its canonical path.
    fn resolve(&self, target: &RouteTarget) -> String {
        target_key(target)
    }

    /// Starts a navigation. Completion arrives later as a [`NavigationEnd`].
    fn navigate(&mut self, target: &RouteTarget);

    fn current_path(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/a//b/", "/a/b")]
    #[case("/a/b", "/a/b")]
    #[case("//management///menu", "/management/menu")]
    #[case("/", "")]
    #[case("", "")]
    #[case("a/b//", "a/b")]
    fn test_normalize_path(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_path(input), expected);
    }

    #[test]
    fn test_canonical_path_from_root_segments() {
        // root snapshot and layout contribute empty urls
        assert_eq!(
            canonical_path(["", "", "management", "menu"]),
            "/management/menu"
        );
        assert_eq!(canonical_path([""]), "");
    }

    #[rstest]
    #[case(RouteTarget::root(), "/")]
    #[case(RouteTarget::from("/management/menu"), "/management/menu")]
    #[case(RouteTarget::new(["/management", "user"]), "/management/user")]
    #[case(RouteTarget::new(["management/", "/organization"]), "/management/organization")]
    #[case(RouteTarget::from("/reports/north east"), "/reports/north%20east")]
    fn test_serialize_target(#[case] target: RouteTarget, #[case] expected: &str) {
        assert_eq!(serialize_target(&target), expected);
    }

    #[test]
    fn test_target_key_of_root_is_empty() {
        assert_eq!(target_key(&RouteTarget::root()), "");
        assert_eq!(target_key(&RouteTarget::from("/management/user/")), "/management/user");
    }

    #[rstest]
    #[case("/auth", "/auth", true)]
    #[case("/auth/login", "/auth", true)]
    #[case("/authors", "/auth", false)]
    #[case("/management", "", false)]
    #[case("/auth/login", "/auth/", true)]
    fn test_has_segment_prefix(#[case] path: &str, #[case] prefix: &str, #[case] expected: bool) {
        assert_eq!(has_segment_prefix(path, prefix), expected);
    }

    #[rstest]
    #[case("/management/menu", "/management/menu")]
    #[case("/management/menu?tab=2#top", "/management/menu")]
    #[case("http://localhost:4200/management//user/", "/management/user")]
    #[case("/", "")]
    #[case("management/organization", "/management/organization")]
    fn test_location_key(#[case] location: &str, #[case] expected: &str) {
        assert_eq!(location_key(location), expected);
    }

    #[test]
    fn test_route_target_json_is_a_plain_array() {
        let target: RouteTarget = serde_json::from_str(r#"["/management/menu"]"#).unwrap();
        assert_eq!(target, RouteTarget::from("/management/menu"));
        assert_eq!(serde_json::to_string(&target).unwrap(), r#"["/management/menu"]"#);
    }
}
