//! High-level router API.

use http::Method;

use crate::method_router::MethodRouter;
use crate::node::Node;
use crate::{Lookup, RouteMatch};

/// A radix tree router, optionally mounted under an API prefix.
///
/// Patterns passed to [`insert`](Self::insert) are relative to the prefix;
/// paths passed to [`lookup`](Self::lookup) are full request paths.
///
/// # Example
///
/// ```rust
/// use gosd_router::{MethodRouter, Router};
/// use http::Method;
///
/// let mut router = Router::with_prefix("/v4");
/// router.insert("/packages", MethodRouter::new().get("packages"));
///
/// let found = router.match_route(&Method::GET, "/v4/packages").unwrap();
/// assert_eq!(*found.value, "packages");
/// ```
///
/// # Route Priority
///
/// Static segments are tried before parameter segments, so `/devices/me`
/// matches before `/devices/:deviceId` for the path `/devices/me`.
#[derive(Debug, Clone)]
pub struct Router<T> {
    root: Node<T>,
    /// Normalised prefix: empty, or `/segment...` without a trailing slash
    prefix: String,
    route_count: usize,
}

impl<T> Default for Router<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Router<T> {
    /// Creates a new empty router with no prefix.
    #[must_use]
    pub fn new() -> Self {
        Self::with_prefix("")
    }

    /// Creates a new empty router mounted under `prefix`.
    ///
    /// Trailing slashes are ignored, so `/v4/` and `/v4` are equivalent, and
    /// `/` means no prefix.
    #[must_use]
    pub fn with_prefix(prefix: &str) -> Self {
        let trimmed = prefix.trim_end_matches('/');
        let prefix = if trimmed.is_empty() || trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            format!("/{trimmed}")
        };
        Self {
            root: Node::root(),
            prefix,
            route_count: 0,
        }
    }

    /// Returns the normalised prefix (empty when unmounted).
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Inserts a route pattern relative to the prefix.
    pub fn insert(&mut self, path: &str, methods: MethodRouter<T>) {
        self.root.insert(path, methods);
        self.route_count += 1;
    }

    /// Routes a full request path.
    ///
    /// See [`Lookup`] for the three possible outcomes.
    #[must_use]
    pub fn lookup(&self, method: &Method, path: &str) -> Lookup<'_, T> {
        let Some(relative) = self.strip_prefix(path) else {
            return Lookup::OutsidePrefix;
        };
        self.root
            .match_path(relative)
            .and_then(|(methods, params)| {
                methods
                    .get_value(method)
                    .map(|value| RouteMatch::new(value, params))
            })
            .map_or(Lookup::Unmatched, Lookup::Matched)
    }

    /// Matches a full request path and method, ignoring why a miss happened.
    #[must_use]
    pub fn match_route(&self, method: &Method, path: &str) -> Option<RouteMatch<'_, T>> {
        match self.lookup(method, path) {
            Lookup::Matched(found) => Some(found),
            Lookup::Unmatched | Lookup::OutsidePrefix => None,
        }
    }

    /// Returns the number of routes registered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.route_count
    }

    /// Returns true if no routes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.route_count == 0
    }

    /// Returns the part of `path` below the prefix, or `None` if `path` is
    /// not under it. The prefix must end on a segment boundary.
    fn strip_prefix<'p>(&self, path: &'p str) -> Option<&'p str> {
        let rest = path.strip_prefix(self.prefix.as_str())?;
        (rest.is_empty() || rest.starts_with('/')).then_some(rest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_router_new() {
        let router: Router<&str> = Router::new();
        assert!(router.is_empty());
        assert_eq!(router.len(), 0);
        assert_eq!(router.prefix(), "");
    }

    #[test]
    fn test_prefix_normalisation() {
        assert_eq!(Router::<()>::with_prefix("/v4/").prefix(), "/v4");
        assert_eq!(Router::<()>::with_prefix("v4").prefix(), "/v4");
        assert_eq!(Router::<()>::with_prefix("/").prefix(), "");
    }

    #[test]
    fn test_router_match_param() {
        let mut router = Router::with_prefix("/v4");
        router.insert("/devices/:deviceId", MethodRouter::new().get("device"));

        let found = router.match_route(&Method::GET, "/v4/devices/herolte").unwrap();
        assert_eq!(*found.value, "device");
        assert_eq!(found.params.get("deviceId"), Some("herolte"));
    }

    #[test]
    fn test_router_prefix_boundary() {
        let mut router = Router::with_prefix("/v4");
        router.insert("/", MethodRouter::new().get("root"));

        assert!(router.match_route(&Method::GET, "/v4").is_some());
        assert!(router.match_route(&Method::GET, "/v4/").is_some());
        assert_eq!(router.lookup(&Method::GET, "/v4x"), Lookup::OutsidePrefix);
    }

    #[test]
    fn test_router_method_not_registered() {
        let mut router = Router::with_prefix("/v4");
        router.insert("/packages", MethodRouter::new().get("packages"));

        assert_eq!(router.lookup(&Method::DELETE, "/v4/packages"), Lookup::Unmatched);
        assert!(router.match_route(&Method::HEAD, "/v4/packages").is_some());
    }

    #[test]
    fn test_router_without_prefix() {
        let mut router = Router::new();
        router.insert("/packages", MethodRouter::new().get(7));

        assert!(router.match_route(&Method::GET, "/packages").is_some());
        assert_eq!(router.lookup(&Method::GET, "/other"), Lookup::Unmatched);
    }

    #[test]
    fn test_router_len() {
        let mut router = Router::new();
        router.insert("/a", MethodRouter::new().get(()));
        router.insert("/b", MethodRouter::new().get(()));
        assert_eq!(router.len(), 2);
        assert!(!router.is_empty());
    }
}
