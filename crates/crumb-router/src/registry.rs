//! The route registry.
//!
//! Routes are registered during startup into an explicitly owned
//! [`RouteRegistry`]. [`prepare_routes`](crate::prepare_routes) drains it,
//! handing every definition over to the serving side in one step.

use indexmap::IndexMap;
use serde_json::Value;

use crumb_core::HttpMethod;

use crate::RouteOptions;

/// Route definitions for one URL, keyed by method.
pub type Route<S = Value> = IndexMap<HttpMethod, RouteOptions<S>>;

/// Mutable collection of route definitions keyed by URL, then method.
///
/// Registering the same `(url, method)` pair again replaces the earlier
/// definition. Iteration follows registration order.
///
/// # Example
///
/// ```rust
/// use crumb_core::HttpMethod;
/// use crumb_extract::{RouteRequest, RouteResponse};
/// use crumb_router::{sync_handler, RouteOptions, RouteRegistry};
///
/// let ok = || sync_handler(|_: &RouteRequest, res: &RouteResponse| { res.send("ok"); Ok(()) });
///
/// let mut registry = RouteRegistry::new();
/// registry.create_route(RouteOptions::new(HttpMethod::Get, "/items", ok()));
/// registry.create_route(RouteOptions::new(HttpMethod::Post, "/items", ok()));
///
/// assert_eq!(registry.len(), 2);
/// assert_eq!(registry.url_count(), 1);
/// assert!(registry.contains("/items", HttpMethod::Post));
/// assert!(!registry.contains("/items", HttpMethod::Delete));
/// ```
pub struct RouteRegistry<S = Value> {
    routes: IndexMap<String, Route<S>>,
}

impl<S> Default for RouteRegistry<S> {
    fn default() -> Self {
        Self {
            routes: IndexMap::new(),
        }
    }
}

impl<S> RouteRegistry<S> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a route, returning the definition it replaced, if any.
    pub fn create_route(&mut self, route: RouteOptions<S>) -> Option<RouteOptions<S>> {
        let replaced = self
            .routes
            .entry(route.url().to_string())
            .or_default()
            .insert(route.method(), route);

        if let Some(old) = &replaced {
            tracing::debug!(url = old.url(), method = %old.method(), "route replaced");
        }
        replaced
    }

    /// Returns the definition registered for `(url, method)`.
    #[must_use]
    pub fn get(&self, url: &str, method: HttpMethod) -> Option<&RouteOptions<S>> {
        self.routes.get(url).and_then(|route| route.get(&method))
    }

    /// Returns true if `(url, method)` is registered.
    #[must_use]
    pub fn contains(&self, url: &str, method: HttpMethod) -> bool {
        self.get(url, method).is_some()
    }

    /// Returns the methods registered for `url`.
    #[must_use]
    pub fn methods(&self, url: &str) -> Vec<HttpMethod> {
        self.routes
            .get(url)
            .map(|route| route.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Iterates over registered URLs.
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }

    /// Returns the number of route definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.values().map(IndexMap::len).sum()
    }

    /// Returns the number of distinct URLs.
    #[must_use]
    pub fn url_count(&self) -> usize {
        self.routes.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Removes and returns every route, leaving the registry empty.
    pub fn drain(&mut self) -> impl Iterator<Item = (String, Route<S>)> + '_ {
        self.routes.drain(..)
    }
}

impl<S> std::fmt::Debug for RouteRegistry<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(
                self.routes
                    .iter()
                    .map(|(url, route)| (url, route.keys().collect::<Vec<_>>())),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync_handler;
    use crumb_extract::{RouteRequest, RouteResponse};

    fn route(method: HttpMethod, url: &str, body: &'static str) -> RouteOptions {
        RouteOptions::new(
            method,
            url,
            sync_handler(move |_: &RouteRequest, res: &RouteResponse| {
                res.send(body);
                Ok(())
            }),
        )
    }

    #[test]
    fn test_empty_registry() {
        let registry: RouteRegistry = RouteRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert!(registry.methods("/").is_empty());
    }

    #[test]
    fn test_same_url_different_methods() {
        let mut registry = RouteRegistry::new();
        registry.create_route(route(HttpMethod::Get, "/a", "get"));
        registry.create_route(route(HttpMethod::Head, "/a", "head"));

        assert_eq!(registry.methods("/a"), vec![HttpMethod::Get, HttpMethod::Head]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_reregistration_replaces() {
        let mut registry = RouteRegistry::new();
        assert!(registry.create_route(route(HttpMethod::Get, "/a", "one")).is_none());
        let replaced = registry.create_route(route(HttpMethod::Get, "/a", "two"));

        assert!(replaced.is_some());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_drain_empties() {
        let mut registry = RouteRegistry::new();
        registry.create_route(route(HttpMethod::Get, "/a", "a"));
        registry.create_route(route(HttpMethod::Get, "/b", "b"));

        let drained: Vec<_> = registry.drain().map(|(url, _)| url).collect();
        assert_eq!(drained, vec!["/a", "/b"]);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_urls_keep_registration_order() {
        let mut registry = RouteRegistry::new();
        registry.create_route(route(HttpMethod::Get, "/z", "z"));
        registry.create_route(route(HttpMethod::Get, "/a", "a"));
        assert_eq!(registry.urls().collect::<Vec<_>>(), vec!["/z", "/a"]);
    }
}
