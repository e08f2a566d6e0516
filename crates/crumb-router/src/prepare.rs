//! The route preparer.
//!
//! Preparation is the one-shot handoff from registration to serving: every
//! definition is wrapped into a [`WrappedRoute`] and the registry is left
//! empty, so a route registered afterwards is visibly absent until the next
//! preparation.

use indexmap::IndexMap;

use crumb_core::{HttpMethod, SharedValidator};

use crate::{wrap_route, Route, RouteRegistry, WrappedRoute};

/// Wrapped callbacks for one URL, keyed by method.
pub type PreparedRoute = IndexMap<HttpMethod, WrappedRoute>;

/// Wrapped callbacks keyed by URL, then method.
pub type PreparedRoutes = IndexMap<String, PreparedRoute>;

/// Wraps every method of one URL's definitions.
pub fn prepare_route<S>(route: Route<S>, validator: Option<&SharedValidator<S>>) -> PreparedRoute
where
    S: Send + Sync + 'static,
{
    route
        .into_iter()
        .map(|(method, options)| (method, wrap_route(options, validator.cloned())))
        .collect()
}

/// Wraps every route in the registry and drains it.
///
/// # Example
///
/// ```rust
/// use crumb_core::HttpMethod;
/// use crumb_extract::{RouteRequest, RouteResponse};
/// use crumb_router::{prepare_routes, sync_handler, RouteOptions, RouteRegistry};
///
/// let mut registry = RouteRegistry::new();
/// registry.create_route(RouteOptions::new(
///     HttpMethod::Get,
///     "/ping",
///     sync_handler(|_: &RouteRequest, res: &RouteResponse| { res.send("pong"); Ok(()) }),
/// ));
///
/// let prepared = prepare_routes(&mut registry, None);
/// assert!(prepared["/ping"].contains_key(&HttpMethod::Get));
/// assert!(!prepared["/ping"].contains_key(&HttpMethod::Post));
/// assert!(registry.is_empty());
/// ```
pub fn prepare_routes<S>(
    registry: &mut RouteRegistry<S>,
    validator: Option<&SharedValidator<S>>,
) -> PreparedRoutes
where
    S: Send + Sync + 'static,
{
    let prepared: PreparedRoutes = registry
        .drain()
        .map(|(url, route)| (url, prepare_route(route, validator)))
        .collect();

    tracing::debug!(urls = prepared.len(), "routes prepared");
    prepared
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{sync_handler, RouteOptions};
    use crumb_core::HostRequest;
    use crumb_extract::{RouteRequest, RouteResponse};
    use proptest::prelude::*;

    fn route(method: HttpMethod, url: &str) -> RouteOptions {
        let tag = format!("{method} {url}");
        RouteOptions::new(
            method,
            url,
            sync_handler(move |_: &RouteRequest, res: &RouteResponse| {
                res.send(tag.clone());
                Ok(())
            }),
        )
    }

    #[test]
    fn test_prepare_empty_registry() {
        let mut registry: RouteRegistry = RouteRegistry::new();
        assert!(prepare_routes(&mut registry, None).is_empty());
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_prepared_entries_dispatch_to_their_route() {
        let mut registry = RouteRegistry::new();
        registry.create_route(route(HttpMethod::Get, "/a"));
        registry.create_route(route(HttpMethod::Delete, "/a"));
        registry.create_route(route(HttpMethod::Get, "/b"));

        let prepared = prepare_routes(&mut registry, None);
        assert_eq!(prepared.len(), 2);
        assert_eq!(prepared["/a"].len(), 2);

        let response = prepared["/a"][&HttpMethod::Delete]
            .call(HostRequest::builder().build())
            .await;
        assert_eq!(response.body.as_deref(), Some("DELETE /a"));
    }

    #[test]
    fn test_registration_after_prepare_needs_new_prepare() {
        let mut registry = RouteRegistry::new();
        registry.create_route(route(HttpMethod::Get, "/a"));
        let first = prepare_routes(&mut registry, None);

        registry.create_route(route(HttpMethod::Get, "/late"));
        assert!(!first.contains_key("/late"));

        let second = prepare_routes(&mut registry, None);
        assert!(second.contains_key("/late"));
        assert!(!second.contains_key("/a"));
    }

    #[test]
    fn test_prepare_single_route() {
        let mut definitions = Route::new();
        definitions.insert(HttpMethod::Options, route(HttpMethod::Options, "/c"));

        let prepared = prepare_route(definitions, None);
        assert_eq!(prepared.keys().copied().collect::<Vec<_>>(), vec![HttpMethod::Options]);
    }

    proptest! {
        #[test]
        fn test_prepared_keys_match_registrations(
            pairs in proptest::collection::vec(
                (0usize..HttpMethod::ALL.len(), "/[a-c]{1,2}"),
                0..12,
            )
        ) {
            let mut registry = RouteRegistry::new();
            for (index, url) in &pairs {
                registry.create_route(route(HttpMethod::ALL[*index], url));
            }

            let prepared = prepare_routes(&mut registry, None);
            prop_assert!(registry.is_empty());

            for (url, methods) in &prepared {
                for method in HttpMethod::ALL {
                    let registered = pairs
                        .iter()
                        .any(|(i, u)| u == url && HttpMethod::ALL[*i] == method);
                    prop_assert_eq!(methods.contains_key(&method), registered);
                }
            }
            for (index, url) in &pairs {
                prop_assert!(prepared[url.as_str()].contains_key(&HttpMethod::ALL[*index]));
            }
        }
    }
}
