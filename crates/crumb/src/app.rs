//! The registration context.

use std::fmt;

use crumb_core::{HttpMethod, SharedValidator};
use crumb_router::{prepare_routes, Handler, PreparedRoutes, RouteOptions, RouteRegistry};
use crumb_server::{BoundServer, ListenOptions, ServerError, ShutdownSignal};
use serde_json::Value;

/// An application: an owned route registry plus the listen entry points.
///
/// Routes are registered during startup. Preparing or listening drains the
/// registry, so routes added afterwards take effect only on the next
/// preparation.
///
/// # Example
///
/// ```rust
/// use crumb::prelude::*;
/// use serde_json::{json, Value};
///
/// let mut app = App::new();
/// app.get("/health", sync_handler(|_: &RouteRequest, res: &RouteResponse| {
///     res.send("ok");
///     Ok(())
/// }));
/// app.create_route(
///     RouteOptions::new(HttpMethod::Post, "/products", |req: RouteRequest, res: RouteResponse| async move {
///         let product = req.body().await?;
///         res.send(product);
///         anyhow::Ok(())
///     })
///     .schema(json!({"price": 100})),
/// );
///
/// assert_eq!(app.routes().len(), 2);
///
/// let validator = shared_validator(|data: &Value, _schema: &Value| data["price"].is_number());
/// let prepared = app.prepare(Some(&validator));
/// assert!(prepared["/products"].contains_key(&HttpMethod::Post));
/// assert!(app.routes().is_empty());
/// ```
pub struct App<S = Value> {
    registry: RouteRegistry<S>,
}

impl<S> Default for App<S> {
    fn default() -> Self {
        Self {
            registry: RouteRegistry::new(),
        }
    }
}

impl<S> App<S>
where
    S: Send + Sync + 'static,
{
    /// Creates an application with no routes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the registry.
    pub fn routes(&self) -> &RouteRegistry<S> {
        &self.registry
    }

    /// Returns the registry mutably.
    pub fn routes_mut(&mut self) -> &mut RouteRegistry<S> {
        &mut self.registry
    }

    /// Registers a route definition, replacing any earlier definition for
    /// the same URL and method.
    pub fn create_route(&mut self, route: RouteOptions<S>) -> &mut Self {
        self.registry.create_route(route);
        self
    }

    /// Registers a bare handler for `method` and `url`.
    pub fn route<H: Handler<S>>(&mut self, method: HttpMethod, url: &str, handler: H) -> &mut Self {
        self.create_route(RouteOptions::new(method, url, handler))
    }

    /// Registers a `GET` handler.
    pub fn get<H: Handler<S>>(&mut self, url: &str, handler: H) -> &mut Self {
        self.route(HttpMethod::Get, url, handler)
    }

    /// Registers a `POST` handler.
    pub fn post<H: Handler<S>>(&mut self, url: &str, handler: H) -> &mut Self {
        self.route(HttpMethod::Post, url, handler)
    }

    /// Registers a `PUT` handler.
    pub fn put<H: Handler<S>>(&mut self, url: &str, handler: H) -> &mut Self {
        self.route(HttpMethod::Put, url, handler)
    }

    /// Registers a `PATCH` handler.
    pub fn patch<H: Handler<S>>(&mut self, url: &str, handler: H) -> &mut Self {
        self.route(HttpMethod::Patch, url, handler)
    }

    /// Registers a `DELETE` handler.
    pub fn delete<H: Handler<S>>(&mut self, url: &str, handler: H) -> &mut Self {
        self.route(HttpMethod::Delete, url, handler)
    }

    /// Registers an `OPTIONS` handler.
    pub fn options<H: Handler<S>>(&mut self, url: &str, handler: H) -> &mut Self {
        self.route(HttpMethod::Options, url, handler)
    }

    /// Registers a `HEAD` handler.
    pub fn head<H: Handler<S>>(&mut self, url: &str, handler: H) -> &mut Self {
        self.route(HttpMethod::Head, url, handler)
    }

    /// Wraps every registered route and drains the registry.
    pub fn prepare(&mut self, validator: Option<&SharedValidator<S>>) -> PreparedRoutes {
        prepare_routes(&mut self.registry, validator)
    }

    /// Prepares the routes and binds a server without serving yet.
    pub async fn bind(&mut self, options: ListenOptions<S>) -> Result<BoundServer, ServerError> {
        crumb_server::bind(&mut self.registry, options).await
    }

    /// Prepares the routes and serves until SIGINT or SIGTERM.
    pub async fn listen(&mut self, options: ListenOptions<S>) -> Result<(), ServerError> {
        crumb_server::listen(&mut self.registry, options).await
    }

    /// Prepares the routes and serves until `shutdown` is triggered.
    pub async fn listen_with_shutdown(
        &mut self,
        options: ListenOptions<S>,
        shutdown: ShutdownSignal,
    ) -> Result<(), ServerError> {
        crumb_server::listen_with_shutdown(&mut self.registry, options, shutdown).await
    }
}

impl<S> fmt::Debug for App<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App").field("routes", &self.registry).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crumb_extract::{RouteRequest, RouteResponse};
    use crumb_router::sync_handler;

    fn reply(body: &'static str) -> impl Handler {
        sync_handler(move |_: &RouteRequest, res: &RouteResponse| {
            res.send(body);
            Ok(())
        })
    }

    #[test]
    fn test_shorthands_register_each_method() {
        let mut app = App::new();
        app.get("/r", reply("get"))
            .post("/r", reply("post"))
            .put("/r", reply("put"))
            .patch("/r", reply("patch"))
            .delete("/r", reply("delete"))
            .options("/r", reply("options"))
            .head("/r", reply("head"));

        assert_eq!(app.routes().methods("/r"), HttpMethod::ALL.to_vec());
    }

    #[test]
    fn test_prepare_drains() {
        let mut app = App::new();
        app.get("/a", reply("a"));

        assert_eq!(app.prepare(None).len(), 1);
        assert!(app.prepare(None).is_empty());
    }

    #[tokio::test]
    async fn test_prepared_route_answers() {
        let mut app = App::new();
        app.get("/a", reply("a")).get("/a", reply("replaced"));

        let prepared = app.prepare(None);
        let response = prepared["/a"][&HttpMethod::Get]
            .call(crumb_core::HostRequest::builder().build())
            .await;
        assert_eq!(response.body.as_deref(), Some("replaced"));
    }

    #[test]
    fn test_debug_lists_routes() {
        let mut app = App::new();
        app.post("/items", reply("x"));
        assert!(format!("{app:?}").contains("/items"));
    }
}
