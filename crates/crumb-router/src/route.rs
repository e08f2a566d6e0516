//! Route definitions.

use std::fmt;
use std::sync::Arc;

use crumb_core::{HttpMethod, SchemaValidator, SharedValidator};
use serde_json::Value;

use crate::handler::{erase, ErasedHandler, Handler};

/// A declarative description of one `(url, method)` endpoint.
///
/// # Example
///
/// ```rust
/// use crumb_core::HttpMethod;
/// use crumb_extract::{RouteRequest, RouteResponse};
/// use crumb_router::RouteOptions;
/// use serde_json::{json, Value};
///
/// let route = RouteOptions::new(HttpMethod::Post, "/products", |req: RouteRequest, res: RouteResponse| async move {
///     let product = req.body().await?;
///     res.send(product);
///     anyhow::Ok(())
/// })
/// .schema(json!({"price": 100}))
/// .validator(|data: &Value, schema: &Value| data["price"].is_number() == schema["price"].is_number());
///
/// assert_eq!(route.url(), "/products");
/// assert_eq!(route.method(), HttpMethod::Post);
/// assert!(route.has_schema());
/// ```
pub struct RouteOptions<S = Value> {
    url: String,
    method: HttpMethod,
    pub(crate) schema: Option<Arc<S>>,
    pub(crate) validator: Option<SharedValidator<S>>,
    pub(crate) on_request: Option<ErasedHandler<S>>,
    pub(crate) pre_handler: Option<ErasedHandler<S>>,
    pub(crate) handler: ErasedHandler<S>,
}

impl<S> RouteOptions<S> {
    /// Creates a route with a handler and no schema or hooks.
    pub fn new<H: Handler<S>>(method: HttpMethod, url: impl Into<String>, handler: H) -> Self {
        Self {
            url: url.into(),
            method,
            schema: None,
            validator: None,
            on_request: None,
            pre_handler: None,
            handler: erase(handler),
        }
    }

    /// Sets the schema the request body is validated against.
    #[must_use]
    pub fn schema(mut self, schema: S) -> Self {
        self.schema = Some(Arc::new(schema));
        self
    }

    /// Sets a per-route validator. It takes precedence over the global one.
    #[must_use]
    pub fn validator<V>(mut self, validator: V) -> Self
    where
        V: SchemaValidator<S> + 'static,
    {
        self.validator = Some(Arc::new(validator));
        self
    }

    /// Sets a hook that runs first, before `pre_handler` and the handler.
    #[must_use]
    pub fn on_request<H: Handler<S>>(mut self, hook: H) -> Self {
        self.on_request = Some(erase(hook));
        self
    }

    /// Sets a hook that runs after `on_request` and before the handler.
    #[must_use]
    pub fn pre_handler<H: Handler<S>>(mut self, hook: H) -> Self {
        self.pre_handler = Some(erase(hook));
        self
    }

    /// Returns the route URL pattern.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the route method.
    #[must_use]
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// Returns true if a schema is attached.
    #[must_use]
    pub fn has_schema(&self) -> bool {
        self.schema.is_some()
    }

    /// Returns true if a per-route validator is attached.
    #[must_use]
    pub fn has_validator(&self) -> bool {
        self.validator.is_some()
    }
}

impl<S> Clone for RouteOptions<S> {
    fn clone(&self) -> Self {
        Self {
            url: self.url.clone(),
            method: self.method,
            schema: self.schema.clone(),
            validator: self.validator.clone(),
            on_request: self.on_request.clone(),
            pre_handler: self.pre_handler.clone(),
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<S> fmt::Debug for RouteOptions<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteOptions")
            .field("url", &self.url)
            .field("method", &self.method)
            .field("has_schema", &self.schema.is_some())
            .field("has_validator", &self.validator.is_some())
            .field("has_on_request", &self.on_request.is_some())
            .field("has_pre_handler", &self.pre_handler.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync_handler;
    use crumb_extract::{RouteRequest, RouteResponse};

    fn noop() -> impl Handler {
        sync_handler(|_: &RouteRequest, _: &RouteResponse| Ok(()))
    }

    #[test]
    fn test_new_route_is_bare() {
        let route = RouteOptions::new(HttpMethod::Get, "/health", noop());
        assert_eq!(route.url(), "/health");
        assert_eq!(route.method(), HttpMethod::Get);
        assert!(!route.has_schema());
        assert!(!route.has_validator());
        assert!(route.on_request.is_none());
        assert!(route.pre_handler.is_none());
    }

    #[test]
    fn test_builder_sets_everything() {
        let route = RouteOptions::new(HttpMethod::Put, "/items/:id", noop())
            .schema(serde_json::json!({}))
            .validator(|_: &Value, _: &Value| true)
            .on_request(noop())
            .pre_handler(noop());

        assert!(route.has_schema());
        assert!(route.has_validator());
        assert!(route.on_request.is_some());
        assert!(route.pre_handler.is_some());

        let debug = format!("{route:?}");
        assert!(debug.contains("/items/:id"));
    }

    #[test]
    fn test_clone_shares_handler() {
        let route = RouteOptions::new(HttpMethod::Delete, "/x", noop());
        let copy = route.clone();
        assert!(Arc::ptr_eq(&route.handler, &copy.handler));
    }
}
