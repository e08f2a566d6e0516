//! The request facade handed to route handlers.

use std::fmt;
use std::sync::Arc;

use crumb_core::{CrumbError, HostRequest, Params, SharedValidator};
use http::header::{HeaderValue, CONTENT_TYPE};
use http::{HeaderMap, Method, Uri};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::OnceCell;

use crate::{handle_body, ContentType, Cookies, QueryParams};

struct RequestParts<S> {
    request: HostRequest,
    content_type: ContentType,
    schema: Option<Arc<S>>,
    validator: Option<SharedValidator<S>>,
    query: QueryParams,
    cookies: Cookies,
    body: OnceCell<Value>,
}

/// A request as seen by route handlers and hooks.
///
/// The body is parsed lazily: nothing is read until a handler calls
/// [`body`](Self::body) or [`body_as`](Self::body_as). A successful parse is
/// memoised, so hooks and the handler share one parsed value.
///
/// Cloning is cheap and every clone views the same request.
///
/// # Example
///
/// ```rust
/// use crumb_core::HostRequest;
/// use crumb_extract::RouteRequest;
/// use serde_json::{json, Value};
///
/// # tokio_test::block_on(async {
/// let host = HostRequest::builder()
///     .uri("/items?limit=5")
///     .header("Content-Type", "application/json")
///     .body(r#"{"name":"pen"}"#)
///     .build();
/// let req: RouteRequest<Value> = RouteRequest::new(host, None, None);
///
/// assert_eq!(req.query().get("limit"), Some("5"));
/// assert_eq!(req.body().await.unwrap(), json!({"name": "pen"}));
/// # });
/// ```
pub struct RouteRequest<S = Value> {
    inner: Arc<RequestParts<S>>,
}

impl<S> Clone for RouteRequest<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S> fmt::Debug for RouteRequest<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteRequest")
            .field("method", self.method())
            .field("uri", self.uri())
            .field("content_type", &self.inner.content_type)
            .field("has_schema", &self.inner.schema.is_some())
            .field("has_validator", &self.inner.validator.is_some())
            .finish_non_exhaustive()
    }
}

impl<S> RouteRequest<S>
where
    S: Send + Sync + 'static,
{
    /// Wraps a host request with the route's schema and resolved validator.
    #[must_use]
    pub fn new(
        request: HostRequest,
        schema: Option<Arc<S>>,
        validator: Option<SharedValidator<S>>,
    ) -> Self {
        let content_type = ContentType::from_header_bytes(
            request.headers().get(CONTENT_TYPE).map(HeaderValue::as_bytes),
        );
        let query = QueryParams::parse(request.query_string());
        let cookies = request
            .header(http::header::COOKIE.as_str())
            .map(Cookies::parse)
            .unwrap_or_default();

        Self {
            inner: Arc::new(RequestParts {
                request,
                content_type,
                schema,
                validator,
                query,
                cookies,
                body: OnceCell::new(),
            }),
        }
    }

    /// Returns the parsed, validated body.
    ///
    /// Fails with 415 for unsupported content types and 400 for unreadable
    /// bodies or schema mismatches.
    pub async fn body(&self) -> Result<Value, CrumbError> {
        let parts = &*self.inner;
        parts
            .body
            .get_or_try_init(|| {
                handle_body(
                    &parts.request,
                    &parts.content_type,
                    parts.schema.as_deref(),
                    parts.validator.as_deref(),
                )
            })
            .await
            .cloned()
    }

    /// Returns the body deserialized into `T`. A shape mismatch is a 400.
    pub async fn body_as<T: DeserializeOwned>(&self) -> Result<T, CrumbError> {
        let value = self.body().await?;
        serde_json::from_value(value)
            .map_err(|e| CrumbError::bad_request(format!("Invalid request body: {e}")))
    }
}

impl<S> RouteRequest<S> {
    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        self.inner.request.method()
    }

    /// Returns the request URI.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        self.inner.request.uri()
    }

    /// Returns the full request URL, including the query string.
    #[must_use]
    pub fn url(&self) -> String {
        self.uri().to_string()
    }

    /// Returns the URL path.
    #[must_use]
    pub fn path(&self) -> &str {
        self.inner.request.path()
    }

    /// Returns all request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        self.inner.request.headers()
    }

    /// Returns one header. Lookup is case-insensitive.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.inner.request.header(name)
    }

    /// Returns the path parameters.
    #[must_use]
    pub fn params(&self) -> &Params {
        self.inner.request.params()
    }

    /// Returns one path parameter.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params().get(name)
    }

    /// Returns the parsed query string.
    #[must_use]
    pub fn query(&self) -> &QueryParams {
        &self.inner.query
    }

    /// Returns the request cookies.
    #[must_use]
    pub fn cookies(&self) -> &Cookies {
        &self.inner.cookies
    }

    /// Returns the negotiated content type.
    #[must_use]
    pub fn content_type(&self) -> &ContentType {
        &self.inner.content_type
    }

    /// Returns the route schema, if any.
    #[must_use]
    pub fn schema(&self) -> Option<&S> {
        self.inner.schema.as_deref()
    }

    /// Returns the underlying host request.
    #[must_use]
    pub fn host_request(&self) -> &HostRequest {
        &self.inner.request
    }
}
