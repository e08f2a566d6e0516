//! The inbound request value handed to a prepared route.
//!
//! [`HostRequest`] is what the host server passes to every wrapped route
//! callback: method, URL with query string, headers and the collected body,
//! plus any path parameters the host router captured. Its [`json`] and
//! [`text`] readers resolve to classified errors, never panics.
//!
//! [`json`]: HostRequest::json
//! [`text`]: HostRequest::text

use bytes::Bytes;
use http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use http::{HeaderMap, Method, Uri};
use serde_json::Value;

use crate::{CrumbError, Params};

/// A request as delivered by the host server.
///
/// # Example
///
/// ```rust
/// use crumb_core::HostRequest;
/// use http::Method;
///
/// let request = HostRequest::builder()
///     .method(Method::POST)
///     .uri("/items?limit=5")
///     .header("Content-Type", "application/json")
///     .body(r#"{"price":100}"#)
///     .build();
///
/// assert_eq!(request.path(), "/items");
/// assert_eq!(request.query_string(), Some("limit=5"));
/// assert_eq!(request.content_type(), Some("application/json"));
/// ```
#[derive(Debug, Clone)]
pub struct HostRequest {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    params: Params,
}

impl HostRequest {
    /// Creates a new request.
    #[must_use]
    pub fn new(method: Method, uri: Uri, headers: HeaderMap, body: Bytes, params: Params) -> Self {
        Self {
            method,
            uri,
            headers,
            body,
            params,
        }
    }

    /// Returns a builder, mainly for tests and embedding.
    #[must_use]
    pub fn builder() -> HostRequestBuilder {
        HostRequestBuilder::default()
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request URI.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Returns the path portion of the URI.
    #[must_use]
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Returns the raw query string, if any.
    #[must_use]
    pub fn query_string(&self) -> Option<&str> {
        self.uri.query()
    }

    /// Returns the request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns a header value as a string. Lookup is case-insensitive.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns the `Content-Type` header, or `None` if it is absent or not
    /// visible ASCII.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
    }

    /// Returns the path parameters captured by the host router.
    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Replaces the path parameters.
    pub fn set_params(&mut self, params: Params) {
        self.params = params;
    }

    /// Returns the raw body bytes.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Reads the body as JSON.
    ///
    /// An empty or malformed body fails with a bad request error carrying the
    /// parser's message.
    pub async fn json(&self) -> Result<Value, CrumbError> {
        serde_json::from_slice(&self.body)
            .map_err(|e| CrumbError::bad_request(format!("Invalid JSON body: {e}")))
    }

    /// Reads the body as UTF-8 text.
    pub async fn text(&self) -> Result<String, CrumbError> {
        std::str::from_utf8(&self.body)
            .map(ToOwned::to_owned)
            .map_err(|e| CrumbError::bad_request(format!("Request body is not valid UTF-8: {e}")))
    }
}

/// Builder for [`HostRequest`].
#[derive(Debug, Default)]
pub struct HostRequestBuilder {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    params: Params,
}

impl HostRequestBuilder {
    /// Sets the HTTP method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets the URI. An unparsable URI leaves the current one in place.
    #[must_use]
    pub fn uri(mut self, uri: &str) -> Self {
        if let Ok(uri) = uri.parse() {
            self.uri = uri;
        }
        self
    }

    /// Appends a header. Invalid names or values are skipped.
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::try_from(name),
            HeaderValue::try_from(value),
        ) {
            self.headers.append(name, value);
        }
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Adds a path parameter.
    #[must_use]
    pub fn param(mut self, name: &str, value: &str) -> Self {
        self.params.push(name, value);
        self
    }

    /// Builds the request.
    #[must_use]
    pub fn build(self) -> HostRequest {
        HostRequest::new(self.method, self.uri, self.headers, self.body, self.params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use serde_json::json;

    #[tokio::test]
    async fn test_json_reads_body() {
        let request = HostRequest::builder().body(r#"{"price":100}"#).build();
        assert_eq!(request.json().await.unwrap(), json!({"price": 100}));
    }

    #[tokio::test]
    async fn test_json_rejects_malformed_body() {
        let request = HostRequest::builder().body("{price:").build();
        let err = request.json().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
        assert!(err.client_message().starts_with("Invalid JSON body"));
    }

    #[tokio::test]
    async fn test_json_rejects_empty_body() {
        let request = HostRequest::builder().build();
        assert!(request.json().await.is_err());
    }

    #[tokio::test]
    async fn test_text_reads_utf8() {
        let request = HostRequest::builder().body("héllo").build();
        assert_eq!(request.text().await.unwrap(), "héllo");
    }

    #[tokio::test]
    async fn test_text_rejects_invalid_utf8() {
        let request = HostRequest::builder()
            .body(Bytes::from_static(&[0xff, 0xfe, 0x00]))
            .build();
        let err = request.text().await.unwrap_err();
        assert_eq!(err.status_code(), http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let request = HostRequest::builder()
            .header("X-Trace", "abc")
            .header("content-type", "text/plain")
            .build();
        assert_eq!(request.header("x-trace"), Some("abc"));
        assert_eq!(request.header("X-TRACE"), Some("abc"));
        assert_eq!(request.content_type(), Some("text/plain"));
    }

    #[test]
    fn test_builder_defaults() {
        let request = HostRequest::builder().param("id", "9").build();
        assert_eq!(request.method(), &Method::GET);
        assert_eq!(request.path(), "/");
        assert_eq!(request.params().get("id"), Some("9"));
        assert!(request.body().is_empty());
    }
}
