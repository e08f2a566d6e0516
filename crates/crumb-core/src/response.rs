//! The wire-level response returned by a prepared route.

use http::StatusCode;

use crate::{CrumbError, Headers};

/// A fully serialized response, ready for the host server to write.
///
/// `body` is `None` when the handler produced no content, which is distinct
/// from `Some(String::new())`.
///
/// # Example
///
/// ```rust
/// use crumb_core::{CrumbError, Response};
/// use http::StatusCode;
///
/// let response = Response::from_error(&CrumbError::schema_mismatch());
/// assert_eq!(response.status, StatusCode::BAD_REQUEST);
/// assert_eq!(response.body.as_deref(), Some("Request does not match schema"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Status code.
    pub status: StatusCode,
    /// Reason phrase overriding the canonical one.
    pub status_text: Option<String>,
    /// Response headers.
    pub headers: Headers,
    /// Serialized body, if any.
    pub body: Option<String>,
}

impl Response {
    /// Creates an empty response with the given status.
    #[must_use]
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            status_text: None,
            headers: Headers::new(),
            body: None,
        }
    }

    /// Creates a `text/plain` response.
    #[must_use]
    pub fn text(status: StatusCode, body: impl Into<String>) -> Self {
        let mut response = Self::new(status);
        response.headers.set("Content-Type", "text/plain");
        response.body = Some(body.into());
        response
    }

    /// Creates the response for a classified error.
    ///
    /// The body is exactly the error's client message.
    #[must_use]
    pub fn from_error(error: &CrumbError) -> Self {
        Self::text(error.status_code(), error.client_message())
    }

    /// Returns the reason phrase to send: the override, else the canonical one.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        self.status_text
            .as_deref()
            .or_else(|| self.status.canonical_reason())
    }
}
