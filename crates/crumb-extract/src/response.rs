//! The response builder handed to route handlers.
//!
//! A [`RouteResponse`] is created fresh for every request. Handlers record
//! headers, cookies, status and body on it; once the handler chain completes
//! the route wrapper calls [`RouteResponse::into_response`] to serialize the
//! accumulated state into a wire [`Response`].
//!
//! # Content-Type defaults
//!
//! Each `send` derives a default `Content-Type` from the body
//! (`application/json` for structured data, `text/plain` for strings) unless
//! the handler set `Content-Type` itself through [`RouteResponse::set_header`].
//! The explicit header always wins.
//!
//! # Example
//!
//! ```rust
//! use crumb_extract::{RouteResponse, SendOptions};
//! use http::StatusCode;
//! use serde_json::json;
//!
//! let res = RouteResponse::new();
//! res.set_header("X-Request-Id", "42");
//! res.send_with(json!({"ok": true}), SendOptions::status(StatusCode::CREATED));
//!
//! let wire = res.into_response();
//! assert_eq!(wire.status, StatusCode::CREATED);
//! assert_eq!(wire.headers.get("content-type"), Some("application/json"));
//! assert_eq!(wire.body.as_deref(), Some(r#"{"ok":true}"#));
//! ```

use std::sync::Arc;

use crumb_core::{CrumbError, Headers, Response};
use http::header::{CONTENT_TYPE, SET_COOKIE};
use http::StatusCode;
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;

use crate::SetCookie;

/// A body recorded by `send`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ResponseBody {
    /// No body at all.
    #[default]
    Empty,
    /// A string sent verbatim.
    Text(String),
    /// Structured data serialized as JSON.
    Json(Value),
}

impl ResponseBody {
    fn default_content_type(&self) -> Option<&'static str> {
        match self {
            Self::Empty => None,
            Self::Text(_) => Some("text/plain"),
            Self::Json(_) => Some("application/json"),
        }
    }
}

impl From<&str> for ResponseBody {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for ResponseBody {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Value> for ResponseBody {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Empty,
            Value::String(text) => Self::Text(text),
            other => Self::Json(other),
        }
    }
}

impl From<()> for ResponseBody {
    fn from((): ()) -> Self {
        Self::Empty
    }
}

/// Status overrides applied by `send_with`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendOptions {
    /// New status code.
    pub status: Option<StatusCode>,
    /// New reason phrase.
    pub status_text: Option<String>,
}

impl SendOptions {
    /// Options that only set the status.
    #[must_use]
    pub fn status(status: StatusCode) -> Self {
        Self {
            status: Some(status),
            status_text: None,
        }
    }

    /// Adds a reason phrase.
    #[must_use]
    pub fn with_status_text(mut self, text: impl Into<String>) -> Self {
        self.status_text = Some(text.into());
        self
    }
}

#[derive(Debug)]
struct ResponseState {
    headers: Headers,
    body: ResponseBody,
    status: StatusCode,
    status_text: Option<String>,
    content_type_explicit: bool,
}

impl Default for ResponseState {
    fn default() -> Self {
        Self {
            headers: Headers::new(),
            body: ResponseBody::Empty,
            status: StatusCode::OK,
            status_text: None,
            content_type_explicit: false,
        }
    }
}

/// Per-request response builder.
///
/// Cloning yields another handle to the same state, so hooks and the handler
/// all write into one response.
#[derive(Debug, Clone, Default)]
pub struct RouteResponse {
    state: Arc<Mutex<ResponseState>>,
}

impl RouteResponse {
    /// Creates an empty builder: status 200, no headers, no body.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a header, replacing any value under the same name in any casing.
    pub fn set_header(&self, name: &str, value: impl Into<String>) {
        let mut state = self.state.lock();
        if name.eq_ignore_ascii_case(CONTENT_TYPE.as_str()) {
            state.content_type_explicit = true;
        }
        state.headers.set(name, value);
    }

    /// Returns the current value of a header.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<String> {
        self.state.lock().headers.get(name).map(str::to_owned)
    }

    /// Sets the status without touching the body.
    pub fn status(&self, status: StatusCode) {
        self.state.lock().status = status;
    }

    /// Returns the current status.
    #[must_use]
    pub fn current_status(&self) -> StatusCode {
        self.state.lock().status
    }

    /// Records the body. Later calls replace earlier ones.
    pub fn send(&self, data: impl Into<ResponseBody>) {
        self.send_with(data, SendOptions::default());
    }

    /// Records the body and applies status overrides.
    pub fn send_with(&self, data: impl Into<ResponseBody>, options: SendOptions) {
        let body = data.into();
        let mut state = self.state.lock();

        if !state.content_type_explicit {
            match body.default_content_type() {
                Some(content_type) => state.headers.set(CONTENT_TYPE.as_str(), content_type),
                None => {
                    state.headers.remove(CONTENT_TYPE.as_str());
                }
            }
        }
        if let Some(status) = options.status {
            state.status = status;
        }
        if let Some(text) = options.status_text {
            state.status_text = Some(text);
        }
        state.body = body;
    }

    /// Serializes `data` and records it as a structured body.
    pub fn send_json<T: Serialize>(&self, data: &T) -> Result<(), CrumbError> {
        let value = serde_json::to_value(data)
            .map_err(|e| CrumbError::internal_with_source("response serialization failed", e))?;
        self.send(ResponseBody::Json(value));
        Ok(())
    }

    /// Redirects to `url` with `status`, or 302 when none is given.
    ///
    /// Same as `set_header("Location", url)` followed by an empty `send_with`.
    pub fn redirect(&self, url: &str, status: Option<StatusCode>) {
        self.set_header("Location", url);
        self.send_with(
            "",
            SendOptions::status(status.unwrap_or(StatusCode::FOUND)),
        );
    }

    /// Appends a `Set-Cookie` header line.
    pub fn set_cookie(&self, cookie: &SetCookie) {
        self.state
            .lock()
            .headers
            .append(SET_COOKIE.as_str(), cookie.to_header_value());
    }

    /// Appends a `Set-Cookie` line that removes `name`.
    pub fn clear_cookie(&self, name: &str) {
        self.set_cookie(&SetCookie::remove(name));
    }

    /// Serializes the accumulated state into a wire response.
    ///
    /// Structured bodies become JSON text, strings pass through unchanged and
    /// an empty body stays absent.
    pub fn into_response(self) -> Response {
        let state = std::mem::take(&mut *self.state.lock());

        let body = match state.body {
            ResponseBody::Empty => None,
            ResponseBody::Text(text) => Some(text),
            ResponseBody::Json(value) => Some(value.to_string()),
        };

        Response {
            status: state.status,
            status_text: state.status_text,
            headers: state.headers,
            body,
        }
    }
}
