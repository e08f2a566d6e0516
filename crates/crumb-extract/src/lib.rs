//! # Crumb Extract
//!
//! Request-side and response-side building blocks for Crumb route handlers.
//!
//! | Item | Role |
//! |------|------|
//! | [`handle_body`] | Parse a body by [`ContentType`] and run the schema validator |
//! | [`RouteRequest`] | Request facade with a lazy, memoised body accessor |
//! | [`RouteResponse`] | Response builder accumulating headers, status and body |
//! | [`QueryParams`] | Parsed query string |
//! | [`Cookies`] / [`SetCookie`] | Request cookies and `Set-Cookie` values |
//!
//! ## Example
//!
//! ```rust
//! use crumb_core::HostRequest;
//! use crumb_extract::{RouteRequest, RouteResponse};
//! use serde_json::{json, Value};
//!
//! # tokio_test::block_on(async {
//! let req: RouteRequest<Value> = RouteRequest::new(
//!     HostRequest::builder()
//!         .header("Content-Type", "application/json")
//!         .body(r#"{"name":"crumb"}"#)
//!         .build(),
//!     None,
//!     None,
//! );
//! let res = RouteResponse::new();
//!
//! let body = req.body().await.unwrap();
//! res.send(json!({ "hello": body["name"] }));
//!
//! let wire = res.into_response();
//! assert_eq!(wire.body.as_deref(), Some(r#"{"hello":"crumb"}"#));
//! # });
//! ```

#![doc(html_root_url = "https://docs.rs/crumb-extract/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod body;
mod content_type;
pub mod cookie;
mod query;
mod request;
pub mod response;

pub use body::handle_body;
pub use content_type::ContentType;
pub use cookie::{Cookies, SameSite, SetCookie};
pub use query::QueryParams;
pub use request::RouteRequest;
pub use response::{ResponseBody, RouteResponse, SendOptions};
