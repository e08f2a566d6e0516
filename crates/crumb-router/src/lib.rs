//! Route registration, wrapping and preparation for Crumb.
//!
//! This crate turns declarative route definitions into callbacks the host
//! server can dispatch to:
//!
//! ```text
//! RouteOptions ──create_route──▶ RouteRegistry ──prepare_routes──▶ PreparedRoutes
//!                                                    │
//!                                          wrap_route per method
//!                                                    │
//!                                   HostRequest ──▶ WrappedRoute ──▶ Response
//! ```
//!
//! - [`RouteOptions`] - One `(url, method)` definition: schema, validator, hooks, handler
//! - [`RouteRegistry`] - Owned registration context, drained by preparation
//! - [`wrap_route`] - Body handling, hook chain and error mapping around a handler
//! - [`prepare_route`] / [`prepare_routes`] - Lookup structures for the host server
//!
//! # Example
//!
//! ```rust
//! use crumb_core::{HostRequest, HttpMethod};
//! use crumb_extract::{RouteRequest, RouteResponse};
//! use crumb_router::{prepare_routes, RouteOptions, RouteRegistry};
//! use http::StatusCode;
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let mut registry = RouteRegistry::new();
//! registry.create_route(RouteOptions::new(
//!     HttpMethod::Get,
//!     "/hello",
//!     |req: RouteRequest, res: RouteResponse| async move {
//!         let name = req.query().get("name").unwrap_or("world").to_string();
//!         res.send(json!({ "hello": name }));
//!         anyhow::Ok(())
//!     },
//! ));
//!
//! let routes = prepare_routes(&mut registry, None);
//! let response = routes["/hello"][&HttpMethod::Get]
//!     .call(HostRequest::builder().uri("/hello?name=crumb").build())
//!     .await;
//!
//! assert_eq!(response.status, StatusCode::OK);
//! assert_eq!(response.body.as_deref(), Some(r#"{"hello":"crumb"}"#));
//! # });
//! ```

#![doc(html_root_url = "https://docs.rs/crumb-router/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod handler;
mod prepare;
mod registry;
mod route;
mod wrapper;

pub use handler::{erase, sync_handler, BoxedHandlerResult, ErasedHandler, Handler};
pub use prepare::{prepare_route, prepare_routes, PreparedRoute, PreparedRoutes};
pub use registry::{Route, RouteRegistry};
pub use route::RouteOptions;
pub use wrapper::{wrap_route, BoxedResponse, WrappedRoute};
