//! # Crumb Server
//!
//! Host HTTP server for Crumb routes.
//!
//! - [`Server`] / [`BoundServer`]: hyper HTTP/1 serving of prepared routes
//! - [`RouteTable`]: `:name` / `{name}` URL patterns, literal routes first
//! - [`ServerConfig`] and [`ListenOptions`]: host policy and listen input
//! - [`ShutdownSignal`]: graceful shutdown on signals or on demand
//! - [`listen`]: prepare, bind and serve in one call
//!
//! ## Example
//!
//! ```rust,no_run
//! use crumb_core::HttpMethod;
//! use crumb_extract::{RouteRequest, RouteResponse};
//! use crumb_router::{sync_handler, RouteOptions, RouteRegistry};
//! use crumb_server::{listen, ListenOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut registry = RouteRegistry::new();
//!     registry.create_route(RouteOptions::new(
//!         HttpMethod::Get,
//!         "/ping",
//!         sync_handler(|_: &RouteRequest, res: &RouteResponse| {
//!             res.send("pong");
//!             Ok(())
//!         }),
//!     ));
//!
//!     listen(&mut registry, ListenOptions::from_env()?).await?;
//!     Ok(())
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/crumb-server/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod dispatch;
mod error;
mod listen;
mod server;
mod shutdown;

pub use config::{
    ListenOptions, ServerConfig, ServerConfigBuilder, DEFAULT_HOSTNAME, DEFAULT_PORT,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SHUTDOWN_TIMEOUT_SECS, ENV_MODE,
};
pub use dispatch::{Dispatch, RouteTable};
pub use error::{ConfigError, ServerError};
pub use listen::{bind, listen, listen_with_shutdown};
pub use server::{into_http, BoundServer, HttpResponse, Server};
pub use shutdown::{ConnectionToken, ConnectionTracker, ShutdownSignal};
