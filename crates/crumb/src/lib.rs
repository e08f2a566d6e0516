//! # Crumb
//!
//! **A request routing and request lifecycle layer for async Rust HTTP
//! services.**
//!
//! Crumb sits between route definitions and a host HTTP server:
//!
//! - **Route registry** – declarative `(url, method)` definitions with an
//!   optional body schema, validator and lifecycle hooks
//! - **Body handling** – lazy, memoised, schema-validated request bodies
//!   negotiated by `Content-Type`
//! - **Response building** – a mutable builder with automatic
//!   `Content-Type` for text and JSON bodies
//! - **Error mapping** – classified errors keep their status and message;
//!   everything else, panics included, becomes a generic 500
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use crumb::prelude::*;
//! use serde_json::Value;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut app = App::new();
//!
//!     app.post("/echo", |req: RouteRequest, res: RouteResponse| async move {
//!         let body = req.body().await?;
//!         res.send(body);
//!         anyhow::Ok(())
//!     });
//!
//!     let options = ListenOptions::from_env()?
//!         .with_schema_validator(|_data: &Value, _schema: &Value| true);
//!     app.listen(options).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Request lifecycle
//!
//! ```text
//! host server → HostRequest → WrappedRoute
//!                              │  RouteRequest + RouteResponse (fresh per call)
//!                              ├─ on_request hook
//!                              ├─ pre_handler hook
//!                              └─ handler ── body() → Content-Type → parse → validate
//!                                   │
//! wire Response ← error mapping ←───┘
//! ```

#![doc(html_root_url = "https://docs.rs/crumb/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod app;

pub use app::App;

pub use crumb_core as core;
pub use crumb_extract as extract;
pub use crumb_router as router;
pub use crumb_server as server;
pub use crumb_telemetry as telemetry;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use crumb::prelude::*;
///
/// let mut app: App = App::new();
/// app.get("/", sync_handler(|_: &RouteRequest, res: &RouteResponse| {
///     res.send("home");
///     Ok(())
/// }));
/// ```
pub mod prelude {
    pub use crate::App;

    pub use crumb_core::{
        shared_validator, CrumbError, CrumbResult, Headers, HostRequest, HttpMethod, Response,
        SchemaValidator, SharedValidator,
    };

    pub use crumb_extract::{
        ContentType, Cookies, QueryParams, ResponseBody, RouteRequest, RouteResponse, SameSite,
        SendOptions, SetCookie,
    };

    pub use crumb_router::{
        prepare_routes, sync_handler, Handler, PreparedRoutes, RouteOptions, RouteRegistry,
        WrappedRoute,
    };

    pub use crumb_server::{ListenOptions, ServerConfig, ServerError, ShutdownSignal};

    pub use crumb_telemetry::{init_logging, LogConfig};
}
