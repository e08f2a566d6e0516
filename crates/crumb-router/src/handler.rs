//! Route handlers and hooks.
//!
//! Every handler, `on_request` hook and `pre_handler` hook has the same shape:
//! it receives the request facade and the response builder, and resolves to
//! `anyhow::Result<()>`. Returning a [`CrumbError`](crumb_core::CrumbError)
//! (directly or through `?`) produces a classified error response; any other
//! error becomes a 500.
//!
//! Async closures implement [`Handler`] directly. Synchronous functions are
//! adapted with [`sync_handler`].
//!
//! # Example
//!
//! ```rust
//! use crumb_extract::{RouteRequest, RouteResponse};
//! use crumb_router::{sync_handler, Handler};
//! use serde_json::json;
//!
//! let async_handler = |req: RouteRequest, res: RouteResponse| async move {
//!     let body = req.body().await?;
//!     res.send(json!({ "echo": body }));
//!     anyhow::Ok(())
//! };
//!
//! let plain_handler = sync_handler(|_req: &RouteRequest, res: &RouteResponse| {
//!     res.send("pong");
//!     Ok(())
//! });
//!
//! fn assert_handler<H: Handler>(_: &H) {}
//! assert_handler(&async_handler);
//! assert_handler(&plain_handler);
//! ```

use std::future::{self, Future};
use std::pin::Pin;
use std::sync::Arc;

use crumb_extract::{RouteRequest, RouteResponse};
use serde_json::Value;

/// Type alias for a boxed handler future.
pub type BoxedHandlerResult = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send>>;

/// A type-erased handler.
pub type ErasedHandler<S = Value> = Arc<dyn Handler<S>>;

/// Something that can handle a request for schema type `S`.
pub trait Handler<S = Value>: Send + Sync + 'static {
    /// Runs the handler.
    fn call(&self, request: RouteRequest<S>, response: RouteResponse) -> BoxedHandlerResult;
}

impl<S, F, Fut> Handler<S> for F
where
    F: Fn(RouteRequest<S>, RouteResponse) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    fn call(&self, request: RouteRequest<S>, response: RouteResponse) -> BoxedHandlerResult {
        Box::pin(self(request, response))
    }
}

/// Adapts a synchronous function into a [`Handler`].
pub fn sync_handler<S, F>(f: F) -> impl Handler<S>
where
    S: 'static,
    F: Fn(&RouteRequest<S>, &RouteResponse) -> anyhow::Result<()> + Send + Sync + 'static,
{
    move |request: RouteRequest<S>, response: RouteResponse| future::ready(f(&request, &response))
}

/// Erases a handler.
pub fn erase<S, H: Handler<S>>(handler: H) -> ErasedHandler<S> {
    Arc::new(handler)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crumb_core::{CrumbError, HostRequest};
    use http::StatusCode;

    fn request() -> RouteRequest {
        RouteRequest::new(HostRequest::builder().build(), None, None)
    }

    #[tokio::test]
    async fn test_async_closure_handler() {
        let handler = erase(|_req: RouteRequest, res: RouteResponse| async move {
            res.send("async");
            anyhow::Ok(())
        });

        let res = RouteResponse::new();
        handler.call(request(), res.clone()).await.unwrap();
        assert_eq!(res.into_response().body.as_deref(), Some("async"));
    }

    #[tokio::test]
    async fn test_sync_handler_error_is_kept() {
        let handler = erase(sync_handler(|_req: &RouteRequest, _res: &RouteResponse| {
            Err(CrumbError::with_status(StatusCode::FORBIDDEN, "nope").into())
        }));

        let err = handler.call(request(), RouteResponse::new()).await.unwrap_err();
        let classified = err.downcast_ref::<CrumbError>().unwrap();
        assert_eq!(classified.status_code(), StatusCode::FORBIDDEN);
    }
}
