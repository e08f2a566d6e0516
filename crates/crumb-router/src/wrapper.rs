//! The route wrapper.
//!
//! [`wrap_route`] turns a [`RouteOptions`] into a [`WrappedRoute`]: a single
//! async callback from [`HostRequest`] to wire [`Response`] that the host
//! server can invoke directly.
//!
//! Per invocation the callback:
//!
//! 1. negotiates the content type from the inbound `Content-Type` header
//!    (absent means `text/plain`),
//! 2. builds the request facade, whose lazy body accessor uses the route
//!    schema and the resolved validator,
//! 3. runs `on_request`, `pre_handler` and the handler in that order, stopping
//!    at the first failure,
//! 4. serializes the response builder on success, or maps the failure to an
//!    error response.
//!
//! A classified [`CrumbError`] answers with its own status and message.
//! Anything else, including a panic inside a handler, answers with
//! `500 Internal server error`. The callback itself never fails.

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::Arc;

use crumb_core::{CrumbError, HostRequest, HttpMethod, Response, SharedValidator};
use crumb_extract::{RouteRequest, RouteResponse};
use futures_util::FutureExt;
use tracing::{debug, error, warn};

use crate::handler::ErasedHandler;
use crate::RouteOptions;

/// Type alias for the boxed future a wrapped route returns.
pub type BoxedResponse = Pin<Box<dyn Future<Output = Response> + Send>>;

/// A route callback with the signature the host server dispatches to.
#[derive(Clone)]
pub struct WrappedRoute {
    callback: Arc<dyn Fn(HostRequest) -> BoxedResponse + Send + Sync>,
}

impl WrappedRoute {
    /// Wraps a raw callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(HostRequest) -> BoxedResponse + Send + Sync + 'static,
    {
        Self {
            callback: Arc::new(callback),
        }
    }

    /// Invokes the route.
    pub fn call(&self, request: HostRequest) -> BoxedResponse {
        (self.callback)(request)
    }
}

impl fmt::Debug for WrappedRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WrappedRoute").finish_non_exhaustive()
    }
}

struct RouteChain<S> {
    url: String,
    method: HttpMethod,
    schema: Option<Arc<S>>,
    validator: Option<SharedValidator<S>>,
    on_request: Option<ErasedHandler<S>>,
    pre_handler: Option<ErasedHandler<S>>,
    handler: ErasedHandler<S>,
}

impl<S> RouteChain<S>
where
    S: Send + Sync + 'static,
{
    async fn invoke(&self, request: HostRequest) -> Response {
        let req = RouteRequest::new(request, self.schema.clone(), self.validator.clone());
        let res = RouteResponse::new();

        debug!(
            url = %self.url,
            method = %self.method,
            content_type = %req.content_type(),
            "dispatching route"
        );

        match AssertUnwindSafe(self.run(req, res.clone()))
            .catch_unwind()
            .await
        {
            Ok(Ok(())) => res.into_response(),
            Ok(Err(err)) => self.error_response(&err),
            Err(panic) => {
                error!(
                    url = %self.url,
                    method = %self.method,
                    panic = panic_message(&*panic),
                    "route handler panicked"
                );
                Response::from_error(&CrumbError::internal("handler panicked"))
            }
        }
    }

    async fn run(&self, req: RouteRequest<S>, res: RouteResponse) -> anyhow::Result<()> {
        for hook in [&self.on_request, &self.pre_handler].into_iter().flatten() {
            hook.call(req.clone(), res.clone()).await?;
        }
        self.handler.call(req, res).await
    }

    fn error_response(&self, err: &anyhow::Error) -> Response {
        match err.downcast_ref::<CrumbError>() {
            Some(classified) => {
                let status = classified.status_code();
                if status.is_server_error() {
                    warn!(
                        url = %self.url,
                        method = %self.method,
                        status = status.as_u16(),
                        error = %classified,
                        "route failed"
                    );
                } else {
                    debug!(
                        url = %self.url,
                        method = %self.method,
                        status = status.as_u16(),
                        error = %classified,
                        "route rejected request"
                    );
                }
                Response::from_error(classified)
            }
            None => {
                error!(
                    url = %self.url,
                    method = %self.method,
                    error = format!("{err:#}"),
                    "unhandled route error"
                );
                Response::from_error(&CrumbError::internal(err.to_string()))
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}

/// Wraps a route definition into a host-server callback.
///
/// The route's own validator is used when present; otherwise
/// `global_validator` applies.
///
/// # Example
///
/// ```rust
/// use crumb_core::{HostRequest, HttpMethod};
/// use crumb_extract::{RouteRequest, RouteResponse};
/// use crumb_router::{wrap_route, RouteOptions};
/// use http::StatusCode;
///
/// # tokio_test::block_on(async {
/// let route = RouteOptions::new(HttpMethod::Get, "/boom", |_req: RouteRequest, _res: RouteResponse| async move {
///     Err::<(), _>(anyhow::anyhow!("database unavailable"))
/// });
/// let wrapped = wrap_route(route, None);
///
/// let response = wrapped.call(HostRequest::builder().uri("/boom").build()).await;
/// assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
/// assert_eq!(response.body.as_deref(), Some("Internal server error"));
/// # });
/// ```
pub fn wrap_route<S>(options: RouteOptions<S>, global_validator: Option<SharedValidator<S>>) -> WrappedRoute
where
    S: Send + Sync + 'static,
{
    let url = options.url().to_string();
    let method = options.method();
    let chain = Arc::new(RouteChain {
        url,
        method,
        schema: options.schema,
        validator: options.validator.or(global_validator),
        on_request: options.on_request,
        pre_handler: options.pre_handler,
        handler: options.handler,
    });

    WrappedRoute::new(move |request| {
        let chain = Arc::clone(&chain);
        Box::pin(async move { chain.invoke(request).await })
    })
}
