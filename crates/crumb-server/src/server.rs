//! The host HTTP server.
//!
//! [`Server`] serves a [`RouteTable`] over HTTP/1 with hyper, one task per
//! connection. Every request gets a `request` span carrying a UUID v7
//! request id; the body is collected before dispatch so wrapped routes only
//! ever see a complete [`HostRequest`].
//!
//! Host policies live here rather than in the route wrapper:
//!
//! | Situation | Response |
//! |---|---|
//! | no route pattern matches | 404 `Not Found` |
//! | pattern matches, method does not | 405 `Method Not Allowed` + `Allow` |
//! | body cannot be read | 400 `Failed to read request body` |
//! | body exceeds the request timeout | 408 `Request Timeout` |
//! | route exceeds the request timeout | 504 `Gateway Timeout` |

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use crumb_core::{HostRequest, Response};
use crumb_router::PreparedRoutes;
use http::header::{HeaderValue, CONTENT_TYPE};
use http::request::Parts;
use http::StatusCode;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::ext::ReasonPhrase;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::Request;
use hyper_util::rt::TokioIo;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::{ConnectionTracker, Dispatch, RouteTable, ServerConfig, ServerError, ShutdownSignal};

/// Response type handed to hyper.
pub type HttpResponse = http::Response<Full<Bytes>>;

/// An HTTP server for prepared routes.
///
/// # Example
///
/// ```rust,no_run
/// use crumb_router::PreparedRoutes;
/// use crumb_server::{Server, ServerConfig, ShutdownSignal};
///
/// # async fn run() -> Result<(), crumb_server::ServerError> {
/// let config = ServerConfig::builder().http_addr("127.0.0.1:0").build();
/// let bound = Server::new(config, PreparedRoutes::new()).bind().await?;
/// println!("listening on {}", bound.local_addr());
///
/// bound.serve(ShutdownSignal::new()).await
/// # }
/// ```
#[derive(Debug)]
pub struct Server {
    config: ServerConfig,
    routes: RouteTable,
}

impl Server {
    /// Creates a server for the given routes.
    #[must_use]
    pub fn new(config: ServerConfig, routes: PreparedRoutes) -> Self {
        Self {
            config,
            routes: RouteTable::new(routes),
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Binds the listener without accepting connections yet.
    pub async fn bind(self) -> Result<BoundServer, ServerError> {
        let addr = self.config.http_addr().to_string();
        let listener = TcpListener::bind(addr.as_str())
            .await
            .map_err(|source| match source.kind() {
                std::io::ErrorKind::InvalidInput => ServerError::InvalidAddress(addr.clone()),
                _ => ServerError::Bind {
                    addr: addr.clone(),
                    source,
                },
            })?;
        let local_addr = listener.local_addr()?;

        info!(addr = %local_addr, routes = self.routes.len(), "server listening");

        Ok(BoundServer {
            listener,
            local_addr,
            service: Arc::new(RequestService {
                config: self.config,
                routes: self.routes,
            }),
        })
    }

    /// Binds and serves until SIGINT or SIGTERM.
    pub async fn run(self) -> Result<(), ServerError> {
        self.run_with_shutdown(ShutdownSignal::with_os_signals()).await
    }

    /// Binds and serves until `shutdown` is triggered.
    pub async fn run_with_shutdown(self, shutdown: ShutdownSignal) -> Result<(), ServerError> {
        self.bind().await?.serve(shutdown).await
    }
}

/// A server whose listener is bound.
#[derive(Debug)]
pub struct BoundServer {
    listener: TcpListener,
    local_addr: SocketAddr,
    service: Arc<RequestService>,
}

impl BoundServer {
    /// Returns the address actually bound, useful with port `0`.
    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Accepts connections until `shutdown` is triggered, then waits for
    /// live connections up to the shutdown timeout.
    pub async fn serve(self, shutdown: ShutdownSignal) -> Result<(), ServerError> {
        let tracker = ConnectionTracker::new();

        loop {
            tokio::select! {
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, remote_addr)) => {
                        let service = Arc::clone(&self.service);
                        let token = tracker.acquire();
                        let shutdown = shutdown.clone();

                        tokio::spawn(async move {
                            if let Err(e) = service.serve_connection(stream, shutdown).await {
                                debug!(%remote_addr, error = %e, "connection error");
                            }
                            drop(token);
                        });
                    }
                    Err(e) => warn!(error = %e, "failed to accept connection"),
                },
                () = shutdown.recv() => break,
            }
        }

        let grace = self.service.config.shutdown_timeout();
        info!(
            active = tracker.active_connections(),
            grace_ms = grace.as_millis(),
            "server shutting down"
        );

        if timeout(grace, tracker.wait_idle()).await.is_err() {
            warn!(
                active = tracker.active_connections(),
                "shutdown timeout reached with connections still open"
            );
        }

        info!("server stopped");
        Ok(())
    }
}

#[derive(Debug)]
struct RequestService {
    config: ServerConfig,
    routes: RouteTable,
}

impl RequestService {
    async fn serve_connection(
        self: Arc<Self>,
        stream: TcpStream,
        shutdown: ShutdownSignal,
    ) -> Result<(), hyper::Error> {
        let keep_alive = self.config.keep_alive();
        let service = service_fn(move |request: Request<Incoming>| {
            let this = Arc::clone(&self);
            async move { Ok::<_, Infallible>(this.handle(request).await) }
        });

        let conn = http1::Builder::new()
            .keep_alive(keep_alive)
            .serve_connection(TokioIo::new(stream), service);
        let mut conn = std::pin::pin!(conn);

        tokio::select! {
            result = conn.as_mut() => return result,
            () = shutdown.recv() => conn.as_mut().graceful_shutdown(),
        }
        conn.await
    }

    async fn handle(&self, request: Request<Incoming>) -> HttpResponse {
        let request_id = Uuid::now_v7();
        let span = info_span!(
            "request",
            request_id = %request_id,
            method = %request.method(),
            path = %request.uri().path(),
        );
        self.respond(request).instrument(span).await
    }

    async fn respond(&self, request: Request<Incoming>) -> HttpResponse {
        let started = Instant::now();
        let (parts, body) = request.into_parts();

        let response = match timeout(self.config.request_timeout(), body.collect()).await {
            Ok(Ok(collected)) => self.route(parts, collected.to_bytes()).await,
            Ok(Err(e)) => {
                warn!(error = %e, "failed to read request body");
                Response::text(StatusCode::BAD_REQUEST, "Failed to read request body")
            }
            Err(_) => {
                warn!("request body timed out");
                Response::text(StatusCode::REQUEST_TIMEOUT, "Request Timeout")
            }
        };

        let status = response.status.as_u16();
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        crumb_telemetry::log_request_complete!(status, duration_ms);

        into_http(response)
    }

    async fn route(&self, parts: Parts, body: Bytes) -> Response {
        match self.routes.dispatch(&parts.method, parts.uri.path()) {
            Dispatch::Matched { url, route, params } => {
                debug!(route = url, "route matched");
                let request = HostRequest::new(parts.method, parts.uri, parts.headers, body, params);

                match timeout(self.config.request_timeout(), route.call(request)).await {
                    Ok(response) => response,
                    Err(_) => {
                        warn!(route = url, "route timed out");
                        Response::text(StatusCode::GATEWAY_TIMEOUT, "Gateway Timeout")
                    }
                }
            }
            Dispatch::MethodNotAllowed { allowed } => {
                let allow = allowed
                    .iter()
                    .map(|method| method.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                let mut response =
                    Response::text(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed");
                response.headers.set("Allow", allow);
                response
            }
            Dispatch::NotFound => Response::text(StatusCode::NOT_FOUND, "Not Found"),
        }
    }
}

/// Converts a wire response into a hyper response.
///
/// A custom status text becomes the HTTP/1 reason phrase. A response that
/// cannot be represented (invalid header name or value) is replaced by a
/// plain 500.
pub fn into_http(response: Response) -> HttpResponse {
    let mut builder = http::Response::builder().status(response.status);
    for (name, value) in response.headers.iter() {
        builder = builder.header(name, value);
    }

    let body = response.body.map(Bytes::from).unwrap_or_default();
    let mut http_response = match builder.body(Full::new(body)) {
        Ok(http_response) => http_response,
        Err(e) => {
            error!(error = %e, "route produced an invalid response");
            return internal_error();
        }
    };

    if let Some(text) = response.status_text {
        match ReasonPhrase::try_from(text) {
            Ok(reason) => {
                http_response.extensions_mut().insert(reason);
            }
            Err(e) => warn!(error = %e, "ignoring invalid status text"),
        }
    }

    http_response
}

fn internal_error() -> HttpResponse {
    let mut response = http::Response::new(Full::new(Bytes::from_static(
        crumb_core::INTERNAL_ERROR_MESSAGE.as_bytes(),
    )));
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
    response
}
