//! Listen bootstrap.
//!
//! Ties the pieces together: install logging for the selected environment,
//! prepare every registered route with the global validator, bind, and
//! serve.

use crumb_router::{prepare_routes, RouteRegistry};
use crumb_telemetry::{init_logging, LogConfig};

use crate::{BoundServer, ListenOptions, Server, ServerError, ShutdownSignal};

/// Prepares the registry and binds a server, without serving yet.
///
/// The registry is drained. Logging is installed for the development or
/// production preset unless a global subscriber already exists.
pub async fn bind<S>(
    registry: &mut RouteRegistry<S>,
    options: ListenOptions<S>,
) -> Result<BoundServer, ServerError>
where
    S: Send + Sync + 'static,
{
    if let Err(e) = init_logging(&LogConfig::for_environment(options.development)) {
        tracing::debug!(error = %e, "keeping existing log subscriber");
    }

    let routes = prepare_routes(registry, options.schema_validator.as_ref());
    Server::new(options.server_config(), routes).bind().await
}

/// Prepares the registry and serves until SIGINT or SIGTERM.
pub async fn listen<S>(
    registry: &mut RouteRegistry<S>,
    options: ListenOptions<S>,
) -> Result<(), ServerError>
where
    S: Send + Sync + 'static,
{
    listen_with_shutdown(registry, options, ShutdownSignal::with_os_signals()).await
}

/// Prepares the registry and serves until `shutdown` is triggered.
pub async fn listen_with_shutdown<S>(
    registry: &mut RouteRegistry<S>,
    options: ListenOptions<S>,
    shutdown: ShutdownSignal,
) -> Result<(), ServerError>
where
    S: Send + Sync + 'static,
{
    bind(registry, options).await?.serve(shutdown).await
}
