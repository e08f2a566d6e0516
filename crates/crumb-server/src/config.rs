//! Server configuration and listen options.
//!
//! [`ServerConfig`] holds host-level policy (bind address, timeouts,
//! keep-alive). [`ListenOptions`] is what an application hands to
//! [`listen`](crate::listen): where to bind, whether it runs in development
//! mode, and the global schema validator.
//!
//! # Example
//!
//! ```rust
//! use crumb_server::{ListenOptions, ServerConfig};
//! use std::time::Duration;
//!
//! let config = ServerConfig::builder()
//!     .http_addr("127.0.0.1:8080")
//!     .shutdown_timeout(Duration::from_secs(5))
//!     .build();
//! assert_eq!(config.http_addr(), "127.0.0.1:8080");
//!
//! let options: ListenOptions = ListenOptions::default().with_port(8080);
//! assert_eq!(options.server_config().http_addr(), "0.0.0.0:8080");
//! ```

use std::fmt;
use std::time::Duration;

use crumb_core::{SchemaValidator, SharedValidator};
use serde_json::Value;

use crate::ConfigError;

/// Default listen port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default listen hostname.
pub const DEFAULT_HOSTNAME: &str = "0.0.0.0";

/// Default graceful shutdown timeout in seconds.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// Default request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Environment variable that selects development mode.
pub const ENV_MODE: &str = "CRUMB_ENV";

/// Host server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    http_addr: String,
    shutdown_timeout: Duration,
    request_timeout: Duration,
    keep_alive: bool,
}

impl ServerConfig {
    /// Creates a new configuration builder.
    #[must_use]
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Returns the bind address, e.g. `0.0.0.0:3000`.
    #[must_use]
    pub fn http_addr(&self) -> &str {
        &self.http_addr
    }

    /// Returns how long shutdown waits for in-flight connections.
    #[must_use]
    pub fn shutdown_timeout(&self) -> Duration {
        self.shutdown_timeout
    }

    /// Returns the per-request timeout applied to body collection and to
    /// route execution separately.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Returns whether HTTP/1 keep-alive is enabled.
    #[must_use]
    pub fn keep_alive(&self) -> bool {
        self.keep_alive
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for [`ServerConfig`].
#[derive(Debug, Clone)]
pub struct ServerConfigBuilder {
    http_addr: String,
    shutdown_timeout: Duration,
    request_timeout: Duration,
    keep_alive: bool,
}

impl ServerConfigBuilder {
    /// Creates a builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            http_addr: bind_address(DEFAULT_HOSTNAME, DEFAULT_PORT),
            shutdown_timeout: Duration::from_secs(DEFAULT_SHUTDOWN_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            keep_alive: true,
        }
    }

    /// Sets the bind address.
    #[must_use]
    pub fn http_addr(mut self, addr: impl Into<String>) -> Self {
        self.http_addr = addr.into();
        self
    }

    /// Sets the graceful shutdown timeout.
    #[must_use]
    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Enables or disables HTTP/1 keep-alive.
    #[must_use]
    pub fn keep_alive(mut self, enabled: bool) -> Self {
        self.keep_alive = enabled;
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> ServerConfig {
        ServerConfig {
            http_addr: self.http_addr,
            shutdown_timeout: self.shutdown_timeout,
            request_timeout: self.request_timeout,
            keep_alive: self.keep_alive,
        }
    }
}

impl Default for ServerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Options accepted by [`listen`](crate::listen).
///
/// `S` is the schema type of the application's routes; the global
/// `schema_validator` applies to every route that has no validator of its
/// own.
pub struct ListenOptions<S = Value> {
    /// Port to bind. `0` picks an ephemeral port.
    pub port: u16,
    /// Hostname or IP address to bind.
    pub hostname: String,
    /// Development mode: pretty logs instead of JSON.
    pub development: bool,
    /// Global schema validator.
    pub schema_validator: Option<SharedValidator<S>>,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// Graceful shutdown timeout.
    pub shutdown_timeout: Duration,
}

impl<S> ListenOptions<S> {
    /// Reads options from the process environment, loading `.env` first if
    /// one exists.
    ///
    /// Recognised variables: `CRUMB_PORT` (or `PORT`), `CRUMB_HOSTNAME` (or
    /// `HOSTNAME`) and `CRUMB_ENV`.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(ConfigError::Dotenv(e.to_string()));
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds options from an arbitrary variable lookup.
    ///
    /// # Example
    ///
    /// ```rust
    /// use crumb_server::ListenOptions;
    ///
    /// let options: ListenOptions = ListenOptions::from_lookup(|key| match key {
    ///     "PORT" => Some("8081".to_string()),
    ///     "CRUMB_ENV" => Some("development".to_string()),
    ///     _ => None,
    /// })
    /// .unwrap();
    ///
    /// assert_eq!(options.port, 8081);
    /// assert_eq!(options.hostname, "0.0.0.0");
    /// assert!(options.development);
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match first_of(&lookup, &["CRUMB_PORT", "PORT"]) {
            Some((key, value)) => value.trim().parse::<u16>().map_err(|e| {
                ConfigError::invalid_value(key, value.clone(), e.to_string())
            })?,
            None => DEFAULT_PORT,
        };

        let hostname = match first_of(&lookup, &["CRUMB_HOSTNAME", "HOSTNAME"]) {
            Some((_, value)) if !value.trim().is_empty() => value.trim().to_string(),
            _ => DEFAULT_HOSTNAME.to_string(),
        };

        Ok(Self {
            port,
            hostname,
            development: is_development(lookup(ENV_MODE).as_deref()),
            ..Self::base()
        })
    }

    /// Sets the port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the hostname.
    #[must_use]
    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = hostname.into();
        self
    }

    /// Sets development mode.
    #[must_use]
    pub fn with_development(mut self, development: bool) -> Self {
        self.development = development;
        self
    }

    /// Sets the global schema validator.
    #[must_use]
    pub fn with_schema_validator<V>(mut self, validator: V) -> Self
    where
        V: SchemaValidator<S> + 'static,
    {
        self.schema_validator = Some(std::sync::Arc::new(validator));
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets the graceful shutdown timeout.
    #[must_use]
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Returns the bind address these options resolve to.
    #[must_use]
    pub fn address(&self) -> String {
        bind_address(&self.hostname, self.port)
    }

    /// Builds the host server configuration.
    #[must_use]
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig::builder()
            .http_addr(self.address())
            .request_timeout(self.request_timeout)
            .shutdown_timeout(self.shutdown_timeout)
            .build()
    }

    fn base() -> Self {
        Self {
            port: DEFAULT_PORT,
            hostname: DEFAULT_HOSTNAME.to_string(),
            development: false,
            schema_validator: None,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            shutdown_timeout: Duration::from_secs(DEFAULT_SHUTDOWN_TIMEOUT_SECS),
        }
    }
}

impl<S> Default for ListenOptions<S> {
    fn default() -> Self {
        Self {
            development: is_development(std::env::var(ENV_MODE).ok().as_deref()),
            ..Self::base()
        }
    }
}

impl<S> fmt::Debug for ListenOptions<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenOptions")
            .field("port", &self.port)
            .field("hostname", &self.hostname)
            .field("development", &self.development)
            .field("has_schema_validator", &self.schema_validator.is_some())
            .field("request_timeout", &self.request_timeout)
            .field("shutdown_timeout", &self.shutdown_timeout)
            .finish()
    }
}

fn first_of<F>(lookup: &F, keys: &[&'static str]) -> Option<(&'static str, String)>
where
    F: Fn(&str) -> Option<String>,
{
    keys.iter().find_map(|key| lookup(key).map(|value| (*key, value)))
}

fn is_development(mode: Option<&str>) -> bool {
    mode.is_some_and(|mode| mode.trim().eq_ignore_ascii_case("development"))
}

/// Joins a hostname and port, bracketing bare IPv6 literals.
fn bind_address(hostname: &str, port: u16) -> String {
    if hostname.contains(':') && !hostname.starts_with('[') {
        format!("[{hostname}]:{port}")
    } else {
        format!("{hostname}:{port}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(vars: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v).to_string())
        }
    }

    #[test]
    fn test_server_config_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.http_addr(), "0.0.0.0:3000");
        assert_eq!(config.shutdown_timeout(), Duration::from_secs(30));
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(config.keep_alive());
    }

    #[test]
    fn test_server_config_builder() {
        let config = ServerConfig::builder()
            .http_addr("127.0.0.1:0")
            .request_timeout(Duration::from_millis(250))
            .keep_alive(false)
            .build();

        assert_eq!(config.http_addr(), "127.0.0.1:0");
        assert_eq!(config.request_timeout(), Duration::from_millis(250));
        assert!(!config.keep_alive());
    }

    #[test]
    fn test_from_lookup_defaults() {
        let options: ListenOptions = ListenOptions::from_lookup(lookup(&[])).unwrap();
        assert_eq!(options.port, 3000);
        assert_eq!(options.hostname, "0.0.0.0");
        assert!(!options.development);
        assert!(options.schema_validator.is_none());
    }

    #[test]
    fn test_from_lookup_prefers_crumb_prefixed_names() {
        let options: ListenOptions = ListenOptions::from_lookup(lookup(&[
            ("PORT", "1000"),
            ("CRUMB_PORT", "2000"),
            ("HOSTNAME", "ignored"),
            ("CRUMB_HOSTNAME", "127.0.0.1"),
        ]))
        .unwrap();

        assert_eq!(options.port, 2000);
        assert_eq!(options.hostname, "127.0.0.1");
    }

    #[test]
    fn test_from_lookup_invalid_port() {
        let err = ListenOptions::<Value>::from_lookup(lookup(&[("CRUMB_PORT", "http")]))
            .unwrap_err();
        match err {
            ConfigError::InvalidValue { key, value, .. } => {
                assert_eq!(key, "CRUMB_PORT");
                assert_eq!(value, "http");
            }
            other => panic!("unexpected error: {other}"),
        }

        assert!(ListenOptions::<Value>::from_lookup(lookup(&[("PORT", "70000")])).is_err());
    }

    #[test]
    fn test_development_mode() {
        assert!(is_development(Some("development")));
        assert!(is_development(Some("Development ")));
        assert!(!is_development(Some("production")));
        assert!(!is_development(None));
    }

    #[test]
    fn test_bind_address_formats() {
        assert_eq!(bind_address("localhost", 80), "localhost:80");
        assert_eq!(bind_address("::1", 80), "[::1]:80");
        assert_eq!(bind_address("[::1]", 80), "[::1]:80");
    }

    #[test]
    fn test_server_config_from_options() {
        let options: ListenOptions = ListenOptions::from_lookup(lookup(&[]))
            .unwrap()
            .with_hostname("127.0.0.1")
            .with_port(0)
            .with_request_timeout(Duration::from_secs(2))
            .with_schema_validator(|_: &Value, _: &Value| true);

        let config = options.server_config();
        assert_eq!(config.http_addr(), "127.0.0.1:0");
        assert_eq!(config.request_timeout(), Duration::from_secs(2));
        assert!(options.schema_validator.is_some());
        assert!(format!("{options:?}").contains("has_schema_validator: true"));
    }
}
