//! Server and configuration errors.

use thiserror::Error;

/// Errors raised while binding or running the host server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listener could not be bound.
    #[error("failed to bind to {addr}: {source}")]
    Bind {
        /// The address that was requested.
        addr: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The configured address cannot be turned into a socket address.
    #[error("invalid address '{0}'")]
    InvalidAddress(String),

    /// The listen options could not be assembled.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Any other I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while reading listen options from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable was present but could not be parsed.
    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        /// The environment variable name.
        key: String,
        /// The raw value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The `.env` file exists but could not be loaded.
    #[error("failed to load .env file: {0}")]
    Dotenv(String),
}

impl ConfigError {
    /// Creates an invalid value error.
    pub fn invalid_value(
        key: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            key: key.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}
