//! Error types for Crumb.
//!
//! This module provides the [`CrumbError`] type, the classified error used
//! across the request pipeline. A classified error carries an explicit HTTP
//! status code; the route wrapper turns it into a response whose body is the
//! error's client message.
//!
//! # Error taxonomy
//!
//! | `ErrorKind` | Status | Trigger |
//! |---|---|---|
//! | `BadRequest` | 400 | Body read/parse failure, schema mismatch |
//! | `UnsupportedMediaType` | 415 | Content type other than JSON or plain text |
//! | `Internal` | 500 | Any failure not classified otherwise |
//! | `Status` | any | Handler-chosen status and message |

use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using [`CrumbError`].
pub type CrumbResult<T> = Result<T, CrumbError>;

/// Body text sent for every internal error.
///
/// Unclassified failures never leak their detail to the client.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Body text sent when a parsed body is rejected by the schema validator.
pub const SCHEMA_MISMATCH_MESSAGE: &str = "Request does not match schema";

/// Kinds of classified errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The request body could not be read, parsed or validated.
    BadRequest,
    /// The request content type is not supported.
    UnsupportedMediaType,
    /// Internal failure.
    Internal,
    /// Explicit status chosen by a handler.
    Status,
}

impl ErrorKind {
    /// Returns the default HTTP status code for this kind.
    ///
    /// `Status` errors carry their own code; this returns 500 for them.
    #[must_use]
    pub const fn default_status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::Internal | Self::Status => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Classified error for Crumb.
///
/// # Example
///
/// ```
/// use crumb_core::{CrumbError, ErrorKind};
/// use http::StatusCode;
///
/// fn parse_price(raw: &str) -> Result<u32, CrumbError> {
///     raw.parse()
///         .map_err(|_| CrumbError::bad_request(format!("invalid price: {raw}")))
/// }
///
/// let err = parse_price("ten").unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::BadRequest);
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// assert_eq!(err.client_message(), "invalid price: ten");
/// ```
#[derive(Error, Debug)]
pub enum CrumbError {
    /// The request body could not be read, parsed or validated.
    #[error("Bad request: {message}")]
    BadRequest {
        /// Human-readable error message.
        message: String,
    },

    /// The request content type is not supported by the body handler.
    #[error("Unsupported media type: {message}")]
    UnsupportedMediaType {
        /// The offending content type, as received.
        content_type: String,
        /// Human-readable error message.
        message: String,
    },

    /// Internal server error.
    #[error("Internal error: {message}")]
    Internal {
        /// Detail for logs (never sent to clients).
        message: String,
        /// The underlying error.
        #[source]
        source: Option<anyhow::Error>,
    },

    /// An error with an explicit status code.
    #[error("{status}: {message}")]
    Status {
        /// The HTTP status to respond with.
        status: StatusCode,
        /// Message sent as the response body.
        message: String,
    },
}

impl CrumbError {
    /// Creates a bad request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Creates the error returned when a body fails schema validation.
    #[must_use]
    pub fn schema_mismatch() -> Self {
        Self::bad_request(SCHEMA_MISMATCH_MESSAGE)
    }

    /// Creates an unsupported media type error for the given content type.
    #[must_use]
    pub fn unsupported_media_type(content_type: impl Into<String>) -> Self {
        let content_type = content_type.into();
        Self::UnsupportedMediaType {
            message: format!("Unsupported content type: {content_type}"),
            content_type,
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an internal error with a source error.
    pub fn internal_with_source(
        message: impl Into<String>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Creates an error with an explicit status code.
    ///
    /// # Example
    ///
    /// ```
    /// use crumb_core::CrumbError;
    /// use http::StatusCode;
    ///
    /// let err = CrumbError::with_status(StatusCode::NOT_FOUND, "No such user");
    /// assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    /// assert_eq!(err.client_message(), "No such user");
    /// ```
    #[must_use]
    pub fn with_status(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// Returns the error kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::BadRequest { .. } => ErrorKind::BadRequest,
            Self::UnsupportedMediaType { .. } => ErrorKind::UnsupportedMediaType,
            Self::Internal { .. } => ErrorKind::Internal,
            Self::Status { .. } => ErrorKind::Status,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Status { status, .. } => *status,
            other => other.kind().default_status_code(),
        }
    }

    /// Returns the raw message of this error.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest { message }
            | Self::UnsupportedMediaType { message, .. }
            | Self::Internal { message, .. }
            | Self::Status { message, .. } => message,
        }
    }

    /// Returns the text placed in the response body for this error.
    ///
    /// Internal errors always answer with [`INTERNAL_ERROR_MESSAGE`].
    #[must_use]
    pub fn client_message(&self) -> &str {
        match self {
            Self::Internal { .. } => INTERNAL_ERROR_MESSAGE,
            other => other.message(),
        }
    }
}

impl From<serde_json::Error> for CrumbError {
    fn from(err: serde_json::Error) -> Self {
        Self::bad_request(err.to_string())
    }
}
