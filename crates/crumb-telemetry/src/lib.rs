//! Structured logging for Crumb services.
//!
//! - [`init_logging`] installs the global `tracing` subscriber
//! - [`LogConfig`] selects JSON or pretty output and the filter
//! - [`fields`] holds the field names used across Crumb's spans and events

#![doc(html_root_url = "https://docs.rs/crumb-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, fields, init_logging, LogConfig};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
