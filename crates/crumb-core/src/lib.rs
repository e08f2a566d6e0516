//! # Crumb Core
//!
//! Core types shared by every Crumb crate.
//!
//! - [`CrumbError`] - Classified errors and their HTTP status mapping
//! - [`HttpMethod`] - The methods a route can be registered under
//! - [`Headers`] - Case-insensitive header multi-map
//! - [`HostRequest`] - The request value a prepared route receives
//! - [`Response`] - The wire response a prepared route returns
//! - [`SchemaValidator`] - Predicate deciding whether data matches an opaque schema

#![doc(html_root_url = "https://docs.rs/crumb-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod headers;
mod method;
mod params;
mod request;
mod response;
mod schema;

pub use error::{
    CrumbError, CrumbResult, ErrorKind, INTERNAL_ERROR_MESSAGE, SCHEMA_MISMATCH_MESSAGE,
};
pub use headers::Headers;
pub use method::{HttpMethod, UnsupportedMethod};
pub use params::Params;
pub use request::{HostRequest, HostRequestBuilder};
pub use response::Response;
pub use schema::{shared_validator, SchemaValidator, SharedValidator};
