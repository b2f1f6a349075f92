//! Core types and traits for the courier HTTP request client.
//!
//! This crate provides the transport-agnostic building blocks:
//! - [`Method`] - Validated HTTP method token
//! - [`Header`] and the [`header`] constants - Header sets, canonical names, auth helpers
//! - [`Body`] and [`codec`] - Request bodies and their wire encoding
//! - [`Custom`], [`Request`] and [`RequestBuilder`] - Request descriptors and built requests
//! - [`Response`] - Status, body, headers and cookies
//! - [`Interceptor`] and [`InterceptorChain`] - Request/response hooks
//! - [`Transport`] - The network exchange seam
//! - [`Error`] and [`Result`] - Error handling
//! - [`StatusCode`] - HTTP status codes (re-exported from `http` crate)

mod body;
pub mod codec;
mod error;
pub mod header;
mod interceptor;
mod method;
pub mod prelude;
mod request;
mod response;
mod transport;

pub use body::{Body, BodyReader, ContentType, from_json, to_form, to_json};
pub use codec::Encoding;
pub use error::{Error, Result};
pub use header::Header;
pub use interceptor::{Interceptor, InterceptorChain, SharedInterceptor};
pub use method::Method;
pub use request::{Custom, Request, RequestBuilder, is_absolute, resolve_url};
pub use response::{Response, cookie_name, index_cookies};
pub use transport::Transport;

// Re-export http crate types for status codes
pub use http::StatusCode;

#[cfg(feature = "streaming")]
pub use response::streaming::{StreamingBody, StreamingResponse};
#[cfg(feature = "streaming")]
pub use transport::StreamingTransport;
