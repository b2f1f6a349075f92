//! Built-in interceptors.
//!
//! Interceptors run inside the client pipeline: request hooks after the body
//! is encoded and before caller headers are applied, response hooks after the
//! transport returns. They run in registration order, so a later interceptor
//! overwrites headers set by an earlier one, and caller headers win over both.
//!
//! # Available Interceptors
//!
//! - [`HeaderInterceptor`] - Adds a fixed set of headers
//! - [`JsonContentTypeInterceptor`] - Declares JSON `Content-Type` and `Accept`
//! - [`BearerAuthInterceptor`] - Adds `Authorization: Bearer <token>`
//! - [`BasicAuthInterceptor`] - Adds `Authorization: Basic <base64>`
//! - [`LoggingInterceptor`] - Logs requests/responses using `tracing`
//!
//! # Example
//!
//! ```ignore
//! use courier::{Client, ClientConfig};
//! use courier::interceptor::{BearerAuthInterceptor, LoggingInterceptor};
//!
//! let client = Client::new(
//!     ClientConfig::builder()
//!         .base_url("https://api.example.com")
//!         .interceptor(LoggingInterceptor::new())
//!         .build(),
//! );
//! client.add_interceptor(BearerAuthInterceptor::new("my-token"));
//! ```

mod basic_auth;
mod bearer_auth;
mod header;
mod json;
mod logging;

pub use basic_auth::BasicAuthInterceptor;
pub use bearer_auth::BearerAuthInterceptor;
pub use header::HeaderInterceptor;
pub use json::JsonContentTypeInterceptor;
pub use logging::{LogLevel, LoggingInterceptor};
