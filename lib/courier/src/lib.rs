//! Configurable outbound HTTP request client.
//!
//! A [`Client`] resolves targets against a base URL, validates the method,
//! encodes the body, runs its interceptor chain and sends the request over a
//! pooled hyper transport with rustls. Calls never fail: failures before a
//! server answers come back as sentinel responses (400 for a malformed
//! method or header, 404 for anything else).
//!
//! # Example
//!
//! ```ignore
//! use courier::prelude::*;
//! use courier::interceptor::BearerAuthInterceptor;
//!
//! let client = Client::new(
//!     ClientConfig::builder()
//!         .base_url("https://jsonplaceholder.typicode.com")
//!         .build(),
//! );
//! client.add_interceptor(BearerAuthInterceptor::new("token"));
//!
//! let response = client.post("/todos", serde_json::json!({"title": "write docs"})).await;
//! if response.is_success() {
//!     let todo: serde_json::Value = response.json()?;
//! }
//! ```

mod client;
mod config;
mod connector;
pub mod interceptor;
pub mod prelude;
pub mod retry;
mod transport;

pub use client::Client;
pub use config::{
    ClientConfig, ClientConfigBuilder, DEFAULT_CONNECT_TIMEOUT, DEFAULT_MAX_CONNS_PER_HOST,
    DEFAULT_MAX_IDLE_CONN_DURATION, DEFAULT_PHASE_TIMEOUT, DEFAULT_TIMEOUT, RetryIf, TlsPolicy,
};
pub use connector::{https_connector, platform_tls_config, tls_config};
pub use transport::{BoxedService, HyperTransport, ServiceFuture};

// Re-export tower for transport composition
pub use tower;

// Re-export core types
pub use courier_core::{
    Body, BodyReader, ContentType, Custom, Encoding, Error, Header, Interceptor, InterceptorChain,
    Method, Request, RequestBuilder, Response, Result, SharedInterceptor, Transport, codec,
    from_json, to_form, to_json,
};

// Re-export http types for status codes and headers
pub use courier_core::{StatusCode, header};

// Re-export streaming types (feature-gated)
#[cfg(feature = "streaming")]
pub use courier_core::{StreamingBody, StreamingResponse, StreamingTransport};

pub use url;
