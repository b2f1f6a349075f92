//! Transport traits.
//!
//! A [`Transport`] performs the actual network exchange for a fully-built
//! [`Request`]. Connection pooling, TLS and DNS live behind it. The client
//! only relies on the contract below, so tests can swap in a transport that
//! counts or scripts calls.

use std::future::Future;
use std::sync::Arc;

use crate::{Request, Response, Result};

/// Core transport trait.
///
/// Implementations must be safe to call concurrently and should reuse
/// connections across calls.
pub trait Transport: Send + Sync {
    /// Send a request and return the response with its body fully read.
    ///
    /// # Errors
    ///
    /// Returns an error if the exchange fails for any reason:
    /// - Network errors
    /// - TLS errors
    /// - Timeouts
    /// - Failure while reading the response body
    fn send(&self, request: Request) -> impl Future<Output = Result<Response>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn send(&self, request: Request) -> impl Future<Output = Result<Response>> + Send {
        (**self).send(request)
    }
}

/// Streaming transport trait (requires `streaming` feature).
///
/// Returns the response before its body has been read.
#[cfg(feature = "streaming")]
pub trait StreamingTransport: Transport {
    /// Send a request and return a response with a streaming body.
    ///
    /// # Errors
    ///
    /// Returns an error if the exchange fails before the response head arrives.
    fn send_streaming(
        &self,
        request: Request,
    ) -> impl Future<Output = Result<crate::response::streaming::StreamingResponse>> + Send;
}
