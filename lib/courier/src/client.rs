//! The request client.

use std::fmt;
use std::sync::Arc;

use courier_core::{
    Body, Custom, Interceptor, InterceptorChain, Method, SharedInterceptor, Transport, codec,
    header, resolve_url,
};
use tracing::warn;

use crate::{Error, Request, Response, Result, config::ClientConfig, transport::HyperTransport};

#[cfg(feature = "streaming")]
use courier_core::{StreamingBody, StreamingResponse, StreamingTransport};
#[cfg(feature = "streaming")]
use futures_util::StreamExt;
#[cfg(feature = "streaming")]
use tokio::time::Instant;

/// HTTP client with a per-instance interceptor chain.
///
/// Every call returns a [`Response`]. Failures that happen before a server
/// answers are collapsed into a sentinel status: 400 for a malformed method
/// or header, 404 for everything else (bad URL, connection, TLS, timeout,
/// body read). Use [`Client::try_execute`] to see the underlying [`Error`].
///
/// Cloning a client is cheap and the clone shares the connection pool and the
/// interceptor chain. Clients created by separate [`Client::new`] calls share
/// nothing.
///
/// # Example
///
/// ```ignore
/// use courier::{Client, ClientConfig};
///
/// let client = Client::new(
///     ClientConfig::builder()
///         .base_url("https://jsonplaceholder.typicode.com")
///         .build(),
/// );
///
/// let response = client.get("/todos/1").await;
/// assert_eq!(response.code(), 200);
/// ```
pub struct Client<T = HyperTransport> {
    inner: Arc<Inner<T>>,
}

struct Inner<T> {
    config: ClientConfig,
    transport: T,
    interceptors: InterceptorChain,
}

impl<T> Clone for Client<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for Client<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.inner.config)
            .field("interceptors", &self.inner.interceptors)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Create a client backed by a pooled hyper transport.
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        let transport = HyperTransport::new(&config);
        Self::with_transport(config, transport)
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new(ClientConfig::default())
    }
}

impl<T: Transport> Client<T> {
    /// Create a client over a custom transport.
    ///
    /// The configured interceptors move into the client's chain, so
    /// [`Client::config`] reports none; use [`Client::interceptor_count`].
    #[must_use]
    pub fn with_transport(mut config: ClientConfig, transport: T) -> Self {
        let interceptors = std::mem::take(&mut config.interceptors)
            .into_iter()
            .collect();
        Self {
            inner: Arc::new(Inner {
                config,
                transport,
                interceptors,
            }),
        }
    }

    /// Get the client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Get the underlying transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.inner.transport
    }

    /// Number of registered interceptors.
    #[must_use]
    pub fn interceptor_count(&self) -> usize {
        self.inner.interceptors.len()
    }

    /// Append an interceptor. It runs on every call started afterwards.
    pub fn add_interceptor(&self, interceptor: impl Interceptor + 'static) {
        self.inner.interceptors.register(interceptor);
    }

    /// Append several interceptors, keeping their order.
    pub fn extend_interceptors(&self, interceptors: impl IntoIterator<Item = SharedInterceptor>) {
        self.inner.interceptors.extend(interceptors);
    }

    /// Send a `GET` request.
    pub async fn get(&self, url: &str) -> Response {
        self.execute(Custom::new(Method::GET.as_str(), url)).await
    }

    /// Send a `POST` request with a body.
    pub async fn post(&self, url: &str, body: impl Into<Body>) -> Response {
        self.execute(Custom::new(Method::POST.as_str(), url).body(body))
            .await
    }

    /// Send a `PUT` request with a body.
    pub async fn put(&self, url: &str, body: impl Into<Body>) -> Response {
        self.execute(Custom::new(Method::PUT.as_str(), url).body(body))
            .await
    }

    /// Send a `PATCH` request with a body.
    pub async fn patch(&self, url: &str, body: impl Into<Body>) -> Response {
        self.execute(Custom::new(Method::PATCH.as_str(), url).body(body))
            .await
    }

    /// Send a `DELETE` request.
    pub async fn delete(&self, url: &str) -> Response {
        self.execute(Custom::new(Method::DELETE.as_str(), url)).await
    }

    /// Send a request described by `custom`.
    ///
    /// Never fails: errors are logged and collapsed into a sentinel response.
    pub async fn execute(&self, custom: Custom) -> Response {
        match self.try_execute(custom).await {
            Ok(response) => response,
            Err(err) => {
                let code = err.sentinel_status();
                warn!(error = %err, code = code.as_u16(), "request failed");
                Response::sentinel(code)
            }
        }
    }

    /// Send a request described by `custom`, returning the failure if any.
    ///
    /// The whole call, body encoding and response read included, is bounded
    /// by [`ClientConfig::effective_timeout`].
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidUrl`] if the target does not resolve to a valid URL
    /// - [`Error::InvalidMethod`] if the method token is illegal
    /// - [`Error::InvalidRequest`] if a header name or value is illegal
    /// - [`Error::Timeout`] if the budget elapses
    /// - any transport error
    pub async fn try_execute(&self, custom: Custom) -> Result<Response> {
        tokio::time::timeout(self.inner.config.effective_timeout(), self.run(custom))
            .await
            .map_err(|_| Error::Timeout)?
    }

    async fn run(&self, custom: Custom) -> Result<Response> {
        let request = self.prepare(custom).await?;
        let mut response = self.inner.transport.send(request).await?;
        self.inner.interceptors.dispatch_response(&mut response);
        Ok(response)
    }

    /// Resolve, validate and encode, then apply interceptors and caller headers.
    async fn prepare(&self, custom: Custom) -> Result<Request> {
        let (target, method, headers, body) = custom.into_parts();

        let url = resolve_url(&self.inner.config.base_url, &target)?;
        let method = Method::from_token(&method)?;
        let data = codec::encode(body, self.inner.config.encoding()).await;

        let mut request = Request::builder(method, url).body(data).build();
        self.inner.interceptors.dispatch_request(&mut request);
        header::merge(request.headers_mut(), headers);
        Ok(request)
    }
}

#[cfg(feature = "streaming")]
impl<T: StreamingTransport> Client<T> {
    /// Send a request and return before the response body is read.
    ///
    /// Response interceptors see the head only (status, headers, cookies).
    /// The budget covers the whole exchange: once it elapses, the body stream
    /// yields [`Error::Timeout`] and ends.
    pub async fn execute_streaming(&self, custom: Custom) -> StreamingResponse {
        match self.try_execute_streaming(custom).await {
            Ok(response) => response,
            Err(err) => {
                let code = err.sentinel_status();
                warn!(error = %err, code = code.as_u16(), "streaming request failed");
                StreamingResponse::sentinel(code)
            }
        }
    }

    /// Streaming counterpart of [`Client::try_execute`].
    ///
    /// # Errors
    ///
    /// Same as [`Client::try_execute`], up to the response head.
    pub async fn try_execute_streaming(&self, custom: Custom) -> Result<StreamingResponse> {
        let deadline = Instant::now() + self.inner.config.effective_timeout();
        let run = async {
            let request = self.prepare(custom).await?;
            let mut response = self.inner.transport.send_streaming(request).await?;
            self.inner.interceptors.dispatch_response(response.head_mut());
            Ok::<_, Error>(response)
        };
        let response = tokio::time::timeout_at(deadline, run)
            .await
            .map_err(|_| Error::Timeout)??;

        let (head, body) = response.into_parts();
        Ok(StreamingResponse::new(head, with_deadline(body, deadline)))
    }
}

/// Bound every chunk of `body` by `deadline`; the stream ends after a timeout.
#[cfg(feature = "streaming")]
fn with_deadline(body: StreamingBody, deadline: Instant) -> StreamingBody {
    Box::pin(futures_util::stream::unfold(Some(body), move |state| async move {
        let mut body = state?;
        match tokio::time::timeout_at(deadline, body.next()).await {
            Ok(Some(chunk)) => Some((chunk, Some(body))),
            Ok(None) => None,
            Err(_) => Some((Err(Error::Timeout), None)),
        }
    }))
}
