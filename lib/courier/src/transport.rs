//! Transport implementation using hyper-util.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll};

use bytes::Bytes;
use courier_core::header::{SET_COOKIE, USER_AGENT};
use courier_core::{Header, Transport, index_cookies};
use http_body_util::{BodyExt, Full};
use hyper_rustls::HttpsConnector;
use hyper_util::{
    client::legacy::{Client, connect::HttpConnector},
    rt::TokioExecutor,
};
use tower::Layer;
use tower::retry::RetryLayer;
use tower::util::BoxCloneService;
use tower_service::Service;

use crate::{
    Error, Request, Response, Result, config::ClientConfig, connector::https_connector,
    retry::RetryPolicy,
};

#[cfg(feature = "streaming")]
use courier_core::{StreamingBody, StreamingResponse};
#[cfg(feature = "streaming")]
use futures_util::TryStreamExt;
#[cfg(feature = "streaming")]
use http_body_util::BodyStream;

/// Type-erased transport service.
pub type BoxedService = BoxCloneService<Request, Response, Error>;

/// Future type for Tower Service implementation.
pub type ServiceFuture = Pin<Box<dyn Future<Output = Result<Response>> + Send + 'static>>;

/// Makes a `BoxedService` shareable across tasks.
#[derive(Clone)]
struct SyncService {
    inner: Arc<Mutex<BoxedService>>,
}

impl SyncService {
    fn new(service: BoxedService) -> Self {
        Self {
            inner: Arc::new(Mutex::new(service)),
        }
    }

    fn call(&self, request: Request) -> ServiceFuture {
        let mut service = self
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        Box::pin(async move { service.call(request).await })
    }
}

/// Single exchange over the pooled hyper client.
#[derive(Clone)]
struct RawTransport {
    inner: Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
    user_agent: Option<Arc<str>>,
    cookies: bool,
}

impl RawTransport {
    fn new(config: &ClientConfig) -> Self {
        let inner = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(config.effective_max_idle_conn_duration())
            .pool_max_idle_per_host(config.effective_max_conns_per_host())
            .build(https_connector(config));

        Self {
            inner,
            user_agent: config.name.as_deref().map(Arc::from),
            cookies: config.cookies,
        }
    }

    fn build_hyper_request(&self, request: Request) -> Result<http::Request<Full<Bytes>>> {
        let (method, url, headers, body) = request.into_parts();

        let mut builder = http::Request::builder()
            .method(http::Method::from(method))
            .uri(url.as_str());

        if let Some(user_agent) = &self.user_agent
            && !headers.contains_key(USER_AGENT)
        {
            builder = builder.header(USER_AGENT, user_agent.as_ref());
        }
        for (name, value) in &headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder
            .body(Full::new(body))
            .map_err(|e| Error::invalid_request(e.to_string()))
    }

    /// Response headers keyed by lowercase name; repeated fields are joined with `, `.
    fn extract_headers(headers: &http::HeaderMap) -> Header {
        let mut extracted = Header::with_capacity(headers.keys_len());
        for (name, value) in headers {
            let Ok(value) = value.to_str() else {
                continue;
            };
            extracted
                .entry(name.to_string())
                .and_modify(|joined: &mut String| {
                    joined.push_str(", ");
                    joined.push_str(value);
                })
                .or_insert_with(|| value.to_string());
        }
        extracted
    }

    fn head(&self, parts: &http::response::Parts) -> Response {
        let response = Response::new(
            parts.status.as_u16(),
            Self::extract_headers(&parts.headers),
            Bytes::new(),
        );
        if !self.cookies {
            return response;
        }
        let cookies = index_cookies(
            parts
                .headers
                .get_all(SET_COOKIE)
                .iter()
                .filter_map(|value| value.to_str().ok()),
        );
        response.with_cookies(cookies)
    }

    async fn execute(&self, request: Request) -> Result<Response> {
        let hyper_request = self.build_hyper_request(request)?;
        let response = self
            .inner
            .request(hyper_request)
            .await
            .map_err(map_hyper_error)?;
        let (parts, body) = response.into_parts();

        let data = body
            .collect()
            .await
            .map_err(|e| Error::read(e.to_string()))?
            .to_bytes();

        Ok(self.head(&parts).with_data(data))
    }

    #[cfg(feature = "streaming")]
    async fn execute_streaming(&self, request: Request) -> Result<StreamingResponse> {
        let hyper_request = self.build_hyper_request(request)?;
        let response = self
            .inner
            .request(hyper_request)
            .await
            .map_err(map_hyper_error)?;
        let (parts, body) = response.into_parts();

        let body: StreamingBody = Box::pin(
            BodyStream::new(body)
                .map_ok(|frame| frame.into_data().unwrap_or_default())
                .map_err(|e| Error::read(e.to_string())),
        );

        Ok(StreamingResponse::new(self.head(&parts), body))
    }
}

#[allow(clippy::needless_pass_by_value)]
fn map_hyper_error(err: hyper_util::client::legacy::Error) -> Error {
    let msg = std::error::Error::source(&err)
        .map_or_else(|| err.to_string(), |source| format!("{err}: {source}"));

    // Handshake failures surface as connect errors, so the source chain is
    // inspected before falling back to `Connection`.
    if is_tls_failure(&err) {
        return Error::tls(msg);
    }

    Error::connection(msg)
}

/// Whether a rustls error sits anywhere in the source chain.
fn is_tls_failure(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(error) = current {
        if error.is::<rustls::Error>() {
            return true;
        }
        if let Some(io) = error.downcast_ref::<std::io::Error>()
            && io
                .get_ref()
                .is_some_and(|inner| inner.is::<rustls::Error>())
        {
            return true;
        }
        current = error.source();
    }
    false
}

impl Service<Request> for RawTransport {
    type Response = Response;
    type Error = Error;
    type Future = ServiceFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let transport = self.clone();
        Box::pin(async move { transport.execute(request).await })
    }
}

/// Pooled HTTP/1.1 and HTTP/2 transport with rustls.
///
/// The response body is fully read before [`Transport::send`] resolves.
/// With `max_retries > 0` connection errors are retried by a tower
/// [`RetryLayer`]. Timeouts are the caller's concern.
#[derive(Clone)]
pub struct HyperTransport {
    service: SyncService,
    raw: RawTransport,
}

impl std::fmt::Debug for HyperTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperTransport")
            .field("user_agent", &self.raw.user_agent)
            .field("cookies", &self.raw.cookies)
            .finish_non_exhaustive()
    }
}

impl HyperTransport {
    /// Build the transport and its connection pool.
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        let raw = RawTransport::new(config);

        let service = if config.max_retries > 0 {
            let policy =
                RetryPolicy::new(config.max_retries).with_retry_if(config.retry_if.clone());
            BoxCloneService::new(RetryLayer::new(policy).layer(raw.clone()))
        } else {
            BoxCloneService::new(raw.clone())
        };

        Self {
            service: SyncService::new(service),
            raw,
        }
    }
}

impl Default for HyperTransport {
    fn default() -> Self {
        Self::new(&ClientConfig::default())
    }
}

impl Transport for HyperTransport {
    fn send(&self, request: Request) -> impl Future<Output = Result<Response>> + Send {
        self.service.call(request)
    }
}

/// Streaming bypasses the retry layer: a partially consumed body cannot be replayed.
#[cfg(feature = "streaming")]
impl courier_core::StreamingTransport for HyperTransport {
    fn send_streaming(
        &self,
        request: Request,
    ) -> impl Future<Output = Result<StreamingResponse>> + Send {
        let raw = self.raw.clone();
        async move { raw.execute_streaming(request).await }
    }
}

impl Service<Request> for HyperTransport {
    type Response = Response;
    type Error = Error;
    type Future = ServiceFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request) -> Self::Future {
        self.service.call(request)
    }
}
