//! Client configuration types.
//!
//! Configuration is total: nothing is validated eagerly, and zero durations or
//! sizes fall back to defaults instead of being rejected.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use courier_core::{Encoding, Interceptor, Request, SharedInterceptor};

/// Fallback for the combined request budget.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Fallback for one phase (read or write) when only the other one is set.
pub const DEFAULT_PHASE_TIMEOUT: Duration = Duration::from_secs(30);

/// Fallback for establishing a connection.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Idle keep-alive connections are closed after this duration by default.
pub const DEFAULT_MAX_IDLE_CONN_DURATION: Duration = Duration::from_secs(60 * 60);

/// Default number of idle connections kept per host.
pub const DEFAULT_MAX_CONNS_PER_HOST: usize = 512;

/// Predicate deciding whether a request may be retried after a transport error.
pub type RetryIf = Arc<dyn Fn(&Request) -> bool + Send + Sync>;

/// TLS verification policy for `https` targets.
#[derive(Debug, Clone, Default)]
pub enum TlsPolicy {
    /// Verify server certificates against the Mozilla root store.
    #[default]
    Platform,
    /// Accept any server certificate and host name.
    SkipVerification,
    /// Use a caller-provided rustls configuration as is.
    Custom(Arc<rustls::ClientConfig>),
}

/// Configuration for the HTTP client.
#[derive(Clone)]
pub struct ClientConfig {
    /// Prefix for relative request targets. Empty means callers pass absolute URLs.
    pub base_url: String,
    /// Sent as `User-Agent` when set and the request has none.
    pub name: Option<String>,
    /// Combined budget for writing the request and reading the response.
    /// `Duration::ZERO` selects the default.
    pub timeout: Duration,
    /// Budget for reading the response, used when `timeout` is zero.
    pub read_timeout: Duration,
    /// Budget for writing the request, used when `timeout` is zero.
    pub write_timeout: Duration,
    /// Connection timeout duration.
    pub connect_timeout: Duration,
    /// Idle keep-alive connections are closed after this duration.
    pub max_idle_conn_duration: Duration,
    /// Maximum idle connections kept per host.
    pub max_conns_per_host: usize,
    /// Socket receive buffer size. Zero keeps the OS default.
    pub read_buffer_size: usize,
    /// Socket send buffer size. Zero keeps the OS default.
    pub write_buffer_size: usize,
    /// Disable Nagle's algorithm on new connections.
    pub tcp_nodelay: bool,
    /// TLS verification policy.
    pub tls: TlsPolicy,
    /// Number of times a request is retried after a connection error.
    pub max_retries: u32,
    /// Which requests may be retried. Defaults to idempotent methods.
    pub retry_if: Option<RetryIf>,
    /// Interceptors installed on every client built from this configuration.
    /// A client takes them over into its own chain when it is created.
    pub interceptors: Vec<SharedInterceptor>,
    /// Encode structured bodies incrementally into the outbound buffer.
    pub streaming: bool,
    /// Extract `Set-Cookie` values into [`courier_core::Response::cookies`].
    pub cookies: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            name: None,
            timeout: DEFAULT_TIMEOUT,
            read_timeout: Duration::ZERO,
            write_timeout: Duration::ZERO,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            max_idle_conn_duration: DEFAULT_MAX_IDLE_CONN_DURATION,
            max_conns_per_host: DEFAULT_MAX_CONNS_PER_HOST,
            read_buffer_size: 0,
            write_buffer_size: 0,
            tcp_nodelay: true,
            tls: TlsPolicy::Platform,
            max_retries: 0,
            retry_if: None,
            interceptors: Vec::new(),
            streaming: false,
            cookies: false,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("name", &self.name)
            .field("timeout", &self.timeout)
            .field("read_timeout", &self.read_timeout)
            .field("write_timeout", &self.write_timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("max_idle_conn_duration", &self.max_idle_conn_duration)
            .field("max_conns_per_host", &self.max_conns_per_host)
            .field("read_buffer_size", &self.read_buffer_size)
            .field("write_buffer_size", &self.write_buffer_size)
            .field("tcp_nodelay", &self.tcp_nodelay)
            .field("tls", &self.tls)
            .field("max_retries", &self.max_retries)
            .field("retry_if", &self.retry_if.is_some())
            .field("interceptors", &self.interceptors.len())
            .field("streaming", &self.streaming)
            .field("cookies", &self.cookies)
            .finish()
    }
}

impl ClientConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// The combined budget a single call may take.
    ///
    /// A non-zero `timeout` wins. Otherwise, if either phase timeout is set,
    /// the budget is read + write with the missing phase at 30 s. Otherwise 60 s.
    #[must_use]
    pub fn effective_timeout(&self) -> Duration {
        if !self.timeout.is_zero() {
            return self.timeout;
        }
        if self.read_timeout.is_zero() && self.write_timeout.is_zero() {
            return DEFAULT_TIMEOUT;
        }
        or_default(self.read_timeout, DEFAULT_PHASE_TIMEOUT)
            + or_default(self.write_timeout, DEFAULT_PHASE_TIMEOUT)
    }

    /// Connection timeout with zero normalized to the default.
    #[must_use]
    pub fn effective_connect_timeout(&self) -> Duration {
        or_default(self.connect_timeout, DEFAULT_CONNECT_TIMEOUT)
    }

    /// Idle connection lifetime with zero normalized to the default.
    #[must_use]
    pub fn effective_max_idle_conn_duration(&self) -> Duration {
        or_default(self.max_idle_conn_duration, DEFAULT_MAX_IDLE_CONN_DURATION)
    }

    /// Idle connections per host with zero normalized to the default.
    #[must_use]
    pub const fn effective_max_conns_per_host(&self) -> usize {
        if self.max_conns_per_host == 0 {
            DEFAULT_MAX_CONNS_PER_HOST
        } else {
            self.max_conns_per_host
        }
    }

    /// How structured bodies are encoded.
    #[must_use]
    pub const fn encoding(&self) -> Encoding {
        if self.streaming {
            Encoding::Incremental
        } else {
            Encoding::Buffered
        }
    }
}

fn or_default(value: Duration, default: Duration) -> Duration {
    if value.is_zero() { default } else { value }
}

/// Builder for [`ClientConfig`].
#[derive(Default)]
pub struct ClientConfigBuilder {
    base_url: Option<String>,
    name: Option<String>,
    timeout: Option<Duration>,
    read_timeout: Option<Duration>,
    write_timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    max_idle_conn_duration: Option<Duration>,
    max_conns_per_host: Option<usize>,
    read_buffer_size: Option<usize>,
    write_buffer_size: Option<usize>,
    tcp_nodelay: Option<bool>,
    tls: Option<TlsPolicy>,
    max_retries: Option<u32>,
    retry_if: Option<RetryIf>,
    interceptors: Vec<SharedInterceptor>,
    streaming: Option<bool>,
    cookies: Option<bool>,
}

impl fmt::Debug for ClientConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfigBuilder")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("tls", &self.tls)
            .field("interceptors", &self.interceptors.len())
            .finish_non_exhaustive()
    }
}

impl ClientConfigBuilder {
    /// Set the base URL prepended to relative targets.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the client name sent as `User-Agent`.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the combined request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the response read timeout (used when no combined timeout is set).
    #[must_use]
    pub const fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    /// Set the request write timeout (used when no combined timeout is set).
    #[must_use]
    pub const fn write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = Some(timeout);
        self
    }

    /// Set the connection timeout.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the idle connection lifetime.
    #[must_use]
    pub const fn max_idle_conn_duration(mut self, duration: Duration) -> Self {
        self.max_idle_conn_duration = Some(duration);
        self
    }

    /// Set the maximum idle connections per host.
    #[must_use]
    pub const fn max_conns_per_host(mut self, count: usize) -> Self {
        self.max_conns_per_host = Some(count);
        self
    }

    /// Set the socket receive buffer size.
    #[must_use]
    pub const fn read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = Some(size);
        self
    }

    /// Set the socket send buffer size.
    #[must_use]
    pub const fn write_buffer_size(mut self, size: usize) -> Self {
        self.write_buffer_size = Some(size);
        self
    }

    /// Set `TCP_NODELAY` on new connections.
    #[must_use]
    pub const fn tcp_nodelay(mut self, nodelay: bool) -> Self {
        self.tcp_nodelay = Some(nodelay);
        self
    }

    /// Use a caller-provided rustls configuration.
    #[must_use]
    pub fn tls_config(mut self, config: Arc<rustls::ClientConfig>) -> Self {
        self.tls = Some(TlsPolicy::Custom(config));
        self
    }

    /// Skip server certificate verification.
    ///
    /// Ignored when an explicit TLS configuration is set.
    #[must_use]
    pub fn insecure_skip_verify(mut self, skip: bool) -> Self {
        match self.tls {
            Some(TlsPolicy::Custom(_)) => {}
            _ if skip => self.tls = Some(TlsPolicy::SkipVerification),
            _ => self.tls = Some(TlsPolicy::Platform),
        }
        self
    }

    /// Retry requests up to `max_retries` times after connection errors.
    #[must_use]
    pub const fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Decide which requests may be retried.
    #[must_use]
    pub fn retry_if(mut self, retry_if: impl Fn(&Request) -> bool + Send + Sync + 'static) -> Self {
        self.retry_if = Some(Arc::new(retry_if));
        self
    }

    /// Add a default interceptor. Interceptors run in the order they are added.
    #[must_use]
    pub fn interceptor(mut self, interceptor: impl Interceptor + 'static) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    /// Encode structured bodies incrementally.
    #[must_use]
    pub const fn streaming(mut self, streaming: bool) -> Self {
        self.streaming = Some(streaming);
        self
    }

    /// Extract `Set-Cookie` values from responses.
    #[must_use]
    pub const fn cookies(mut self, cookies: bool) -> Self {
        self.cookies = Some(cookies);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> ClientConfig {
        let defaults = ClientConfig::default();
        ClientConfig {
            base_url: self.base_url.unwrap_or(defaults.base_url),
            name: self.name.or(defaults.name),
            timeout: self.timeout.unwrap_or(defaults.timeout),
            read_timeout: self.read_timeout.unwrap_or(defaults.read_timeout),
            write_timeout: self.write_timeout.unwrap_or(defaults.write_timeout),
            connect_timeout: self.connect_timeout.unwrap_or(defaults.connect_timeout),
            max_idle_conn_duration: self
                .max_idle_conn_duration
                .unwrap_or(defaults.max_idle_conn_duration),
            max_conns_per_host: self
                .max_conns_per_host
                .unwrap_or(defaults.max_conns_per_host),
            read_buffer_size: self.read_buffer_size.unwrap_or(defaults.read_buffer_size),
            write_buffer_size: self.write_buffer_size.unwrap_or(defaults.write_buffer_size),
            tcp_nodelay: self.tcp_nodelay.unwrap_or(defaults.tcp_nodelay),
            tls: self.tls.unwrap_or(defaults.tls),
            max_retries: self.max_retries.unwrap_or(defaults.max_retries),
            retry_if: self.retry_if.or(defaults.retry_if),
            interceptors: self.interceptors,
            streaming: self.streaming.unwrap_or(defaults.streaming),
            cookies: self.cookies.unwrap_or(defaults.cookies),
        }
    }
}
