//! Request/response logging.
//!
//! Logs outbound requests and inbound responses using the `tracing` crate.
//! Never mutates either side.

use courier_core::Interceptor;
use tracing::{debug, info, warn};

use crate::{Request, Response};

/// Log level for the logging interceptor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// Log at debug level (request/response details).
    Debug,
    /// Log at info level (summary only).
    #[default]
    Info,
}

/// Interceptor that logs requests and responses.
///
/// # Example
///
/// ```ignore
/// use courier::interceptor::LoggingInterceptor;
///
/// client.add_interceptor(LoggingInterceptor::debug());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingInterceptor {
    level: LogLevel,
}

impl LoggingInterceptor {
    /// Create a new logging interceptor with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a logging interceptor that logs at debug level.
    #[must_use]
    pub const fn debug() -> Self {
        Self {
            level: LogLevel::Debug,
        }
    }

    /// The configured level.
    #[must_use]
    pub const fn level(&self) -> LogLevel {
        self.level
    }
}

impl Interceptor for LoggingInterceptor {
    fn request(&self, request: &mut Request) {
        let method = request.method();
        let url = request.url();
        match self.level {
            LogLevel::Debug => {
                debug!(
                    method = %method,
                    url = %url,
                    headers = ?request.headers(),
                    body_len = request.body().len(),
                    "sending request"
                );
            }
            LogLevel::Info => {
                info!(method = %method, url = %url, "sending request");
            }
        }
    }

    fn response(&self, response: &mut Response) {
        let status = response.code();
        if !response.is_success() {
            warn!(status, "request failed with HTTP error");
            return;
        }
        match self.level {
            LogLevel::Debug => {
                debug!(
                    status,
                    headers = ?response.headers(),
                    body_len = response.data().len(),
                    "request completed"
                );
            }
            LogLevel::Info => info!(status, "request completed"),
        }
    }
}
