//! Fixed header injection.

use courier_core::{Header, Interceptor};

use crate::Request;

/// Sets a fixed set of headers on every request, overwriting existing values.
#[derive(Debug, Clone, Default)]
pub struct HeaderInterceptor {
    headers: Header,
}

impl HeaderInterceptor {
    /// Create an interceptor with no headers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Headers this interceptor sets.
    #[must_use]
    pub const fn headers(&self) -> &Header {
        &self.headers
    }
}

impl From<Header> for HeaderInterceptor {
    fn from(headers: Header) -> Self {
        Self { headers }
    }
}

impl Interceptor for HeaderInterceptor {
    fn request(&self, request: &mut Request) {
        courier_core::header::merge(
            request.headers_mut(),
            self.headers.iter().map(|(k, v)| (k.clone(), v.clone())),
        );
    }
}
