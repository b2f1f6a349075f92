//! Basic authentication.
//!
//! Adds an `Authorization: Basic <base64(user:pass)>` header to all outgoing requests.

use std::sync::Arc;

use courier_core::Interceptor;
use courier_core::header::{AUTHORIZATION, basic};

use crate::Request;

/// Interceptor that adds basic authentication to requests.
///
/// # Example
///
/// ```ignore
/// use courier::interceptor::BasicAuthInterceptor;
///
/// client.add_interceptor(BasicAuthInterceptor::new("username", "password"));
/// ```
#[derive(Debug, Clone)]
pub struct BasicAuthInterceptor {
    /// Full header value, `Basic <base64>`.
    value: Arc<str>,
}

impl BasicAuthInterceptor {
    /// Create a new basic auth interceptor with the given username and password.
    pub fn new(username: impl AsRef<str>, password: impl AsRef<str>) -> Self {
        Self {
            value: Arc::from(basic(username, password)),
        }
    }
}

impl Interceptor for BasicAuthInterceptor {
    fn request(&self, request: &mut Request) {
        request.set_header(AUTHORIZATION, self.value.as_ref());
    }
}
