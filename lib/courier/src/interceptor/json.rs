//! JSON content negotiation headers.

use courier_core::header::{ACCEPT, CONTENT_TYPE};
use courier_core::{ContentType, Interceptor};

use crate::Request;

/// Sets `Content-Type` and `Accept` to `application/json` on every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonContentTypeInterceptor;

impl JsonContentTypeInterceptor {
    /// Create the interceptor.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Interceptor for JsonContentTypeInterceptor {
    fn request(&self, request: &mut Request) {
        let json = ContentType::Json.as_str();
        request.set_header(CONTENT_TYPE, json);
        request.set_header(ACCEPT, json);
    }
}
