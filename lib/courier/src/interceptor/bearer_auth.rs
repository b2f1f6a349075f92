//! Bearer token authentication.
//!
//! Adds an `Authorization: Bearer <token>` header to all outgoing requests.

use std::sync::Arc;

use courier_core::Interceptor;
use courier_core::header::{AUTHORIZATION, bearer};

use crate::Request;

/// Interceptor that adds bearer token authentication to requests.
///
/// # Example
///
/// ```ignore
/// use courier::interceptor::BearerAuthInterceptor;
///
/// client.add_interceptor(BearerAuthInterceptor::new("my-secret-token"));
/// ```
#[derive(Debug, Clone)]
pub struct BearerAuthInterceptor {
    value: Arc<str>,
}

impl BearerAuthInterceptor {
    /// Create a new bearer auth interceptor with the given token.
    pub fn new(token: impl AsRef<str>) -> Self {
        Self {
            value: Arc::from(bearer(token)),
        }
    }
}

impl Interceptor for BearerAuthInterceptor {
    fn request(&self, request: &mut Request) {
        request.set_header(AUTHORIZATION, self.value.as_ref());
    }
}

#[cfg(test)]
mod tests {
    use courier_core::Method;

    use super::*;

    #[test]
    fn bearer_auth_sets_header() {
        let url = url::Url::parse("http://h/").expect("url");
        let mut request = Request::builder(Method::GET, url).build();

        BearerAuthInterceptor::new("secret").request(&mut request);

        assert_eq!(request.header(AUTHORIZATION), Some("Bearer secret"));
    }

    #[test]
    fn bearer_auth_clone() {
        let interceptor = BearerAuthInterceptor::new("token");
        let cloned = interceptor.clone();
        assert_eq!(interceptor.value, cloned.value);
    }
}
