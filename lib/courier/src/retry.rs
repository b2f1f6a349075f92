//! Retry policy for transport errors.
//!
//! Only failures where the request never produced a response are retried:
//! a response of any status is final. Which requests may be replayed is
//! decided by the configured predicate, idempotent methods by default.

use std::fmt;
use std::future;

use tower::retry::Policy;

use crate::config::RetryIf;
use crate::{Error, Request, Response};

/// Retries connection errors up to a fixed number of times.
///
/// # Example
///
/// ```ignore
/// use courier::retry::RetryPolicy;
/// use tower::retry::RetryLayer;
///
/// let service = tower::ServiceBuilder::new()
///     .layer(RetryLayer::new(RetryPolicy::new(3)))
///     .service(transport);
/// ```
#[derive(Clone)]
pub struct RetryPolicy {
    remaining: u32,
    retry_if: Option<RetryIf>,
}

impl RetryPolicy {
    /// Create a new retry policy with the given maximum number of retries.
    #[must_use]
    pub const fn new(max_retries: u32) -> Self {
        Self {
            remaining: max_retries,
            retry_if: None,
        }
    }

    /// Only retry requests accepted by `retry_if`.
    #[must_use]
    pub fn with_retry_if(mut self, retry_if: Option<RetryIf>) -> Self {
        self.retry_if = retry_if;
        self
    }

    fn is_replayable(&self, request: &Request) -> bool {
        self.retry_if
            .as_ref()
            .map_or_else(|| request.method().is_idempotent(), |retry_if| retry_if(request))
    }

    const fn should_retry_error(error: &Error) -> bool {
        error.is_connection()
    }
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("remaining", &self.remaining)
            .field("retry_if", &self.retry_if.is_some())
            .finish()
    }
}

impl Policy<Request, Response, Error> for RetryPolicy {
    type Future = future::Ready<()>;

    fn retry(
        &mut self,
        _req: &mut Request,
        result: &mut Result<Response, Error>,
    ) -> Option<Self::Future> {
        if self.remaining == 0 {
            return None;
        }

        match result {
            Err(error) if Self::should_retry_error(error) => {
                self.remaining -= 1;
                tracing::debug!(remaining = self.remaining, error = %error, "retrying request");
                Some(future::ready(()))
            }
            _ => None,
        }
    }

    fn clone_request(&mut self, req: &Request) -> Option<Request> {
        (self.remaining > 0 && self.is_replayable(req)).then(|| req.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bytes::Bytes;
    use courier_core::{Header, Method};

    use super::*;

    fn request(method: Method) -> Request {
        let url = url::Url::parse("http://h/").expect("url");
        Request::builder(method, url).build()
    }

    #[test]
    fn retry_policy_new() {
        let policy = RetryPolicy::new(3);
        assert_eq!(policy.remaining, 3);
    }

    #[test]
    fn retries_connection_errors_until_exhausted() {
        let mut policy = RetryPolicy::new(2);
        let mut req = request(Method::GET);

        for _ in 0..2 {
            let mut result = Err(Error::connection("connection refused"));
            assert!(policy.retry(&mut req, &mut result).is_some());
        }
        let mut result = Err(Error::connection("connection refused"));
        assert!(policy.retry(&mut req, &mut result).is_none());
    }

    #[test]
    fn responses_are_final() {
        let mut policy = RetryPolicy::new(3);
        let mut req = request(Method::GET);

        for code in [200, 404, 429, 503] {
            let mut result = Ok(Response::new(code, Header::new(), Bytes::new()));
            assert!(policy.retry(&mut req, &mut result).is_none());
        }
    }

    #[test]
    fn other_errors_are_not_retried() {
        let mut policy = RetryPolicy::new(3);
        let mut req = request(Method::GET);

        for error in [Error::Timeout, Error::tls("bad certificate"), Error::read("reset")] {
            let mut result = Err(error);
            assert!(policy.retry(&mut req, &mut result).is_none());
        }
    }

    #[test]
    fn only_idempotent_requests_are_replayed_by_default() {
        let mut policy = RetryPolicy::new(1);
        assert!(policy.clone_request(&request(Method::PUT)).is_some());
        assert!(policy.clone_request(&request(Method::POST)).is_none());
    }

    #[test]
    fn retry_if_overrides_the_default() {
        let mut policy = RetryPolicy::new(1).with_retry_if(Some(Arc::new(|_: &Request| true)));
        assert!(policy.clone_request(&request(Method::POST)).is_some());

        let mut policy = RetryPolicy::new(0);
        assert!(policy.clone_request(&request(Method::GET)).is_none());
    }
}
