//! Request/response interceptors.
//!
//! An [`Interceptor`] gets a chance to observe or mutate every outbound
//! [`Request`] before it is sent and every inbound [`Response`] before the
//! caller sees it. Both hooks default to no-ops, so an interceptor only
//! implements the side it cares about.
//!
//! An [`InterceptorChain`] belongs to exactly one client. Registration only
//! ever appends, and dispatch runs hooks in registration order without an
//! early exit.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::{Request, Response};

/// Hooks invoked around every request a client sends.
///
/// # Example
///
/// ```
/// use courier_core::{Interceptor, Request};
///
/// struct TraceId;
///
/// impl Interceptor for TraceId {
///     fn request(&self, request: &mut Request) {
///         request.set_header("X-Trace-Id", "42");
///     }
/// }
/// ```
pub trait Interceptor: Send + Sync {
    /// Observe or mutate an outbound request.
    fn request(&self, request: &mut Request) {
        let _ = request;
    }

    /// Observe or mutate an inbound response.
    fn response(&self, response: &mut Response) {
        let _ = response;
    }
}

impl<I: Interceptor + ?Sized> Interceptor for Arc<I> {
    fn request(&self, request: &mut Request) {
        (**self).request(request);
    }

    fn response(&self, response: &mut Response) {
        (**self).response(response);
    }
}

impl<I: Interceptor + ?Sized> Interceptor for Box<I> {
    fn request(&self, request: &mut Request) {
        (**self).request(request);
    }

    fn response(&self, response: &mut Response) {
        (**self).response(response);
    }
}

/// Shared handle to a registered interceptor.
pub type SharedInterceptor = Arc<dyn Interceptor>;

/// Ordered, append-only list of interceptors.
///
/// Registration and dispatch may run concurrently. Dispatch works on a
/// snapshot taken under the read lock, so hooks never run while the lock is
/// held and an interceptor appended mid-dispatch is seen from the next call on.
#[derive(Default)]
pub struct InterceptorChain {
    interceptors: RwLock<Vec<SharedInterceptor>>,
}

impl InterceptorChain {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an interceptor.
    pub fn register(&self, interceptor: impl Interceptor + 'static) {
        self.register_shared(Arc::new(interceptor));
    }

    /// Append an already-shared interceptor.
    pub fn register_shared(&self, interceptor: SharedInterceptor) {
        self.extend([interceptor]);
    }

    /// Append several interceptors, keeping their order.
    pub fn extend(&self, interceptors: impl IntoIterator<Item = SharedInterceptor>) {
        self.interceptors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(interceptors);
    }

    /// Number of registered interceptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.interceptors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current interceptors, in registration order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<SharedInterceptor> {
        self.interceptors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Run every request hook in registration order.
    pub fn dispatch_request(&self, request: &mut Request) {
        for interceptor in self.snapshot() {
            interceptor.request(request);
        }
    }

    /// Run every response hook in registration order.
    pub fn dispatch_response(&self, response: &mut Response) {
        for interceptor in self.snapshot() {
            interceptor.response(response);
        }
    }
}

impl FromIterator<SharedInterceptor> for InterceptorChain {
    fn from_iter<T: IntoIterator<Item = SharedInterceptor>>(iter: T) -> Self {
        Self {
            interceptors: RwLock::new(iter.into_iter().collect()),
        }
    }
}

impl fmt::Debug for InterceptorChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptorChain")
            .field("len", &self.len())
            .finish()
    }
}
