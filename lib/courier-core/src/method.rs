//! HTTP method tokens.

use std::fmt;
use std::str::FromStr;

/// A validated HTTP request method.
///
/// Standard verbs are available as constants. Any other method must be a
/// syntactically valid token (RFC 9110 `tchar`s); construction through
/// [`Method::from_token`] rejects everything else before a request is built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Method(http::Method);

impl Method {
    /// GET method - retrieve a resource.
    pub const GET: Self = Self(http::Method::GET);
    /// POST method - create a resource.
    pub const POST: Self = Self(http::Method::POST);
    /// PUT method - replace a resource.
    pub const PUT: Self = Self(http::Method::PUT);
    /// DELETE method - remove a resource.
    pub const DELETE: Self = Self(http::Method::DELETE);
    /// PATCH method - partially update a resource.
    pub const PATCH: Self = Self(http::Method::PATCH);
    /// HEAD method - retrieve headers only.
    pub const HEAD: Self = Self(http::Method::HEAD);
    /// OPTIONS method - retrieve allowed methods.
    pub const OPTIONS: Self = Self(http::Method::OPTIONS);

    /// Parse a method token.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidMethod`] if the token is empty or contains
    /// characters outside the HTTP token grammar (spaces, control characters,
    /// separators such as `@`).
    pub fn from_token(token: &str) -> crate::Result<Self> {
        http::Method::from_bytes(token.as_bytes())
            .map(Self)
            .map_err(|_| crate::Error::invalid_method(token))
    }

    /// The method token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns `true` if the method is safe (does not modify resources).
    #[must_use]
    pub fn is_safe(&self) -> bool {
        self.0.is_safe()
    }

    /// Returns `true` if the method is idempotent.
    #[must_use]
    pub fn is_idempotent(&self) -> bool {
        self.0.is_idempotent()
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = crate::Error;

    fn from_str(token: &str) -> crate::Result<Self> {
        Self::from_token(token)
    }
}

impl From<Method> for http::Method {
    fn from(method: Method) -> Self {
        method.0
    }
}

impl From<http::Method> for Method {
    fn from(method: http::Method) -> Self {
        Self(method)
    }
}
