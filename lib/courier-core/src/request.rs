//! Request descriptors and built requests.
//!
//! A [`Custom`] is what callers hand to the client: a target that may still
//! be relative, a raw method token, headers and a [`Body`]. Building it
//! resolves the URL against the client's base URL and validates the method,
//! producing a [`Request`] that interceptors and the transport work on.
//!
//! # Example
//!
//! ```
//! use courier_core::{Custom, header};
//!
//! let custom = Custom::new("POST", "/post")
//!     .header(header::AUTHORIZATION, header::bearer("eyJh9.e30.EtU"))
//!     .json(&serde_json::json!({"username": "root"}));
//!
//! let (url, method) = custom.target_parts();
//! assert_eq!(url, "/post");
//! assert_eq!(method, "POST");
//! ```

use bytes::Bytes;
use url::Url;

use crate::{Body, Header, Method};

// ============================================================================
// Request Descriptor
// ============================================================================

/// A request as described by the caller.
#[derive(Debug, Default)]
pub struct Custom {
    url: String,
    method: String,
    header: Header,
    body: Body,
}

impl Custom {
    /// Describe a request for `method` on `url` (absolute, or relative to the base URL).
    #[must_use]
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: method.into(),
            header: Header::new(),
            body: Body::Empty,
        }
    }

    /// Sets a header. Caller headers are applied after interceptors.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.header.insert(name.into(), value.into());
        self
    }

    /// Sets multiple headers.
    #[must_use]
    pub fn headers(mut self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        crate::header::merge(&mut self.header, headers);
        self
    }

    /// Sets the body. A stream body already attached is kept over a structured one.
    #[must_use]
    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = std::mem::take(&mut self.body).merge(body.into());
        self
    }

    /// Sets a structured body from any serializable value.
    #[must_use]
    pub fn json<T: serde::Serialize + ?Sized>(self, value: &T) -> Self {
        self.body(Body::json(value))
    }

    /// Sets a form URL-encoded stream body.
    ///
    /// Pair with a `Content-Type: application/x-www-form-urlencoded` header.
    ///
    /// # Errors
    ///
    /// Returns an error if form serialization fails.
    pub fn form<T: serde::Serialize + ?Sized>(self, value: &T) -> crate::Result<Self> {
        Ok(self.body(Body::form(value)?))
    }

    /// Sets a raw stream body.
    #[must_use]
    pub fn stream(self, reader: impl tokio::io::AsyncRead + Send + 'static) -> Self {
        self.body(Body::stream(reader))
    }

    /// Target and method token as given.
    #[must_use]
    pub fn target_parts(&self) -> (&str, &str) {
        (&self.url, &self.method)
    }

    /// Caller headers.
    #[must_use]
    pub fn header_set(&self) -> &Header {
        &self.header
    }

    /// Consume into (url, method, header, body).
    #[must_use]
    pub fn into_parts(self) -> (String, String, Header, Body) {
        (self.url, self.method, self.header, self.body)
    }
}

// ============================================================================
// URL Resolution
// ============================================================================

/// Returns `true` if `target` starts with a URL scheme followed by `://`.
#[must_use]
pub fn is_absolute(target: &str) -> bool {
    target.split_once("://").is_some_and(|(scheme, _)| {
        let mut chars = scheme.chars();
        chars.next().is_some_and(|c| c.is_ascii_alphabetic())
            && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}

/// Resolve the final request URL.
///
/// Absolute targets are used verbatim and the base URL is ignored. Relative
/// targets are appended to the base URL as-is (plain concatenation, so a path
/// on the base URL is kept).
///
/// # Errors
///
/// Returns [`crate::Error::InvalidUrl`] if the resulting string is not a valid URL.
pub fn resolve_url(base_url: &str, target: &str) -> crate::Result<Url> {
    if is_absolute(target) || base_url.is_empty() {
        return Ok(Url::parse(target)?);
    }
    Ok(Url::parse(&format!("{base_url}{target}"))?)
}

// ============================================================================
// Built Request
// ============================================================================

/// A fully-resolved HTTP request with an encoded body.
///
/// This is what interceptors observe and mutate before it reaches the transport.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    url: Url,
    headers: Header,
    body: Bytes,
}

impl Request {
    /// Creates a new [`RequestBuilder`].
    #[must_use]
    pub fn builder(method: Method, url: Url) -> RequestBuilder {
        RequestBuilder::new(method, url)
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Request URL.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Mutable access to the request URL.
    #[must_use]
    pub fn url_mut(&mut self) -> &mut Url {
        &mut self.url
    }

    /// Request headers.
    #[must_use]
    pub fn headers(&self) -> &Header {
        &self.headers
    }

    /// Mutable access to headers.
    #[must_use]
    pub fn headers_mut(&mut self) -> &mut Header {
        &mut self.headers
    }

    /// Single header value by name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Sets a header, replacing any previous value.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name.into(), value.into());
    }

    /// Encoded request body (empty when there is none).
    #[must_use]
    pub const fn body(&self) -> &Bytes {
        &self.body
    }

    /// Mutable access to the encoded body.
    #[must_use]
    pub fn body_mut(&mut self) -> &mut Bytes {
        &mut self.body
    }

    /// Consume into (method, url, headers, body).
    #[must_use]
    pub fn into_parts(self) -> (Method, Url, Header, Bytes) {
        (self.method, self.url, self.headers, self.body)
    }
}

/// Builder for constructing [`Request`] instances.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    method: Method,
    url: Url,
    headers: Header,
    body: Bytes,
}

impl RequestBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: Header::new(),
            body: Bytes::new(),
        }
    }

    /// Sets a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Sets multiple headers.
    #[must_use]
    pub fn headers(mut self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Sets the encoded body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Set a JSON body, failing on values without a JSON representation.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn json<T: serde::Serialize + ?Sized>(self, value: &T) -> crate::Result<Self> {
        let body = crate::to_json(value)?;
        Ok(self
            .header(crate::header::CONTENT_TYPE, crate::ContentType::Json.as_str())
            .body(body))
    }

    /// Builds the [`Request`].
    #[must_use]
    pub fn build(self) -> Request {
        Request {
            method: self.method,
            url: self.url,
            headers: self.headers,
            body: self.body,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde_json::json;

    use super::*;

    #[test]
    fn relative_target_is_appended_to_base() {
        let url = resolve_url("http://h", "/todos/1?q=courier").expect("url");
        assert_eq!(url.as_str(), "http://h/todos/1?q=courier");
    }

    #[test]
    fn base_path_is_kept() {
        let url = resolve_url("http://localhost:1/todos", "/todos").expect("url");
        assert_eq!(url.as_str(), "http://localhost:1/todos/todos");
    }

    #[test]
    fn absolute_target_ignores_base() {
        let url = resolve_url("http://h", "https://api.example.com/users?page=1").expect("url");
        assert_eq!(url.as_str(), "https://api.example.com/users?page=1");
    }

    #[test]
    fn relative_target_without_base_is_invalid() {
        let err = resolve_url("", "/todos").expect_err("no base");
        assert!(matches!(err, crate::Error::InvalidUrl(_)));
    }

    #[test]
    fn malformed_url_is_invalid() {
        let err = resolve_url("http://[::1", "/todos").expect_err("bad host");
        assert!(matches!(err, crate::Error::InvalidUrl(_)));
    }

    #[test]
    fn scheme_detection() {
        assert!(is_absolute("http://h"));
        assert!(is_absolute("https://h/a"));
        assert!(is_absolute("svn+ssh://h"));
        assert!(!is_absolute("/todos"));
        assert!(!is_absolute("todos?next=http://h"));
        assert!(!is_absolute("://h"));
        assert!(!is_absolute("1http://h"));
    }

    #[test]
    fn custom_stream_wins_over_later_json() {
        let custom = Custom::new("POST", "/post")
            .stream(std::io::Cursor::new(b"message=Test".to_vec()))
            .json(&json!({"ignored": true}));

        let (_, _, _, body) = custom.into_parts();
        assert!(body.is_stream());
    }

    #[test]
    fn custom_headers_last_write_wins() {
        let custom = Custom::new("GET", "/")
            .header("X-TOKEN", "a")
            .headers([("X-TOKEN".to_string(), "b".to_string())]);

        assert_eq!(
            custom.header_set().get("X-TOKEN").map(String::as_str),
            Some("b")
        );
    }

    #[test]
    fn custom_unserializable_json_is_empty() {
        let custom = Custom::new("POST", "/").json(&BTreeMap::from([((1, 2), 3)]));
        let (_, _, _, body) = custom.into_parts();
        assert!(body.is_empty());
    }

    #[test]
    fn request_builder_basic() {
        let url = Url::parse("https://api.example.com/users").expect("valid URL");
        let request = Request::builder(Method::GET, url)
            .header("Accept", "application/json")
            .build();

        assert_eq!(request.method(), &Method::GET);
        assert_eq!(request.url().as_str(), "https://api.example.com/users");
        assert_eq!(request.header("Accept"), Some("application/json"));
        assert!(request.body().is_empty());
    }

    #[test]
    fn request_builder_json() {
        #[derive(serde::Serialize)]
        struct User {
            name: String,
        }

        let url = Url::parse("https://api.example.com/users").expect("valid URL");
        let request = Request::builder(Method::POST, url)
            .json(&User {
                name: "test".to_string(),
            })
            .expect("json")
            .build();

        assert_eq!(request.header("Content-Type"), Some("application/json"));
        assert_eq!(request.body().as_ref(), br#"{"name":"test"}"#);
    }

    #[test]
    fn request_mutation() {
        let url = Url::parse("http://h/a").expect("valid URL");
        let mut request = Request::builder(Method::GET, url).build();

        request.set_header("X-Trace", "1");
        request.url_mut().set_path("/b");
        *request.body_mut() = Bytes::from_static(b"{}");

        assert_eq!(request.header("X-Trace"), Some("1"));
        assert_eq!(request.url().path(), "/b");
        assert_eq!(request.body().as_ref(), b"{}");
    }
}
