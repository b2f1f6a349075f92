//! HTTP response handling.
//!
//! A [`Response`] always carries a status code. When a call fails locally or
//! never reaches the server, the client returns a sentinel response
//! ([`Response::not_found`], [`Response::bad_request`]) with an empty body
//! instead of an error.
//!
//! For large responses, enable the `streaming` feature for [`streaming::StreamingResponse`].

use std::collections::HashMap;

use bytes::Bytes;
use http::StatusCode;

use crate::Header;

// ============================================================================
// Streaming Response (feature-gated)
// ============================================================================

/// Streaming response support (requires `streaming` feature).
#[cfg(feature = "streaming")]
pub mod streaming {
    use std::collections::HashMap;
    use std::pin::Pin;

    use bytes::Bytes;
    use futures_core::Stream;
    use futures_util::StreamExt;

    use crate::Header;

    /// A streaming body: chunks of bytes arriving over time.
    pub type StreamingBody = Pin<Box<dyn Stream<Item = crate::Result<Bytes>> + Send>>;

    /// HTTP response with streaming body, for large payloads.
    ///
    /// Unlike [`super::Response`], the body is consumed as a stream of chunks.
    pub struct StreamingResponse {
        head: super::Response,
        body: StreamingBody,
    }

    impl StreamingResponse {
        /// Creates a new streaming response from a head-only response and a body stream.
        #[must_use]
        pub fn new(head: super::Response, body: StreamingBody) -> Self {
            Self { head, body }
        }

        /// Sentinel streaming response with an empty body.
        #[must_use]
        pub fn sentinel(code: http::StatusCode) -> Self {
            Self::new(
                super::Response::sentinel(code),
                Box::pin(futures_util::stream::empty()),
            )
        }

        /// Head-only view (status, headers, cookies; empty data).
        #[must_use]
        pub const fn head(&self) -> &super::Response {
            &self.head
        }

        /// Mutable head-only view.
        pub fn head_mut(&mut self) -> &mut super::Response {
            &mut self.head
        }

        /// HTTP status code.
        #[must_use]
        pub const fn code(&self) -> u16 {
            self.head.code()
        }

        /// Response headers.
        #[must_use]
        pub fn headers(&self) -> &Header {
            self.head.headers()
        }

        /// Extracted `Set-Cookie` values keyed by cookie name.
        #[must_use]
        pub fn cookies(&self) -> &HashMap<String, String> {
            self.head.cookies()
        }

        /// Status is 2xx.
        #[must_use]
        pub const fn is_success(&self) -> bool {
            self.head.is_success()
        }

        /// Consume into the streaming body.
        #[must_use]
        pub fn into_body(self) -> StreamingBody {
            self.body
        }

        /// Consume into (head, body).
        #[must_use]
        pub fn into_parts(self) -> (super::Response, StreamingBody) {
            (self.head, self.body)
        }

        /// Buffer the entire stream into a [`super::Response`].
        ///
        /// # Errors
        ///
        /// Returns an error if reading any chunk fails.
        pub async fn collect(self) -> crate::Result<super::Response> {
            let mut body = self.body;
            let mut collected = Vec::new();

            while let Some(chunk) = body.next().await {
                collected.extend_from_slice(&chunk?);
            }

            Ok(self.head.with_data(Bytes::from(collected)))
        }
    }

    impl std::fmt::Debug for StreamingResponse {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("StreamingResponse")
                .field("head", &self.head)
                .finish_non_exhaustive()
        }
    }
}

// ============================================================================
// Buffered Response
// ============================================================================

/// HTTP response: status code, raw body bytes, headers and extracted cookies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    code: u16,
    data: Bytes,
    headers: Header,
    cookies: HashMap<String, String>,
}

impl Response {
    /// Creates a new response.
    #[must_use]
    pub fn new(code: u16, headers: Header, data: Bytes) -> Self {
        Self {
            code,
            data,
            headers,
            cookies: HashMap::new(),
        }
    }

    /// Sentinel response: the given status and an empty body.
    #[must_use]
    pub fn sentinel(code: StatusCode) -> Self {
        Self::new(code.as_u16(), Header::new(), Bytes::new())
    }

    /// Sentinel for failures that never produced a server response (`404`).
    #[must_use]
    pub fn not_found() -> Self {
        Self::sentinel(StatusCode::NOT_FOUND)
    }

    /// Sentinel for malformed input detected locally (`400`).
    #[must_use]
    pub fn bad_request() -> Self {
        Self::sentinel(StatusCode::BAD_REQUEST)
    }

    /// Attach extracted cookies.
    #[must_use]
    pub fn with_cookies(mut self, cookies: HashMap<String, String>) -> Self {
        self.cookies = cookies;
        self
    }

    /// Replace the body.
    #[must_use]
    pub fn with_data(mut self, data: Bytes) -> Self {
        self.data = data;
        self
    }

    /// HTTP status code.
    #[must_use]
    pub const fn code(&self) -> u16 {
        self.code
    }

    /// Override the status code.
    pub fn set_code(&mut self, code: u16) {
        self.code = code;
    }

    /// Raw response body.
    #[must_use]
    pub const fn data(&self) -> &Bytes {
        &self.data
    }

    /// Mutable access to the response body.
    pub fn data_mut(&mut self) -> &mut Bytes {
        &mut self.data
    }

    /// Response headers.
    #[must_use]
    pub fn headers(&self) -> &Header {
        &self.headers
    }

    /// Mutable access to response headers.
    pub fn headers_mut(&mut self) -> &mut Header {
        &mut self.headers
    }

    /// Single header value by name.
    ///
    /// Field names are matched ASCII case-insensitively: transports report
    /// names lowercased, while the [`crate::header`] constants are canonical case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .or_else(|| {
                self.headers
                    .iter()
                    .find_map(|(key, value)| key.eq_ignore_ascii_case(name).then_some(value))
            })
            .map(String::as_str)
    }

    /// `Set-Cookie` values keyed by cookie name (filled when cookie extraction is enabled).
    #[must_use]
    pub fn cookies(&self) -> &HashMap<String, String> {
        &self.cookies
    }

    /// Raw `Set-Cookie` value for a cookie name.
    #[must_use]
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    /// Consume into body.
    #[must_use]
    pub fn into_data(self) -> Bytes {
        self.data
    }

    /// Status is 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.code >= 200 && self.code < 300
    }

    /// Status is 4xx.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.code >= 400 && self.code < 500
    }

    /// Status is 5xx.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.code >= 500 && self.code < 600
    }

    /// Deserialize the response body as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> crate::Result<T> {
        crate::from_json(&self.data)
    }

    /// Get the response body as text.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid UTF-8.
    pub fn text(&self) -> Result<String, std::string::FromUtf8Error> {
        String::from_utf8(self.data.to_vec())
    }
}

/// Cookie name of a raw `Set-Cookie` value (`name=value; attrs...`).
#[must_use]
pub fn cookie_name(set_cookie: &str) -> Option<&str> {
    let (name, _) = set_cookie.split_once('=')?;
    let name = name.trim();
    (!name.is_empty()).then_some(name)
}

/// Index raw `Set-Cookie` values by cookie name; a later value for the same name wins.
pub fn index_cookies<'a>(values: impl IntoIterator<Item = &'a str>) -> HashMap<String, String> {
    values
        .into_iter()
        .filter_map(|value| cookie_name(value).map(|name| (name.to_string(), value.to_string())))
        .collect()
}
