//! Error types for courier.
//!
//! Errors never reach callers of `Client::execute`: every variant maps to a
//! sentinel status through [`Error::sentinel_status`]. They stay available as
//! a side channel for callers who use `Client::try_execute` or the lower-level
//! building blocks directly.

use derive_more::{Display, Error, From};
use http::StatusCode;

/// Main error type for courier operations.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// The target URL could not be parsed after base URL resolution.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),

    /// The method token is not a legal HTTP method.
    #[display("invalid HTTP method: {_0:?}")]
    #[from(skip)]
    InvalidMethod(#[error(not(source))] String),

    /// The request could not be assembled (e.g. an illegal header name or value).
    #[display("invalid request: {_0}")]
    #[from(skip)]
    InvalidRequest(#[error(not(source))] String),

    /// Network/connection errors.
    #[display("connection error: {_0}")]
    #[from(skip)]
    Connection(#[error(not(source))] String),

    /// TLS/SSL errors.
    #[display("TLS error: {_0}")]
    #[from(skip)]
    Tls(#[error(not(source))] String),

    /// The combined request budget elapsed.
    #[display("request timeout")]
    #[from(skip)]
    Timeout,

    /// Reading the response body failed.
    #[display("response read error: {_0}")]
    #[from(skip)]
    Read(#[error(not(source))] String),

    /// JSON serialization error.
    #[display("JSON serialization error: {_0}")]
    #[from]
    JsonSerialization(serde_json::Error),

    /// JSON deserialization error with path context.
    #[display("JSON deserialization error at '{path}': {message}")]
    #[from(skip)]
    JsonDeserialization {
        /// JSON path to the error (e.g., "user.address.city").
        path: String,
        /// Error message.
        message: String,
    },

    /// Form URL-encoded serialization error.
    #[display("form serialization error: {_0}")]
    #[from]
    FormSerialization(serde_html_form::ser::Error),
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an invalid method error.
    #[must_use]
    pub fn invalid_method(token: impl Into<String>) -> Self {
        Self::InvalidMethod(token.into())
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a TLS error.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Create a response read error.
    #[must_use]
    pub fn read(message: impl Into<String>) -> Self {
        Self::Read(message.into())
    }

    /// Create a JSON deserialization error with path context.
    #[must_use]
    pub fn json_deserialization(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::JsonDeserialization {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Returns `true` if the failure was detected locally, before any network attempt.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(
            self,
            Self::InvalidUrl(_)
                | Self::InvalidMethod(_)
                | Self::InvalidRequest(_)
                | Self::JsonSerialization(_)
                | Self::FormSerialization(_)
        )
    }

    /// Status code of the sentinel response this error collapses to.
    ///
    /// Malformed method tokens and headers are `400 Bad Request`. Everything
    /// else, including an unparsable target URL, is `404 Not Found`.
    #[must_use]
    pub const fn sentinel_status(&self) -> StatusCode {
        match self {
            Self::InvalidMethod(_) | Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::NOT_FOUND,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = Error::invalid_method("!#@!@");
        assert_eq!(err.to_string(), r#"invalid HTTP method: "!#@!@""#);

        let err = Error::Timeout;
        assert_eq!(err.to_string(), "request timeout");

        let err = Error::connection("failed to connect");
        assert_eq!(err.to_string(), "connection error: failed to connect");

        let err = Error::json_deserialization("user.address.city", "missing field `city`");
        assert_eq!(
            err.to_string(),
            "JSON deserialization error at 'user.address.city': missing field `city`"
        );
    }

    #[test]
    fn sentinel_status_for_local_validation() {
        assert_eq!(
            Error::invalid_method("GE T").sentinel_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::invalid_request("bad header").sentinel_status(),
            StatusCode::BAD_REQUEST
        );

        let parse = url::Url::parse("/relative").expect_err("relative URL without base");
        assert_eq!(
            Error::from(parse).sentinel_status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn sentinel_status_for_transport_failures() {
        for err in [
            Error::connection("refused"),
            Error::tls("bad certificate"),
            Error::Timeout,
            Error::read("connection reset"),
        ] {
            assert_eq!(err.sentinel_status(), StatusCode::NOT_FOUND, "{err}");
            assert!(!err.is_local(), "{err}");
        }
    }

    #[test]
    fn error_predicates() {
        assert!(Error::Timeout.is_timeout());
        assert!(!Error::connection("failed").is_timeout());
        assert!(Error::connection("failed").is_connection());
        assert!(Error::invalid_method("").is_local());
    }
}
