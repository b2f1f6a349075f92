//! Request bodies and serialization utilities.

use std::fmt;
use std::io::Cursor;
use std::pin::Pin;

use bytes::Bytes;
use serde_json::Value;
use tokio::io::AsyncRead;

use crate::Result;

/// A caller-supplied, already-serialized byte stream.
pub type BodyReader = Pin<Box<dyn AsyncRead + Send>>;

/// Content type for request bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// JSON content type (`application/json`).
    Json,
    /// Form URL-encoded content type (`application/x-www-form-urlencoded`).
    FormUrlEncoded,
}

impl ContentType {
    /// Get the MIME type string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::FormUrlEncoded => "application/x-www-form-urlencoded",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Request body.
///
/// A body is either a structured value serialized to JSON on the way out, or
/// a raw stream the caller has already encoded (form bodies, uploads). The
/// caller owns the `Content-Type` of a stream body.
#[derive(Default)]
pub enum Body {
    /// No body.
    #[default]
    Empty,
    /// A mapping or sequence to serialize as JSON.
    Structured(Value),
    /// A pre-encoded byte stream, sent unchanged.
    Stream(BodyReader),
}

impl Body {
    /// Structured body from any serializable value.
    ///
    /// Values without a JSON representation (for example a map whose keys
    /// are not strings) do not fail the request: they are logged and the
    /// body degrades to [`Body::Empty`].
    pub fn json<T: serde::Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(value) => Self::from(value),
            Err(error) => {
                tracing::warn!(%error, "body has no JSON representation, sending empty body");
                Self::Empty
            }
        }
    }

    /// Form URL-encoded stream body.
    ///
    /// # Errors
    ///
    /// Returns an error if form serialization fails.
    pub fn form<T: serde::Serialize + ?Sized>(value: &T) -> Result<Self> {
        to_form(value).map(Self::bytes)
    }

    /// Stream body over any async reader.
    pub fn stream(reader: impl AsyncRead + Send + 'static) -> Self {
        Self::Stream(Box::pin(reader))
    }

    /// Stream body over an in-memory buffer.
    pub fn bytes(data: impl Into<Bytes>) -> Self {
        Self::stream(Cursor::new(data.into()))
    }

    /// Returns `true` for [`Body::Empty`] and a structured `null`.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty | Self::Structured(Value::Null))
    }

    /// Returns `true` for [`Body::Stream`].
    #[must_use]
    pub const fn is_stream(&self) -> bool {
        matches!(self, Self::Stream(_))
    }

    /// Combine two bodies given for the same request.
    ///
    /// A stream always wins over a structured value, whichever arrived first.
    /// Otherwise the newer body replaces the older one.
    #[must_use]
    pub fn merge(self, newer: Self) -> Self {
        match (self, newer) {
            (current @ Self::Stream(_), Self::Empty | Self::Structured(_)) => current,
            (_, newer) => newer,
        }
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("Empty"),
            Self::Structured(value) => f.debug_tuple("Structured").field(value).finish(),
            Self::Stream(_) => f.debug_tuple("Stream").finish_non_exhaustive(),
        }
    }
}

impl From<Value> for Body {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Empty,
            value => Self::Structured(value),
        }
    }
}

impl From<Option<Value>> for Body {
    fn from(value: Option<Value>) -> Self {
        value.map_or(Self::Empty, Self::from)
    }
}

/// Serialize a value to JSON bytes.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
///
/// # Example
///
/// ```
/// use courier_core::to_json;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct User { name: String }
///
/// let user = User { name: "Alice".to_string() };
/// let bytes = to_json(&user).expect("serialize");
/// assert_eq!(bytes.as_ref(), br#"{"name":"Alice"}"#);
/// ```
pub fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<Bytes> {
    serde_json::to_vec(value)
        .map(Bytes::from)
        .map_err(Into::into)
}

/// Serialize a value to form URL-encoded bytes.
///
/// Uses `serde_html_form` which supports `Vec<T>` for repeated form fields
/// (e.g., `tags=a&tags=b&tags=c`).
///
/// # Errors
///
/// Returns an error if form serialization fails.
pub fn to_form<T: serde::Serialize + ?Sized>(value: &T) -> Result<Bytes> {
    serde_html_form::to_string(value)
        .map(|s| Bytes::from(s.into_bytes()))
        .map_err(Into::into)
}

/// Deserialize JSON bytes to a value with path-aware error messages.
///
/// # Errors
///
/// Returns an error if JSON deserialization fails, with the error message
/// including the path to the problematic field (e.g., "user.address.city").
pub fn from_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        crate::Error::json_deserialization(e.path().to_string(), e.inner().to_string())
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde_json::json;

    use super::*;

    #[test]
    fn content_type_as_str() {
        assert_eq!(ContentType::Json.as_str(), "application/json");
        assert_eq!(
            ContentType::FormUrlEncoded.as_str(),
            "application/x-www-form-urlencoded"
        );
        assert_eq!(ContentType::Json.to_string(), "application/json");
    }

    #[test]
    fn json_body_from_mapping_and_sequence() {
        assert!(matches!(
            Body::json(&json!({"username": "root"})),
            Body::Structured(Value::Object(_))
        ));
        assert!(matches!(
            Body::json(&["1", "2", "3", "4"]),
            Body::Structured(Value::Array(_))
        ));
    }

    #[test]
    fn json_body_from_none_is_empty() {
        let body = Body::json(&Option::<u32>::None);
        assert!(matches!(body, Body::Empty));
    }

    #[test]
    fn unserializable_body_degrades_to_empty() {
        // JSON object keys must be strings.
        let value = BTreeMap::from([((1, 2), "point")]);
        let body = Body::json(&value);
        assert!(matches!(body, Body::Empty));
    }

    #[tokio::test]
    async fn form_body_streams_the_form_encoding() {
        #[derive(serde::Serialize)]
        struct Message {
            message: String,
            tags: Vec<&'static str>,
        }

        let message = Message {
            message: "Test".to_string(),
            tags: vec!["a", "b"],
        };
        let body = Body::form(&message).expect("form");
        assert!(body.is_stream());

        let bytes = crate::codec::encode(body, crate::Encoding::Buffered).await;
        assert_eq!(bytes, to_form(&message).expect("form"));
        assert_eq!(bytes.as_ref(), b"message=Test&tags=a&tags=b");
    }

    #[test]
    fn stream_takes_precedence_over_structured() {
        let merged = Body::bytes("message=Test").merge(Body::json(&json!({"a": 1})));
        assert!(merged.is_stream());

        let merged = Body::json(&json!({"a": 1})).merge(Body::bytes("message=Test"));
        assert!(merged.is_stream());
    }

    #[test]
    fn newer_structured_replaces_older() {
        let merged = Body::json(&json!({"a": 1})).merge(Body::json(&json!([1])));
        assert!(matches!(merged, Body::Structured(Value::Array(_))));
    }

    #[test]
    fn is_empty() {
        assert!(Body::Empty.is_empty());
        assert!(Body::Structured(Value::Null).is_empty());
        assert!(!Body::json(&json!({})).is_empty());
    }

    #[test]
    fn to_form_serialize() {
        #[derive(serde::Serialize)]
        struct Login {
            username: String,
            password: String,
        }

        let login = Login {
            username: "alice".to_string(),
            password: "secret".to_string(),
        };

        let bytes = to_form(&login).expect("serialize");
        assert_eq!(bytes.as_ref(), b"username=alice&password=secret");
    }

    #[test]
    fn from_json_missing_field_error_with_path() {
        #[derive(Debug, serde::Deserialize)]
        struct Address {
            #[allow(dead_code)]
            city: String,
        }

        #[derive(Debug, serde::Deserialize)]
        struct User {
            #[allow(dead_code)]
            address: Address,
        }

        let result: Result<User> = from_json(br#"{"address":{}}"#);

        let msg = result.expect_err("should fail").to_string();
        assert!(msg.contains("address"), "Expected path 'address' in error: {msg}");
        assert!(msg.contains("city"), "Expected field 'city' mentioned in error: {msg}");
    }
}
