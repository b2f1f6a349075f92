//! Payload codec: turns a [`Body`] into the bytes handed to the transport.
//!
//! Encoding never fails a request. A structured value that cannot be written
//! or a stream that errors while being drained is logged and sent as an empty
//! body.

use std::io;

use bytes::{BufMut, Bytes, BytesMut};
use serde_json::Value;
use tokio::io::{AsyncWriteExt, BufWriter};

use crate::{Body, BodyReader};

/// Initial capacity of the outbound buffer for incremental writes and stream draining.
pub const WRITE_BUFFER_SIZE: usize = 8 * 1024;

/// How structured values are written into the outbound buffer.
///
/// Both strategies produce identical bytes; they differ only in how the
/// buffer is allocated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Encoding {
    /// Serialize into a growable `Vec`, then hand its allocation over.
    #[default]
    Buffered,
    /// Serialize straight into a pre-sized `BytesMut`.
    Incremental,
}

/// Encode a body into its wire bytes.
///
/// - [`Body::Empty`] and a structured `null` encode to an empty payload.
/// - [`Body::Structured`] encodes as JSON.
/// - [`Body::Stream`] is drained unchanged; the stream is fully read and the
///   writer flushed before this returns.
pub async fn encode(body: Body, encoding: Encoding) -> Bytes {
    match body {
        Body::Empty | Body::Structured(Value::Null) => Bytes::new(),
        Body::Structured(value) => {
            let encoded = match encoding {
                Encoding::Buffered => serde_json::to_vec(&value).map(Bytes::from),
                Encoding::Incremental => write_incremental(&value),
            };
            encoded.unwrap_or_else(|error| {
                tracing::warn!(%error, "failed to encode body, sending empty body");
                Bytes::new()
            })
        }
        Body::Stream(mut reader) => drain(&mut reader).await.unwrap_or_else(|error| {
            tracing::warn!(%error, "failed to read body stream, sending empty body");
            Bytes::new()
        }),
    }
}

fn write_incremental(value: &Value) -> serde_json::Result<Bytes> {
    let mut writer = BytesMut::with_capacity(WRITE_BUFFER_SIZE).writer();
    serde_json::to_writer(&mut writer, value)?;
    Ok(writer.into_inner().freeze())
}

async fn drain(reader: &mut BodyReader) -> io::Result<Bytes> {
    let mut writer = BufWriter::with_capacity(WRITE_BUFFER_SIZE, Vec::new());
    let copied = tokio::io::copy(reader, &mut writer).await;
    // Flush and close regardless of how the copy ended.
    let closed = writer.shutdown().await;
    copied?;
    closed?;
    Ok(Bytes::from(writer.into_inner()))
}

#[cfg(test)]
mod tests {
    use std::pin::Pin;
    use std::task::{Context, Poll};

    use serde_json::json;
    use tokio::io::{AsyncRead, ReadBuf};

    use super::*;

    #[tokio::test]
    async fn empty_and_null_encode_to_nothing() {
        assert!(encode(Body::Empty, Encoding::Buffered).await.is_empty());
        assert!(
            encode(Body::Structured(Value::Null), Encoding::Buffered)
                .await
                .is_empty()
        );
    }

    #[tokio::test]
    async fn structured_round_trips() {
        let value = json!({"username": "root", "password": "pass", "roles": ["a", "b"]});

        for encoding in [Encoding::Buffered, Encoding::Incremental] {
            let bytes = encode(Body::Structured(value.clone()), encoding).await;
            let decoded: Value = crate::from_json(&bytes).expect("decode");
            assert_eq!(decoded, value, "{encoding:?}");
        }
    }

    #[tokio::test]
    async fn incremental_matches_buffered() {
        let value = json!((0..2_000).map(|i| json!({"id": i})).collect::<Vec<_>>());

        let buffered = encode(Body::Structured(value.clone()), Encoding::Buffered).await;
        let incremental = encode(Body::Structured(value), Encoding::Incremental).await;
        assert_eq!(buffered, incremental);
        assert!(incremental.len() > WRITE_BUFFER_SIZE);
    }

    #[tokio::test]
    async fn empty_structured_values_keep_their_shape() {
        assert_eq!(
            encode(Body::Structured(json!({})), Encoding::Buffered).await,
            Bytes::from_static(b"{}")
        );
        assert_eq!(
            encode(Body::Structured(json!([])), Encoding::Buffered).await,
            Bytes::from_static(b"[]")
        );
    }

    #[tokio::test]
    async fn stream_passes_through_unchanged() {
        let bytes = encode(Body::bytes("message=Test"), Encoding::Buffered).await;
        assert_eq!(bytes, Bytes::from_static(b"message=Test"));
    }

    #[tokio::test]
    async fn large_stream_is_fully_drained() {
        let payload = vec![b'x'; WRITE_BUFFER_SIZE * 3 + 17];
        let bytes = encode(Body::bytes(payload.clone()), Encoding::Buffered).await;
        assert_eq!(bytes.len(), payload.len());
    }

    struct FailingReader;

    impl AsyncRead for FailingReader {
        fn poll_read(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            Poll::Ready(Err(io::Error::other("broken pipe")))
        }
    }

    #[tokio::test]
    async fn failing_stream_degrades_to_empty() {
        let bytes = encode(Body::stream(FailingReader), Encoding::Buffered).await;
        assert!(bytes.is_empty());
    }
}
