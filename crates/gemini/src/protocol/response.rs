use bytes::Bytes;
use futures::SinkExt;
use tokio::io::AsyncWrite;
use tokio_util::codec::FramedWrite;
use tracing::trace;

use crate::codec::ResponseEncoder;
use crate::protocol::{Message, SendError, StatusCode, StatusLine};

/// Meta of the status line sent when a handler never set one.
pub const DEFAULT_META: &str = "text/gemini";

/// The write half of a connection, type erased so every handler sees the same type.
pub type BoxWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// The response side of one gemini connection.
///
/// A handler records a status with [`set_status`](Self::set_status) and emits it with
/// [`send_status`](Self::send_status), or lets [`write`](Self::write) emit it right before the
/// first body bytes. Body bytes can never reach the stream before a status line.
pub struct Response {
    framed_write: FramedWrite<BoxWriter, ResponseEncoder>,
    status: Option<StatusLine>,
}

impl Response {
    pub fn new<W>(writer: W) -> Self
    where
        W: AsyncWrite + Send + Unpin + 'static,
    {
        Self::from_boxed(Box::new(writer))
    }

    pub fn from_boxed(writer: BoxWriter) -> Self {
        Self { framed_write: FramedWrite::new(writer, ResponseEncoder::new()), status: None }
    }

    /// Records the pending status; the last call before sending wins.
    pub fn set_status(&mut self, code: StatusCode, meta: impl Into<String>) {
        self.status = Some(StatusLine::new(code, meta));
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.status.as_ref().map(StatusLine::code)
    }

    pub fn meta(&self) -> Option<&str> {
        self.status.as_ref().map(StatusLine::meta)
    }

    /// Whether a status line has already been written to the stream.
    pub fn status_sent(&self) -> bool {
        self.framed_write.encoder().status_sent()
    }

    /// Writes the pending status line and flushes it.
    ///
    /// Without a pending status, or with a success status lacking a media type, this sends
    /// `20 text/gemini`. Each call writes one more line, so a handler must call it at most once.
    pub async fn send_status(&mut self) -> Result<(), SendError> {
        let status_line = self.resolve_status();
        self.framed_write.send(Message::<Bytes>::Header(status_line)).await
    }

    /// Writes `bytes` as body, preceded by the status line if none was sent yet.
    ///
    /// Returns the number of body bytes written.
    pub async fn write(&mut self, bytes: &[u8]) -> Result<usize, SendError> {
        self.write_bytes(Bytes::copy_from_slice(bytes)).await
    }

    /// Same as [`write`](Self::write), without copying an owned buffer.
    pub async fn write_bytes(&mut self, bytes: Bytes) -> Result<usize, SendError> {
        if !self.status_sent() {
            let status_line = self.resolve_status();
            // feed only: the header goes out together with the first body bytes
            self.framed_write.feed(Message::<Bytes>::Header(status_line)).await?;
        }

        let size = bytes.len();
        self.framed_write.send(Message::Payload(bytes)).await?;
        trace!(body_size = size, "wrote response body");
        Ok(size)
    }

    /// Gives back the underlying stream.
    pub fn into_inner(self) -> BoxWriter {
        self.framed_write.into_inner()
    }

    fn resolve_status(&mut self) -> StatusLine {
        let status_line = match self.status.take() {
            Some(line) if !(line.code().is_success() && line.meta().is_empty()) => line,
            _ => StatusLine::new(StatusCode::SUCCESS, DEFAULT_META),
        };
        self.status = Some(status_line.clone());
        status_line
    }
}

impl std::fmt::Debug for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Response").field("status", &self.status).field("status_sent", &self.status_sent()).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, DuplexStream, duplex};

    fn response_pair() -> (Response, DuplexStream) {
        let (client, server) = duplex(64 * 1024);
        (Response::new(server), client)
    }

    async fn finish(response: Response, mut client: DuplexStream) -> Vec<u8> {
        drop(response);
        let mut received = Vec::new();
        client.read_to_end(&mut received).await.unwrap();
        received
    }

    #[tokio::test]
    async fn send_status_defaults_to_success() {
        let (mut response, client) = response_pair();

        response.send_status().await.unwrap();

        assert!(response.status_sent());
        assert_eq!(response.status(), Some(StatusCode::SUCCESS));
        assert_eq!(response.meta(), Some("text/gemini"));
        assert_eq!(finish(response, client).await, b"20 text/gemini\r\n");
    }

    #[tokio::test]
    async fn last_set_status_wins() {
        let (mut response, client) = response_pair();

        response.set_status(StatusCode::TEMPORARY_FAILURE, "busy");
        response.set_status(StatusCode::REDIRECT, "gemini://example.org/new");
        assert!(!response.status_sent());
        response.send_status().await.unwrap();

        assert_eq!(finish(response, client).await, b"30 gemini://example.org/new\r\n");
    }

    #[tokio::test]
    async fn success_without_meta_gets_default_media_type() {
        let (mut response, client) = response_pair();

        response.set_status(StatusCode::SUCCESS, "");
        response.send_status().await.unwrap();

        assert_eq!(finish(response, client).await, b"20 text/gemini\r\n");
    }

    #[tokio::test]
    async fn write_sends_status_before_body() {
        let (mut response, client) = response_pair();

        response.set_status(StatusCode::SUCCESS, "text/gemini");
        let written = response.write(b"# Test Response").await.unwrap();

        assert_eq!(written, 15);
        assert_eq!(finish(response, client).await, b"20 text/gemini\r\n# Test Response");
    }

    #[tokio::test]
    async fn write_empty_payload_still_sends_status() {
        let (mut response, client) = response_pair();

        let written = response.write(b"").await.unwrap();

        assert_eq!(written, 0);
        assert_eq!(finish(response, client).await, b"20 text/gemini\r\n");
    }

    #[tokio::test]
    async fn later_writes_append_body_only() {
        let (mut response, client) = response_pair();

        response.set_status(StatusCode::SUCCESS, "text/plain");
        response.write(b"one ").await.unwrap();
        response.write_bytes(Bytes::from_static(b"two")).await.unwrap();

        assert_eq!(finish(response, client).await, b"20 text/plain\r\none two");
    }

    #[tokio::test]
    async fn send_status_twice_writes_two_lines() {
        let (mut response, client) = response_pair();

        response.send_status().await.unwrap();
        response.set_status(StatusCode::PERMANENT_FAILURE, "late");
        response.send_status().await.unwrap();

        assert_eq!(finish(response, client).await, b"20 text/gemini\r\n50 late\r\n");
    }

    #[tokio::test]
    async fn invalid_meta_writes_nothing() {
        let (mut response, client) = response_pair();

        response.set_status(StatusCode::REDIRECT, "a\nb");
        let result = response.send_status().await;

        assert!(matches!(result, Err(SendError::InvalidMeta { .. })));
        assert!(!response.status_sent());
        assert!(finish(response, client).await.is_empty());
    }
}
