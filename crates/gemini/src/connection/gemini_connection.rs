use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio_util::codec::FramedRead;
use tracing::{debug, error, warn};

use crate::codec::{MAX_REQUEST_LINE_BYTES, RequestDecoder};
use crate::handler::Handler;
use crate::protocol::{GeminiError, ParseError, Request, Response, StatusCode};

/// A single gemini exchange over one connection.
///
/// `GeminiConnection` reads one request line, parses it into a [`Request`], hands it to the
/// handler together with a fresh [`Response`], and finally shuts the stream down. A request
/// that cannot be read or parsed is answered with a failure status instead of reaching the
/// handler.
///
/// # Type Parameters
///
/// * `R`: The async readable stream type
/// * `W`: The async writable stream type
pub struct GeminiConnection<R, W> {
    framed_read: FramedRead<R, RequestDecoder>,
    writer: W,
    peer_addr: Option<SocketAddr>,
    request_timeout: Option<Duration>,
}

impl<R, W> GeminiConnection<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Send + Unpin + 'static,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            // the line is bounded, so the buffer never has to grow past it
            framed_read: FramedRead::with_capacity(reader, RequestDecoder::new(), MAX_REQUEST_LINE_BYTES),
            writer,
            peer_addr: None,
            request_timeout: None,
        }
    }

    /// Attaches the client address to the parsed request.
    pub fn with_peer_addr(mut self, peer_addr: SocketAddr) -> Self {
        self.peer_addr = Some(peer_addr);
        self
    }

    /// Bounds the wait for the request line. `None` waits forever.
    pub fn with_request_timeout(mut self, request_timeout: Option<Duration>) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    /// Runs the exchange to completion. The stream is shut down on every path.
    ///
    /// # Errors
    ///
    /// - [`GeminiError::RequestError`] if the request line was unreadable or rejected; the
    ///   client has already been sent the matching failure status
    /// - [`GeminiError::ResponseError`] if a status line could not be written
    ///
    /// Handler errors are logged, not returned.
    pub async fn process<H>(self, handler: Arc<H>) -> Result<(), GeminiError>
    where
        H: Handler + ?Sized,
    {
        let Self { mut framed_read, writer, peer_addr, request_timeout } = self;
        let mut response = Response::new(writer);

        let result = match read_request(&mut framed_read, request_timeout).await {
            Ok(request) => {
                let request = match peer_addr {
                    Some(peer_addr) => request.with_peer_addr(peer_addr),
                    None => request,
                };
                dispatch(&mut response, &request, handler.as_ref()).await
            }
            Err(e) => {
                warn!(cause = %e, peer = ?peer_addr, "can't read request");
                reject(&mut response, e).await
            }
        };

        let mut writer = response.into_inner();
        if let Err(e) = writer.shutdown().await {
            debug!(cause = %e, "failed to shutdown connection");
        }

        result
    }
}

async fn read_request<R>(framed_read: &mut FramedRead<R, RequestDecoder>, request_timeout: Option<Duration>) -> Result<Request, ParseError>
where
    R: AsyncRead + Unpin,
{
    let next = match request_timeout {
        Some(duration) => tokio::time::timeout(duration, framed_read.next()).await.map_err(|_elapsed| ParseError::Timeout)?,
        None => framed_read.next().await,
    };

    match next {
        Some(line) => Request::parse(&line?),
        None => Err(ParseError::UnexpectedEof),
    }
}

/// Answers a bad request. The read error is returned even when the answer can't be sent.
async fn reject(response: &mut Response, e: ParseError) -> Result<(), GeminiError> {
    let (code, meta) = e.status();
    response.set_status(code, meta);
    if let Err(send_error) = response.send_status().await {
        debug!(cause = %send_error, "can't send failure status");
    }
    Err(e.into())
}

async fn dispatch<H>(response: &mut Response, request: &Request, handler: &H) -> Result<(), GeminiError>
where
    H: Handler + ?Sized,
{
    debug!(url = %request.url(), "dispatching request");

    if let Err(e) = handler.serve(response, request).await {
        error!(cause = %e, url = %request.url(), "handle request error");
        if !response.status_sent() {
            response.set_status(StatusCode::TEMPORARY_FAILURE, "Internal server error");
            response.send_status().await?;
        }
    } else if !response.status_sent() {
        debug!(url = %request.url(), "handler sent no status");
    }

    Ok(())
}

impl<R, W> std::fmt::Debug for GeminiConnection<R, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConnection")
            .field("peer_addr", &self.peer_addr)
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}
