use crate::ensure;
use crate::protocol::{Message, SendError, StatusLine};
use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::Encoder;
use tracing::{error, warn};

/// Maximum size in bytes of the meta string in a status line
pub const MAX_META_BYTES: usize = 1024;

/// Encoder for gemini responses.
///
/// Writes a [`StatusLine`] as `<code> <meta>\r\n` and body chunks verbatim. Body chunks are
/// refused until a status line has been encoded.
#[derive(Debug, Default)]
pub struct ResponseEncoder {
    status_sent: bool,
}

impl ResponseEncoder {
    pub fn new() -> Self {
        Default::default()
    }

    /// Whether at least one status line went through this encoder.
    pub fn status_sent(&self) -> bool {
        self.status_sent
    }

    fn encode_status_line(&mut self, status_line: &StatusLine, dst: &mut BytesMut) -> Result<(), SendError> {
        let meta = status_line.meta();
        ensure!(
            meta.len() <= MAX_META_BYTES,
            SendError::invalid_meta(format!("meta size {} exceed the limit {MAX_META_BYTES}", meta.len()))
        );
        ensure!(!meta.contains(['\r', '\n']), SendError::invalid_meta("meta must not contain a line break"));

        if self.status_sent {
            warn!(code = %status_line.code(), "status line sent more than once on one response");
        }

        let code = status_line.code().as_u8();
        dst.reserve(meta.len() + 5);
        dst.put_u8(b'0' + code / 10);
        dst.put_u8(b'0' + code % 10);
        dst.put_u8(b' ');
        dst.put_slice(meta.as_bytes());
        dst.put_slice(b"\r\n");

        self.status_sent = true;
        Ok(())
    }
}

impl<D: Buf> Encoder<Message<D>> for ResponseEncoder {
    type Error = SendError;

    fn encode(&mut self, item: Message<D>, dst: &mut BytesMut) -> Result<(), Self::Error> {
        match item {
            Message::Header(status_line) => self.encode_status_line(&status_line, dst),

            Message::Payload(data) => {
                if !self.status_sent {
                    error!("expect status line but receive payload item");
                    return Err(SendError::BodyBeforeStatus);
                }
                dst.put(data);
                Ok(())
            }
        }
    }
}
