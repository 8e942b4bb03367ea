use bytes::{Buf, Bytes};

use crate::protocol::StatusCode;

/// The single header line of a gemini response: `<code> <meta>\r\n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    code: StatusCode,
    meta: String,
}

impl StatusLine {
    pub fn new(code: StatusCode, meta: impl Into<String>) -> Self {
        Self { code, meta: meta.into() }
    }

    #[inline]
    pub fn code(&self) -> StatusCode {
        self.code
    }

    #[inline]
    pub fn meta(&self) -> &str {
        &self.meta
    }
}

/// An outgoing gemini message: the status line, or a chunk of body bytes.
///
/// `Data` defaults to `Bytes`, any `Buf` can be written.
#[derive(Debug)]
pub enum Message<Data: Buf = Bytes> {
    Header(StatusLine),
    Payload(Data),
}

impl<Data: Buf> Message<Data> {
    #[inline]
    pub fn is_header(&self) -> bool {
        matches!(self, Message::Header(_))
    }

    #[inline]
    pub fn is_payload(&self) -> bool {
        matches!(self, Message::Payload(_))
    }
}
