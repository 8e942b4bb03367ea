//! Gemini request line decoder
//!
//! A gemini request is a single line: an absolute url followed by `\r\n`. The whole line,
//! terminator included, may be at most [`MAX_REQUEST_LINE_BYTES`] bytes long.
//!
//! The decoder yields the line as a `String` without its terminator. It fails as soon as the
//! buffered bytes prove the line is too long, without waiting for the terminator, so a client
//! that never ends its line cannot make the server buffer without bound.
//!
//! # Example
//!
//! ```
//! use micro_gemini::codec::RequestDecoder;
//! use tokio_util::codec::Decoder;
//! use bytes::BytesMut;
//!
//! let mut decoder = RequestDecoder::new();
//! let mut buffer = BytesMut::from(&b"gemini://example.org/\r\n"[..]);
//! let line = decoder.decode(&mut buffer).unwrap();
//! assert_eq!(line.as_deref(), Some("gemini://example.org/"));
//! ```

use std::cmp;

use bytes::BytesMut;
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::ensure;
use crate::protocol::ParseError;

/// Maximum size in bytes of a raw request line, `\r\n` included
pub const MAX_REQUEST_LINE_BYTES: usize = 1024;

/// Decoder for the gemini request line implementing the [`Decoder`] trait.
#[derive(Debug)]
pub struct RequestDecoder {
    /// where the next search for `\n` starts, so repeated partial reads are not rescanned
    next_index: usize,
    max_length: usize,
}

impl RequestDecoder {
    pub fn new() -> Self {
        Default::default()
    }

    /// Creates a decoder accepting lines of at most `max_length` bytes.
    pub fn with_max_length(max_length: usize) -> Self {
        Self { next_index: 0, max_length }
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    fn take_line(&mut self, mut line: BytesMut) -> Result<String, ParseError> {
        self.next_index = 0;
        ensure!(line.len() <= self.max_length, ParseError::too_large_request(line.len(), self.max_length));

        if line.last() == Some(&b'\n') {
            line.truncate(line.len() - 1);
        }
        if line.last() == Some(&b'\r') {
            line.truncate(line.len() - 1);
        }

        trace!(line_size = line.len(), "decoded request line");
        String::from_utf8(line.to_vec()).map_err(|e| ParseError::invalid_url(format!("request line is not utf-8: {e}")))
    }
}

impl Default for RequestDecoder {
    fn default() -> Self {
        Self::with_max_length(MAX_REQUEST_LINE_BYTES)
    }
}

impl Decoder for RequestDecoder {
    type Item = String;
    type Error = ParseError;

    /// Attempts to decode the request line from the provided buffer
    ///
    /// # Returns
    ///
    /// - `Ok(Some(line))`: a complete line, terminator removed
    /// - `Ok(None)`: need more data to proceed
    /// - `Err(ParseError::TooLargeRequest)`: the line can no longer fit the limit
    /// - `Err(ParseError::InvalidUrl)`: the line is not utf-8
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let read_to = cmp::min(self.max_length, src.len());

        if let Some(offset) = src[self.next_index..read_to].iter().position(|b| *b == b'\n') {
            let line = src.split_to(self.next_index + offset + 1);
            return self.take_line(line).map(Some);
        }

        // a full buffer without `\n` can only hold a line over the limit
        if src.len() >= self.max_length {
            self.next_index = 0;
            return Err(ParseError::too_large_request(src.len(), self.max_length));
        }

        self.next_index = read_to;
        Ok(None)
    }

    /// A line cut short by the end of the stream is still a line.
    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.decode(src)? {
            Some(line) => Ok(Some(line)),
            None if src.is_empty() => Ok(None),
            None => {
                let line = src.split();
                self.take_line(line).map(Some)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crlf_line() {
        let mut buffer = BytesMut::from(&b"gemini://example.org/\r\nleftover"[..]);
        let mut decoder = RequestDecoder::new();

        let line = decoder.decode(&mut buffer).unwrap().unwrap();
        assert_eq!(line, "gemini://example.org/");
        assert_eq!(&buffer[..], b"leftover");
    }

    #[test]
    fn bare_lf_line() {
        let mut buffer = BytesMut::from(&b"gemini://example.org/\n"[..]);
        let line = RequestDecoder::new().decode(&mut buffer).unwrap();
        assert_eq!(line.as_deref(), Some("gemini://example.org/"));
    }

    #[test]
    fn partial_line_needs_more_data() {
        let mut buffer = BytesMut::from(&b"gemini://exam"[..]);
        let mut decoder = RequestDecoder::new();

        assert!(decoder.decode(&mut buffer).unwrap().is_none());

        buffer.extend_from_slice(b"ple.org/\r\n");
        let line = decoder.decode(&mut buffer).unwrap();
        assert_eq!(line.as_deref(), Some("gemini://example.org/"));
    }

    #[test]
    fn line_at_limit_is_accepted() {
        let url = "a".repeat(MAX_REQUEST_LINE_BYTES - 2);
        let mut buffer = BytesMut::from(format!("{url}\r\n").as_bytes());

        let line = RequestDecoder::new().decode(&mut buffer).unwrap();
        assert_eq!(line.map(|l| l.len()), Some(MAX_REQUEST_LINE_BYTES - 2));

        let url = "a".repeat(MAX_REQUEST_LINE_BYTES - 1);
        let mut buffer = BytesMut::from(format!("{url}\n").as_bytes());

        let line = RequestDecoder::new().decode(&mut buffer).unwrap();
        assert_eq!(line.map(|l| l.len()), Some(MAX_REQUEST_LINE_BYTES - 1));
    }

    #[test]
    fn line_at_limit_split_before_lf() {
        let url = "a".repeat(MAX_REQUEST_LINE_BYTES - 2);
        let mut buffer = BytesMut::from(format!("{url}\r").as_bytes());
        let mut decoder = RequestDecoder::new();

        assert!(decoder.decode(&mut buffer).unwrap().is_none());

        buffer.extend_from_slice(b"\n");
        let line = decoder.decode(&mut buffer).unwrap();
        assert_eq!(line.map(|l| l.len()), Some(MAX_REQUEST_LINE_BYTES - 2));
    }

    #[test]
    fn terminator_counts_towards_limit() {
        let url = "a".repeat(MAX_REQUEST_LINE_BYTES - 1);
        let mut buffer = BytesMut::from(format!("{url}\r\n").as_bytes());

        let error = RequestDecoder::new().decode(&mut buffer).unwrap_err();
        assert!(matches!(error, ParseError::TooLargeRequest { current_size: 1025, max_size: MAX_REQUEST_LINE_BYTES }));
    }

    #[test]
    fn too_long_line_fails_without_terminator() {
        let mut buffer = BytesMut::from(&[b'x'; MAX_REQUEST_LINE_BYTES][..]);

        let error = RequestDecoder::new().decode(&mut buffer).unwrap_err();
        assert!(matches!(error, ParseError::TooLargeRequest { current_size: 1024, max_size: 1024 }));
    }

    #[test]
    fn too_long_line_at_eof() {
        let mut buffer = BytesMut::from(&[b'x'; MAX_REQUEST_LINE_BYTES + 10][..]);

        let error = RequestDecoder::new().decode_eof(&mut buffer).unwrap_err();
        assert!(matches!(error, ParseError::TooLargeRequest { .. }));
    }

    #[test]
    fn eof_takes_remaining_bytes() {
        let mut buffer = BytesMut::from(&b"gemini://example.org/"[..]);
        let line = RequestDecoder::new().decode_eof(&mut buffer).unwrap();

        assert_eq!(line.as_deref(), Some("gemini://example.org/"));
        assert!(buffer.is_empty());
    }

    #[test]
    fn eof_on_empty_buffer() {
        let mut buffer = BytesMut::new();
        assert!(RequestDecoder::new().decode_eof(&mut buffer).unwrap().is_none());
    }

    #[test]
    fn non_utf8_line() {
        let mut buffer = BytesMut::from(&b"gemini://\xff\xfe/\r\n"[..]);
        let error = RequestDecoder::new().decode(&mut buffer).unwrap_err();
        assert!(matches!(error, ParseError::InvalidUrl { .. }));
    }

    #[test]
    fn custom_limit() {
        let mut decoder = RequestDecoder::with_max_length(8);
        assert_eq!(decoder.max_length(), 8);

        let mut buffer = BytesMut::from(&b"/12345\r\n"[..]);
        assert_eq!(decoder.decode(&mut buffer).unwrap().as_deref(), Some("/12345"));

        let mut buffer = BytesMut::from(&b"/123456\r\n"[..]);
        decoder.decode(&mut buffer).unwrap_err();
    }
}
