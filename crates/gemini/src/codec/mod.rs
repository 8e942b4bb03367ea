//! Gemini codec module for decoding requests and encoding responses
//!
//! Both halves plug into `tokio_util::codec`:
//!
//! - [`RequestDecoder`]: reads the single, size bounded request line
//! - [`ResponseEncoder`]: writes the status line and the body bytes that follow it
//!
//! # Example
//!
//! ```
//! use micro_gemini::codec::{RequestDecoder, ResponseEncoder};
//! use micro_gemini::protocol::{Message, StatusCode, StatusLine};
//! use tokio_util::codec::{Decoder, Encoder};
//! use bytes::{Bytes, BytesMut};
//!
//! let mut decoder = RequestDecoder::new();
//! let mut request_buffer = BytesMut::from(&b"gemini://example.org/\r\n"[..]);
//! let line = decoder.decode(&mut request_buffer).unwrap();
//! assert_eq!(line.as_deref(), Some("gemini://example.org/"));
//!
//! let mut encoder = ResponseEncoder::new();
//! let mut response_buffer = BytesMut::new();
//! let header = Message::<Bytes>::Header(StatusLine::new(StatusCode::SUCCESS, "text/gemini"));
//! encoder.encode(header, &mut response_buffer).unwrap();
//! assert_eq!(&response_buffer[..], b"20 text/gemini\r\n");
//! ```

mod request_decoder;
mod response_encoder;

pub use request_decoder::MAX_REQUEST_LINE_BYTES;
pub use request_decoder::RequestDecoder;
pub use response_encoder::MAX_META_BYTES;
pub use response_encoder::ResponseEncoder;
