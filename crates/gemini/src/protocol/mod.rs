//! Core gemini protocol abstractions.
//!
//! - **Status codes** ([`status`]): [`StatusCode`] and its [`StatusCategory`]
//! - **Messages** ([`message`]): the outgoing [`Message`], a [`StatusLine`] or body bytes
//! - **Requests** ([`request`]): the parsed [`Request`]
//! - **Responses** ([`response`]): the [`Response`] writer handed to handlers
//! - **Errors** ([`error`]): [`GeminiError`], [`ParseError`], [`SendError`]

mod status;
pub use status::InvalidStatusCode;
pub use status::StatusCategory;
pub use status::StatusCode;

mod message;
pub use message::Message;
pub use message::StatusLine;

mod request;
pub use request::GEMINI_SCHEME;
pub use request::Request;

mod response;
pub use response::BoxWriter;
pub use response::DEFAULT_META;
pub use response::Response;

mod error;
pub use error::GeminiError;
pub use error::ParseError;
pub use error::SendError;
