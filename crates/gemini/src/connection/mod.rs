//! Gemini connection handling
//!
//! - [`GeminiConnection`]: runs the single request/response exchange of one connection:
//!   - reads the size bounded request line
//!   - parses it into a request, rejecting other schemes
//!   - dispatches to the handler
//!   - always shuts the stream down afterwards

mod gemini_connection;

pub use gemini_connection::GeminiConnection;
