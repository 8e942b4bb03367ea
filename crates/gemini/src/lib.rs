//! An asynchronous micro Gemini server implementation
//!
//! Gemini is a one-shot protocol: over a TLS connection the client sends a single line
//! holding an absolute url, the server answers with one `<status> <meta>\r\n` line and an
//! optional body, and then closes the connection.
//!
//! # Example
//!
//! ```no_run
//! use micro_gemini::listen_and_serve_tls;
//! use micro_gemini::protocol::StatusCode;
//! use micro_gemini::router::Router;
//! use tracing::error;
//!
//! #[tokio::main]
//! async fn main() {
//!     let router = Router::builder()
//!         .handle_fn("/", |response, _request| {
//!             Box::pin(async move {
//!                 response.set_status(StatusCode::SUCCESS, "text/gemini");
//!                 response.write(b"# Test Response").await?;
//!                 Ok(())
//!             })
//!         })
//!         .build();
//!
//!     if let Err(e) = listen_and_serve_tls("0.0.0.0:1965", "localhost.crt", "localhost.key", router).await {
//!         error!(cause = %e, "server stopped");
//!     }
//! }
//! ```
//!
//! # Architecture
//!
//! - [`protocol`]: status codes, the parsed [`Request`](protocol::Request), the
//!   [`Response`](protocol::Response) writer and the error types
//! - [`codec`]: the bounded request line decoder and the status line encoder
//! - [`handler`]: the [`Handler`](handler::Handler) trait and closure handlers
//! - [`router`]: ordered prefix routing, first match wins
//! - [`connection`]: the per-connection read, parse, dispatch, close sequence
//! - [`server`]: certificate loading, the tls listener and its accept loop
//!
//! # Response discipline
//!
//! Exactly one status line precedes any body bytes. [`Response::write`](protocol::Response::write)
//! sends the pending status itself before the first body bytes, and the encoder refuses body
//! bytes that would go out first.
//!
//! # Limitations
//!
//! - One request per connection, no keep-alive
//! - Client certificates are not requested

pub mod codec;
pub mod connection;
pub mod handler;
pub mod protocol;
pub mod router;
pub mod server;

mod utils;
pub(crate) use utils::ensure;

pub use server::listen_and_serve_tls;
