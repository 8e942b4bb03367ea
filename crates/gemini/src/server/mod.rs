//! The tls listener and its accept loop.

mod error;
#[allow(clippy::module_inception, reason = "the server type lives in its own file, as the connection does")]
mod server;
mod tls;

pub use error::ServerError;
pub use server::Server;
pub use server::ServerBuilder;
pub use server::listen_and_serve_tls;
pub use tls::load_tls_acceptor;
