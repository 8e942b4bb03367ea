use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio_rustls::TlsAcceptor;
use tracing::{debug, error, info, warn};

use crate::connection::GeminiConnection;
use crate::handler::Handler;
use crate::protocol::GeminiError;
use crate::server::ServerError;
use crate::server::tls::load_tls_acceptor;

pub struct ServerBuilder {
    address: Option<String>,
    certificate: Option<(PathBuf, PathBuf)>,
    handler: Option<Arc<dyn Handler>>,
    max_connections: Option<usize>,
    request_timeout: Option<Duration>,
}

impl ServerBuilder {
    fn new() -> Self {
        Self { address: None, certificate: None, handler: None, max_connections: None, request_timeout: None }
    }

    /// The address to bind, e.g. `0.0.0.0:1965`.
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// PEM files holding the certificate chain and its private key.
    pub fn certificate(mut self, cert_file: impl Into<PathBuf>, key_file: impl Into<PathBuf>) -> Self {
        self.certificate = Some((cert_file.into(), key_file.into()));
        self
    }

    /// The root handler, usually a [`Router`](crate::router::Router).
    pub fn handler(mut self, handler: impl Handler + 'static) -> Self {
        self.handler = Some(Arc::new(handler));
        self
    }

    /// Caps the number of connections served at once. Unbounded by default.
    pub fn max_connections(mut self, max_connections: usize) -> Self {
        self.max_connections = Some(max_connections);
        self
    }

    /// Bounds the tls handshake and the wait for the request line. No timeout by default.
    pub fn request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = Some(request_timeout);
        self
    }

    pub fn build(self) -> Result<Server, ServerError> {
        let address = self.address.ok_or(ServerError::MissingAddress)?;
        let (cert_file, key_file) = self.certificate.ok_or(ServerError::MissingCertificate)?;
        let handler = self.handler.ok_or(ServerError::MissingHandler)?;
        Ok(Server {
            address,
            cert_file,
            key_file,
            handler,
            max_connections: self.max_connections,
            request_timeout: self.request_timeout,
        })
    }
}

impl fmt::Debug for ServerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerBuilder")
            .field("address", &self.address)
            .field("certificate", &self.certificate)
            .field("max_connections", &self.max_connections)
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}

/// A gemini server: a tls listener spawning one task per accepted connection.
pub struct Server {
    address: String,
    cert_file: PathBuf,
    key_file: PathBuf,
    handler: Arc<dyn Handler>,
    max_connections: Option<usize>,
    request_timeout: Option<Duration>,
}

impl Server {
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn cert_file(&self) -> &Path {
        &self.cert_file
    }

    pub fn key_file(&self) -> &Path {
        &self.key_file
    }

    /// Loads the certificate, binds the address and serves until accepting fails.
    ///
    /// # Errors
    ///
    /// Returns the first certificate, bind or accept error. Errors of single connections
    /// are logged and never end the server.
    pub async fn start(self) -> Result<(), ServerError> {
        let acceptor = load_tls_acceptor(&self.cert_file, &self.key_file)?;

        let tcp_listener = TcpListener::bind(self.address.as_str()).await.map_err(ServerError::bind)?;
        let local_addr = tcp_listener.local_addr().map_err(ServerError::bind)?;
        info!(address = %local_addr, max_connections = ?self.max_connections, "start listening");

        self.serve(tcp_listener, acceptor).await
    }

    /// Runs the accept loop on an already bound listener.
    pub async fn serve(self, tcp_listener: TcpListener, acceptor: TlsAcceptor) -> Result<(), ServerError> {
        let connection_limit = self.max_connections.map(|max| Arc::new(Semaphore::new(max)));

        loop {
            // the limit is acquired before accepting, so waiting clients queue in the backlog
            let permit = match &connection_limit {
                Some(limit) => Arc::clone(limit).acquire_owned().await.ok(),
                None => None,
            };

            let (tcp_stream, peer_addr) = match tcp_listener.accept().await {
                Ok(stream_and_addr) => stream_and_addr,
                Err(e) => {
                    error!(cause = %e, "failed to accept, stop serving");
                    return Err(ServerError::accept(e));
                }
            };
            debug!(peer = %peer_addr, "accepted connection");

            tokio::spawn(serve_connection(
                tcp_stream,
                peer_addr,
                acceptor.clone(),
                Arc::clone(&self.handler),
                self.request_timeout,
                permit,
            ));
        }
    }
}

impl fmt::Debug for Server {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Server")
            .field("address", &self.address)
            .field("cert_file", &self.cert_file)
            .field("key_file", &self.key_file)
            .field("max_connections", &self.max_connections)
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}

async fn serve_connection(
    tcp_stream: TcpStream,
    peer_addr: SocketAddr,
    acceptor: TlsAcceptor,
    handler: Arc<dyn Handler>,
    request_timeout: Option<Duration>,
    _permit: Option<OwnedSemaphorePermit>,
) {
    let handshake = acceptor.accept(tcp_stream);
    let handshake_result = match request_timeout {
        Some(duration) => match tokio::time::timeout(duration, handshake).await {
            Ok(result) => result,
            Err(_elapsed) => {
                warn!(peer = %peer_addr, "tls handshake timed out");
                return;
            }
        },
        None => handshake.await,
    };

    let tls_stream = match handshake_result {
        Ok(tls_stream) => tls_stream,
        Err(e) => {
            warn!(peer = %peer_addr, cause = %e, "tls handshake failed");
            return;
        }
    };

    let (reader, writer) = tokio::io::split(tls_stream);
    let connection = GeminiConnection::new(reader, writer).with_peer_addr(peer_addr).with_request_timeout(request_timeout);

    match connection.process(handler).await {
        Ok(()) => {
            debug!(peer = %peer_addr, "finished process, connection shutdown");
        }
        Err(e @ GeminiError::RequestError { .. }) => {
            warn!(peer = %peer_addr, cause = %e, "rejected request, connection shutdown");
        }
        Err(e) => {
            error!(peer = %peer_addr, cause = %e, "service has error, connection shutdown");
        }
    }
}

/// Serves `handler` on `address` with the given certificate until accepting fails.
///
/// Shorthand for [`Server::builder`] with only the required settings.
pub async fn listen_and_serve_tls(
    address: impl Into<String>,
    cert_file: impl Into<PathBuf>,
    key_file: impl Into<PathBuf>,
    handler: impl Handler + 'static,
) -> Result<(), ServerError> {
    Server::builder().address(address).certificate(cert_file, key_file).handler(handler).build()?.start().await
}
