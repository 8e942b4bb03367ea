use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that stop a server from starting or from accepting connections.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("can't read tls file {path:?}: {source}")]
    Certificate { path: PathBuf, source: io::Error },

    #[error("no certificate found in {path:?}")]
    NoCertificate { path: PathBuf },

    #[error("no private key found in {path:?}")]
    NoPrivateKey { path: PathBuf },

    #[error("invalid tls configuration: {source}")]
    Tls {
        #[from]
        source: rustls::Error,
    },

    #[error("bind server error: {source}")]
    Bind { source: io::Error },

    #[error("failed to accept: {source}")]
    Accept { source: io::Error },

    #[error("address must be set")]
    MissingAddress,

    #[error("certificate and private key must be set")]
    MissingCertificate,

    #[error("handler must be set")]
    MissingHandler,
}

impl ServerError {
    pub fn certificate<P: Into<PathBuf>>(path: P, source: io::Error) -> Self {
        Self::Certificate { path: path.into(), source }
    }

    pub fn bind(source: io::Error) -> Self {
        Self::Bind { source }
    }

    pub fn accept(source: io::Error) -> Self {
        Self::Accept { source }
    }
}
