//! TLS configuration and certificate loading.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use rustls::ServerConfig;
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use tokio_rustls::TlsAcceptor;
use tracing::debug;

use crate::server::ServerError;

/// Gemini requires TLS 1.2 or newer.
static PROTOCOL_VERSIONS: &[&rustls::SupportedProtocolVersion] = &[&rustls::version::TLS13, &rustls::version::TLS12];

/// Builds an acceptor from a PEM certificate chain and a PEM private key.
///
/// Fails on the first problem: unreadable files, a file without certificates or without
/// key, or a key rustls refuses for the chain.
pub fn load_tls_acceptor(cert_path: &Path, key_path: &Path) -> Result<TlsAcceptor, ServerError> {
    let certs = load_certs(cert_path)?;
    let key = load_private_key(key_path)?;
    debug!(cert = ?cert_path, chain_len = certs.len(), "loaded tls certificate");

    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let config = ServerConfig::builder_with_provider(provider)
        .with_protocol_versions(PROTOCOL_VERSIONS)?
        .with_no_client_auth()
        .with_single_cert(certs, key)?;

    Ok(TlsAcceptor::from(Arc::new(config)))
}

fn load_certs(path: &Path) -> Result<Vec<CertificateDer<'static>>, ServerError> {
    let file = File::open(path).map_err(|e| ServerError::certificate(path, e))?;
    let certs = rustls_pemfile::certs(&mut BufReader::new(file))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ServerError::certificate(path, e))?;

    if certs.is_empty() {
        return Err(ServerError::NoCertificate { path: path.to_path_buf() });
    }
    Ok(certs)
}

fn load_private_key(path: &Path) -> Result<PrivateKeyDer<'static>, ServerError> {
    let file = File::open(path).map_err(|e| ServerError::certificate(path, e))?;
    rustls_pemfile::private_key(&mut BufReader::new(file))
        .map_err(|e| ServerError::certificate(path, e))?
        .ok_or_else(|| ServerError::NoPrivateKey { path: path.to_path_buf() })
}
