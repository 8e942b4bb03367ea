use std::net::SocketAddr;

use url::Url;

use crate::ensure;
use crate::protocol::ParseError;

/// The only url scheme this server answers.
pub const GEMINI_SCHEME: &str = "gemini";

/// A parsed gemini request.
///
/// The url always carries the `gemini` scheme: a request line without a scheme is read as
/// if it had one, and any other scheme is rejected while parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    url: Url,
    peer_addr: Option<SocketAddr>,
}

impl Request {
    /// Parses a request line, without its line terminator.
    ///
    /// # Errors
    ///
    /// - [`ParseError::InvalidUrl`] if the line is not an url
    /// - [`ParseError::UnsupportedScheme`] if the url names a scheme other than `gemini`
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let url = match Url::parse(line) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                Url::parse(&with_default_scheme(line)).map_err(ParseError::invalid_url)?
            }
            Err(e) => return Err(ParseError::invalid_url(e)),
        };

        ensure!(url.scheme() == GEMINI_SCHEME, ParseError::unsupported_scheme(url.scheme()));

        Ok(Self { url, peer_addr: None })
    }

    pub fn with_peer_addr(mut self, peer_addr: SocketAddr) -> Self {
        self.peer_addr = Some(peer_addr);
        self
    }

    /// Returns a copy of this request whose url path is replaced by `path`.
    pub fn with_path(&self, path: &str) -> Self {
        let mut url = self.url.clone();
        url.set_path(path);
        Self { url, peer_addr: self.peer_addr }
    }

    #[inline]
    pub fn url(&self) -> &Url {
        &self.url
    }

    #[inline]
    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    pub fn host(&self) -> Option<&str> {
        self.url.host_str().filter(|host| !host.is_empty())
    }

    pub fn port(&self) -> Option<u16> {
        self.url.port()
    }

    /// The raw, still percent-encoded path. May be empty.
    #[inline]
    pub fn path(&self) -> &str {
        self.url.path()
    }

    pub fn query(&self) -> Option<&str> {
        self.url.query()
    }

    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.peer_addr
    }
}

fn with_default_scheme(line: &str) -> String {
    if line.starts_with("//") { format!("{GEMINI_SCHEME}:{line}") } else { format!("{GEMINI_SCHEME}://{line}") }
}
