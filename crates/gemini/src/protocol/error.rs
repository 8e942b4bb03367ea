use std::io;
use thiserror::Error;

use crate::protocol::StatusCode;

/// Meta sent back for failures while reading or parsing the request line.
const READ_FAILURE_META: &str = "Unknown error while reading request";

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("request error: {source}")]
    RequestError {
        #[from]
        source: ParseError,
    },

    #[error("response error: {source}")]
    ResponseError {
        #[from]
        source: SendError,
    },
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("request size too large, current: {current_size} exceed the limit {max_size}")]
    TooLargeRequest { current_size: usize, max_size: usize },

    #[error("invalid request url: {reason}")]
    InvalidUrl { reason: String },

    #[error("unsupported url scheme: {scheme}")]
    UnsupportedScheme { scheme: String },

    #[error("connection closed before a request line was received")]
    UnexpectedEof,

    #[error("timed out waiting for the request line")]
    Timeout,

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ParseError {
    pub fn too_large_request(current_size: usize, max_size: usize) -> Self {
        Self::TooLargeRequest { current_size, max_size }
    }

    pub fn invalid_url<S: ToString>(str: S) -> Self {
        Self::InvalidUrl { reason: str.to_string() }
    }

    pub fn unsupported_scheme<S: ToString>(scheme: S) -> Self {
        Self::UnsupportedScheme { scheme: scheme.to_string() }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }

    /// The status line a client receives when its request fails with this error.
    pub fn status(&self) -> (StatusCode, &'static str) {
        match self {
            Self::TooLargeRequest { .. } => (StatusCode::PERMANENT_FAILURE, "Request size more than 1024 bytes"),
            Self::InvalidUrl { .. } => (StatusCode::PERMANENT_FAILURE, READ_FAILURE_META),
            Self::UnsupportedScheme { .. } => (StatusCode::PERMANENT_FAILURE, "Unsupported protocol"),
            Self::Timeout => (StatusCode::TEMPORARY_FAILURE, "Request timeout"),
            Self::UnexpectedEof | Self::Io { .. } => (StatusCode::TEMPORARY_FAILURE, READ_FAILURE_META),
        }
    }
}

#[derive(Error, Debug)]
pub enum SendError {
    #[error("invalid meta: {reason}")]
    InvalidMeta { reason: String },

    #[error("body bytes must follow a status line")]
    BodyBeforeStatus,

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl SendError {
    pub fn invalid_meta<S: ToString>(str: S) -> Self {
        Self::InvalidMeta { reason: str.to_string() }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}
