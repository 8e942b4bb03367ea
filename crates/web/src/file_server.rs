//! Serving files from a directory.
//!
//! The media type of a file is sniffed from its first [`SNIFF_LEN`] bytes. When sniffing finds
//! nothing, the file extension decides for gemtext and plain text; any other file falls back
//! to the response default, `text/gemini`.
//!
//! Once the success status has gone out, a read error can no longer be reported to the client:
//! the handler stops, logs, and returns the error, leaving the client with a truncated body.

use std::ffi::OsStr;
use std::io;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use micro_gemini::handler::{BoxError, Handler};
use micro_gemini::protocol::{DEFAULT_META, Request, Response, StatusCode};
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tokio_util::io::ReaderStream;
use tracing::{debug, error, warn};

/// How many leading bytes are inspected to guess the media type
pub const SNIFF_LEN: usize = 261;

/// The file served for a directory
pub const INDEX_FILE: &str = "index.gmi";

#[derive(Debug, Clone)]
pub struct FileServer {
    root: PathBuf,
}

impl FileServer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a raw url path below the root; `None` for paths escaping it.
    fn resolve(&self, raw_path: &str) -> Option<PathBuf> {
        let decoded = urlencoding::decode(raw_path).ok()?;
        let relative = Path::new(decoded.trim_start_matches('/'));

        let escapes = relative.components().any(|component| !matches!(component, Component::Normal(_) | Component::CurDir));
        if escapes {
            return None;
        }
        Some(self.root.join(relative))
    }
}

pub fn file_server(root: impl Into<PathBuf>) -> FileServer {
    FileServer::new(root)
}

#[async_trait]
impl Handler for FileServer {
    async fn serve(&self, response: &mut Response, request: &Request) -> Result<(), BoxError> {
        let Some(path) = self.resolve(request.path()) else {
            warn!(path = request.path(), "refused path outside the served directory");
            return not_found(response).await;
        };

        let (mut file, path) = match open(path).await {
            Ok(opened) => opened,
            Err((path, e)) => {
                warn!(cause = %e, path = ?path, "can't open file");
                return not_found(response).await;
            }
        };

        let mut head = Vec::with_capacity(SNIFF_LEN);
        if let Err(e) = (&mut file).take(SNIFF_LEN as u64).read_to_end(&mut head).await {
            error!(cause = %e, path = ?path, "can't read file");
            response.set_status(StatusCode::PERMANENT_FAILURE, "Could not read file");
            response.send_status().await?;
            return Ok(());
        }

        let media_type = media_type(&path, &head);
        debug!(path = ?path, media_type = media_type.as_str(), "serving file");
        response.set_status(StatusCode::SUCCESS, media_type);
        response.write_bytes(Bytes::from(head)).await?;

        let mut chunks = ReaderStream::new(file);
        while let Some(chunk) = chunks.next().await {
            match chunk {
                Ok(bytes) => {
                    response.write_bytes(bytes).await?;
                }
                Err(e) => {
                    error!(cause = %e, path = ?path, "can't read file after the status was sent");
                    return Err(e.into());
                }
            }
        }

        Ok(())
    }
}

async fn not_found(response: &mut Response) -> Result<(), BoxError> {
    response.set_status(StatusCode::PERMANENT_FAILURE, "File not found");
    response.send_status().await?;
    Ok(())
}

/// Opens `path`, or the index file when `path` is a directory.
async fn open(path: PathBuf) -> Result<(File, PathBuf), (PathBuf, io::Error)> {
    let metadata = match tokio::fs::metadata(&path).await {
        Ok(metadata) => metadata,
        Err(e) => return Err((path, e)),
    };

    let path = if metadata.is_dir() { path.join(INDEX_FILE) } else { path };
    match File::open(&path).await {
        Ok(file) => Ok((file, path)),
        Err(e) => Err((path, e)),
    }
}

fn media_type(path: &Path, head: &[u8]) -> String {
    if let Some(kind) = infer::get(head) {
        return kind.mime_type().to_string();
    }

    match path.extension().and_then(OsStr::to_str) {
        Some("gmi" | "gemini") => DEFAULT_META.to_string(),
        Some("txt") => mime::TEXT_PLAIN.to_string(),
        // the response turns an empty success meta into its default
        _ => String::new(),
    }
}
