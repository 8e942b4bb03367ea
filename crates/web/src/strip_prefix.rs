use async_trait::async_trait;
use micro_gemini::handler::{BoxError, Handler};
use micro_gemini::protocol::{Request, Response};

/// Mounts a handler under a sub-path.
///
/// The wrapped handler sees the request path with `prefix` removed, so it does not need to
/// know where it is mounted. A path not starting with `prefix` is passed through as is, and
/// so is every path when `prefix` is empty.
#[derive(Debug)]
pub struct StripPrefix<H> {
    prefix: String,
    inner: H,
}

impl<H: Handler> StripPrefix<H> {
    pub fn new(prefix: impl Into<String>, inner: H) -> Self {
        Self { prefix: prefix.into(), inner }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

pub fn strip_prefix<H: Handler>(prefix: impl Into<String>, inner: H) -> StripPrefix<H> {
    StripPrefix::new(prefix, inner)
}

#[async_trait]
impl<H: Handler> Handler for StripPrefix<H> {
    async fn serve(&self, response: &mut Response, request: &Request) -> Result<(), BoxError> {
        if self.prefix.is_empty() {
            return self.inner.serve(response, request).await;
        }

        match request.path().strip_prefix(self.prefix.as_str()) {
            Some(rest) => {
                let rewritten = request.with_path(rest);
                self.inner.serve(response, &rewritten).await
            }
            None => self.inner.serve(response, request).await,
        }
    }
}
