use std::error::Error;
use std::fmt;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;

use crate::protocol::{Request, Response};

pub type BoxError = Box<dyn Error + Send + Sync>;

/// The future a closure handler returns, borrowing the response and request it was given.
pub type HandlerFuture<'a> = Pin<Box<dyn Future<Output = Result<(), BoxError>> + Send + 'a>>;

/// Anything able to answer a gemini request.
///
/// A handler emits its status and body through `response`. An `Err` is logged by the
/// connection, which also answers `40` if the handler had not sent a status yet.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn serve(&self, response: &mut Response, request: &Request) -> Result<(), BoxError>;
}

/// A [`Handler`] backed by a closure, see [`make_handler`].
pub struct HandlerFn<F> {
    f: F,
}

#[async_trait]
impl<F> Handler for HandlerFn<F>
where
    F: for<'a> Fn(&'a mut Response, &'a Request) -> HandlerFuture<'a> + Send + Sync,
{
    async fn serve(&self, response: &mut Response, request: &Request) -> Result<(), BoxError> {
        (self.f)(response, request).await
    }
}

impl<F> fmt::Debug for HandlerFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerFn").finish_non_exhaustive()
    }
}

/// Wraps a closure returning a boxed future into a [`Handler`].
///
/// ```
/// use micro_gemini::handler::make_handler;
/// use micro_gemini::protocol::StatusCode;
///
/// let handler = make_handler(|response, _request| {
///     Box::pin(async move {
///         response.set_status(StatusCode::SUCCESS, "text/gemini");
///         response.write(b"# Hello").await?;
///         Ok(())
///     })
/// });
/// # let _ = handler;
/// ```
pub fn make_handler<F>(f: F) -> HandlerFn<F>
where
    F: for<'a> Fn(&'a mut Response, &'a Request) -> HandlerFuture<'a> + Send + Sync,
{
    HandlerFn { f }
}

#[async_trait]
impl<H: Handler + ?Sized> Handler for Arc<H> {
    async fn serve(&self, response: &mut Response, request: &Request) -> Result<(), BoxError> {
        (**self).serve(response, request).await
    }
}

#[async_trait]
impl<H: Handler + ?Sized> Handler for Box<H> {
    async fn serve(&self, response: &mut Response, request: &Request) -> Result<(), BoxError> {
        (**self).serve(response, request).await
    }
}
