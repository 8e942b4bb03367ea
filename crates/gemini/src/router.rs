//! Path-prefix routing.
//!
//! A [`Router`] is an ordered list of `(prefix, handler)` routes. A request goes to the
//! first route, in registration order, whose prefix is a literal prefix of the request
//! path. An empty path is treated as `/`. When nothing matches, the fallback handler runs.
//!
//! Routers are assembled with a [`RouterBuilder`] and immutable once built, so a router
//! shared by many connections never needs locking.
//!
//! ```
//! use micro_gemini::handler::make_handler;
//! use micro_gemini::router::Router;
//!
//! let router = Router::builder()
//!     .handle_fn("/docs", |response, _request| Box::pin(async move {
//!         response.write(b"# Docs").await?;
//!         Ok(())
//!     }))
//!     .handle("/", make_handler(|response, _request| Box::pin(async move {
//!         response.write(b"# Home").await?;
//!         Ok(())
//!     })))
//!     .build();
//!
//! assert_eq!(router.route("/docs/intro").map(|route| route.prefix()), Some("/docs"));
//! assert_eq!(router.route("").map(|route| route.prefix()), Some("/"));
//! ```

use std::fmt;

use async_trait::async_trait;
use tracing::debug;

use crate::handler::{BoxError, Handler, HandlerFuture, make_handler};
use crate::protocol::{Request, Response, StatusCode};

/// One registered route.
pub struct Route {
    prefix: String,
    handler: Box<dyn Handler>,
}

impl Route {
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn handler(&self) -> &dyn Handler {
        self.handler.as_ref()
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route").field("prefix", &self.prefix).finish_non_exhaustive()
    }
}

/// Ordered prefix routing table, see the [module docs](self).
pub struct Router {
    routes: Vec<Route>,
    fallback: Box<dyn Handler>,
}

impl Router {
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    /// Finds the route serving `path`, if any.
    pub fn route(&self, path: &str) -> Option<&Route> {
        let path = if path.is_empty() { "/" } else { path };
        self.routes.iter().find(|route| path.starts_with(route.prefix.as_str()))
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router").field("routes", &self.routes).finish_non_exhaustive()
    }
}

#[async_trait]
impl Handler for Router {
    async fn serve(&self, response: &mut Response, request: &Request) -> Result<(), BoxError> {
        match self.route(request.path()) {
            Some(route) => {
                debug!(path = request.path(), prefix = route.prefix(), "matched route");
                route.handler.serve(response, request).await
            }
            None => {
                debug!(path = request.path(), "no route matched, using fallback");
                self.fallback.serve(response, request).await
            }
        }
    }
}

/// Handler answering `51 Not found`, the default router fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotFound;

#[async_trait]
impl Handler for NotFound {
    async fn serve(&self, response: &mut Response, _request: &Request) -> Result<(), BoxError> {
        response.set_status(StatusCode::NOT_FOUND, "Not found");
        response.send_status().await?;
        Ok(())
    }
}

pub struct RouterBuilder {
    routes: Vec<Route>,
    fallback: Box<dyn Handler>,
}

impl RouterBuilder {
    fn new() -> Self {
        Self { routes: Vec::new(), fallback: Box::new(NotFound) }
    }

    /// Appends a route; earlier routes take precedence over later ones.
    pub fn handle(mut self, prefix: impl Into<String>, handler: impl Handler + 'static) -> Self {
        self.routes.push(Route { prefix: prefix.into(), handler: Box::new(handler) });
        self
    }

    /// Appends a route served by a closure, see [`make_handler`].
    pub fn handle_fn<F>(self, prefix: impl Into<String>, f: F) -> Self
    where
        F: for<'a> Fn(&'a mut Response, &'a Request) -> HandlerFuture<'a> + Send + Sync + 'static,
    {
        self.handle(prefix, make_handler(f))
    }

    /// Replaces the handler used when no route matches.
    ///
    /// The default answers `51 Not found`.
    pub fn fallback(mut self, handler: impl Handler + 'static) -> Self {
        self.fallback = Box::new(handler);
        self
    }

    pub fn build(self) -> Router {
        Router { routes: self.routes, fallback: self.fallback }
    }
}

impl fmt::Debug for RouterBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterBuilder").field("routes", &self.routes).finish_non_exhaustive()
    }
}
