//! Middleware layer.
//!
//! Middleware wraps the rest of the chain: it sees the [`Request`] on the
//! way in and the [`Response`] on the way out. Cross-cutting concerns live
//! here. The built-in one is [`RequestLogger`], one structured log record
//! per request.
//!
//! ```rust,no_run
//! use reqlog::middleware::{self, Next, RequestLogger, TracingSink};
//! use reqlog::{Request, Response, Router};
//!
//! let app = Router::new()
//!     .layer(RequestLogger::new(TracingSink))
//!     .layer(middleware::from_fn(|req: Request, next: Next| async move {
//!         if req.header("authorization").is_none() {
//!             return Response::status(http::StatusCode::UNAUTHORIZED);
//!         }
//!         next.run(req).await
//!     }));
//! # let _ = app;
//! ```
//!
//! Layers run in registration order: the first one added is outermost and
//! observes everything the later ones do, including their latency.

mod fields;
mod hostname;
mod logger;
mod sink;

use std::future::Future;
use std::sync::Arc;

use crate::handler::{BoxFuture, BoxedHandler};
use crate::request::Request;
use crate::response::{IntoResponse, Response};

pub use fields::{Config, FieldKey, FieldMap, DEFAULT_TIME_FORMAT};
pub use hostname::{HostnameLookup, SystemHostname, UNKNOWN_HOSTNAME};
pub use logger::{latency_micros, AccessRecord, RequestLogger};
pub use sink::{Entry, LogSink, Severity, TracingSink};

/// A request interceptor.
///
/// Call [`Next::run`] to hand the request to the rest of the chain, or
/// return a response without calling it to short-circuit.
pub trait Middleware: Send + Sync + 'static {
    fn call(&self, req: Request, next: Next) -> BoxFuture;
}

pub(crate) type BoxedMiddleware = Arc<dyn Middleware>;

/// The remainder of the chain after the current middleware.
pub struct Next {
    stack: Arc<[BoxedMiddleware]>,
    index: usize,
    handler: BoxedHandler,
}

impl Next {
    pub(crate) fn new(stack: Arc<[BoxedMiddleware]>, handler: BoxedHandler) -> Self {
        Self { stack, index: 0, handler }
    }

    /// Runs the remaining middleware and the handler, returning its response.
    pub async fn run(mut self, req: Request) -> Response {
        match self.stack.get(self.index).cloned() {
            Some(middleware) => {
                self.index += 1;
                middleware.call(req, self).await
            }
            None => self.handler.call(req).await,
        }
    }
}

/// Adapts an async function or closure into [`Middleware`].
pub fn from_fn<F, Fut, R>(f: F) -> FromFn<F>
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    FromFn(f)
}

/// Middleware returned by [`from_fn`].
pub struct FromFn<F>(F);

impl<F, Fut, R> Middleware for FromFn<F>
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, req: Request, next: Next) -> BoxFuture {
        let fut = (self.0)(req, next);
        Box::pin(async move { fut.await.into_response() })
    }
}
