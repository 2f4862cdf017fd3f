//! # reqlog
//!
//! Structured request logging for small HTTP services behind a reverse proxy.
//!
//! The crate is a minimal hyper-based framework (radix routing, a middleware
//! chain, graceful shutdown) whose point is [`RequestLogger`]: one log record
//! per request, with latency, status, size and client details as structured
//! fields, plus an Apache-style access line as the message.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use http::{Method, StatusCode};
//! use reqlog::middleware::{RequestLogger, TracingSink};
//! use reqlog::{Request, Response, Router, Server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), reqlog::Error> {
//!     let app = Router::new()
//!         .on(Method::GET, "/users/{id}", get_user)
//!         .layer(RequestLogger::new(TracingSink));
//!
//!     Server::bind("0.0.0.0:3000").serve(app).await
//! }
//!
//! async fn get_user(req: Request) -> Response {
//!     match req.param("id") {
//!         Some("0") => Response::status(StatusCode::INTERNAL_SERVER_ERROR)
//!             .private_error("user 0 is reserved"),
//!         Some(id) => Response::json(format!(r#"{{"id":"{id}"}}"#).into_bytes()),
//!         None => Response::status(StatusCode::BAD_REQUEST),
//!     }
//! }
//! ```
//!
//! A `200` logs at info, `4xx` at warn, `5xx` at error. A response carrying
//! recorded errors logs at error with those errors as the message.

mod error;
mod handler;
mod request;
mod response;
mod router;
mod server;

pub mod middleware;

pub use error::Error;
pub use handler::{BoxFuture, Handler};
pub use middleware::{Middleware, Next, RequestLogger};
pub use request::Request;
pub use response::{ErrorKind, IntoResponse, RecordedError, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
