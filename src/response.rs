//! Outgoing HTTP response type, the [`IntoResponse`] conversion trait, and
//! errors recorded by handlers along the way.
//!
//! Recorded errors ride on the response back up the middleware chain so
//! that logging middleware can report them. They are dropped before the
//! response is written; clients never see them.

use std::fmt;

use bytes::Bytes;
use http::header::{HeaderName, HeaderValue};
use http::StatusCode;
use http_body_util::Full;
use tracing::warn;

// ── Recorded errors ───────────────────────────────────────────────────────────

/// Classification of an error recorded during request handling.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// Request body or parameters failed to bind.
    Bind,
    /// The response could not be rendered.
    Render,
    /// Internal-only. Surfaced in logs, never shown to the client.
    Private,
    /// Safe to expose to the client.
    Public,
}

/// An error a handler recorded on its response.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecordedError {
    pub kind: ErrorKind,
    pub message: String,
}

// ── Response ─────────────────────────────────────────────────────────────────

/// An outgoing HTTP response.
///
/// ```rust
/// use http::StatusCode;
/// use reqlog::{ErrorKind, Response};
///
/// Response::json(br#"{"id":1}"#.to_vec());
/// Response::text("hello");
/// Response::status(StatusCode::NO_CONTENT);
///
/// Response::builder()
///     .status(StatusCode::CREATED)
///     .header("location", "/users/42")
///     .json(br#"{"id":42}"#.to_vec());
///
/// Response::status(StatusCode::BAD_GATEWAY)
///     .record_error(ErrorKind::Private, "upstream reset the connection");
/// ```
pub struct Response {
    pub(crate) status: StatusCode,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: Option<Vec<u8>>,
    pub(crate) errors: Vec<RecordedError>,
}

impl Response {
    /// `200 OK` — `application/json`.
    pub fn json(body: Vec<u8>) -> Self {
        Self::builder().json(body)
    }

    /// `200 OK` — `text/plain; charset=utf-8`.
    pub fn text(body: impl Into<String>) -> Self {
        Self::builder().text(body)
    }

    /// Response with no body.
    pub fn status(code: StatusCode) -> Self {
        Self::builder().status(code).no_body()
    }

    /// Builder for responses that need a custom status or extra headers.
    pub fn builder() -> ResponseBuilder {
        ResponseBuilder { headers: Vec::new(), status: StatusCode::OK }
    }

    pub fn status_code(&self) -> StatusCode { self.status }

    /// Number of body bytes written, or `None` if no body was written at all.
    pub fn size(&self) -> Option<usize> {
        self.body.as_ref().map(Vec::len)
    }

    /// Errors recorded by handlers, in recording order.
    pub fn errors(&self) -> &[RecordedError] { &self.errors }

    /// Records an error for the logging middleware. The response itself is
    /// unchanged.
    pub fn record_error(mut self, kind: ErrorKind, err: impl fmt::Display) -> Self {
        self.errors.push(RecordedError { kind, message: err.to_string() });
        self
    }

    /// Shorthand for [`record_error`](Self::record_error) with [`ErrorKind::Private`].
    pub fn private_error(self, err: impl fmt::Display) -> Self {
        self.record_error(ErrorKind::Private, err)
    }

    /// Converts into the hyper response. Recorded errors are discarded here.
    pub(crate) fn into_inner(self) -> http::Response<Full<Bytes>> {
        let body = Bytes::from(self.body.unwrap_or_default());
        let mut res = http::Response::new(Full::new(body));
        *res.status_mut() = self.status;

        for (name, value) in self.headers {
            match (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(&value)) {
                (Ok(name), Ok(value)) => {
                    res.headers_mut().append(name, value);
                }
                _ => warn!(header = %name, "dropping invalid response header"),
            }
        }
        res
    }
}

// ── ResponseBuilder ───────────────────────────────────────────────────────────

/// Fluent builder for [`Response`].
///
/// Obtain via [`Response::builder()`]. Defaults to `200 OK`.
pub struct ResponseBuilder {
    headers: Vec<(String, String)>,
    status: StatusCode,
}

impl ResponseBuilder {
    pub fn status(mut self, code: StatusCode) -> Self {
        self.status = code;
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    /// Terminate with a JSON body (`application/json`).
    pub fn json(self, body: Vec<u8>) -> Response {
        self.finish("application/json", body)
    }

    /// Terminate with a plain-text body (`text/plain; charset=utf-8`).
    pub fn text(self, body: impl Into<String>) -> Response {
        self.finish("text/plain; charset=utf-8", body.into().into_bytes())
    }

    /// Terminate with no body (e.g. `204 No Content`, redirects).
    pub fn no_body(self) -> Response {
        Response { status: self.status, headers: self.headers, body: None, errors: Vec::new() }
    }

    fn finish(self, content_type: &str, body: Vec<u8>) -> Response {
        let mut headers = vec![("content-type".to_owned(), content_type.to_owned())];
        headers.extend(self.headers);
        Response { status: self.status, headers, body: Some(body), errors: Vec::new() }
    }
}

// ── IntoResponse ──────────────────────────────────────────────────────────────

/// Conversion into an HTTP [`Response`].
///
/// Implement on your own types to return them directly from handlers.
pub trait IntoResponse {
    fn into_response(self) -> Response;
}

impl IntoResponse for Response {
    fn into_response(self) -> Response { self }
}

impl IntoResponse for &'static str {
    fn into_response(self) -> Response { Response::text(self) }
}

impl IntoResponse for String {
    fn into_response(self) -> Response { Response::text(self) }
}

/// Return a status directly from a handler: `return StatusCode::NOT_FOUND`
impl IntoResponse for StatusCode {
    fn into_response(self) -> Response { Response::status(self) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_only_response_has_unknown_size() {
        assert_eq!(Response::status(StatusCode::NO_CONTENT).size(), None);
    }

    #[test]
    fn empty_body_is_a_written_zero() {
        assert_eq!(Response::text("").size(), Some(0));
        assert_eq!(Response::json(vec![b'x'; 500]).size(), Some(500));
    }

    #[test]
    fn recorded_errors_keep_order_and_kind() {
        let res = Response::status(StatusCode::BAD_REQUEST)
            .record_error(ErrorKind::Bind, "missing field `name`")
            .private_error("db: pool exhausted");
        assert_eq!(
            res.errors(),
            &[
                RecordedError { kind: ErrorKind::Bind, message: "missing field `name`".into() },
                RecordedError { kind: ErrorKind::Private, message: "db: pool exhausted".into() },
            ]
        );
    }

    #[test]
    fn into_inner_drops_invalid_headers() {
        let res = Response::builder()
            .status(StatusCode::CREATED)
            .header("location", "/users/99")
            .header("bad header", "x")
            .text("ok")
            .into_inner();
        assert_eq!(res.status(), StatusCode::CREATED);
        assert_eq!(res.headers()["location"], "/users/99");
        assert_eq!(res.headers()["content-type"], "text/plain; charset=utf-8");
        assert_eq!(res.headers().len(), 2);
    }
}
