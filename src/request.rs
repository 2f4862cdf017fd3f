//! Incoming HTTP request type.

use std::collections::HashMap;
use std::net::SocketAddr;

use bytes::Bytes;
use http::{HeaderMap, Method};

/// An incoming HTTP request with its body fully buffered.
pub struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Bytes,
    pub(crate) params: HashMap<String, String>,
    pub(crate) remote_addr: Option<SocketAddr>,
}

impl Request {
    pub(crate) fn new(
        method: Method,
        path: impl Into<String>,
        headers: HeaderMap,
        body: Bytes,
        remote_addr: Option<SocketAddr>,
    ) -> Self {
        Self {
            method,
            path: path.into(),
            headers,
            body,
            params: HashMap::new(),
            remote_addr,
        }
    }

    pub fn method(&self) -> &Method { &self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// The TCP peer. `None` for requests not read off a socket.
    pub fn remote_addr(&self) -> Option<SocketAddr> { self.remote_addr }

    /// Case-insensitive header lookup. Values that are not visible ASCII are
    /// treated as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/users/{id}`, `req.param("id")` on `/users/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// The `Referer` header, or `""`.
    pub fn referer(&self) -> &str {
        self.header("referer").unwrap_or_default()
    }

    /// The `User-Agent` header, or `""`.
    pub fn user_agent(&self) -> &str {
        self.header("user-agent").unwrap_or_default()
    }

    /// Best guess at the originating client address.
    ///
    /// Services run behind a reverse proxy, so the peer is usually the proxy.
    /// Checked in order: the first entry of `X-Forwarded-For`, `X-Real-IP`,
    /// then the peer address. Returns `""` when none is known.
    pub fn client_ip(&self) -> String {
        let forwarded = self
            .header("x-forwarded-for")
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|ip| !ip.is_empty());
        if let Some(ip) = forwarded {
            return ip.to_owned();
        }

        if let Some(ip) = self.header("x-real-ip").map(str::trim).filter(|ip| !ip.is_empty()) {
            return ip.to_owned();
        }

        self.remote_addr
            .map(|addr| addr.ip().to_string())
            .unwrap_or_default()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Builds a request the way the server would, minus the socket.
    pub(crate) fn request(method: Method, path: &str, headers: &[(&str, &str)]) -> Request {
        let mut map = HeaderMap::new();
        for (name, value) in headers {
            map.append(
                http::header::HeaderName::from_bytes(name.as_bytes()).unwrap(),
                http::HeaderValue::from_str(value).unwrap(),
            );
        }
        Request::new(method, path, map, Bytes::new(), Some("10.0.0.5:41234".parse().unwrap()))
    }

    #[test]
    fn client_ip_falls_back_to_peer() {
        let req = request(Method::GET, "/", &[]);
        assert_eq!(req.client_ip(), "10.0.0.5");
    }

    #[test]
    fn client_ip_prefers_first_forwarded_entry() {
        let req = request(
            Method::GET,
            "/",
            &[("x-forwarded-for", " 203.0.113.7, 10.1.1.1"), ("x-real-ip", "198.51.100.2")],
        );
        assert_eq!(req.client_ip(), "203.0.113.7");
    }

    #[test]
    fn client_ip_uses_real_ip_without_forwarded_for() {
        let req = request(Method::GET, "/", &[("X-Real-IP", "198.51.100.2")]);
        assert_eq!(req.client_ip(), "198.51.100.2");
    }

    #[test]
    fn client_ip_is_empty_when_unknown() {
        let req = Request::new(Method::GET, "/", HeaderMap::new(), Bytes::new(), None);
        assert_eq!(req.client_ip(), "");
    }

    #[test]
    fn missing_referer_and_agent_are_empty() {
        let req = request(Method::GET, "/", &[("User-Agent", "curl/8.0")]);
        assert_eq!(req.referer(), "");
        assert_eq!(req.user_agent(), "curl/8.0");
    }
}
