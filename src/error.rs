//! Unified error type.

/// The error type returned by reqlog's fallible operations.
///
/// Application-level failures (404, 500, etc.) are expressed as
/// [`Response`](crate::Response) values, and handler errors worth logging are
/// recorded on the response with [`Response::record_error`](crate::Response::record_error).
/// This type only surfaces infrastructure failures: parsing the bind address,
/// binding the port, or accepting a connection.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid socket address `{addr}`: {source}")]
    InvalidAddress {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_keep_their_prefix() {
        let err = Error::from(std::io::Error::other("boom"));
        assert_eq!(err.to_string(), "io: boom");
    }

    #[test]
    fn invalid_address_names_the_input() {
        let source = "nope".parse::<std::net::SocketAddr>().unwrap_err();
        let err = Error::InvalidAddress { addr: "nope".into(), source };
        assert!(err.to_string().starts_with("invalid socket address `nope`"));
    }
}
