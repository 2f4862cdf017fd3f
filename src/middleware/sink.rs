//! Where access records go.

use serde_json::{Map, Value};
use tracing::{error, info, warn};

/// Severity of an access record.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// One log record: a message plus structured fields keyed by the configured
/// labels.
#[derive(Clone, Debug, PartialEq)]
pub struct Entry {
    pub severity: Severity,
    pub message: String,
    pub fields: Map<String, Value>,
}

/// Receives one [`Entry`] per request.
///
/// Implementations must not block for long; `emit` runs on the request task.
pub trait LogSink: Send + Sync + 'static {
    fn emit(&self, entry: Entry);
}

/// Emits through `tracing` under the `reqlog::access` target.
///
/// `tracing` field names are fixed at compile time and the labels here are
/// configurable, so the fields travel as one JSON object in a `fields` value.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn emit(&self, entry: Entry) {
        let fields = Value::Object(entry.fields);
        match entry.severity {
            Severity::Info    => info!(target: "reqlog::access", fields = %fields, "{}", entry.message),
            Severity::Warning => warn!(target: "reqlog::access", fields = %fields, "{}", entry.message),
            Severity::Error   => error!(target: "reqlog::access", fields = %fields, "{}", entry.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use serde_json::json;
    use tracing_subscriber::fmt::MakeWriter;

    use super::*;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> { Ok(()) }
    }

    impl<'a> MakeWriter<'a> for Buffer {
        type Writer = Buffer;
        fn make_writer(&'a self) -> Self::Writer { self.clone() }
    }

    #[test]
    fn tracing_sink_writes_level_message_and_fields() {
        let buffer = Buffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(buffer.clone())
            .with_ansi(false)
            .finish();

        let Value::Object(fields) = json!({ "statusCode": 404, "path": "/missing" }) else {
            unreachable!()
        };
        tracing::subscriber::with_default(subscriber, || {
            TracingSink.emit(Entry {
                severity: Severity::Warning,
                message: "GET /missing".into(),
                fields,
            });
        });

        let out = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert!(out.contains("WARN"), "{out}");
        assert!(out.contains("reqlog::access"), "{out}");
        assert!(out.contains("GET /missing"), "{out}");
        assert!(out.contains(r#""statusCode":404"#), "{out}");
    }
}
