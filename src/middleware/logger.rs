//! Request-logging middleware.
//!
//! [`RequestLogger`] times the rest of the chain and emits exactly one
//! [`Entry`] per request:
//!
//! | Condition                          | Severity  | Message                       |
//! |------------------------------------|-----------|-------------------------------|
//! | handler recorded any error         | `Error`   | the private errors, one per line |
//! | status ≥ 500                       | `Error`   | access line                   |
//! | status 400–499                     | `Warning` | access line                   |
//! | anything else                      | `Info`    | access line                   |
//!
//! The access line follows Apache's combined format with a latency suffix:
//!
//! ```text
//! 10.0.0.5 - web-1 [10/Oct/2000:13:55:36 -0700] "GET /widgets" 200 42 "http://ref.example" "TestAgent/1.0" (2500ms)
//! ```
//!
//! The suffix reads `ms` but carries microseconds, matching the `latency`
//! field. Downstream parsers depend on this exact shape.

use std::fmt::{self, Write as _};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local, TimeZone};
use serde_json::{Map, Value};
use tokio::time::Instant;
use tracing::warn;

use super::fields::{Config, FieldKey, FieldMap, DEFAULT_TIME_FORMAT};
use super::hostname::{self, HostnameLookup, SystemHostname};
use super::sink::{Entry, LogSink, Severity};
use super::{Middleware, Next};
use crate::handler::BoxFuture;
use crate::request::Request;
use crate::response::{ErrorKind, RecordedError, Response};

/// Elapsed time in whole microseconds, rounded up. Never under-reports.
pub fn latency_micros(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_nanos().div_ceil(1_000)).unwrap_or(u64::MAX)
}

/// Renders `now` with `pattern`, or with [`DEFAULT_TIME_FORMAT`] if chrono
/// refuses the pattern. Some specifiers parse but cannot format (`%#z`).
fn timestamp<Tz>(now: &DateTime<Tz>, pattern: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let mut out = String::new();
    if write!(out, "{}", now.format(pattern)).is_ok() {
        return out;
    }
    out.clear();
    let _ = write!(out, "{}", now.format(DEFAULT_TIME_FORMAT));
    out
}

fn formats(pattern: &str) -> bool {
    write!(String::new(), "{}", Local::now().format(pattern)).is_ok()
}

/// Bytes written, with "nothing written" reported as zero.
fn data_length(size: Option<usize>) -> u64 {
    size.map_or(0, |n| n as u64)
}

// ── AccessRecord ──────────────────────────────────────────────────────────────

/// What is known about one request once the chain has returned.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccessRecord {
    pub hostname: String,
    pub status: u16,
    pub latency_us: u64,
    pub client_ip: String,
    pub method: String,
    pub path: String,
    pub referer: String,
    pub data_length: u64,
    pub user_agent: String,
}

impl AccessRecord {
    /// Structured fields keyed by `labels`. Status, latency and length are
    /// numbers; everything else is a string. If two keys share a label the
    /// later key in [`FieldKey::ALL`] wins.
    pub fn fields(&self, labels: &FieldMap) -> Map<String, Value> {
        let mut fields = Map::new();
        for key in FieldKey::ALL {
            let value = match key {
                FieldKey::Hostname   => Value::from(self.hostname.as_str()),
                FieldKey::StatusCode => Value::from(self.status),
                FieldKey::Latency    => Value::from(self.latency_us),
                FieldKey::ClientIp   => Value::from(self.client_ip.as_str()),
                FieldKey::Method     => Value::from(self.method.as_str()),
                FieldKey::Path       => Value::from(self.path.as_str()),
                FieldKey::Referrer   => Value::from(self.referer.as_str()),
                FieldKey::DataLength => Value::from(self.data_length),
                FieldKey::UserAgent  => Value::from(self.user_agent.as_str()),
            };
            fields.insert(labels.label(key).to_owned(), value);
        }
        fields
    }

    /// The human-readable access line, stamped with `timestamp`.
    pub fn access_line(&self, timestamp: &str) -> String {
        format!(
            "{} - {} [{}] \"{} {}\" {} {} \"{}\" \"{}\" ({}ms)",
            self.client_ip,
            self.hostname,
            timestamp,
            self.method,
            self.path,
            self.status,
            self.data_length,
            self.referer,
            self.user_agent,
            self.latency_us,
        )
    }

    pub fn severity(&self, errors: &[RecordedError]) -> Severity {
        if !errors.is_empty() {
            return Severity::Error;
        }
        match self.status {
            500.. => Severity::Error,
            400.. => Severity::Warning,
            _     => Severity::Info,
        }
    }

    /// Builds the entry for this request, stamped with the current local time.
    pub fn entry(&self, config: &Config, errors: &[RecordedError]) -> Entry {
        self.entry_at(config, errors, &Local::now())
    }

    /// Like [`entry`](Self::entry) with an explicit clock reading. `now` only
    /// shows up when the message is the access line.
    pub fn entry_at<Tz>(&self, config: &Config, errors: &[RecordedError], now: &DateTime<Tz>) -> Entry
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let message = if errors.is_empty() {
            self.access_line(&timestamp(now, &config.time_format))
        } else {
            private_errors(errors)
        };

        Entry {
            severity: self.severity(errors),
            message,
            fields: self.fields(&config.field_map),
        }
    }
}

/// Private errors only, numbered in recording order. Every line, the last
/// included, ends in `\n`.
fn private_errors(errors: &[RecordedError]) -> String {
    errors
        .iter()
        .filter(|e| e.kind == ErrorKind::Private)
        .enumerate()
        .fold(String::new(), |mut out, (i, e)| {
            let _ = writeln!(out, "Error #{:02}: {}", i + 1, e.message);
            out
        })
}

// ── RequestLogger ─────────────────────────────────────────────────────────────

/// Middleware that logs one structured record per request.
///
/// ```rust,no_run
/// use reqlog::middleware::{Config, FieldKey, FieldMap, RequestLogger, TracingSink};
///
/// let config = Config {
///     field_map: FieldMap::default().with(FieldKey::StatusCode, "http_status"),
///     ..Config::default()
/// };
/// let logger = RequestLogger::with_config(TracingSink, config);
/// # let _ = logger;
/// ```
///
/// Cloning is cheap; clones share the sink and configuration.
#[derive(Clone)]
pub struct RequestLogger {
    config: Arc<Config>,
    sink: Arc<dyn LogSink>,
    hostname: Arc<dyn HostnameLookup>,
}

impl RequestLogger {
    /// Logs to `sink` with [`Config::default`].
    pub fn new(sink: impl LogSink) -> Self {
        Self::with_config(sink, Config::default())
    }

    /// A `time_format` chrono cannot format with is replaced by
    /// [`DEFAULT_TIME_FORMAT`].
    pub fn with_config(sink: impl LogSink, mut config: Config) -> Self {
        if !formats(&config.time_format) {
            warn!(pattern = %config.time_format, "invalid access log time format, using default");
            config.time_format = DEFAULT_TIME_FORMAT.to_owned();
        }

        Self {
            config: Arc::new(config),
            sink: Arc::new(sink),
            hostname: Arc::new(SystemHostname),
        }
    }

    /// Replaces the hostname source. Defaults to [`SystemHostname`].
    pub fn hostname_lookup(mut self, lookup: impl HostnameLookup) -> Self {
        self.hostname = Arc::new(lookup);
        self
    }

    pub fn config(&self) -> &Config { &self.config }

    async fn log(self, req: Request, next: Next) -> Response {
        let start = Instant::now();

        // The handler consumes the request, so take what the record needs first.
        let method = req.method().to_string();
        let path = req.path().to_owned();
        let client_ip = req.client_ip();
        let referer = req.referer().to_owned();
        let user_agent = req.user_agent().to_owned();

        let res = next.run(req).await;

        let record = AccessRecord {
            latency_us: latency_micros(start.elapsed()),
            status: res.status_code().as_u16(),
            data_length: data_length(res.size()),
            hostname: hostname::resolve(self.hostname.as_ref()),
            client_ip,
            method,
            path,
            referer,
            user_agent,
        };
        self.sink.emit(record.entry(&self.config, res.errors()));
        res
    }
}

impl Middleware for RequestLogger {
    fn call(&self, req: Request, next: Next) -> BoxFuture {
        Box::pin(self.clone().log(req, next))
    }
}
