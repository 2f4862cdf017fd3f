//! Output labels and configuration for [`RequestLogger`](super::RequestLogger).

use serde::{Deserialize, Serialize};

/// `10/Oct/2000:13:55:36 -0700`, the Common Log Format timestamp.
pub const DEFAULT_TIME_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";

/// The attributes recorded for every request.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum FieldKey {
    Hostname,
    StatusCode,
    Latency,
    ClientIp,
    Method,
    Path,
    Referrer,
    DataLength,
    UserAgent,
}

impl FieldKey {
    /// Every key, in the order fields are attached to an entry.
    pub const ALL: [FieldKey; 9] = [
        Self::Hostname,
        Self::StatusCode,
        Self::Latency,
        Self::ClientIp,
        Self::Method,
        Self::Path,
        Self::Referrer,
        Self::DataLength,
        Self::UserAgent,
    ];
}

/// Label emitted for each [`FieldKey`].
///
/// A plain record, so every key always has a label. Deserializes from a map
/// with snake_case keys; missing entries keep their default label:
///
/// ```rust
/// use reqlog::middleware::{FieldKey, FieldMap};
///
/// let map: FieldMap = serde_json::from_str(r#"{"status_code":"http_status"}"#).unwrap();
/// assert_eq!(map.label(FieldKey::StatusCode), "http_status");
/// assert_eq!(map.label(FieldKey::Path), "path");
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMap {
    pub hostname: String,
    pub status_code: String,
    pub latency: String,
    pub client_ip: String,
    pub method: String,
    pub path: String,
    pub referrer: String,
    pub data_length: String,
    pub user_agent: String,
}

impl Default for FieldMap {
    fn default() -> Self {
        Self {
            hostname: "hostname".into(),
            status_code: "statusCode".into(),
            latency: "latency".into(),
            client_ip: "ClientIP".into(),
            method: "method".into(),
            path: "path".into(),
            referrer: "referer".into(),
            data_length: "dataLength".into(),
            user_agent: "userAgent".into(),
        }
    }
}

impl FieldMap {
    pub fn label(&self, key: FieldKey) -> &str {
        match key {
            FieldKey::Hostname   => &self.hostname,
            FieldKey::StatusCode => &self.status_code,
            FieldKey::Latency    => &self.latency,
            FieldKey::ClientIp   => &self.client_ip,
            FieldKey::Method     => &self.method,
            FieldKey::Path       => &self.path,
            FieldKey::Referrer   => &self.referrer,
            FieldKey::DataLength => &self.data_length,
            FieldKey::UserAgent  => &self.user_agent,
        }
    }

    /// Replaces the label for `key`. Returns `self` for chaining.
    pub fn with(mut self, key: FieldKey, label: impl Into<String>) -> Self {
        let slot = match key {
            FieldKey::Hostname   => &mut self.hostname,
            FieldKey::StatusCode => &mut self.status_code,
            FieldKey::Latency    => &mut self.latency,
            FieldKey::ClientIp   => &mut self.client_ip,
            FieldKey::Method     => &mut self.method,
            FieldKey::Path       => &mut self.path,
            FieldKey::Referrer   => &mut self.referrer,
            FieldKey::DataLength => &mut self.data_length,
            FieldKey::UserAgent  => &mut self.user_agent,
        };
        *slot = label.into();
        self
    }
}

/// Logger configuration. Build once at startup and hand it to
/// [`RequestLogger::with_config`](super::RequestLogger::with_config).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// strftime pattern for the timestamp in the access line. Structured
    /// fields are unaffected.
    pub time_format: String,
    pub field_map: FieldMap,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            time_format: DEFAULT_TIME_FORMAT.to_owned(),
            field_map: FieldMap::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_labels() {
        let map = FieldMap::default();
        let labels: Vec<&str> = FieldKey::ALL.iter().map(|&k| map.label(k)).collect();
        assert_eq!(
            labels,
            [
                "hostname", "statusCode", "latency", "ClientIP", "method",
                "path", "referer", "dataLength", "userAgent",
            ]
        );
    }

    #[test]
    fn with_replaces_only_the_given_key() {
        let map = FieldMap::default().with(FieldKey::StatusCode, "http_status");
        assert_eq!(map.label(FieldKey::StatusCode), "http_status");
        assert_eq!(map.label(FieldKey::Latency), "latency");
    }

    #[test]
    fn config_deserializes_partially() {
        let cfg: Config = serde_json::from_str(
            r#"{"time_format":"%Y-%m-%dT%H:%M:%S","field_map":{"client_ip":"client"}}"#,
        )
        .unwrap();
        assert_eq!(cfg.time_format, "%Y-%m-%dT%H:%M:%S");
        assert_eq!(cfg.field_map.label(FieldKey::ClientIp), "client");
        assert_eq!(cfg.field_map.label(FieldKey::Hostname), "hostname");

        let empty: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, Config::default());
    }
}
