//! Per-endpoint connection status records.
//!
//! The table is built once at pool construction and never grows or shrinks;
//! endpoints are re-attempted, never deleted. Each record sits behind its
//! own mutex, so concurrent connect/disconnect/error notifications for one
//! endpoint serialize on that record while other endpoints proceed
//! independently. No lock is ever held across an `.await`.

use std::collections::HashMap;

use parking_lot::Mutex;

/// Connection state of a single relay endpoint.
///
/// ```text
/// Disconnected --(attempt)--> Connecting --(ack)--> Connected
/// Connected --(drop)--> Disconnected
/// Connected --(error)--> Error
/// ```
///
/// Error and Disconnected are terminal until a caller re-initiates a
/// connect attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointStatus {
    Disconnected,
    Connecting,
    Connected,
    Error,
}

impl EndpointStatus {
    /// Status name for logs and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Error => "error",
        }
    }
}

/// Mutable state tracked per configured endpoint.
#[derive(Debug, Clone)]
pub struct EndpointRecord {
    pub status: EndpointStatus,
    /// Cumulative connect and query failures.
    pub error_count: u32,
    /// Unix seconds of the most recent successful connect.
    pub last_connected_at: Option<u64>,
}

impl Default for EndpointRecord {
    fn default() -> Self {
        Self {
            status: EndpointStatus::Disconnected,
            error_count: 0,
            last_connected_at: None,
        }
    }
}

/// Status table for the configured endpoint set.
pub struct EndpointTable {
    /// Configured URL order, fixed at construction.
    order: Vec<String>,
    records: HashMap<String, Mutex<EndpointRecord>>,
}

impl EndpointTable {
    /// Build a table with one Disconnected record per URL.
    pub fn new<I>(urls: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut order = Vec::new();
        let mut records = HashMap::new();
        for url in urls {
            if records
                .insert(url.clone(), Mutex::new(EndpointRecord::default()))
                .is_none()
            {
                order.push(url);
            }
        }
        Self { order, records }
    }

    /// Number of configured endpoints.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the table has no endpoints.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Whether the URL is part of the configured set.
    pub fn contains(&self, url: &str) -> bool {
        self.records.contains_key(url)
    }

    /// Configured URLs in configuration order.
    pub fn urls(&self) -> Vec<String> {
        self.order.clone()
    }

    /// Apply an update to one endpoint's record atomically.
    ///
    /// Returns `None` when the URL is not part of the configured set.
    pub fn apply<F, R>(&self, url: &str, f: F) -> Option<R>
    where
        F: FnOnce(&mut EndpointRecord) -> R,
    {
        self.records.get(url).map(|record| f(&mut record.lock()))
    }

    /// Transition an endpoint to Connecting.
    pub fn mark_connecting(&self, url: &str) {
        self.apply(url, |record| record.status = EndpointStatus::Connecting);
    }

    /// Transition an endpoint to Connected and stamp the connect time.
    pub fn mark_connected(&self, url: &str, now: u64) {
        self.apply(url, |record| {
            record.status = EndpointStatus::Connected;
            record.last_connected_at = Some(now);
        });
    }

    /// Transition an endpoint to Disconnected.
    pub fn mark_disconnected(&self, url: &str) {
        self.apply(url, |record| record.status = EndpointStatus::Disconnected);
    }

    /// Transition an endpoint to Error and count the failure.
    pub fn mark_error(&self, url: &str) {
        self.apply(url, |record| {
            record.status = EndpointStatus::Error;
            record.error_count += 1;
        });
    }

    /// Count a query failure without changing connection status.
    pub fn record_query_failure(&self, url: &str) {
        self.apply(url, |record| record.error_count += 1);
    }

    /// Current status of one endpoint.
    pub fn status(&self, url: &str) -> Option<EndpointStatus> {
        self.apply(url, |record| record.status)
    }

    /// Snapshot of one endpoint's record.
    pub fn record(&self, url: &str) -> Option<EndpointRecord> {
        self.apply(url, |record| record.clone())
    }

    /// URLs currently Connected, in configured order.
    pub fn connected_urls(&self) -> Vec<String> {
        self.order
            .iter()
            .filter(|url| self.status(url.as_str()) == Some(EndpointStatus::Connected))
            .cloned()
            .collect()
    }

    /// Snapshot of every record, in configured order.
    pub fn snapshot(&self) -> Vec<(String, EndpointRecord)> {
        self.order
            .iter()
            .filter_map(|url| self.record(url).map(|record| (url.clone(), record)))
            .collect()
    }
}
