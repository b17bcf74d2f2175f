//! Relay connection pool.
//!
//! Owns the SDK client and the per-endpoint status table. Connect attempts
//! run as independent, timeout-bounded futures so one slow relay never
//! stalls another; a failed endpoint is reflected in its status record and
//! never surfaces as a pool-level error. Queries fan out to the connected
//! subset with a partial-result policy: endpoints that fail or time out
//! contribute zero events for that call.
//!
//! The SDK reports connection state asynchronously; [`RelayPool::reconcile`]
//! folds that state back into the endpoint table, applying each transition
//! atomically to the owning record.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use futures_util::future::join_all;
use metrics::{counter, gauge};
use nostr_sdk::prelude::*;
use nostr_sdk::RelayStatus;
use tracing::{debug, info, warn};

use crate::endpoint::{EndpointStatus, EndpointTable};
use crate::error::{Error, Result};

/// Default seed relay set.
pub const DEFAULT_RELAYS: &[&str] = &[
    "wss://relay.damus.io",
    "wss://nos.lol",
    "wss://relay.primal.net",
    "wss://relay.snort.social",
    "wss://nostr.wine",
    "wss://relay.nostr.band",
    "wss://nostr-pub.wellorder.net",
    "wss://offchain.pub",
    "wss://relay.current.fyi",
    "wss://tigs.nostr1.com",
];

/// Timeouts for pool operations.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Bound on each endpoint's connect attempt.
    pub connect_timeout: Duration,
    /// Bound on each per-endpoint query.
    pub query_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            query_timeout: Duration::from_secs(10),
        }
    }
}

/// Outcome of an [`RelayPool::initialize`] pass.
#[derive(Debug, Clone, Copy)]
pub struct ConnectSummary {
    pub attempted: usize,
    pub connected: usize,
}

/// Connection manager for a fixed set of relay endpoints.
pub struct RelayPool {
    client: Client,
    endpoints: EndpointTable,
    config: PoolConfig,
}

impl RelayPool {
    /// Build a pool for the given relay URLs.
    ///
    /// URLs are normalized up front; an unparseable URL is a configuration
    /// error. The client signs nothing but carries an ephemeral keypair so
    /// relays requiring NIP-42 auth can be satisfied.
    pub fn new<I, S>(urls: I, config: PoolConfig) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keys = Keys::generate();
        let client = Client::builder().signer(keys).build();
        client.automatic_authentication(true);

        let mut normalized = Vec::new();
        for url in urls {
            let parsed = RelayUrl::parse(url.as_ref()).map_err(|e| Error::InvalidUrl {
                url: url.as_ref().to_string(),
                reason: e.to_string(),
            })?;
            normalized.push(parsed.to_string());
        }

        Ok(Self {
            client,
            endpoints: EndpointTable::new(normalized),
            config,
        })
    }

    /// The endpoint status table.
    pub fn endpoints(&self) -> &EndpointTable {
        &self.endpoints
    }

    /// Pool timeouts.
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// URLs currently connected, in configured order.
    pub fn connected_relays(&self) -> Vec<String> {
        self.endpoints.connected_urls()
    }

    /// Start one connect attempt per endpoint concurrently and wait for all
    /// of them to settle.
    ///
    /// Each attempt is bounded by the configured connect timeout. After this
    /// returns, no endpoint remains Connecting. Failures are endpoint state,
    /// not errors; no retry happens unless [`RelayPool::reconnect`] is
    /// called.
    pub async fn initialize(&self) -> ConnectSummary {
        let urls = self.endpoints.urls();
        info!("connecting to {} relays", urls.len());

        let results = join_all(urls.iter().map(|url| self.connect_endpoint(url))).await;
        let connected = results.iter().filter(|r| r.is_ok()).count();

        gauge!("relay_connections").set(connected as f64);
        info!("connected to {}/{} relays", connected, urls.len());

        ConnectSummary {
            attempted: urls.len(),
            connected,
        }
    }

    /// Re-run the connect attempt for a single endpoint.
    pub async fn reconnect(&self, url: &str) -> Result<()> {
        let parsed = RelayUrl::parse(url).map_err(|e| Error::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        let url = parsed.to_string();
        if !self.endpoints.contains(&url) {
            return Err(Error::UnknownEndpoint { url });
        }
        self.connect_endpoint(&url).await
    }

    /// One bounded connect attempt for one endpoint.
    async fn connect_endpoint(&self, url: &str) -> Result<()> {
        self.endpoints.mark_connecting(url);

        let attempt = async {
            self.client
                .add_relay(url)
                .await
                .map_err(|e| Error::ConnectFailed {
                    url: url.to_string(),
                    reason: e.to_string(),
                })?;
            self.client
                .connect_relay(url)
                .await
                .map_err(|e| Error::ConnectFailed {
                    url: url.to_string(),
                    reason: e.to_string(),
                })?;
            self.await_ack(url).await
        };

        match tokio::time::timeout(self.config.connect_timeout, attempt).await {
            Ok(Ok(())) => {
                self.endpoints.mark_connected(url, unix_now());
                counter!("relay_connects_total").increment(1);
                debug!(relay = %url, "relay connected");
                Ok(())
            }
            Ok(Err(e)) => {
                self.endpoints.mark_error(url);
                counter!("relay_connect_failures_total").increment(1);
                warn!(relay = %url, "connect failed: {e}");
                Err(e)
            }
            Err(_) => {
                self.endpoints.mark_error(url);
                counter!("relay_connect_failures_total").increment(1);
                let timeout_ms = self.config.connect_timeout.as_millis() as u64;
                warn!(relay = %url, timeout_ms, "connect timed out");
                Err(Error::ConnectTimeout {
                    url: url.to_string(),
                    timeout_ms,
                })
            }
        }
    }

    /// Wait for the SDK to report the relay as connected.
    ///
    /// `connect_relay` returns before the WebSocket is actually up, so the
    /// real signal is the per-relay status. Terminated means the SDK gave
    /// up; anything else is still in progress. Cancelled by the caller's
    /// timeout.
    async fn await_ack(&self, url: &str) -> Result<()> {
        loop {
            let relays = self.client.relays().await;
            for (relay_url, relay) in &relays {
                if relay_url.to_string() != url {
                    continue;
                }
                match relay.status() {
                    RelayStatus::Connected => return Ok(()),
                    RelayStatus::Terminated => {
                        return Err(Error::ConnectFailed {
                            url: url.to_string(),
                            reason: "connection terminated".to_string(),
                        });
                    }
                    _ => {}
                }
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }

    /// Fold the SDK's asynchronous connection state back into the endpoint
    /// table.
    ///
    /// A relay that dropped moves Connected -> Disconnected; a terminated
    /// one moves Connected -> Error with its failure counted. Records in the
    /// middle of a connect attempt are left to the attempt. Each update is
    /// applied atomically to the owning record.
    pub async fn reconcile(&self) {
        let relays = self.client.relays().await;
        for (relay_url, relay) in relays {
            let url = relay_url.to_string();
            let status = relay.status();
            let transition = self.endpoints.apply(&url, |record| match status {
                RelayStatus::Connected => {
                    if record.status == EndpointStatus::Disconnected
                        || record.status == EndpointStatus::Error
                    {
                        record.status = EndpointStatus::Connected;
                        record.last_connected_at = Some(unix_now());
                        Some("connected")
                    } else {
                        None
                    }
                }
                RelayStatus::Disconnected => {
                    if record.status == EndpointStatus::Connected {
                        record.status = EndpointStatus::Disconnected;
                        Some("disconnected")
                    } else {
                        None
                    }
                }
                RelayStatus::Terminated => {
                    if record.status == EndpointStatus::Connected {
                        record.status = EndpointStatus::Error;
                        record.error_count += 1;
                        Some("terminated")
                    } else {
                        None
                    }
                }
                _ => None,
            });

            if let Some(Some(change)) = transition {
                debug!(relay = %url, change, "relay status reconciled");
            }
        }

        gauge!("relay_connections").set(self.endpoints.connected_urls().len() as f64);
    }

    /// Periodically reconcile in the background.
    pub fn spawn_monitor(self: &Arc<Self>, interval: Duration) -> tokio::task::JoinHandle<()> {
        let pool = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;
                pool.reconcile().await;
            }
        })
    }

    /// Send a filter to every relay in the subset in parallel and collect
    /// whatever comes back within the timeout.
    ///
    /// An endpoint that errors or times out contributes zero events and has
    /// the failure counted against it; the other endpoints are unaffected.
    pub async fn query(&self, relays: &[String], filter: &Filter, timeout: Duration) -> Vec<Event> {
        let fetches = relays.iter().map(|url| async move {
            let fetch = self
                .client
                .fetch_events_from(vec![url.as_str()], filter.clone(), timeout);
            match tokio::time::timeout(timeout, fetch).await {
                Ok(Ok(events)) => {
                    let events: Vec<Event> = events.into_iter().collect();
                    debug!(relay = %url, count = events.len(), "query returned");
                    counter!("relay_query_events_total").increment(events.len() as u64);
                    events
                }
                Ok(Err(e)) => {
                    warn!(relay = %url, "query failed: {e}");
                    self.endpoints.record_query_failure(url);
                    counter!("relay_query_failures_total").increment(1);
                    Vec::new()
                }
                Err(_) => {
                    warn!(relay = %url, "query timed out");
                    self.endpoints.record_query_failure(url);
                    counter!("relay_query_failures_total").increment(1);
                    Vec::new()
                }
            }
        });

        join_all(fetches).await.into_iter().flatten().collect()
    }

    /// Disconnect every relay (shutdown path).
    pub async fn shutdown(&self) {
        self.client.disconnect().await;
    }
}

/// Current unix time in seconds.
fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_secs()
}
