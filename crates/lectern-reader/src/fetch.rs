//! Fetch cycles: multi-filter query aggregation and deduplication.
//!
//! A cycle runs an ordered set of filters across the connected relay
//! subset, accumulates everything in filter-execution order, converts the
//! wire events to plain [`ArticleEvent`] rows and deduplicates them by id.
//! One filter failing is absorbed; an empty connected subset is the single
//! fatal condition, surfaced to the caller before any query is attempted.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use lectern_core::ArticleEvent;
use metrics::counter;
use nostr_sdk::prelude::*;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::pool::RelayPool;

/// Parameters for the default filter set.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Look-back window for the primary filter.
    pub since_window: Duration,
    /// Result limit for the primary filter.
    pub primary_limit: usize,
    /// Result limit for each tag-scoped filter.
    pub tagged_limit: usize,
    /// Topic hashtags for the tagged filter.
    pub topic_tags: Vec<String>,
    /// Platform mention values for the mention filter.
    pub platform_mentions: Vec<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            since_window: Duration::from_secs(30 * 24 * 60 * 60),
            primary_limit: 100,
            tagged_limit: 50,
            topic_tags: vec![
                "longform".to_string(),
                "article".to_string(),
                "blog".to_string(),
            ],
            platform_mentions: vec!["highlighter".to_string(), "habla".to_string()],
        }
    }
}

/// The default filter set for one fetch cycle, OR-combined by the
/// aggregator: recent long-form documents, topic-tagged documents, and
/// documents mentioning the classified platforms.
pub fn default_filters(config: &FetchConfig) -> Vec<Filter> {
    let since = Timestamp::from(
        Timestamp::now()
            .as_secs()
            .saturating_sub(config.since_window.as_secs()),
    );

    vec![
        Filter::new()
            .kind(Kind::LongFormTextNote)
            .since(since)
            .limit(config.primary_limit),
        Filter::new()
            .kind(Kind::LongFormTextNote)
            .hashtags(config.topic_tags.clone())
            .limit(config.tagged_limit),
        Filter::new()
            .kind(Kind::LongFormTextNote)
            .custom_tags(
                SingleLetterTag::lowercase(Alphabet::P),
                config.platform_mentions.clone(),
            )
            .limit(config.tagged_limit),
    ]
}

/// Runs fetch cycles against a relay pool, one at a time.
pub struct Fetcher {
    pool: Arc<RelayPool>,
    in_flight: tokio::sync::Mutex<()>,
}

impl Fetcher {
    pub fn new(pool: Arc<RelayPool>) -> Self {
        Self {
            pool,
            in_flight: tokio::sync::Mutex::new(()),
        }
    }

    /// Run one full fetch cycle over the given filters.
    ///
    /// Rejects with [`Error::FetchInFlight`] while another cycle is running
    /// and with [`Error::NoConnectionsAvailable`] when the connected subset
    /// is empty. Every per-filter query settles before deduplication runs;
    /// the result keeps first-seen order with respect to the filter list.
    pub async fn fetch_all(&self, filters: &[Filter]) -> Result<Vec<ArticleEvent>> {
        let _cycle = self.in_flight.try_lock().map_err(|_| Error::FetchInFlight)?;

        self.pool.reconcile().await;
        let connected = self.pool.connected_relays();
        if connected.is_empty() {
            return Err(Error::NoConnectionsAvailable);
        }
        info!("fetching from {} connected relays", connected.len());

        let timeout = self.pool.config().query_timeout;
        let mut events: Vec<ArticleEvent> = Vec::new();
        for (index, filter) in filters.iter().enumerate() {
            let batch = self.pool.query(&connected, filter, timeout).await;
            debug!(filter = index, count = batch.len(), "filter settled");
            events.extend(batch.iter().map(article_event_from));
        }

        let unique = dedupe_by_id(events);
        counter!("fetch_cycles_total").increment(1);
        info!("fetch cycle complete: {} unique events", unique.len());
        Ok(unique)
    }
}

/// Reduce a wire event to a plain [`ArticleEvent`] row.
pub fn article_event_from(event: &Event) -> ArticleEvent {
    ArticleEvent {
        id: event.id.to_hex(),
        author: event
            .pubkey
            .to_bech32()
            .unwrap_or_else(|_| event.pubkey.to_hex()),
        created_at: event.created_at.as_secs(),
        kind: event.kind.as_u16(),
        content: event.content.clone(),
        tags: event
            .tags
            .iter()
            .map(|tag| tag.as_slice().iter().map(|s| s.to_string()).collect())
            .collect(),
    }
}

/// Deduplicate events strictly by id, keeping the first occurrence.
pub fn dedupe_by_id(events: Vec<ArticleEvent>) -> Vec<ArticleEvent> {
    let mut seen = HashSet::with_capacity(events.len());
    events
        .into_iter()
        .filter(|event| seen.insert(event.id.clone()))
        .collect()
}
