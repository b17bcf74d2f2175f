//! Lectern relay pipeline.
//!
//! This crate is the networked half of the reader: it supervises
//! connections to a fixed set of Nostr relays, fans filtered queries out
//! across the connected subset, and hands deduplicated plain-data events to
//! `lectern-core` for extraction and classification.
//!
//! # Modules
//!
//! - [`endpoint`] - per-endpoint status records (the connection state table)
//! - [`pool`] - the relay connection manager
//! - [`fetch`] - fetch cycles: filter fan-out, aggregation, deduplication
//! - [`metrics`] - Prometheus recorder and `/metrics` endpoint helpers
//!
//! # Failure model
//!
//! Endpoint-level failures are state transitions, not errors: a relay that
//! cannot connect ends up marked Error in the endpoint table and everything
//! else proceeds. A fetch cycle fails only when the connected subset is
//! empty.

pub mod endpoint;
pub mod error;
pub mod fetch;
pub mod metrics;
pub mod pool;

pub use endpoint::{EndpointRecord, EndpointStatus, EndpointTable};
pub use error::{Error, Result};
pub use fetch::{article_event_from, dedupe_by_id, default_filters, FetchConfig, Fetcher};
pub use pool::{ConnectSummary, PoolConfig, RelayPool, DEFAULT_RELAYS};
