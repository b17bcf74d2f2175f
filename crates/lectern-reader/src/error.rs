//! Error types for the relay pipeline.

use thiserror::Error;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while connecting to relays and fetching events.
///
/// Endpoint-local connect failures are reflected in endpoint status and do
/// not escape `RelayPool::initialize`; [`Error::NoConnectionsAvailable`] is
/// the only condition a fetch cycle surfaces to its caller.
#[derive(Error, Debug)]
pub enum Error {
    /// A connect attempt exceeded its timeout.
    #[error("connection to {url} timed out after {timeout_ms}ms")]
    ConnectTimeout { url: String, timeout_ms: u64 },

    /// A connect attempt failed at the transport or handshake level.
    #[error("connection to {url} failed: {reason}")]
    ConnectFailed { url: String, reason: String },

    /// No relay in the pool is currently connected; the fetch cycle is
    /// aborted without a partial attempt. Retryable.
    #[error("no connected relays available")]
    NoConnectionsAvailable,

    /// A fetch cycle is already running for this fetcher.
    #[error("a fetch cycle is already in flight")]
    FetchInFlight,

    /// A configured relay URL could not be parsed.
    #[error("invalid relay URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The endpoint is not part of the configured set.
    #[error("unknown relay endpoint '{url}'")]
    UnknownEndpoint { url: String },

    /// Nostr SDK error.
    #[error("nostr SDK error: {0}")]
    NostrSdk(#[from] nostr_sdk::client::Error),
}
