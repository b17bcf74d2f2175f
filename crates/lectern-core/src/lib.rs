//! Core types and text heuristics for the Lectern long-form reader.
//!
//! This crate is the pure half of the pipeline: it knows nothing about
//! relays or sockets. It provides:
//! - [`ArticleEvent`] - a plain-data representation of a long-form event
//! - Title/summary derivation from markdown content
//! - Heuristic provenance classification with confidence scoring
//! - [`Post`] assembly (derived metrics, topics, cover image)
//! - View-boundary parameters (sort mode, source filter)
//!
//! # Pipeline position
//!
//! ```text
//! ┌──────────────────┐
//! │  lectern-reader  │  relay pool + query aggregation
//! └────────┬─────────┘
//!          │  Vec<ArticleEvent>  (deduplicated, filter order)
//!          ▼
//! ┌──────────────────┐
//! │   build_posts    │  substantiveness floor, extraction, classification
//! └────────┬─────────┘
//!          │  Vec<Post>  (order preserved)
//!          ▼
//! ┌──────────────────┐
//! │    apply_view    │  explicit source filter + sort mode
//! └──────────────────┘
//! ```

pub mod classify;
pub mod event;
pub mod extract;
pub mod post;
pub mod view;

/// Nostr kind for long-form text documents (NIP-23).
pub const LONGFORM_KIND: u16 = 30023;

pub use classify::{classify, ClassifierConfig, Source};
pub use event::{tag_value, ArticleEvent};
pub use extract::{derive_summary, derive_title, read_minutes, truncate_chars, word_count};
pub use post::{build_post, build_posts, ExtractorConfig, Post};
pub use view::{apply_view, SortMode, SourceFilter};
