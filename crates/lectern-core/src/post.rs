//! Canonical document records built from deduplicated events.

use serde::Serialize;

use crate::classify::{classify, ClassifierConfig, Source};
use crate::event::ArticleEvent;
use crate::extract::{derive_summary, derive_title, read_minutes, word_count};
use crate::LONGFORM_KIND;

/// Knobs for post extraction.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Minimum content length (characters) for an event to count as a
    /// genuine long-form document.
    pub min_content_chars: usize,
    /// Maximum derived title length (characters).
    pub title_max: usize,
    /// Maximum derived summary length (characters).
    pub summary_max: usize,
    /// Provenance classifier configuration.
    pub classifier: ClassifierConfig,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            min_content_chars: 100,
            title_max: 60,
            summary_max: 200,
            classifier: ClassifierConfig::default(),
        }
    }
}

/// A canonical long-form document record.
///
/// Exactly one post exists per unique event id that passed the
/// substantiveness floor. Immutable once constructed.
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    /// Event id (hex).
    pub id: String,
    /// Author display string (truncated npub).
    pub author: String,
    /// Explicit or derived title.
    pub title: String,
    /// Explicit or derived summary.
    pub summary: String,
    /// Raw markdown content.
    pub content: String,
    /// Publication time (unix seconds).
    pub published_at: u64,
    /// Topic tags (`t`), in tag order.
    pub topics: Vec<String>,
    /// Inferred authoring platform.
    pub source: Source,
    /// Classification confidence in [0, 1].
    pub source_confidence: f64,
    /// Whitespace-delimited word count of the raw content.
    pub word_count: usize,
    /// Estimated read time in minutes (200 wpm, rounded up).
    pub read_minutes: u32,
    /// Cover image URL, when tagged.
    pub image: Option<String>,
}

/// Build a post from a single event.
///
/// Returns `None` for events of the wrong kind or with content below the
/// substantiveness floor; that is filtering, not an error.
pub fn build_post(event: &ArticleEvent, config: &ExtractorConfig) -> Option<Post> {
    if event.kind != LONGFORM_KIND {
        return None;
    }
    if event.content.chars().count() < config.min_content_chars {
        return None;
    }

    let title = match event.tag_value("title") {
        Some(tag) => tag.to_string(),
        None => derive_title(&event.content, config.title_max),
    };
    let summary = match event.tag_value("summary") {
        Some(tag) => tag.to_string(),
        None => derive_summary(&event.content, config.summary_max),
    };
    let (source, source_confidence) = classify(&event.content, &event.tags, &config.classifier);
    let words = word_count(&event.content);

    Some(Post {
        id: event.id.clone(),
        author: display_author(&event.author),
        title,
        summary,
        content: event.content.clone(),
        published_at: event.published_at(),
        topics: event.tag_values("t").iter().map(|t| t.to_string()).collect(),
        source,
        source_confidence,
        word_count: words,
        read_minutes: read_minutes(words),
        image: event.tag_value("image").map(str::to_string),
    })
}

/// Build posts for a slice of events, preserving input order.
///
/// Events that fail the substantiveness floor are dropped silently.
pub fn build_posts(events: &[ArticleEvent], config: &ExtractorConfig) -> Vec<Post> {
    events
        .iter()
        .filter_map(|event| build_post(event, config))
        .collect()
}

/// Shorten an author key for display: `npub1abcdefg...xyzabc`.
fn display_author(author: &str) -> String {
    let chars: Vec<char> = author.chars().collect();
    if chars.len() <= 20 {
        return author.to_string();
    }
    let head: String = chars[..12].iter().collect();
    let tail: String = chars[chars.len() - 6..].iter().collect();
    format!("{head}...{tail}")
}
