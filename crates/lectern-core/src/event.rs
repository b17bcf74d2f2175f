//! Plain-data representation of a long-form event.
//!
//! The reader crate converts SDK wire events into [`ArticleEvent`] rows so
//! the extraction and classification code stays free of network types.
//! Tags keep the wire shape: a name at index 0 followed by ordered values.

use serde::Serialize;

/// A long-form event as received from a relay, reduced to plain data.
///
/// Immutable once constructed; the pipeline never mutates events after
/// conversion.
#[derive(Debug, Clone, Serialize)]
pub struct ArticleEvent {
    /// Event id (hex).
    pub id: String,
    /// Author key, bech32 (`npub1...`) where encodable, hex otherwise.
    pub author: String,
    /// Creation time (unix seconds).
    pub created_at: u64,
    /// Event kind.
    pub kind: u16,
    /// Raw markdown content.
    pub content: String,
    /// Tags: name at index 0, ordered values after.
    pub tags: Vec<Vec<String>>,
}

impl ArticleEvent {
    /// First value of the first tag with the given name, if any.
    pub fn tag_value(&self, name: &str) -> Option<&str> {
        tag_value(&self.tags, name)
    }

    /// All first-values of tags with the given name, in tag order.
    ///
    /// Used for repeatable tags such as `t` (topic).
    pub fn tag_values<'a>(&'a self, name: &str) -> Vec<&'a str> {
        self.tags
            .iter()
            .filter(|tag| tag.len() >= 2 && tag[0] == name)
            .map(|tag| tag[1].as_str())
            .collect()
    }

    /// Publication time: the `published_at` tag (seconds) when present and
    /// parseable, otherwise `created_at`.
    pub fn published_at(&self) -> u64 {
        self.tag_value("published_at")
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(self.created_at)
    }
}

/// Extract a tag value by name from an event's tags.
pub fn tag_value<'a>(tags: &'a [Vec<String>], name: &str) -> Option<&'a str> {
    tags.iter()
        .find(|tag| tag.len() >= 2 && tag[0] == name)
        .map(|tag| tag[1].as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event_with_tags(tags: Vec<Vec<String>>) -> ArticleEvent {
        ArticleEvent {
            id: "a".repeat(64),
            author: "npub1example".to_string(),
            created_at: 1_700_000_000,
            kind: crate::LONGFORM_KIND,
            content: String::new(),
            tags,
        }
    }

    #[test]
    fn tag_value_found() {
        let tags = vec![
            vec!["title".to_string(), "My Article".to_string()],
            vec!["summary".to_string(), "A summary".to_string()],
        ];
        assert_eq!(tag_value(&tags, "title"), Some("My Article"));
        assert_eq!(tag_value(&tags, "summary"), Some("A summary"));
    }

    #[test]
    fn tag_value_not_found() {
        let tags = vec![vec!["title".to_string(), "My Article".to_string()]];
        assert_eq!(tag_value(&tags, "image"), None);
    }

    #[test]
    fn tag_value_short_tag_skipped() {
        let tags = vec![vec!["title".to_string()]];
        assert_eq!(tag_value(&tags, "title"), None);
    }

    #[test]
    fn tag_value_first_match_wins() {
        let tags = vec![
            vec!["title".to_string(), "First".to_string()],
            vec!["title".to_string(), "Second".to_string()],
        ];
        assert_eq!(tag_value(&tags, "title"), Some("First"));
    }

    #[test]
    fn tag_values_collects_repeatable_tags() {
        let event = event_with_tags(vec![
            vec!["t".to_string(), "nostr".to_string()],
            vec!["title".to_string(), "X".to_string()],
            vec!["t".to_string(), "bitcoin".to_string()],
        ]);
        assert_eq!(event.tag_values("t"), vec!["nostr", "bitcoin"]);
    }

    #[test]
    fn published_at_prefers_tag() {
        let event = event_with_tags(vec![vec![
            "published_at".to_string(),
            "1600000000".to_string(),
        ]]);
        assert_eq!(event.published_at(), 1_600_000_000);
    }

    #[test]
    fn published_at_falls_back_to_created_at() {
        let event = event_with_tags(vec![]);
        assert_eq!(event.published_at(), 1_700_000_000);
    }

    #[test]
    fn published_at_ignores_unparseable_tag() {
        let event = event_with_tags(vec![vec![
            "published_at".to_string(),
            "not-a-number".to_string(),
        ]]);
        assert_eq!(event.published_at(), 1_700_000_000);
    }
}
