//! View-boundary parameters: source filtering and sort order.
//!
//! The pipeline itself emits posts in deterministic aggregation order;
//! display ordering is an explicit, parameterized concern applied here.

use std::str::FromStr;

use crate::classify::Source;
use crate::post::Post;

/// Which sources to include in a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFilter {
    All,
    Highlighter,
    Habla,
    Unknown,
}

impl SourceFilter {
    /// Whether a post with the given source passes this filter.
    pub fn matches(&self, source: Source) -> bool {
        match self {
            Self::All => true,
            Self::Highlighter => source == Source::Highlighter,
            Self::Habla => source == Source::Habla,
            Self::Unknown => source == Source::Unknown,
        }
    }
}

impl FromStr for SourceFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "highlighter" => Ok(Self::Highlighter),
            "habla" => Ok(Self::Habla),
            "unknown" => Ok(Self::Unknown),
            other => Err(format!(
                "unknown source filter '{other}' (expected all, highlighter, habla or unknown)"
            )),
        }
    }
}

/// Display sort order by publication time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    NewestFirst,
    OldestFirst,
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(Self::NewestFirst),
            "oldest" => Ok(Self::OldestFirst),
            other => Err(format!("unknown sort mode '{other}' (expected newest or oldest)")),
        }
    }
}

/// Filter posts by source, then sort by publication time.
///
/// The sort is stable, so posts sharing a timestamp keep their pipeline
/// order.
pub fn apply_view(posts: &[Post], filter: SourceFilter, sort: SortMode) -> Vec<Post> {
    let mut out: Vec<Post> = posts
        .iter()
        .filter(|post| filter.matches(post.source))
        .cloned()
        .collect();

    match sort {
        SortMode::NewestFirst => out.sort_by(|a, b| b.published_at.cmp(&a.published_at)),
        SortMode::OldestFirst => out.sort_by(|a, b| a.published_at.cmp(&b.published_at)),
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: &str, published_at: u64, source: Source) -> Post {
        Post {
            id: id.to_string(),
            author: "npub1author".to_string(),
            title: "Title".to_string(),
            summary: "Summary".to_string(),
            content: String::new(),
            published_at,
            topics: vec![],
            source,
            source_confidence: 0.0,
            word_count: 0,
            read_minutes: 0,
            image: None,
        }
    }

    #[test]
    fn newest_first_sorts_descending() {
        let posts = vec![
            post("a", 100, Source::Unknown),
            post("b", 300, Source::Unknown),
            post("c", 200, Source::Unknown),
        ];
        let view = apply_view(&posts, SourceFilter::All, SortMode::NewestFirst);
        let ids: Vec<&str> = view.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[test]
    fn oldest_first_sorts_ascending() {
        let posts = vec![
            post("a", 100, Source::Unknown),
            post("b", 300, Source::Unknown),
            post("c", 200, Source::Unknown),
        ];
        let view = apply_view(&posts, SourceFilter::All, SortMode::OldestFirst);
        let ids: Vec<&str> = view.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c", "b"]);
    }

    #[test]
    fn equal_timestamps_keep_pipeline_order() {
        let posts = vec![
            post("a", 100, Source::Unknown),
            post("b", 100, Source::Unknown),
        ];
        let view = apply_view(&posts, SourceFilter::All, SortMode::NewestFirst);
        let ids: Vec<&str> = view.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn source_filter_selects_matching_posts() {
        let posts = vec![
            post("a", 1, Source::Highlighter),
            post("b", 2, Source::Habla),
            post("c", 3, Source::Unknown),
        ];
        let view = apply_view(&posts, SourceFilter::Habla, SortMode::NewestFirst);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].id, "b");
    }

    #[test]
    fn unknown_filter_selects_unclassified_posts() {
        let posts = vec![
            post("a", 1, Source::Highlighter),
            post("b", 2, Source::Unknown),
        ];
        let view = apply_view(&posts, SourceFilter::Unknown, SortMode::OldestFirst);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].id, "b");
    }

    #[test]
    fn filters_parse_from_cli_strings() {
        assert_eq!("all".parse::<SourceFilter>().unwrap(), SourceFilter::All);
        assert_eq!(
            "highlighter".parse::<SourceFilter>().unwrap(),
            SourceFilter::Highlighter
        );
        assert!("nonsense".parse::<SourceFilter>().is_err());

        assert_eq!("newest".parse::<SortMode>().unwrap(), SortMode::NewestFirst);
        assert_eq!("oldest".parse::<SortMode>().unwrap(), SortMode::OldestFirst);
        assert!("sideways".parse::<SortMode>().is_err());
    }
}
