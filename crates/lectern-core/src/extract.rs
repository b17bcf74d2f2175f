//! Title and summary derivation from markdown content.
//!
//! These heuristics only run when an event carries no explicit `title` or
//! `summary` tag. They operate on characters, not bytes, so multi-byte
//! content never splits mid-codepoint.

use std::sync::LazyLock;

use regex::Regex;

/// Matches a markdown header line of depth 1-3 and captures its text.
static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#{1,3}\s+(.+)").expect("header regex should compile"));

/// Fenced code blocks, dropped whole from summaries.
static CODE_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```.*?```").expect("code block regex should compile"));

/// Header markers at line start (`#` runs plus trailing whitespace).
static HEADER_MARK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#{1,6}\s+").expect("header mark regex should compile"));

/// Bold emphasis markers; inner text is kept.
static BOLD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("bold regex should compile"));

/// Italic emphasis markers; inner text is kept.
static ITALIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*(.*?)\*").expect("italic regex should compile"));

/// Link markup; link text is kept, the target is dropped.
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(.*?)\]\(.*?\)").expect("link regex should compile"));

/// Inline code backticks; inner text is kept.
static INLINE_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`(.*?)`").expect("inline code regex should compile"));

/// Newline runs, collapsed to single spaces.
static NEWLINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n+").expect("newline regex should compile"));

/// Truncate a string to at most `max` characters.
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Derive a title from markdown content.
///
/// Tried in order:
/// 1. The first markdown header line (depth 1-3), trimmed and truncated.
/// 2. The first non-blank line, if it reads like a title: shorter than
///    2x `max_len`, period-free, and longer than 5 characters.
/// 3. The text up to the first sentence terminator, with an ellipsis when
///    truncation occurred.
pub fn derive_title(content: &str, max_len: usize) -> String {
    if let Some(caps) = HEADER_RE.captures(content) {
        return truncate_chars(caps[1].trim(), max_len);
    }

    if let Some(line) = content.lines().map(str::trim).find(|l| !l.is_empty()) {
        let len = line.chars().count();
        if len < max_len * 2 && !line.contains('.') && len > 5 {
            return truncate_chars(line, max_len);
        }
    }

    let sentence = content
        .split(['.', '!', '?'])
        .next()
        .unwrap_or_default()
        .trim();
    let truncated = truncate_chars(sentence, max_len);
    if truncated.chars().count() < sentence.chars().count() {
        format!("{truncated}...")
    } else {
        truncated
    }
}

/// Derive a plain-text summary from markdown content.
///
/// Strips markup (fenced code blocks are dropped whole, emphasis and link
/// text is kept), collapses newlines, and trims. Text longer than `max_len`
/// characters is cut at the last sentence terminator when one lands at or
/// past 70% of `max_len`, otherwise hard-truncated with an ellipsis.
pub fn derive_summary(content: &str, max_len: usize) -> String {
    let text = CODE_BLOCK_RE.replace_all(content, "");
    let text = HEADER_MARK_RE.replace_all(&text, "");
    let text = BOLD_RE.replace_all(&text, "$1");
    let text = ITALIC_RE.replace_all(&text, "$1");
    let text = LINK_RE.replace_all(&text, "$1");
    let text = INLINE_CODE_RE.replace_all(&text, "$1");
    let text = NEWLINE_RE.replace_all(&text, " ");
    let plain = text.trim();

    if plain.chars().count() <= max_len {
        return plain.to_string();
    }

    let truncated: Vec<char> = plain.chars().take(max_len).collect();
    let sentence_floor = (max_len as f64 * 0.7) as usize;
    if let Some(pos) = truncated
        .iter()
        .rposition(|c| matches!(*c, '.' | '!' | '?'))
    {
        if pos >= sentence_floor {
            return truncated[..=pos].iter().collect();
        }
    }

    let hard: String = truncated.into_iter().collect();
    format!("{}...", hard.trim_end())
}

/// Number of whitespace-delimited non-empty tokens in the raw content.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Estimated read time in minutes at 200 words per minute, rounded up.
pub fn read_minutes(words: usize) -> u32 {
    words.div_ceil(200) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- derive_title() --

    #[test]
    fn title_from_markdown_header() {
        assert_eq!(derive_title("# Hello World\nBody text", 60), "Hello World");
    }

    #[test]
    fn title_from_second_level_header() {
        assert_eq!(derive_title("## Release Notes\nmore", 60), "Release Notes");
    }

    #[test]
    fn title_from_header_after_intro_line() {
        let content = "posted today\n# Real Title\nbody";
        assert_eq!(derive_title(content, 60), "Real Title");
    }

    #[test]
    fn title_ignores_deep_headers() {
        // Depth 4+ is not a title header; the line itself still wins as the
        // first non-blank line.
        assert_eq!(derive_title("#### Too deep\nbody", 60), "#### Too deep");
    }

    #[test]
    fn title_header_truncated_to_max() {
        let content = format!("# {}", "t".repeat(100));
        let title = derive_title(&content, 60);
        assert_eq!(title.chars().count(), 60);
    }

    #[test]
    fn title_from_first_line() {
        let content = "A promising first line\nThe body continues. Here.";
        assert_eq!(derive_title(content, 60), "A promising first line");
    }

    #[test]
    fn title_skips_first_line_with_period() {
        let content = "This opens with a sentence. More follows here";
        assert_eq!(derive_title(content, 60), "This opens with a sentence");
    }

    #[test]
    fn title_skips_too_short_first_line() {
        assert_eq!(derive_title("Hey", 60), "Hey");
    }

    #[test]
    fn title_sentence_fallback_appends_ellipsis() {
        let content = format!("{}.", "w".repeat(80));
        let title = derive_title(&content, 60);
        assert!(title.ends_with("..."));
        assert_eq!(title.chars().count(), 63);
    }

    #[test]
    fn title_exclamation_terminates_sentence() {
        let content = "What a day! It truly was. Honest.";
        assert_eq!(derive_title(content, 60), "What a day");
    }

    #[test]
    fn title_empty_content() {
        assert_eq!(derive_title("", 60), "");
    }

    // -- derive_summary() --

    #[test]
    fn summary_strips_markup() {
        assert_eq!(
            derive_summary("**Bold** and [link](url) text.", 200),
            "Bold and link text."
        );
    }

    #[test]
    fn summary_strips_headers_and_collapses_newlines() {
        assert_eq!(
            derive_summary("# Heading\n\nFirst paragraph\nsecond line", 200),
            "Heading First paragraph second line"
        );
    }

    #[test]
    fn summary_keeps_italic_text() {
        assert_eq!(derive_summary("*emphasis* stays", 200), "emphasis stays");
    }

    #[test]
    fn summary_keeps_inline_code_text() {
        assert_eq!(derive_summary("run `cargo build` now", 200), "run cargo build now");
    }

    #[test]
    fn summary_drops_fenced_code_blocks() {
        let content = "Before\n```rust\nfn main() {}\n```\nAfter";
        assert_eq!(derive_summary(content, 200), "Before After");
    }

    #[test]
    fn summary_short_text_returned_as_is() {
        assert_eq!(derive_summary("Just a short note", 200), "Just a short note");
    }

    #[test]
    fn summary_cuts_at_late_sentence_boundary() {
        // A terminator at index 149 lands past 70% of 200, so the cut is
        // inclusive at the period.
        let content = format!("{}. {}", "a".repeat(149), "b".repeat(100));
        let summary = derive_summary(&content, 200);
        assert_eq!(summary, format!("{}.", "a".repeat(149)));
    }

    #[test]
    fn summary_ignores_early_sentence_boundary() {
        let content = format!("Short. {}", "b".repeat(300));
        let summary = derive_summary(&content, 200);
        assert!(summary.ends_with("..."));
        assert_eq!(summary.chars().count(), 203);
    }

    #[test]
    fn summary_hard_truncation_appends_ellipsis() {
        let summary = derive_summary(&"a".repeat(250), 200);
        assert_eq!(summary.chars().count(), 203);
        assert!(summary.ends_with("..."));
    }

    // -- word_count() / read_minutes() --

    #[test]
    fn word_count_splits_on_whitespace() {
        assert_eq!(word_count("one two\tthree\nfour"), 4);
    }

    #[test]
    fn word_count_ignores_extra_whitespace() {
        assert_eq!(word_count("  spaced   out  "), 2);
        assert_eq!(word_count("   "), 0);
    }

    #[test]
    fn read_minutes_rounds_up() {
        assert_eq!(read_minutes(400), 2);
        assert_eq!(read_minutes(401), 3);
        assert_eq!(read_minutes(1), 1);
        assert_eq!(read_minutes(0), 0);
    }

    // -- truncate_chars() --

    #[test]
    fn truncate_chars_is_codepoint_safe() {
        assert_eq!(truncate_chars("héllo wörld", 5), "héllo");
        assert_eq!(truncate_chars("short", 60), "short");
    }
}
