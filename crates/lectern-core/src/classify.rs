//! Heuristic provenance classification.
//!
//! Infers which authoring platform produced a document from its tags and
//! content, with a confidence score. Intentionally approximate: loose
//! substring matching, no network lookups. Kept as a pure function so the
//! relay layer stays free of text heuristics.

use serde::Serialize;

use crate::event::tag_value;

/// Authoring platform a document is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Unknown,
    Highlighter,
    Habla,
}

impl Source {
    /// Human-readable platform name.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Highlighter => "Highlighter.com",
            Self::Habla => "Habla.news",
            Self::Unknown => "Unknown Source",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Highlighter => "highlighter",
            Self::Habla => "habla",
            Self::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}

/// Configuration for the two-tier classifier.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Client-tag fragment identifying Highlighter (tier 1).
    pub highlighter_fragment: String,
    /// Client-tag fragment identifying Habla (tier 1).
    pub habla_fragment: String,
    /// Content/tag indicator phrases for Highlighter (tier 2).
    pub highlighter_indicators: Vec<String>,
    /// Content/tag indicator phrases for Habla (tier 2).
    pub habla_indicators: Vec<String>,
    /// Confidence assigned by a tier-1 client-tag match.
    pub tier1_confidence: f64,
    /// Tier 2 only runs while confidence is below this gate.
    pub tier2_gate: f64,
    /// Upper bound on tier-2 confidence.
    pub tier2_cap: f64,
    /// Confidence contributed per tier-2 indicator match.
    pub tier2_step: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            highlighter_fragment: "highlighter".to_string(),
            habla_fragment: "habla".to_string(),
            highlighter_indicators: vec![
                "highlighter.com".to_string(),
                "highlighter".to_string(),
                "highlight".to_string(),
            ],
            habla_indicators: vec![
                "habla.news".to_string(),
                "habla".to_string(),
                "speak".to_string(),
            ],
            tier1_confidence: 0.9,
            tier2_gate: 0.5,
            tier2_cap: 0.7,
            tier2_step: 0.3,
        }
    }
}

/// Classify a document's provenance from its content and tags.
///
/// Tier 1 inspects the explicit `client` tag (case-insensitive substring
/// match). Tier 2, consulted only while confidence stays below the gate,
/// tallies indicator phrases over the content and all tag fields; the
/// strictly higher tally wins with confidence `min(cap, count * step)`.
/// Ties and zero tallies leave the classification Unknown at confidence 0.
pub fn classify(content: &str, tags: &[Vec<String>], config: &ClassifierConfig) -> (Source, f64) {
    let mut source = Source::Unknown;
    let mut confidence = 0.0_f64;

    if let Some(client) = tag_value(tags, "client") {
        let client = client.to_lowercase();
        if client.contains(&config.highlighter_fragment) {
            source = Source::Highlighter;
            confidence = config.tier1_confidence;
        } else if client.contains(&config.habla_fragment) {
            source = Source::Habla;
            confidence = config.tier1_confidence;
        }
    }

    if confidence < config.tier2_gate {
        let haystack = format!(
            "{} {}",
            content.to_lowercase(),
            tags.iter()
                .map(|tag| tag.join(" "))
                .collect::<Vec<_>>()
                .join(" ")
                .to_lowercase()
        );

        let tally = |indicators: &[String]| {
            indicators
                .iter()
                .filter(|phrase| haystack.contains(phrase.as_str()))
                .count()
        };
        let highlighter_score = tally(&config.highlighter_indicators);
        let habla_score = tally(&config.habla_indicators);

        if highlighter_score > habla_score && highlighter_score >= 1 {
            source = Source::Highlighter;
            confidence = config
                .tier2_cap
                .min(highlighter_score as f64 * config.tier2_step);
        } else if habla_score > highlighter_score && habla_score >= 1 {
            source = Source::Habla;
            confidence = config.tier2_cap.min(habla_score as f64 * config.tier2_step);
        }
    }

    (source, confidence)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_tag(value: &str) -> Vec<Vec<String>> {
        vec![vec!["client".to_string(), value.to_string()]]
    }

    #[test]
    fn client_tag_identifies_highlighter() {
        let config = ClassifierConfig::default();
        let (source, confidence) = classify("plain body", &client_tag("Highlighter App"), &config);
        assert_eq!(source, Source::Highlighter);
        assert_eq!(confidence, 0.9);
    }

    #[test]
    fn client_tag_identifies_habla() {
        let config = ClassifierConfig::default();
        let (source, confidence) = classify("plain body", &client_tag("habla-web/1.2"), &config);
        assert_eq!(source, Source::Habla);
        assert_eq!(confidence, 0.9);
    }

    #[test]
    fn client_tag_match_is_case_insensitive() {
        let config = ClassifierConfig::default();
        let (source, _) = classify("", &client_tag("HIGHLIGHTER"), &config);
        assert_eq!(source, Source::Highlighter);
    }

    #[test]
    fn unknown_client_falls_through_to_content_scan() {
        let config = ClassifierConfig::default();
        let content = "Published via highlighter.com, the highlighter editor";
        let (source, confidence) = classify(content, &client_tag("some-editor"), &config);
        assert_eq!(source, Source::Highlighter);
        // Three indicators present: highlighter.com, highlighter, highlight.
        assert_eq!(confidence, 0.7);
    }

    #[test]
    fn tier2_confidence_scales_with_matches() {
        let config = ClassifierConfig::default();
        let (source, confidence) = classify("read this on habla.news", &[], &config);
        assert_eq!(source, Source::Habla);
        // habla.news and habla both match.
        assert!((confidence - 0.6).abs() < f64::EPSILON);
    }

    #[test]
    fn tier2_confidence_capped() {
        let config = ClassifierConfig::default();
        let content = "habla.news habla speak";
        let (_, confidence) = classify(content, &[], &config);
        assert_eq!(confidence, 0.7);
    }

    #[test]
    fn tier2_scans_tag_values() {
        let config = ClassifierConfig::default();
        let tags = vec![vec!["t".to_string(), "highlighter".to_string()]];
        let (source, _) = classify("no signal in body", &tags, &config);
        assert_eq!(source, Source::Highlighter);
    }

    #[test]
    fn tie_stays_unknown() {
        let config = ClassifierConfig::default();
        // One indicator each: "highlight" vs "speak".
        let (source, confidence) = classify("highlight what they speak", &[], &config);
        assert_eq!(source, Source::Unknown);
        assert_eq!(confidence, 0.0);
    }

    #[test]
    fn no_signal_stays_unknown() {
        let config = ClassifierConfig::default();
        let (source, confidence) = classify("an ordinary essay about birds", &[], &config);
        assert_eq!(source, Source::Unknown);
        assert_eq!(confidence, 0.0);
    }

    #[test]
    fn tier1_match_skips_tier2() {
        let config = ClassifierConfig::default();
        // Content full of Habla signals must not override a confident
        // client-tag match.
        let content = "habla.news habla speak";
        let (source, confidence) = classify(content, &client_tag("highlighter"), &config);
        assert_eq!(source, Source::Highlighter);
        assert_eq!(confidence, 0.9);
    }
}
