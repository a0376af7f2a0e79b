//! Data models for aggregated articles and the daily briefing.
//!
//! This module defines the core data structures used throughout the application:
//! - [`Article`]: One article observed from any configured source
//! - [`Briefing`]: The structured daily briefing distilled from the day's articles
//!
//! Both types survive the whole pipeline: articles flow from the source
//! adapters through aggregation and enrichment into persistence, and exactly
//! one `Briefing` exists per run, even when generation was skipped or failed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One article observed from an RSS feed or the news search API.
///
/// Records are created by a source adapter after the keyword relevance gate,
/// so `keywords_matched` is never empty. Absent source fields are mapped to
/// explicit placeholder strings at the adapter boundary; nothing downstream
/// has to handle missing titles or descriptions.
///
/// # Lifecycle
///
/// Created at fetch time, optionally enriched once (`full_content` set for a
/// bounded number of records), then read-only. Re-fetching a known URL on a
/// later run updates the stored row rather than duplicating it.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Article {
    /// Name of the feed or API source this article came from.
    pub source: String,
    /// Article headline; `"No Title"` when the source omitted it.
    pub title: String,
    /// Summary or description text; placeholder text when absent, never empty.
    pub description: String,
    /// Canonical article URL. Deduplication key. `"#"` when the source omitted it.
    pub url: String,
    /// The published-date string exactly as the source supplied it.
    pub published: Option<String>,
    /// Configured keywords that matched this article's title + description.
    /// Invariant: non-empty; records with no match are dropped at the adapter.
    pub keywords_matched: Vec<String>,
    /// Scraped full-page text, present only for records selected for enrichment.
    pub full_content: Option<String>,
}

/// The structured morning briefing for one calendar day.
///
/// `briefing_date` is the natural key; re-running the pipeline on the same
/// day overwrites the stored row. A `Briefing` always exists once a run
/// completes: the constructors below cover the degraded paths so persistence
/// never receives an absent value.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Briefing {
    /// Calendar day this briefing covers. Unique key in storage.
    pub briefing_date: NaiveDate,
    /// Briefing headline, defaulting to `"AI Morning Briefing - {date}"`.
    pub title: String,
    /// Executive summary. Carries the failure description on degraded runs.
    pub summary_text: String,
    /// Bullet lines from the "Key Developments" section. May be empty.
    pub key_developments: Vec<String>,
    /// The "Strategic Implications" section as one trimmed block.
    pub strategic_implications: String,
    /// The "Suggested Reactions" section as one trimmed block.
    pub suggested_reactions: String,
    /// URLs of the articles submitted to the synthesizer, in submission order.
    pub related_article_urls: Vec<String>,
    /// Full unparsed generation output, retained for audit and debugging.
    pub raw_ai_response: String,
}

impl Briefing {
    /// Default title for a given day.
    pub fn default_title(date: NaiveDate) -> String {
        format!("AI Morning Briefing - {date}")
    }

    /// An empty briefing skeleton with per-field defaults applied.
    pub fn empty(date: NaiveDate, related_article_urls: Vec<String>) -> Self {
        Self {
            briefing_date: date,
            title: Self::default_title(date),
            summary_text: String::new(),
            key_developments: Vec::new(),
            strategic_implications: String::new(),
            suggested_reactions: String::new(),
            related_article_urls,
            raw_ai_response: String::new(),
        }
    }

    /// Briefing recorded when the generation call itself failed.
    ///
    /// The error text lands in the summary so operators see a visible gap
    /// instead of a silently absent row.
    pub fn generation_failed(date: NaiveDate, error: &str, urls: Vec<String>) -> Self {
        Self {
            title: format!("AI Briefing Error - {date}"),
            summary_text: format!(
                "Error during AI analysis: {error}. Raw AI response might be incomplete or empty."
            ),
            strategic_implications: "Could not perform full analysis due to AI error.".to_string(),
            suggested_reactions: "Monitor AI service status.".to_string(),
            raw_ai_response: format!("Error: {error}"),
            ..Self::empty(date, urls)
        }
    }

    /// Briefing recorded when generation never ran (no key, no model, or no articles).
    pub fn analysis_skipped(date: NaiveDate, reason: &str, urls: Vec<String>) -> Self {
        Self {
            title: format!("AI Briefing Skipped - {date}"),
            summary_text: format!("AI analysis was skipped: {reason}."),
            strategic_implications: "AI analysis skipped.".to_string(),
            suggested_reactions: "Check generation service configuration.".to_string(),
            raw_ai_response: "Model initialization failed.".to_string(),
            ..Self::empty(date, urls)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 14).unwrap()
    }

    #[test]
    fn test_article_serialization_round_trip() {
        let article = Article {
            source: "Financial Post".to_string(),
            title: "Ontario expands EV rebates".to_string(),
            description: "The province announced new rebates.".to_string(),
            url: "https://example.com/ev-rebates".to_string(),
            published: Some("Mon, 14 Jul 2025 09:00:00 +0000".to_string()),
            keywords_matched: vec!["EV rebates".to_string()],
            full_content: None,
        };

        let json = serde_json::to_string(&article).unwrap();
        let back: Article = serde_json::from_str(&json).unwrap();
        assert_eq!(back.url, "https://example.com/ev-rebates");
        assert_eq!(back.keywords_matched, vec!["EV rebates".to_string()]);
        assert!(back.full_content.is_none());
    }

    #[test]
    fn test_briefing_defaults() {
        let b = Briefing::empty(day(), vec!["https://a".into()]);
        assert_eq!(b.title, "AI Morning Briefing - 2025-07-14");
        assert_eq!(b.summary_text, "");
        assert!(b.key_developments.is_empty());
        assert_eq!(b.related_article_urls, vec!["https://a".to_string()]);
    }

    #[test]
    fn test_generation_failed_briefing_is_visible() {
        let b = Briefing::generation_failed(day(), "quota exceeded", vec![]);
        assert!(b.title.starts_with("AI Briefing Error"));
        assert!(b.summary_text.contains("quota exceeded"));
        assert_eq!(
            b.strategic_implications,
            "Could not perform full analysis due to AI error."
        );
        assert_eq!(b.suggested_reactions, "Monitor AI service status.");
        assert!(b.raw_ai_response.contains("quota exceeded"));
    }

    #[test]
    fn test_skipped_briefing_has_nonempty_summary() {
        let b = Briefing::analysis_skipped(day(), "GEMINI_API_KEY is not set", vec![]);
        assert!(!b.summary_text.is_empty());
        assert!(b.summary_text.contains("skipped"));
        assert!(b.summary_text.contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_briefing_serializes_date_key() {
        let b = Briefing::empty(day(), vec![]);
        let json = serde_json::to_string(&b).unwrap();
        assert!(json.contains("2025-07-14"));
    }
}
