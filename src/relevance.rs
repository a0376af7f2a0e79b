//! Keyword relevance gate applied uniformly across all sources.
//!
//! A [`KeywordSet`] compiles the configured term list once into whole-word,
//! case-insensitive regexes. Adapters run every fetched item's title and
//! description through [`KeywordSet::matched_terms`]; an empty result means
//! the candidate is out of domain and must be dropped. Whole-word matching
//! keeps short terms like "EV" from firing inside unrelated tokens, and
//! case-insensitivity absorbs the inconsistent casing across feeds.

use regex::Regex;
use tracing::warn;

/// A compiled set of relevance keywords.
///
/// Terms are kept in configuration order; [`KeywordSet::matched_terms`]
/// reports matches in that same order, which keeps the persisted
/// `keywords_matched` lists stable across runs.
#[derive(Debug)]
pub struct KeywordSet {
    terms: Vec<(String, Regex)>,
}

impl KeywordSet {
    /// Compile one whole-word, case-insensitive pattern per term.
    ///
    /// A term that fails to compile (pathological input) is skipped with a
    /// warning rather than failing the whole set; the remaining terms still
    /// gate the run.
    pub fn compile(keywords: &[String]) -> Self {
        let terms = keywords
            .iter()
            .filter(|k| !k.trim().is_empty())
            .filter_map(|k| {
                let pattern = format!(r"(?i)\b{}\b", regex::escape(k.trim()));
                match Regex::new(&pattern) {
                    Ok(re) => Some((k.trim().to_string(), re)),
                    Err(e) => {
                        warn!(keyword = %k, error = %e, "Skipping uncompilable keyword");
                        None
                    }
                }
            })
            .collect();
        Self { terms }
    }

    /// Configured terms that match anywhere in `text`, in configuration order.
    ///
    /// An empty return means "not relevant"; the caller discards the candidate.
    pub fn matched_terms(&self, text: &str) -> Vec<String> {
        self.terms
            .iter()
            .filter(|(_, re)| re.is_match(text))
            .map(|(term, _)| term.clone())
            .collect()
    }

    /// Relevance text for an article: title and description concatenated,
    /// so a keyword appearing in either field qualifies the record.
    pub fn article_text(title: &str, description: &str) -> String {
        format!("{title} {description}")
    }

    /// Number of usable compiled terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(terms: &[&str]) -> KeywordSet {
        KeywordSet::compile(&terms.iter().map(|s| s.to_string()).collect::<Vec<_>>())
    }

    #[test]
    fn test_single_term_match() {
        let ks = set(&["EV rebates", "mining"]);
        let matched = ks.matched_terms("Canada announces new EV rebates");
        assert_eq!(matched, vec!["EV rebates".to_string()]);
    }

    #[test]
    fn test_no_match_is_empty() {
        let ks = set(&["EV rebates", "mining", "hydrogen"]);
        assert!(ks.matched_terms("unrelated text about gardening").is_empty());
    }

    #[test]
    fn test_case_insensitive() {
        let ks = set(&["clean energy"]);
        assert_eq!(
            ks.matched_terms("CLEAN ENERGY funding announced"),
            vec!["clean energy".to_string()]
        );
    }

    #[test]
    fn test_whole_word_boundary() {
        let ks = set(&["EV"]);
        // "EV" inside another token must not match.
        assert!(ks.matched_terms("developers shipped a new revision").is_empty());
        assert_eq!(ks.matched_terms("the EV market grew"), vec!["EV".to_string()]);
    }

    #[test]
    fn test_multiple_matches_keep_config_order() {
        let ks = set(&["solar", "wind energy", "nuclear"]);
        let matched = ks.matched_terms("New nuclear and solar capacity came online");
        assert_eq!(matched, vec!["solar".to_string(), "nuclear".to_string()]);
    }

    #[test]
    fn test_title_or_description_qualifies() {
        let ks = set(&["critical minerals"]);
        let text = KeywordSet::article_text("Mining update", "critical minerals strategy advances");
        assert_eq!(ks.matched_terms(&text), vec!["critical minerals".to_string()]);
    }

    #[test]
    fn test_blank_terms_are_dropped() {
        let ks = set(&["", "  ", "steel"]);
        assert_eq!(ks.len(), 1);
        assert_eq!(ks.matched_terms("steel tariffs"), vec!["steel".to_string()]);
    }
}
