//! Run configuration loaded from a YAML file.
//!
//! Everything that shapes a run (feeds, keywords, the search-API query,
//! the enrichment/analysis bounds, and the generation model preference
//! list) lives in `config.yaml`. Credentials do not: those come from the
//! environment via the CLI so the config file stays committable.
//!
//! The bounding limits are policy knobs, not structural constraints; the
//! defaults below match the shipped `config.yaml`.

use serde::Deserialize;
use std::error::Error;
use std::fs;

/// One configured RSS feed.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Display name, used as the article's `source`.
    pub name: String,
    /// Feed URL.
    pub url: String,
}

/// Search-API request shape.
#[derive(Debug, Clone, Deserialize)]
pub struct NewsApiConfig {
    /// Base query, combined with the keyword list at request time.
    #[serde(default = "default_query")]
    pub query: String,
    /// How many days back the date window reaches.
    #[serde(default = "default_days_back")]
    pub days_back: i64,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for NewsApiConfig {
    fn default() -> Self {
        Self {
            query: default_query(),
            days_back: default_days_back(),
            language: default_language(),
            page_size: default_page_size(),
        }
    }
}

/// Bounds protecting the outbound scraping and generation quotas.
#[derive(Debug, Clone, Deserialize)]
pub struct Limits {
    /// Most-recent records eligible for full-content scraping.
    #[serde(default = "default_scrape_limit")]
    pub scrape_limit: usize,
    /// Most-recent records submitted to the synthesizer.
    #[serde(default = "default_analysis_limit")]
    pub analysis_limit: usize,
    /// Character budget applied to scraped full content in the prompt.
    #[serde(default = "default_max_content_chars")]
    pub max_content_chars: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            scrape_limit: default_scrape_limit(),
            analysis_limit: default_analysis_limit(),
            max_content_chars: default_max_content_chars(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub feeds: Vec<FeedConfig>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub news_api: NewsApiConfig,
    #[serde(default)]
    pub limits: Limits,
    /// Ordered generation-model preference list; the first entry becomes
    /// the capability handle for the run.
    #[serde(default)]
    pub models: Vec<String>,
}

impl AppConfig {
    /// Load and parse the YAML config at `path`.
    pub fn load(path: &str) -> Result<Self, Box<dyn Error>> {
        let raw = fs::read_to_string(path)
            .map_err(|e| format!("reading config {path}: {e}"))?;
        let cfg: AppConfig = serde_yaml::from_str(&raw)
            .map_err(|e| format!("parsing config {path}: {e}"))?;
        Ok(cfg)
    }
}

fn default_query() -> String {
    "Canada clean energy".to_string()
}

fn default_days_back() -> i64 {
    1
}

fn default_language() -> String {
    "en".to_string()
}

fn default_page_size() -> u32 {
    10
}

fn default_scrape_limit() -> usize {
    5
}

fn default_analysis_limit() -> usize {
    5
}

fn default_max_content_chars() -> usize {
    3500
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_gets_defaults() {
        let cfg: AppConfig = serde_yaml::from_str("keywords: [solar]").unwrap();
        assert!(cfg.feeds.is_empty());
        assert_eq!(cfg.keywords, vec!["solar".to_string()]);
        assert_eq!(cfg.news_api.days_back, 1);
        assert_eq!(cfg.news_api.language, "en");
        assert_eq!(cfg.limits.scrape_limit, 5);
        assert_eq!(cfg.limits.max_content_chars, 3500);
        assert!(cfg.models.is_empty());
    }

    #[test]
    fn test_full_config_parses() {
        let yaml = r#"
feeds:
  - name: Financial Post
    url: https://financialpost.com/feed/
  - name: The Logic
    url: https://thelogic.co/feed/
keywords:
  - clean energy
  - EV rebates
news_api:
  query: Canada clean economy
  days_back: 2
  page_size: 25
limits:
  scrape_limit: 3
  analysis_limit: 8
  max_content_chars: 2000
models:
  - gemini-pro
  - gemini-1.5-pro
"#;
        let cfg: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.feeds.len(), 2);
        assert_eq!(cfg.feeds[0].name, "Financial Post");
        assert_eq!(cfg.news_api.days_back, 2);
        assert_eq!(cfg.news_api.page_size, 25);
        assert_eq!(cfg.limits.analysis_limit, 8);
        assert_eq!(cfg.models, vec!["gemini-pro", "gemini-1.5-pro"]);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = AppConfig::load("/definitely/not/here.yaml").unwrap_err();
        assert!(err.to_string().contains("reading config"));
    }
}
