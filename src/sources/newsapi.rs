//! News search API adapter.
//!
//! Supplements the RSS feeds with a keyword query against a NewsAPI-style
//! `everything` endpoint. The API pre-filters by query, but the keyword
//! gate is still applied here so every source goes through the same
//! relevance decision and records which terms matched.

use crate::config::NewsApiConfig;
use crate::models::Article;
use crate::relevance::KeywordSet;
use chrono::{Duration, Utc};
use itertools::Itertools;
use serde::Deserialize;
use tracing::{info, instrument, warn};

const ENDPOINT: &str = "https://newsapi.org/v2/everything";

#[derive(Debug, Deserialize)]
struct ApiResponse {
    status: String,
    #[serde(default)]
    articles: Vec<ApiArticle>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiArticle {
    source: Option<ApiSource>,
    title: Option<String>,
    url: Option<String>,
    description: Option<String>,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiSource {
    name: Option<String>,
}

/// Compose the outbound query: the base query AND any configured keyword.
pub fn build_query(base_query: &str, keywords: &[String]) -> String {
    format!("({}) AND ({})", base_query, keywords.iter().join(" OR "))
}

/// Map a decoded API response into keyword-gated articles.
///
/// A non-`ok` status yields an empty list; the API's error message is the
/// caller's to log.
fn map_response(body: ApiResponse, keywords: &KeywordSet) -> Vec<Article> {
    if body.status != "ok" {
        warn!(
            status = %body.status,
            message = body.message.as_deref().unwrap_or("Unknown error"),
            "News API returned a non-ok status"
        );
        return Vec::new();
    }

    let mut articles = Vec::new();
    for item in body.articles {
        let title = item.title.unwrap_or_else(|| "No Title".to_string());
        let url = item.url.unwrap_or_else(|| "#".to_string());
        let description = item
            .description
            .unwrap_or_else(|| "No description available.".to_string());

        let matched = keywords.matched_terms(&KeywordSet::article_text(&title, &description));
        if matched.is_empty() {
            continue;
        }

        articles.push(Article {
            source: item
                .source
                .and_then(|s| s.name)
                .unwrap_or_else(|| "News API".to_string()),
            title,
            description,
            url,
            published: item.published_at,
            keywords_matched: matched,
            full_content: None,
        });
    }
    articles
}

/// Query the search API once. Any failure logs and yields an empty list.
#[instrument(level = "info", skip_all)]
pub async fn fetch(
    client: &reqwest::Client,
    api_key: &str,
    cfg: &NewsApiConfig,
    keyword_list: &[String],
    keywords: &KeywordSet,
) -> Vec<Article> {
    let end = Utc::now();
    let start = end - Duration::days(cfg.days_back);
    let query = build_query(&cfg.query, keyword_list);

    let response = client
        .get(ENDPOINT)
        .query(&[
            ("q", query.as_str()),
            ("language", cfg.language.as_str()),
            ("from", &start.to_rfc3339()),
            ("to", &end.to_rfc3339()),
            ("sortBy", "relevancy"),
            ("pageSize", &cfg.page_size.to_string()),
            ("apiKey", api_key),
        ])
        .send()
        .await;

    let body: ApiResponse = match response {
        Ok(resp) => match resp.json().await {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "News API response decode failed; skipping source");
                return Vec::new();
            }
        },
        Err(e) => {
            warn!(error = %e, "News API request failed; skipping source");
            return Vec::new();
        }
    };

    let articles = map_response(body, keywords);
    info!(count = articles.len(), "Fetched News API articles after keyword filter");
    articles
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords() -> KeywordSet {
        KeywordSet::compile(&["clean energy".to_string(), "mining".to_string()])
    }

    fn keyword_list() -> Vec<String> {
        vec!["clean energy".to_string(), "mining".to_string()]
    }

    #[test]
    fn test_build_query_joins_keywords() {
        let q = build_query("Canada clean energy", &keyword_list());
        assert_eq!(q, "(Canada clean energy) AND (clean energy OR mining)");
    }

    #[test]
    fn test_map_response_ok() {
        let json = r#"{
            "status": "ok",
            "articles": [
                {
                    "source": {"id": null, "name": "CBC News"},
                    "title": "Mining investment grows",
                    "url": "https://example.com/mining",
                    "description": "Critical sector update.",
                    "publishedAt": "2025-07-14T09:30:00Z"
                },
                {
                    "source": null,
                    "title": "clean energy milestone",
                    "url": "https://example.com/milestone",
                    "description": null,
                    "publishedAt": null
                },
                {
                    "source": {"name": "Elsewhere"},
                    "title": "Sports roundup",
                    "url": "https://example.com/sports",
                    "description": "Nothing relevant here.",
                    "publishedAt": "2025-07-14T10:00:00Z"
                }
            ]
        }"#;
        let body: ApiResponse = serde_json::from_str(json).unwrap();
        let articles = map_response(body, &keywords());

        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].source, "CBC News");
        assert_eq!(articles[0].keywords_matched, vec!["mining".to_string()]);
        assert_eq!(
            articles[0].published.as_deref(),
            Some("2025-07-14T09:30:00Z")
        );
        // Missing source and description fall back to placeholders.
        assert_eq!(articles[1].source, "News API");
        assert_eq!(articles[1].description, "No description available.");
        assert!(articles[1].published.is_none());
    }

    #[test]
    fn test_map_response_error_status() {
        let json = r#"{"status": "error", "message": "apiKeyInvalid"}"#;
        let body: ApiResponse = serde_json::from_str(json).unwrap();
        assert!(map_response(body, &keywords()).is_empty());
    }
}
