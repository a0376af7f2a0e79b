//! Persistence gateway: upsert-by-key storage over a PostgREST-style API.
//!
//! Two tables, two natural keys: `articles` keyed by `url` and
//! `daily_briefings` keyed by `briefing_date`. Both upserts are idempotent,
//! so re-running the pipeline on the same day updates rows instead of
//! duplicating them. When credentials are absent the gateway does not
//! resolve and the run proceeds with persistence disabled.

use crate::dates;
use crate::models::{Article, Briefing};
use serde::Serialize;
use std::error::Error;
use tracing::{info, instrument, warn};

/// Resolved datastore handle for one run.
#[derive(Debug, Clone)]
pub struct Store {
    http: reqwest::Client,
    base_url: String,
    service_key: String,
}

/// One `articles` row as persisted. `published_date` is the normalized
/// ISO timestamp, or null when the source string did not parse.
#[derive(Debug, Serialize)]
struct ArticleRow<'a> {
    source: &'a str,
    title: &'a str,
    url: &'a str,
    description: &'a str,
    published_date: Option<String>,
    keywords_matched: &'a [String],
}

fn article_row(article: &Article) -> ArticleRow<'_> {
    ArticleRow {
        source: &article.source,
        title: &article.title,
        url: &article.url,
        description: &article.description,
        published_date: dates::parse_published(article.published.as_deref())
            .map(|ts| ts.to_rfc3339()),
        keywords_matched: &article.keywords_matched,
    }
}

impl Store {
    /// Resolve the gateway from credentials. `None` disables persistence
    /// for the run; the caller reports that in the terminal status.
    pub fn from_credentials(
        http: &reqwest::Client,
        base_url: Option<&str>,
        service_key: Option<&str>,
    ) -> Option<Self> {
        let base_url = base_url?.trim().trim_end_matches('/');
        let service_key = service_key?.trim();
        if base_url.is_empty() || service_key.is_empty() {
            return None;
        }
        Some(Self {
            http: http.clone(),
            base_url: base_url.to_string(),
            service_key: service_key.to_string(),
        })
    }

    /// Upsert the deduplicated article set, keyed by URL.
    ///
    /// Returns the number of rows the datastore reports as stored.
    #[instrument(level = "info", skip_all, fields(count = articles.len()))]
    pub async fn upsert_articles(&self, articles: &[Article]) -> Result<usize, Box<dyn Error>> {
        if articles.is_empty() {
            info!("No articles to store in 'articles' table");
            return Ok(0);
        }
        let rows: Vec<ArticleRow<'_>> = articles.iter().map(article_row).collect();
        let stored: serde_json::Value = self.upsert("articles", "url", &rows).await?;
        let count = stored.as_array().map(Vec::len).unwrap_or(0);
        info!(count, "Upserted articles");
        Ok(count)
    }

    /// Upsert the single daily briefing, keyed by its date.
    #[instrument(level = "info", skip_all, fields(date = %briefing.briefing_date))]
    pub async fn upsert_briefing(&self, briefing: &Briefing) -> Result<(), Box<dyn Error>> {
        let rows = [briefing];
        let _: serde_json::Value = self.upsert("daily_briefings", "briefing_date", &rows).await?;
        info!("Stored daily briefing");
        Ok(())
    }

    async fn upsert<T: Serialize>(
        &self,
        table: &str,
        conflict_key: &str,
        rows: &T,
    ) -> Result<serde_json::Value, Box<dyn Error>> {
        let url = format!(
            "{}/rest/v1/{table}?on_conflict={conflict_key}",
            self.base_url
        );
        let response = self
            .http
            .post(&url)
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .json(rows)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            warn!(table, %status, "Datastore upsert rejected");
            return Err(format!("datastore upsert into {table} returned {status}: {detail}").into());
        }
        Ok(response.json().await?)
    }
}
