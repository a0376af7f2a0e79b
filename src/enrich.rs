//! Full-content enrichment for a bounded top slice of the aggregate.
//!
//! The most recent `scrape_limit` records get one page fetch each through
//! the scraping service, and the returned HTML is reduced to readable text
//! locally. Each fetch is isolated: a failure leaves that record without
//! `full_content` and never blocks its siblings. Records past the limit,
//! and records with unusable URLs, are passed through untouched.

use crate::models::Article;
use futures::stream::{self, StreamExt};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::error::Error;
use tracing::{debug, info, instrument, warn};
use url::Url;

const SCRAPING_ENDPOINT: &str = "https://app.scrapingbee.com/api/v1/";

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));

/// Reduce a page to readable text.
///
/// Prefers a semantic `article`/`main`/`[role="main"]` container, reading
/// only paragraph and heading elements so script and style content never
/// leaks in. Falls back to the same extraction over the whole page when no
/// container yields text.
pub fn extract_readable_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let blocks = Selector::parse("p, h1, h2, h3").expect("text block selector");

    for css in ["article", "main", r#"[role="main"]"#] {
        let container = Selector::parse(css).expect("container selector");
        if let Some(element) = document.select(&container).next() {
            let text = block_text(element.select(&blocks));
            if !text.is_empty() {
                return text;
            }
        }
    }

    block_text(document.select(&blocks))
}

fn block_text<'a>(elements: impl Iterator<Item = ElementRef<'a>>) -> String {
    let mut parts: Vec<String> = Vec::new();
    for element in elements {
        let joined = element.text().collect::<Vec<_>>().join(" ");
        let collapsed = WHITESPACE.replace_all(joined.trim(), " ").to_string();
        if !collapsed.is_empty() {
            parts.push(collapsed);
        }
    }
    parts.join(" ")
}

/// Fetch one page through the scraping service and extract its text.
async fn fetch_page_text(
    client: &reqwest::Client,
    api_key: &str,
    target_url: &str,
) -> Result<String, Box<dyn Error>> {
    let request_url = format!(
        "{SCRAPING_ENDPOINT}?api_key={api_key}&url={}&render_js=false",
        urlencoding::encode(target_url)
    );
    let response = client.get(&request_url).send().await?;
    if !response.status().is_success() {
        return Err(format!("scraping service returned {}", response.status()).into());
    }
    let html = response.text().await?;
    let text = extract_readable_text(&html);
    if text.is_empty() {
        return Err("extracted no readable text".into());
    }
    Ok(text)
}

/// Attach `full_content` to the first `scrape_limit` records.
///
/// Input is assumed recency-sorted. With no API key the whole step is
/// skipped and records pass through unchanged.
#[instrument(level = "info", skip_all, fields(scrape_limit))]
pub async fn enrich_top(
    mut records: Vec<Article>,
    scrape_limit: usize,
    client: &reqwest::Client,
    api_key: Option<&str>,
) -> Vec<Article> {
    let Some(api_key) = api_key else {
        info!("SCRAPINGBEE_API_KEY is not set, skipping content enrichment");
        return records;
    };

    let candidates: Vec<(usize, String)> = records
        .iter()
        .take(scrape_limit)
        .enumerate()
        .filter(|(_, a)| match Url::parse(&a.url) {
            Ok(_) => true,
            Err(_) => {
                debug!(url = %a.url, "Unusable URL; skipping enrichment for record");
                false
            }
        })
        .map(|(i, a)| (i, a.url.clone()))
        .collect();

    let attempted = candidates.len();
    let fetched: Vec<(usize, Option<String>)> = stream::iter(candidates)
        .map(|(i, url)| async move {
            match fetch_page_text(client, api_key, &url).await {
                Ok(text) => {
                    debug!(%url, chars = text.chars().count(), "Enriched article content");
                    (i, Some(text))
                }
                Err(e) => {
                    warn!(%url, error = %e, "Content fetch failed; record proceeds without full content");
                    (i, None)
                }
            }
        })
        .buffer_unordered(scrape_limit.max(1))
        .collect()
        .await;

    let mut enriched_count = 0usize;
    for (i, content) in fetched {
        if content.is_some() {
            enriched_count += 1;
        }
        records[i].full_content = content;
    }

    info!(
        attempted,
        enriched = enriched_count,
        "Content enrichment complete"
    );
    records
}
