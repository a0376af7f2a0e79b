//! RSS feed adapter.
//!
//! Fetches each configured feed once, deserializes the `rss/channel/item`
//! tree, and keeps the items that pass the keyword gate. Feeds are fetched
//! concurrently with a small bound; a fetch or parse failure for one feed
//! is logged and contributes nothing, the remaining feeds proceed.

use crate::config::FeedConfig;
use crate::models::Article;
use crate::relevance::KeywordSet;
use futures::stream::{self, StreamExt};
use quick_xml::de::from_str;
use serde::Deserialize;
use std::error::Error;
use tracing::{debug, info, instrument, warn};

/// Concurrent in-flight feed fetches.
const FEED_FETCH_CONCURRENCY: usize = 4;

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(default, rename = "item")]
    items: Vec<Item>,
}

/// One feed entry. Feeds disagree on whether the summary text lives in
/// `description` or `summary`; both are accepted.
#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    description: Option<String>,
    summary: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
}

/// Parse one feed document and keep the keyword-relevant items.
///
/// Pure with respect to I/O so fixtures exercise the mapping directly.
pub fn parse_feed(
    feed_name: &str,
    xml: &str,
    keywords: &KeywordSet,
) -> Result<Vec<Article>, Box<dyn Error>> {
    let rss: Rss = from_str(xml)?;
    let mut articles = Vec::new();

    for item in rss.channel.items {
        let title = item.title.unwrap_or_else(|| "No Title".to_string());
        let url = item.link.unwrap_or_else(|| "#".to_string());
        let description = item
            .description
            .or(item.summary)
            .unwrap_or_else(|| "No summary available.".to_string());

        let matched = keywords.matched_terms(&KeywordSet::article_text(&title, &description));
        if matched.is_empty() {
            continue;
        }

        articles.push(Article {
            source: feed_name.to_string(),
            title,
            description,
            url,
            published: item.pub_date,
            keywords_matched: matched,
            full_content: None,
        });
    }

    Ok(articles)
}

/// Fetch and parse a single feed.
#[instrument(level = "info", skip_all, fields(feed = %feed.name))]
async fn fetch_feed(
    client: &reqwest::Client,
    feed: &FeedConfig,
    keywords: &KeywordSet,
) -> Result<Vec<Article>, Box<dyn Error>> {
    let body = client.get(&feed.url).send().await?.text().await?;
    let articles = parse_feed(&feed.name, &body, keywords)?;
    debug!(count = articles.len(), "Parsed feed items past keyword gate");
    Ok(articles)
}

/// Fetch all configured feeds, tolerating per-feed failures.
#[instrument(level = "info", skip_all)]
pub async fn fetch_feeds(
    client: &reqwest::Client,
    feeds: &[FeedConfig],
    keywords: &KeywordSet,
) -> Vec<Article> {
    let results: Vec<Vec<Article>> = stream::iter(feeds)
        .map(|feed| async move {
            match fetch_feed(client, feed, keywords).await {
                Ok(articles) => articles,
                Err(e) => {
                    warn!(feed = %feed.name, url = %feed.url, error = %e, "Feed fetch failed; skipping source");
                    Vec::new()
                }
            }
        })
        .buffer_unordered(FEED_FETCH_CONCURRENCY)
        .collect()
        .await;

    let articles: Vec<Article> = results.into_iter().flatten().collect();
    info!(
        feeds = feeds.len(),
        count = articles.len(),
        "Fetched RSS articles after keyword filter"
    );
    articles
}
