//! # Morning Brief
//!
//! A news aggregation and briefing pipeline that collects articles from
//! RSS feeds and a news search API, filters them against a configured
//! keyword list, deduplicates and recency-sorts them, enriches a bounded
//! subset with scraped full-page content, and asks an LLM to distill the
//! set into a structured daily briefing that is persisted alongside the
//! raw articles.
//!
//! ## Usage
//!
//! ```sh
//! morning_brief --config ./config.yaml
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Fetching**: Pull candidate articles from every configured source
//! 2. **Aggregation**: Deduplicate by URL and sort by recency
//! 3. **Enrichment**: Scrape full content for the top few records
//! 4. **Synthesis**: Generate and parse the structured morning briefing
//! 5. **Persistence**: Upsert articles and the daily briefing
//!
//! Every external service is independently optional; a missing credential
//! disables that integration and the run degrades instead of failing.

use chrono::Local;
use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod aggregate;
mod api;
mod briefing;
mod cli;
mod config;
mod dates;
mod enrich;
mod models;
mod relevance;
mod sources;
mod store;
mod utils;

use api::GenerationClient;
use cli::Cli;
use config::AppConfig;
use relevance::KeywordSet;
use store::Store;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("morning_brief starting up");

    // Parse CLI and load run configuration
    let args = Cli::parse();
    let config = AppConfig::load(&args.config)?;
    info!(
        config_path = %args.config,
        feeds = config.feeds.len(),
        keywords = config.keywords.len(),
        "Loaded configuration"
    );

    let keywords = KeywordSet::compile(&config.keywords);
    if keywords.is_empty() {
        warn!("No usable keywords configured; every candidate will be dropped");
    }

    // One shared client; every outbound call gets the same fixed timeout.
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()?;

    // ---- Fetch candidate articles from all sources ----
    let rss_articles = sources::rss::fetch_feeds(&http, &config.feeds, &keywords).await;

    let api_articles = match args.news_api_key.as_deref() {
        Some(key) => {
            sources::newsapi::fetch(&http, key, &config.news_api, &config.keywords, &keywords)
                .await
        }
        None => {
            info!("NEWS_API_KEY is not set, skipping News API fetch");
            Vec::new()
        }
    };
    debug!(
        rss = rss_articles.len(),
        news_api = api_articles.len(),
        "Per-source candidate counts"
    );

    // ---- Aggregate: dedup by URL, most recent first ----
    let merged = aggregate::merge_and_sort(vec![rss_articles, api_articles]);

    // ---- Persist raw articles ----
    let store = Store::from_credentials(
        &http,
        args.supabase_url.as_deref(),
        args.supabase_key.as_deref(),
    );
    if store.is_none() {
        info!("SUPABASE_URL / SUPABASE_KEY not set; persistence is disabled for this run");
    }

    let articles_status = match &store {
        Some(store) => match store.upsert_articles(&merged).await {
            Ok(count) => format!("{count} stored"),
            Err(e) => {
                error!(error = %e, "Failed to store articles");
                format!("storage failed ({e})")
            }
        },
        None => "persistence disabled".to_string(),
    };

    // ---- Enrichment: scrape full content for the top records ----
    let enriched = enrich::enrich_top(
        merged,
        config.limits.scrape_limit,
        &http,
        args.scrapingbee_api_key.as_deref(),
    )
    .await;

    // ---- Synthesis: generate and parse the daily briefing ----
    let today = Local::now().date_naive();
    let generation = GenerationClient::resolve(&http, args.gemini_api_key.as_deref(), &config.models);
    if generation.is_none() {
        info!("Generation service not configured; the briefing will record a skipped analysis");
    }

    let analysis_count = config.limits.analysis_limit.min(enriched.len());
    let selected = &enriched[..analysis_count];
    let related_urls = briefing::related_urls(selected);
    let outcome =
        briefing::synthesize(generation.as_ref(), selected, config.limits.max_content_chars).await;
    let daily = briefing::into_briefing(outcome, related_urls, today);
    info!(
        date = %daily.briefing_date,
        title = %daily.title,
        key_developments = daily.key_developments.len(),
        "Briefing assembled"
    );

    // ---- Persist the daily briefing ----
    let briefing_status = match &store {
        Some(store) => match store.upsert_briefing(&daily).await {
            Ok(()) => "stored".to_string(),
            Err(e) => {
                error!(error = %e, "Failed to store daily briefing");
                format!("storage failed ({e})")
            }
        },
        None => "persistence disabled".to_string(),
    };

    let elapsed = start_time.elapsed();
    info!(
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        articles = %articles_status,
        briefing = %briefing_status,
        "Run completed"
    );
    println!(
        "Morning brief run completed. Articles: {articles_status}. Briefing ({}): {briefing_status}.",
        daily.briefing_date
    );

    Ok(())
}
