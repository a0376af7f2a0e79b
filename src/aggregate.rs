//! Aggregation: merge per-source article lists, deduplicate by URL, and
//! order by recency.
//!
//! Duplicates resolve last-write-wins because later sources in the merge
//! order tend to carry richer data (the search API re-reports feed articles
//! with fuller descriptions). The winning record keeps the slot of the first
//! encounter, and the final sort is stable, so equal or sentinel timestamps
//! retain their encounter order.

use crate::dates;
use crate::models::Article;
use chrono::{DateTime, Utc};
use std::cmp::Reverse;
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// Merge candidate lists from all adapters into one deduplicated,
/// recency-sorted sequence (most recent first).
#[instrument(level = "info", skip_all)]
pub fn merge_and_sort(lists: Vec<Vec<Article>>) -> Vec<Article> {
    let total: usize = lists.iter().map(Vec::len).sum();

    // Dedup by URL, later record replacing the earlier in place.
    let mut slot_by_url: HashMap<String, usize> = HashMap::new();
    let mut merged: Vec<Article> = Vec::with_capacity(total);
    for article in lists.into_iter().flatten() {
        match slot_by_url.get(&article.url) {
            Some(&slot) => {
                debug!(url = %article.url, "Duplicate URL; keeping later record");
                merged[slot] = article;
            }
            None => {
                slot_by_url.insert(article.url.clone(), merged.len());
                merged.push(article);
            }
        }
    }

    // Stable descending sort on the normalized timestamp; ties and
    // sentinel values keep their encounter order.
    merged.sort_by_key(|a| Reverse(timestamp(a)));

    info!(
        fetched = total,
        unique = merged.len(),
        "Merged and sorted candidate articles"
    );
    merged
}

fn timestamp(article: &Article) -> DateTime<Utc> {
    dates::normalize(article.published.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(source: &str, title: &str, url: &str, published: Option<&str>) -> Article {
        Article {
            source: source.to_string(),
            title: title.to_string(),
            description: format!("{title} description"),
            url: url.to_string(),
            published: published.map(str::to_string),
            keywords_matched: vec!["clean energy".to_string()],
            full_content: None,
        }
    }

    #[test]
    fn test_dedup_last_write_wins() {
        let feed = article(
            "Feed",
            "Old headline",
            "https://example.com/a",
            Some("2025-07-14T08:00:00Z"),
        );
        let api = article(
            "News API",
            "Newer headline",
            "https://example.com/a",
            Some("2025-07-14T08:00:00Z"),
        );
        let merged = merge_and_sort(vec![vec![feed], vec![api]]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].title, "Newer headline");
        assert_eq!(merged[0].source, "News API");
    }

    #[test]
    fn test_sort_recent_first_unparseable_last() {
        let newest = article("A", "t1", "https://e.com/1", Some("2025-07-14T10:00:00Z"));
        let older = article("B", "t2", "https://e.com/2", Some("2025-07-14T08:00:00Z"));
        let broken = article("C", "t3", "https://e.com/3", Some("not a date"));

        // Input order deliberately scrambled.
        let merged = merge_and_sort(vec![vec![broken, newest.clone()], vec![older]]);
        let urls: Vec<&str> = merged.iter().map(|a| a.url.as_str()).collect();
        assert_eq!(urls, vec!["https://e.com/1", "https://e.com/2", "https://e.com/3"]);
    }

    #[test]
    fn test_sort_stability_on_equal_timestamps() {
        let first = article("A", "first", "https://e.com/1", Some("2025-07-14T08:00:00Z"));
        let second = article("B", "second", "https://e.com/2", Some("2025-07-14T08:00:00Z"));
        let none1 = article("C", "no date 1", "https://e.com/3", None);
        let none2 = article("D", "no date 2", "https://e.com/4", None);

        let merged = merge_and_sort(vec![vec![first, second, none1, none2]]);
        let titles: Vec<&str> = merged.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second", "no date 1", "no date 2"]);
    }

    #[test]
    fn test_end_to_end_merge_scenario() {
        // Two feeds each contribute one matching item; the search API
        // re-reports one of them with a richer description.
        let feed_one = article(
            "Globe and Mail - Business",
            "EV plant announced",
            "https://example.com/ev-plant",
            Some("Mon, 14 Jul 2025 09:00:00 +0000"),
        );
        let feed_two = article(
            "Financial Post",
            "Grid transmission upgrade",
            "https://example.com/grid",
            Some("Mon, 14 Jul 2025 11:00:00 +0000"),
        );
        let mut api_dup = article(
            "News API",
            "EV plant announced",
            "https://example.com/ev-plant",
            Some("2025-07-14T09:00:00Z"),
        );
        api_dup.description = "Full announcement details from the wire.".to_string();

        let merged = merge_and_sort(vec![vec![feed_one], vec![feed_two], vec![api_dup]]);
        assert_eq!(merged.len(), 2);
        // Most recent first.
        assert_eq!(merged[0].url, "https://example.com/grid");
        // The duplicate keeps the API's richer description.
        assert_eq!(
            merged[1].description,
            "Full announcement details from the wire."
        );
        assert_eq!(merged[1].source, "News API");
    }

    #[test]
    fn test_merge_empty_input() {
        assert!(merge_and_sort(Vec::new()).is_empty());
        assert!(merge_and_sort(vec![Vec::new(), Vec::new()]).is_empty());
    }
}
