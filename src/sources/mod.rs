//! Source adapters feeding the aggregation pipeline.
//!
//! Each adapter fetches raw candidate items from one kind of source,
//! applies the keyword relevance gate, and maps the source-specific fields
//! into the common [`crate::models::Article`] shape.
//!
//! # Sources
//!
//! | Source | Module | Method | Notes |
//! |--------|--------|--------|-------|
//! | RSS feeds | [`rss`] | XML deserialization | One fetch per configured feed |
//! | News search API | [`newsapi`] | JSON REST query | Skipped when no API key is set |
//!
//! # Common behavior
//!
//! - A failure in one source is logged and yields nothing for that source;
//!   the remaining sources still contribute (partial results are accepted,
//!   a single outage never aborts the run).
//! - Items that match no configured keyword are dropped before the adapter
//!   returns, so every [`crate::models::Article`] carries at least one
//!   matched term.
//! - Absent fields become explicit placeholder strings at this boundary.

pub mod newsapi;
pub mod rss;
