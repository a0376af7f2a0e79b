//! Best-effort extraction of the structured briefing from generated text.
//!
//! The generator is asked for five bold-heading sections; models drift on
//! colon placement, spacing, and occasionally on section wording, so this
//! parser is a tolerant scan rather than a strict grammar. Every heading is
//! located by its literal name; a section's body runs until the next
//! line-leading bold heading or the end of the document. A missing section
//! keeps its documented default and is never an error.

use crate::models::Briefing;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

/// A line-leading bold heading, colon inside or outside the markers.
/// Bulleted bold runs ("- **Positive:** ...") do not qualify.
static HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*\*\*([^*\n]+?)\*\*:?").expect("heading regex"));

/// The implications heading as prompted, plus the shortened form models
/// commonly substitute.
const IMPLICATIONS_HEADINGS: [&str; 2] = [
    "Strategic Implications for New Economy Canada",
    "Strategic Implications",
];

/// Parse a generated briefing document into a [`Briefing`].
///
/// `today` is supplied by the caller; the parser never consults the clock,
/// and it never trusts the model's self-reported date (see
/// [`title_is_placeholder`]).
pub fn parse_briefing(raw: &str, related_urls: Vec<String>, today: NaiveDate) -> Briefing {
    let mut briefing = Briefing::empty(today, related_urls);
    briefing.raw_ai_response = raw.to_string();

    let sections = split_sections(raw);

    if let Some(body) = section_body(&sections, &["Briefing Title"]) {
        let title = body.lines().next().unwrap_or("").trim();
        if !title.is_empty() && !title_is_placeholder(title) {
            briefing.title = title.to_string();
        }
    }
    if let Some(body) = section_body(&sections, &["Executive Summary"]) {
        briefing.summary_text = body.trim().to_string();
    }
    if let Some(body) = section_body(&sections, &["Key Developments"]) {
        briefing.key_developments = bullet_lines(body);
    }
    if let Some(body) = section_body(&sections, &IMPLICATIONS_HEADINGS) {
        briefing.strategic_implications = body.trim().to_string();
    }
    if let Some(body) = section_body(&sections, &["Suggested Reactions"]) {
        briefing.suggested_reactions = body.trim().to_string();
    }

    briefing
}

/// All headings with their body text, in document order.
fn split_sections(raw: &str) -> Vec<(String, &str)> {
    let marks: Vec<(String, usize, usize)> = HEADING
        .captures_iter(raw)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let name = caps.get(1)?.as_str().trim().trim_end_matches(':').trim();
            Some((name.to_string(), whole.start(), whole.end()))
        })
        .collect();

    marks
        .iter()
        .enumerate()
        .map(|(i, (name, _, body_start))| {
            let body_end = marks
                .get(i + 1)
                .map(|(_, next_start, _)| *next_start)
                .unwrap_or(raw.len());
            (name.clone(), &raw[*body_start..body_end])
        })
        .collect()
}

/// Body of the first section whose heading matches any accepted name.
fn section_body<'a>(sections: &[(String, &'a str)], accepted: &[&str]) -> Option<&'a str> {
    sections
        .iter()
        .find(|(name, _)| accepted.iter().any(|a| name.eq_ignore_ascii_case(a)))
        .map(|(_, body)| *body)
}

/// Dash-marked bullet lines, markers stripped and blanks dropped.
fn bullet_lines(body: &str) -> Vec<String> {
    body.lines()
        .filter_map(|line| {
            let line = line.trim();
            line.strip_prefix("- ")
                .or_else(|| line.strip_prefix('-'))
                .map(str::trim)
        })
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// True when the extracted title still carries the prompt's placeholder:
/// an unresolved bracketed token or a literal "today's date" phrase. The
/// briefing then falls back to the locally computed default title.
fn title_is_placeholder(title: &str) -> bool {
    if title.contains('[') || title.contains(']') {
        return true;
    }
    let lower = title.to_lowercase();
    lower.contains("today's date") || lower.contains("todays date")
}
