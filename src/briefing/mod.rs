//! Briefing synthesis: deterministic prompt construction and the
//! generation call, plus conversion of every outcome into a persistable
//! [`Briefing`].
//!
//! The prompt is a fixed persona preamble, a fixed task template naming the
//! exact section headings the parser recovers, and one block per submitted
//! article. Scraped full content is preferred over the feed description,
//! truncated to a character budget to bound request cost.
//!
//! Every path out of this module produces a [`Briefing`]: generated text is
//! parsed, a failed call becomes an explicit error briefing, and a skipped
//! run (no capability, no articles) becomes a skip briefing. Persistence
//! therefore never sees an absent value.

pub mod parse;

use crate::api::AskAsync;
use crate::models::{Article, Briefing};
use crate::utils::{truncate_chars, truncate_for_log};
use chrono::NaiveDate;
use itertools::Itertools;
use tracing::{error, info, instrument};

/// Fixed analyst persona prefixed to every prompt.
const PERSONA: &str = "You are a senior political analyst for 'New Economy Canada'. \
Your raison d'etre is to ramp up awareness of and support for solutions \
and good things happening in the clean economy. \
You communicate the urgency for Canada to act now to remain relevant in the global economy. \
You are trying to accelerate the clean energy transition and make Canada a leader in this transition. \
You always look for concrete policy actions, investment trends, and potential challenges or 'greenwashing'.";

/// Fixed task template naming the section headings the parser expects.
const TASK_TEMPLATE: &str = "Based on the following news articles, generate a 'Morning Briefing' for today. \
Your output should be structured to help 'New Economy Canada' monitor, observe, and react to news, \
and understand the narrative being shaped. \
Prioritize quality and focus. Here's the structure I need:\n\n\
**Briefing Title:** AI Morning Briefing - [Today's Date]\n\n\
**Executive Summary:** A concise overview of the most critical developments (2-3 sentences).\n\n\
**Key Developments:**\n\
- [Bullet point 1: Major news item, e.g., 'Government announces X funding for Y project']\n\
- [Bullet point 2: Key policy shift, e.g., 'New provincial legislation on Z']\n\
- [Bullet point 3: Industry trends or notable investments, e.g., 'Company A invests in B technology']\n\
- ... (up to 5 bullet points)\n\n\
**Strategic Implications for New Economy Canada:** (Analyze potential impacts, what to watch for, narrative shaping elements)\n\
- [Implication 1]\n\
- [Implication 2]\n\n\
**Suggested Reactions:** (Based on the news, recommend positive or concerned tones)\n\
- **Positive:** [If supportive public policy, funding, etc., suggest an action/stance]\n\
- **Concerned:** [If harmful public policy, 'greenwashing', etc., suggest an action/stance]\n\n\
**Relevant Article URLs:**\n\
- [Link 1: Brief description]\n\
- [Link 2: Brief description]\n\
- ...\n\n\
Here are the articles for your analysis:\n\n";

/// Outcome of the synthesis step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisOutcome {
    /// Generation never ran; the reason is human-readable.
    Skipped(String),
    /// The raw generated briefing document.
    Generated(String),
    /// The generation call failed; carries the error description.
    Failed(String),
}

/// URLs of the records being submitted, in submission order.
pub fn related_urls(records: &[Article]) -> Vec<String> {
    records.iter().map(|a| a.url.clone()).collect()
}

/// Build the full prompt for a set of records.
///
/// Deterministic: the same records and budget always produce the same
/// prompt.
pub fn build_prompt(records: &[Article], max_content_chars: usize) -> String {
    let article_blocks = records
        .iter()
        .enumerate()
        .map(|(i, article)| {
            let body = match &article.full_content {
                Some(content) => format!("Content: {}", truncate_chars(content, max_content_chars)),
                None => format!("Description: {}", article.description),
            };
            format!(
                "--- Article {} ---\nTitle: {}\n{}\nURL: {}\n",
                i + 1,
                article.title,
                body,
                article.url
            )
        })
        .join("\n");

    format!("{PERSONA}\n\n{TASK_TEMPLATE}{article_blocks}")
}

/// Run generation over the selected records.
///
/// `client` is the capability handle resolved at startup; `None` means the
/// service is not configured and the step is skipped, not failed. A single
/// attempt is made; failures are reported, never retried.
#[instrument(level = "info", skip_all, fields(records = records.len()))]
pub async fn synthesize<C>(
    client: Option<&C>,
    records: &[Article],
    max_content_chars: usize,
) -> SynthesisOutcome
where
    C: AskAsync<Response = String>,
{
    let Some(client) = client else {
        info!("Generation capability not configured; skipping AI analysis");
        return SynthesisOutcome::Skipped(
            "the generation service is not configured (GEMINI_API_KEY or model list missing)"
                .to_string(),
        );
    };
    if records.is_empty() {
        info!("No articles to analyze for the daily briefing");
        return SynthesisOutcome::Skipped("no relevant articles were found today".to_string());
    }

    let prompt = build_prompt(records, max_content_chars);
    match client.ask(&prompt).await {
        Ok(raw) => {
            info!(
                preview = %truncate_for_log(&raw, 300),
                "Generation produced a briefing document"
            );
            SynthesisOutcome::Generated(raw)
        }
        Err(e) => {
            error!(error = %e, "Generation call failed");
            SynthesisOutcome::Failed(e.to_string())
        }
    }
}

/// Convert a synthesis outcome into the day's [`Briefing`].
pub fn into_briefing(
    outcome: SynthesisOutcome,
    related_urls: Vec<String>,
    today: NaiveDate,
) -> Briefing {
    match outcome {
        SynthesisOutcome::Generated(raw) => parse::parse_briefing(&raw, related_urls, today),
        SynthesisOutcome::Failed(err) => Briefing::generation_failed(today, &err, related_urls),
        SynthesisOutcome::Skipped(reason) => {
            Briefing::analysis_skipped(today, &reason, related_urls)
        }
    }
}
