//! Text-generation capability handle.
//!
//! The generation service is modeled as a single capability resolved once
//! at startup: an API key plus an ordered model-preference list collapse
//! into one [`GenerationClient`], or into nothing when the service is not
//! configured. Callers hold the resolved handle; no code path scans for
//! models at request time.
//!
//! # Architecture
//!
//! The module uses a trait-based design for flexibility:
//! - [`AskAsync`]: core trait defining async generation
//! - [`GenerationClient`]: speaks the Gemini `generateContent` REST shape
//!
//! The synthesizer is generic over [`AskAsync`], so tests substitute a
//! deterministic stand-in instead of a network client. Generation is a
//! single attempt; a failed call is reported to the caller, which degrades
//! to an explicit error briefing rather than retrying.

use serde::Deserialize;
use std::error::Error;
use std::time::Instant;
use tracing::{info, instrument, warn};

const GENERATION_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Trait for async text generation.
///
/// Implementors take a prompt and return the generated document, or an
/// error if the request failed.
pub trait AskAsync {
    /// The type of response returned by the generation backend.
    type Response;

    /// Send a prompt and receive the generated text.
    async fn ask(&self, text: &str) -> Result<Self::Response, Box<dyn Error>>;
}

/// Resolved generation handle for one run.
#[derive(Debug, Clone)]
pub struct GenerationClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl GenerationClient {
    /// Resolve the capability from credentials and the configured
    /// preference list. Returns `None` when the key is absent or the list
    /// is empty; generation is then disabled for the run, not an error.
    pub fn resolve(
        http: &reqwest::Client,
        api_key: Option<&str>,
        preferences: &[String],
    ) -> Option<Self> {
        let api_key = api_key?.trim();
        if api_key.is_empty() {
            return None;
        }
        let model = preferences.iter().find(|m| !m.trim().is_empty())?;
        info!(model = %model, "Resolved generation model");
        Some(Self {
            http: http.clone(),
            api_key: api_key.to_string(),
            model: model.trim().to_string(),
        })
    }

    /// The model this handle was resolved to.
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl AskAsync for GenerationClient {
    type Response = String;

    #[instrument(level = "info", skip_all, fields(model = %self.model))]
    async fn ask(&self, text: &str) -> Result<String, Box<dyn Error>> {
        let t0 = Instant::now();
        let url = format!(
            "{GENERATION_ENDPOINT}/{}:generateContent?key={}",
            self.model, self.api_key
        );
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": text }] }]
        });

        let response = self.http.post(&url).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            warn!(
                %status,
                elapsed_ms = t0.elapsed().as_millis() as u128,
                "Generation request rejected"
            );
            return Err(format!("generation service returned {status}: {detail}").into());
        }

        let decoded: GenerateResponse = response.json().await?;
        let generated: String = decoded
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .filter_map(|p| p.text)
            .collect();

        if generated.is_empty() {
            return Err("generation response contained no text".into());
        }

        info!(
            elapsed_ms = t0.elapsed().as_millis() as u128,
            chars = generated.chars().count(),
            "Generation call succeeded"
        );
        Ok(generated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_requires_key() {
        let http = reqwest::Client::new();
        let prefs = vec!["gemini-pro".to_string()];
        assert!(GenerationClient::resolve(&http, None, &prefs).is_none());
        assert!(GenerationClient::resolve(&http, Some("  "), &prefs).is_none());
    }

    #[test]
    fn test_resolve_requires_nonempty_preferences() {
        let http = reqwest::Client::new();
        assert!(GenerationClient::resolve(&http, Some("key"), &[]).is_none());
        assert!(GenerationClient::resolve(&http, Some("key"), &[String::new()]).is_none());
    }

    #[test]
    fn test_resolve_picks_first_preference() {
        let http = reqwest::Client::new();
        let prefs = vec!["gemini-pro".to_string(), "gemini-1.5-pro".to_string()];
        let client = GenerationClient::resolve(&http, Some("key"), &prefs).unwrap();
        assert_eq!(client.model(), "gemini-pro");
    }

    #[test]
    fn test_response_text_concatenation() {
        let json = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "**Briefing Title:** Hello"}, {"text": " world"}]}}
            ]
        }"#;
        let decoded: GenerateResponse = serde_json::from_str(json).unwrap();
        let text: String = decoded
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .filter_map(|p| p.text)
            .collect();
        assert_eq!(text, "**Briefing Title:** Hello world");
    }
}
