//! Command-line interface definitions for Morning Brief.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Service credentials can be provided via flags or environment variables;
//! each external integration is independently optional and is disabled when
//! its credential is absent.

use clap::Parser;

/// Command-line arguments for the Morning Brief pipeline.
///
/// # Examples
///
/// ```sh
/// # Basic usage with the default config.yaml
/// morning_brief
///
/// # Explicit config path, credentials from the environment
/// NEWS_API_KEY=... GEMINI_API_KEY=... morning_brief --config ./config.yaml
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to the YAML run configuration
    #[arg(short, long, default_value = "config.yaml")]
    pub config: String,

    /// News search API key (absent: the search source is skipped)
    #[arg(long, env = "NEWS_API_KEY")]
    pub news_api_key: Option<String>,

    /// Generation service API key (absent: AI analysis is skipped)
    #[arg(long, env = "GEMINI_API_KEY")]
    pub gemini_api_key: Option<String>,

    /// Scraping service API key (absent: enrichment is skipped)
    #[arg(long, env = "SCRAPINGBEE_API_KEY")]
    pub scrapingbee_api_key: Option<String>,

    /// Datastore base URL (absent: persistence is disabled)
    #[arg(long, env = "SUPABASE_URL")]
    pub supabase_url: Option<String>,

    /// Datastore service key
    #[arg(long, env = "SUPABASE_KEY")]
    pub supabase_key: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["morning_brief"]);
        assert_eq!(cli.config, "config.yaml");
    }

    #[test]
    fn test_cli_config_flag() {
        let cli = Cli::parse_from(["morning_brief", "--config", "/etc/brief.yaml"]);
        assert_eq!(cli.config, "/etc/brief.yaml");
    }

    #[test]
    fn test_cli_credential_flags() {
        let cli = Cli::parse_from([
            "morning_brief",
            "--news-api-key",
            "n-key",
            "--supabase-url",
            "https://x.supabase.co",
            "--supabase-key",
            "s-key",
        ]);
        assert_eq!(cli.news_api_key.as_deref(), Some("n-key"));
        assert_eq!(cli.supabase_url.as_deref(), Some("https://x.supabase.co"));
        assert_eq!(cli.supabase_key.as_deref(), Some("s-key"));
    }
}
