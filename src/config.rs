//! Scraper configuration
//!
//! Every field has a default, so an empty JSON object is a valid
//! configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScrapeError};

/// Environment variable overriding [`FetchConfig::user_agent`]
pub const USER_AGENT_ENV: &str = "STOREFRONT_USER_AGENT";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    pub fetch: FetchConfig,
    pub limits: ExtractionLimits,
    /// Appended to the built-in blocked-page phrases
    pub extra_block_phrases: Vec<String>,
}

impl ScraperConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(ScrapeError::Config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Apply overrides from the process environment
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(agent) = std::env::var(USER_AGENT_ENV) {
            if !agent.trim().is_empty() {
                self.fetch.user_agent = agent;
            }
        }
        self
    }
}

/// HTTP settings for fetching product pages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Sent on the retry after a first attempt produced nothing usable
    pub alternate_user_agent: String,
    pub accept_language: String,
    pub referer: String,
    pub max_redirects: u32,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 20,
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125.0.0.0 Safari/537.36".to_string(),
            alternate_user_agent: "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Mobile/15E148 Safari/604.1".to_string(),
            accept_language: "ko-KR,ko;q=0.9,en-US;q=0.8,en;q=0.7".to_string(),
            referer: "https://www.google.com/".to_string(),
            max_redirects: 5,
        }
    }
}

/// Size limits applied by the extraction engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionLimits {
    pub max_images: usize,
    pub max_detail_images: usize,
    /// Length of the summary used as description, in characters
    pub summary_chars: usize,
}

impl Default for ExtractionLimits {
    fn default() -> Self {
        Self {
            max_images: 10,
            max_detail_images: 5,
            summary_chars: 200,
        }
    }
}
