//! Page fetching
//!
//! [`HtmlSource`] is the seam between the scraper and the network so the
//! orchestration can run against canned pages.

use std::time::Duration;

use url::Url;

use crate::config::FetchConfig;
use crate::error::{Result, ScrapeError};

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";

/// Browser identity a page is requested with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentProfile {
    /// Desktop browser
    Primary,
    /// Mobile browser, used when the desktop page was unusable
    Alternate,
}

/// Something that can produce the HTML of a URL
pub trait HtmlSource {
    fn fetch(&self, url: &str, agent: AgentProfile) -> Result<String>;
}

/// Blocking HTTP fetcher
pub struct HttpFetcher {
    primary: ureq::Agent,
    alternate: ureq::Agent,
    accept_language: String,
    referer: String,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Self {
        Self {
            primary: build_agent(config, &config.user_agent),
            alternate: build_agent(config, &config.alternate_user_agent),
            accept_language: config.accept_language.clone(),
            referer: config.referer.clone(),
        }
    }

    fn agent(&self, profile: AgentProfile) -> &ureq::Agent {
        match profile {
            AgentProfile::Primary => &self.primary,
            AgentProfile::Alternate => &self.alternate,
        }
    }
}

fn build_agent(config: &FetchConfig, user_agent: &str) -> ureq::Agent {
    ureq::Agent::new_with_config(
        ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
            .user_agent(user_agent)
            .max_redirects(config.max_redirects)
            .http_status_as_error(false)
            .build(),
    )
}

impl HtmlSource for HttpFetcher {
    fn fetch(&self, url: &str, agent: AgentProfile) -> Result<String> {
        Url::parse(url).map_err(|source| ScrapeError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        tracing::debug!(url, ?agent, "fetching page");

        let resp = self
            .agent(agent)
            .get(url)
            .header("Accept", ACCEPT_HTML)
            .header("Accept-Language", self.accept_language.as_str())
            .header("Referer", self.referer.as_str())
            .call()
            .map_err(|source| ScrapeError::Transport {
                url: url.to_string(),
                source,
            })?;

        if !resp.status().is_success() {
            return Err(ScrapeError::HttpStatus {
                url: url.to_string(),
                status: resp.status().as_u16(),
            });
        }

        resp.into_body()
            .read_to_string()
            .map_err(|source| ScrapeError::Transport {
                url: url.to_string(),
                source,
            })
    }
}
