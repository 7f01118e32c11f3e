//! Fetch-and-extract orchestration
//!
//! Site rules on the desktop page come first. When that yields nothing
//! usable the page is requested again as a mobile browser, and as a last
//! resort only the page metadata is read.

use serde::Serialize;

use crate::blocked::BlockDetector;
use crate::config::ScraperConfig;
use crate::error::{Result, ScrapeError};
use crate::extractors::{extract_opengraph_product, Extractor, ProductRecord};
use crate::fetch::{AgentProfile, HtmlSource, HttpFetcher};
use crate::site::{classify_site, SiteKind};

/// Which attempt produced a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    SiteRules,
    AlternateAgent,
    OpenGraph,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScrapeReport {
    pub site: SiteKind,
    pub strategy: Strategy,
    pub record: ProductRecord,
}

pub struct ProductScraper<S> {
    source: S,
    extractor: Extractor,
    detector: BlockDetector,
}

impl ProductScraper<HttpFetcher> {
    /// Scraper fetching over HTTP with the given configuration
    pub fn from_config(config: &ScraperConfig) -> Self {
        Self::new(HttpFetcher::new(&config.fetch), config)
    }
}

impl<S: HtmlSource> ProductScraper<S> {
    pub fn new(source: S, config: &ScraperConfig) -> Self {
        Self {
            source,
            extractor: Extractor::new(config.limits.clone()),
            detector: BlockDetector::with_extra_phrases(&config.extra_block_phrases),
        }
    }

    pub fn scrape(&self, url: &str) -> Result<ScrapeReport> {
        let site = classify_site(url);
        let mut last_html: Option<String> = None;

        let attempts = [
            (Strategy::SiteRules, AgentProfile::Primary),
            (Strategy::AlternateAgent, AgentProfile::Alternate),
        ];

        for (strategy, agent) in attempts {
            let html = match self.source.fetch(url, agent) {
                Ok(html) => html,
                Err(e) => {
                    tracing::warn!(url, ?strategy, error = %e, "fetch failed");
                    break;
                }
            };

            let record = self.extractor.extract(site, &html, url);
            match self.unusable_reason(&html, &record) {
                None => {
                    tracing::info!(url, site = site.as_str(), ?strategy, "product scraped");
                    return Ok(ScrapeReport {
                        site,
                        strategy,
                        record,
                    });
                }
                Some(reason) => {
                    tracing::info!(url, ?strategy, reason, "extraction unusable, trying next strategy");
                }
            }
            last_html = Some(html);
        }

        let html = match last_html {
            Some(html) => html,
            None => self.source.fetch(url, AgentProfile::Primary)?,
        };

        if let Some(phrase) = self.detector.matched_phrase(&html) {
            tracing::warn!(url, phrase, "page is blocked or missing");
            return Err(ScrapeError::Exhausted {
                url: url.to_string(),
            });
        }

        tracing::info!(url, site = site.as_str(), "falling back to page metadata");
        Ok(ScrapeReport {
            site,
            strategy: Strategy::OpenGraph,
            record: extract_opengraph_product(&html, url),
        })
    }

    fn unusable_reason(&self, html: &str, record: &ProductRecord) -> Option<&'static str> {
        if record.has_fallback_title() {
            Some("no title")
        } else if record.images.is_empty() {
            Some("no images")
        } else if self.detector.looks_blocked(html) {
            Some("blocked page")
        } else if self.detector.looks_blocked(&record.description_html) {
            Some("blocked detail")
        } else {
            None
        }
    }
}
