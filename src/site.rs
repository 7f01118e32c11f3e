//! Site classification
//!
//! Maps a product URL to the ruleset used to read its page. Every non-empty
//! URL that matches no known marker falls back to [`SiteKind::DEFAULT`], so in
//! practice only an empty input yields [`SiteKind::Unknown`].

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteKind {
    Unknown,
    Danawa,
    Naver,
}

impl SiteKind {
    /// Ruleset used for URLs that match no marker.
    pub const DEFAULT: SiteKind = SiteKind::Danawa;

    pub fn as_str(&self) -> &'static str {
        match self {
            SiteKind::Unknown => "unknown",
            SiteKind::Danawa => "danawa",
            SiteKind::Naver => "naver",
        }
    }
}

/// Domain markers checked in order, first hit wins.
const SITE_MARKERS: &[(&str, SiteKind)] = &[
    ("naver.com", SiteKind::Naver),
    ("smartstore.naver", SiteKind::Naver),
    ("danawa.com", SiteKind::Danawa),
    ("shop.danawa", SiteKind::Danawa),
];

/// Classify a product URL by case-insensitive substring match
pub fn classify_site(url: &str) -> SiteKind {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return SiteKind::Unknown;
    }

    let lower = trimmed.to_lowercase();
    SITE_MARKERS
        .iter()
        .find(|(marker, _)| lower.contains(marker))
        .map(|(_, kind)| *kind)
        .unwrap_or(SiteKind::DEFAULT)
}
