//! Product page extraction for storefront pages
//!
//! Turns the raw HTML of a product page into a normalized record:
//! - site classification (Danawa, Naver Smart Store)
//! - title, description and list price
//! - gallery and detail images with absolute URLs
//! - sanitized description HTML
//! - blocked and "product not found" page detection
//!
//! Fetching with strategy fallbacks, page records with a URL-safe payload
//! encoding and a C ABI are layered on top.

pub mod blocked;
pub mod config;
pub mod error;
pub mod extractors;
pub mod ffi;
pub mod fetch;
pub mod logging;
pub mod payload;
pub mod rules;
pub mod scrape;
pub mod site;
pub mod store;
pub mod urls;

pub use blocked::{looks_blocked_or_missing, BlockDetector};
pub use config::{ExtractionLimits, FetchConfig, ScraperConfig};
pub use error::{Result, ScrapeError};
pub use extractors::{
    extract_opengraph, extract_opengraph_product, extract_product, normalize_detail_html, Extractor,
    OpenGraph, ProductRecord, TITLE_FALLBACK,
};
pub use fetch::{AgentProfile, HtmlSource, HttpFetcher};
pub use logging::init_logging;
pub use payload::{decode_payload, encode_payload, ManualOverrides, PageRecord};
pub use scrape::{ProductScraper, ScrapeReport, Strategy};
pub use site::{classify_site, SiteKind};
pub use store::{generate_id, MemoryPageStore, PageStore};
