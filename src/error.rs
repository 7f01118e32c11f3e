//! Error type for the fallible edges of the crate
//!
//! Extraction itself never fails. Only fetching, configuration loading and
//! payload encoding can return an error.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: ureq::Error,
    },

    #[error("{url} answered with HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("invalid url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to parse configuration: {0}")]
    Config(#[source] serde_json::Error),

    #[error("failed to read configuration file: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("failed to encode page payload: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("no strategy produced usable product data for {url}")]
    Exhausted { url: String },
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
