//! Page records and their URL-safe payload encoding
//!
//! A page record can travel inside a link instead of a store: the record is
//! serialized to JSON and encoded as URL-safe base64 without padding.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScrapeError};
use crate::extractors::{digits_only, ProductRecord};

/// Encodes without padding and accepts input with or without it
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

pub const DEFAULT_TEMPLATE: &str = "naver";

fn default_template() -> String {
    DEFAULT_TEMPLATE.to_string()
}

/// A generated product page: the scraped record plus page metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default = "default_template")]
    pub template: String,
    #[serde(default)]
    pub product_url: String,
    /// Price set by the page author, digits only
    #[serde(default)]
    pub custom_price: String,
    #[serde(flatten)]
    pub product: ProductRecord,
}

/// Values typed in by the user. Non-blank values replace scraped ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ManualOverrides {
    pub title: String,
    pub list_price: String,
    pub custom_price: String,
}

impl PageRecord {
    pub fn from_scrape(
        id: impl Into<String>,
        product_url: impl Into<String>,
        mut product: ProductRecord,
        overrides: &ManualOverrides,
    ) -> Self {
        let manual_title = overrides.title.trim();
        if !manual_title.is_empty() {
            product.title = manual_title.to_string();
        }

        let manual_price = digits_only(&overrides.list_price);
        product.list_price = if manual_price.is_empty() {
            digits_only(&product.list_price)
        } else {
            manual_price
        };

        Self {
            id: id.into(),
            template: default_template(),
            product_url: product_url.into(),
            custom_price: digits_only(&overrides.custom_price),
            product,
        }
    }
}

/// JSON, then URL-safe base64 without padding
pub fn encode_payload(record: &PageRecord) -> Result<String> {
    let json = serde_json::to_vec(record).map_err(ScrapeError::Encode)?;
    Ok(PAYLOAD_ENGINE.encode(json))
}

/// Reverse of [`encode_payload`]. Anything that does not decode to a JSON
/// object with a `title` gives `None`.
pub fn decode_payload(encoded: &str) -> Option<PageRecord> {
    let bytes = match PAYLOAD_ENGINE.decode(encoded.trim()) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::debug!(error = %e, "payload is not valid base64");
            return None;
        }
    };

    match serde_json::from_slice(&bytes) {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::debug!(error = %e, "payload is not a page record");
            None
        }
    }
}
