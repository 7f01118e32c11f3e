//! OpenGraph meta tags extraction
//!
//! Reads og:, twitter: and product: meta tags into a typed view and builds
//! the metadata-only product record used when site rules yield nothing.

use std::collections::HashMap;

use scraper::{Html, Selector};
use serde::Serialize;
use url::Url;

use super::price_extractor::digits_only;
use super::title_extractor::finish_title;
use super::ProductRecord;
use crate::urls::{absolutize_url, parse_base};

/// Meta tags of a page, first value per key
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OpenGraph {
    /// `og:*` keys without the prefix
    pub og: HashMap<String, String>,
    /// Every `og:image` value in document order
    pub images: Vec<String>,
    /// `twitter:*` keys without the prefix
    pub twitter: HashMap<String, String>,
    /// `product:*` keys without the prefix, e.g. `price:amount`
    pub product: HashMap<String, String>,
}

impl OpenGraph {
    pub fn from_document(document: &Html) -> Self {
        let mut result = OpenGraph::default();

        let selector = match Selector::parse("meta") {
            Ok(s) => s,
            Err(_) => return result,
        };

        for element in document.select(&selector) {
            let content = element.value().attr("content").unwrap_or("").trim();
            if content.is_empty() {
                continue;
            }

            // Some sites put og: tags in `name` instead of `property`
            let key = element
                .value()
                .attr("property")
                .or_else(|| element.value().attr("name"))
                .unwrap_or("");

            if let Some(og_key) = key.strip_prefix("og:") {
                if og_key == "image" {
                    result.images.push(content.to_string());
                }
                insert_first(&mut result.og, og_key, content);
            } else if let Some(tw_key) = key.strip_prefix("twitter:") {
                insert_first(&mut result.twitter, tw_key, content);
            } else if let Some(product_key) = key.strip_prefix("product:") {
                insert_first(&mut result.product, product_key, content);
            }
        }

        result
    }

    pub fn og_title(&self) -> Option<&str> {
        self.og.get("title").map(String::as_str)
    }

    pub fn twitter_title(&self) -> Option<&str> {
        self.twitter.get("title").map(String::as_str)
    }

    /// `og:title`, then `twitter:title`
    pub fn title(&self) -> Option<&str> {
        self.og_title().or_else(|| self.twitter_title())
    }

    /// Digits of `product:price:amount`, empty when absent
    pub fn price_digits(&self) -> String {
        self.product
            .get("price:amount")
            .map(|amount| digits_only(amount))
            .unwrap_or_default()
    }

    /// Every `og:image` made absolute against `base`
    pub fn absolute_images(&self, base: Option<&Url>) -> Vec<String> {
        self.images
            .iter()
            .filter_map(|image| absolutize_url(image, base))
            .collect()
    }
}

fn insert_first(map: &mut HashMap<String, String>, key: &str, value: &str) {
    map.entry(key.to_string()).or_insert_with(|| value.to_string());
}

/// Extract OpenGraph, Twitter Card and product meta tags from HTML
pub fn extract_opengraph(html: &str) -> OpenGraph {
    let document = Html::parse_document(html);
    OpenGraph::from_document(&document)
}

/// Build a product record from page metadata alone.
///
/// Title comes from `og:title` or `twitter:title`, the price from
/// `product:price:amount` and the image list from the first `og:image`.
pub fn extract_opengraph_product(html: &str, source_url: &str) -> ProductRecord {
    let meta = extract_opengraph(html);
    let base = parse_base(source_url);

    let (title, description) = finish_title(meta.title().unwrap_or(""), || None);
    let images = meta.absolute_images(base.as_ref()).into_iter().take(1).collect();

    tracing::debug!(
        has_title = meta.title().is_some(),
        og_images = meta.images.len(),
        "metadata-only extraction"
    );

    ProductRecord {
        title,
        description,
        list_price: meta.price_digits(),
        images,
        ..ProductRecord::default()
    }
}
