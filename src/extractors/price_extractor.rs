//! Price extraction
//!
//! Prices are integer won amounts, so a price is just the ASCII digits of
//! the first candidate element that has any.

use scraper::Html;

use super::css_extractor::{element_text, select_all};
use super::opengraph_extractor::OpenGraph;
use crate::rules::Ruleset;

/// Keep only ASCII digits: `"₩129,000"` becomes `"129000"`
pub fn digits_only(text: &str) -> String {
    text.chars().filter(char::is_ascii_digit).collect()
}

/// Digits of the first price element that has any, then the
/// `product:price:amount` meta tag, else empty.
pub(crate) fn extract_price(document: &Html, meta: &OpenGraph, rules: &Ruleset) -> String {
    for css in rules.price_selectors {
        for element in select_all(document, css) {
            let digits = digits_only(&element_text(&element));
            if !digits.is_empty() {
                tracing::debug!(selector = *css, price = %digits, "price found");
                return digits;
            }
        }
    }

    meta.price_digits()
}
