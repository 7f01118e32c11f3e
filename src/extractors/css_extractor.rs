//! CSS selector-based lookups over a parsed document
//!
//! Selectors that fail to parse behave as if nothing matched.

use scraper::{ElementRef, Html, Selector};

/// Collapse runs of whitespace into single spaces and trim the ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whitespace-collapsed text content of an element
pub fn element_text(element: &ElementRef) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

/// Every element matching a selector, in document order
pub fn select_all<'a>(document: &'a Html, selector_str: &str) -> Vec<ElementRef<'a>> {
    let selector = match Selector::parse(selector_str) {
        Ok(s) => s,
        Err(_) => return vec![],
    };

    document.select(&selector).collect()
}

/// First element matching a selector
pub fn select_first<'a>(document: &'a Html, selector_str: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(selector_str).ok()?;
    document.select(&selector).next()
}

/// Text of the first element matching a selector
pub fn first_text(document: &Html, selector_str: &str) -> Option<String> {
    select_first(document, selector_str).map(|el| element_text(&el))
}

/// Text of the first matching element whose text is not blank
pub fn first_non_empty_text(document: &Html, selector_str: &str) -> Option<String> {
    select_all(document, selector_str)
        .iter()
        .map(element_text)
        .find(|text| !text.is_empty())
}

/// Concatenated text of every matching element
pub fn joined_text(document: &Html, selector_str: &str) -> Option<String> {
    let elements = select_all(document, selector_str);
    if elements.is_empty() {
        return None;
    }

    let raw: String = elements
        .iter()
        .flat_map(|el| el.text())
        .collect();
    Some(collapse_whitespace(&raw))
}

/// First non-blank value among `attr_names`, checked in order
pub fn first_attr<'a>(element: &ElementRef<'a>, attr_names: &[&str]) -> Option<&'a str> {
    attr_names
        .iter()
        .filter_map(|name| element.value().attr(name))
        .map(str::trim)
        .find(|value| !value.is_empty())
}

/// Every non-blank value among `attr_names`, in order
pub fn all_attrs<'a>(element: &ElementRef<'a>, attr_names: &[&str]) -> Vec<&'a str> {
    attr_names
        .iter()
        .filter_map(|name| element.value().attr(name))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .collect()
}
