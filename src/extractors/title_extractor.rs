//! Title and short description extraction
//!
//! Candidates come from the ruleset's ordered title sources and are reduced
//! to one string by the ruleset's [`TitlePolicy`]. That string is then split
//! into a product name and a description.

use scraper::Html;

use super::css_extractor::{
    collapse_whitespace, first_non_empty_text, first_text, joined_text,
};
use super::opengraph_extractor::OpenGraph;
use super::TITLE_FALLBACK;
use crate::rules::{Ruleset, TitlePolicy, TitleSource};

/// Title and description for a parsed page
pub(crate) fn extract_title_and_description(
    document: &Html,
    meta: &OpenGraph,
    rules: &Ruleset,
    summary_chars: usize,
) -> (String, String) {
    let candidates = collect_candidates(document, meta, rules);

    let full = match select_candidate(&candidates, rules.title_policy) {
        Some(winner) => winner.to_string(),
        None => first_text(document, "title")
            .map(|title| strip_suffix(&title, rules))
            .unwrap_or_default(),
    };

    tracing::debug!(
        site = rules.site.as_str(),
        candidates = candidates.len(),
        chars = full.chars().count(),
        "title candidate selected"
    );

    finish_title(&full, || summary_text(document, rules, summary_chars))
}

fn collect_candidates(document: &Html, meta: &OpenGraph, rules: &Ruleset) -> Vec<String> {
    rules
        .title_sources
        .iter()
        .filter_map(|source| match source {
            TitleSource::MetaProperty(key) => key
                .strip_prefix("og:")
                .and_then(|og_key| meta.og.get(og_key))
                .cloned(),
            TitleSource::MetaName(key) => key
                .strip_prefix("twitter:")
                .and_then(|tw_key| meta.twitter.get(tw_key))
                .cloned(),
            TitleSource::FirstText(css) => first_text(document, css),
            TitleSource::FirstNonEmptyText(css) => first_non_empty_text(document, css),
            TitleSource::AllText(css) => joined_text(document, css),
        })
        .map(|candidate| strip_suffix(&collapse_whitespace(&candidate), rules))
        .filter(|candidate| !candidate.is_empty())
        .collect()
}

fn strip_suffix(candidate: &str, rules: &Ruleset) -> String {
    match &rules.title_suffix {
        Some(suffix) => suffix.replace(candidate, "").trim().to_string(),
        None => candidate.trim().to_string(),
    }
}

/// Reduce candidates to one according to the policy
pub fn select_candidate(candidates: &[String], policy: TitlePolicy) -> Option<&str> {
    let mut non_empty = candidates.iter().filter(|c| !c.trim().is_empty());

    match policy {
        TitlePolicy::FirstNonEmpty => non_empty.next().map(String::as_str),
        TitlePolicy::Longest => non_empty
            .fold(None::<&String>, |longest, current| match longest {
                Some(l) if current.chars().count() <= l.chars().count() => Some(l),
                _ => Some(current),
            })
            .map(String::as_str),
    }
}

/// Split a full title string into product name and description.
///
/// Returns `None` for the description when the string has no separator, in
/// which case callers look for a description elsewhere.
pub fn split_title(full: &str) -> (String, Option<String>) {
    let full = full.trim();

    if let Some(open) = full.find('(') {
        let head = full[..open].trim();
        if full.contains(')') && !head.is_empty() {
            let rest = full[open + 1..].trim();
            return (head.to_string(), Some(format!("({}", rest)));
        }
    }

    if let Some(slash) = full.find('/') {
        let head = full[..slash].trim();
        if !head.is_empty() {
            let rest = full[slash + 1..]
                .split('/')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(" / ");
            return (head.to_string(), Some(rest));
        }
    }

    (full.to_string(), None)
}

/// Split `full`, fall back to `summary` for the description and substitute
/// the sentinel for an empty title.
pub(crate) fn finish_title<F>(full: &str, summary: F) -> (String, String)
where
    F: FnOnce() -> Option<String>,
{
    let (title, description) = match split_title(full) {
        (title, Some(description)) => (title, description),
        (title, None) => (title, summary().unwrap_or_default()),
    };

    if title.is_empty() {
        (TITLE_FALLBACK.to_string(), description)
    } else {
        (title, description)
    }
}

fn summary_text(document: &Html, rules: &Ruleset, max_chars: usize) -> Option<String> {
    rules
        .summary_selectors
        .iter()
        .filter_map(|css| first_text(document, css))
        .find(|text| !text.is_empty())
        .map(|text| truncate_chars(&text, max_chars))
}

/// Cut to `max_chars` characters, appending `...` when anything was cut
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars).collect();
    cut.push_str("...");
    cut
}
