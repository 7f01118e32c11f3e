//! Image collection
//!
//! Images are gathered in tiers, each appending to one ordered, deduplicated
//! list until the cap is reached:
//!
//! 1. every `og:image` (no extension check)
//! 2. gallery/thumbnail containers of the ruleset
//! 3. every `img` on the page whose URL matches the site's host pattern
//!
//! Images of the long-form description container go to a separate, smaller
//! list.

use std::collections::HashSet;

use regex::Regex;
use scraper::{ElementRef, Html};
use url::Url;

use super::css_extractor::{first_attr, select_all};
use super::opengraph_extractor::OpenGraph;
use crate::config::ExtractionLimits;
use crate::rules::Ruleset;
use crate::urls::{absolutize_url, has_image_extension};

/// Ordered, deduplicated URL list with a fixed capacity
#[derive(Debug)]
pub(crate) struct ImageList {
    urls: Vec<String>,
    seen: HashSet<String>,
    cap: usize,
}

impl ImageList {
    pub(crate) fn with_cap(cap: usize) -> Self {
        Self {
            urls: Vec::new(),
            seen: HashSet::new(),
            cap,
        }
    }

    /// Append unless already present or full. Returns whether it was added.
    pub(crate) fn push(&mut self, url: String) -> bool {
        if self.is_full() || self.seen.contains(&url) {
            return false;
        }
        self.seen.insert(url.clone());
        self.urls.push(url);
        true
    }

    pub(crate) fn is_full(&self) -> bool {
        self.urls.len() >= self.cap
    }

    pub(crate) fn into_vec(self) -> Vec<String> {
        self.urls
    }
}

/// Acceptance rule for a discovered image reference
#[derive(Debug, Clone, Copy)]
struct ImageFilter<'r> {
    require_extension: bool,
    host: Option<&'r Regex>,
}

impl ImageFilter<'_> {
    fn accepts(&self, url: &str) -> bool {
        if self.require_extension && !has_image_extension(url) {
            return false;
        }
        match self.host {
            Some(host) => host.is_match(url),
            None => true,
        }
    }
}

/// Gallery images and detail images for a parsed page
pub(crate) fn collect_images(
    document: &Html,
    meta: &OpenGraph,
    rules: &Ruleset,
    base: Option<&Url>,
    limits: &ExtractionLimits,
) -> (Vec<String>, Vec<String>) {
    let mut images = ImageList::with_cap(limits.max_images);

    for url in meta.absolute_images(base) {
        images.push(url);
    }
    let from_meta = images.urls.len();

    let gallery_filter = ImageFilter {
        require_extension: true,
        host: None,
    };
    for css in rules.gallery_selectors {
        collect_tier(document, css, rules, base, gallery_filter, &mut images);
    }
    let from_gallery = images.urls.len() - from_meta;

    if let Some(host) = rules.image_host.as_ref() {
        let sweep_filter = ImageFilter {
            require_extension: true,
            host: Some(host),
        };
        collect_tier(document, "img", rules, base, sweep_filter, &mut images);
    }

    let mut detail = ImageList::with_cap(limits.max_detail_images);
    let detail_filter = ImageFilter {
        require_extension: true,
        host: if rules.detail_images_need_host {
            rules.image_host.as_ref()
        } else {
            None
        },
    };
    for css in rules.detail_image_selectors {
        collect_tier(document, css, rules, base, detail_filter, &mut detail);
    }

    tracing::debug!(
        site = rules.site.as_str(),
        meta = from_meta,
        gallery = from_gallery,
        total = images.urls.len(),
        detail = detail.urls.len(),
        "images collected"
    );

    (images.into_vec(), detail.into_vec())
}

fn collect_tier(
    document: &Html,
    css: &str,
    rules: &Ruleset,
    base: Option<&Url>,
    filter: ImageFilter<'_>,
    out: &mut ImageList,
) {
    for element in select_all(document, css) {
        if out.is_full() {
            return;
        }
        if let Some(url) = image_url(&element, rules.image_attrs, base) {
            if filter.accepts(&url) {
                out.push(url);
            }
        }
    }
}

/// First non-blank source attribute of an image element, made absolute
fn image_url(element: &ElementRef, attrs: &[&str], base: Option<&Url>) -> Option<String> {
    let raw = first_attr(element, attrs)?;
    absolutize_url(raw, base)
}
