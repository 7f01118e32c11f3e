//! Per-site extraction rulesets
//!
//! Every list here is ordered: earlier entries are more specific to the site
//! and win over later, more generic ones. Update this file when a site
//! changes its markup.

use std::sync::LazyLock;

use regex::Regex;

use crate::site::SiteKind;

/// How the winning title candidate is picked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitlePolicy {
    /// First candidate with non-empty text
    FirstNonEmpty,
    /// Longest candidate; ties keep the earlier one
    Longest,
}

/// A location a title candidate is read from
#[derive(Debug, Clone, Copy)]
pub enum TitleSource {
    /// `<meta property="...">` content
    MetaProperty(&'static str),
    /// `<meta name="...">` content
    MetaName(&'static str),
    /// Text of the first element matching the selector
    FirstText(&'static str),
    /// Text of the first matching element whose text is not blank
    FirstNonEmptyText(&'static str),
    /// Concatenated text of every matching element
    AllText(&'static str),
}

#[derive(Debug)]
pub struct Ruleset {
    pub site: SiteKind,
    pub title_sources: &'static [TitleSource],
    pub title_policy: TitlePolicy,
    /// Branding appended to page titles, stripped from every candidate
    pub title_suffix: Option<Regex>,
    /// Short spec/summary blocks used when the title cannot be split
    pub summary_selectors: &'static [&'static str],
    pub price_selectors: &'static [&'static str],
    /// Attribute names holding an image reference, direct source first
    pub image_attrs: &'static [&'static str],
    /// Gallery and thumbnail image selectors
    pub gallery_selectors: &'static [&'static str],
    /// Host pattern for the page-wide `img` sweep; no sweep when `None`
    pub image_host: Option<Regex>,
    /// Images of the long-form description, collected into `detail_images`
    pub detail_image_selectors: &'static [&'static str],
    /// Whether detail images must also match `image_host`
    pub detail_images_need_host: bool,
    /// Containers holding the long-form description HTML
    pub detail_containers: &'static [&'static str],
}

const BASE_IMAGE_ATTRS: &[&str] = &["src", "data-src", "data-original", "data-lazy", "data-lazy-src"];

const NAVER_IMAGE_ATTRS: &[&str] = &[
    "src",
    "data-src",
    "data-original",
    "data-lazy",
    "data-lazy-src",
    "data-origin",
    "data-thumb",
    "data-large",
    "data-zoom",
];

/// Every attribute name that only exists to drive lazy loading
pub const LAZY_LOAD_ATTRS: &[&str] = &[
    "loading",
    "data-src",
    "data-original",
    "data-lazy",
    "data-lazy-src",
    "data-origin",
    "data-thumb",
    "data-large",
    "data-zoom",
    "data-srcset",
];

pub static DANAWA: LazyLock<Ruleset> = LazyLock::new(|| Ruleset {
    site: SiteKind::Danawa,
    title_sources: &[
        TitleSource::MetaProperty("og:title"),
        TitleSource::FirstText("h1, h2, .prod_tit, .product_title"),
        TitleSource::AllText(".prod_view_head"),
    ],
    title_policy: TitlePolicy::Longest,
    title_suffix: Some(
        Regex::new(r"(?i)\s*[:|\-]\s*샵?다나와.*$").expect("danawa title suffix: hardcoded regex is valid"),
    ),
    summary_selectors: &[".prod_spec", ".spec_list", ".product_spec"],
    price_selectors: &[".price", ".prod_price", r#"[class*="price"]"#],
    image_attrs: BASE_IMAGE_ATTRS,
    gallery_selectors: &[".prod_view_thumb img", ".product_img img", ".thumb_img img"],
    image_host: Some(
        Regex::new(r"(?i)danawa\.com|img\.danawa").expect("danawa image host: hardcoded regex is valid"),
    ),
    detail_image_selectors: &[".prod_con_img img"],
    detail_images_need_host: false,
    detail_containers: &[".prod_con_img", ".product_detail", ".detail_content"],
});

pub static NAVER: LazyLock<Ruleset> = LazyLock::new(|| Ruleset {
    site: SiteKind::Naver,
    title_sources: &[
        TitleSource::MetaProperty("og:title"),
        TitleSource::MetaName("twitter:title"),
        TitleSource::FirstNonEmptyText("h1, h2, h3"),
    ],
    title_policy: TitlePolicy::FirstNonEmpty,
    title_suffix: None,
    summary_selectors: &[],
    price_selectors: &[r#"[class*="price" i]"#],
    image_attrs: NAVER_IMAGE_ATTRS,
    gallery_selectors: &[],
    image_host: Some(
        Regex::new(r"(?i)pstatic\.net|shop-phinf|shopping-phinf|static\.naver|cdn\.naver|blogfiles\.naver")
            .expect("naver image host: hardcoded regex is valid"),
    ),
    detail_image_selectors: &[
        ".se-main-container img",
        r#"[data-nv-handle="PRODUCT_DETAIL"] img"#,
        "#INTRODUCE img",
    ],
    detail_images_need_host: true,
    detail_containers: &[
        ".se-main-container",
        r#"[data-nv-handle="PRODUCT_DETAIL"]"#,
        "#INTRODUCE",
        "#info",
        "#content",
    ],
});

/// Ruleset for a site. `Unknown` reads pages with the default ruleset.
pub fn ruleset_for(site: SiteKind) -> &'static Ruleset {
    match site {
        SiteKind::Naver => &NAVER,
        SiteKind::Danawa | SiteKind::Unknown => &DANAWA,
    }
}
