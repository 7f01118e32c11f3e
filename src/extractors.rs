//! Product page extractors
//!
//! One engine parameterized by [`Ruleset`]: the site kind picks the ruleset,
//! and each field extractor walks that ruleset's ordered strategies until
//! one produces a value. Extraction never fails; missing fields come back
//! empty and a missing title comes back as [`TITLE_FALLBACK`].

mod css_extractor;
mod detail_extractor;
mod image_extractor;
mod opengraph_extractor;
mod price_extractor;
mod title_extractor;

use scraper::Html;
use serde::{Deserialize, Serialize};

pub use detail_extractor::normalize_detail_html;
pub use opengraph_extractor::{extract_opengraph, extract_opengraph_product, OpenGraph};
pub use price_extractor::digits_only;
pub use title_extractor::{select_candidate, split_title, truncate_chars};

use crate::config::ExtractionLimits;
use crate::rules::{ruleset_for, Ruleset};
use crate::site::SiteKind;
use crate::urls::parse_base;

/// Title used when no heuristic produced one
pub const TITLE_FALLBACK: &str = "title extraction failed";

/// Normalized product data scraped from one page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Digits only, empty when unknown
    #[serde(default)]
    pub list_price: String,
    /// Not filled by extraction
    #[serde(default)]
    pub sale_price: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub detail_images: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description_html: String,
}

impl ProductRecord {
    /// True when the title heuristics found nothing
    pub fn has_fallback_title(&self) -> bool {
        self.title == TITLE_FALLBACK
    }
}

/// Extraction engine with configurable limits
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    limits: ExtractionLimits,
}

impl Extractor {
    pub fn new(limits: ExtractionLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &ExtractionLimits {
        &self.limits
    }

    /// Extract a product record from raw HTML using the ruleset for `site`
    pub fn extract(&self, site: SiteKind, html: &str, source_url: &str) -> ProductRecord {
        let document = Html::parse_document(html);
        self.extract_document(&document, ruleset_for(site), source_url)
    }

    fn extract_document(&self, document: &Html, rules: &Ruleset, source_url: &str) -> ProductRecord {
        let meta = OpenGraph::from_document(document);
        let base = parse_base(source_url);

        let (title, description) = title_extractor::extract_title_and_description(
            document,
            &meta,
            rules,
            self.limits.summary_chars,
        );
        let list_price = price_extractor::extract_price(document, &meta, rules);
        let (images, detail_images) =
            image_extractor::collect_images(document, &meta, rules, base.as_ref(), &self.limits);
        let description_html = detail_extractor::extract_detail_html(document, rules, source_url);

        tracing::debug!(
            site = rules.site.as_str(),
            fallback_title = title == TITLE_FALLBACK,
            has_price = !list_price.is_empty(),
            images = images.len(),
            detail_images = detail_images.len(),
            detail_html_bytes = description_html.len(),
            "product extracted"
        );

        ProductRecord {
            title,
            description,
            list_price,
            sale_price: String::new(),
            images,
            detail_images,
            description_html,
        }
    }
}

/// Extract a product record with the default limits
pub fn extract_product(site: SiteKind, html: &str, source_url: &str) -> ProductRecord {
    Extractor::default().extract(site, html, source_url)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DANAWA_URL: &str = "https://prod.danawa.com/info/?pcode=9876";
    const NAVER_URL: &str = "https://smartstore.naver.com/acme/products/555";

    const DANAWA_PAGE: &str = r#"
    <html>
    <head>
        <title>로지텍 G502 X : 다나와 가격비교</title>
        <meta property="og:title" content="로지텍 G502 X : 다나와 가격비교">
        <meta property="og:image" content="//img.danawa.com/prod_img/500000/g502.jpg">
    </head>
    <body>
        <h2 class="prod_tit">로지텍 G502 X</h2>
        <div class="prod_view_head">로지텍 G502 X (유선, 25600DPI, 블랙)</div>
        <div class="lowest_area"><em class="prod_price">89,000</em>원</div>
        <div class="prod_view_thumb">
            <img src="//img.danawa.com/prod_img/500000/g502.jpg">
            <img data-src="/prod_img/500000/g502_side.png">
        </div>
        <div class="prod_con_img">
            <p>상세 설명</p>
            <img data-original="/detail/g502_01.jpg" width="860">
            <script>track()</script>
        </div>
    </body>
    </html>
    "#;

    #[test]
    fn test_danawa_page() {
        let record = extract_product(SiteKind::Danawa, DANAWA_PAGE, DANAWA_URL);

        assert_eq!(record.title, "로지텍 G502 X");
        assert_eq!(record.description, "(유선, 25600DPI, 블랙)");
        assert_eq!(record.list_price, "89000");
        assert_eq!(record.sale_price, "");
        assert_eq!(
            record.images,
            vec![
                "https://img.danawa.com/prod_img/500000/g502.jpg",
                "https://prod.danawa.com/prod_img/500000/g502_side.png",
                "https://prod.danawa.com/detail/g502_01.jpg",
            ]
        );
        assert_eq!(record.detail_images, vec!["https://prod.danawa.com/detail/g502_01.jpg"]);
        assert!(record.description_html.contains(r#"<img src="https://prod.danawa.com/detail/g502_01.jpg">"#));
        assert!(!record.description_html.contains("track()"));
    }

    #[test]
    fn test_naver_page() {
        let html = r#"
        <html>
        <head>
            <meta property="og:title" content="스테인리스 텀블러 500ml / 진공 단열 / 실버">
            <meta property="og:image" content="https://shop-phinf.pstatic.net/main/tumbler.jpg?type=m510">
            <meta property="product:price:amount" content="24900">
        </head>
        <body>
            <h3>스토어 이름</h3>
            <div class="Price_area"><span class="blind">판매가</span></div>
            <div class="se-main-container">
                <img src="https://shop-phinf.pstatic.net/detail/1.jpg">
                <img src="https://other.example.com/2.jpg">
            </div>
        </body>
        </html>
        "#;

        let record = extract_product(SiteKind::Naver, html, NAVER_URL);

        assert_eq!(record.title, "스테인리스 텀블러 500ml");
        assert_eq!(record.description, "진공 단열 / 실버");
        assert_eq!(record.list_price, "24900");
        assert_eq!(
            record.images,
            vec![
                "https://shop-phinf.pstatic.net/main/tumbler.jpg?type=m510",
                "https://shop-phinf.pstatic.net/detail/1.jpg",
            ]
        );
        assert_eq!(record.detail_images, vec!["https://shop-phinf.pstatic.net/detail/1.jpg"]);
    }

    #[test]
    fn test_garbage_html_yields_sentinel() {
        for html in ["", "<<<>>>", "<html><body><div><span>", "\u{0}\u{feff}not html at all"] {
            let record = extract_product(SiteKind::Unknown, html, "not a url");
            assert_eq!(record.title, TITLE_FALLBACK);
            assert!(record.has_fallback_title());
            assert!(record.images.is_empty());
            assert!(record.list_price.is_empty());
        }
    }

    #[test]
    fn test_idempotent() {
        let first = extract_product(SiteKind::Danawa, DANAWA_PAGE, DANAWA_URL);
        let second = extract_product(SiteKind::Danawa, DANAWA_PAGE, DANAWA_URL);
        assert_eq!(first, second);
    }

    #[test]
    fn test_images_are_absolute_and_deduplicated() {
        let html = r#"
        <html>
        <head>
            <meta property="og:image" content="/prod_img/a.jpg">
            <meta property="og:image" content="//img.danawa.com/prod_img/b.jpg">
        </head>
        <body>
            <div class="prod_view_thumb">
                <img src="https://prod.danawa.com/prod_img/a.jpg">
                <img src="c.webp">
                <img src="//img.danawa.com/prod_img/b.jpg">
            </div>
        </body>
        </html>
        "#;

        let record = extract_product(SiteKind::Danawa, html, DANAWA_URL);

        assert_eq!(
            record.images,
            vec![
                "https://prod.danawa.com/prod_img/a.jpg",
                "https://img.danawa.com/prod_img/b.jpg",
                "https://prod.danawa.com/info/c.webp",
            ]
        );
        assert!(record.images.iter().all(|url| url.starts_with("https://")));
    }

    #[test]
    fn test_custom_limits() {
        let thumbs: String = (0..8).map(|i| format!(r#"<img src="/t/{}.jpg">"#, i)).collect();
        let html = format!(r#"<div class="prod_view_thumb">{}</div>"#, thumbs);

        let extractor = Extractor::new(ExtractionLimits {
            max_images: 3,
            ..ExtractionLimits::default()
        });
        let record = extractor.extract(SiteKind::Danawa, &html, DANAWA_URL);
        assert_eq!(record.images.len(), 3);

        let record = extract_product(SiteKind::Danawa, &html, DANAWA_URL);
        assert_eq!(record.images.len(), 8);
    }

    #[test]
    fn test_record_json_shape() {
        let record = ProductRecord {
            title: "Mouse".to_string(),
            list_price: "19900".to_string(),
            images: vec!["https://a.com/1.jpg".to_string()],
            ..ProductRecord::default()
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["listPrice"], "19900");
        assert_eq!(json["salePrice"], "");
        assert!(json.get("detailImages").is_none());
        assert!(json.get("descriptionHtml").is_none());

        let back: ProductRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
