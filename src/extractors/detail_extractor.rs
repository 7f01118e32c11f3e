//! Long-form description HTML
//!
//! scraper trees are read-only, so normalization happens while serializing:
//! every element is inspected once on the way out and either skipped or
//! written with a rewritten attribute list.

use scraper::node::Node;
use scraper::{ElementRef, Html};
use url::Url;

use super::css_extractor::{all_attrs, select_first};
use crate::blocked::contains_not_found_notice;
use crate::rules::{Ruleset, LAZY_LOAD_ATTRS};
use crate::urls::{
    absolutize_url, looks_like_image_path, parse_base, rewrite_css_urls, rewrite_srcset,
};

/// Image source attributes in lazy-load priority order
const IMAGE_SOURCE_ATTRS: &[&str] = &["src", "data-src", "data-original", "data-lazy", "data-lazy-src"];

const DROPPED_ELEMENTS: &[&str] = &["script", "noscript", "iframe"];

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Normalized inner HTML of the first detail container that exists, or empty
pub(crate) fn extract_detail_html(document: &Html, rules: &Ruleset, base_url: &str) -> String {
    for css in rules.detail_containers {
        if let Some(container) = select_first(document, css) {
            tracing::debug!(selector = *css, "detail container found");
            return normalize_detail_html(&container.inner_html(), base_url);
        }
    }
    String::new()
}

/// Sanitize a description fragment for re-hosting.
///
/// Scripts, frames and comments are dropped, lazy-loaded images get a real
/// `src`, every URL is made absolute against `base_url`, inline event
/// handlers are stripped and links open in a new tab. Elements carrying a
/// "product not found" notice are cut out. A full document yields only the
/// inner content of its body.
pub fn normalize_detail_html(raw_html: &str, base_url: &str) -> String {
    if raw_html.trim().is_empty() {
        return String::new();
    }

    let base = parse_base(base_url);
    let mut output = String::with_capacity(raw_html.len());

    if is_full_document(raw_html) {
        let document = Html::parse_document(raw_html);
        if let Some(body) = select_first(&document, "body") {
            serialize_children(&body, base.as_ref(), &mut output);
        }
    } else {
        let fragment = Html::parse_fragment(raw_html);
        serialize_children(&fragment.root_element(), base.as_ref(), &mut output);
    }

    output
}

fn is_full_document(raw_html: &str) -> bool {
    let lowered = raw_html.to_ascii_lowercase();
    lowered.contains("<html") || lowered.contains("<body")
}

fn serialize_children(parent: &ElementRef, base: Option<&Url>, output: &mut String) {
    let raw_text = is_raw_text(parent.value().name());

    for child in parent.children() {
        match child.value() {
            Node::Text(text) => {
                if raw_text {
                    output.push_str(&rewrite_css_urls(text, base));
                } else {
                    output.push_str(&html_escape::encode_text(&**text));
                }
            }
            Node::Element(_) => {
                if let Some(element) = ElementRef::wrap(child) {
                    serialize_element(&element, base, output);
                }
            }
            // Comments, doctypes and processing instructions are dropped
            _ => {}
        }
    }
}

fn serialize_element(element: &ElementRef, base: Option<&Url>, output: &mut String) {
    let name = element.value().name();
    if DROPPED_ELEMENTS.contains(&name) {
        return;
    }

    let text: String = element.text().collect();
    if contains_not_found_notice(&text) {
        return;
    }

    output.push('<');
    output.push_str(name);
    for (attr_name, value) in rewrite_attributes(element, base) {
        output.push(' ');
        output.push_str(&attr_name);
        output.push_str("=\"");
        output.push_str(&html_escape::encode_double_quoted_attribute(&value));
        output.push('"');
    }
    output.push('>');

    if VOID_ELEMENTS.contains(&name) {
        return;
    }

    serialize_children(element, base, output);

    output.push_str("</");
    output.push_str(name);
    output.push('>');
}

fn is_raw_text(name: &str) -> bool {
    name == "style"
}

/// The attribute list an element is written with
fn rewrite_attributes(element: &ElementRef, base: Option<&Url>) -> Vec<(String, String)> {
    let name = element.value().name();
    let is_img = name == "img";
    let is_link = name == "a";

    let mut attrs: Vec<(String, String)> = Vec::new();

    for (attr_name, value) in element.value().attrs() {
        let lowered = attr_name.to_ascii_lowercase();

        if lowered.starts_with("on") || !is_plain_attr_name(&lowered) {
            continue;
        }

        match lowered.as_str() {
            "style" => {
                let style = if is_img {
                    strip_dimensions(value)
                } else {
                    value.trim().to_string()
                };
                if !style.is_empty() {
                    attrs.push((attr_name.to_string(), rewrite_css_urls(&style, base).into_owned()));
                }
            }
            _ if is_img => match lowered.as_str() {
                // Rebuilt below from the best candidate
                "src" => {}
                "width" | "height" => {}
                "srcset" => attrs.push((attr_name.to_string(), rewrite_srcset(value, base))),
                other if LAZY_LOAD_ATTRS.contains(&other) => {}
                _ => attrs.push((attr_name.to_string(), value.to_string())),
            },
            _ if is_link => match lowered.as_str() {
                "href" => {
                    if let Some(href) = rewrite_href(value, base) {
                        attrs.push((attr_name.to_string(), href));
                    }
                }
                "target" | "rel" => {}
                _ => attrs.push((attr_name.to_string(), value.to_string())),
            },
            _ => attrs.push((attr_name.to_string(), value.to_string())),
        }
    }

    if is_img {
        if let Some(src) = best_image_source(element, base) {
            attrs.insert(0, ("src".to_string(), src));
        }
    }

    if is_link && element.value().attr("href").is_some() {
        attrs.push(("target".to_string(), "_blank".to_string()));
        attrs.push(("rel".to_string(), "noopener".to_string()));
    }

    attrs
}

/// Malformed markup can produce attribute names containing quotes or angle
/// brackets; those are not written back out.
fn is_plain_attr_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
}

/// First candidate that looks like an image file, else the first candidate
fn best_image_source(element: &ElementRef, base: Option<&Url>) -> Option<String> {
    let candidates = all_attrs(element, IMAGE_SOURCE_ATTRS);
    let chosen = candidates
        .iter()
        .find(|candidate| looks_like_image_path(candidate))
        .or_else(|| candidates.first())?;
    absolutize_url(chosen, base)
}

fn rewrite_href(href: &str, base: Option<&Url>) -> Option<String> {
    if let Some(absolute) = absolutize_url(href, base) {
        return Some(absolute);
    }

    let trimmed = href.trim();
    let lowered = trimmed.to_ascii_lowercase();
    if lowered.starts_with("mailto:") || lowered.starts_with("tel:") {
        Some(trimmed.to_string())
    } else {
        None
    }
}

/// Drop `width` and `height` declarations from an inline style
fn strip_dimensions(style: &str) -> String {
    style
        .split(';')
        .map(str::trim)
        .filter(|declaration| !declaration.is_empty())
        .filter(|declaration| {
            let property = declaration
                .split(':')
                .next()
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase();
            property != "width" && property != "height"
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{DANAWA, NAVER};

    const BASE: &str = "https://smartstore.naver.com/shop/products/42";

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize_detail_html("", BASE), "");
        assert_eq!(normalize_detail_html("   \n", BASE), "");
    }

    #[test]
    fn test_drops_scripts_frames_and_comments() {
        let raw = r#"<div><script>alert(1)</script><noscript>x</noscript><iframe src="/ad"></iframe><!-- note --><p>Body</p></div>"#;
        assert_eq!(normalize_detail_html(raw, BASE), "<div><p>Body</p></div>");
    }

    #[test]
    fn test_lazy_image_rewrite() {
        let raw = r#"<img src="/spacer" data-src="/img/detail_01.jpg?type=w860" width="860" height="400" loading="lazy" style="width: 860px; border: 0; HEIGHT:400px">"#;
        let normalized = normalize_detail_html(raw, BASE);

        assert_eq!(
            normalized,
            r#"<img src="https://smartstore.naver.com/img/detail_01.jpg?type=w860" style="border: 0">"#
        );
    }

    #[test]
    fn test_image_without_extension_uses_first_candidate() {
        let raw = r#"<img data-original="//cdn.example.com/render?id=3">"#;
        assert_eq!(
            normalize_detail_html(raw, BASE),
            r#"<img src="https://cdn.example.com/render?id=3">"#
        );
    }

    #[test]
    fn test_srcset_and_style_urls() {
        let raw = r#"<div style="background:url('/bg.png')"><img src="a.png" srcset="a.png 1x, /b.png 2x"></div><style>.x{background:url(/s.png)}</style>"#;
        let normalized = normalize_detail_html(raw, BASE);

        assert!(normalized.contains(r#"style="background:url(https://smartstore.naver.com/bg.png)""#));
        assert!(normalized.contains(
            r#"srcset="https://smartstore.naver.com/shop/products/a.png 1x, https://smartstore.naver.com/b.png 2x""#
        ));
        assert!(normalized.contains("<style>.x{background:url(https://smartstore.naver.com/s.png)}</style>"));
    }

    #[test]
    fn test_links_and_event_handlers() {
        let raw = r#"<p onclick="steal()"><a href="/brand" target="_self" onmouseover="x()">Brand</a> <a href="javascript:void(0)">JS</a> <a href="mailto:help@example.com">Mail</a></p>"#;
        let normalized = normalize_detail_html(raw, BASE);

        assert_eq!(
            normalized,
            concat!(
                r#"<p><a href="https://smartstore.naver.com/brand" target="_blank" rel="noopener">Brand</a> "#,
                r#"<a target="_blank" rel="noopener">JS</a> "#,
                r#"<a href="mailto:help@example.com" target="_blank" rel="noopener">Mail</a></p>"#
            )
        );
        assert!(!normalized.contains("onclick"));
        assert!(!normalized.contains("onmouseover"));
    }

    #[test]
    fn test_not_found_notice_removed() {
        let raw = r#"<div class="notice"><p>상품이 존재하지 않습니다.</p><a href="/">이전 페이지로 가기</a></div><p>Real detail</p>"#;
        assert_eq!(normalize_detail_html(raw, BASE), "<p>Real detail</p>");
    }

    #[test]
    fn test_full_document_returns_body_inner() {
        let raw = r#"<!DOCTYPE html><html><head><title>t</title></head><body><section><p>Inside &amp; out</p></section></body></html>"#;
        assert_eq!(
            normalize_detail_html(raw, BASE),
            "<section><p>Inside &amp; out</p></section>"
        );
    }

    #[test]
    fn test_malformed_input_does_not_panic() {
        let raw = r#"<div><p>unclosed <img src="x.jpg" <<>> </span></table>"#;
        let normalized = normalize_detail_html(raw, BASE);
        assert!(normalized.contains("https://smartstore.naver.com/shop/products/x.jpg"));
        assert!(!normalized.contains("<<"));
    }

    #[test]
    fn test_container_order() {
        let html = r#"
        <html><body>
            <div id="content"><p>generic</p></div>
            <div class="se-main-container"><img data-src="/se/1.png"></div>
        </body></html>
        "#;
        let document = Html::parse_document(html);

        let detail = extract_detail_html(&document, &NAVER, BASE);
        assert_eq!(detail, r#"<img src="https://smartstore.naver.com/se/1.png">"#);

        assert_eq!(extract_detail_html(&document, &DANAWA, BASE), "");
    }
}
