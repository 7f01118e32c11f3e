//! URL absolutization helpers shared by image collection and detail HTML
//! normalization.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use url::Url;

static IMAGE_EXTENSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.(jpe?g|png|webp|gif|bmp)").expect("IMAGE_EXTENSION_RE: hardcoded regex is valid")
});

/// Stricter form used when picking between several lazy-load candidates:
/// the extension must end the path or precede the query string.
static IMAGE_PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.(png|jpe?g|webp|gif|bmp|svg)(\?|$)")
        .expect("IMAGE_PATH_RE: hardcoded regex is valid")
});

static CSS_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)url\(\s*['"]?([^)'"\s]+)['"]?\s*\)"#)
        .expect("CSS_URL_RE: hardcoded regex is valid")
});

/// Parse the page URL used as the resolution base. Invalid bases yield `None`
/// and relative references then cannot be resolved.
pub fn parse_base(source_url: &str) -> Option<Url> {
    Url::parse(source_url.trim()).ok()
}

/// Turn an image or link reference into an absolute http(s) URL.
///
/// - `//host/path` gets an explicit `https:` scheme
/// - an absolute http(s) URL is returned unchanged
/// - anything else is resolved against `base`
///
/// Returns `None` for empty input, for references that cannot be resolved and
/// for results outside http(s) (`data:`, `javascript:`, ...).
pub fn absolutize_url(raw: &str, base: Option<&Url>) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Some(rest) = raw.strip_prefix("//") {
        return Some(format!("https://{}", rest));
    }

    if is_http_url(raw) {
        return Some(raw.to_string());
    }

    let joined = base?.join(raw).ok()?;
    match joined.scheme() {
        "http" | "https" => Some(joined.to_string()),
        _ => None,
    }
}

fn is_http_url(raw: &str) -> bool {
    let prefix: String = raw.chars().take(8).collect::<String>().to_ascii_lowercase();
    prefix.starts_with("http://") || prefix.starts_with("https://")
}

/// True when the URL mentions a known raster image extension
pub fn has_image_extension(url: &str) -> bool {
    IMAGE_EXTENSION_RE.is_match(url)
}

pub(crate) fn looks_like_image_path(url: &str) -> bool {
    IMAGE_PATH_RE.is_match(url)
}

/// Rewrite every `url(...)` reference in a CSS string to an absolute form.
/// References that cannot be resolved are kept as they were.
pub fn rewrite_css_urls<'a>(css: &'a str, base: Option<&Url>) -> Cow<'a, str> {
    CSS_URL_RE.replace_all(css, |caps: &Captures| {
        let reference = &caps[1];
        let resolved = absolutize_url(reference, base).unwrap_or_else(|| reference.to_string());
        format!("url({})", resolved)
    })
}

/// Absolutize each candidate of a `srcset` attribute, keeping descriptors.
pub fn rewrite_srcset(srcset: &str, base: Option<&Url>) -> String {
    srcset
        .split(',')
        .filter_map(|entry| {
            let mut parts = entry.split_whitespace();
            let reference = parts.next()?;
            let resolved = absolutize_url(reference, base).unwrap_or_else(|| reference.to_string());
            let descriptor = parts.collect::<Vec<_>>().join(" ");
            if descriptor.is_empty() {
                Some(resolved)
            } else {
                Some(format!("{} {}", resolved, descriptor))
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Option<Url> {
        parse_base("https://prod.danawa.com/info/?pcode=1234")
    }

    #[test]
    fn test_absolutize_variants() {
        let base = base();

        assert_eq!(
            absolutize_url("//img.danawa.com/a.jpg", base.as_ref()),
            Some("https://img.danawa.com/a.jpg".to_string())
        );
        assert_eq!(
            absolutize_url("HTTP://cdn.example.com/x.png", base.as_ref()),
            Some("HTTP://cdn.example.com/x.png".to_string())
        );
        assert_eq!(
            absolutize_url("/prod_img/main.jpg", base.as_ref()),
            Some("https://prod.danawa.com/prod_img/main.jpg".to_string())
        );
        assert_eq!(
            absolutize_url("thumb/1.png", base.as_ref()),
            Some("https://prod.danawa.com/info/thumb/1.png".to_string())
        );
    }

    #[test]
    fn test_absolutize_rejects_unusable() {
        let base = base();

        assert_eq!(absolutize_url("", base.as_ref()), None);
        assert_eq!(absolutize_url("   ", base.as_ref()), None);
        assert_eq!(absolutize_url("javascript:void(0)", base.as_ref()), None);
        assert_eq!(absolutize_url("data:image/png;base64,AAAA", base.as_ref()), None);
        // Relative reference without a usable base
        assert_eq!(absolutize_url("img/a.jpg", None), None);
    }

    #[test]
    fn test_image_extension() {
        assert!(has_image_extension("https://a.com/x.JPG"));
        assert!(has_image_extension("https://shop-phinf.pstatic.net/a.jpeg?type=m510"));
        assert!(has_image_extension("https://a.com/b.bmp"));
        assert!(!has_image_extension("https://a.com/pixel.svg"));
        assert!(!has_image_extension("https://a.com/page.html"));
    }

    #[test]
    fn test_rewrite_css_urls() {
        let base = base();
        let css = r#"background:url('/bg.png') no-repeat; mask: url("//cdn.a.com/m.svg")"#;
        let rewritten = rewrite_css_urls(css, base.as_ref());
        assert_eq!(
            rewritten,
            "background:url(https://prod.danawa.com/bg.png) no-repeat; mask: url(https://cdn.a.com/m.svg)"
        );
    }

    #[test]
    fn test_rewrite_srcset() {
        let base = base();
        let rewritten = rewrite_srcset("/a.jpg 1x, //cdn.a.com/b.jpg 2x", base.as_ref());
        assert_eq!(
            rewritten,
            "https://prod.danawa.com/a.jpg 1x, https://cdn.a.com/b.jpg 2x"
        );
    }
}
