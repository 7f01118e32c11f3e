//! Block page and missing product detection
//!
//! Sites often answer HTTP 200 with an error or anti-bot page. These checks
//! tell such pages apart from real product content.

use std::sync::LazyLock;

use regex::Regex;

/// Fragments of "product not found" notices. Elements carrying them are also
/// cut out of detail HTML.
pub const NOT_FOUND_PHRASES: &[&str] = &[
    "상품이 존재하지 않습니다",
    "페이지를 찾을 수 없습니다",
    "삭제되었거나 변경",
    "이전 페이지로 가기",
];

/// Service error and access restriction banners
pub const BLOCK_PHRASES: &[&str] = &[
    "현재 서비스 접속이 불가합니다",
    "동시에 접속하는 이용자 수가 많거나",
    "에러페이지",
    "module_error",
    "새로고침",
    "차단",
    "접근이 제한",
    "access denied",
    "access restricted",
    "page not found",
    "product does not exist",
];

/// `bot` and `robot` only count as whole words, so markup such as
/// `<meta name="robots">` or `bottom` does not trigger.
static BOT_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(ro)?bot\b").expect("BOT_MARKER_RE: hardcoded regex is valid")
});

static DEFAULT_DETECTOR: LazyLock<BlockDetector> = LazyLock::new(BlockDetector::default);

/// Case-insensitive phrase scanner
#[derive(Debug, Clone)]
pub struct BlockDetector {
    phrases: Vec<String>,
}

impl BlockDetector {
    /// Built-in phrases plus `extra`
    pub fn with_extra_phrases<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let phrases = NOT_FOUND_PHRASES
            .iter()
            .chain(BLOCK_PHRASES)
            .map(|p| p.to_lowercase())
            .chain(
                extra
                    .into_iter()
                    .map(|p| p.as_ref().trim().to_lowercase())
                    .filter(|p| !p.is_empty()),
            )
            .collect();

        Self { phrases }
    }

    /// The first phrase found in `html`, if any
    pub fn matched_phrase(&self, html: &str) -> Option<&str> {
        if html.is_empty() {
            return None;
        }

        let lowered = html.to_lowercase();
        if let Some(phrase) = self.phrases.iter().find(|p| lowered.contains(p.as_str())) {
            return Some(phrase.as_str());
        }

        BOT_MARKER_RE.find(html).map(|m| {
            if m.as_str().len() > 3 {
                "robot"
            } else {
                "bot"
            }
        })
    }

    pub fn looks_blocked(&self, html: &str) -> bool {
        self.matched_phrase(html).is_some()
    }
}

impl Default for BlockDetector {
    fn default() -> Self {
        Self::with_extra_phrases(std::iter::empty::<&str>())
    }
}

/// True when the page looks like a block, error or "product not found" page
pub fn looks_blocked_or_missing(html: &str) -> bool {
    DEFAULT_DETECTOR.looks_blocked(html)
}

/// True when `text` contains one of the not-found notices
pub(crate) fn contains_not_found_notice(text: &str) -> bool {
    let lowered = text.to_lowercase();
    NOT_FOUND_PHRASES.iter().any(|p| lowered.contains(&p.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_restricted_phrase() {
        let html = "<html><body><p>고객님의 접근이 제한되었습니다.</p></body></html>";
        assert!(looks_blocked_or_missing(html));
    }

    #[test]
    fn test_clean_page() {
        let html = r#"
        <html><head><meta name="robots" content="index,follow"></head>
        <body style="margin-bottom:0"><h1>무선 마우스</h1><span class="price">19,900</span></body></html>
        "#;
        assert!(!looks_blocked_or_missing(html));
        assert!(!looks_blocked_or_missing(""));
    }

    #[test]
    fn test_case_insensitive_and_bot_words() {
        assert!(looks_blocked_or_missing("<h1>ACCESS DENIED</h1>"));
        assert!(looks_blocked_or_missing("<p>Are you a Robot?</p>"));
        assert!(looks_blocked_or_missing("<p>bot detected</p>"));
        assert!(!looks_blocked_or_missing("<p>robotics kit</p>"));
    }

    #[test]
    fn test_not_found_notice() {
        assert!(looks_blocked_or_missing("<div>상품이 존재하지 않습니다</div>"));
        assert!(contains_not_found_notice("요청하신 페이지를 찾을 수 없습니다."));
        assert!(!contains_not_found_notice("정상 상품 페이지"));
    }

    #[test]
    fn test_extra_phrases() {
        let detector = BlockDetector::with_extra_phrases(["Temporarily Unavailable", "  "]);
        assert_eq!(
            detector.matched_phrase("<p>temporarily unavailable</p>"),
            Some("temporarily unavailable")
        );
        assert!(!detector.looks_blocked("<p>in stock</p>"));
    }
}
