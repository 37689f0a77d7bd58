//! Shared text helpers for the heuristic extraction path.
//!
//! The pattern-fallback strategy runs over flattened text whether the
//! input arrived as HTML or as raw pasted text; this module owns the
//! flattening and the small parsing helpers all strategies share.

use std::sync::LazyLock;

use regex::Regex;

static SCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script>").expect("valid regex")
});
static STYLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style\b[^>]*>.*?</style>").expect("valid regex"));
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));
static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Flattens HTML to plain text: script/style contents dropped, tags
/// replaced with spaces, common entities decoded, whitespace collapsed.
#[must_use]
pub fn flatten_html(html: &str) -> String {
    let without_script = SCRIPT_RE.replace_all(html, " ");
    let without_style = STYLE_RE.replace_all(&without_script, " ");
    let without_tags = TAG_RE.replace_all(&without_style, " ");
    let decoded = decode_entities(&without_tags);
    WS_RE.replace_all(decoded.trim(), " ").into_owned()
}

/// Decodes the handful of entities that actually occur in price and
/// dealer text. Unknown entities pass through untouched.
#[must_use]
pub fn decode_entities(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&nbsp;", " ")
        .replace("&#36;", "$")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
}

/// Parses a currency amount from a string that may carry `$`, commas, a
/// currency code, and a decimal fraction. Returns whole units.
#[must_use]
pub fn parse_currency(raw: &str) -> Option<u32> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches(['$'])
        .trim_start_matches("USD")
        .trim()
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    // Drop any decimal fraction; listing prices are whole-dollar.
    let integer_part = cleaned.split('.').next().unwrap_or(&cleaned);
    if integer_part.is_empty() || !integer_part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    integer_part.parse().ok()
}

/// Parses a number that may carry thousands separators.
#[must_use]
pub fn parse_grouped_number(raw: &str) -> Option<u32> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() || !cleaned.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    cleaned.parse().ok()
}

/// A short snippet of text around `[start, end)`, for candidate context
/// in diagnostics. Clamped to char boundaries.
#[must_use]
pub fn context_snippet(text: &str, start: usize, end: usize, radius: usize) -> String {
    let from = floor_char_boundary(text, start.saturating_sub(radius));
    let to = ceil_char_boundary(text, (end + radius).min(text.len()));
    text[from..to].trim().to_string()
}

fn floor_char_boundary(text: &str, mut idx: usize) -> usize {
    while idx > 0 && !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

fn ceil_char_boundary(text: &str, mut idx: usize) -> usize {
    while idx < text.len() && !text.is_char_boundary(idx) {
        idx += 1;
    }
    idx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flatten_drops_script_and_style_contents() {
        let html = r"<html><head><style>.a{color:red}</style>
            <script>var price = 99999;</script></head>
            <body><h1>2021 Honda Accord</h1><p>Price: $24,500</p></body></html>";
        let text = flatten_html(html);
        assert!(text.contains("2021 Honda Accord"));
        assert!(text.contains("Price: $24,500"));
        assert!(!text.contains("99999"), "script contents must not leak");
        assert!(!text.contains("color:red"));
    }

    #[test]
    fn flatten_decodes_entities_and_collapses_whitespace() {
        let html = "<p>Smith &amp; Sons</p>\n\n<p>&#36;12,000</p>";
        assert_eq!(flatten_html(html), "Smith & Sons $12,000");
    }

    #[test]
    fn parse_currency_accepts_common_shapes() {
        assert_eq!(parse_currency("$24,500"), Some(24_500));
        assert_eq!(parse_currency("24500"), Some(24_500));
        assert_eq!(parse_currency("24500.00"), Some(24_500));
        assert_eq!(parse_currency(" USD 18,999 "), Some(18_999));
        assert_eq!(parse_currency("call for price"), None);
        assert_eq!(parse_currency(""), None);
    }

    #[test]
    fn parse_grouped_number_handles_separators() {
        assert_eq!(parse_grouped_number("32,000"), Some(32_000));
        assert_eq!(parse_grouped_number("32000"), Some(32_000));
        assert_eq!(parse_grouped_number("32k"), None);
    }

    #[test]
    fn context_snippet_respects_char_boundaries() {
        let text = "aé$24,500é";
        let snippet = context_snippet(text, 3, 10, 2);
        assert!(snippet.contains("$24,500"));
    }
}
