//! Meta-tag strategy: social-preview price tags and title text.
//!
//! Many sites populate preview tags even when they omit richer structured
//! data, so this runs as a medium-confidence middle ground.

use std::sync::LazyLock;

use regex::Regex;

use lotscout_core::bounds;
use lotscout_core::types::{Confidence, FieldValue, ListingField};

use super::{Extraction, Strategy};

static PRICE_META_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<meta[^>]+(?:property|name)\s*=\s*["'](?:og:price:amount|product:price:amount)["'][^>]+content\s*=\s*["']([^"']+)["']"#,
    )
    .expect("valid regex")
});
// Same tag with content before property; attribute order is not fixed.
static PRICE_META_REV_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<meta[^>]+content\s*=\s*["']([^"']+)["'][^>]+(?:property|name)\s*=\s*["'](?:og:price:amount|product:price:amount)["']"#,
    )
    .expect("valid regex")
});
static OG_TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<meta[^>]+(?:property|name)\s*=\s*["']og:title["'][^>]+content\s*=\s*["']([^"']+)["']"#,
    )
    .expect("valid regex")
});
static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("valid regex"));
static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(19\d{2}|20\d{2})\b").expect("valid regex"));

/// Runs the meta-tag strategy over raw HTML.
#[must_use]
pub fn extract(html: &str) -> Extraction {
    let mut out = Extraction::new(Strategy::MetaTags);

    let price_raw = PRICE_META_RE
        .captures(html)
        .or_else(|| PRICE_META_REV_RE.captures(html))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str());
    if let Some(price) = price_raw
        .and_then(crate::text::parse_currency)
        .filter(|p| bounds::price_in_bounds(*p))
    {
        out.push(
            ListingField::Price,
            FieldValue::Number(price),
            Confidence::Medium,
        );
    }

    let title = OG_TITLE_RE
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .or_else(|| {
            TITLE_RE
                .captures(html)
                .and_then(|c| c.get(1))
                .map(|m| crate::text::decode_entities(m.as_str().trim()))
        })
        .filter(|t| !t.is_empty());

    if let Some(title) = title {
        if let Some(year) = YEAR_RE
            .captures(&title)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .filter(|y| bounds::year_in_bounds(*y))
        {
            out.push(
                ListingField::Year,
                FieldValue::Number(year),
                Confidence::Medium,
            );
        }
        out.page_title = Some(title);
    }

    out
}
