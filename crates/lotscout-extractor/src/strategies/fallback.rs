//! Pattern-fallback strategy: regex heuristics over flattened text.
//!
//! The last-resort source for fetched pages, and the entire pipeline for
//! the raw-pasted-text path — the algorithm is identical either way, the
//! caller just flattens HTML first. Nothing here ever earns High
//! confidence.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use lotscout_core::bounds;
use lotscout_core::types::{Confidence, FieldCandidate, FieldValue, ListingField};

use crate::text::context_snippet;

use super::{Extraction, Strategy};

const CONTEXT_RADIUS: usize = 30;

/// Labels that must never be mistaken for a dealer name.
const NON_NAME_LABELS: [&str; 12] = [
    "price", "mileage", "year", "make", "model", "trim", "vin", "miles", "dealer", "location",
    "exterior", "interior",
];

/// US state and district codes, for bare two-letter token matching.
const US_STATES: [&str; 51] = [
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN",
    "IA", "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH",
    "NJ", "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT",
    "VT", "VA", "WA", "WV", "WI", "WY",
];

/// Common manufacturer tokens with their canonical spellings. Model
/// resolution is intentionally left to higher-priority strategies — no
/// reliable pattern exists without a controlled vocabulary.
const MAKES: [(&str, &str); 34] = [
    ("toyota", "Toyota"),
    ("honda", "Honda"),
    ("ford", "Ford"),
    ("chevrolet", "Chevrolet"),
    ("chevy", "Chevrolet"),
    ("nissan", "Nissan"),
    ("hyundai", "Hyundai"),
    ("kia", "Kia"),
    ("subaru", "Subaru"),
    ("volkswagen", "Volkswagen"),
    ("jeep", "Jeep"),
    ("ram", "Ram"),
    ("dodge", "Dodge"),
    ("chrysler", "Chrysler"),
    ("gmc", "GMC"),
    ("buick", "Buick"),
    ("cadillac", "Cadillac"),
    ("lincoln", "Lincoln"),
    ("mazda", "Mazda"),
    ("lexus", "Lexus"),
    ("acura", "Acura"),
    ("infiniti", "Infiniti"),
    ("audi", "Audi"),
    ("bmw", "BMW"),
    ("mercedes-benz", "Mercedes-Benz"),
    ("mercedes", "Mercedes-Benz"),
    ("volvo", "Volvo"),
    ("porsche", "Porsche"),
    ("tesla", "Tesla"),
    ("mitsubishi", "Mitsubishi"),
    ("jaguar", "Jaguar"),
    ("land rover", "Land Rover"),
    ("mini", "Mini"),
    ("genesis", "Genesis"),
];

static PRICE_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    // Trailing \b rejects ungrouped runs longer than six digits outright
    // instead of truncating them into a plausible-looking price.
    let amount = r"(\d{1,3}(?:,\d{3})+|\d{3,6})\b";
    vec![
        (
            "internet price",
            Regex::new(&format!(r"(?i)internet\s+price\s*:?\s*\$?\s*{amount}"))
                .expect("valid regex"),
        ),
        (
            "sale price",
            Regex::new(&format!(r"(?i)sale\s+price\s*:?\s*\$?\s*{amount}"))
                .expect("valid regex"),
        ),
        (
            "price",
            Regex::new(&format!(r"(?i)\bprice\s*:?\s*\$?\s*{amount}")).expect("valid regex"),
        ),
        (
            "dollar amount",
            Regex::new(&format!(r"\$\s*{amount}")).expect("valid regex"),
        ),
    ]
});

static MILEAGE_PATTERNS: LazyLock<Vec<(&'static str, Regex, u32)>> = LazyLock::new(|| {
    vec![
        (
            "miles",
            Regex::new(r"(?i)\b(\d{1,3}(?:,\d{3})+|\d{1,6})\s*(?:miles|mi)\b")
                .expect("valid regex"),
            1,
        ),
        (
            "mileage",
            Regex::new(r"(?i)\bmileage\s*:?\s*(\d{1,3}(?:,\d{3})+|\d{1,6})\b")
                .expect("valid regex"),
            1,
        ),
        (
            "k miles",
            Regex::new(r"(?i)\b(\d{1,3})k\s*(?:miles|mi)\b").expect("valid regex"),
            1000,
        ),
    ]
});

static DEALER_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?i:dealer(?:ship)?|sold\s+by|from)\s*:\s*([A-Z][^,.;:\n]{1,48})")
        .expect("valid regex")
});
static DEALER_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b((?:[A-Z][A-Za-z&'\-]+\s+){1,4}(?:Motors|Motor\s+Co|Automotive|Auto\s+Sales|Auto\s+Group|Auto\s+Mall|Autoplex|Dealership))\b",
    )
    .expect("valid regex")
});

static CITY_ST_ZIP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Z][a-zA-Z]+(?:\s+[A-Z][a-zA-Z]+)*),\s*([A-Z]{2})\s+(\d{5})\b")
        .expect("valid regex")
});
static BARE_ZIP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{5})\b").expect("valid regex"));
static BARE_STATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([A-Z]{2})\b").expect("valid regex"));
static CITY_BEFORE_STATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Z][a-zA-Z]+(?:\s+[A-Z][a-zA-Z]+)*),\s*$").expect("valid regex")
});

static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(19\d{2}|20\d{2})\b").expect("valid regex"));
static MAKE_RE: LazyLock<Regex> = LazyLock::new(|| {
    let alternation = MAKES
        .iter()
        .map(|(token, _)| regex::escape(token).replace(' ', r"\s+"))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b({alternation})\b")).expect("valid regex")
});
static VIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bvin\s*[:#]?\s*([a-hj-npr-z0-9]{17})\b").expect("valid regex")
});

/// Runs the pattern-fallback strategy over flattened text.
///
/// `price_freq_threshold` is the occurrence count at which a price value
/// is promoted from Low to Medium confidence.
#[must_use]
pub fn extract(text: &str, price_freq_threshold: u32) -> Extraction {
    let mut out = Extraction::new(Strategy::PatternFallback);
    extract_price(text, price_freq_threshold, &mut out);
    extract_mileage(text, &mut out);
    extract_dealer_name(text, &mut out);
    extract_location(text, &mut out);
    extract_year_and_make(text, &mut out);
    extract_vin(text, &mut out);
    out
}

/// True when `span` overlaps any span already claimed by an
/// earlier-ordered pattern, to stop one number counting twice.
fn overlaps(claimed: &[(usize, usize)], span: (usize, usize)) -> bool {
    claimed
        .iter()
        .any(|(start, end)| span.0 < *end && *start < span.1)
}

fn extract_price(text: &str, freq_threshold: u32, out: &mut Extraction) {
    let mut claimed: Vec<(usize, usize)> = Vec::new();

    for (label, pattern) in PRICE_PATTERNS.iter() {
        for cap in pattern.captures_iter(text) {
            let Some(group) = cap.get(1) else { continue };
            let span = (group.start(), group.end());
            if overlaps(&claimed, span) {
                continue;
            }
            claimed.push(span);

            let Some(value) = crate::text::parse_grouped_number(group.as_str()) else {
                continue;
            };
            let in_bounds = bounds::price_in_bounds(value);
            out.price_candidates.push(FieldCandidate {
                value,
                label: (*label).to_string(),
                source: Strategy::PatternFallback.as_str().to_string(),
                context: context_snippet(text, span.0, span.1, CONTEXT_RADIUS),
                score: 1.0,
                flags: if in_bounds {
                    vec![]
                } else {
                    vec!["out_of_bounds".to_string()]
                },
            });
        }
    }

    // Frequency tie-break over in-bounds values: the value seen most
    // often wins; ties go to the highest value.
    let mut counts: HashMap<u32, u32> = HashMap::new();
    for candidate in out
        .price_candidates
        .iter()
        .filter(|c| c.flags.is_empty())
    {
        *counts.entry(candidate.value).or_insert(0) += 1;
    }
    for candidate in &mut out.price_candidates {
        if let Some(count) = counts.get(&candidate.value) {
            #[allow(clippy::cast_precision_loss)]
            {
                candidate.score = *count as f32;
            }
        }
    }

    if let Some((value, count)) = counts
        .into_iter()
        .max_by_key(|(value, count)| (*count, *value))
    {
        let confidence = if count >= freq_threshold {
            Confidence::Medium
        } else {
            Confidence::Low
        };
        out.push(ListingField::Price, FieldValue::Number(value), confidence);
    }
}

fn extract_mileage(text: &str, out: &mut Extraction) {
    let mut claimed: Vec<(usize, usize)> = Vec::new();

    for (label, pattern, multiplier) in MILEAGE_PATTERNS.iter() {
        for cap in pattern.captures_iter(text) {
            let Some(group) = cap.get(1) else { continue };
            let span = (group.start(), group.end());
            if overlaps(&claimed, span) {
                continue;
            }
            claimed.push(span);

            let Some(value) = crate::text::parse_grouped_number(group.as_str())
                .and_then(|v| v.checked_mul(*multiplier))
            else {
                continue;
            };
            let in_bounds = bounds::mileage_in_bounds(value);
            out.mileage_candidates.push(FieldCandidate {
                value,
                label: (*label).to_string(),
                source: Strategy::PatternFallback.as_str().to_string(),
                context: context_snippet(text, span.0, span.1, CONTEXT_RADIUS),
                score: 1.0,
                flags: if in_bounds {
                    vec![]
                } else {
                    vec!["out_of_bounds".to_string()]
                },
            });

            // First sanity-passing match in pattern order wins.
            if in_bounds && out.get(ListingField::Mileage).is_none() {
                out.push(
                    ListingField::Mileage,
                    FieldValue::Number(value),
                    Confidence::Medium,
                );
            }
        }
    }
}

fn extract_dealer_name(text: &str, out: &mut Extraction) {
    let labeled = DEALER_LABEL_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string());
    let candidate = labeled.or_else(|| {
        DEALER_SUFFIX_RE
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
    });

    if let Some(name) = candidate {
        let lowered = name.to_lowercase();
        // A label regex can capture a neighboring field label; reject
        // exact label collisions outright.
        if name.len() >= 2
            && name.len() <= 49
            && !NON_NAME_LABELS.contains(&lowered.as_str())
        {
            out.push(
                ListingField::DealerName,
                FieldValue::Text(name),
                Confidence::Low,
            );
        }
    }
}

fn extract_location(text: &str, out: &mut Extraction) {
    // Preferred: the combined pattern. A five-digit number adjacent to a
    // state code right after a capitalized city is strong co-occurring
    // evidence, so the zip earns High here.
    for cap in CITY_ST_ZIP_RE.captures_iter(text) {
        let (Some(city), Some(state), Some(zip)) = (cap.get(1), cap.get(2), cap.get(3)) else {
            continue;
        };
        if !US_STATES.contains(&state.as_str()) {
            continue;
        }
        out.push(
            ListingField::DealerCity,
            FieldValue::Text(city.as_str().to_string()),
            Confidence::Medium,
        );
        out.push(
            ListingField::DealerState,
            FieldValue::Text(state.as_str().to_string()),
            Confidence::Medium,
        );
        out.push(
            ListingField::Zip,
            FieldValue::Text(zip.as_str().to_string()),
            Confidence::High,
        );
        return;
    }

    // Independent fallbacks, all Low.
    if let Some(zip) = BARE_ZIP_RE.captures(text).and_then(|c| c.get(1)) {
        out.push(
            ListingField::Zip,
            FieldValue::Text(zip.as_str().to_string()),
            Confidence::Low,
        );
    }

    let state_match = BARE_STATE_RE
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .find(|m| US_STATES.contains(&m.as_str()));
    if let Some(state) = state_match {
        out.push(
            ListingField::DealerState,
            FieldValue::Text(state.as_str().to_string()),
            Confidence::Low,
        );
        // Derive a city only with a state anchor: `Capitalized Words,`
        // immediately preceding the state token.
        if let Some(city) = CITY_BEFORE_STATE_RE
            .captures(&text[..state.start()])
            .and_then(|c| c.get(1))
        {
            out.push(
                ListingField::DealerCity,
                FieldValue::Text(city.as_str().to_string()),
                Confidence::Low,
            );
        }
    }
}

fn extract_year_and_make(text: &str, out: &mut Extraction) {
    if let Some(year) = YEAR_RE
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .filter_map(|m| m.as_str().parse::<u32>().ok())
        .find(|y| bounds::year_in_bounds(*y))
    {
        out.push(
            ListingField::Year,
            FieldValue::Number(year),
            Confidence::Medium,
        );
    }

    if let Some(token) = MAKE_RE.captures(text).and_then(|c| c.get(1)) {
        let canonical = canonical_make(token.as_str());
        out.push(
            ListingField::Make,
            FieldValue::Text(canonical.to_string()),
            Confidence::Medium,
        );
    }
}

fn canonical_make(token: &str) -> &'static str {
    let lowered = token.to_lowercase();
    let collapsed = lowered.split_whitespace().collect::<Vec<_>>().join(" ");
    MAKES
        .iter()
        .find(|(t, _)| *t == collapsed)
        .map_or("", |(_, canonical)| canonical)
}

fn extract_vin(text: &str, out: &mut Extraction) {
    if let Some(vin) = VIN_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_uppercase())
        .filter(|v| bounds::is_valid_vin(v))
    {
        out.push(ListingField::Vin, FieldValue::Text(vin), Confidence::Medium);
    }
}

#[cfg(test)]
#[path = "fallback_test.rs"]
mod tests;
