//! Structured-data strategy: schema.org JSON-LD blocks.
//!
//! The most trustworthy source; every field extracted here is High
//! confidence. Each `<script type="application/ld+json">` block is parsed
//! independently so one malformed block cannot abort the scan.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use lotscout_core::bounds;
use lotscout_core::types::{Confidence, FieldValue, ListingField};

use super::{Extraction, Strategy};

static SCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<script[^>]+type\s*=\s*["']application/ld\+json["'][^>]*>(.*?)</script>"#)
        .expect("valid regex")
});
static NAME_YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(19\d{2}|20\d{2})\b").expect("valid regex"));

/// Runs the structured-data strategy over raw HTML.
#[must_use]
pub fn extract(html: &str) -> Extraction {
    let mut out = Extraction::new(Strategy::StructuredData);

    for cap in SCRIPT_RE.captures_iter(html) {
        let json_text = match cap.get(1) {
            Some(m) => m.as_str(),
            None => continue,
        };

        let value: Value = match serde_json::from_str(json_text) {
            Ok(v) => v,
            Err(err) => {
                tracing::debug!(error = %err, "skipping malformed JSON-LD block");
                out.issues
                    .push("structured data block failed to parse".to_string());
                continue;
            }
        };

        // Blocks are processed in document order; first-found per field
        // wins via Extraction::push.
        for item in flatten_items(&value) {
            read_vehicle_item(&item, &mut out);
            read_dealer_item(&item, &mut out);
        }
    }

    out
}

/// Expands a JSON-LD document into its item objects: accepts a top-level
/// object, an array, and `@graph` containers (one level deep).
fn flatten_items(value: &Value) -> Vec<Value> {
    let top_level: Vec<Value> = match value {
        Value::Array(arr) => arr.clone(),
        other => vec![other.clone()],
    };

    let mut items = Vec::new();
    for item in top_level {
        if let Some(graph) = item.get("@graph").and_then(Value::as_array) {
            items.extend(graph.iter().cloned());
        }
        items.push(item);
    }
    items
}

/// True when the item's `@type` (string or array, optionally namespaced
/// like `schema:Car`) matches any of `accepted`.
fn type_matches(item: &Value, accepted: &[&str]) -> bool {
    let matches_one = |raw: &str| {
        let bare = raw.rsplit([':', '/']).next().unwrap_or(raw);
        accepted.iter().any(|t| bare.eq_ignore_ascii_case(t))
    };

    match item.get("@type") {
        Some(Value::String(s)) => matches_one(s),
        Some(Value::Array(arr)) => arr
            .iter()
            .filter_map(Value::as_str)
            .any(matches_one),
        _ => false,
    }
}

/// A string field that may be either a plain string or an object with a
/// `name` sub-field (schema.org allows both for brand/model).
fn string_or_name(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Object(_) => value
            .get("name")
            .and_then(Value::as_str)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
        _ => None,
    }
}

/// A numeric field that may arrive as a JSON number or a currency-shaped
/// string.
fn number_or_string(value: &Value) -> Option<u32> {
    if let Some(n) = value.as_u64() {
        return u32::try_from(n).ok();
    }
    if let Some(f) = value.as_f64() {
        return whole_u32(f);
    }
    value.as_str().and_then(crate::text::parse_currency)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_u32(f: f64) -> Option<u32> {
    if f >= 0.0 && f < f64::from(u32::MAX) {
        Some(f as u32)
    } else {
        None
    }
}

fn read_vehicle_item(item: &Value, out: &mut Extraction) {
    if !type_matches(item, &["Vehicle", "Car", "Truck", "Motorcycle", "Product"]) {
        return;
    }

    // Price from the nested offer; out-of-bounds values are discarded
    // silently (monthly payments and sticker sums show up here).
    if let Some(offers) = item.get("offers") {
        let offer = match offers {
            Value::Array(arr) => arr.first(),
            other => Some(other),
        };
        if let Some(price) = offer
            .and_then(|o| o.get("price"))
            .and_then(number_or_string)
        {
            if bounds::price_in_bounds(price) {
                out.push(
                    ListingField::Price,
                    FieldValue::Number(price),
                    Confidence::High,
                );
            }
        }
    }

    if let Some(name) = item.get("name").and_then(Value::as_str) {
        if let Some(year) = NAME_YEAR_RE
            .captures(name)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .filter(|y| bounds::year_in_bounds(*y))
        {
            out.push(ListingField::Year, FieldValue::Number(year), Confidence::High);
        }
    }

    if let Some(make) = item.get("brand").and_then(string_or_name) {
        out.push(ListingField::Make, FieldValue::Text(make), Confidence::High);
    }
    if let Some(model) = item.get("model").and_then(string_or_name) {
        out.push(ListingField::Model, FieldValue::Text(model), Confidence::High);
    }
    if let Some(trim) = item
        .get("vehicleConfiguration")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        out.push(
            ListingField::Trim,
            FieldValue::Text(trim.to_string()),
            Confidence::High,
        );
    }

    if let Some(mileage) = item
        .get("mileageFromOdometer")
        .and_then(|m| m.get("value").or(Some(m)))
        .and_then(number_or_string)
        .filter(|m| bounds::mileage_in_bounds(*m))
    {
        out.push(
            ListingField::Mileage,
            FieldValue::Number(mileage),
            Confidence::High,
        );
    }

    if let Some(vin) = item
        .get("vehicleIdentificationNumber")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|v| bounds::is_valid_vin(v))
    {
        out.push(
            ListingField::Vin,
            FieldValue::Text(vin.to_uppercase()),
            Confidence::High,
        );
    }

    // `image` may be a string, an array, or an ImageObject.
    if let Some(image) = item.get("image") {
        let url = match image {
            Value::String(s) => Some(s.clone()),
            Value::Array(arr) => arr.first().and_then(Value::as_str).map(str::to_string),
            Value::Object(_) => image.get("url").and_then(Value::as_str).map(str::to_string),
            _ => None,
        };
        if let Some(url) = url.filter(|u| u.starts_with("http")) {
            out.push(ListingField::ImageUrl, FieldValue::Text(url), Confidence::High);
        }
    }
}

fn read_dealer_item(item: &Value, out: &mut Extraction) {
    if !type_matches(
        item,
        &["AutoDealer", "AutomotiveBusiness", "Organization", "LocalBusiness"],
    ) {
        return;
    }

    if let Some(name) = item
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        out.push(
            ListingField::DealerName,
            FieldValue::Text(name.to_string()),
            Confidence::High,
        );
    }

    let address = item.get("address");
    if let Some(city) = address
        .and_then(|a| a.get("addressLocality"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        out.push(
            ListingField::DealerCity,
            FieldValue::Text(city.to_string()),
            Confidence::High,
        );
    }
    if let Some(state) = address
        .and_then(|a| a.get("addressRegion"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        out.push(
            ListingField::DealerState,
            FieldValue::Text(state.to_string()),
            Confidence::High,
        );
    }
    // Postal codes arrive as "78701", "78701-1234", or with stray text;
    // keep the first 5-digit run.
    if let Some(zip) = address
        .and_then(|a| a.get("postalCode"))
        .and_then(Value::as_str)
        .and_then(first_five_digit_run)
    {
        out.push(ListingField::Zip, FieldValue::Text(zip), Confidence::High);
    }
}

fn first_five_digit_run(raw: &str) -> Option<String> {
    static ZIP_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\d{5}").expect("valid regex"));
    ZIP_RE.find(raw).map(|m| m.as_str().to_string())
}

#[cfg(test)]
#[path = "structured_test.rs"]
mod tests;
