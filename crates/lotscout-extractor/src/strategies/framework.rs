//! Framework-data strategy: a `__NEXT_DATA__` page-state island.
//!
//! Some site generators serialize the whole page state into one JSON
//! script tag. When a vehicle or dealer object sits at the conventional
//! `props.pageProps` path, it is as trustworthy as structured data.
//! No island, or a parse failure, is an empty result rather than an error.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use lotscout_core::bounds;
use lotscout_core::types::{Confidence, FieldValue, ListingField};

use super::{Extraction, Strategy};

static NEXT_DATA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<script[^>]+id\s*=\s*["']__NEXT_DATA__["'][^>]*>(.*?)</script>"#)
        .expect("valid regex")
});

/// Runs the framework-data strategy over raw HTML.
#[must_use]
pub fn extract(html: &str) -> Extraction {
    let mut out = Extraction::new(Strategy::FrameworkData);

    let Some(json_text) = NEXT_DATA_RE
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
    else {
        return out;
    };

    let root: Value = match serde_json::from_str(json_text) {
        Ok(v) => v,
        Err(err) => {
            tracing::debug!(error = %err, "framework data island failed to parse");
            return out;
        }
    };

    let Some(page_props) = root.get("props").and_then(|p| p.get("pageProps")) else {
        return out;
    };

    if let Some(vehicle) = page_props
        .get("vehicle")
        .or_else(|| page_props.get("listing"))
        .filter(|v| v.is_object())
    {
        read_vehicle(vehicle, &mut out);
        if let Some(dealer) = vehicle.get("dealer").filter(|d| d.is_object()) {
            read_dealer(dealer, &mut out);
        }
    }
    if let Some(dealer) = page_props.get("dealer").filter(|d| d.is_object()) {
        read_dealer(dealer, &mut out);
    }

    out
}

fn as_u32(value: &Value) -> Option<u32> {
    value
        .as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .or_else(|| value.as_str().and_then(crate::text::parse_currency))
}

fn as_trimmed_string(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn read_vehicle(vehicle: &Value, out: &mut Extraction) {
    if let Some(price) = vehicle
        .get("price")
        .or_else(|| vehicle.get("listPrice"))
        .and_then(as_u32)
        .filter(|p| bounds::price_in_bounds(*p))
    {
        out.push(ListingField::Price, FieldValue::Number(price), Confidence::High);
    }
    if let Some(year) = vehicle
        .get("year")
        .and_then(as_u32)
        .filter(|y| bounds::year_in_bounds(*y))
    {
        out.push(ListingField::Year, FieldValue::Number(year), Confidence::High);
    }
    if let Some(make) = vehicle.get("make").and_then(as_trimmed_string) {
        out.push(ListingField::Make, FieldValue::Text(make), Confidence::High);
    }
    if let Some(model) = vehicle.get("model").and_then(as_trimmed_string) {
        out.push(ListingField::Model, FieldValue::Text(model), Confidence::High);
    }
    if let Some(trim) = vehicle.get("trim").and_then(as_trimmed_string) {
        out.push(ListingField::Trim, FieldValue::Text(trim), Confidence::High);
    }
    if let Some(mileage) = vehicle
        .get("mileage")
        .or_else(|| vehicle.get("odometer"))
        .and_then(as_u32)
        .filter(|m| bounds::mileage_in_bounds(*m))
    {
        out.push(
            ListingField::Mileage,
            FieldValue::Number(mileage),
            Confidence::High,
        );
    }
    if let Some(vin) = vehicle
        .get("vin")
        .and_then(as_trimmed_string)
        .filter(|v| bounds::is_valid_vin(v))
    {
        out.push(
            ListingField::Vin,
            FieldValue::Text(vin.to_uppercase()),
            Confidence::High,
        );
    }
    if let Some(image) = vehicle
        .get("imageUrl")
        .or_else(|| vehicle.get("image"))
        .and_then(as_trimmed_string)
        .filter(|u| u.starts_with("http"))
    {
        out.push(ListingField::ImageUrl, FieldValue::Text(image), Confidence::High);
    }
}

fn read_dealer(dealer: &Value, out: &mut Extraction) {
    if let Some(name) = dealer.get("name").and_then(as_trimmed_string) {
        out.push(ListingField::DealerName, FieldValue::Text(name), Confidence::High);
    }
    if let Some(city) = dealer.get("city").and_then(as_trimmed_string) {
        out.push(ListingField::DealerCity, FieldValue::Text(city), Confidence::High);
    }
    if let Some(state) = dealer.get("state").and_then(as_trimmed_string) {
        out.push(
            ListingField::DealerState,
            FieldValue::Text(state),
            Confidence::High,
        );
    }
    if let Some(zip) = dealer
        .get("zip")
        .or_else(|| dealer.get("postalCode"))
        .and_then(as_trimmed_string)
    {
        let digits: String = zip.chars().take_while(char::is_ascii_digit).collect();
        if digits.len() == 5 {
            out.push(ListingField::Zip, FieldValue::Text(digits), Confidence::High);
        }
    }
}
