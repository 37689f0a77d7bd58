//! Wire-facing domain types.
//!
//! Everything here serializes with camelCase keys because callers render
//! these shapes directly in transparency UIs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Sentinel for "no real HTTP status available" (fetch not attempted, or
/// the transport failed before a status line arrived). Never `0`: a zero
/// status is too easy to confuse with a malformed real status downstream.
pub const NO_HTTP_STATUS: i32 = -1;

/// Three-level trust label attached per extracted field.
///
/// Reflects source reliability, not statistical probability. Ordered so
/// `Low < Medium < High`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

/// The fields a listing record can carry, used as map keys and as the
/// vocabulary for confirmed-override lists.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum ListingField {
    Price,
    Year,
    Make,
    Model,
    Trim,
    Mileage,
    Vin,
    DealerName,
    DealerCity,
    DealerState,
    Zip,
    ImageUrl,
}

impl ListingField {
    /// Every field, in the order they appear on [`ListingRecord`].
    pub const ALL: [ListingField; 12] = [
        ListingField::Price,
        ListingField::Year,
        ListingField::Make,
        ListingField::Model,
        ListingField::Trim,
        ListingField::Mileage,
        ListingField::Vin,
        ListingField::DealerName,
        ListingField::DealerCity,
        ListingField::DealerState,
        ListingField::Zip,
        ListingField::ImageUrl,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ListingField::Price => "price",
            ListingField::Year => "year",
            ListingField::Make => "make",
            ListingField::Model => "model",
            ListingField::Trim => "trim",
            ListingField::Mileage => "mileage",
            ListingField::Vin => "vin",
            ListingField::DealerName => "dealerName",
            ListingField::DealerCity => "dealerCity",
            ListingField::DealerState => "dealerState",
            ListingField::Zip => "zip",
            ListingField::ImageUrl => "imageUrl",
        }
    }
}

/// A single extracted value, typed by the field it belongs to.
///
/// `Number` covers `price`, `year`, and `mileage`; everything else is
/// `Text`. [`ListingRecord::set`] rejects a mismatched shape rather than
/// coercing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(u32),
    Text(String),
}

impl FieldValue {
    #[must_use]
    pub fn as_number(&self) -> Option<u32> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(_) => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Number(_) => None,
            FieldValue::Text(s) => Some(s.as_str()),
        }
    }
}

/// The resolved output record. All fields optional; absence means "not
/// found", which is distinct from a present-but-low-confidence value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingRecord {
    pub source_url: Option<String>,
    /// Coarse site classification: `marketplace`, `classifieds`,
    /// `dealer_site`, or `unknown`.
    pub source_site: Option<String>,
    /// Whole currency units within the sanity bound.
    pub price: Option<u32>,
    pub year: Option<u32>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub trim: Option<String>,
    pub mileage: Option<u32>,
    pub vin: Option<String>,
    pub dealer_name: Option<String>,
    pub dealer_city: Option<String>,
    pub dealer_state: Option<String>,
    pub zip: Option<String>,
    pub image_url: Option<String>,
}

impl ListingRecord {
    /// Reads a field as a [`FieldValue`], `None` when unpopulated.
    #[must_use]
    pub fn get(&self, field: ListingField) -> Option<FieldValue> {
        match field {
            ListingField::Price => self.price.map(FieldValue::Number),
            ListingField::Year => self.year.map(FieldValue::Number),
            ListingField::Mileage => self.mileage.map(FieldValue::Number),
            ListingField::Make => self.make.clone().map(FieldValue::Text),
            ListingField::Model => self.model.clone().map(FieldValue::Text),
            ListingField::Trim => self.trim.clone().map(FieldValue::Text),
            ListingField::Vin => self.vin.clone().map(FieldValue::Text),
            ListingField::DealerName => self.dealer_name.clone().map(FieldValue::Text),
            ListingField::DealerCity => self.dealer_city.clone().map(FieldValue::Text),
            ListingField::DealerState => self.dealer_state.clone().map(FieldValue::Text),
            ListingField::Zip => self.zip.clone().map(FieldValue::Text),
            ListingField::ImageUrl => self.image_url.clone().map(FieldValue::Text),
        }
    }

    /// Writes a field from a [`FieldValue`]. Returns `false` (and leaves
    /// the record untouched) when the value shape does not match the
    /// field, e.g. `Text` supplied for `price`.
    pub fn set(&mut self, field: ListingField, value: FieldValue) -> bool {
        match (field, value) {
            (ListingField::Price, FieldValue::Number(n)) => self.price = Some(n),
            (ListingField::Year, FieldValue::Number(n)) => self.year = Some(n),
            (ListingField::Mileage, FieldValue::Number(n)) => self.mileage = Some(n),
            (ListingField::Make, FieldValue::Text(s)) => self.make = Some(s),
            (ListingField::Model, FieldValue::Text(s)) => self.model = Some(s),
            (ListingField::Trim, FieldValue::Text(s)) => self.trim = Some(s),
            (ListingField::Vin, FieldValue::Text(s)) => self.vin = Some(s),
            (ListingField::DealerName, FieldValue::Text(s)) => self.dealer_name = Some(s),
            (ListingField::DealerCity, FieldValue::Text(s)) => self.dealer_city = Some(s),
            (ListingField::DealerState, FieldValue::Text(s)) => self.dealer_state = Some(s),
            (ListingField::Zip, FieldValue::Text(s)) => self.zip = Some(s),
            (ListingField::ImageUrl, FieldValue::Text(s)) => self.image_url = Some(s),
            _ => return false,
        }
        true
    }

    #[must_use]
    pub fn is_populated(&self, field: ListingField) -> bool {
        self.get(field).is_some()
    }

    /// Fields currently populated, in [`ListingField::ALL`] order.
    #[must_use]
    pub fn populated_fields(&self) -> Vec<ListingField> {
        ListingField::ALL
            .into_iter()
            .filter(|f| self.is_populated(*f))
            .collect()
    }
}

/// Error taxonomy surfaced through [`Diagnostics::error_type`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    Timeout,
    HttpError,
    BotBlock,
    ParseError,
    Unknown,
}

/// One raw price or mileage match considered during extraction, kept for
/// caller-side transparency and debugging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldCandidate {
    pub value: u32,
    /// The label pattern that produced the match, e.g. `"internet price"`.
    pub label: String,
    /// Strategy name that produced the candidate.
    pub source: String,
    /// A short snippet of surrounding text.
    pub context: String,
    /// Occurrence count for frequency-ranked candidates, `1.0` otherwise.
    pub score: f32,
    pub flags: Vec<String>,
}

/// Per-request extraction diagnostics. Constructed fresh per request and
/// never mutated after being returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostics {
    pub final_url: Option<String>,
    pub page_title: Option<String>,
    /// Real HTTP status, or [`NO_HTTP_STATUS`] when none was received.
    pub http_status: i32,
    pub blocked: bool,
    pub block_reason: Option<String>,
    pub error_type: Option<ErrorType>,
    pub error_message: Option<String>,
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
    pub platform_detected: Option<String>,
    /// Which strategy ultimately supplied each populated field.
    pub extraction_strategy_used: BTreeMap<ListingField, String>,
    /// Aggregate confidence score in `[0, 1]`, see [`crate::gate`].
    pub confidence: f32,
    pub price_candidates: Vec<FieldCandidate>,
    pub mileage_candidates: Vec<FieldCandidate>,
    pub issues: Vec<String>,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Diagnostics {
            final_url: None,
            page_title: None,
            http_status: NO_HTTP_STATUS,
            blocked: false,
            block_reason: None,
            error_type: None,
            error_message: None,
            content_type: None,
            content_length: None,
            platform_detected: None,
            extraction_strategy_used: BTreeMap::new(),
            confidence: 0.0,
            price_candidates: Vec::new(),
            mileage_candidates: Vec::new(),
            issues: Vec::new(),
        }
    }
}

/// The full result of one resolution request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    pub record: ListingRecord,
    pub confidence_by_field: BTreeMap<ListingField, Confidence>,
    pub diagnostics: Diagnostics,
    /// True when the caller must obtain manual confirmation before using
    /// the record (blocked fetch or aggregate confidence below gate).
    pub requires_user_input: bool,
    /// Fields whose values were human-supplied rather than extracted.
    pub confirmed_overrides: Vec<ListingField>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_orders_low_to_high() {
        assert!(Confidence::Low < Confidence::Medium);
        assert!(Confidence::Medium < Confidence::High);
    }

    #[test]
    fn set_rejects_mismatched_shape() {
        let mut record = ListingRecord::default();
        assert!(!record.set(ListingField::Price, FieldValue::Text("cheap".into())));
        assert_eq!(record.price, None);
        assert!(record.set(ListingField::Price, FieldValue::Number(24_500)));
        assert_eq!(record.price, Some(24_500));
    }

    #[test]
    fn get_and_set_round_trip_every_field() {
        let mut record = ListingRecord::default();
        for field in ListingField::ALL {
            let value = match field {
                ListingField::Price | ListingField::Year | ListingField::Mileage => {
                    FieldValue::Number(2021)
                }
                _ => FieldValue::Text("x".into()),
            };
            assert!(record.set(field, value.clone()));
            assert_eq!(record.get(field), Some(value));
        }
        assert_eq!(record.populated_fields().len(), ListingField::ALL.len());
    }

    #[test]
    fn diagnostics_default_uses_sentinel_status() {
        let diag = Diagnostics::default();
        assert_eq!(diag.http_status, NO_HTTP_STATUS);
        assert_ne!(diag.http_status, 0, "sentinel must never be zero");
    }

    #[test]
    fn field_serializes_camel_case() {
        let json = serde_json::to_string(&ListingField::DealerName).unwrap();
        assert_eq!(json, "\"dealerName\"");
        assert_eq!(ListingField::DealerName.as_str(), "dealerName");
    }

    #[test]
    fn record_serializes_camel_case() {
        let record = ListingRecord {
            dealer_name: Some("Springfield Motors".into()),
            ..ListingRecord::default()
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["dealerName"], "Springfield Motors");
    }
}
