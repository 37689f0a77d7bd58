//! Sanity bounds applied to extracted numeric fields.
//!
//! Values outside these ranges are discarded silently at extraction time;
//! they may still appear in diagnostics candidate lists, flagged, but
//! never in the resolved record.

use chrono::Datelike;

/// Rejects monthly-payment amounts and other sub-vehicle noise.
pub const PRICE_MIN: u32 = 500;
/// Rejects MSRP-sticker-sum and concatenated-digit noise.
pub const PRICE_MAX: u32 = 200_000;
pub const MILEAGE_MAX: u32 = 500_000;
pub const YEAR_MIN: u32 = 1990;

#[must_use]
pub fn price_in_bounds(value: u32) -> bool {
    (PRICE_MIN..=PRICE_MAX).contains(&value)
}

#[must_use]
pub fn mileage_in_bounds(value: u32) -> bool {
    value <= MILEAGE_MAX
}

/// Upper model-year bound: next year's models are on lots from late in the
/// current calendar year.
#[must_use]
pub fn max_model_year() -> u32 {
    let current = chrono::Utc::now().year();
    u32::try_from(current).map_or(YEAR_MIN, |y| y + 1)
}

#[must_use]
pub fn year_in_bounds(value: u32) -> bool {
    (YEAR_MIN..=max_model_year()).contains(&value)
}

/// VIN shape check: 17 characters, alphanumeric, excluding I/O/Q.
#[must_use]
pub fn is_valid_vin(vin: &str) -> bool {
    vin.len() == 17
        && vin.chars().all(|c| {
            c.is_ascii_alphanumeric() && !matches!(c.to_ascii_uppercase(), 'I' | 'O' | 'Q')
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_bounds_reject_payment_and_sticker_noise() {
        assert!(!price_in_bounds(299), "monthly payment");
        assert!(!price_in_bounds(450_000), "sticker-sum noise");
        assert!(price_in_bounds(500));
        assert!(price_in_bounds(200_000));
        assert!(price_in_bounds(24_500));
    }

    #[test]
    fn mileage_bounds() {
        assert!(mileage_in_bounds(0));
        assert!(mileage_in_bounds(500_000));
        assert!(!mileage_in_bounds(500_001));
    }

    #[test]
    fn year_bounds_track_next_model_year() {
        assert!(!year_in_bounds(1989));
        assert!(year_in_bounds(1990));
        assert!(year_in_bounds(max_model_year()));
        assert!(!year_in_bounds(max_model_year() + 1));
    }

    #[test]
    fn vin_shape() {
        assert!(is_valid_vin("1HGCM82633A004352"));
        assert!(!is_valid_vin("1HGCM82633A00435"), "too short");
        assert!(!is_valid_vin("1HGCM82633A00435Q"), "Q is excluded");
        assert!(!is_valid_vin("1HGCM82633A0043-2"), "punctuation");
    }
}
