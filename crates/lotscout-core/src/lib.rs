//! Shared domain types for the listing extraction pipeline.
//!
//! A resolution request produces a [`Resolution`]: one [`ListingRecord`],
//! a per-field [`Confidence`] map, and a [`Diagnostics`] object that
//! transparency UIs consume verbatim. Nothing in this crate performs I/O.

pub mod app_config;
pub mod bounds;
pub mod gate;
pub mod types;

pub use app_config::AppConfig;
pub use gate::{confidence_score, requires_user_input, GATE_CONFIDENCE_THRESHOLD};
pub use types::{
    Confidence, Diagnostics, ErrorType, FieldCandidate, FieldValue, ListingField, ListingRecord,
    Resolution, NO_HTTP_STATUS,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid configuration value for {var}: {reason}")]
    InvalidConfig { var: String, reason: String },
}
