//! Listing extraction pipeline.
//!
//! Fetches a vehicle-listing page (or takes raw pasted text), runs four
//! independent extraction strategies over the same document snapshot, and
//! merges their partial outputs into one [`lotscout_core::Resolution`]
//! with per-field confidence and full diagnostics. Degrades gracefully on
//! bot-blocked or unreachable pages; never fabricates data.

pub mod error;
pub mod fetch;
pub mod pipeline;
pub mod resolve;
pub mod site;
pub mod strategies;
pub mod text;

pub use error::ExtractError;
pub use fetch::{FetchGateway, FetchOutcome};
pub use pipeline::{apply_confirmed, resolve_text, resolve_url};
pub use strategies::{Extraction, Strategy, STRATEGY_PRIORITY};
