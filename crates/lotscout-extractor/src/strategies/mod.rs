//! Extraction strategies.
//!
//! Four independent strategies run over the same immutable document
//! snapshot: structured data (JSON-LD), framework data (`__NEXT_DATA__`),
//! meta tags, and pattern fallback over flattened text. Merge priority is
//! the explicit [`STRATEGY_PRIORITY`] ordering, not call order.

pub mod fallback;
pub mod framework;
pub mod meta;
pub mod structured;

use lotscout_core::types::{Confidence, FieldCandidate, FieldValue, ListingField};

/// The extraction strategies, named by their data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    PatternFallback,
    MetaTags,
    FrameworkData,
    StructuredData,
}

impl Strategy {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::PatternFallback => "pattern_fallback",
            Strategy::MetaTags => "meta_tags",
            Strategy::FrameworkData => "framework_data",
            Strategy::StructuredData => "structured_data",
        }
    }
}

/// Merge order, ascending priority: a later entry's fields overwrite an
/// earlier entry's. This ordering is the contract the resolver tests
/// pin down; call order elsewhere is irrelevant.
pub const STRATEGY_PRIORITY: [Strategy; 4] = [
    Strategy::PatternFallback,
    Strategy::MetaTags,
    Strategy::FrameworkData,
    Strategy::StructuredData,
];

/// One field value proposed by a strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub field: ListingField,
    pub value: FieldValue,
    pub confidence: Confidence,
}

/// The partial output of one strategy over one document.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub strategy: Strategy,
    candidates: Vec<Candidate>,
    /// Raw price matches considered, including out-of-bounds ones.
    pub price_candidates: Vec<FieldCandidate>,
    /// Raw mileage matches considered.
    pub mileage_candidates: Vec<FieldCandidate>,
    pub page_title: Option<String>,
    pub issues: Vec<String>,
}

impl Extraction {
    #[must_use]
    pub fn new(strategy: Strategy) -> Self {
        Extraction {
            strategy,
            candidates: Vec::new(),
            price_candidates: Vec::new(),
            mileage_candidates: Vec::new(),
            page_title: None,
            issues: Vec::new(),
        }
    }

    /// Records a field value. Within one strategy, first-found wins:
    /// a second value for the same field is dropped.
    pub fn push(&mut self, field: ListingField, value: FieldValue, confidence: Confidence) {
        if self.get(field).is_none() {
            self.candidates.push(Candidate {
                field,
                value,
                confidence,
            });
        }
    }

    #[must_use]
    pub fn get(&self, field: ListingField) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.field == field)
    }

    #[must_use]
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_order_is_fallback_meta_framework_structured() {
        assert_eq!(
            STRATEGY_PRIORITY,
            [
                Strategy::PatternFallback,
                Strategy::MetaTags,
                Strategy::FrameworkData,
                Strategy::StructuredData,
            ]
        );
    }

    #[test]
    fn first_found_wins_within_a_strategy() {
        let mut extraction = Extraction::new(Strategy::StructuredData);
        extraction.push(
            ListingField::Price,
            FieldValue::Number(24_500),
            Confidence::High,
        );
        extraction.push(
            ListingField::Price,
            FieldValue::Number(99_999),
            Confidence::High,
        );
        assert_eq!(
            extraction.get(ListingField::Price).map(|c| &c.value),
            Some(&FieldValue::Number(24_500))
        );
        assert_eq!(extraction.candidates().len(), 1);
    }
}
