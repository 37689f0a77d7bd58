//! Field-level merge of strategy outputs.
//!
//! Last-writer-wins by strategy priority: extractions are applied in
//! [`STRATEGY_PRIORITY`] order (ascending), so the highest-priority
//! non-empty value survives and carries its own confidence. Values are
//! never averaged or blended. This component has no I/O and cannot fail.

use std::collections::BTreeMap;

use lotscout_core::types::{Confidence, FieldCandidate, ListingField, ListingRecord};

use crate::strategies::{Extraction, STRATEGY_PRIORITY};

/// How many raw price/mileage candidates survive into diagnostics.
const MAX_CANDIDATES: usize = 5;

/// The merged output of all strategies, before the pipeline folds in
/// fetch diagnostics.
#[derive(Debug, Clone, Default)]
pub struct ResolvedFields {
    pub record: ListingRecord,
    pub confidence_by_field: BTreeMap<ListingField, Confidence>,
    pub strategy_by_field: BTreeMap<ListingField, String>,
    pub price_candidates: Vec<FieldCandidate>,
    pub mileage_candidates: Vec<FieldCandidate>,
    pub page_title: Option<String>,
    pub issues: Vec<String>,
}

/// Merges strategy extractions into one record plus confidence and
/// provenance maps. An empty extraction is a valid input, not an error.
#[must_use]
pub fn merge(extractions: &[Extraction]) -> ResolvedFields {
    let mut out = ResolvedFields::default();

    for strategy in STRATEGY_PRIORITY {
        let Some(extraction) = extractions.iter().find(|e| e.strategy == strategy) else {
            continue;
        };

        for candidate in extraction.candidates() {
            if out.record.set(candidate.field, candidate.value.clone()) {
                out.confidence_by_field
                    .insert(candidate.field, candidate.confidence);
                out.strategy_by_field
                    .insert(candidate.field, strategy.as_str().to_string());
            }
        }

        out.price_candidates
            .extend(extraction.price_candidates.iter().cloned());
        out.mileage_candidates
            .extend(extraction.mileage_candidates.iter().cloned());
        if extraction.page_title.is_some() {
            out.page_title.clone_from(&extraction.page_title);
        }
        out.issues.extend(extraction.issues.iter().cloned());
    }

    out.price_candidates.truncate(MAX_CANDIDATES);
    out.mileage_candidates.truncate(MAX_CANDIDATES);
    out
}

#[cfg(test)]
#[path = "resolve_test.rs"]
mod tests;
