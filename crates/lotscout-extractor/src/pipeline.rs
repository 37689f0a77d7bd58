//! Pipeline entry points.
//!
//! `resolve_url` fetches a listing page and runs all four strategies;
//! `resolve_text` runs the pattern fallback over raw pasted text. Both
//! short-circuit on caller-supplied confirmed data and both end at the
//! resolution gate. The only error either returns is malformed caller
//! input; every fetch or parse problem resolves to a normal
//! [`Resolution`] with diagnostics describing it.

use std::collections::BTreeMap;

use lotscout_core::types::{Confidence, Diagnostics, ErrorType, ListingRecord, Resolution};
use lotscout_core::{gate, AppConfig};

use crate::error::ExtractError;
use crate::fetch::{FetchGateway, FetchOutcome};
use crate::resolve::{merge, ResolvedFields};
use crate::strategies::{fallback, framework, meta, structured};
use crate::{site, text};

/// Resolves a listing from its URL.
///
/// When `confirmed` is supplied, extraction is skipped entirely and the
/// confirmed fields are returned at High confidence by fiat.
///
/// # Errors
///
/// [`ExtractError::InvalidUrl`] for a URL that is not absolute http(s);
/// [`ExtractError::ClientBuild`] if the HTTP client cannot be built.
pub async fn resolve_url(
    url: &str,
    confirmed: Option<&ListingRecord>,
    config: &AppConfig,
) -> Result<Resolution, ExtractError> {
    validate_url(url)?;
    let (source_site, platform) = site::classify(url);

    if let Some(confirmed) = confirmed {
        return Ok(confirmed_resolution(
            confirmed,
            Some(url),
            &source_site,
            platform,
        ));
    }

    let gateway = FetchGateway::new(config.request_timeout_secs, &config.user_agent)?;
    let outcome = gateway.fetch(url).await;
    Ok(resolve_outcome(url, &source_site, platform, outcome, config))
}

/// Resolves a listing from raw pasted text. Only the pattern-fallback
/// strategy applies; there is no markup to read.
///
/// # Errors
///
/// [`ExtractError::EmptyText`] when the text is blank.
pub fn resolve_text(
    raw_text: &str,
    confirmed: Option<&ListingRecord>,
    config: &AppConfig,
) -> Result<Resolution, ExtractError> {
    if let Some(confirmed) = confirmed {
        return Ok(confirmed_resolution(confirmed, None, "unknown", None));
    }
    if raw_text.trim().is_empty() {
        return Err(ExtractError::EmptyText);
    }

    let flattened = text::flatten_html(raw_text);
    let extraction = fallback::extract(&flattened, config.fallback_price_freq_threshold);
    let resolved = merge(&[extraction]);

    let mut diagnostics = Diagnostics {
        extraction_strategy_used: resolved.strategy_by_field.clone(),
        price_candidates: resolved.price_candidates.clone(),
        mileage_candidates: resolved.mileage_candidates.clone(),
        issues: resolved.issues.clone(),
        ..Diagnostics::default()
    };
    if resolved.record == ListingRecord::default() {
        diagnostics
            .issues
            .push("no fields extracted from text".to_string());
    }

    Ok(finish(resolved, diagnostics))
}

/// Applies human-confirmed values on top of an existing resolution.
///
/// Confirmed fields overwrite extracted ones wholesale at High
/// confidence, `confirmed_overrides` lists exactly the supplied keys,
/// and every untouched field keeps its original value and confidence.
pub fn apply_confirmed(resolution: &mut Resolution, confirmed: &ListingRecord) {
    for field in confirmed.populated_fields() {
        if let Some(value) = confirmed.get(field) {
            resolution.record.set(field, value);
            resolution
                .confidence_by_field
                .insert(field, Confidence::High);
            resolution
                .diagnostics
                .extraction_strategy_used
                .insert(field, "confirmed".to_string());
            if !resolution.confirmed_overrides.contains(&field) {
                resolution.confirmed_overrides.push(field);
            }
        }
    }
    resolution.diagnostics.confidence =
        gate::confidence_score(&resolution.record, &resolution.confidence_by_field);
    resolution.requires_user_input = false;
}

fn validate_url(url: &str) -> Result<(), ExtractError> {
    let parsed = reqwest::Url::parse(url).map_err(|e| ExtractError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ExtractError::InvalidUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme {:?}", parsed.scheme()),
        });
    }
    if parsed.host_str().is_none() {
        return Err(ExtractError::InvalidUrl {
            url: url.to_string(),
            reason: "missing host".to_string(),
        });
    }
    Ok(())
}

fn resolve_outcome(
    url: &str,
    source_site: &str,
    platform: Option<String>,
    outcome: FetchOutcome,
    config: &AppConfig,
) -> Resolution {
    match outcome {
        FetchOutcome::Success {
            body,
            status,
            final_url,
            content_type,
            content_length,
        } => {
            // The four strategies are independent reads of the same
            // immutable snapshot; merge order is priority-based, not
            // arrival-based.
            let extractions = [
                structured::extract(&body),
                framework::extract(&body),
                meta::extract(&body),
                fallback::extract(
                    &text::flatten_html(&body),
                    config.fallback_price_freq_threshold,
                ),
            ];
            let resolved = merge(&extractions);

            let mut diagnostics = Diagnostics {
                final_url: Some(final_url),
                page_title: resolved.page_title.clone(),
                http_status: i32::from(status),
                content_type,
                content_length: Some(content_length),
                platform_detected: platform,
                extraction_strategy_used: resolved.strategy_by_field.clone(),
                price_candidates: resolved.price_candidates.clone(),
                mileage_candidates: resolved.mileage_candidates.clone(),
                issues: resolved.issues.clone(),
                ..Diagnostics::default()
            };
            if resolved.record == ListingRecord::default() {
                diagnostics
                    .issues
                    .push("no fields extracted from page".to_string());
            }

            let mut resolution = finish(resolved, diagnostics);
            resolution.record.source_url = Some(url.to_string());
            resolution.record.source_site = Some(source_site.to_string());
            resolution
        }
        FetchOutcome::Blocked {
            reason,
            status,
            final_url,
        } => {
            // A blocked fetch must not leak partial guesses; only the
            // source fields are populated.
            let diagnostics = Diagnostics {
                final_url: Some(final_url),
                http_status: i32::from(status),
                blocked: true,
                block_reason: Some(reason.clone()),
                error_type: Some(ErrorType::BotBlock),
                platform_detected: platform,
                issues: vec![
                    format!("fetch blocked: {reason}"),
                    "no extraction performed".to_string(),
                ],
                ..Diagnostics::default()
            };
            source_only_resolution(url, source_site, diagnostics)
        }
        FetchOutcome::HttpError { status, final_url } => {
            let diagnostics = Diagnostics {
                final_url: Some(final_url),
                http_status: i32::from(status),
                error_type: Some(ErrorType::HttpError),
                error_message: Some(format!("HTTP {status}")),
                platform_detected: platform,
                issues: vec!["no extraction performed".to_string()],
                ..Diagnostics::default()
            };
            source_only_resolution(url, source_site, diagnostics)
        }
        FetchOutcome::Failed {
            error_type,
            message,
        } => {
            let diagnostics = Diagnostics {
                error_type: Some(error_type),
                error_message: Some(message),
                platform_detected: platform,
                issues: vec!["no extraction performed".to_string()],
                ..Diagnostics::default()
            };
            source_only_resolution(url, source_site, diagnostics)
        }
    }
}

/// Wraps merged fields into a [`Resolution`], computing the aggregate
/// confidence and the gate decision.
fn finish(resolved: ResolvedFields, mut diagnostics: Diagnostics) -> Resolution {
    diagnostics.confidence =
        gate::confidence_score(&resolved.record, &resolved.confidence_by_field);
    let requires_user_input = gate::requires_user_input(
        &resolved.record,
        &resolved.confidence_by_field,
        &diagnostics,
        false,
    );
    Resolution {
        record: resolved.record,
        confidence_by_field: resolved.confidence_by_field,
        diagnostics,
        requires_user_input,
        confirmed_overrides: Vec::new(),
    }
}

fn source_only_resolution(url: &str, source_site: &str, diagnostics: Diagnostics) -> Resolution {
    let record = ListingRecord {
        source_url: Some(url.to_string()),
        source_site: Some(source_site.to_string()),
        ..ListingRecord::default()
    };
    Resolution {
        record,
        confidence_by_field: BTreeMap::new(),
        diagnostics,
        requires_user_input: true,
        confirmed_overrides: Vec::new(),
    }
}

fn confirmed_resolution(
    confirmed: &ListingRecord,
    source_url: Option<&str>,
    source_site: &str,
    platform: Option<String>,
) -> Resolution {
    let overrides = confirmed.populated_fields();
    let mut record = confirmed.clone();
    record.source_url = source_url.map(str::to_string);
    record.source_site = Some(source_site.to_string());

    let mut confidence_by_field = BTreeMap::new();
    let mut strategy_used = BTreeMap::new();
    for field in &overrides {
        confidence_by_field.insert(*field, Confidence::High);
        strategy_used.insert(*field, "confirmed".to_string());
    }

    let mut diagnostics = Diagnostics {
        platform_detected: platform,
        extraction_strategy_used: strategy_used,
        issues: vec!["extraction skipped: confirmed data supplied".to_string()],
        ..Diagnostics::default()
    };
    diagnostics.confidence = gate::confidence_score(&record, &confidence_by_field);

    Resolution {
        record,
        confidence_by_field,
        diagnostics,
        requires_user_input: false,
        confirmed_overrides: overrides,
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
