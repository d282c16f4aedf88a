//! Tolerant decoding of the encoded fields on [`ExecutionRecord`].
//!
//! Historical rows store competitor maps, mention lists and source lists as
//! JSON text, newer rows as JSON values, and a share of rows hold values that
//! decode as neither. A bad field must never abort an aggregation: every
//! decode goes through [`parse_or_default`], which falls back to the caller's
//! default for that one field on that one record.

use aivis_core::{BrandAliases, ExecutionRecord, SourceCitation};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::urls::normalize_domain;

/// Decode `encoded` into `T`, returning `default` on any failure.
///
/// - `None` and JSON `null` yield `default`.
/// - A JSON string is treated as an encoded text column and parsed as JSON.
/// - Any other value is decoded directly.
///
/// Failures are logged at `debug` and never surfaced to the caller.
pub fn parse_or_default<T: DeserializeOwned>(encoded: Option<&Value>, default: T) -> T {
    let Some(value) = encoded else {
        return default;
    };

    let decoded = match value {
        Value::Null => return default,
        Value::String(text) => serde_json::from_str::<T>(text),
        other => T::deserialize(other),
    };

    match decoded {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::debug!(error = %e, "malformed encoded field, using default");
            default
        }
    }
}

/// One execution record with its encoded fields decoded and cleaned.
///
/// Competitor names are resolved through the caller's [`BrandAliases`] and
/// entries naming the business itself are dropped, so downstream components
/// never see the business on the competitor side.
#[derive(Debug, Clone)]
pub struct DecodedRecord<'a> {
    pub record: &'a ExecutionRecord,
    /// Competitor name → visibility fraction in `[0, 1]`, in source order.
    pub competitor_visibilities: IndexMap<String, f64>,
    /// Competitor names mentioned in the response, deduplicated, in source order.
    pub competitors_mentioned: Vec<String>,
    /// Citations with a non-empty, normalized `domain`.
    pub sources: Vec<SourceCitation>,
}

impl<'a> DecodedRecord<'a> {
    #[must_use]
    pub fn decode(record: &'a ExecutionRecord, aliases: &BrandAliases, business: &str) -> Self {
        let competitor_visibilities =
            decode_competitor_visibilities(record, aliases, business);
        let competitors_mentioned = decode_competitors_mentioned(record, aliases, business);
        let sources = decode_sources(record);

        Self {
            record,
            competitor_visibilities,
            competitors_mentioned,
            sources,
        }
    }

    /// Business visibility fraction, if evaluated. Non-finite values count as
    /// not evaluated; finite values are clamped to `[0, 1]`.
    #[must_use]
    pub fn business_visibility(&self) -> Option<f64> {
        self.record
            .business_visibility
            .filter(|v| v.is_finite())
            .map(|v| v.clamp(0.0, 1.0))
    }

    #[must_use]
    pub fn brand_mentioned(&self) -> bool {
        self.record.brand_mentioned()
    }

    /// Returns `true` if `name` appears in the decoded mention list.
    #[must_use]
    pub fn mentions_competitor(&self, name: &str) -> bool {
        self.competitors_mentioned
            .iter()
            .any(|m| m.eq_ignore_ascii_case(name))
    }

    /// Response mentioned at least one competitor but not the business.
    #[must_use]
    pub fn is_content_gap(&self) -> bool {
        !self.competitors_mentioned.is_empty() && !self.brand_mentioned()
    }
}

/// Decode every record once for a single engine invocation.
#[must_use]
pub fn decode_all<'a>(
    records: &'a [ExecutionRecord],
    aliases: &BrandAliases,
    business: &str,
) -> Vec<DecodedRecord<'a>> {
    records
        .iter()
        .map(|record| DecodedRecord::decode(record, aliases, business))
        .collect()
}

fn decode_competitor_visibilities(
    record: &ExecutionRecord,
    aliases: &BrandAliases,
    business: &str,
) -> IndexMap<String, f64> {
    let raw: IndexMap<String, Value> =
        parse_or_default(record.competitor_visibilities.as_ref(), IndexMap::new());

    let mut cleaned: IndexMap<String, f64> = IndexMap::with_capacity(raw.len());
    for (name, value) in raw {
        let Some(fraction) = visibility_fraction(&value) else {
            tracing::debug!(
                record_id = record.id,
                competitor = %name,
                "skipping non-numeric competitor visibility"
            );
            continue;
        };

        let canonical = aliases.canonical(&name);
        if canonical.is_empty() || canonical.eq_ignore_ascii_case(business.trim()) {
            continue;
        }

        // Two aliases of one brand in the same response keep the stronger value.
        cleaned
            .entry(canonical)
            .and_modify(|existing| *existing = existing.max(fraction))
            .or_insert(fraction);
    }
    cleaned
}

/// Interpret one competitor-map value as a fraction.
///
/// Numbers are clamped into `[0, 1]`; booleans are the legacy 0/1 flags.
fn visibility_fraction(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()).map(|v| v.clamp(0.0, 1.0)),
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        _ => None,
    }
}

fn decode_competitors_mentioned(
    record: &ExecutionRecord,
    aliases: &BrandAliases,
    business: &str,
) -> Vec<String> {
    let raw: Vec<Value> = parse_or_default(record.competitors_mentioned.as_ref(), Vec::new());

    let mut names: Vec<String> = Vec::with_capacity(raw.len());
    for value in raw {
        let Value::String(name) = value else {
            continue;
        };
        let canonical = aliases.canonical(&name);
        if canonical.is_empty() || canonical.eq_ignore_ascii_case(business.trim()) {
            continue;
        }
        if !names.iter().any(|n| n.eq_ignore_ascii_case(&canonical)) {
            names.push(canonical);
        }
    }
    names
}

fn decode_sources(record: &ExecutionRecord) -> Vec<SourceCitation> {
    let raw: Vec<Value> = parse_or_default(record.sources.as_ref(), Vec::new());

    raw.into_iter()
        .filter_map(|value| match SourceCitation::deserialize(&value) {
            Ok(citation) => Some(citation),
            Err(e) => {
                tracing::debug!(record_id = record.id, error = %e, "skipping malformed source entry");
                None
            }
        })
        .filter_map(|mut citation| {
            let domain = if citation.domain.trim().is_empty() {
                normalize_domain(&citation.url)
            } else {
                normalize_domain(&citation.domain)
            };
            if domain.is_empty() {
                return None;
            }
            citation.domain = domain;
            Some(citation)
        })
        .collect()
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
