//! Headline numbers joined from the other components.

use serde::Serialize;

use crate::positioning::PositioningEntry;
use crate::query_insights::QueryAnalysis;
use crate::sources::SourceAnalysis;
use crate::stats::{as_f64, pct_of, round1};

/// Domains listed under `top_sources_used`.
pub const MAX_TOP_SOURCES: usize = 5;

#[derive(Debug, Clone, Copy)]
pub struct ScorecardInputs<'a> {
    pub positioning: &'a [PositioningEntry],
    pub sources: &'a SourceAnalysis,
    pub queries: &'a QueryAnalysis,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopSource {
    pub domain: String,
    pub total_citations: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scorecard {
    pub your_visibility: u32,
    pub avg_competitor_visibility: f64,
    pub visibility_gap: f64,
    /// 1-based position in the positioning table, `0` when absent.
    pub your_rank: usize,
    pub total_brands: usize,
    pub prompts_where_you_appear: usize,
    pub total_prompts: usize,
    pub prompt_coverage_pct: f64,
    pub sources_with_your_presence: usize,
    pub sources_with_competitor_only: usize,
    pub top_sources_used: Vec<TopSource>,
    pub head_to_head_win_rate: f64,
}

#[must_use]
pub fn compose_scorecard(inputs: &ScorecardInputs<'_>) -> Scorecard {
    let positioning = inputs.positioning;

    let your_rank = positioning
        .iter()
        .position(|e| e.is_business)
        .map_or(0, |idx| idx + 1);
    let your_visibility = positioning
        .iter()
        .find(|e| e.is_business)
        .map_or(0, |e| e.visibility);

    let competitor_visibilities: Vec<f64> = positioning
        .iter()
        .filter(|e| !e.is_business)
        .map(|e| f64::from(e.visibility))
        .collect();
    let avg_competitor_visibility = round1(mean(&competitor_visibilities));

    let head_to_head_rates: Vec<f64> = inputs
        .queries
        .head_to_head
        .iter()
        .map(|h| f64::from(h.win_rate))
        .collect();

    let domains = &inputs.sources.benchmark;

    Scorecard {
        your_visibility,
        avg_competitor_visibility,
        visibility_gap: round1(f64::from(your_visibility) - avg_competitor_visibility),
        your_rank,
        total_brands: positioning.len(),
        prompts_where_you_appear: inputs.queries.prompts_where_business_appears,
        total_prompts: inputs.queries.total_prompts,
        prompt_coverage_pct: pct_of(
            inputs.queries.prompts_where_business_appears,
            inputs.queries.total_prompts,
        ),
        sources_with_your_presence: inputs.sources.gap_summary.domains_with_your_brand,
        sources_with_competitor_only: domains.iter().filter(|d| d.content_gap_opportunity).count(),
        top_sources_used: domains
            .iter()
            .take(MAX_TOP_SOURCES)
            .map(|d| TopSource {
                domain: d.domain.clone(),
                total_citations: d.total_citations,
            })
            .collect(),
        head_to_head_win_rate: round1(mean(&head_to_head_rates)),
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / as_f64(values.len())
    }
}
