//! Source benchmark and gap analysis.
//!
//! Looks at which domains models cite, in which responses, and whether the
//! business or its competitors were mentioned alongside. Brand presence on
//! the source side comes from `brandMentionCount` and the decoded
//! `competitorsMentioned` list, not from visibility scores.

mod benchmark;
mod mix;

pub use benchmark::{priority_score, DomainBenchmark, GapSummary, HIGH_PRIORITY_THRESHOLD};
pub use mix::{categorize_source_type, SourceCategory, SourceMix};

use aivis_core::Competitor;
use serde::Serialize;

use crate::parse::DecodedRecord;
use crate::stats::top_k_by;

/// Rows of the domain benchmark returned to dashboard callers.
pub const MAX_BENCHMARK_ROWS: usize = 30;

pub const MAX_PRIORITY_GAPS: usize = 20;

pub const MAX_LEADING_SOURCES: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceAnalysis {
    /// Every cited domain, most cited first.
    pub benchmark: Vec<DomainBenchmark>,
    pub gap_summary: GapSummary,
    pub priority_gaps: Vec<DomainBenchmark>,
    pub sources_where_you_lead: Vec<DomainBenchmark>,
    pub source_mix_by_brand: Vec<SourceMix>,
    pub total_responses: usize,
    pub total_content_gap_responses: usize,
}

/// Benchmark every cited domain and derive gap lists and source-type mixes.
#[must_use]
pub fn analyze_sources(
    records: &[DecodedRecord<'_>],
    business: &str,
    competitors: &[Competitor],
) -> SourceAnalysis {
    let stats = benchmark::benchmark_domains(records);
    let gap_summary = GapSummary::from_domains(&stats.domains);

    let priority_gaps = top_k_by(
        stats
            .domains
            .iter()
            .filter(|d| d.content_gap_opportunity)
            .cloned()
            .collect(),
        MAX_PRIORITY_GAPS,
        |d| f64::from(d.priority_score),
    );

    let sources_where_you_lead = top_k_by(
        stats
            .domains
            .iter()
            .filter(|d| d.your_appearances() > d.competitor_appearances())
            .cloned()
            .collect(),
        MAX_LEADING_SOURCES,
        |d| f64::from(d.your_appearances()),
    );

    let source_mix_by_brand = mix::source_mix_by_brand(records, business, competitors);
    let benchmark = top_k_by(stats.domains, usize::MAX, |d| f64::from(d.total_citations));

    tracing::debug!(
        domains = benchmark.len(),
        responses = stats.total_responses,
        content_gap_responses = stats.total_content_gap_responses,
        high_priority_gaps = gap_summary.high_priority_gaps,
        "benchmarked cited sources"
    );

    SourceAnalysis {
        benchmark,
        gap_summary,
        priority_gaps,
        sources_where_you_lead,
        source_mix_by_brand,
        total_responses: stats.total_responses,
        total_content_gap_responses: stats.total_content_gap_responses,
    }
}

#[cfg(test)]
#[path = "sources_test.rs"]
mod tests;
