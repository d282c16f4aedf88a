//! Request/response boundary over a [`RecordStore`].
//!
//! Each entry point resolves the request's date window, fetches records for
//! the tracked business, decodes them once and runs the pure components.

mod store;
mod window;

pub use store::{MemoryStore, RecordStore};
pub use window::{DateRange, DateWindow};

use std::collections::BTreeMap;
use std::thread;

use aivis_core::{BrandAliases, BusinessProfile, Competitor, ExecutionRecord, TrackingConfig};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain_detail::{domain_detail, DomainDetail};
use crate::error::AnalyticsError;
use crate::lookup::{find_executions, ExecutionMatch, SourceTarget};
use crate::parse::decode_all;
use crate::positioning::{rank_competitive_positioning, PositioningEntry};
use crate::query_insights::{
    analyze_queries, CoOccurrence, HeadToHeadRecord, OutcomeCounts, QueryInsight,
};
use crate::scorecard::{compose_scorecard, Scorecard, ScorecardInputs};
use crate::sources::{
    analyze_sources, DomainBenchmark, GapSummary, SourceMix, MAX_BENCHMARK_ROWS,
};
use crate::time_series::{build_time_series, TimeSeriesPoint};
use crate::visibility::{aggregate_model_visibility, PlatformDirectory, PlatformVisibility};

/// The tracked business and everything needed to interpret its records.
#[derive(Debug, Clone)]
pub struct AnalysisContext {
    pub business: BusinessProfile,
    pub competitors: Vec<Competitor>,
    pub aliases: BrandAliases,
    /// Look-back used by requests that name no dates.
    pub default_days: u32,
}

impl AnalysisContext {
    #[must_use]
    pub fn from_tracking(tracking: &TrackingConfig, default_days: u32) -> Self {
        Self {
            business: tracking.business.clone(),
            competitors: tracking.competitors.clone(),
            aliases: tracking.brand_aliases(),
            default_days,
        }
    }

    fn ensure_business(&self, business_id: i64) -> Result<(), AnalyticsError> {
        if business_id == self.business.id {
            Ok(())
        } else {
            Err(AnalyticsError::BusinessNotFound(business_id))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkRequest {
    pub business_id: i64,
    pub window: DateWindow,
    #[serde(default)]
    pub platform_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryInsightsSummary {
    pub strongest: Vec<QueryInsight>,
    pub weakest: Vec<QueryInsight>,
    pub opportunities: Vec<QueryInsight>,
    pub outcome_counts: OutcomeCounts,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkResponse {
    pub business: BusinessProfile,
    pub date_range: DateRange,
    pub total_executions: usize,
    pub model_visibility: BTreeMap<String, PlatformVisibility>,
    pub competitive_positioning: Vec<PositioningEntry>,
    pub time_series_data: Vec<TimeSeriesPoint>,
    pub query_insights: QueryInsightsSummary,
    pub head_to_head: Vec<HeadToHeadRecord>,
    pub co_occurrence: Vec<CoOccurrence>,
    pub source_benchmark: Vec<DomainBenchmark>,
    pub source_gap_opportunities: Vec<DomainBenchmark>,
    pub sources_where_you_lead: Vec<DomainBenchmark>,
    pub source_mix_by_brand: Vec<SourceMix>,
    pub gap_summary: GapSummary,
    pub scorecard: Scorecard,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainDetailRequest {
    pub business_id: i64,
    pub domain: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub platform_ids: Option<Vec<i64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainDetailResponse {
    pub date_range: DateRange,
    #[serde(flatten)]
    pub detail: DomainDetail,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionLookupRequest {
    pub business_id: i64,
    pub target: SourceTarget,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionLookupResponse {
    pub date_range: DateRange,
    pub executions: Vec<ExecutionMatch>,
}

fn fetch_records<S>(
    store: &S,
    ctx: &AnalysisContext,
    range: &DateRange,
    platform_ids: Option<&[i64]>,
) -> Result<Vec<ExecutionRecord>, AnalyticsError>
where
    S: RecordStore + ?Sized,
{
    let records = store.fetch(ctx.business.id, range, platform_ids)?;
    if records.is_empty() {
        tracing::debug!(
            business_id = ctx.business.id,
            start = %range.start,
            end = %range.end,
            "no execution records in range"
        );
    }
    Ok(records)
}

fn join<T>(handle: thread::ScopedJoinHandle<'_, T>) -> T {
    handle
        .join()
        .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
}

/// Run every benchmark component over one window and compose the scorecard.
///
/// The independent components run on scoped threads over the same decoded
/// records; the scorecard waits for all of them.
///
/// # Errors
///
/// Returns [`AnalyticsError::BusinessNotFound`] when the request names
/// another business, window errors from [`DateWindow::resolve`], and store
/// failures.
pub fn run_benchmark<S, P>(
    store: &S,
    ctx: &AnalysisContext,
    platforms: &P,
    request: &BenchmarkRequest,
    now: DateTime<Utc>,
) -> Result<BenchmarkResponse, AnalyticsError>
where
    S: RecordStore + ?Sized,
    P: PlatformDirectory + Sync + ?Sized,
{
    ctx.ensure_business(request.business_id)?;
    let range = request.window.resolve(now)?;
    let platform_filter = request.platform_id.map(|id| [id]);
    let records = fetch_records(store, ctx, &range, platform_filter.as_ref().map(|ids| &ids[..]))?;

    let business = ctx.business.name.as_str();
    let decoded = decode_all(&records, &ctx.aliases, business);

    let (model_visibility, positioning, time_series, queries, sources) = thread::scope(|s| {
        let visibility = s.spawn(|| aggregate_model_visibility(&decoded, platforms));
        let positioning = s.spawn(|| rank_competitive_positioning(&decoded, business, &ctx.competitors));
        let time_series = s.spawn(|| build_time_series(&decoded, business));
        let queries = s.spawn(|| analyze_queries(&decoded));
        let sources = analyze_sources(&decoded, business, &ctx.competitors);
        (
            join(visibility),
            join(positioning),
            join(time_series),
            join(queries),
            sources,
        )
    });

    let scorecard = compose_scorecard(&ScorecardInputs {
        positioning: &positioning,
        sources: &sources,
        queries: &queries,
    });

    tracing::info!(
        business_id = ctx.business.id,
        start = %range.start,
        end = %range.end,
        executions = records.len(),
        prompts = queries.total_prompts,
        domains = sources.benchmark.len(),
        "benchmark computed"
    );

    let mut source_benchmark = sources.benchmark;
    source_benchmark.truncate(MAX_BENCHMARK_ROWS);

    Ok(BenchmarkResponse {
        business: ctx.business.clone(),
        date_range: range,
        total_executions: records.len(),
        model_visibility,
        competitive_positioning: positioning,
        time_series_data: time_series,
        query_insights: QueryInsightsSummary {
            strongest: queries.strongest,
            weakest: queries.weakest,
            opportunities: queries.opportunities,
            outcome_counts: queries.outcome_counts,
        },
        head_to_head: queries.head_to_head,
        co_occurrence: queries.co_occurrence,
        source_benchmark,
        source_gap_opportunities: sources.priority_gaps,
        sources_where_you_lead: sources.sources_where_you_lead,
        source_mix_by_brand: sources.source_mix_by_brand,
        gap_summary: sources.gap_summary,
        scorecard,
    })
}

/// Per-URL, per-day and per-page-type usage of one cited domain.
///
/// # Errors
///
/// Same as [`run_benchmark`].
pub fn run_domain_detail<S>(
    store: &S,
    ctx: &AnalysisContext,
    request: &DomainDetailRequest,
    now: DateTime<Utc>,
) -> Result<DomainDetailResponse, AnalyticsError>
where
    S: RecordStore + ?Sized,
{
    ctx.ensure_business(request.business_id)?;
    let range = DateWindow::from_bounds(request.start_date, request.end_date, ctx.default_days, now)?
        .resolve(now)?;
    let records = fetch_records(store, ctx, &range, request.platform_ids.as_deref())?;
    let decoded = decode_all(&records, &ctx.aliases, &ctx.business.name);

    let detail = domain_detail(&decoded, &request.domain, &ctx.competitors);
    tracing::info!(
        business_id = ctx.business.id,
        domain = %detail.domain,
        responses = detail.responses_with_domain,
        "domain detail computed"
    );

    Ok(DomainDetailResponse {
        date_range: range,
        detail,
    })
}

/// Executions whose sources cite the requested URL or domain.
///
/// # Errors
///
/// Same as [`run_benchmark`].
pub fn run_execution_lookup<S>(
    store: &S,
    ctx: &AnalysisContext,
    request: &ExecutionLookupRequest,
    now: DateTime<Utc>,
) -> Result<ExecutionLookupResponse, AnalyticsError>
where
    S: RecordStore + ?Sized,
{
    ctx.ensure_business(request.business_id)?;
    let range = DateWindow::from_bounds(request.start_date, request.end_date, ctx.default_days, now)?
        .resolve(now)?;
    let records = fetch_records(store, ctx, &range, None)?;
    let decoded = decode_all(&records, &ctx.aliases, &ctx.business.name);

    let executions = find_executions(&decoded, &request.target);
    tracing::info!(
        business_id = ctx.business.id,
        matches = executions.len(),
        "execution lookup computed"
    );

    Ok(ExecutionLookupResponse {
        date_range: range,
        executions,
    })
}

#[cfg(test)]
#[path = "service_test.rs"]
mod tests;
