//! Competitive visibility analytics over AI-platform execution records.
//!
//! Every component is a pure function of an already-filtered record set:
//! nothing here performs I/O or keeps state between calls. The [`service`]
//! module is the request/response boundary that resolves date windows,
//! fetches records from a [`RecordStore`] and runs the components.

pub mod domain_detail;
pub mod error;
pub mod lookup;
pub mod page_type;
pub mod parse;
pub mod positioning;
pub mod query_insights;
pub mod scorecard;
pub mod service;
pub mod sources;
pub mod stats;
pub mod time_series;
pub mod urls;
pub mod visibility;

pub use domain_detail::{domain_detail, BrandCount, DailyCount, DomainDetail, PageTypeCount, UrlUsage};
pub use error::AnalyticsError;
pub use lookup::{find_executions, ExecutionMatch, SourceTarget};
pub use page_type::{classify_url, effective_page_type, PageType};
pub use parse::{decode_all, parse_or_default, DecodedRecord};
pub use positioning::{rank_competitive_positioning, PositionStatus, PositioningEntry};
pub use query_insights::{
    analyze_queries, classify_outcome, compare_visibility, CoOccurrence, HeadToHeadRecord,
    Outcome, OutcomeCounts, QueryAnalysis, QueryInsight, TIE_BAND,
};
pub use scorecard::{compose_scorecard, Scorecard, ScorecardInputs, TopSource};
pub use service::{
    run_benchmark, run_domain_detail, run_execution_lookup, AnalysisContext, BenchmarkRequest,
    BenchmarkResponse, DateRange, DateWindow, DomainDetailRequest, DomainDetailResponse,
    ExecutionLookupRequest, ExecutionLookupResponse, MemoryStore, QueryInsightsSummary,
    RecordStore,
};
pub use sources::{
    analyze_sources, categorize_source_type, priority_score, DomainBenchmark, GapSummary,
    SourceAnalysis, SourceCategory, SourceMix,
};
pub use time_series::{build_time_series, TimeSeriesPoint};
pub use visibility::{aggregate_model_visibility, BrandVisibility, PlatformDirectory, PlatformVisibility};
