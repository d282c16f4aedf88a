//! End-to-end benchmark over a small export with legacy and malformed rows.

use std::path::Path;

use aivis_analytics::{
    run_benchmark, AnalysisContext, BenchmarkRequest, BenchmarkResponse, DateWindow, MemoryStore,
    Outcome, PositionStatus, SourceCategory,
};
use aivis_core::{load_tracking, ExecutionRecord, TrackingConfig};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;

fn tracking() -> TrackingConfig {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/tracking.example.yaml");
    load_tracking(&path).expect("example tracking file should load")
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 31, 20, 0, 0).unwrap()
}

fn export() -> Vec<ExecutionRecord> {
    serde_json::from_value(json!([
        {
            "id": 1, "promptId": 100, "platformId": 1,
            "completedAt": "2025-03-10T09:00:00Z",
            "businessVisibility": 0.8,
            "competitorVisibilities": { "Globex Corp": 0.1 },
            "brandMentionCount": 1,
            "competitorsMentioned": ["Globex Corp"],
            "sources": [
                { "domain": "g2.com", "url": "https://www.g2.com/compare/acme-vs-globex", "type": "UGC" }
            ],
            "promptText": "best crm for small teams"
        },
        {
            "id": 2, "promptId": 100, "platformId": 2,
            "completedAt": "2025-03-10T09:05:00Z",
            "businessVisibility": 0.6,
            "competitorVisibilities": "{\"Initech\": 0.2}",
            "brandMentionCount": 1,
            "competitorsMentioned": "[\"Initech Inc\"]",
            "sources": [
                { "domain": "acme.com", "url": "https://acme.com/pricing", "type": "You" }
            ]
        },
        {
            "id": 3, "promptId": 200, "platformId": 1,
            "completedAt": "2025-03-11T09:00:00Z",
            "businessVisibility": 0.0,
            "competitorVisibilities": { "Globex": 0.7, "Umbrella": 0.3 },
            "brandMentionCount": 0,
            "competitorsMentioned": ["Globex", "Umbrella"],
            "sources": [
                { "domain": "techradar.com", "url": "https://techradar.com/best-crm-software", "type": "Editorial" },
                { "domain": "g2.com", "url": "https://g2.com/categories/crm", "type": "UGC" }
            ],
            "promptText": "crm with the best email integration"
        },
        {
            "id": 4, "promptId": 300, "platformId": 3,
            "completedAt": "2025-03-12T09:00:00Z",
            "competitorVisibilities": "{broken",
            "brandMentionCount": 0,
            "competitorsMentioned": 42,
            "sources": "nope"
        },
        {
            "id": 5, "promptId": 200, "platformId": 1,
            "completedAt": "2025-02-01T09:00:00Z",
            "businessVisibility": 1.0,
            "competitorVisibilities": { "Globex": 0.0 }
        }
    ]))
    .expect("export should deserialize")
}

fn benchmark() -> BenchmarkResponse {
    let tracking = tracking();
    let ctx = AnalysisContext::from_tracking(&tracking, 30);
    let store = MemoryStore::with_records(ctx.business.id, export());
    let request = BenchmarkRequest {
        business_id: ctx.business.id,
        window: DateWindow::LastDays(30),
        platform_id: None,
    };
    run_benchmark(&store, &ctx, &tracking, &request, now()).expect("benchmark should succeed")
}

#[test]
fn filters_to_window() {
    let response = benchmark();
    assert_eq!(response.total_executions, 4);
    assert_eq!(response.business.name, "Acme CRM");
}

#[test]
fn model_visibility_per_platform() {
    let response = benchmark();
    let names: Vec<&str> = response.model_visibility.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["ChatGPT", "Gemini", "Perplexity"]);

    let chatgpt = &response.model_visibility["ChatGPT"];
    assert_eq!(chatgpt.business_visibility_pct, 40);
    assert_eq!(chatgpt.execution_count, 2);
    let top: Vec<(&str, u32)> = chatgpt
        .top_competitor_visibility_pcts
        .iter()
        .map(|b| (b.name.as_str(), b.visibility))
        .collect();
    assert_eq!(top, vec![("Globex", 40), ("Umbrella", 30)]);

    assert_eq!(response.model_visibility["Perplexity"].business_visibility_pct, 60);
    assert_eq!(response.model_visibility["Gemini"].business_visibility_pct, 0);
}

#[test]
fn positioning_table() {
    let response = benchmark();
    let rows: Vec<(&str, u32, PositionStatus)> = response
        .competitive_positioning
        .iter()
        .map(|e| (e.name.as_str(), e.visibility, e.status))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("Acme CRM", 47, PositionStatus::Competitive),
            ("Globex", 40, PositionStatus::Competitive),
            ("Umbrella", 30, PositionStatus::Competitive),
            ("Initech", 20, PositionStatus::Weak),
        ]
    );
}

#[test]
fn query_outcomes() {
    let response = benchmark();
    let insights = &response.query_insights;
    assert_eq!(insights.outcome_counts.win, 1);
    assert_eq!(insights.outcome_counts.loss, 2);
    assert_eq!(insights.outcome_counts.total(), 3);

    assert_eq!(insights.strongest.len(), 1);
    assert_eq!(insights.strongest[0].prompt_id, 100);
    assert_eq!(insights.strongest[0].outcome, Outcome::Win);
    assert_eq!(insights.strongest[0].gap, 50);
    assert_eq!(insights.strongest[0].top_competitor.as_deref(), Some("Initech"));

    let weakest: Vec<(i64, i32)> = insights.weakest.iter().map(|i| (i.prompt_id, i.gap)).collect();
    assert_eq!(weakest, vec![(200, -70), (300, 0)]);

    let opportunities: Vec<i64> = insights.opportunities.iter().map(|i| i.prompt_id).collect();
    assert_eq!(opportunities, vec![200]);

    let heads: Vec<(&str, u32, u32)> = response
        .head_to_head
        .iter()
        .map(|h| (h.competitor.as_str(), h.total, h.win_rate))
        .collect();
    assert_eq!(heads, vec![("Globex", 2, 50), ("Initech", 1, 100), ("Umbrella", 1, 0)]);

    let co: Vec<(&str, u32)> = response
        .co_occurrence
        .iter()
        .map(|c| (c.competitor.as_str(), c.co_occurrence_rate))
        .collect();
    assert_eq!(co, vec![("Globex", 100), ("Initech", 100)]);
}

#[test]
fn source_benchmark_and_gaps() {
    let response = benchmark();
    let domains: Vec<(&str, u32, u32)> = response
        .source_benchmark
        .iter()
        .map(|d| (d.domain.as_str(), d.total_citations, d.priority_score))
        .collect();
    assert_eq!(
        domains,
        vec![("g2.com", 2, 104), ("acme.com", 1, 51), ("techradar.com", 1, 53)]
    );

    let gaps: Vec<&str> = response
        .source_gap_opportunities
        .iter()
        .map(|d| d.domain.as_str())
        .collect();
    assert_eq!(gaps, vec!["techradar.com"]);
    assert_eq!(response.source_gap_opportunities[0].gap_usage_pct, 100.0);
    assert!(response.sources_where_you_lead.is_empty());

    assert_eq!(response.gap_summary.domains_with_your_brand, 2);
    assert_eq!(response.gap_summary.domains_with_competitors, 3);
    assert_eq!(response.gap_summary.domains_with_both, 2);
    assert_eq!(response.gap_summary.high_priority_gaps, 1);

    let globex = response
        .source_mix_by_brand
        .iter()
        .find(|m| m.brand == "Globex")
        .expect("tracked competitor has a mix");
    assert_eq!(globex.total_citations, 3);
    assert_eq!(globex.breakdown[&SourceCategory::Ugc], 66.7);
    assert_eq!(globex.breakdown[&SourceCategory::Editorial], 33.3);
}

#[test]
fn time_series_by_day() {
    let response = benchmark();
    let days: Vec<String> = response
        .time_series_data
        .iter()
        .map(|p| p.date.to_string())
        .collect();
    assert_eq!(days, vec!["2025-03-10", "2025-03-11", "2025-03-12"]);
    assert_eq!(response.time_series_data[0].values["Acme CRM"], 70);
    assert_eq!(response.time_series_data[0].values["Initech"], 20);
    assert_eq!(response.time_series_data[1].values["Globex"], 70);
    assert_eq!(response.time_series_data[2].values.len(), 1);
}

#[test]
fn scorecard_summary() {
    let card = benchmark().scorecard;
    assert_eq!(card.your_visibility, 47);
    assert_eq!(card.avg_competitor_visibility, 30.0);
    assert_eq!(card.visibility_gap, 17.0);
    assert_eq!(card.your_rank, 1);
    assert_eq!(card.total_brands, 4);
    assert_eq!(card.prompts_where_you_appear, 1);
    assert_eq!(card.total_prompts, 3);
    assert_eq!(card.prompt_coverage_pct, 33.3);
    assert_eq!(card.sources_with_your_presence, 2);
    assert_eq!(card.sources_with_competitor_only, 1);
    let top: Vec<&str> = card.top_sources_used.iter().map(|s| s.domain.as_str()).collect();
    assert_eq!(top, vec!["g2.com", "acme.com", "techradar.com"]);
    assert_eq!(card.head_to_head_win_rate, 50.0);
}

#[test]
fn response_serializes_with_dashboard_keys() {
    let value = serde_json::to_value(benchmark()).expect("response serializes");
    for key in [
        "modelVisibility",
        "competitivePositioning",
        "timeSeriesData",
        "queryInsights",
        "headToHead",
        "coOccurrence",
        "sourceBenchmark",
        "sourceGapOpportunities",
        "sourcesWhereYouLead",
        "sourceMixByBrand",
        "scorecard",
    ] {
        assert!(value.get(key).is_some(), "missing {key}");
    }
    assert_eq!(value["competitivePositioning"][0]["status"], json!("competitive"));
    assert_eq!(value["timeSeriesData"][0]["date"], json!("2025-03-10"));
}
