//! Markdown rendering of analytics responses.

use aivis_analytics::{
    classify_url, BenchmarkResponse, DomainBenchmark, DomainDetailResponse,
    ExecutionLookupResponse, Outcome, PositionStatus, QueryInsight, SourceTarget,
};
use chrono::Utc;

fn outcome_label(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Win => "win",
        Outcome::Loss => "loss",
        Outcome::Tie => "tie",
        Outcome::Solo => "solo",
    }
}

fn status_label(status: PositionStatus) -> &'static str {
    match status {
        PositionStatus::Invisible => "invisible",
        PositionStatus::Weak => "weak",
        PositionStatus::Competitive => "competitive",
        PositionStatus::Dominate => "dominate",
    }
}

/// Collapse whitespace and cap long prompt text for table cells.
fn cell(text: Option<&str>, max_chars: usize) -> String {
    let Some(text) = text else {
        return "-".to_string();
    };
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let flat = flat.replace('|', "/");
    if flat.chars().count() <= max_chars {
        flat
    } else {
        let cut: String = flat.chars().take(max_chars).collect();
        format!("{cut}...")
    }
}

fn print_insight_table(title: &str, insights: &[QueryInsight]) {
    println!("### {title}");
    println!();
    if insights.is_empty() {
        println!("_none_");
        println!();
        return;
    }
    println!("| Prompt | Text | You | Top competitor | Gap | Outcome |");
    println!("|--------|------|-----|----------------|-----|---------|");
    for insight in insights {
        println!(
            "| {} | {} | {}% | {} ({}%) | {:+} | {} |",
            insight.prompt_id,
            cell(insight.prompt_text.as_deref(), 48),
            insight.business_visibility,
            insight.top_competitor.as_deref().unwrap_or("-"),
            insight.top_competitor_visibility,
            insight.gap,
            outcome_label(insight.outcome),
        );
    }
    println!();
}

fn print_domain_table(domains: &[DomainBenchmark]) {
    println!("| Domain | Type | Citations | Usage | Gap usage | You | Competitors | Priority |");
    println!("|--------|------|-----------|-------|-----------|-----|-------------|----------|");
    for d in domains {
        println!(
            "| {} | {} | {} | {:.1}% | {:.1}% | {} | {} | {} |",
            d.domain,
            d.source_type.as_deref().unwrap_or("-"),
            d.total_citations,
            d.usage_pct,
            d.gap_usage_pct,
            d.your_appearances(),
            d.competitor_appearances(),
            d.priority_score,
        );
    }
    println!();
}

pub(crate) fn print_benchmark(response: &BenchmarkResponse) {
    let now = Utc::now().format("%Y-%m-%d %H:%M UTC");
    let card = &response.scorecard;

    println!("# Competitive Visibility Report: {}", response.business.name);
    println!();
    println!("**Generated**: {now}");
    println!(
        "**Window**: {} to {} ({} executions)",
        response.date_range.start, response.date_range.end, response.total_executions
    );
    println!();
    println!("---");
    println!();

    if response.total_executions == 0 {
        println!("no execution records in this window");
        return;
    }

    println!("## Scorecard");
    println!();
    println!("| Metric | Value |");
    println!("|--------|-------|");
    println!("| Your visibility | {}% |", card.your_visibility);
    println!("| Avg competitor visibility | {:.1}% |", card.avg_competitor_visibility);
    println!("| Visibility gap | {:+.1} |", card.visibility_gap);
    println!("| Rank | {} of {} |", card.your_rank, card.total_brands);
    println!(
        "| Prompt coverage | {} of {} ({:.1}%) |",
        card.prompts_where_you_appear, card.total_prompts, card.prompt_coverage_pct
    );
    println!("| Sources citing you | {} |", card.sources_with_your_presence);
    println!("| Competitor-only sources | {} |", card.sources_with_competitor_only);
    println!("| Head-to-head win rate | {:.1}% |", card.head_to_head_win_rate);
    println!();

    println!("## Competitive Positioning");
    println!();
    println!("| Brand | Visibility | Mentions | Status |");
    println!("|-------|------------|----------|--------|");
    for entry in &response.competitive_positioning {
        let name = if entry.is_business {
            format!("**{}**", entry.name)
        } else {
            entry.name.clone()
        };
        println!(
            "| {name} | {}% | {} | {} |",
            entry.visibility,
            entry.mentions,
            status_label(entry.status)
        );
    }
    println!();

    println!("## Visibility by Platform");
    println!();
    println!("| Platform | Executions | You | Top competitors |");
    println!("|----------|------------|-----|-----------------|");
    for (platform, visibility) in &response.model_visibility {
        let top = visibility
            .top_competitor_visibility_pcts
            .iter()
            .map(|b| format!("{} {}%", b.name, b.visibility))
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "| {platform} | {} | {}% | {} |",
            visibility.execution_count,
            visibility.business_visibility_pct,
            if top.is_empty() { "-" } else { top.as_str() }
        );
    }
    println!();

    let counts = &response.query_insights.outcome_counts;
    println!("## Query Outcomes");
    println!();
    println!(
        "{} wins, {} losses, {} ties, {} solo across {} prompts",
        counts.win,
        counts.loss,
        counts.tie,
        counts.solo,
        counts.total()
    );
    println!();
    print_insight_table("Strongest", &response.query_insights.strongest);
    print_insight_table("Weakest", &response.query_insights.weakest);
    print_insight_table("Opportunities", &response.query_insights.opportunities);

    if !response.head_to_head.is_empty() {
        println!("### Head to Head");
        println!();
        println!("| Competitor | W | L | T | Win rate |");
        println!("|------------|---|---|---|----------|");
        for record in &response.head_to_head {
            println!(
                "| {} | {} | {} | {} | {}% |",
                record.competitor, record.wins, record.losses, record.ties, record.win_rate
            );
        }
        println!();
    }

    let gaps = &response.gap_summary;
    println!("## Sources");
    println!();
    println!(
        "{} domains cite you, {} cite competitors, {} cite both; {} high-priority gaps",
        gaps.domains_with_your_brand,
        gaps.domains_with_competitors,
        gaps.domains_with_both,
        gaps.high_priority_gaps
    );
    println!();
    print_domain_table(&response.source_benchmark);

    if !response.source_gap_opportunities.is_empty() {
        println!("### Gap Opportunities");
        println!();
        print_domain_table(&response.source_gap_opportunities);
    }
}

pub(crate) fn print_domain_detail(response: &DomainDetailResponse) {
    let detail = &response.detail;
    println!("# Domain Detail: {}", detail.domain);
    println!();
    println!(
        "**Window**: {} to {}",
        response.date_range.start, response.date_range.end
    );
    println!(
        "**Citations**: {} across {} responses ({} mention your brand)",
        detail.total_citations, detail.responses_with_domain, detail.brand_mentions
    );
    println!();

    if detail.responses_with_domain == 0 {
        println!("no responses cited {}", detail.domain);
        return;
    }

    println!("## URLs");
    println!();
    println!("| URL | Page type | Citations | Responses | Usage |");
    println!("|-----|-----------|-----------|-----------|-------|");
    for url in &detail.urls {
        println!(
            "| {} | {} | {} | {} | {:.1}% |",
            url.url, url.page_type, url.citations, url.responses, url.usage_pct
        );
    }
    println!();

    println!("## Page Types");
    println!();
    for page_type in &detail.page_types {
        println!(
            "- {}: {} ({:.1}%)",
            page_type.page_type, page_type.citations, page_type.pct
        );
    }
    println!();

    println!("## Competitors Mentioned Alongside");
    println!();
    for brand in &detail.competitor_mentions {
        println!("- {}: {}", brand.name, brand.responses);
    }
}

pub(crate) fn print_execution_lookup(target: &SourceTarget, response: &ExecutionLookupResponse) {
    let label = match target {
        SourceTarget::Url(url) => url.as_str(),
        SourceTarget::Domain(domain) => domain.as_str(),
    };

    if response.executions.is_empty() {
        println!(
            "no executions cited {label} between {} and {}",
            response.date_range.start, response.date_range.end
        );
        return;
    }

    println!("# Executions citing {label}");
    println!();
    println!("| Execution | Prompt | Platform | Completed | Brand | Matched URLs |");
    println!("|-----------|--------|----------|-----------|-------|--------------|");
    for m in &response.executions {
        println!(
            "| {} | {} | {} | {} | {} | {} |",
            m.execution_id,
            cell(m.prompt_text.as_deref(), 40),
            m.platform_id,
            m.completed_at.format("%Y-%m-%d %H:%M"),
            if m.brand_mentioned { "yes" } else { "no" },
            m.matched_urls.join(", "),
        );
    }
}

pub(crate) fn print_classifications(urls: &[String]) {
    for url in urls {
        println!("{}\t{url}", classify_url(url));
    }
}
