use std::collections::HashSet;

use indexmap::IndexMap;
use serde::Serialize;

use crate::parse::DecodedRecord;
use crate::stats::{as_f64, pct_of, round1};

/// Priority score above which a gap domain counts as high priority.
pub const HIGH_PRIORITY_THRESHOLD: u32 = 20;

/// How the mentions in one response relate to the business.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Presence {
    Brand,
    Competitor,
    Both,
    Neither,
}

impl Presence {
    fn of(rec: &DecodedRecord<'_>) -> Self {
        match (rec.brand_mentioned(), !rec.competitors_mentioned.is_empty()) {
            (true, true) => Presence::Both,
            (true, false) => Presence::Brand,
            (false, true) => Presence::Competitor,
            (false, false) => Presence::Neither,
        }
    }
}

/// Citation statistics for one domain over the filtered record set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainBenchmark {
    pub domain: String,
    /// Most frequent source-type label cited for this domain.
    pub source_type: Option<String>,
    pub total_citations: u32,
    pub responses_with_source: u32,
    pub unique_prompts: u32,
    pub avg_citations_per_prompt: f64,
    pub usage_pct: f64,
    pub competitor_only_appearances: u32,
    pub gap_citations: u32,
    pub gap_unique_prompts: u32,
    pub gap_usage_pct: f64,
    pub brand_present_appearances: u32,
    pub competitor_present_appearances: u32,
    pub both_present_appearances: u32,
    pub neither_present_appearances: u32,
    pub your_brand_present: bool,
    pub competitor_present: bool,
    pub white_space: bool,
    pub content_gap_opportunity: bool,
    pub is_gap_opportunity: bool,
    pub priority_score: u32,
}

impl DomainBenchmark {
    /// Responses citing this domain that mentioned the business.
    #[must_use]
    pub fn your_appearances(&self) -> u32 {
        self.brand_present_appearances + self.both_present_appearances
    }

    /// Responses citing this domain that mentioned a competitor.
    #[must_use]
    pub fn competitor_appearances(&self) -> u32 {
        self.competitor_present_appearances + self.both_present_appearances
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GapSummary {
    pub domains_with_your_brand: usize,
    pub domains_with_competitors: usize,
    pub domains_with_both: usize,
    pub white_space_domains: usize,
    pub high_priority_gaps: usize,
}

impl GapSummary {
    #[must_use]
    pub fn from_domains(domains: &[DomainBenchmark]) -> Self {
        let mut summary = Self::default();
        for d in domains {
            if d.your_brand_present {
                summary.domains_with_your_brand += 1;
            }
            if d.competitor_present {
                summary.domains_with_competitors += 1;
            }
            if d.your_brand_present && d.competitor_present {
                summary.domains_with_both += 1;
            }
            if d.white_space {
                summary.white_space_domains += 1;
            }
            if d.content_gap_opportunity && d.priority_score > HIGH_PRIORITY_THRESHOLD {
                summary.high_priority_gaps += 1;
            }
        }
        summary
    }
}

/// Rank a domain by how often competitors are cited on it without the
/// business: `round(usage*2 + competitor*3 + both - brand*2)`, floored at 0.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn priority_score(
    usage_pct: f64,
    competitor_present: u32,
    both_present: u32,
    brand_present: u32,
) -> u32 {
    let raw = usage_pct * 2.0 + f64::from(competitor_present) * 3.0 + f64::from(both_present)
        - f64::from(brand_present) * 2.0;
    if !raw.is_finite() {
        return 0;
    }
    raw.round().max(0.0) as u32
}

#[derive(Debug, Default)]
struct DomainTally {
    source_types: IndexMap<String, u32>,
    total_citations: u32,
    responses_with_source: u32,
    unique_prompts: HashSet<i64>,
    competitor_only_appearances: u32,
    gap_citations: u32,
    gap_unique_prompts: HashSet<i64>,
    brand_present: u32,
    competitor_present: u32,
    both_present: u32,
    neither_present: u32,
}

impl DomainTally {
    fn dominant_source_type(&self) -> Option<String> {
        let mut best: Option<(&String, u32)> = None;
        for (label, count) in &self.source_types {
            if best.map_or(true, |(_, top)| *count > top) {
                best = Some((label, *count));
            }
        }
        best.map(|(label, _)| label.clone())
    }

    fn finish(self, domain: String, total_responses: usize, gap_responses: usize) -> DomainBenchmark {
        let usage_pct = pct_of(self.responses_with_source as usize, total_responses);
        let avg_citations_per_prompt = if self.unique_prompts.is_empty() {
            0.0
        } else {
            round1(f64::from(self.total_citations) / as_f64(self.unique_prompts.len()))
        };
        let your_brand_present = self.brand_present + self.both_present > 0;
        let competitor_present = self.competitor_present + self.both_present > 0;
        let content_gap_opportunity = competitor_present && !your_brand_present;

        DomainBenchmark {
            source_type: self.dominant_source_type(),
            domain,
            total_citations: self.total_citations,
            responses_with_source: self.responses_with_source,
            unique_prompts: count_u32(self.unique_prompts.len()),
            avg_citations_per_prompt,
            usage_pct,
            competitor_only_appearances: self.competitor_only_appearances,
            gap_citations: self.gap_citations,
            gap_unique_prompts: count_u32(self.gap_unique_prompts.len()),
            gap_usage_pct: pct_of(self.competitor_only_appearances as usize, gap_responses),
            brand_present_appearances: self.brand_present,
            competitor_present_appearances: self.competitor_present,
            both_present_appearances: self.both_present,
            neither_present_appearances: self.neither_present,
            your_brand_present,
            competitor_present,
            white_space: !your_brand_present && !competitor_present && self.responses_with_source > 0,
            content_gap_opportunity,
            is_gap_opportunity: content_gap_opportunity,
            priority_score: priority_score(
                usage_pct,
                self.competitor_present,
                self.both_present,
                self.brand_present,
            ),
        }
    }
}

fn count_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// Per-domain statistics plus the denominators they were computed against.
#[derive(Debug, Clone, Default)]
pub(crate) struct DomainStats {
    pub(crate) domains: Vec<DomainBenchmark>,
    pub(crate) total_responses: usize,
    pub(crate) total_content_gap_responses: usize,
}

/// Accumulate every cited domain. Domains come back in first-seen order.
pub(crate) fn benchmark_domains(records: &[DecodedRecord<'_>]) -> DomainStats {
    let total_responses = records.len();
    let total_content_gap_responses = records.iter().filter(|r| r.is_content_gap()).count();

    let mut tallies: IndexMap<String, DomainTally> = IndexMap::new();
    for rec in records.iter().filter(|r| !r.sources.is_empty()) {
        let presence = Presence::of(rec);
        let content_gap = rec.is_content_gap();
        let prompt_id = rec.record.prompt_id;
        let mut seen: HashSet<&str> = HashSet::new();

        for source in &rec.sources {
            let tally = tallies.entry(source.domain.clone()).or_default();
            tally.total_citations += 1;
            let label = source.source_type.trim();
            if !label.is_empty() {
                *tally.source_types.entry(label.to_string()).or_default() += 1;
            }
            if content_gap {
                tally.gap_citations += 1;
            }

            if !seen.insert(source.domain.as_str()) {
                continue;
            }
            tally.responses_with_source += 1;
            tally.unique_prompts.insert(prompt_id);
            match presence {
                Presence::Brand => tally.brand_present += 1,
                Presence::Competitor => tally.competitor_present += 1,
                Presence::Both => tally.both_present += 1,
                Presence::Neither => tally.neither_present += 1,
            }
            if content_gap {
                tally.competitor_only_appearances += 1;
                tally.gap_unique_prompts.insert(prompt_id);
            }
        }
    }

    let domains = tallies
        .into_iter()
        .map(|(domain, tally)| tally.finish(domain, total_responses, total_content_gap_responses))
        .collect();

    DomainStats {
        domains,
        total_responses,
        total_content_gap_responses,
    }
}
