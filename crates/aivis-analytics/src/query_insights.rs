//! Per-prompt win/loss classification, head-to-head records and
//! co-occurrence between the business and each competitor.
//!
//! All visibility values here are fractions of one. The tie band is applied
//! in the same unit everywhere, including the head-to-head tallies.

use indexmap::IndexMap;
use serde::Serialize;

use crate::parse::DecodedRecord;
use crate::stats::{group_by_key, round_pct, signed_pct, top_k_by, MeanTable, RunningMean};

/// Half-width of the tie band, in fraction units (5 percentage points).
pub const TIE_BAND: f64 = 0.05;

/// Entries kept in each of `strongest`, `weakest` and `opportunities`.
pub const MAX_HIGHLIGHTS: usize = 5;

pub const MAX_HEAD_TO_HEAD: usize = 10;

pub const MAX_CO_OCCURRENCE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Loss,
    Tie,
    /// The business appeared and no competitor did.
    Solo,
}

/// Compare the business against one competitor using the tie band.
#[must_use]
pub fn compare_visibility(business: f64, competitor: f64) -> Outcome {
    if business > competitor + TIE_BAND {
        Outcome::Win
    } else if business < competitor - TIE_BAND {
        Outcome::Loss
    } else {
        Outcome::Tie
    }
}

/// Classify a prompt given the business mean and the strongest competitor's
/// mean (`None` when no competitor was observed).
#[must_use]
pub fn classify_outcome(business: f64, top_competitor: Option<f64>) -> Outcome {
    match top_competitor {
        Some(competitor) if competitor > 0.0 => compare_visibility(business, competitor),
        _ if business > 0.0 => Outcome::Solo,
        _ => Outcome::Loss,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryInsight {
    pub prompt_id: i64,
    pub prompt_text: Option<String>,
    pub execution_count: usize,
    pub business_visibility: u32,
    pub top_competitor: Option<String>,
    pub top_competitor_visibility: u32,
    /// Rounded business percentage minus rounded top-competitor percentage.
    pub gap: i32,
    pub outcome: Outcome,
    #[serde(skip)]
    pub business_mean: f64,
    #[serde(skip)]
    pub top_competitor_mean: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeCounts {
    pub win: usize,
    pub loss: usize,
    pub tie: usize,
    pub solo: usize,
}

impl OutcomeCounts {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Win => self.win += 1,
            Outcome::Loss => self.loss += 1,
            Outcome::Tie => self.tie += 1,
            Outcome::Solo => self.solo += 1,
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.win + self.loss + self.tie + self.solo
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadToHeadRecord {
    pub competitor: String,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub total: u32,
    /// Whole percentage of comparisons the business won.
    pub win_rate: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoOccurrence {
    pub competitor: String,
    pub co_appearances: u32,
    /// Whole percentage of business-visible prompts where this competitor
    /// was also visible.
    pub co_occurrence_rate: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryAnalysis {
    pub insights: Vec<QueryInsight>,
    pub outcome_counts: OutcomeCounts,
    pub strongest: Vec<QueryInsight>,
    pub weakest: Vec<QueryInsight>,
    pub opportunities: Vec<QueryInsight>,
    pub head_to_head: Vec<HeadToHeadRecord>,
    pub co_occurrence: Vec<CoOccurrence>,
    pub total_prompts: usize,
    pub prompts_where_business_appears: usize,
}

#[derive(Debug, Default)]
struct HeadToHeadTally {
    wins: u32,
    losses: u32,
    ties: u32,
}

impl HeadToHeadTally {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Loss => self.losses += 1,
            Outcome::Tie | Outcome::Solo => self.ties += 1,
        }
    }

    fn total(&self) -> u32 {
        self.wins + self.losses + self.ties
    }
}

/// Pool records per prompt and derive outcomes, head-to-head records and
/// co-occurrence statistics.
#[must_use]
pub fn analyze_queries(records: &[DecodedRecord<'_>]) -> QueryAnalysis {
    let groups = group_by_key(records.iter(), |r| r.record.prompt_id);

    let mut insights = Vec::with_capacity(groups.len());
    let mut outcome_counts = OutcomeCounts::default();
    let mut head_to_head: IndexMap<String, HeadToHeadTally> = IndexMap::new();
    let mut co_occurrence: IndexMap<String, u32> = IndexMap::new();
    let mut prompts_where_business_appears = 0usize;

    for (prompt_id, group) in &groups {
        let mut business = RunningMean::default();
        let mut competitors: MeanTable<&str> = MeanTable::new();
        let mut prompt_text: Option<&str> = None;

        for rec in group {
            business.push_opt(rec.business_visibility());
            for (name, fraction) in &rec.competitor_visibilities {
                competitors.push(name.as_str(), *fraction);
            }
            if prompt_text.is_none() {
                prompt_text = rec
                    .record
                    .prompt_text
                    .as_deref()
                    .filter(|t| !t.trim().is_empty());
            }
        }

        let business_mean = business.mean();
        if business_mean > 0.0 {
            prompts_where_business_appears += 1;
        }

        // Strict comparison keeps the first-seen competitor on ties.
        let mut top: Option<(&str, f64)> = None;
        for (name, mean) in competitors.iter() {
            let mean = mean.mean();
            if top.map_or(true, |(_, best)| mean > best) {
                top = Some((name, mean));
            }
        }

        for (name, mean) in competitors.iter() {
            let competitor_mean = mean.mean();
            head_to_head
                .entry((*name).to_string())
                .or_default()
                .record(compare_visibility(business_mean, competitor_mean));
            if business_mean > 0.0 && competitor_mean > 0.0 {
                *co_occurrence.entry((*name).to_string()).or_default() += 1;
            }
        }

        let top_competitor_mean = top.map_or(0.0, |(_, mean)| mean);
        let outcome = classify_outcome(business_mean, top.map(|(_, mean)| mean));
        outcome_counts.record(outcome);

        insights.push(QueryInsight {
            prompt_id: *prompt_id,
            prompt_text: prompt_text.map(ToString::to_string),
            execution_count: group.len(),
            business_visibility: round_pct(business_mean),
            top_competitor: top.map(|(name, _)| name.to_string()),
            top_competitor_visibility: round_pct(top_competitor_mean),
            gap: signed_pct(business_mean) - signed_pct(top_competitor_mean),
            outcome,
            business_mean,
            top_competitor_mean,
        });
    }

    let strongest = top_k_by(
        insights
            .iter()
            .filter(|i| matches!(i.outcome, Outcome::Win | Outcome::Solo))
            .cloned()
            .collect(),
        MAX_HIGHLIGHTS,
        |i| f64::from(i.gap),
    );
    let weakest = top_k_by(
        insights
            .iter()
            .filter(|i| i.outcome == Outcome::Loss)
            .cloned()
            .collect(),
        MAX_HIGHLIGHTS,
        |i| -f64::from(i.gap),
    );
    let opportunities = top_k_by(
        insights
            .iter()
            .filter(|i| i.business_mean <= 0.0 && i.top_competitor_mean > 0.0)
            .cloned()
            .collect(),
        MAX_HIGHLIGHTS,
        |i| i.top_competitor_mean,
    );

    let head_to_head = build_head_to_head(head_to_head);
    let co_occurrence = build_co_occurrence(co_occurrence, prompts_where_business_appears);

    tracing::debug!(
        prompts = groups.len(),
        wins = outcome_counts.win,
        losses = outcome_counts.loss,
        ties = outcome_counts.tie,
        solo = outcome_counts.solo,
        "classified query outcomes"
    );

    QueryAnalysis {
        total_prompts: groups.len(),
        insights,
        outcome_counts,
        strongest,
        weakest,
        opportunities,
        head_to_head,
        co_occurrence,
        prompts_where_business_appears,
    }
}

fn build_head_to_head(tallies: IndexMap<String, HeadToHeadTally>) -> Vec<HeadToHeadRecord> {
    let records = tallies
        .into_iter()
        .map(|(competitor, tally)| {
            let total = tally.total();
            let win_rate = if total == 0 {
                0
            } else {
                round_pct(f64::from(tally.wins) / f64::from(total))
            };
            HeadToHeadRecord {
                competitor,
                wins: tally.wins,
                losses: tally.losses,
                ties: tally.ties,
                total,
                win_rate,
            }
        })
        .collect();
    top_k_by(records, MAX_HEAD_TO_HEAD, |r| f64::from(r.total))
}

fn build_co_occurrence(counts: IndexMap<String, u32>, business_prompts: usize) -> Vec<CoOccurrence> {
    let entries = counts
        .into_iter()
        .map(|(competitor, co_appearances)| {
            let co_occurrence_rate = if business_prompts == 0 {
                0
            } else {
                round_pct(f64::from(co_appearances) / crate::stats::as_f64(business_prompts))
            };
            CoOccurrence {
                competitor,
                co_appearances,
                co_occurrence_rate,
            }
        })
        .collect();
    top_k_by(entries, MAX_CO_OCCURRENCE, |c| f64::from(c.co_appearances))
}

#[cfg(test)]
#[path = "query_insights_test.rs"]
mod tests;
