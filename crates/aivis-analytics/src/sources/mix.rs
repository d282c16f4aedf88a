use std::fmt;

use aivis_core::Competitor;
use indexmap::IndexMap;
use serde::Serialize;

use crate::parse::DecodedRecord;
use crate::stats::pct_of;

/// Fixed buckets for free-text source-type labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceCategory {
    Editorial,
    Ugc,
    Corporate,
    Competitor,
    Reference,
    You,
    Other,
}

impl SourceCategory {
    /// Match order for [`categorize_source_type`].
    pub const ALL: [SourceCategory; 7] = [
        SourceCategory::Editorial,
        SourceCategory::Ugc,
        SourceCategory::Corporate,
        SourceCategory::Competitor,
        SourceCategory::Reference,
        SourceCategory::You,
        SourceCategory::Other,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SourceCategory::Editorial => "editorial",
            SourceCategory::Ugc => "ugc",
            SourceCategory::Corporate => "corporate",
            SourceCategory::Competitor => "competitor",
            SourceCategory::Reference => "reference",
            SourceCategory::You => "you",
            SourceCategory::Other => "other",
        }
    }
}

impl fmt::Display for SourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bucket a source-type label by case-insensitive substring, first match
/// in [`SourceCategory::ALL`] order wins.
#[must_use]
pub fn categorize_source_type(label: &str) -> SourceCategory {
    let lower = label.to_lowercase();
    SourceCategory::ALL
        .into_iter()
        .take_while(|c| *c != SourceCategory::Other)
        .find(|c| lower.contains(c.as_str()))
        .unwrap_or(SourceCategory::Other)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMix {
    pub brand: String,
    pub is_business: bool,
    pub total_citations: usize,
    /// Share of citations per category, one decimal. Every category is present.
    pub breakdown: IndexMap<SourceCategory, f64>,
}

/// Source-type mix for the business and each tracked competitor over the
/// citations in responses that mentioned that brand.
pub(crate) fn source_mix_by_brand(
    records: &[DecodedRecord<'_>],
    business: &str,
    competitors: &[Competitor],
) -> Vec<SourceMix> {
    let mut mixes = Vec::with_capacity(1 + competitors.len());
    mixes.push(mix_for(business, true, records.iter().filter(|r| r.brand_mentioned())));
    for competitor in competitors {
        let name = competitor.name.as_str();
        mixes.push(mix_for(
            name,
            false,
            records.iter().filter(|r| r.mentions_competitor(name)),
        ));
    }
    mixes
}

fn mix_for<'r, 'a: 'r>(
    brand: &str,
    is_business: bool,
    records: impl Iterator<Item = &'r DecodedRecord<'a>>,
) -> SourceMix {
    let mut counts: IndexMap<SourceCategory, usize> =
        SourceCategory::ALL.into_iter().map(|c| (c, 0)).collect();
    let mut total = 0usize;
    for rec in records {
        for source in &rec.sources {
            *counts
                .entry(categorize_source_type(&source.source_type))
                .or_default() += 1;
            total += 1;
        }
    }

    SourceMix {
        brand: brand.to_string(),
        is_business,
        total_citations: total,
        breakdown: counts
            .into_iter()
            .map(|(category, n)| (category, pct_of(n, total)))
            .collect(),
    }
}
