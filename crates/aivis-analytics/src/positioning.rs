//! League table of every brand seen in the window.

use aivis_core::Competitor;
use indexmap::IndexMap;
use serde::Serialize;

use crate::parse::DecodedRecord;
use crate::stats::{round_pct, top_k_by, RunningMean};

/// Rows kept in the positioning table.
pub const MAX_POSITIONING_ENTRIES: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionStatus {
    Invisible,
    Weak,
    Competitive,
    Dominate,
}

impl PositionStatus {
    /// Band a whole-percentage visibility: `0`, `(0, 25]`, `(25, 50]`, `> 50`.
    #[must_use]
    pub fn from_visibility(visibility: u32) -> Self {
        match visibility {
            0 => PositionStatus::Invisible,
            1..=25 => PositionStatus::Weak,
            26..=50 => PositionStatus::Competitive,
            _ => PositionStatus::Dominate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositioningEntry {
    pub name: String,
    pub visibility: u32,
    pub mentions: u32,
    pub observations: u32,
    pub status: PositionStatus,
    pub is_business: bool,
}

#[derive(Debug, Default)]
struct BrandTally {
    visibility: RunningMean,
    mentions: u32,
    is_business: bool,
}

/// Rank the business, its tracked competitors and any other brand observed in
/// the records by mean visibility.
///
/// Tracked competitors only seed the table order; a name that appears in the
/// data but not in `competitors` is still ranked. Brands never observed are
/// dropped. Ties keep seed order (business, tracked competitors, then
/// first-seen unknown brands).
#[must_use]
pub fn rank_competitive_positioning(
    records: &[DecodedRecord<'_>],
    business: &str,
    competitors: &[Competitor],
) -> Vec<PositioningEntry> {
    let mut tallies: IndexMap<String, BrandTally> = IndexMap::new();
    tallies.insert(
        business.to_string(),
        BrandTally {
            is_business: true,
            ..BrandTally::default()
        },
    );
    for competitor in competitors {
        tallies.entry(competitor.name.clone()).or_default();
    }

    for rec in records {
        if let Some(tally) = tallies.get_mut(business) {
            tally.visibility.push_opt(rec.business_visibility());
            if rec.brand_mentioned() {
                tally.mentions += 1;
            }
        }

        for (name, fraction) in &rec.competitor_visibilities {
            let tally = tallies.entry(name.clone()).or_default();
            tally.visibility.push(*fraction);
            if *fraction > 0.0 {
                tally.mentions += 1;
            }
        }
    }

    let entries: Vec<PositioningEntry> = tallies
        .into_iter()
        .filter(|(_, tally)| !tally.visibility.is_empty())
        .map(|(name, tally)| {
            let visibility = round_pct(tally.visibility.mean());
            PositioningEntry {
                name,
                visibility,
                mentions: tally.mentions,
                observations: tally.visibility.count(),
                status: PositionStatus::from_visibility(visibility),
                is_business: tally.is_business,
            }
        })
        .collect();

    top_k_by(entries, MAX_POSITIONING_ENTRIES, |e| f64::from(e.visibility))
}
