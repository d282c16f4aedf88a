//! Per-platform visibility of the business and its strongest competitors.

use std::collections::{BTreeMap, HashMap};

use aivis_core::TrackingConfig;
use serde::Serialize;

use crate::parse::DecodedRecord;
use crate::stats::{group_by_key, round_pct, top_k_by, MeanTable, RunningMean};

/// Competitors reported per platform.
pub const TOP_COMPETITORS_PER_PLATFORM: usize = 5;

/// Resolves platform ids to display names.
pub trait PlatformDirectory {
    fn platform_name(&self, platform_id: i64) -> Option<String>;
}

impl PlatformDirectory for TrackingConfig {
    fn platform_name(&self, platform_id: i64) -> Option<String> {
        TrackingConfig::platform_name(self, platform_id).map(ToString::to_string)
    }
}

impl PlatformDirectory for HashMap<i64, String> {
    fn platform_name(&self, platform_id: i64) -> Option<String> {
        self.get(&platform_id).cloned()
    }
}

/// A brand name with a whole-percentage visibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandVisibility {
    pub name: String,
    pub visibility: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformVisibility {
    pub platform_id: i64,
    pub business_visibility_pct: u32,
    pub top_competitor_visibility_pcts: Vec<BrandVisibility>,
    pub execution_count: usize,
}

/// Group records by platform and average visibility within each group.
///
/// Absent business visibility is excluded from the mean; a platform with no
/// evaluated records reports `0`. Keys are platform display names, falling
/// back to `"Platform <id>"` when the directory does not know the id. A
/// name already taken by an earlier platform gets its id appended.
pub fn aggregate_model_visibility<P>(
    records: &[DecodedRecord<'_>],
    platforms: &P,
) -> BTreeMap<String, PlatformVisibility>
where
    P: PlatformDirectory + ?Sized,
{
    let groups = group_by_key(records.iter(), |r| r.record.platform_id);

    let mut by_name = BTreeMap::new();
    for (platform_id, group) in groups {
        let mut business = RunningMean::default();
        let mut competitors: MeanTable<&str> = MeanTable::new();

        for rec in &group {
            business.push_opt(rec.business_visibility());
            for (name, fraction) in &rec.competitor_visibilities {
                competitors.push(name.as_str(), *fraction);
            }
        }

        let ranked: Vec<(&str, f64)> = competitors
            .iter()
            .map(|(name, mean)| (*name, mean.mean()))
            .collect();
        let top_competitor_visibility_pcts = top_k_by(ranked, TOP_COMPETITORS_PER_PLATFORM, |(_, m)| *m)
            .into_iter()
            .map(|(name, mean)| BrandVisibility {
                name: name.to_string(),
                visibility: round_pct(mean),
            })
            .collect();

        let display_name = match platforms.platform_name(platform_id) {
            Some(name) if by_name.contains_key(&name) => format!("{name} ({platform_id})"),
            Some(name) => name,
            None => format!("Platform {platform_id}"),
        };

        by_name.insert(
            display_name,
            PlatformVisibility {
                platform_id,
                business_visibility_pct: round_pct(business.mean()),
                top_competitor_visibility_pcts,
                execution_count: group.len(),
            },
        );
    }

    tracing::debug!(platforms = by_name.len(), "aggregated model visibility");
    by_name
}
