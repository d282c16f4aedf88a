//! Daily visibility series for the business and a handful of competitors.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;

use crate::parse::DecodedRecord;
use crate::stats::{round_pct, MeanTable, RunningMean};

/// Competitor series emitted per day, besides the business.
pub const MAX_COMPETITOR_SERIES: usize = 4;

/// One day of the series: `{"date": "2025-01-02", "values": {"Acme": 40, ...}}`.
///
/// Brand names stay under `values` so no brand can collide with `date`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeriesPoint {
    pub date: NaiveDate,
    pub values: IndexMap<String, u32>,
}

#[derive(Default)]
struct DayTally<'a> {
    business: RunningMean,
    competitors: MeanTable<&'a str>,
}

/// Bucket records by calendar day and average visibility per brand.
///
/// The business value comes first; competitors follow in the order they were
/// first accumulated that day (not ranked), at most
/// [`MAX_COMPETITOR_SERIES`] of them. Days are emitted in ascending order.
#[must_use]
pub fn build_time_series(records: &[DecodedRecord<'_>], business: &str) -> Vec<TimeSeriesPoint> {
    let mut days: BTreeMap<NaiveDate, DayTally<'_>> = BTreeMap::new();

    for rec in records {
        let day = days.entry(rec.record.bucket_date()).or_default();
        day.business.push_opt(rec.business_visibility());
        for (name, fraction) in &rec.competitor_visibilities {
            day.competitors.push(name.as_str(), *fraction);
        }
    }

    days.into_iter()
        .map(|(date, tally)| {
            let mut values = IndexMap::with_capacity(1 + MAX_COMPETITOR_SERIES);
            values.insert(business.to_string(), round_pct(tally.business.mean()));
            for (name, mean) in tally.competitors.iter().take(MAX_COMPETITOR_SERIES) {
                values
                    .entry((*name).to_string())
                    .or_insert_with(|| round_pct(mean.mean()));
            }
            TimeSeriesPoint { date, values }
        })
        .collect()
}
