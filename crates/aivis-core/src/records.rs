use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One AI-platform response to one tracked prompt, as produced upstream.
///
/// The three structured fields (`competitor_visibilities`,
/// `competitors_mentioned`, `sources`) are kept encoded: historical rows
/// store them as JSON text, newer rows as JSON values, and some rows hold
/// garbage. Decoding happens at the point of use through the analytics
/// crate's tolerant parser.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRecord {
    pub id: i64,
    pub prompt_id: i64,
    pub platform_id: i64,
    pub completed_at: DateTime<Utc>,
    /// Calendar day the run was scheduled for. Preferred over `completed_at`
    /// when bucketing by day.
    #[serde(default)]
    pub refresh_date: Option<NaiveDate>,
    /// Fraction in `[0, 1]`. `None` means "not evaluated", which is not zero.
    #[serde(default)]
    pub business_visibility: Option<f64>,
    /// Encoded map of competitor display name to visibility fraction.
    #[serde(default)]
    pub competitor_visibilities: Option<Value>,
    #[serde(default)]
    pub brand_mention_count: Option<i64>,
    /// Encoded list of competitor names mentioned in the response.
    #[serde(default)]
    pub competitors_mentioned: Option<Value>,
    /// Encoded list of [`SourceCitation`]s.
    #[serde(default)]
    pub sources: Option<Value>,
    #[serde(default)]
    pub prompt_text: Option<String>,
}

impl ExecutionRecord {
    /// Day this record belongs to: the refresh date when present, otherwise
    /// the UTC date of completion.
    #[must_use]
    pub fn bucket_date(&self) -> NaiveDate {
        self.refresh_date
            .unwrap_or_else(|| self.completed_at.date_naive())
    }

    /// Returns `true` if the response mentioned the business at least once.
    #[must_use]
    pub fn brand_mentioned(&self) -> bool {
        self.brand_mention_count.is_some_and(|n| n > 0)
    }
}

/// A page cited by a model response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceCitation {
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub url: String,
    /// Free-text label such as `"Editorial"`, `"UGC"` or `"You"`.
    #[serde(rename = "type", default)]
    pub source_type: String,
    /// Precomputed page-type label, if the upstream engine classified it.
    #[serde(default)]
    pub page_type: Option<String>,
    #[serde(default)]
    pub citations: Option<u32>,
    #[serde(default)]
    pub associated_brands: Option<Vec<String>>,
}

impl SourceCitation {
    /// Number of citations this entry stands for; upstream omits the count
    /// when it is one.
    #[must_use]
    pub fn citation_weight(&self) -> u32 {
        self.citations.unwrap_or(1)
    }
}
