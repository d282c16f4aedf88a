use std::collections::HashMap;

use aivis_core::ExecutionRecord;

use super::window::DateRange;
use crate::error::AnalyticsError;

/// Source of execution records for one business.
///
/// Implementations filter by day (see [`ExecutionRecord::bucket_date`]) and,
/// when `platform_ids` is given, by platform. Records are returned in the
/// order the store holds them.
pub trait RecordStore {
    /// # Errors
    ///
    /// Returns [`AnalyticsError::Store`] when the backing store fails.
    fn fetch(
        &self,
        business_id: i64,
        range: &DateRange,
        platform_ids: Option<&[i64]>,
    ) -> Result<Vec<ExecutionRecord>, AnalyticsError>;
}

/// In-memory [`RecordStore`], keyed by business id.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    by_business: HashMap<i64, Vec<ExecutionRecord>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding `records` for a single business.
    #[must_use]
    pub fn with_records(business_id: i64, records: Vec<ExecutionRecord>) -> Self {
        let mut store = Self::new();
        store.insert(business_id, records);
        store
    }

    pub fn insert(&mut self, business_id: i64, records: impl IntoIterator<Item = ExecutionRecord>) {
        self.by_business
            .entry(business_id)
            .or_default()
            .extend(records);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_business.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RecordStore for MemoryStore {
    fn fetch(
        &self,
        business_id: i64,
        range: &DateRange,
        platform_ids: Option<&[i64]>,
    ) -> Result<Vec<ExecutionRecord>, AnalyticsError> {
        let Some(records) = self.by_business.get(&business_id) else {
            return Ok(Vec::new());
        };

        Ok(records
            .iter()
            .filter(|r| range.contains(r.bucket_date()))
            .filter(|r| platform_ids.map_or(true, |ids| ids.contains(&r.platform_id)))
            .cloned()
            .collect())
    }
}
