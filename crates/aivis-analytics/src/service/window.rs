use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;

/// Inclusive range of calendar days (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// # Errors
    ///
    /// Returns [`AnalyticsError::InvalidDateRange`] when `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, AnalyticsError> {
        if start > end {
            return Err(AnalyticsError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }
}

/// How a request selects its days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DateWindow {
    /// The last `n` days, today included.
    LastDays(u32),
    Between { start: NaiveDate, end: NaiveDate },
}

impl DateWindow {
    /// Window for optional explicit bounds; a missing bound falls back to
    /// the `default_days` look-back ending today.
    ///
    /// # Errors
    ///
    /// Propagates [`DateWindow::resolve`] failures for the fallback window.
    pub fn from_bounds(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        default_days: u32,
        now: DateTime<Utc>,
    ) -> Result<Self, AnalyticsError> {
        match (start, end) {
            (Some(start), Some(end)) => Ok(Self::Between { start, end }),
            (None, None) => Ok(Self::LastDays(default_days)),
            (start, end) => {
                let fallback = Self::LastDays(default_days).resolve(now)?;
                Ok(Self::Between {
                    start: start.unwrap_or(fallback.start),
                    end: end.unwrap_or(fallback.end),
                })
            }
        }
    }

    /// Resolve against `now` into concrete days.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::InvalidWindow`] for a zero-day window and
    /// [`AnalyticsError::InvalidDateRange`] for reversed bounds.
    pub fn resolve(&self, now: DateTime<Utc>) -> Result<DateRange, AnalyticsError> {
        match *self {
            DateWindow::LastDays(0) => Err(AnalyticsError::InvalidWindow(
                "look-back window must be at least one day".to_string(),
            )),
            DateWindow::LastDays(days) => {
                let end = now.date_naive();
                let start = end
                    .checked_sub_days(Days::new(u64::from(days - 1)))
                    .ok_or_else(|| {
                        AnalyticsError::InvalidWindow(format!("{days} days reaches before the calendar start"))
                    })?;
                DateRange::new(start, end)
            }
            DateWindow::Between { start, end } => DateRange::new(start, end),
        }
    }
}
