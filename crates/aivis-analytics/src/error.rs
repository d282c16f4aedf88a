use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised at the request boundary of the engine.
///
/// The analytic components themselves never fail; malformed record fields
/// fall back to defaults. Only request validation and the record store can
/// produce these.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("record store error: {0}")]
    Store(String),

    #[error("invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("invalid window: {0}")]
    InvalidWindow(String),

    #[error("business {0} is not tracked by this context")]
    BusinessNotFound(i64),
}
