//! Return series port consumed by the position engine.

use crate::domain::error::AccrueError;
use crate::domain::series::RateSeries;
use chrono::NaiveDate;

pub trait ReturnSeriesSource {
    /// A single-column series of period multipliers for `identifier`,
    /// named after it and indexed by calendar day.
    fn generate_raw(
        &self,
        identifier: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RateSeries, AccrueError>;
}
