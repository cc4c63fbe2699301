//! Market data ports.

use crate::domain::error::AccrueError;
use crate::domain::quote::{PricePoint, RatePoint};
use chrono::NaiveDate;

pub trait PricePort {
    /// Closing prices of `ticker` inside `[start, end]`. An unknown ticker
    /// or empty range yields an empty vector.
    fn fetch_closes(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PricePoint>, AccrueError>;

    /// Most recent close. Fails with `NoData` when the ticker has none.
    fn last_price(&self, ticker: &str) -> Result<PricePoint, AccrueError>;
}

pub trait RatePort {
    /// Published observations of `series` inside `[start, end]`.
    fn fetch_rates(
        &self,
        series: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RatePoint>, AccrueError>;
}
