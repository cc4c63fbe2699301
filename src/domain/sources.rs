//! Return series sources built on the market data ports.
//!
//! Both variants answer the same question, "what multiplier did one unit
//! of capital earn on each day", from different raw inputs: closing
//! prices for tickers, published percentage rates for a reference rate.

use chrono::{Days, NaiveDate};
use tracing::{debug, warn};

use crate::domain::date_axis::check_range;
use crate::domain::error::AccrueError;
use crate::domain::quote::daily_closes;
use crate::domain::series::{Frame, RateSeries};
use crate::ports::data_port::{PricePort, RatePort};
use crate::ports::return_source::ReturnSeriesSource;

/// Withholding tiers on accumulated gain by days held.
pub fn withholding_rate(days: i64) -> f64 {
    match days {
        ..=180 => 0.225,
        181..=360 => 0.20,
        361..=720 => 0.175,
        _ => 0.15,
    }
}

/// Multipliers from consecutive closes of a ticker.
///
/// The first close is the entry and carries multiplier `1.0`.
pub struct TickerReturns<'a> {
    prices: &'a dyn PricePort,
}

impl<'a> TickerReturns<'a> {
    pub fn new(prices: &'a dyn PricePort) -> Self {
        Self { prices }
    }
}

impl ReturnSeriesSource for TickerReturns<'_> {
    fn generate_raw(
        &self,
        identifier: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RateSeries, AccrueError> {
        check_range(start, end)?;
        let closes = daily_closes(self.prices.fetch_closes(identifier, start, end)?);
        if closes.is_empty() {
            return Err(AccrueError::no_data(identifier, start, end));
        }
        if let Some(bad) = closes.iter().find(|p| !(p.close.is_finite() && p.close > 0.0)) {
            return Err(AccrueError::InvalidSeries {
                name: identifier.to_string(),
                reason: format!("non-positive close {} on {}", bad.close, bad.date),
            });
        }

        let mut points = Vec::with_capacity(closes.len());
        points.push((closes[0].date, 1.0));
        points.extend(closes.windows(2).map(|w| (w[1].date, w[1].close / w[0].close)));

        debug!(identifier, observations = points.len(), "ticker multipliers");
        Frame::series(identifier, points)
    }
}

/// Multipliers from a published percentage rate.
///
/// `percentage` is the share of the reference rate earned (103 for an
/// instrument paying 103% of it). With `withholding`, each date's
/// compounded gain is reduced by the tier for the days held since `start`
/// and the result is re-expressed as period multipliers, so compounding
/// the series yields the net trajectory. Dates after the last publication
/// up to `end` repeat the last level (multiplier `1.0`).
pub struct ReferenceRateReturns<'a> {
    rates: &'a dyn RatePort,
    percentage: f64,
    withholding: bool,
}

impl<'a> ReferenceRateReturns<'a> {
    pub fn new(rates: &'a dyn RatePort) -> Self {
        Self {
            rates,
            percentage: 100.0,
            withholding: false,
        }
    }

    pub fn with_percentage(mut self, percentage: f64) -> Self {
        self.percentage = percentage;
        self
    }

    pub fn with_withholding(mut self, withholding: bool) -> Self {
        self.withholding = withholding;
        self
    }
}

impl ReturnSeriesSource for ReferenceRateReturns<'_> {
    fn generate_raw(
        &self,
        identifier: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RateSeries, AccrueError> {
        check_range(start, end)?;
        let mut published = self.rates.fetch_rates(identifier, start, end)?;
        published.sort_by_key(|p| p.date);
        if published.is_empty() {
            return Err(AccrueError::no_data(identifier, start, end));
        }

        let share = self.percentage / 100.0;
        let mut gross = 1.0;
        let mut previous_net = 1.0;
        let mut points = Vec::with_capacity(published.len());

        for p in &published {
            gross *= 1.0 + p.rate / 100.0 * share;
            let net = if self.withholding {
                let days = (p.date - start).num_days();
                1.0 + (gross - 1.0) * (1.0 - withholding_rate(days))
            } else {
                gross
            };
            points.push((p.date, net / previous_net));
            previous_net = net;
        }

        if let Some(last) = published.last().map(|p| p.date) {
            let filled = last
                .checked_add_days(Days::new(1))
                .into_iter()
                .flat_map(|d| d.iter_days())
                .take_while(|d| *d <= end)
                .map(|d| (d, 1.0));
            let before = points.len();
            points.extend(filled);
            if points.len() > before {
                warn!(
                    identifier,
                    %last,
                    filled = points.len() - before,
                    "reference rate not published through end, holding last level"
                );
            }
        }

        Frame::series(identifier, points)
    }
}
