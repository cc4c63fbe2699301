//! Positions: one asset, one notional, one date range.
//!
//! Construction is eager. Once `Position::lump_sum` or
//! `Recurrence::build` returns, the raw series has been fetched and every
//! view computed; a changed parameter means building a new position.

use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;
use tracing::info;

use crate::domain::date_axis::{self, Frequency};
use crate::domain::error::AccrueError;
use crate::domain::recurrence::Recurrence;
use crate::domain::result_set::ResultSet;
use crate::domain::sources::{ReferenceRateReturns, TickerReturns};
use crate::ports::data_port::{PricePort, RatePort};
use crate::ports::return_source::ReturnSeriesSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PositionKind {
    Ticker,
    ReferenceRate,
}

impl fmt::Display for PositionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionKind::Ticker => f.write_str("ticker"),
            PositionKind::ReferenceRate => f.write_str("reference_rate"),
        }
    }
}

impl FromStr for PositionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ticker" => Ok(PositionKind::Ticker),
            "reference_rate" | "rate" => Ok(PositionKind::ReferenceRate),
            other => Err(other.to_string()),
        }
    }
}

/// Immutable construction input for one position.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionSpec {
    pub name: String,
    pub kind: PositionKind,
    pub identifier: String,
    pub value: f64,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub frequency: Option<Frequency>,
    /// Share of the reference rate earned, in percent.
    pub percentage: f64,
    pub withholding: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub identifier: String,
    pub value: f64,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Contribution frequency of a recurring position.
    pub frequency: Option<Frequency>,
    /// Number of contributions folded into `result`; 1 for a lump sum.
    pub tranches: usize,
    pub result: ResultSet,
    /// Presence mask of `result`.
    pub default: ResultSet,
}

pub(crate) fn check_value(identifier: &str, value: f64) -> Result<(), AccrueError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(AccrueError::InvalidValue {
            identifier: identifier.to_string(),
            value,
        });
    }
    Ok(())
}

impl Position {
    /// A single investment of `value` at `start`.
    pub fn lump_sum(
        source: &dyn ReturnSeriesSource,
        identifier: &str,
        value: f64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Self, AccrueError> {
        date_axis::check_range(start, end)?;
        check_value(identifier, value)?;

        let raw = source.generate_raw(identifier, start, end)?;
        let result = ResultSet::compute(raw, value);
        let default = result.presence(value);

        Ok(Self {
            identifier: identifier.to_string(),
            value,
            start,
            end,
            frequency: None,
            tranches: 1,
            result,
            default,
        })
    }

    pub fn is_recurring(&self) -> bool {
        self.frequency.is_some()
    }

    /// Last compounded capital value, if any.
    pub fn final_value(&self) -> Option<f64> {
        self.result
            .cumulative_capital
            .columns()
            .first()
            .and_then(|c| c.values.iter().rev().find_map(|v| *v))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.frequency {
            Some(freq) => write!(
                f,
                "recurring {} {:.2} {} from {} to {} ({} tranches)",
                self.identifier, self.value, freq, self.start, self.end, self.tranches
            ),
            None => write!(
                f,
                "{} {:.2} from {} to {}",
                self.identifier, self.value, self.start, self.end
            ),
        }
    }
}

/// Fetch and build the position described by `spec`.
pub fn build_position(
    spec: &PositionSpec,
    prices: &dyn PricePort,
    rates: &dyn RatePort,
) -> Result<Position, AccrueError> {
    let ticker;
    let reference;
    let source: &dyn ReturnSeriesSource = match spec.kind {
        PositionKind::Ticker => {
            ticker = TickerReturns::new(prices);
            &ticker
        }
        PositionKind::ReferenceRate => {
            reference = ReferenceRateReturns::new(rates)
                .with_percentage(spec.percentage)
                .with_withholding(spec.withholding);
            &reference
        }
    };

    let position = match spec.frequency {
        Some(freq) => Recurrence::new(freq).build(
            source,
            &spec.identifier,
            spec.value,
            spec.start,
            spec.end,
        )?,
        None => Position::lump_sum(source, &spec.identifier, spec.value, spec.start, spec.end)?,
    };

    info!(name = %spec.name, kind = %spec.kind, "built position: {position}");
    Ok(position)
}
