//! Portfolio aggregation.
//!
//! Member views are aligned onto a wide daily axis, one column per member,
//! each field independently. `totals` then sums the money-denominated
//! columns only; raw and cumulative multipliers are never added together.

use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;
use tracing::info;

use crate::domain::date_axis;
use crate::domain::error::AccrueError;
use crate::domain::position::Position;
use crate::domain::result_set::{ResultSet, SeriesExport, export_frame};
use crate::domain::series::{Column, Frame};

/// Lower bound of the portfolio axis.
pub fn axis_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Which aligned views of a portfolio to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PortfolioView {
    /// Compounded trajectories.
    #[default]
    Result,
    /// Presence masks.
    Default,
}

impl fmt::Display for PortfolioView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortfolioView::Result => f.write_str("result"),
            PortfolioView::Default => f.write_str("default"),
        }
    }
}

impl FromStr for PortfolioView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "result" => Ok(PortfolioView::Result),
            "default" => Ok(PortfolioView::Default),
            other => Err(format!("unknown view: {other} (expected result or default)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    pub positions: Vec<Position>,
    pub as_of: NaiveDate,
    pub result: ResultSet,
    pub default: ResultSet,
}

/// Consolidated single-column series.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioTotals {
    /// Capital contributed and still held.
    pub invested: Frame,
    /// Compounded capital value.
    pub value: Frame,
    /// Number of members (tranches for recurring members) present.
    pub active: Frame,
    /// `value / invested`; missing where nothing is invested.
    pub growth: Frame,
}

impl Portfolio {
    /// Align `positions` on the axis `[1900-01-01, as_of]`.
    pub fn new(positions: Vec<Position>, as_of: NaiveDate) -> Result<Self, AccrueError> {
        if positions.is_empty() {
            return Err(AccrueError::EmptyPortfolio);
        }
        let start = axis_start();
        let blank = date_axis::blank(start, as_of)?;

        let results: Vec<&ResultSet> = positions.iter().map(|p| &p.result).collect();
        let defaults: Vec<&ResultSet> = positions.iter().map(|p| &p.default).collect();
        let result = ResultSet::join(&blank, &results).slice(start, as_of);
        let default = ResultSet::join(&blank, &defaults).slice(start, as_of);

        info!(
            members = positions.len(),
            first = ?result.raw.index().first(),
            last = ?result.raw.index().last(),
            "aligned portfolio"
        );

        Ok(Self {
            positions,
            as_of,
            result,
            default,
        })
    }

    pub fn view(&self, view: PortfolioView) -> &ResultSet {
        match view {
            PortfolioView::Result => &self.result,
            PortfolioView::Default => &self.default,
        }
    }

    pub fn totals(&self) -> PortfolioTotals {
        let invested = self.result.capital.row_sum("invested");
        let value = self.result.cumulative_capital.row_sum("value");
        let active = self.default.raw.row_sum("active");

        let growth_values = invested.columns()[0]
            .values
            .iter()
            .zip(&value.columns()[0].values)
            .map(|(i, v)| match (i, v) {
                (Some(i), Some(v)) if *i != 0.0 => Some(v / i),
                _ => None,
            })
            .collect();
        let growth = Frame::from_parts(
            invested.index().to_vec(),
            vec![Column::new("growth", growth_values)],
        );

        PortfolioTotals {
            invested,
            value,
            active,
            growth,
        }
    }
}

impl PortfolioTotals {
    pub fn frames(&self) -> [&Frame; 4] {
        [&self.invested, &self.value, &self.active, &self.growth]
    }

    pub fn export(&self) -> Vec<SeriesExport> {
        self.frames().into_iter().flat_map(export_frame).collect()
    }
}
