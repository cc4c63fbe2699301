//! The four parallel views of a trajectory and the arithmetic between them.
//!
//! - `raw`: period multiplier (`1 + pct_change`)
//! - `cumulative`: running product of `raw`
//! - `capital`: the notional wherever `raw` is defined
//! - `cumulative_capital`: `cumulative * value`

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

use crate::domain::aligner;
use crate::domain::series::Frame;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Raw,
    Cumulative,
    Capital,
    CumulativeCapital,
}

impl Field {
    pub const ALL: [Field; 4] = [
        Field::Raw,
        Field::Cumulative,
        Field::Capital,
        Field::CumulativeCapital,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Field::Raw => "raw",
            Field::Cumulative => "cumulative",
            Field::Capital => "capital",
            Field::CumulativeCapital => "cumulative_capital",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultSet {
    pub raw: Frame,
    pub cumulative: Frame,
    pub capital: Frame,
    pub cumulative_capital: Frame,
}

impl ResultSet {
    /// Compound `raw` per column and scale it to `value`.
    pub fn compute(raw: Frame, value: f64) -> Self {
        let cumulative = raw.cumprod();
        let capital = raw.map_values(|_| value);
        let cumulative_capital = cumulative.map_values(|x| x * value);
        Self {
            raw,
            cumulative,
            capital,
            cumulative_capital,
        }
    }

    /// Presence mask of `self`: every defined entry becomes `1`, or `value`
    /// for the capital views.
    pub fn presence(&self, value: f64) -> Self {
        Self {
            raw: self.raw.map_values(|_| 1.0),
            cumulative: self.cumulative.map_values(|_| 1.0),
            capital: self.raw.map_values(|_| value),
            cumulative_capital: self.cumulative.map_values(|_| value),
        }
    }

    pub fn field(&self, field: Field) -> &Frame {
        match field {
            Field::Raw => &self.raw,
            Field::Cumulative => &self.cumulative,
            Field::Capital => &self.capital,
            Field::CumulativeCapital => &self.cumulative_capital,
        }
    }

    fn from_fields(mut build: impl FnMut(Field) -> Frame) -> Self {
        Self {
            raw: build(Field::Raw),
            cumulative: build(Field::Cumulative),
            capital: build(Field::Capital),
            cumulative_capital: build(Field::CumulativeCapital),
        }
    }

    /// Collapse every view to one column named `name` by summing the
    /// defined entries of each row.
    pub fn fold(&self, name: &str) -> Self {
        Self::from_fields(|f| self.field(f).row_sum(name))
    }

    /// Align each view of `members` onto `base` independently.
    pub fn join(base: &Frame, members: &[&ResultSet]) -> Self {
        Self::from_fields(|f| {
            let frames: Vec<Frame> = members.iter().map(|m| m.field(f).clone()).collect();
            aligner::join(base.clone(), &frames)
        })
    }

    /// Rows of every view inside `[from, to]`.
    pub fn slice(&self, from: NaiveDate, to: NaiveDate) -> Self {
        Self::from_fields(|f| self.field(f).slice(from, to))
    }

    pub fn export(&self) -> ResultSetExport {
        ResultSetExport {
            raw: export_frame(&self.raw),
            cumulative: export_frame(&self.cumulative),
            capital: export_frame(&self.capital),
            cumulative_capital: export_frame(&self.cumulative_capital),
        }
    }
}

/// Defined points of every column of `frame`, one entry per column.
pub fn export_frame(frame: &Frame) -> Vec<SeriesExport> {
    frame
        .columns()
        .iter()
        .map(|c| SeriesExport {
            name: c.name.clone(),
            points: frame
                .points(&c.name)
                .into_iter()
                .map(|(date, value)| Point { date, value })
                .collect(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesExport {
    pub name: String,
    pub points: Vec<Point>,
}

/// Serialisable `(date, value)` lists for each view, in date order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSetExport {
    pub raw: Vec<SeriesExport>,
    pub cumulative: Vec<SeriesExport>,
    pub capital: Vec<SeriesExport>,
    pub cumulative_capital: Vec<SeriesExport>,
}
