//! Calendar axis generation.
//!
//! Every alignment starts from a gap-free axis of dates, and recurring
//! contribution dates are enumerated from the same generator.

use chrono::{Datelike, Days, Months, NaiveDate};
use std::fmt;
use std::str::FromStr;

use crate::domain::error::AccrueError;
use crate::domain::series::Frame;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Frequency {
    #[default]
    Daily,
    Weekly,
    /// Same day-of-month as the start, clamped to shorter months.
    Monthly,
    /// Last calendar day of every month inside the range.
    MonthEnd,
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::MonthEnd => "month_end",
        };
        f.write_str(name)
    }
}

impl FromStr for Frequency {
    type Err = AccrueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" | "d" => Ok(Frequency::Daily),
            "weekly" | "w" => Ok(Frequency::Weekly),
            "monthly" | "m" => Ok(Frequency::Monthly),
            "month_end" | "monthend" | "me" => Ok(Frequency::MonthEnd),
            _ => Err(AccrueError::InvalidFrequency {
                value: s.to_string(),
            }),
        }
    }
}

pub fn check_range(start: NaiveDate, end: NaiveDate) -> Result<(), AccrueError> {
    if end < start {
        return Err(AccrueError::InvalidRange { start, end });
    }
    Ok(())
}

/// Every date from `start` to `end` inclusive at `freq`.
pub fn generate(
    start: NaiveDate,
    end: NaiveDate,
    freq: Frequency,
) -> Result<Vec<NaiveDate>, AccrueError> {
    check_range(start, end)?;

    let dates = match freq {
        Frequency::Daily => start.iter_days().take_while(|d| *d <= end).collect(),
        Frequency::Weekly => start.iter_weeks().take_while(|d| *d <= end).collect(),
        Frequency::Monthly => (0u32..)
            .map_while(|n| start.checked_add_months(Months::new(n)))
            .take_while(|d| *d <= end)
            .collect(),
        Frequency::MonthEnd => (0u32..)
            .map_while(|n| month_end(start, n))
            .skip_while(|d| *d < start)
            .take_while(|d| *d <= end)
            .collect(),
    };
    Ok(dates)
}

/// A frame with a daily index over `[start, end]` and no columns.
pub fn blank(start: NaiveDate, end: NaiveDate) -> Result<Frame, AccrueError> {
    Ok(Frame::from_index(generate(start, end, Frequency::Daily)?))
}

fn month_end(anchor: NaiveDate, offset: u32) -> Option<NaiveDate> {
    anchor
        .with_day(1)?
        .checked_add_months(Months::new(offset + 1))?
        .checked_sub_days(Days::new(1))
}
