//! Periodic contributions.
//!
//! A recurring position is N independent lump sums, one per contribution
//! date, each compounding only from its own entry. The source generates
//! one tranche per contribution, the tranches are aligned side by side,
//! compounded column by column, and only then summed. Returns are not
//! additive, so nothing is summed before compounding.

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::domain::aligner;
use crate::domain::date_axis::{self, Frequency};
use crate::domain::error::AccrueError;
use crate::domain::position::{Position, check_value};
use crate::domain::result_set::ResultSet;
use crate::domain::series::Frame;
use crate::ports::return_source::ReturnSeriesSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recurrence {
    pub frequency: Frequency,
}

impl Recurrence {
    pub fn new(frequency: Frequency) -> Self {
        Self { frequency }
    }

    pub fn contribution_dates(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<NaiveDate>, AccrueError> {
        date_axis::generate(start, end, self.frequency)
    }

    /// One column per contribution date, aligned on the dates of `raw`.
    ///
    /// `raw` is the base series over `[start, end]` and serves as the
    /// tranche of a contribution made on `start`. Every later tranche is
    /// generated by `source` over `[contribution, end]`, so it follows the
    /// source's own entry rule and, for a taxed rate, its own withholding
    /// clock. A contribution falling on a date without an observation
    /// enters at the next one. Contributions after the last observation
    /// have nothing to hold and are dropped.
    pub fn setup(
        &self,
        source: &dyn ReturnSeriesSource,
        identifier: &str,
        raw: &Frame,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Frame, AccrueError> {
        let dates = self.contribution_dates(start, end)?;

        let mut tranches = Vec::with_capacity(dates.len());
        for date in dates {
            let tranche = if date == start {
                raw.clone()
            } else {
                match source.generate_raw(identifier, date, end) {
                    Ok(tranche) => tranche,
                    Err(e) if e.is_no_data() => Frame::default(),
                    Err(e) => return Err(e),
                }
            };
            if tranche.is_empty() {
                warn!(%date, "contribution after last observation, skipping tranche");
                continue;
            }
            tranches.push(tranche);
        }

        let mut base = raw.clone();
        base.drop_column(identifier);
        let joined = aligner::join(base, &tranches);
        debug!(
            frequency = %self.frequency,
            tranches = joined.width(),
            "decomposed contributions"
        );
        Ok(joined)
    }

    /// Build a recurring position of `value` per contribution.
    pub fn build(
        &self,
        source: &dyn ReturnSeriesSource,
        identifier: &str,
        value: f64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Position, AccrueError> {
        date_axis::check_range(start, end)?;
        check_value(identifier, value)?;

        let raw = source.generate_raw(identifier, start, end)?;
        let tranches = self.setup(source, identifier, &raw, start, end)?;
        let tranche_count = tranches.width();

        let result = ResultSet::compute(tranches, value);
        let default = result.presence(value);

        Ok(Position {
            identifier: identifier.to_string(),
            value,
            start,
            end,
            frequency: Some(self.frequency),
            tranches: tranche_count,
            result: result.fold(identifier),
            default: default.fold(identifier),
        })
    }
}
