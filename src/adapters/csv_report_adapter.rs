//! Wide CSV report adapter implementing ReportPort.
//!
//! One row per date, one column per member and view, headed
//! `<view>:<member>`. Totals, when given, follow as plain `invested`,
//! `value`, `active` and `growth` columns. Missing entries are empty cells.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::domain::error::AccrueError;
use crate::domain::portfolio::PortfolioTotals;
use crate::domain::result_set::{Field, ResultSet};
use crate::domain::series::Frame;
use crate::ports::report_port::ReportPort;

pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CsvReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

fn report_err(e: impl std::fmt::Display) -> AccrueError {
    AccrueError::Report {
        reason: e.to_string(),
    }
}

impl ReportPort for CsvReportAdapter {
    fn render(
        &self,
        set: &ResultSet,
        totals: Option<&PortfolioTotals>,
    ) -> Result<String, AccrueError> {
        let mut frames: Vec<(Option<Field>, &Frame)> =
            Field::ALL.iter().map(|f| (Some(*f), set.field(*f))).collect();
        if let Some(t) = totals {
            frames.extend(t.frames().into_iter().map(|f| (None, f)));
        }

        let dates: BTreeSet<NaiveDate> = frames
            .iter()
            .flat_map(|(_, f)| f.index().iter().copied())
            .collect();

        let mut header = vec!["date".to_string()];
        for (field, frame) in &frames {
            for name in frame.column_names() {
                header.push(match field {
                    Some(field) => format!("{field}:{name}"),
                    None => name.to_string(),
                });
            }
        }

        let mut wtr = csv::Writer::from_writer(Vec::new());
        wtr.write_record(&header).map_err(report_err)?;
        for date in dates {
            let mut record = vec![date.to_string()];
            for (_, frame) in &frames {
                let row = frame.row_of(date);
                for col in frame.columns() {
                    let cell = row
                        .and_then(|r| col.values[r])
                        .map(|v| v.to_string())
                        .unwrap_or_default();
                    record.push(cell);
                }
            }
            wtr.write_record(&record).map_err(report_err)?;
        }

        let bytes = wtr.into_inner().map_err(report_err)?;
        String::from_utf8(bytes).map_err(report_err)
    }
}
