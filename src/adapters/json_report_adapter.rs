//! JSON report adapter implementing ReportPort.

use serde::Serialize;

use crate::domain::error::AccrueError;
use crate::domain::portfolio::PortfolioTotals;
use crate::domain::result_set::{ResultSet, ResultSetExport, SeriesExport};
use crate::ports::report_port::ReportPort;

#[derive(Serialize)]
struct TrajectoryReport {
    series: ResultSetExport,
    #[serde(skip_serializing_if = "Option::is_none")]
    totals: Option<Vec<SeriesExport>>,
}

/// Pretty-printed JSON document of every view, plus totals for the
/// `result` view.
pub struct JsonReportAdapter;

impl JsonReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for JsonReportAdapter {
    fn render(
        &self,
        set: &ResultSet,
        totals: Option<&PortfolioTotals>,
    ) -> Result<String, AccrueError> {
        let report = TrajectoryReport {
            series: set.export(),
            totals: totals.map(PortfolioTotals::export),
        };
        serde_json::to_string_pretty(&report).map_err(|e| AccrueError::Report {
            reason: e.to_string(),
        })
    }
}
