//! Report output port trait.

use std::fs;
use std::path::Path;

use crate::domain::error::AccrueError;
use crate::domain::portfolio::{Portfolio, PortfolioTotals, PortfolioView};
use crate::domain::result_set::ResultSet;

/// Port for rendering trajectory reports.
pub trait ReportPort {
    fn render(
        &self,
        set: &ResultSet,
        totals: Option<&PortfolioTotals>,
    ) -> Result<String, AccrueError>;

    /// Default implementation: the selected view, with totals for the
    /// compounded view only.
    fn render_portfolio(
        &self,
        portfolio: &Portfolio,
        view: PortfolioView,
    ) -> Result<String, AccrueError> {
        match view {
            PortfolioView::Result => {
                let totals = portfolio.totals();
                self.render(&portfolio.result, Some(&totals))
            }
            PortfolioView::Default => self.render(&portfolio.default, None),
        }
    }

    fn write_portfolio(
        &self,
        portfolio: &Portfolio,
        view: PortfolioView,
        output_path: &str,
    ) -> Result<(), AccrueError> {
        let rendered = self.render_portfolio(portfolio, view)?;
        let path = Path::new(output_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, rendered)?;
        Ok(())
    }
}
