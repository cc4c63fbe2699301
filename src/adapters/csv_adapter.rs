//! CSV file data adapter.
//!
//! One file per identifier under `base_path`, named `<identifier>.csv`,
//! with a header row. Price files carry a `close` column, rate files a
//! `value` column (percent per period); the date column is `date`. When a
//! header is absent the first two columns are taken as date and value.

use crate::domain::error::AccrueError;
use crate::domain::quote::{PricePoint, RatePoint, normalize_date};
use crate::ports::data_port::{PricePort, RatePort};
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, identifier: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", identifier))
    }

    /// All `(date, value)` rows of an identifier's file, sorted by date.
    /// A missing file has no rows.
    fn read_rows(
        &self,
        identifier: &str,
        value_column: &str,
    ) -> Result<Vec<(NaiveDate, f64)>, AccrueError> {
        let path = self.csv_path(identifier);
        if !path.exists() {
            debug!(path = %path.display(), "no data file");
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path).map_err(|e| AccrueError::DataSource {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| AccrueError::DataSource {
                reason: format!("CSV header error in {}: {}", path.display(), e),
            })?
            .clone();
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let date_idx = find("date").unwrap_or(0);
        let value_idx = find(value_column).unwrap_or(1);

        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| AccrueError::DataSource {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(date_idx).ok_or_else(|| AccrueError::DataSource {
                reason: "missing date column".into(),
            })?;
            let date = normalize_date(date_str).ok_or_else(|| AccrueError::DataSource {
                reason: format!("invalid date {:?} in {}", date_str, path.display()),
            })?;

            let raw = record.get(value_idx).ok_or_else(|| AccrueError::DataSource {
                reason: format!("missing {} column", value_column),
            })?;
            let value: f64 = raw.trim().parse().map_err(|e| AccrueError::DataSource {
                reason: format!("invalid {} value {:?}: {}", value_column, raw, e),
            })?;

            rows.push((date, value));
        }

        rows.sort_by_key(|(d, _)| *d);
        debug!(identifier, rows = rows.len(), "read data file");
        Ok(rows)
    }

    fn in_range(
        rows: Vec<(NaiveDate, f64)>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> impl Iterator<Item = (NaiveDate, f64)> {
        rows.into_iter()
            .filter(move |(d, _)| *d >= start && *d <= end)
    }
}

impl PricePort for CsvAdapter {
    fn fetch_closes(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PricePoint>, AccrueError> {
        let rows = self.read_rows(ticker, "close")?;
        Ok(Self::in_range(rows, start, end)
            .map(|(date, close)| PricePoint { date, close })
            .collect())
    }

    fn last_price(&self, ticker: &str) -> Result<PricePoint, AccrueError> {
        self.read_rows(ticker, "close")?
            .pop()
            .map(|(date, close)| PricePoint { date, close })
            .ok_or_else(|| AccrueError::NoData {
                identifier: ticker.to_string(),
                range: None,
            })
    }
}

impl RatePort for CsvAdapter {
    fn fetch_rates(
        &self,
        series: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RatePoint>, AccrueError> {
        let rows = self.read_rows(series, "value")?;
        Ok(Self::in_range(rows, start, end)
            .map(|(date, rate)| RatePoint { date, rate })
            .collect())
    }
}
