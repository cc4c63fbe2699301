#![allow(dead_code)]

use accrue::domain::error::AccrueError;
use accrue::domain::quote::{PricePoint, RatePoint};
use accrue::ports::data_port::{PricePort, RatePort};
use chrono::NaiveDate;
use std::cell::RefCell;
use std::collections::HashMap;

pub struct MockPricePort {
    pub data: HashMap<String, Vec<PricePoint>>,
    pub errors: HashMap<String, String>,
    pub calls: RefCell<Vec<String>>,
}

impl MockPricePort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn with_closes(mut self, ticker: &str, closes: Vec<PricePoint>) -> Self {
        self.data.insert(ticker.to_string(), closes);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl PricePort for MockPricePort {
    fn fetch_closes(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PricePoint>, AccrueError> {
        self.calls.borrow_mut().push(ticker.to_string());
        if let Some(reason) = self.errors.get(ticker) {
            return Err(AccrueError::DataSource {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(ticker)
            .map(|points| {
                points
                    .iter()
                    .filter(|p| p.date >= start && p.date <= end)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn last_price(&self, ticker: &str) -> Result<PricePoint, AccrueError> {
        self.data
            .get(ticker)
            .and_then(|points| points.iter().max_by_key(|p| p.date).cloned())
            .ok_or_else(|| AccrueError::NoData {
                identifier: ticker.to_string(),
                range: None,
            })
    }
}

pub struct MockRatePort {
    pub data: HashMap<String, Vec<RatePoint>>,
}

impl MockRatePort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    pub fn with_rates(mut self, series: &str, rates: Vec<RatePoint>) -> Self {
        self.data.insert(series.to_string(), rates);
        self
    }
}

impl RatePort for MockRatePort {
    fn fetch_rates(
        &self,
        series: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RatePoint>, AccrueError> {
        Ok(self
            .data
            .get(series)
            .map(|points| {
                points
                    .iter()
                    .filter(|p| p.date >= start && p.date <= end)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn day(d: u32) -> NaiveDate {
    date(2024, 1, d)
}

pub fn make_close(date_str: &str, close: f64) -> PricePoint {
    PricePoint {
        date: NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap(),
        close,
    }
}

/// Daily closes for days `from..=to` of January 2024 growing by `growth`
/// per day from `first`.
pub fn growing_closes(from: u32, to: u32, first: f64, growth: f64) -> Vec<PricePoint> {
    (from..=to)
        .map(|d| PricePoint {
            date: day(d),
            close: first * growth.powi((d - from) as i32),
        })
        .collect()
}

/// One rate point per consecutive day starting at `start`.
pub fn daily_rates(start: NaiveDate, rates: &[f64]) -> Vec<RatePoint> {
    start
        .iter_days()
        .zip(rates)
        .map(|(date, rate)| RatePoint { date, rate: *rate })
        .collect()
}
