//! Observations delivered by the data collaborators.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// One closing price of a ticker.
#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// One published reference-rate observation, in percent per period
/// (`0.0519` means 0.0519%).
#[derive(Debug, Clone, PartialEq)]
pub struct RatePoint {
    pub date: NaiveDate,
    pub rate: f64,
}

/// Parse a date or timestamp into a timezone-free calendar day.
///
/// Accepts `YYYY-MM-DD`, `DD/MM/YYYY`, RFC 3339 timestamps (converted to
/// UTC before truncation) and naive `YYYY-MM-DD HH:MM:SS`.
pub fn normalize_date(input: &str) -> Option<NaiveDate> {
    let s = input.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%d/%m/%Y") {
        return Some(d);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.naive_utc().date());
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|ts| ts.date())
}

/// Keep the last close of each calendar day, in date order.
pub fn daily_closes(mut points: Vec<PricePoint>) -> Vec<PricePoint> {
    points.sort_by_key(|p| p.date);
    let mut out: Vec<PricePoint> = Vec::with_capacity(points.len());
    for p in points {
        match out.last_mut() {
            Some(last) if last.date == p.date => *last = p,
            _ => out.push(p),
        }
    }
    out
}
