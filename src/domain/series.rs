//! Date-indexed numeric frames.
//!
//! A `Frame` is an increasing date index shared by any number of named
//! columns. Absent observations are `None` and flow through every
//! arithmetic helper untouched; they are never coerced to zero except by
//! [`Frame::row_sum`], whose contract is that missing entries do not
//! participate.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::error::AccrueError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    index: Vec<NaiveDate>,
    columns: Vec<Column>,
}

/// One named column keyed by date; the shape every source produces.
pub type RateSeries = Frame;

impl Frame {
    pub fn from_index(index: Vec<NaiveDate>) -> Self {
        Self {
            index,
            columns: Vec::new(),
        }
    }

    /// Columns must already match the index length.
    pub(crate) fn from_parts(index: Vec<NaiveDate>, columns: Vec<Column>) -> Self {
        debug_assert!(columns.iter().all(|c| c.values.len() == index.len()));
        Self { index, columns }
    }

    /// Build a single-column frame from `(date, value)` observations.
    ///
    /// Input is sorted by date; a repeated date is an error.
    pub fn series(
        name: impl Into<String>,
        mut points: Vec<(NaiveDate, f64)>,
    ) -> Result<Self, AccrueError> {
        let name = name.into();
        points.sort_by_key(|(d, _)| *d);
        if let Some(w) = points.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(AccrueError::InvalidSeries {
                name,
                reason: format!("duplicate date {}", w[0].0),
            });
        }
        let (index, values): (Vec<_>, Vec<_>) =
            points.into_iter().map(|(d, v)| (d, Some(v))).unzip();
        Ok(Self {
            index,
            columns: vec![Column::new(name, values)],
        })
    }

    pub fn index(&self) -> &[NaiveDate] {
        &self.index
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn row_of(&self, date: NaiveDate) -> Option<usize> {
        self.index.binary_search(&date).ok()
    }

    pub fn value(&self, column: &str, date: NaiveDate) -> Option<f64> {
        let row = self.row_of(date)?;
        self.column(column)?.values[row]
    }

    pub fn push_column(&mut self, column: Column) -> Result<(), AccrueError> {
        if column.values.len() != self.index.len() {
            return Err(AccrueError::InvalidSeries {
                name: column.name,
                reason: format!(
                    "column has {} values for an index of {}",
                    column.values.len(),
                    self.index.len()
                ),
            });
        }
        self.columns.push(column);
        Ok(())
    }

    pub fn drop_column(&mut self, name: &str) -> Option<Column> {
        let pos = self.columns.iter().position(|c| c.name == name)?;
        Some(self.columns.remove(pos))
    }

    /// Rows with dates inside `[from, to]`.
    pub fn slice(&self, from: NaiveDate, to: NaiveDate) -> Frame {
        let lo = self.index.partition_point(|d| *d < from);
        let hi = self.index.partition_point(|d| *d <= to).max(lo);
        Frame {
            index: self.index[lo..hi].to_vec(),
            columns: self
                .columns
                .iter()
                .map(|c| Column::new(c.name.clone(), c.values[lo..hi].to_vec()))
                .collect(),
        }
    }

    /// Apply `f` to every defined value.
    pub fn map_values(&self, f: impl Fn(f64) -> f64) -> Frame {
        Frame {
            index: self.index.clone(),
            columns: self
                .columns
                .iter()
                .map(|c| Column::new(c.name.clone(), c.values.iter().map(|v| v.map(&f)).collect()))
                .collect(),
        }
    }

    /// Running product per column. Missing entries stay missing and do not
    /// reset the product.
    pub fn cumprod(&self) -> Frame {
        Frame {
            index: self.index.clone(),
            columns: self
                .columns
                .iter()
                .map(|c| {
                    let mut acc = 1.0;
                    let values = c
                        .values
                        .iter()
                        .map(|v| {
                            v.map(|x| {
                                acc *= x;
                                acc
                            })
                        })
                        .collect();
                    Column::new(c.name.clone(), values)
                })
                .collect(),
        }
    }

    /// Replace each missing value with the last defined value above it.
    pub fn forward_fill(&mut self) {
        for col in &mut self.columns {
            let mut last = None;
            for v in &mut col.values {
                match v {
                    Some(x) => last = Some(*x),
                    None => *v = last,
                }
            }
        }
    }

    pub fn row_has_value(&self, row: usize) -> bool {
        self.columns.iter().any(|c| c.values[row].is_some())
    }

    pub fn first_valid_index(&self) -> Option<NaiveDate> {
        (0..self.len())
            .find(|&r| self.row_has_value(r))
            .map(|r| self.index[r])
    }

    pub fn last_valid_index(&self) -> Option<NaiveDate> {
        (0..self.len())
            .rev()
            .find(|&r| self.row_has_value(r))
            .map(|r| self.index[r])
    }

    /// Drop all-missing rows at both ends. Interior rows are kept.
    ///
    /// A frame without any defined value keeps its shape.
    pub fn trim(self) -> Frame {
        match (self.first_valid_index(), self.last_valid_index()) {
            (Some(first), Some(last)) => self.slice(first, last),
            _ => self,
        }
    }

    /// Sum of the defined entries of each row into a single column.
    pub fn row_sum(&self, name: impl Into<String>) -> Frame {
        let values = (0..self.len())
            .map(|r| {
                Some(
                    self.columns
                        .iter()
                        .filter_map(|c| c.values[r])
                        .sum::<f64>(),
                )
            })
            .collect();
        Frame {
            index: self.index.clone(),
            columns: vec![Column::new(name, values)],
        }
    }

    /// Defined `(date, value)` pairs of one column, in date order.
    pub fn points(&self, column: &str) -> Vec<(NaiveDate, f64)> {
        self.column(column)
            .map(|c| {
                self.index
                    .iter()
                    .zip(&c.values)
                    .filter_map(|(d, v)| v.map(|x| (*d, x)))
                    .collect()
            })
            .unwrap_or_default()
    }
}
