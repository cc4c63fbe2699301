//! Series alignment.
//!
//! `join` lays any number of frames side by side on the union of their
//! dates. It is a positional merge only: values are never combined, each
//! input column survives as its own column. Summation is a separate step
//! (`Frame::row_sum`) done by the caller on the aligned result.

use chrono::NaiveDate;
use std::collections::BTreeSet;
use tracing::debug;

use crate::domain::series::{Column, Frame};

/// Outer-join `others` onto `base`, forward-fill every column, then trim
/// all-missing rows at both ends.
///
/// A column whose name is already taken is renamed with the suffix `_{i}`,
/// `i` being the position of its frame in `others`.
pub fn join(base: Frame, others: &[Frame]) -> Frame {
    let index: Vec<NaiveDate> = base
        .index()
        .iter()
        .chain(others.iter().flat_map(|f| f.index().iter()))
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut columns: Vec<Column> = Vec::new();
    let mut names: Vec<String> = Vec::new();

    let sources = std::iter::once((None, &base))
        .chain(others.iter().enumerate().map(|(i, f)| (Some(i), f)));
    for (position, frame) in sources {
        let rows: Vec<usize> = frame
            .index()
            .iter()
            .filter_map(|d| index.binary_search(d).ok())
            .collect();

        for col in frame.columns() {
            let mut values = vec![None; index.len()];
            for (&row, v) in rows.iter().zip(&col.values) {
                values[row] = *v;
            }
            let name = match position {
                Some(i) => unique_name(&col.name, i, &names),
                None => col.name.clone(),
            };
            names.push(name.clone());
            columns.push(Column::new(name, values));
        }
    }

    let mut joined = Frame::from_parts(index, columns);
    joined.forward_fill();
    let trimmed = joined.trim();
    debug!(
        inputs = others.len(),
        columns = trimmed.width(),
        rows = trimmed.len(),
        "aligned frames"
    );
    trimmed
}

fn unique_name(name: &str, position: usize, taken: &[String]) -> String {
    if !taken.iter().any(|t| t == name) {
        return name.to_string();
    }
    let mut candidate = format!("{name}_{position}");
    let mut n = 1;
    while taken.iter().any(|t| *t == candidate) {
        candidate = format!("{name}_{position}_{n}");
        n += 1;
    }
    candidate
}
