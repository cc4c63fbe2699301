//! Core domain types and logic.

pub mod aligner;
pub mod config_validation;
pub mod date_axis;
pub mod error;
pub mod portfolio;
pub mod position;
pub mod quote;
pub mod recurrence;
pub mod result_set;
pub mod series;
pub mod sources;
