//! Portfolio configuration validation.
//!
//! Every field is checked before anything is fetched. The result is the
//! list of immutable `PositionSpec`s the engine builds from.

use crate::domain::date_axis::{self, Frequency};
use crate::domain::error::AccrueError;
use crate::domain::position::{PositionKind, PositionSpec};
use crate::ports::config_port::ConfigPort;
use chrono::{Local, NaiveDate};
use std::path::PathBuf;

const PORTFOLIO: &str = "portfolio";
const POSITION_PREFIX: &str = "position.";

/// Validated `[portfolio]` section plus its positions, ordered by section
/// name.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioConfig {
    pub data_dir: PathBuf,
    pub as_of: NaiveDate,
    pub positions: Vec<PositionSpec>,
}

/// The `[portfolio] data_dir` entry, as written.
pub fn validate_data_dir(config: &dyn ConfigPort) -> Result<PathBuf, AccrueError> {
    required(config, PORTFOLIO, "data_dir").map(PathBuf::from)
}

/// Check every field of the portfolio and its positions.
///
/// `as_of_override` replaces `[portfolio] as_of` before positions are read,
/// so a defaulted `end` follows it and a position starting after it is an
/// `InvalidRange`.
pub fn validate_portfolio_config(
    config: &dyn ConfigPort,
    as_of_override: Option<NaiveDate>,
) -> Result<PortfolioConfig, AccrueError> {
    let data_dir = validate_data_dir(config)?;

    let as_of = match (as_of_override, config.get_string(PORTFOLIO, "as_of")) {
        (Some(as_of), _) => as_of,
        (None, Some(s)) => parse_date(&s, PORTFOLIO, "as_of")?,
        (None, None) => Local::now().date_naive(),
    };

    let positions = config
        .sections()
        .iter()
        .filter_map(|s| s.strip_prefix(POSITION_PREFIX).map(|name| (s, name)))
        .map(|(section, name)| validate_position(config, section, name, as_of))
        .collect::<Result<Vec<_>, _>>()?;

    if positions.is_empty() {
        return Err(AccrueError::EmptyPortfolio);
    }

    Ok(PortfolioConfig {
        data_dir,
        as_of,
        positions,
    })
}

fn validate_position(
    config: &dyn ConfigPort,
    section: &str,
    name: &str,
    as_of: NaiveDate,
) -> Result<PositionSpec, AccrueError> {
    let kind_str = required(config, section, "kind")?;
    let kind: PositionKind = kind_str
        .parse()
        .map_err(|found| AccrueError::TypeMismatch {
            name: name.to_string(),
            found,
        })?;

    let identifier = required(config, section, "identifier")?;

    let value_str = required(config, section, "value")?;
    let value: f64 = value_str
        .trim()
        .parse()
        .ok()
        .filter(|v: &f64| v.is_finite() && *v > 0.0)
        .ok_or_else(|| AccrueError::ConfigInvalid {
            section: section.into(),
            key: "value".into(),
            reason: format!("value must be a positive number, got {:?}", value_str),
        })?;

    let start = parse_date(&required(config, section, "start")?, section, "start")?;
    let end = match config.get_string(section, "end") {
        Some(s) => parse_date(&s, section, "end")?,
        None => as_of,
    };
    date_axis::check_range(start, end)?;
    date_axis::check_range(start, as_of)?;

    let frequency = config
        .get_string(section, "frequency")
        .filter(|s| !s.trim().is_empty())
        .map(|s| {
            s.parse::<Frequency>()
                .map_err(|e| AccrueError::ConfigInvalid {
                    section: section.into(),
                    key: "frequency".into(),
                    reason: e.to_string(),
                })
        })
        .transpose()?;

    let percentage = config.get_double(section, "percentage", 100.0)?;
    if !percentage.is_finite() || percentage < 0.0 {
        return Err(AccrueError::ConfigInvalid {
            section: section.into(),
            key: "percentage".into(),
            reason: "percentage must be non-negative".into(),
        });
    }
    let withholding = config.get_bool(section, "withholding", false)?;

    Ok(PositionSpec {
        name: name.to_string(),
        kind,
        identifier,
        value,
        start,
        end,
        frequency,
        percentage,
        withholding,
    })
}

fn required(config: &dyn ConfigPort, section: &str, key: &str) -> Result<String, AccrueError> {
    config
        .get_string(section, key)
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AccrueError::ConfigMissing {
            section: section.into(),
            key: key.into(),
        })
}

fn parse_date(value: &str, section: &str, key: &str) -> Result<NaiveDate, AccrueError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| AccrueError::ConfigInvalid {
        section: section.into(),
        key: key.into(),
        reason: format!("invalid {} format, expected YYYY-MM-DD", key),
    })
}
