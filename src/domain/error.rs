//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for accrue.
#[derive(Debug, thiserror::Error)]
pub enum AccrueError {
    #[error("invalid range: end {end} precedes start {start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("no data for {identifier}{}", describe_range(.range))]
    NoData {
        identifier: String,
        range: Option<(NaiveDate, NaiveDate)>,
    },

    #[error("type mismatch for {name}: {found} is not a recognised position kind")]
    TypeMismatch { name: String, found: String },

    #[error("portfolio needs at least one position")]
    EmptyPortfolio,

    #[error("invalid frequency: {value}")]
    InvalidFrequency { value: String },

    #[error("invalid series {name}: {reason}")]
    InvalidSeries { name: String, reason: String },

    #[error("invalid notional for {identifier}: {value}")]
    InvalidValue { identifier: String, value: f64 },

    #[error("data source error: {reason}")]
    DataSource { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn describe_range(range: &Option<(NaiveDate, NaiveDate)>) -> String {
    match range {
        Some((start, end)) => format!(" between {start} and {end}"),
        None => String::new(),
    }
}

impl AccrueError {
    pub fn no_data(identifier: &str, start: NaiveDate, end: NaiveDate) -> Self {
        AccrueError::NoData {
            identifier: identifier.to_string(),
            range: Some((start, end)),
        }
    }

    /// True when the source answered but had nothing for the range.
    ///
    /// Callers that can render an empty trajectory match on this instead of
    /// treating every failure alike.
    pub fn is_no_data(&self) -> bool {
        matches!(self, AccrueError::NoData { .. })
    }

    /// Process exit status for this error's family.
    pub fn exit_code(&self) -> u8 {
        match self {
            AccrueError::Io(_) | AccrueError::Report { .. } => 1,
            AccrueError::ConfigParse { .. }
            | AccrueError::ConfigMissing { .. }
            | AccrueError::ConfigInvalid { .. } => 2,
            AccrueError::DataSource { .. } | AccrueError::InvalidSeries { .. } => 3,
            AccrueError::InvalidRange { .. }
            | AccrueError::InvalidValue { .. }
            | AccrueError::InvalidFrequency { .. }
            | AccrueError::TypeMismatch { .. }
            | AccrueError::EmptyPortfolio => 4,
            AccrueError::NoData { .. } => 5,
        }
    }
}

impl From<&AccrueError> for std::process::ExitCode {
    fn from(err: &AccrueError) -> Self {
        std::process::ExitCode::from(err.exit_code())
    }
}
