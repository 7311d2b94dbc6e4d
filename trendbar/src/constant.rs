use std::fmt::{Display, Formatter};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How an EMA chain reacts to a month without a close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmaGapPolicy {
    /// The recursion halts at the first undefined close and stays undefined.
    #[default]
    Break,
    /// Undefined closes are skipped; the last defined EMA is carried forward.
    Carry,
}

impl EmaGapPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Break => "break",
            Self::Carry => "carry",
        }
    }
}

#[derive(Debug)]
pub enum DataError {
    EmptyInput {
        ticker: String,
    },
    Shape {
        ticker: String,
        expected: usize,
        actual: usize,
    },
    Unsorted {
        ticker: String,
        previous: NaiveDate,
        date: NaiveDate,
    },
    InvalidDatetime(String),
    MissingColumns(Vec<String>),
    InvalidRecord {
        line: u64,
        reason: String,
    },
    Io(std::io::Error),
    Csv(csv::Error),
    Polars(polars::error::PolarsError),
    Yaml(serde_yaml::Error),
    Json(serde_json::Error),
}

pub struct Const;

impl Const {
    pub const SMA_PERIODS: [usize; 2] = [10, 20];
    pub const EMA_PERIODS: [usize; 2] = [10, 20];
    pub const EXPECTED_MONTHS: usize = 24;
}

impl DataError {
    pub fn is_shape_violation(&self) -> bool {
        matches!(self, Self::Shape { .. })
    }
}

impl Display for DataError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyInput { ticker } => write!(f, "empty daily series for ticker {ticker}"),
            Self::Shape {
                ticker,
                expected,
                actual,
            } => write!(
                f,
                "{ticker} does not contain exactly {expected} monthly records (got {actual})"
            ),
            Self::Unsorted {
                ticker,
                previous,
                date,
            } => write!(f, "{ticker} daily dates are not ascending: {date} follows {previous}"),
            Self::InvalidDatetime(v) => write!(f, "invalid datetime: {v}"),
            Self::MissingColumns(cols) => {
                write!(f, "input does not contain required columns: {}", cols.join(", "))
            }
            Self::InvalidRecord { line, reason } => write!(f, "invalid record at line {line}: {reason}"),
            Self::Io(e) => write!(f, "io error: {e}"),
            Self::Csv(e) => write!(f, "csv error: {e}"),
            Self::Polars(e) => write!(f, "polars error: {e}"),
            Self::Yaml(e) => write!(f, "yaml error: {e}"),
            Self::Json(e) => write!(f, "json error: {e}"),
        }
    }
}

impl std::error::Error for DataError {}

impl From<std::io::Error> for DataError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<csv::Error> for DataError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<polars::error::PolarsError> for DataError {
    fn from(value: polars::error::PolarsError) -> Self {
        Self::Polars(value)
    }
}

impl From<serde_yaml::Error> for DataError {
    fn from(value: serde_yaml::Error) -> Self {
        Self::Yaml(value)
    }
}

impl From<serde_json::Error> for DataError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}
