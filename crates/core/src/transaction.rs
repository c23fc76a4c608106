use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::money::Money;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A transaction date as it came off the source.
///
/// Records whose date cannot be read are kept as `Unparsed` so they can still
/// be reported and exported instead of disappearing from the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxDate {
    Parsed(NaiveDate),
    /// Raw source text; empty when the field was absent.
    Unparsed(String),
}

impl TxDate {
    /// Strict `YYYY-MM-DD`, ignoring surrounding whitespace.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
            Ok(date) => TxDate::Parsed(date),
            Err(_) => TxDate::Unparsed(trimmed.to_string()),
        }
    }

    pub fn as_date(&self) -> Result<NaiveDate, TransactionError> {
        match self {
            TxDate::Parsed(date) => Ok(*date),
            TxDate::Unparsed(raw) if raw.is_empty() => Err(TransactionError::MissingDate),
            TxDate::Unparsed(raw) => Err(TransactionError::InvalidDate(raw.clone())),
        }
    }
}

impl From<NaiveDate> for TxDate {
    fn from(date: NaiveDate) -> Self {
        TxDate::Parsed(date)
    }
}

impl fmt::Display for TxDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxDate::Parsed(date) => write!(f, "{}", date.format(DATE_FORMAT)),
            TxDate::Unparsed(raw) => f.write_str(raw),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactionError {
    #[error("transaction has no date")]
    MissingDate,
    #[error("transaction date '{0}' is not a YYYY-MM-DD calendar date")]
    InvalidDate(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: TxDate,
    pub vendor: String,
    pub description: String,
    pub amount: Money,
    /// Raw fields of the source row in source column order, written back
    /// verbatim on export. Empty for transactions not read from a file.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source: Vec<String>,
}

impl Transaction {
    pub fn new(
        date: impl Into<TxDate>,
        vendor: impl Into<String>,
        description: impl Into<String>,
        amount: Money,
    ) -> Self {
        Transaction {
            date: date.into(),
            vendor: vendor.into(),
            description: description.into(),
            amount,
            source: Vec::new(),
        }
    }
}
