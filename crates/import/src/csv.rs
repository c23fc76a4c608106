use jobledger_core::{Money, Transaction, TxDate};
use rust_decimal::Decimal;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

pub const DATE_COLUMN: &str = "Date";
pub const VENDOR_COLUMN: &str = "Vendor";
pub const DESCRIPTION_COLUMN: &str = "Description";
pub const AMOUNT_COLUMN: &str = "Amount";

/// Header row written by the exporter and expected by the reader.
pub const COLUMNS: [&str; 4] = [DATE_COLUMN, VENDOR_COLUMN, DESCRIPTION_COLUMN, AMOUNT_COLUMN];

#[derive(Error, Debug)]
pub enum CsvError {
    #[error("cannot read transactions from '{}': {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Missing required column: {0}")]
    MissingColumn(&'static str),
    #[error("Invalid amount '{value}' on line {line}")]
    InvalidAmount { line: u64, value: String },
}

/// Positions of the required columns within a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub date: usize,
    pub vendor: usize,
    pub description: usize,
    pub amount: usize,
}

impl ColumnMap {
    /// Header names match case-insensitively, ignoring surrounding whitespace.
    pub fn from_headers(headers: &csv::StringRecord) -> Result<Self, CsvError> {
        let find = |name: &'static str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or(CsvError::MissingColumn(name))
        };

        Ok(ColumnMap {
            date: find(DATE_COLUMN)?,
            vendor: find(VENDOR_COLUMN)?,
            description: find(DESCRIPTION_COLUMN)?,
            amount: find(AMOUNT_COLUMN)?,
        })
    }
}

/// Transactions plus the header row they were read under.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionTable {
    /// Source header names, untrimmed and in source order.
    pub headers: Vec<String>,
    pub transactions: Vec<Transaction>,
}

impl TransactionTable {
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

/// Read every transaction from a CSV source with a header row.
///
/// Malformed dates are not an error here; they are carried as
/// [`TxDate::Unparsed`] and surface during classification. Every row keeps
/// its raw fields, including columns the reader does not interpret.
pub fn read_transactions<R: Read>(data: R) -> Result<TransactionTable, CsvError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let header_record = reader.headers()?.clone();
    let columns = ColumnMap::from_headers(&header_record)?;
    let headers: Vec<String> = header_record.iter().map(str::to_string).collect();
    let mut transactions = Vec::new();

    for result in reader.records() {
        let record = result?;

        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }

        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let field = |idx: usize| record.get(idx).unwrap_or_default();

        let amount = parse_amount(field(columns.amount)).ok_or_else(|| {
            CsvError::InvalidAmount {
                line,
                value: field(columns.amount).to_string(),
            }
        })?;

        transactions.push(Transaction {
            date: TxDate::parse(field(columns.date)),
            vendor: field(columns.vendor).to_string(),
            description: field(columns.description).to_string(),
            amount,
            source: record.iter().map(str::to_string).collect(),
        });
    }

    if transactions.is_empty() {
        tracing::warn!("Transaction source has no data rows");
    }

    Ok(TransactionTable {
        headers,
        transactions,
    })
}

pub fn load_transactions(path: &Path) -> Result<TransactionTable, CsvError> {
    let file = std::fs::File::open(path).map_err(|source| CsvError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let table = read_transactions(std::io::BufReader::new(file))?;
    tracing::debug!(path = %path.display(), count = table.len(), "Read transactions");
    Ok(table)
}

/// Accepts `$`, thousands commas and accounting parentheses for negatives.
fn parse_amount(s: &str) -> Option<Money> {
    let s = s.trim();
    let (negative, s) = match s.strip_prefix('(').and_then(|rest| rest.strip_suffix(')')) {
        Some(inner) => (true, inner),
        None => (false, s),
    };
    let s = s.replace([',', '$', ' '], "");
    let dec = Decimal::from_str(&s).ok()?;
    let dec = if negative && !dec.is_zero() { -dec } else { dec };
    Some(Money::from_decimal(dec))
}
