pub mod csv;
pub mod match_engine;
pub mod rules;

pub use crate::csv::{load_transactions, read_transactions, ColumnMap, CsvError, TransactionTable};
pub use match_engine::{categorize, classify, Categorization, Classification, Defect, JobMatcher};
pub use rules::{load_rules, parse_rules_json, parse_rules_toml};
