use std::io::Write;

use jobledger_core::RuleError;
use jobledger_import::{categorize, load_rules, load_transactions, CsvError};
use jobledger_report::{export_buckets, render_report, ExportError, ExportedFile};
use thiserror::Error;

use crate::config::{Config, ConfigError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Rules(#[from] RuleError),
    #[error(transparent)]
    Transactions(#[from] CsvError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("cannot write report: {0}")]
    Output(#[from] std::io::Error),
}

impl AppError {
    /// Short failure kind written ahead of the message on stderr.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Config(_) => "configuration",
            AppError::Rules(_) => "malformed rules",
            AppError::Transactions(_) => "transaction source",
            AppError::Export(_) => "export",
            AppError::Output(_) => "output",
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Config(_) => 1,
            AppError::Rules(_) => 2,
            AppError::Transactions(_) => 3,
            AppError::Export(_) => 4,
            AppError::Output(_) => 5,
        }
    }
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub transactions: usize,
    pub buckets: usize,
    pub defects: usize,
    pub exported: Vec<ExportedFile>,
}

/// Load rules and transactions, print the report to `out`, then export one
/// CSV per bucket when enabled.
///
/// Rules are loaded first so a bad rules file aborts before the transactions
/// are touched.
pub fn run<W: Write>(config: &Config, out: &mut W) -> Result<RunSummary, AppError> {
    writeln!(out, "🔍 Job Expense Categorizer\n")?;

    let rules = load_rules(&config.rules)?;

    writeln!(out, "📊 Reading transactions...")?;
    let table = load_transactions(&config.transactions)?;
    let headers = table.headers;
    let categorized = categorize(table.transactions, &rules);

    writeln!(out, "\n{}", render_report(&categorized))?;

    for defect in categorized.defects() {
        writeln!(
            out,
            "\n⚠ Row {} filed under Uncategorized: {}",
            defect.index + 1,
            defect.error
        )?;
    }

    let exported = if config.export {
        writeln!(out, "\n📄 Exporting categorized files...")?;
        let files = export_buckets(&categorized, &headers, &config.output_dir, &config.prefix)?;
        for file in &files {
            writeln!(
                out,
                "✓ Exported {} transactions to {}",
                file.rows,
                file.path.display()
            )?;
        }
        files
    } else {
        Vec::new()
    };

    writeln!(out, "\n✅ Categorization complete!")?;

    Ok(RunSummary {
        transactions: categorized.len(),
        buckets: categorized.bucket_names().count(),
        defects: categorized.defects().len(),
        exported,
    })
}
