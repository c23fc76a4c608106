use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use jobledger_core::Transaction;
use jobledger_import::csv::{AMOUNT_COLUMN, COLUMNS, DATE_COLUMN, DESCRIPTION_COLUMN, VENDOR_COLUMN};
use jobledger_import::Categorization;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot write '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV write to '{}' failed: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("jobs '{first_job}' and '{second_job}' would both be exported to '{}'", path.display())]
    NameCollision {
        first_job: String,
        second_job: String,
        path: PathBuf,
    },
}

/// One file written by [`export_buckets`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub job: String,
    pub path: PathBuf,
    pub rows: usize,
}

/// `<prefix>_<job>.csv`, with whitespace and path separators in the job name
/// replaced by `_`.
pub fn export_filename(prefix: &str, job: &str) -> String {
    let safe: String = job
        .chars()
        .map(|c| if c.is_whitespace() || c == '/' || c == '\\' { '_' } else { c })
        .collect();
    format!("{prefix}_{safe}.csv")
}

/// Write `headers` and one row per transaction.
///
/// Rows read from a file are written back verbatim, padded to the header
/// width. Other rows are rebuilt from the transaction fields by header name.
/// With no headers the standard `Date,Vendor,Description,Amount` row is used.
/// The header is always written. `path` is only used for error context.
pub fn write_bucket<W: Write>(
    headers: &[String],
    transactions: &[Transaction],
    writer: W,
    path: &Path,
) -> Result<usize, ExportError> {
    let default_headers;
    let headers = if headers.is_empty() {
        default_headers = COLUMNS.map(String::from);
        &default_headers[..]
    } else {
        headers
    };

    let csv_err = |source| ExportError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut csv_writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(writer);

    csv_writer.write_record(headers).map_err(csv_err)?;

    for t in transactions {
        csv_writer
            .write_record(export_row(headers, t))
            .map_err(csv_err)?;
    }

    csv_writer.flush().map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(transactions.len())
}

fn export_row(headers: &[String], t: &Transaction) -> Vec<String> {
    if t.source.is_empty() {
        return headers.iter().map(|h| field_for(t, h)).collect();
    }

    let mut row = t.source.clone();
    if row.len() < headers.len() {
        row.resize(headers.len(), String::new());
    }
    row
}

fn field_for(t: &Transaction, header: &str) -> String {
    let header = header.trim();
    if header.eq_ignore_ascii_case(DATE_COLUMN) {
        t.date.to_string()
    } else if header.eq_ignore_ascii_case(VENDOR_COLUMN) {
        t.vendor.clone()
    } else if header.eq_ignore_ascii_case(DESCRIPTION_COLUMN) {
        t.description.clone()
    } else if header.eq_ignore_ascii_case(AMOUNT_COLUMN) {
        t.amount.to_plain_string()
    } else {
        String::new()
    }
}

/// Write one CSV per bucket into `dir`, creating it if needed.
///
/// Files are written in bucket name order under the source `headers`. Fails
/// before writing anything if two jobs map to the same file name, compared
/// case-insensitively.
pub fn export_buckets(
    categorized: &Categorization,
    headers: &[String],
    dir: &Path,
    prefix: &str,
) -> Result<Vec<ExportedFile>, ExportError> {
    let mut claimed: HashMap<String, &str> = HashMap::new();
    let mut planned = Vec::new();
    for (job, txs) in categorized.buckets() {
        let file_name = export_filename(prefix, job);
        let path = dir.join(&file_name);
        if let Some(first_job) = claimed.insert(file_name.to_lowercase(), job) {
            return Err(ExportError::NameCollision {
                first_job: first_job.to_string(),
                second_job: job.to_string(),
                path,
            });
        }
        planned.push((job, txs, path));
    }

    std::fs::create_dir_all(dir).map_err(|source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut exported = Vec::with_capacity(planned.len());
    for (job, txs, path) in planned {
        let file = std::fs::File::create(&path).map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;

        let rows = write_bucket(headers, txs, std::io::BufWriter::new(file), &path)?;
        tracing::info!(job, path = %path.display(), rows, "Exported bucket");

        exported.push(ExportedFile {
            job: job.to_string(),
            path,
            rows,
        });
    }

    Ok(exported)
}
