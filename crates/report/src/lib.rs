pub mod export;
pub mod report;

pub use export::{export_buckets, export_filename, write_bucket, ExportError, ExportedFile};
pub use report::{render_report, Totals};
