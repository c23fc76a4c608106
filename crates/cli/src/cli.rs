use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default, Clone)]
#[command(
    name = "jobledger",
    version,
    about = "Assign transactions to jobs by date window and vendor/description patterns"
)]
pub struct Cli {
    /// Transactions CSV with Date, Vendor, Description and Amount columns.
    pub transactions: Option<PathBuf>,

    /// Job rules document (.json, or .toml).
    pub rules: Option<PathBuf>,

    /// Directory the per-job CSV files are written to.
    #[arg(short = 'o', long = "output-dir")]
    pub output_dir: Option<PathBuf>,

    /// File name prefix for per-job CSV files.
    #[arg(short = 'p', long = "prefix")]
    pub prefix: Option<String>,

    /// Print the report only; skip the per-job CSV files.
    #[arg(long = "no-export")]
    pub no_export: bool,

    /// Settings file (defaults to ./jobledger.toml when present).
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Enable debug logging on stderr.
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_paths_and_flags() {
        let cli = Cli::parse_from([
            "jobledger",
            "bank.csv",
            "jobs.toml",
            "--output-dir",
            "out",
            "-p",
            "q1",
            "--no-export",
            "--debug",
        ]);
        assert_eq!(cli.transactions, Some(PathBuf::from("bank.csv")));
        assert_eq!(cli.rules, Some(PathBuf::from("jobs.toml")));
        assert_eq!(cli.output_dir, Some(PathBuf::from("out")));
        assert_eq!(cli.prefix.as_deref(), Some("q1"));
        assert!(cli.no_export);
        assert!(cli.debug);
        assert!(cli.config.is_none());
    }

    #[test]
    fn everything_is_optional() {
        let cli = Cli::parse_from(["jobledger"]);
        assert!(cli.transactions.is_none());
        assert!(cli.rules.is_none());
        assert!(!cli.no_export);
    }
}
