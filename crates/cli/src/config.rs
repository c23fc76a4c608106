// Run settings: built-in defaults, overridden by an optional TOML file,
// overridden by command-line flags.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::cli::Cli;

pub const DEFAULT_TRANSACTIONS: &str = "sample_transactions.csv";
pub const DEFAULT_RULES: &str = "rules.json";
pub const DEFAULT_OUTPUT_DIR: &str = ".";
pub const DEFAULT_PREFIX: &str = "categorized";
pub const DEFAULT_CONFIG_FILE: &str = "jobledger.toml";
pub const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config '{}': {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("config '{}' is not valid TOML: {message}", path.display())]
    Parse { path: PathBuf, message: String },
    #[error("invalid output prefix '{0}': must be non-empty and contain no path separators")]
    InvalidPrefix(String),
}

/// Deserialisable shape of `jobledger.toml`. Unknown keys are ignored.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct FileConfig {
    pub input: InputSection,
    pub output: OutputSection,
    pub logging: LoggingSection,
}

/// `[input]` section.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputSection {
    pub transactions: Option<PathBuf>,
    pub rules: Option<PathBuf>,
}

/// `[output]` section.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputSection {
    pub dir: Option<PathBuf>,
    pub prefix: Option<String>,
    pub export: Option<bool>,
}

/// `[logging]` section.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingSection {
    /// `EnvFilter` directive, e.g. `"info"` or `"jobledger_import=debug"`.
    pub level: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub transactions: PathBuf,
    pub rules: PathBuf,
    pub output_dir: PathBuf,
    pub prefix: String,
    pub export: bool,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            transactions: PathBuf::from(DEFAULT_TRANSACTIONS),
            rules: PathBuf::from(DEFAULT_RULES),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            prefix: DEFAULT_PREFIX.to_string(),
            export: true,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Config {
    /// Resolve settings for `cli`. An explicit `--config` must exist; the
    /// implicit `./jobledger.toml` is used only when present.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path)?,
            None => {
                let implicit = Path::new(DEFAULT_CONFIG_FILE);
                if implicit.is_file() {
                    tracing::debug!(path = %implicit.display(), "Using implicit config file");
                    FileConfig::load(implicit)?
                } else {
                    FileConfig::default()
                }
            }
        };
        Self::merge(cli, file)
    }

    /// Flags beat file values; file values beat built-in defaults.
    pub fn merge(cli: &Cli, file: FileConfig) -> Result<Self, ConfigError> {
        let defaults = Config::default();

        let prefix = cli
            .prefix
            .clone()
            .or(file.output.prefix)
            .unwrap_or(defaults.prefix);
        if prefix.trim().is_empty() || prefix.contains(['/', '\\']) {
            return Err(ConfigError::InvalidPrefix(prefix));
        }

        Ok(Config {
            transactions: cli
                .transactions
                .clone()
                .or(file.input.transactions)
                .unwrap_or(defaults.transactions),
            rules: cli.rules.clone().or(file.input.rules).unwrap_or(defaults.rules),
            output_dir: cli
                .output_dir
                .clone()
                .or(file.output.dir)
                .unwrap_or(defaults.output_dir),
            prefix,
            export: !cli.no_export && file.output.export.unwrap_or(defaults.export),
            log_level: file.logging.level.unwrap_or(defaults.log_level),
        })
    }
}
