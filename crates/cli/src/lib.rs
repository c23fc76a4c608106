pub mod app;
pub mod cli;
pub mod config;
pub mod logging;

pub use app::{run, AppError, RunSummary};
pub use cli::Cli;
pub use config::Config;
