use std::process::ExitCode;

use clap::Parser;
use jobledger::{logging, AppError, Cli, Config};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => return fail(&AppError::from(e)),
    };

    logging::init(cli.debug, &config.log_level);
    tracing::debug!(?config, "Resolved configuration");

    let stdout = std::io::stdout();
    match jobledger::run(&config, &mut stdout.lock()) {
        Ok(summary) => {
            tracing::info!(
                transactions = summary.transactions,
                buckets = summary.buckets,
                defects = summary.defects,
                files = summary.exported.len(),
                "Run finished"
            );
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

fn fail(e: &AppError) -> ExitCode {
    eprintln!("error: {}: {e}", e.kind());
    ExitCode::from(e.exit_code())
}
