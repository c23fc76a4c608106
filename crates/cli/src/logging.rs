use tracing_subscriber::EnvFilter;

/// Install the global stderr subscriber.
///
/// Priority: `RUST_LOG` > `--debug` > `[logging] level` from the config file.
/// Stdout is left to the report.
pub fn init(debug_flag: bool, config_level: &str) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if debug_flag {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new(config_level)
    };

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();

    if installed.is_ok() {
        tracing::debug!(version = env!("CARGO_PKG_VERSION"), "Logging initialised");
    }
}
