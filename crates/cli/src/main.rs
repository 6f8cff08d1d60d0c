use std::process::ExitCode;

use quotedesk_core::config::{AppConfig, LoadOptions};

fn init_logging(config: &AppConfig) {
    use quotedesk_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    match config.logging.format {
        Compact => builder.compact().init(),
        Pretty => builder.pretty().init(),
        Json => builder.json().init(),
    }
}

fn main() -> ExitCode {
    // A broken config is reported by the command itself; log with defaults meanwhile.
    let config = AppConfig::load(LoadOptions::default()).unwrap_or_default();
    init_logging(&config);
    quotedesk_cli::run()
}
