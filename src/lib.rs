pub mod commands;
pub mod config;
pub mod core_state;
pub mod home;
pub mod navigation;
pub mod notify;
pub mod pipeline;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use commands::cli::Cli;

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing. Logs go to stderr; stdout carries the page.
    let fallback = if cli.verbose {
        config::verbose_log_filter()
    } else {
        config::default_log_filter()
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let state = match core_state::CoreState::new() {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "Cannot build transport");
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let format = cli.format();
    let mut stdout = std::io::stdout().lock();
    match commands::execute(cli.command, format, &state, &mut stdout) {
        Ok(status) => status.into(),
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
