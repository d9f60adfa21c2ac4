use clap::Parser;
use taskboard::cli::commands::Cli;
use taskboard::cli::handlers;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive
const LOG_ENV: &str = "TASKBOARD_LOG";

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(e) = handlers::dispatch(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
