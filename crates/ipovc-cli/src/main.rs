//! ipovc - extract venture-capital shareholder data from IPO prospectuses.

use clap::Parser;
use ipovc_cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() {
    // Load .env before anything reads the environment
    dotenvy::dotenv().ok();

    // Initialize tracing (log to stderr)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    if let Err(e) = ipovc_cli::run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
