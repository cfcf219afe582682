//! Amadeus CLI binary entry point.

use amadeus::Cli;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = Cli::parse().run().await {
        tracing::error!("{e:#}");
        std::process::exit(1);
    }
}
