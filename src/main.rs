#![warn(clippy::all, clippy::pedantic)]

use anyhow::Result;
use aviation_ai::{Config, app, cli::Cli};
use clap::Parser;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

fn init_tracing(verbose: bool, configured: &str) {
    let level = if verbose {
        Level::DEBUG
    } else {
        configured.parse().unwrap_or(Level::INFO)
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Warning: Failed to install tracing subscriber: {e}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Both aws-lc-rs and ring may be linked; pick one explicitly.
    if let Err(e) = rustls::crypto::ring::default_provider().install_default() {
        eprintln!("Warning: Failed to install default crypto provider: {e:?}");
    }

    let cli = Cli::parse();
    let config = Config::load_or_init()?;
    init_tracing(cli.verbose, &config.log_level);

    app::dispatch(cli, Arc::new(config)).await
}
