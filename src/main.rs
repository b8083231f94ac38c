mod auth;
mod cli;
mod config;
mod error;
mod insights;
mod models;
mod providers;
mod report;
mod series;
mod store;

use clap::Parser;
use cli::Cli;
use log::{error, info};

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    info!("Starting repo-insights");

    // Failures end the batch quietly; the log is the caller's signal.
    match cli.execute().await {
        Ok(()) => info!("Insights generated successfully!"),
        Err(e) => error!("Error: {e:#}"),
    }
}
