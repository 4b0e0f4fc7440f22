mod scrape;
mod templates;

use clap::{Parser, Subcommand};
use shopfeed_core::Environment;
use tracing_subscriber::EnvFilter;

use crate::scrape::ScrapeArgs;

#[derive(Debug, Parser)]
#[command(name = "shopfeed")]
#[command(about = "Scrape product listings from Thai storefronts and import them into the catalog")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape a listing URL, preview the records and import them
    Scrape(ScrapeArgs),
    /// List the built-in source templates
    Templates,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = shopfeed_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(use_ansi(&config.env))
        .init();
    tracing::debug!(env = %config.env, "configuration loaded");

    match cli.command {
        Commands::Scrape(args) => scrape::run_scrape(&config, &args).await,
        Commands::Templates => {
            templates::run_templates();
            Ok(())
        }
    }
}

/// Coloured log output everywhere except production.
fn use_ansi(env: &Environment) -> bool {
    !matches!(env, Environment::Production)
}
