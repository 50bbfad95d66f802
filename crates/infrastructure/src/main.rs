//! fx-rates - maintenance tool for stored exchange rates.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use common::DatabaseConfig;
use infrastructure::cli::{self, Cli};
use infrastructure::{EntityRepository, ExchangeRateRepository};

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = DatabaseConfig::from_env();
    if let Some(url) = cli.database_url {
        config.url = url;
    }

    let mut repo = match ExchangeRateRepository::connect(&config).await {
        Ok(repo) => repo,
        Err(e) => {
            eprintln!("error [{}]: {}", e.code(), e.user_message());
            return ExitCode::FAILURE;
        }
    };

    let result = cli::run(&mut repo, cli.command).await;

    if let Err(e) = repo.release().await {
        tracing::warn!("Failed to release database connection: {}", e);
    }

    match result {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error [{}]: {}", e.code(), e.user_message());
            ExitCode::FAILURE
        }
    }
}
