//! Command-line interface for the `fx-rates` binary.

use clap::{Parser, Subcommand};
use serde::Serialize;
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt};
use domain::ExchangeRate;

use crate::query::Predicate;
use crate::repository::EntityRepository;
use crate::ExchangeRateRepository;

#[derive(Parser)]
#[command(name = "fx-rates")]
#[command(about = "Inspect and edit stored exchange rates")]
pub struct Cli {
    /// Database URL (overrides DATABASE_URL)
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List every stored rate
    List,
    /// Show one rate
    Get { id: Uuid },
    /// List rates matching all given filters
    Find {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        min_rate: Option<f64>,
        #[arg(long)]
        max_rate: Option<f64>,
        #[arg(long)]
        provider: Option<String>,
    },
    /// Store a new rate
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        rate: f64,
        #[arg(long)]
        provider: Option<String>,
    },
    /// Overwrite a stored rate; an omitted provider is cleared
    Update {
        id: Uuid,
        #[arg(long)]
        name: String,
        #[arg(long)]
        rate: f64,
        #[arg(long)]
        provider: Option<String>,
    },
    /// Delete a stored rate
    Delete { id: Uuid },
}

/// Execute one command and return what should be printed.
pub async fn run(repo: &mut ExchangeRateRepository, command: Commands) -> AppResult<String> {
    match command {
        Commands::List => to_json(&repo.get_all().await?),
        Commands::Get { id } => to_json(&repo.get_by_id(id).await?.ok_or_not_found()?),
        Commands::Find {
            name,
            min_rate,
            max_rate,
            provider,
        } => {
            let mut filters = Vec::new();
            if let Some(name) = name {
                filters.push(Predicate::field("name").eq(name));
            }
            if let Some(min) = min_rate {
                filters.push(Predicate::field("rate").gte(min));
            }
            if let Some(max) = max_rate {
                filters.push(Predicate::field("rate").lte(max));
            }
            if let Some(provider) = provider {
                filters.push(Predicate::field("provider").eq(provider));
            }
            to_json(&repo.get_where(&Predicate::all(filters)).await?)
        }
        Commands::Add {
            name,
            rate,
            provider,
        } => {
            let mut entity = ExchangeRate::new(name, rate);
            entity.provider = provider;
            entity.currencies()?;
            to_json(&repo.create(entity).await?)
        }
        Commands::Update {
            id,
            name,
            rate,
            provider,
        } => {
            let entity = ExchangeRate {
                id,
                name,
                rate,
                provider,
            };
            entity.currencies()?;
            to_json(&repo.update(entity).await?)
        }
        Commands::Delete { id } => {
            repo.delete_by_id(id).await?;
            tracing::info!(%id, "Rate deleted");
            Ok(String::new())
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> AppResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| AppError::internal(e.to_string()))
}
