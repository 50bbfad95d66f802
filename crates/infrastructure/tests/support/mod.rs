//! Shared fixtures for repository tests.

use sea_orm::{ConnectionTrait, Schema};
use tempfile::TempDir;

use common::DatabaseConfig;
use domain::ExchangeRate;
use infrastructure::repository::entities::ExchangeRateEntity;
use infrastructure::{Database, ExchangeRateRepository};

/// File-backed SQLite store living in a temporary directory.
pub struct TestStore {
    _dir: TempDir,
    pub config: DatabaseConfig,
}

impl TestStore {
    /// Create an empty store with the exchange rate table in place.
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("rates.db");
        let config = DatabaseConfig {
            url: format!("sqlite://{}?mode=rwc", path.display()),
            max_connections: 1,
            min_connections: 1,
            ..DatabaseConfig::default()
        };

        let db = Database::connect(&config)
            .await
            .expect("Failed to connect to test database");
        let backend = db.backend();
        let create = Schema::new(backend).create_table_from_entity(ExchangeRateEntity);
        db.connection()
            .execute(backend.build(&create))
            .await
            .expect("Failed to create exchange_rates table");
        db.into_connection()
            .close()
            .await
            .expect("Failed to close setup connection");

        Self { _dir: dir, config }
    }

    /// Open a repository with its own connection to this store.
    pub async fn repo(&self) -> ExchangeRateRepository {
        ExchangeRateRepository::connect(&self.config)
            .await
            .expect("Failed to open repository")
    }
}

pub fn usd_eur(rate: f64) -> ExchangeRate {
    ExchangeRate::new("USD-EUR", rate)
}

/// Identifiers sorted, for order-independent comparisons.
pub fn sorted_ids(rates: &[ExchangeRate]) -> Vec<uuid::Uuid> {
    let mut ids: Vec<_> = rates.iter().map(|r| r.id).collect();
    ids.sort();
    ids
}
