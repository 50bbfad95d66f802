//! Command tests for the `fx-rates` binary against a SQLite store.

mod support;

use common::AppError;
use domain::ExchangeRate;
use infrastructure::cli::{run, Commands};
use infrastructure::EntityRepository;

use support::{usd_eur, TestStore};

#[tokio::test]
async fn test_update_without_provider_clears_it() {
    let store = TestStore::new().await;
    let mut repo = store.repo().await;
    let rate = repo.create(usd_eur(1.0).with_provider("ecb")).await.unwrap();

    let command = Commands::Update {
        id: rate.id,
        name: "USD-EUR".to_string(),
        rate: 1.05,
        provider: None,
    };
    run(&mut repo, command).await.unwrap();

    let mut reader = store.repo().await;
    let stored = reader.get_by_id(rate.id).await.unwrap().unwrap();
    assert_eq!(stored.rate, 1.05);
    assert_eq!(stored.provider, None);
}

#[tokio::test]
async fn test_update_missing_rate_is_conflict() {
    let store = TestStore::new().await;
    let mut repo = store.repo().await;
    let never_stored = usd_eur(1.0);

    let command = Commands::Update {
        id: never_stored.id,
        name: never_stored.name,
        rate: 1.05,
        provider: None,
    };
    let result = run(&mut repo, command).await;

    assert!(matches!(result, Err(AppError::StoreConflict(_))));
    assert_eq!(repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_add_prints_stored_rate() {
    let store = TestStore::new().await;
    let mut repo = store.repo().await;

    let command = Commands::Add {
        name: "GBP-EUR".to_string(),
        rate: 1.17,
        provider: Some("ecb".to_string()),
    };
    let output = run(&mut repo, command).await.unwrap();

    let printed: ExchangeRate = serde_json::from_str(&output).unwrap();
    assert_eq!(printed.name, "GBP-EUR");
    assert_eq!(repo.get_by_id(printed.id).await.unwrap(), Some(printed));
}

#[tokio::test]
async fn test_add_rejects_malformed_pair() {
    let store = TestStore::new().await;
    let mut repo = store.repo().await;

    let command = Commands::Add {
        name: "USDEUR".to_string(),
        rate: 1.0,
        provider: None,
    };
    let result = run(&mut repo, command).await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert_eq!(repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_update_rejects_malformed_pair() {
    let store = TestStore::new().await;
    let mut repo = store.repo().await;
    let rate = repo.create(usd_eur(1.0)).await.unwrap();

    let command = Commands::Update {
        id: rate.id,
        name: "US-EURO".to_string(),
        rate: 2.0,
        provider: None,
    };
    let result = run(&mut repo, command).await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert_eq!(repo.get_by_id(rate.id).await.unwrap(), Some(rate));
}

#[tokio::test]
async fn test_delete_prints_nothing() {
    let store = TestStore::new().await;
    let mut repo = store.repo().await;
    let rate = repo.create(usd_eur(1.0)).await.unwrap();

    let output = run(&mut repo, Commands::Delete { id: rate.id }).await.unwrap();

    assert!(output.is_empty());
    assert_eq!(repo.count().await.unwrap(), 0);
}
