//! Exchange rate persistence.
//!
//! This crate provides a generic repository over SeaORM:
//! - `DbContext` owns a connection and commits staged changes as one transaction
//! - `EntitySet` tracks entity states by identifier
//! - `Predicate` expresses filters that translate into SQL
//! - `Repository` implements `EntityRepository` for any `Storable` entity
//! - `cli` holds the commands of the `fx-rates` binary

pub mod cli;
pub mod context;
pub mod infra;
pub mod query;
pub mod repository;

pub use context::{DbContext, EntitySet, EntityState};
pub use infra::Database;
pub use query::{CompareOp, Field, Predicate};
pub use repository::{EntityRepository, Repository, Storable};

use domain::ExchangeRate;

/// Repository for exchange rates
pub type ExchangeRateRepository = Repository<ExchangeRate>;
