//! Domain layer - Entity contract and business entities.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.

pub mod constants;
pub mod entity;
pub mod error;
pub mod exchange_rate;

pub use constants::*;
pub use entity::{new_id, Identifiable};
pub use error::{DomainError, DomainResult};
pub use exchange_rate::ExchangeRate;
