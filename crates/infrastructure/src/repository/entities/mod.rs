//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod exchange_rate;

pub use exchange_rate::{
    ActiveModel as ExchangeRateActiveModel, Entity as ExchangeRateEntity, Model as ExchangeRateModel,
};
