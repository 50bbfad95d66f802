//! Exchange rate domain entity.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{CURRENCY_CODE_LENGTH, PAIR_SEPARATOR};
use crate::entity::{new_id, Identifiable};
use crate::error::{DomainError, DomainResult};

/// A quoted rate for one currency pair, e.g. `USD-EUR` at `1.05`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRate {
    pub id: Uuid,
    /// Currency pair in `BASE-QUOTE` form
    pub name: String,
    pub rate: f64,
    /// Where the quote came from, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

impl ExchangeRate {
    /// Create a new rate with a fresh identifier
    pub fn new(name: impl Into<String>, rate: f64) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            rate,
            provider: None,
        }
    }

    /// Attach the quote provider
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Replace the quoted rate
    pub fn set_rate(&mut self, rate: f64) {
        self.rate = rate;
    }

    /// Split the pair name into base and quote currency codes.
    pub fn currencies(&self) -> DomainResult<(&str, &str)> {
        let (base, quote) = self
            .name
            .split_once(PAIR_SEPARATOR)
            .ok_or_else(|| DomainError::validation(format!("'{}' is not a currency pair", self.name)))?;

        if base.len() != CURRENCY_CODE_LENGTH || quote.len() != CURRENCY_CODE_LENGTH {
            return Err(DomainError::validation(format!(
                "'{}' must use {}-letter currency codes",
                self.name, CURRENCY_CODE_LENGTH
            )));
        }

        Ok((base, quote))
    }
}

impl Identifiable for ExchangeRate {
    fn id(&self) -> Uuid {
        self.id
    }
}
