//! Pipeline records
//!
//! Each pipeline stage wraps the previous record by value and adds its own
//! fields, so an upstream record is never touched by a later stage.

use serde::{Deserialize, Serialize};

use super::error::ChainError;
use super::option::OptionContract;

/// Contract annotated with moneyness and time to expiry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedContract {
    pub contract: OptionContract,
    /// strike / underlying price
    pub moneyness: f64,
    /// Calendar days until expiry, not clamped
    pub days_to_expiry: i64,
    /// days_to_expiry / 365
    pub time_to_expiry: f64,
}

/// Enriched contract with its model price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedContract {
    pub enriched: EnrichedContract,
    /// Black-Scholes price
    pub theoretical_price: f64,
    /// market - theoretical; None when there is no market price
    pub pricing_error: Option<f64>,
}

impl PricedContract {
    pub fn contract(&self) -> &OptionContract {
        &self.enriched.contract
    }

    /// Pricing error relative to the theoretical price
    pub fn relative_error(&self) -> Option<f64> {
        match self.pricing_error {
            Some(err) if self.theoretical_price > 0.0 => Some(err / self.theoretical_price),
            _ => None,
        }
    }
}

/// A contract the batch driver could not price
#[derive(Debug)]
pub struct UnpricedContract {
    /// Position in the input batch
    pub index: usize,
    pub enriched: EnrichedContract,
    pub error: ChainError,
}

/// Output of one batch pricing run
#[derive(Debug, Default)]
pub struct BatchPricing {
    pub priced: Vec<PricedContract>,
    pub unpriced: Vec<UnpricedContract>,
}

impl BatchPricing {
    pub fn len(&self) -> usize {
        self.priced.len() + self.unpriced.len()
    }

    pub fn is_empty(&self) -> bool {
        self.priced.is_empty() && self.unpriced.is_empty()
    }
}
