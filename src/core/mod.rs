//! Core data types for chain pricing
//!
//! Defines fundamental types:
//! - OptionContract: raw contract with market price and IV
//! - EnrichedContract / PricedContract: pipeline records
//! - ChainSnapshot: contracts grouped by expiry
//! - ChainError: error taxonomy

pub mod option;
pub mod record;
pub mod chain;
pub mod error;

pub use option::*;
pub use record::*;
pub use chain::*;
pub use error::*;
