//! Option chain snapshots
//!
//! Raw contracts grouped by expiry, together with the spot price and the
//! reference date they were observed at.

use std::fs;
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::error::ChainResult;
use super::option::{OptionContract, OptionType};

/// All contracts for a single expiry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpiryChain {
    /// Expiry date
    pub expiry: NaiveDate,
    /// Calls and puts, in provider order
    pub contracts: Vec<OptionContract>,
}

impl ExpiryChain {
    pub fn new(expiry: NaiveDate) -> Self {
        Self {
            expiry,
            contracts: Vec::new(),
        }
    }

    pub fn push(&mut self, contract: OptionContract) {
        self.contracts.push(contract);
    }

    pub fn calls(&self) -> impl Iterator<Item = &OptionContract> {
        self.contracts.iter().filter(|c| c.kind == OptionType::Call)
    }

    pub fn puts(&self) -> impl Iterator<Item = &OptionContract> {
        self.contracts.iter().filter(|c| c.kind == OptionType::Put)
    }

    /// Get all strikes, sorted and deduplicated
    pub fn strikes(&self) -> Vec<f64> {
        let mut strikes: Vec<f64> = self.contracts.iter().map(|c| c.strike).collect();
        strikes.sort_by(|a, b| a.total_cmp(b));
        strikes.dedup();
        strikes
    }
}

/// Full chain snapshot (all fetched expiries)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainSnapshot {
    /// Underlying symbol
    pub underlying: String,
    /// Underlying spot price at snapshot time
    pub spot: f64,
    /// Reference date for time-to-expiry
    pub as_of: NaiveDate,
    /// Chains sorted by expiry
    pub expiries: Vec<ExpiryChain>,
    /// When the snapshot was assembled; metadata only, pricing uses `as_of`
    pub timestamp: DateTime<Utc>,
}

impl ChainSnapshot {
    pub fn new(underlying: impl Into<String>, spot: f64, as_of: NaiveDate) -> Self {
        Self {
            underlying: underlying.into(),
            spot,
            as_of,
            expiries: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    /// Add a chain, keeping expiries ordered
    pub fn add_chain(&mut self, chain: ExpiryChain) {
        self.expiries.push(chain);
        self.expiries.sort_by_key(|c| c.expiry);
    }

    /// Get chain for expiry
    pub fn chain_for_expiry(&self, expiry: NaiveDate) -> Option<&ExpiryChain> {
        self.expiries.iter().find(|c| c.expiry == expiry)
    }

    /// All contracts, flattened in expiry order
    pub fn contracts(&self) -> Vec<OptionContract> {
        self.expiries
            .iter()
            .flat_map(|c| c.contracts.iter().cloned())
            .collect()
    }

    /// Total number of contracts
    pub fn total_contracts(&self) -> usize {
        self.expiries.iter().map(|c| c.contracts.len()).sum()
    }

    /// Keep only the `n` nearest expiries that have not yet expired
    pub fn with_max_expiries(mut self, n: usize) -> Self {
        let as_of = self.as_of;
        self.expiries.retain(|c| c.expiry >= as_of);
        self.expiries.truncate(n);
        self
    }

    pub fn load_json(path: impl AsRef<Path>) -> ChainResult<Self> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn save_json(&self, path: impl AsRef<Path>) -> ChainResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
