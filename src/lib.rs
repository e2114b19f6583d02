//! # Chain Pricer - Black-Scholes mispricing across an option chain
//!
//! Prices every contract in a listed option chain with the Black-Scholes
//! closed form and compares the result with the last traded price.
//!
//! ## Pipeline
//!
//! 1. **Enrich**: moneyness (K/S) and calendar time to expiry, against one
//!    reference date for the whole batch
//! 2. **Price**: Black-Scholes with the contract's implied volatility
//! 3. **Compare**: pricing error = market price - theoretical price
//!
//! Contracts that cannot be priced (no implied volatility, bad strike) are
//! reported next to the priced ones instead of failing the batch.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use chain_pricer::prelude::*;
//!
//! let client = YahooClient::new().unwrap();
//! let as_of = as_of_date(chrono::Utc::now());
//! let snapshot = fetch_snapshot(&client, &client, "SPY", as_of, Some(2)).unwrap();
//!
//! let batch = price_snapshot(&snapshot, DEFAULT_RISK_FREE_RATE, false).unwrap();
//! println!("{}", ChainReport::new(&batch));
//! ```
//!
//! ## What This Does NOT Do
//!
//! - Fit or calibrate implied volatility
//! - Model early exercise or dividends
//! - Compute Greeks
//! - Pace or retry market-data requests

pub mod config;
pub mod core;
pub mod data;
pub mod models;
pub mod pipeline;

/// Prelude with commonly used types
pub mod prelude {
    pub use crate::config::PipelineConfig;

    // Core types
    pub use crate::core::{
        BatchPricing, ChainError, ChainResult, ChainSnapshot, EnrichedContract, ExpiryChain,
        OptionContract, OptionType, PricedContract, UnpricedContract,
    };

    // Data fetching
    pub use crate::data::{
        fetch_snapshot, CacheConfig, CachedFetcher, ChainProvider, SnapshotCache, SpotProvider,
        SpotQuote, YahooClient,
    };

    // Models
    pub use crate::models::{
        norm_cdf, norm_pdf, price as bs_price, BlackScholes, HartNormal, NormalCdf, StatrsNormal,
    };

    // Pipeline
    pub use crate::pipeline::{
        as_of_date, enrich, price_all, price_all_parallel, price_all_parallel_with,
        price_all_with, price_snapshot, ChainReport, ReportSummary, DAYS_PER_YEAR,
        DEFAULT_RISK_FREE_RATE,
    };
}

// Re-export main types at crate root
pub use crate::core::{ChainError, ChainResult};
pub use crate::pipeline::{enrich, price_all};
