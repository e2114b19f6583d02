//! Pricing pipeline
//!
//! raw contracts → `enrich` → enriched contracts → `price_all` → priced
//! contracts, plus a text report over the result.

pub mod enrich;
pub mod batch;
pub mod report;

pub use enrich::*;
pub use batch::*;
pub use report::*;

use tracing::info;

use crate::core::{BatchPricing, ChainResult, ChainSnapshot};

/// Run enrichment and batch pricing over a whole snapshot.
///
/// Uses the snapshot's own spot and `as_of`, so re-running a saved snapshot
/// reproduces the original output.
pub fn price_snapshot(
    snapshot: &ChainSnapshot,
    risk_free_rate: f64,
    parallel: bool,
) -> ChainResult<BatchPricing> {
    let contracts = snapshot.contracts();
    info!(
        "Pricing {} contracts for {} (spot {:.2}, as of {})",
        contracts.len(),
        snapshot.underlying,
        snapshot.spot,
        snapshot.as_of
    );

    let enriched = enrich(&contracts, snapshot.spot, snapshot.as_of)?;

    if parallel {
        price_all_parallel(&enriched, snapshot.spot, risk_free_rate)
    } else {
        price_all(&enriched, snapshot.spot, risk_free_rate)
    }
}
