//! Batch pricing driver
//!
//! Prices every enriched contract against one spot price and rate. A
//! contract that cannot be priced lands in `BatchPricing::unpriced` with its
//! error; the rest of the batch is unaffected.

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::core::{
    BatchPricing, ChainError, ChainResult, EnrichedContract, PricedContract, UnpricedContract,
};
use crate::models::{BlackScholes, NormalCdf, StatrsNormal};

/// Risk-free rate used when the caller does not supply one
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.045;

/// Price a batch sequentially with the default CDF
pub fn price_all(
    records: &[EnrichedContract],
    spot: f64,
    risk_free_rate: f64,
) -> ChainResult<BatchPricing> {
    price_all_with(&BlackScholes::<StatrsNormal>::default(), records, spot, risk_free_rate)
}

/// Price a batch on the rayon pool with the default CDF
pub fn price_all_parallel(
    records: &[EnrichedContract],
    spot: f64,
    risk_free_rate: f64,
) -> ChainResult<BatchPricing> {
    price_all_parallel_with(&BlackScholes::<StatrsNormal>::default(), records, spot, risk_free_rate)
}

pub fn price_all_with<C: NormalCdf>(
    pricer: &BlackScholes<C>,
    records: &[EnrichedContract],
    spot: f64,
    risk_free_rate: f64,
) -> ChainResult<BatchPricing> {
    validate_batch(spot, risk_free_rate)?;

    let results = records
        .iter()
        .enumerate()
        .map(|(index, record)| price_record(pricer, index, record, spot, risk_free_rate));

    Ok(collect(results))
}

/// Same output as `price_all_with`, order included
pub fn price_all_parallel_with<C: NormalCdf + Sync>(
    pricer: &BlackScholes<C>,
    records: &[EnrichedContract],
    spot: f64,
    risk_free_rate: f64,
) -> ChainResult<BatchPricing> {
    validate_batch(spot, risk_free_rate)?;

    let results: Vec<Result<PricedContract, UnpricedContract>> = records
        .par_iter()
        .enumerate()
        .map(|(index, record)| price_record(pricer, index, record, spot, risk_free_rate))
        .collect();

    Ok(collect(results))
}

fn validate_batch(spot: f64, risk_free_rate: f64) -> ChainResult<()> {
    if !(spot.is_finite() && spot > 0.0) {
        return Err(ChainError::invalid_input(format!(
            "spot must be positive, got {}",
            spot
        )));
    }
    if !risk_free_rate.is_finite() {
        return Err(ChainError::invalid_input(format!(
            "risk-free rate must be finite, got {}",
            risk_free_rate
        )));
    }
    Ok(())
}

fn price_record<C: NormalCdf>(
    pricer: &BlackScholes<C>,
    index: usize,
    record: &EnrichedContract,
    spot: f64,
    rate: f64,
) -> Result<PricedContract, UnpricedContract> {
    let contract = &record.contract;

    let unpriced = |error: ChainError| UnpricedContract {
        index,
        enriched: record.clone(),
        error,
    };

    let vol = match contract.implied_vol.filter(|v| v.is_finite()) {
        Some(vol) => vol,
        None => {
            return Err(unpriced(ChainError::missing_input(format!(
                "no implied volatility for {}",
                contract.symbol
            ))))
        }
    };

    let theoretical = pricer
        .price(spot, contract.strike, record.time_to_expiry, rate, vol, contract.kind)
        .map_err(unpriced)?;

    Ok(PricedContract {
        enriched: record.clone(),
        theoretical_price: theoretical,
        pricing_error: contract.market_price.map(|market| market - theoretical),
    })
}

fn collect<I>(results: I) -> BatchPricing
where
    I: IntoIterator<Item = Result<PricedContract, UnpricedContract>>,
{
    let mut batch = BatchPricing::default();

    for result in results {
        match result {
            Ok(priced) => batch.priced.push(priced),
            Err(unpriced) => {
                warn!(
                    "Skipping {} (#{}): {}",
                    unpriced.enriched.contract.symbol, unpriced.index, unpriced.error
                );
                batch.unpriced.push(unpriced);
            }
        }
    }

    debug!(
        "Priced {} of {} contracts ({} unpriced)",
        batch.priced.len(),
        batch.len(),
        batch.unpriced.len()
    );

    batch
}
