//! Contract enrichment
//!
//! Annotates raw contracts with moneyness and time to expiry relative to a
//! single reference date shared by the whole batch.

use chrono::{DateTime, NaiveDate, Utc};

use crate::core::{ChainError, ChainResult, EnrichedContract, OptionContract};

/// Calendar days per year used for time to expiry
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Truncate a clock reading to the reference date used for enrichment
pub fn as_of_date(now: DateTime<Utc>) -> NaiveDate {
    now.date_naive()
}

/// Enrich a batch of contracts against one spot price and reference date.
///
/// Expired contracts are kept, with negative `days_to_expiry`. Strikes are
/// not checked here: a non-positive strike yields a non-positive moneyness
/// and is rejected per record by the batch driver.
pub fn enrich(
    records: &[OptionContract],
    underlying_price: f64,
    as_of: NaiveDate,
) -> ChainResult<Vec<EnrichedContract>> {
    if !(underlying_price.is_finite() && underlying_price > 0.0) {
        return Err(ChainError::invalid_input(format!(
            "underlying price must be positive, got {}",
            underlying_price
        )));
    }

    Ok(records
        .iter()
        .map(|contract| enrich_one(contract, underlying_price, as_of))
        .collect())
}

fn enrich_one(contract: &OptionContract, underlying_price: f64, as_of: NaiveDate) -> EnrichedContract {
    let days = contract.days_to_expiry(as_of);

    EnrichedContract {
        contract: contract.clone(),
        moneyness: contract.strike / underlying_price,
        days_to_expiry: days,
        time_to_expiry: days as f64 / DAYS_PER_YEAR,
    }
}
