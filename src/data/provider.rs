//! Market-data provider interfaces
//!
//! The pricing pipeline only consumes a spot price and a chain of raw
//! contracts. Where they come from is behind these two traits.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::{ChainError, ChainResult, ChainSnapshot, ExpiryChain};

/// Spot price quote
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotQuote {
    pub symbol: String,
    pub price: f64,
    pub bid: Option<f64>,
    pub ask: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

/// Supplies the current underlying price
pub trait SpotProvider {
    fn spot(&self, symbol: &str) -> ChainResult<SpotQuote>;
}

/// Supplies raw option contracts grouped by expiry
pub trait ChainProvider {
    /// Available expiration dates, ascending
    fn expirations(&self, symbol: &str) -> ChainResult<Vec<NaiveDate>>;

    fn chain(&self, symbol: &str, expiry: NaiveDate) -> ChainResult<ExpiryChain>;
}

/// Assemble a snapshot from the providers.
///
/// Expiries before `as_of` are skipped. A failing spot or expirations
/// request fails the snapshot; a failing single expiry is logged and left
/// out.
pub fn fetch_snapshot<S, C>(
    spot: &S,
    chains: &C,
    symbol: &str,
    as_of: NaiveDate,
    max_expiries: Option<usize>,
) -> ChainResult<ChainSnapshot>
where
    S: SpotProvider + ?Sized,
    C: ChainProvider + ?Sized,
{
    let quote = spot.spot(symbol)?;
    let mut expiries: Vec<NaiveDate> = chains
        .expirations(symbol)?
        .into_iter()
        .filter(|&e| e >= as_of)
        .collect();
    expiries.sort();
    if let Some(n) = max_expiries {
        expiries.truncate(n);
    }

    info!(
        "Fetching {} expiries for {} (spot {:.2})",
        expiries.len(),
        symbol,
        quote.price
    );

    let mut snapshot = ChainSnapshot::new(symbol, quote.price, as_of);
    for expiry in expiries {
        match chains.chain(symbol, expiry) {
            Ok(chain) => snapshot.add_chain(chain),
            Err(e) => {
                warn!("Failed to get chain for {}: {}", expiry, e);
            }
        }
    }

    Ok(snapshot)
}

/// A saved snapshot can stand in for live providers
impl SpotProvider for ChainSnapshot {
    fn spot(&self, symbol: &str) -> ChainResult<SpotQuote> {
        if symbol != self.underlying {
            return Err(ChainError::upstream(format!(
                "snapshot holds {}, not {}",
                self.underlying, symbol
            )));
        }

        Ok(SpotQuote {
            symbol: symbol.to_string(),
            price: self.spot,
            bid: None,
            ask: None,
            timestamp: self.timestamp,
        })
    }
}

impl ChainProvider for ChainSnapshot {
    fn expirations(&self, symbol: &str) -> ChainResult<Vec<NaiveDate>> {
        if symbol != self.underlying {
            return Err(ChainError::upstream(format!(
                "snapshot holds {}, not {}",
                self.underlying, symbol
            )));
        }
        Ok(self.expiries.iter().map(|c| c.expiry).collect())
    }

    fn chain(&self, symbol: &str, expiry: NaiveDate) -> ChainResult<ExpiryChain> {
        self.expirations(symbol)?;
        self.chain_for_expiry(expiry)
            .cloned()
            .ok_or_else(|| ChainError::upstream(format!("no chain for {} {}", symbol, expiry)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{OptionContract, OptionType};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn source() -> ChainSnapshot {
        let mut snapshot = ChainSnapshot::new("QQQ", 480.0, date(2025, 3, 1));
        for expiry in [date(2025, 2, 28), date(2025, 3, 7), date(2025, 3, 14), date(2025, 3, 21)] {
            let mut chain = ExpiryChain::new(expiry);
            chain.push(OptionContract::new("C480", OptionType::Call, 480.0, expiry).with_implied_vol(0.2));
            snapshot.add_chain(chain);
        }
        snapshot
    }

    /// Chain provider whose single expiry always fails
    struct Flaky {
        inner: ChainSnapshot,
        broken: NaiveDate,
    }

    impl ChainProvider for Flaky {
        fn expirations(&self, symbol: &str) -> ChainResult<Vec<NaiveDate>> {
            self.inner.expirations(symbol)
        }

        fn chain(&self, symbol: &str, expiry: NaiveDate) -> ChainResult<ExpiryChain> {
            if expiry == self.broken {
                return Err(ChainError::upstream("HTTP 500"));
            }
            self.inner.chain(symbol, expiry)
        }
    }

    #[test]
    fn test_fetch_skips_expired_and_limits() {
        let src = source();
        let snapshot = fetch_snapshot(&src, &src, "QQQ", date(2025, 3, 1), Some(2)).unwrap();

        assert_eq!(snapshot.spot, 480.0);
        assert_eq!(snapshot.as_of, date(2025, 3, 1));
        let expiries: Vec<NaiveDate> = snapshot.expiries.iter().map(|c| c.expiry).collect();
        assert_eq!(expiries, vec![date(2025, 3, 7), date(2025, 3, 14)]);
    }

    #[test]
    fn test_failed_expiry_is_skipped() {
        let src = source();
        let flaky = Flaky {
            inner: src.clone(),
            broken: date(2025, 3, 14),
        };
        let snapshot = fetch_snapshot(&src, &flaky, "QQQ", date(2025, 3, 1), None).unwrap();

        assert_eq!(snapshot.expiries.len(), 2);
        assert!(snapshot.chain_for_expiry(date(2025, 3, 14)).is_none());
    }

    #[test]
    fn test_unknown_symbol_is_upstream_error() {
        let src = source();
        let err = fetch_snapshot(&src, &src, "SPY", date(2025, 3, 1), None).unwrap_err();
        assert!(matches!(err, ChainError::UpstreamUnavailable(_)));
    }
}
