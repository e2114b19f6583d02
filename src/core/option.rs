//! Option contract definitions
//!
//! The raw contract record as it arrives from a market-data source.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Option type (Call or Put)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// Payoff direction: +1 for call, -1 for put
    pub fn phi(&self) -> f64 {
        match self {
            OptionType::Call => 1.0,
            OptionType::Put => -1.0,
        }
    }

    /// Intrinsic value at given spot
    pub fn intrinsic(&self, spot: f64, strike: f64) -> f64 {
        match self {
            OptionType::Call => (spot - strike).max(0.0),
            OptionType::Put => (strike - spot).max(0.0),
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            OptionType::Call => "CALL",
            OptionType::Put => "PUT",
        })
    }
}

/// Raw option contract with its last market observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionContract {
    /// Contract symbol (exchange-specific, opaque)
    pub symbol: String,
    /// Option type (Call/Put)
    pub kind: OptionType,
    /// Strike price
    pub strike: f64,
    /// Expiration date
    pub expiry: NaiveDate,
    /// Last traded price, if any
    pub market_price: Option<f64>,
    /// Annualized implied volatility, if provided
    pub implied_vol: Option<f64>,
}

impl OptionContract {
    pub fn new(
        symbol: impl Into<String>,
        kind: OptionType,
        strike: f64,
        expiry: NaiveDate,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            kind,
            strike,
            expiry,
            market_price: None,
            implied_vol: None,
        }
    }

    pub fn with_market_price(mut self, price: f64) -> Self {
        self.market_price = Some(price);
        self
    }

    pub fn with_implied_vol(mut self, vol: f64) -> Self {
        self.implied_vol = Some(vol);
        self
    }

    /// Calendar days from `as_of` to expiry (negative once expired)
    pub fn days_to_expiry(&self, as_of: NaiveDate) -> i64 {
        (self.expiry - as_of).num_days()
    }

    /// Is this option in the money?
    pub fn is_itm(&self, spot: f64) -> bool {
        match self.kind {
            OptionType::Call => spot > self.strike,
            OptionType::Put => spot < self.strike,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_type() {
        assert_eq!(OptionType::Call.phi(), 1.0);
        assert_eq!(OptionType::Put.phi(), -1.0);

        assert_eq!(OptionType::Call.intrinsic(110.0, 100.0), 10.0);
        assert_eq!(OptionType::Put.intrinsic(90.0, 100.0), 10.0);
        assert_eq!(OptionType::Call.intrinsic(90.0, 100.0), 0.0);
        assert_eq!(OptionType::Put.intrinsic(110.0, 100.0), 0.0);

        assert_eq!(OptionType::Call.to_string(), "CALL");
    }

    #[test]
    fn test_days_to_expiry() {
        let expiry = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
        let opt = OptionContract::new("SPY250331C00500000", OptionType::Call, 500.0, expiry);

        assert_eq!(opt.days_to_expiry(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()), 30);
        assert_eq!(opt.days_to_expiry(expiry), 0);
        assert_eq!(opt.days_to_expiry(NaiveDate::from_ymd_opt(2025, 4, 2).unwrap()), -2);
    }

    #[test]
    fn test_itm() {
        let expiry = NaiveDate::from_ymd_opt(2025, 6, 20).unwrap();
        let call = OptionContract::new("C", OptionType::Call, 500.0, expiry);
        let put = OptionContract::new("P", OptionType::Put, 500.0, expiry);

        assert!(call.is_itm(510.0));
        assert!(!call.is_itm(490.0));
        assert!(put.is_itm(490.0));
    }
}
