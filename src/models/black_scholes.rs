//! Black-Scholes Model
//!
//! Closed-form European option pricing with no dividend yield.
//!
//! Expired (T <= 0) and zero-volatility contracts are worth their intrinsic
//! value only; those cases short-circuit before any transcendental math.

use crate::core::{ChainError, ChainResult, OptionType};

use super::normal::{NormalCdf, StatrsNormal};

/// Black-Scholes d1 parameter
pub fn d1(spot: f64, strike: f64, time: f64, rate: f64, vol: f64) -> f64 {
    ((spot / strike).ln() + (rate + 0.5 * vol * vol) * time) / (vol * time.sqrt())
}

/// Black-Scholes d2 parameter
pub fn d2(spot: f64, strike: f64, time: f64, rate: f64, vol: f64) -> f64 {
    d1(spot, strike, time, rate, vol) - vol * time.sqrt()
}

/// Black-Scholes pricer, generic over the normal CDF approximation
#[derive(Debug, Clone, Copy, Default)]
pub struct BlackScholes<C = StatrsNormal> {
    cdf: C,
}

impl<C: NormalCdf> BlackScholes<C> {
    pub fn with_cdf(cdf: C) -> Self {
        Self { cdf }
    }

    pub fn cdf(&self) -> &C {
        &self.cdf
    }

    /// European option price
    ///
    /// Fails with `InvalidInput` unless spot and strike are finite and
    /// strictly positive and time, rate and vol are finite.
    pub fn price(
        &self,
        spot: f64,
        strike: f64,
        time: f64,
        rate: f64,
        vol: f64,
        option_type: OptionType,
    ) -> ChainResult<f64> {
        validate(spot, strike, time, rate, vol)?;

        if time <= 0.0 || vol <= 0.0 {
            return Ok(option_type.intrinsic(spot, strike));
        }

        let sqrt_t = time.sqrt();
        let d1 = d1(spot, strike, time, rate, vol);
        let d2 = d1 - vol * sqrt_t;
        let df = (-rate * time).exp();
        let n = |x: f64| self.cdf.cdf(x);

        let value = match option_type {
            OptionType::Call => spot * n(d1) - strike * df * n(d2),
            OptionType::Put => strike * df * n(-d2) - spot * n(-d1),
        };

        // Deep OTM values can round a hair below zero
        Ok(value.max(0.0))
    }
}

fn validate(spot: f64, strike: f64, time: f64, rate: f64, vol: f64) -> ChainResult<()> {
    if !(spot.is_finite() && spot > 0.0) {
        return Err(ChainError::invalid_input(format!(
            "spot must be positive, got {}",
            spot
        )));
    }
    if !(strike.is_finite() && strike > 0.0) {
        return Err(ChainError::invalid_input(format!(
            "strike must be positive, got {}",
            strike
        )));
    }
    if !time.is_finite() || !rate.is_finite() || !vol.is_finite() {
        return Err(ChainError::invalid_input(format!(
            "non-finite parameter (time={}, rate={}, vol={})",
            time, rate, vol
        )));
    }
    Ok(())
}

/// Black-Scholes European option price using the default CDF
pub fn price(
    spot: f64,
    strike: f64,
    time: f64,
    rate: f64,
    vol: f64,
    option_type: OptionType,
) -> ChainResult<f64> {
    BlackScholes::<StatrsNormal>::default().price(spot, strike, time, rate, vol, option_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::normal::HartNormal;

    const RATE: f64 = 0.045;

    fn call(spot: f64, strike: f64, time: f64, vol: f64) -> f64 {
        price(spot, strike, time, RATE, vol, OptionType::Call).unwrap()
    }

    fn put(spot: f64, strike: f64, time: f64, vol: f64) -> f64 {
        price(spot, strike, time, RATE, vol, OptionType::Put).unwrap()
    }

    #[test]
    fn test_bs_price() {
        // ATM call, 20% vol, 1 year, 5% rate: textbook 10.4506
        let call_price = price(100.0, 100.0, 1.0, 0.05, 0.20, OptionType::Call).unwrap();
        assert!((call_price - 10.4506).abs() < 1e-3);

        let put_price = price(100.0, 100.0, 1.0, 0.05, 0.20, OptionType::Put).unwrap();
        assert!((put_price - 5.5735).abs() < 1e-3);
    }

    #[test]
    fn test_golden_atm_30d() {
        let time = 30.0 / 365.0;

        let d1 = d1(150.0, 150.0, time, RATE, 0.25);
        let d2 = d2(150.0, 150.0, time, RATE, 0.25);
        assert!((d1 - 0.087441).abs() < 1e-5);
        assert!((d2 - 0.015768).abs() < 1e-5);

        let value = call(150.0, 150.0, time, 0.25);
        assert!((value - 4.5627).abs() < 1e-3, "got {}", value);
    }

    #[test]
    fn test_expired_is_intrinsic() {
        for time in [0.0, -1.0 / 365.0, -2.5] {
            assert_eq!(call(110.0, 100.0, time, 0.3), 10.0);
            assert_eq!(call(90.0, 100.0, time, 0.3), 0.0);
            assert_eq!(put(90.0, 100.0, time, 0.3), 10.0);
            assert_eq!(put(110.0, 100.0, time, 0.3), 0.0);
        }
    }

    #[test]
    fn test_zero_vol_is_intrinsic() {
        for vol in [0.0, -0.2] {
            for time in [0.0, 0.5, 3.0] {
                assert_eq!(call(123.5, 100.0, time, vol), 23.5);
                assert_eq!(put(123.5, 100.0, time, vol), 0.0);
                assert_eq!(put(80.25, 100.0, time, vol), 19.75);
            }
        }
    }

    #[test]
    fn test_put_call_parity() {
        for &spot in &[50.0, 95.0, 100.0, 140.0] {
            for &time in &[0.01, 0.25, 2.0] {
                for &vol in &[0.05, 0.25, 0.9] {
                    let lhs = call(spot, 100.0, time, vol) - put(spot, 100.0, time, vol);
                    let rhs = spot - 100.0 * (-RATE * time).exp();
                    let scale = rhs.abs().max(1.0);
                    assert!(
                        (lhs - rhs).abs() / scale < 1e-6,
                        "S={} T={} vol={}: {} vs {}",
                        spot, time, vol, lhs, rhs
                    );
                }
            }
        }
    }

    #[test]
    fn test_monotone_in_spot() {
        let mut prev_call = 0.0;
        let mut prev_put = f64::INFINITY;

        for i in 1..=400 {
            let spot = i as f64 * 0.5;
            let c = call(spot, 100.0, 0.5, 0.3);
            let p = put(spot, 100.0, 0.5, 0.3);
            assert!(c >= prev_call, "call decreased at S={}", spot);
            assert!(p <= prev_put, "put increased at S={}", spot);
            prev_call = c;
            prev_put = p;
        }
    }

    #[test]
    fn test_monotone_in_vol() {
        let mut prev_call = 0.0;
        let mut prev_put = 0.0;

        for i in 1..=300 {
            let vol = i as f64 * 0.01;
            let c = call(105.0, 100.0, 0.25, vol);
            let p = put(105.0, 100.0, 0.25, vol);
            assert!(c >= prev_call, "call decreased at vol={}", vol);
            assert!(p >= prev_put, "put decreased at vol={}", vol);
            prev_call = c;
            prev_put = p;
        }
    }

    #[test]
    fn test_invalid_spot_and_strike() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = price(bad, 100.0, 0.5, RATE, 0.2, OptionType::Call).unwrap_err();
            assert!(matches!(err, ChainError::InvalidInput(_)));

            let err = price(100.0, bad, 0.5, RATE, 0.2, OptionType::Put).unwrap_err();
            assert!(matches!(err, ChainError::InvalidInput(_)));
        }

        // Validation runs before the intrinsic short-circuit
        assert!(price(-5.0, 100.0, -1.0, RATE, 0.0, OptionType::Call).is_err());
        assert!(price(100.0, 100.0, f64::NAN, RATE, 0.2, OptionType::Call).is_err());
    }

    #[test]
    fn test_never_negative() {
        let p = put(1000.0, 10.0, 0.05, 0.1);
        let c = call(10.0, 1000.0, 0.05, 0.1);
        assert!(p >= 0.0 && p < 1e-12);
        assert!(c >= 0.0 && c < 1e-12);
    }

    #[test]
    fn test_swappable_cdf() {
        let exact = BlackScholes::<StatrsNormal>::default();
        let hart = BlackScholes::with_cdf(HartNormal);

        let a = exact.price(150.0, 155.0, 0.2, RATE, 0.3, OptionType::Call).unwrap();
        let b = hart.price(150.0, 155.0, 0.2, RATE, 0.3, OptionType::Call).unwrap();
        assert!((a - b).abs() < 1e-4);
    }
}
