//! Example: price a small hand-built chain offline
//!
//! Run with: cargo run --example basic_pricing

use chain_pricer::prelude::*;
use chrono::NaiveDate;

fn main() -> ChainResult<()> {
    let as_of = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
    let expiry = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
    let spot = 150.0;
    let rate = DEFAULT_RISK_FREE_RATE;

    println!("=== Black-Scholes Pricing ===\n");
    let call = bs_price(spot, 150.0, 30.0 / 365.0, rate, 0.25, OptionType::Call)?;
    let put = bs_price(spot, 150.0, 30.0 / 365.0, rate, 0.25, OptionType::Put)?;
    println!("ATM call: {:.4}", call);
    println!("ATM put:  {:.4}", put);

    // Put-call parity: C - P = S - K*e^(-rT)
    let rhs = spot - 150.0 * (-rate * 30.0 / 365.0).exp();
    println!("Parity gap: {:.2e}\n", (call - put - rhs).abs());

    println!("=== Chain ===\n");
    let chain = vec![
        OptionContract::new("XYZ250331C00145000", OptionType::Call, 145.0, expiry)
            .with_market_price(8.10)
            .with_implied_vol(0.27),
        OptionContract::new("XYZ250331C00150000", OptionType::Call, 150.0, expiry)
            .with_market_price(4.95)
            .with_implied_vol(0.25),
        OptionContract::new("XYZ250331C00155000", OptionType::Call, 155.0, expiry)
            .with_market_price(2.60),
        OptionContract::new("XYZ250331P00145000", OptionType::Put, 145.0, expiry)
            .with_market_price(2.30)
            .with_implied_vol(0.29),
        OptionContract::new("XYZ250228P00155000", OptionType::Put, 155.0, as_of.pred_opt().unwrap())
            .with_market_price(5.00)
            .with_implied_vol(0.30),
    ];

    let enriched = enrich(&chain, spot, as_of)?;
    let batch = price_all(&enriched, spot, rate)?;
    print!("{}", ChainReport::new(&batch));

    Ok(())
}
