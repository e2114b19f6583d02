//! Text report over a priced batch

use std::fmt;

use serde::Serialize;

use crate::core::{BatchPricing, PricedContract};

/// Largest mispricing in one direction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Extreme {
    pub symbol: String,
    pub pricing_error: f64,
}

/// Aggregate statistics for a batch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    pub priced: usize,
    pub unpriced: usize,
    /// Priced contracts that also had a market price
    pub with_market_price: usize,
    pub mean_error: Option<f64>,
    pub mean_abs_error: Option<f64>,
    /// Market furthest above model
    pub most_overpriced: Option<Extreme>,
    /// Market furthest below model
    pub most_underpriced: Option<Extreme>,
}

impl ReportSummary {
    pub fn from_batch(batch: &BatchPricing) -> Self {
        let errors: Vec<(&PricedContract, f64)> = batch
            .priced
            .iter()
            .filter_map(|p| p.pricing_error.map(|e| (p, e)))
            .collect();

        let n = errors.len();
        let (mean_error, mean_abs_error) = if n == 0 {
            (None, None)
        } else {
            let sum: f64 = errors.iter().map(|(_, e)| e).sum();
            let abs_sum: f64 = errors.iter().map(|(_, e)| e.abs()).sum();
            (Some(sum / n as f64), Some(abs_sum / n as f64))
        };

        let extreme = |(p, e): &(&PricedContract, f64)| Extreme {
            symbol: p.contract().symbol.clone(),
            pricing_error: *e,
        };

        Self {
            priced: batch.priced.len(),
            unpriced: batch.unpriced.len(),
            with_market_price: n,
            mean_error,
            mean_abs_error,
            most_overpriced: errors
                .iter()
                .filter(|(_, e)| *e > 0.0)
                .max_by(|a, b| a.1.total_cmp(&b.1))
                .map(extreme),
            most_underpriced: errors
                .iter()
                .filter(|(_, e)| *e < 0.0)
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map(extreme),
        }
    }
}

/// Tabular report: one row per priced contract, then unpriced contracts
pub struct ChainReport<'a> {
    batch: &'a BatchPricing,
    summary: ReportSummary,
}

impl<'a> ChainReport<'a> {
    pub fn new(batch: &'a BatchPricing) -> Self {
        Self {
            batch,
            summary: ReportSummary::from_batch(batch),
        }
    }

    pub fn summary(&self) -> &ReportSummary {
        &self.summary
    }
}

fn opt(value: Option<f64>, width: usize, precision: usize) -> String {
    match value {
        Some(v) => format!("{:>width$.precision$}", v, width = width, precision = precision),
        None => format!("{:>width$}", "-", width = width),
    }
}

impl fmt::Display for ChainReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<22} {:<4} {:>9} {:>10} {:>5} {:>7} {:>9} {:>9} {:>9}",
            "SYMBOL", "KIND", "STRIKE", "EXPIRY", "DTE", "K/S", "MARKET", "THEO", "ERROR"
        )?;
        writeln!(f, "{}", "-".repeat(93))?;

        for p in &self.batch.priced {
            let c = p.contract();
            writeln!(
                f,
                "{:<22} {:<4} {:>9.2} {:>10} {:>5} {:>7.4} {} {:>9.4} {}",
                c.symbol,
                c.kind,
                c.strike,
                c.expiry,
                p.enriched.days_to_expiry,
                p.enriched.moneyness,
                opt(c.market_price, 9, 4),
                p.theoretical_price,
                opt(p.pricing_error, 9, 4),
            )?;
        }

        if !self.batch.unpriced.is_empty() {
            writeln!(f)?;
            writeln!(f, "Unpriced contracts:")?;
            for u in &self.batch.unpriced {
                writeln!(
                    f,
                    "  #{:<5} {:<22} {:<14} {}",
                    u.index,
                    u.enriched.contract.symbol,
                    u.error.kind(),
                    u.error
                )?;
            }
        }

        let s = &self.summary;
        writeln!(f)?;
        writeln!(
            f,
            "Priced: {}  Unpriced: {}  With market price: {}",
            s.priced, s.unpriced, s.with_market_price
        )?;
        writeln!(
            f,
            "Mean error: {}  Mean |error|: {}",
            opt(s.mean_error, 0, 4),
            opt(s.mean_abs_error, 0, 4)
        )?;
        if let Some(e) = &s.most_overpriced {
            writeln!(f, "Most overpriced:  {} ({:+.4})", e.symbol, e.pricing_error)?;
        }
        if let Some(e) = &s.most_underpriced {
            writeln!(f, "Most underpriced: {} ({:+.4})", e.symbol, e.pricing_error)?;
        }

        Ok(())
    }
}
