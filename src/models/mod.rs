//! Pricing Models
//!
//! Implements:
//! - Black-Scholes closed form (European, no dividends)
//! - Standard normal CDF strategies used by the pricer

pub mod black_scholes;
pub mod normal;

pub use black_scholes::*;
pub use normal::*;
