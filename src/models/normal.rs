//! Standard normal distribution
//!
//! The pricer only needs Φ, so the CDF is a small trait and the
//! approximation can be swapped without touching pricing code.

use std::f64::consts::{FRAC_1_SQRT_2, PI};

use statrs::function::erf::erfc;

/// Standard normal cumulative distribution function Φ
pub trait NormalCdf {
    fn cdf(&self, x: f64) -> f64;
}

/// Φ via the complementary error function from `statrs`.
///
/// Accurate to double precision; used by default.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatrsNormal;

impl NormalCdf for StatrsNormal {
    fn cdf(&self, x: f64) -> f64 {
        // erfc keeps precision in the left tail where 1 + erf would cancel
        0.5 * erfc(-x * FRAC_1_SQRT_2)
    }
}

/// Φ via Hart's 1968 double-precision rational approximation
/// (algorithm 5666, as laid out by West 2005).
///
/// Relative error below 1e-8 in both tails for |x| <= 10. Cheaper than
/// `StatrsNormal`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HartNormal;

impl HartNormal {
    const NUM: [f64; 7] = [
        3.52624965998911e-2,
        0.700383064443688,
        6.37396220353165,
        33.912866078383,
        112.079291497871,
        221.213596169931,
        220.206867912376,
    ];
    const DEN: [f64; 8] = [
        8.83883476483184e-2,
        1.75566716318264,
        16.064177579207,
        86.7807322029461,
        296.564248779674,
        637.333633378831,
        793.826512519948,
        440.413735824752,
    ];
    /// Switch from the rational form to the continued fraction
    const SPLIT: f64 = 7.07106781186547;

    fn horner(coeffs: &[f64], x: f64) -> f64 {
        coeffs.iter().fold(0.0, |acc, &c| acc * x + c)
    }

    /// Lower tail Φ(-|x|)
    fn lower_tail(ax: f64) -> f64 {
        if ax > 37.0 {
            return 0.0;
        }

        let gauss = (-0.5 * ax * ax).exp();
        if ax < Self::SPLIT {
            gauss * Self::horner(&Self::NUM, ax) / Self::horner(&Self::DEN, ax)
        } else {
            let mut cf = ax + 0.65;
            for k in [4.0, 3.0, 2.0, 1.0] {
                cf = ax + k / cf;
            }
            gauss / cf / (2.0 * PI).sqrt()
        }
    }
}

impl NormalCdf for HartNormal {
    fn cdf(&self, x: f64) -> f64 {
        if x.is_nan() {
            return f64::NAN;
        }

        let lower = Self::lower_tail(x.abs());
        if x > 0.0 {
            1.0 - lower
        } else {
            lower
        }
    }
}

/// Standard normal CDF (default strategy)
pub fn norm_cdf(x: f64) -> f64 {
    StatrsNormal.cdf(x)
}

/// Standard normal PDF
pub fn norm_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}
