//! Error function and the one-degree-of-freedom chi-square CDF.
//!
//! `erf` uses the fixed-coefficient rational/exponential approximation of
//! Abramowitz & Stegun formula 7.1.26 (max absolute error ~1.5e-7).

const A1: f64 = 0.254829592;
const A2: f64 = -0.284496736;
const A3: f64 = 1.421413741;
const A4: f64 = -1.453152027;
const A5: f64 = 1.061405429;
const P: f64 = 0.3275911;

/// Maximum absolute error of the approximation.
pub const ERF_MAX_ERROR: f64 = 1.5e-7;

/// Error function, A&S 7.1.26.
///
/// Odd in `x`, exactly 0 at the origin, and saturates to 1 (within
/// [`ERF_MAX_ERROR`]) for large positive arguments.
pub fn erf(x: f64) -> f64 {
    if x == 0.0 {
        return 0.0;
    }
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();

    let t = 1.0 / (1.0 + P * x);
    let poly = ((((A5 * t + A4) * t + A3) * t + A2) * t + A1) * t;
    let y = 1.0 - poly * (-x * x).exp();

    sign * y
}

/// CDF of a chi-square variable with one degree of freedom.
///
/// `P(X <= x) = erf(sqrt(x / 2))`; non-positive statistics map to 0.
pub fn chi_square_cdf_1df(x: f64) -> f64 {
    if x.is_nan() || x <= 0.0 {
        return 0.0;
    }
    erf((x / 2.0).sqrt()).clamp(0.0, 1.0)
}
