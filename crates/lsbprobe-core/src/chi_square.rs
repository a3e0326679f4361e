//! Chi-square estimator over pair histograms.
//!
//! Under the null hypothesis of an untouched image, a successor is as likely
//! to be greater than its predecessor as not, so every populated category
//! expects half of its pairs to be "greater". The per-category deviations are
//! summed, divided by the number of populated categories, and the result is
//! read as a single chi-square(1) statistic:
//!
//! ```text
//! chi2        = sum_i (greater_i - total_i / 2)^2 / (total_i / 2)
//! normalized  = chi2 / df
//! probability = erf(sqrt(normalized / 2))
//! ```
//!
//! A histogram with no populated category yields probability 0.

use serde::Serialize;

use crate::erf::chi_square_cdf_1df;
use crate::pairs::{PairHistograms, count_pairs};

/// Contribution of a single category to the chi-square sum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryTerm {
    pub value: u8,
    pub total: u64,
    pub greater: u64,
    pub expected: f64,
    pub term: f64,
}

/// Output of [`estimate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChiSquareReport {
    /// Raw chi-square sum over populated categories.
    pub chi_squared: f64,
    /// Number of populated categories.
    pub degrees_of_freedom: usize,
    /// `chi_squared / degrees_of_freedom`, 0 when there are no categories.
    pub normalized: f64,
    /// Probability in [0, 1] that the LSBs were randomized.
    pub probability: f64,
    /// Number of pairs the histograms were built from.
    pub pair_count: u64,
}

impl ChiSquareReport {
    fn empty() -> Self {
        Self {
            chi_squared: 0.0,
            degrees_of_freedom: 0,
            normalized: 0.0,
            probability: 0.0,
            pair_count: 0,
        }
    }

    /// Whether the estimate had any data behind it.
    pub fn has_evidence(&self) -> bool {
        self.degrees_of_freedom > 0
    }
}

/// Per-category chi-square terms, ascending by value.
pub fn category_terms(hist: &PairHistograms) -> Vec<CategoryTerm> {
    hist.categories()
        .map(|c| {
            let expected = c.total as f64 / 2.0;
            let diff = c.greater as f64 - expected;
            CategoryTerm {
                value: c.value,
                total: c.total,
                greater: c.greater,
                expected,
                term: diff * diff / expected,
            }
        })
        .collect()
}

/// The `n` categories contributing most to the statistic, largest first.
pub fn top_categories(hist: &PairHistograms, n: usize) -> Vec<CategoryTerm> {
    let mut terms = category_terms(hist);
    terms.sort_by(|a, b| {
        b.term
            .partial_cmp(&a.term)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    terms.truncate(n);
    terms
}

/// Reduce pair histograms to a chi-square report and probability.
pub fn estimate(hist: &PairHistograms) -> ChiSquareReport {
    let mut chi_squared = 0.0;
    let mut degrees_of_freedom = 0usize;
    for c in hist.categories() {
        let expected = c.total as f64 / 2.0;
        let diff = c.greater as f64 - expected;
        chi_squared += diff * diff / expected;
        degrees_of_freedom += 1;
    }

    if degrees_of_freedom == 0 {
        return ChiSquareReport::empty();
    }

    let normalized = chi_squared / degrees_of_freedom as f64;
    ChiSquareReport {
        chi_squared,
        degrees_of_freedom,
        normalized,
        probability: chi_square_cdf_1df(normalized),
        pair_count: hist.pair_count(),
    }
}

/// Probability of LSB tampering for a raw 4-channel buffer.
pub fn lsb_probability(buffer: &[u8]) -> f64 {
    estimate(&count_pairs(buffer)).probability
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pairs::CATEGORY_COUNT;

    fn rgba(values: &[u8]) -> Vec<u8> {
        values.iter().flat_map(|&v| [v, 0, 0, 255]).collect()
    }

    fn single_category(value: usize, greater: u64, total: u64) -> PairHistograms {
        let mut g = [0u64; CATEGORY_COUNT];
        let mut t = [0u64; CATEGORY_COUNT];
        g[value] = greater;
        t[value] = total;
        PairHistograms::from_counts(g, t).unwrap()
    }

    #[test]
    fn test_empty_histogram_is_zero() {
        let report = estimate(&PairHistograms::default());
        assert_eq!(report.probability, 0.0);
        assert_eq!(report.degrees_of_freedom, 0);
        assert!(!report.has_evidence());
    }

    #[test]
    fn test_short_buffers_are_zero() {
        assert_eq!(lsb_probability(&[]), 0.0);
        assert_eq!(lsb_probability(&[1, 2, 3]), 0.0);
        assert_eq!(lsb_probability(&[1, 2, 3, 4]), 0.0);
    }

    #[test]
    fn test_balanced_split_is_zero_statistic() {
        let hist = single_category(120, 50, 100);
        let report = estimate(&hist);
        assert_eq!(report.chi_squared, 0.0);
        assert_eq!(report.probability, 0.0);
    }

    #[test]
    fn test_identical_pixels_single_pair() {
        // One pair (v, v): greater=0, expected=0.5, term=0.5, df=1.
        let report = estimate(&count_pairs(&rgba(&[90, 90])));
        assert!((report.chi_squared - 0.5).abs() < 1e-12);
        assert_eq!(report.degrees_of_freedom, 1);
        assert!((report.probability - statrs::function::erf::erf(0.5)).abs() < 1e-6);
    }

    #[test]
    fn test_known_statistic() {
        // Category 10: 8 of 10 greater -> (8-5)^2/5 = 1.8
        // Category 20: 1 of 4 greater  -> (1-2)^2/2 = 0.5
        let mut g = [0u64; CATEGORY_COUNT];
        let mut t = [0u64; CATEGORY_COUNT];
        g[10] = 8;
        t[10] = 10;
        g[20] = 1;
        t[20] = 4;
        let hist = PairHistograms::from_counts(g, t).unwrap();
        let report = estimate(&hist);
        assert!((report.chi_squared - 2.3).abs() < 1e-12);
        assert_eq!(report.degrees_of_freedom, 2);
        assert!((report.normalized - 1.15).abs() < 1e-12);
        assert_eq!(report.pair_count, 14);
        let expected = statrs::function::erf::erf((1.15f64 / 2.0).sqrt());
        assert!((report.probability - expected).abs() < 2e-7);
    }

    #[test]
    fn test_monotone_in_deviation() {
        let total = 200;
        let mut prev = -1.0;
        for greater in (100..=200).step_by(5) {
            let p = estimate(&single_category(64, greater, total)).probability;
            assert!(p >= prev, "greater={greater}: {p} < {prev}");
            prev = p;
        }
        let mut prev = -1.0;
        for greater in (0..=100).rev().step_by(5) {
            let p = estimate(&single_category(64, greater, total)).probability;
            assert!(p >= prev, "greater={greater}: {p} < {prev}");
            prev = p;
        }
    }

    #[test]
    fn test_probability_bounded() {
        for greater in 0..=40 {
            let p = estimate(&single_category(3, greater, 40)).probability;
            assert!((0.0..=1.0).contains(&p));
        }
    }

    #[test]
    fn test_category_terms_sum_to_statistic() {
        let values: Vec<u8> = (0..4000u32).map(|i| ((i * 7919) % 251) as u8).collect();
        let hist = count_pairs(&rgba(&values));
        let report = estimate(&hist);
        let sum: f64 = category_terms(&hist).iter().map(|t| t.term).sum();
        assert!((sum - report.chi_squared).abs() < 1e-9);
        assert_eq!(category_terms(&hist).len(), report.degrees_of_freedom);
    }

    #[test]
    fn test_top_categories_ordering() {
        let mut g = [0u64; CATEGORY_COUNT];
        let mut t = [0u64; CATEGORY_COUNT];
        t[5] = 10;
        g[5] = 5;
        t[6] = 10;
        g[6] = 10;
        t[7] = 10;
        g[7] = 7;
        let hist = PairHistograms::from_counts(g, t).unwrap();
        let top = top_categories(&hist, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].value, 6);
        assert_eq!(top[1].value, 7);
    }
}
