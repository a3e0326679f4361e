//! Pair histograms over the first channel of a 4-channel pixel buffer.
//!
//! For every pair `(a, b)` taken at byte offsets `(i, i + 4)` with `i`
//! stepping by 8, the predecessor value `a` selects a category. Each category
//! records how many pairs fell into it and how many of those had a successor
//! strictly greater than the predecessor. Boundary values 0 and 255 are never
//! counted.

use serde::Serialize;

/// Channels per pixel group in the buffers handed to [`count_pairs`].
pub const CHANNEL_STRIDE: usize = 4;

/// Distance between the first bytes of two consecutive pairs.
pub const PAIR_STRIDE: usize = 2 * CHANNEL_STRIDE;

/// Number of histogram slots (channel values 0..=254).
pub const CATEGORY_COUNT: usize = 255;

/// Observed-greater and total counts per predecessor value.
///
/// Invariant: `observed_greater[i] <= total_pairs[i]` for every `i`, and slot 0
/// is always empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairHistograms {
    #[serde(with = "category_array")]
    observed_greater: [u64; CATEGORY_COUNT],
    #[serde(with = "category_array")]
    total_pairs: [u64; CATEGORY_COUNT],
}

/// One populated category, as yielded by [`PairHistograms::categories`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryCount {
    pub value: u8,
    pub greater: u64,
    pub total: u64,
}

impl Default for PairHistograms {
    fn default() -> Self {
        Self {
            observed_greater: [0; CATEGORY_COUNT],
            total_pairs: [0; CATEGORY_COUNT],
        }
    }
}

impl PairHistograms {
    /// Build histograms from explicit counts.
    ///
    /// Returns `None` if any category has more greater-successor pairs than
    /// pairs in total, or if the excluded category 0 is populated.
    pub fn from_counts(
        observed_greater: [u64; CATEGORY_COUNT],
        total_pairs: [u64; CATEGORY_COUNT],
    ) -> Option<Self> {
        if total_pairs[0] != 0 || observed_greater[0] != 0 {
            return None;
        }
        let consistent = observed_greater
            .iter()
            .zip(total_pairs.iter())
            .all(|(g, t)| g <= t);
        if !consistent {
            return None;
        }
        Some(Self {
            observed_greater,
            total_pairs,
        })
    }

    /// Pairs per predecessor value whose successor was strictly greater.
    pub fn observed_greater(&self) -> &[u64; CATEGORY_COUNT] {
        &self.observed_greater
    }

    /// Pairs per predecessor value.
    pub fn total_pairs(&self) -> &[u64; CATEGORY_COUNT] {
        &self.total_pairs
    }

    /// Number of categories with at least one pair.
    pub fn degrees_of_freedom(&self) -> usize {
        self.total_pairs.iter().filter(|&&t| t > 0).count()
    }

    /// Total number of counted pairs across all categories.
    pub fn pair_count(&self) -> u64 {
        self.total_pairs.iter().sum()
    }

    /// Populated categories in ascending value order.
    pub fn categories(&self) -> impl Iterator<Item = CategoryCount> + '_ {
        self.total_pairs
            .iter()
            .zip(self.observed_greater.iter())
            .enumerate()
            .skip(1)
            .filter(|(_, (t, _))| **t > 0)
            .map(|(value, (&total, &greater))| CategoryCount {
                value: value as u8,
                greater,
                total,
            })
    }

    fn record(&mut self, a: u8, b: u8) {
        if a == 0 || a == u8::MAX {
            return;
        }
        let slot = a as usize;
        self.total_pairs[slot] += 1;
        if b > a {
            self.observed_greater[slot] += 1;
        }
    }
}

/// Scan `buffer` once and build the pair histograms.
///
/// Reads `buffer[i]` and `buffer[i + 4]` for `i = 0, 8, 16, ...` while
/// `i + 4 < buffer.len()`. Buffers too short to hold a single pair produce
/// empty histograms. The length is expected to be a multiple of
/// [`CHANNEL_STRIDE`]; other lengths are not rejected.
pub fn count_pairs(buffer: &[u8]) -> PairHistograms {
    let mut hist = PairHistograms::default();
    let mut i = 0;
    while i + CHANNEL_STRIDE < buffer.len() {
        hist.record(buffer[i], buffer[i + CHANNEL_STRIDE]);
        i += PAIR_STRIDE;
    }
    hist
}

// serde only derives arrays up to 32 elements.
mod category_array {
    use super::CATEGORY_COUNT;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(
        values: &[u64; CATEGORY_COUNT],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(values.iter())
    }
}
