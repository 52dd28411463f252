//! Market distribution summarization
//!
//! Reduces a vector of simulated prices to location/spread statistics and a
//! fixed-bin histogram.

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

use crate::error::{AqariyError, Result};

/// Number of equal-width histogram bins
pub const HIST_BINS: usize = 10;

/// Fixed-bin histogram: `counts` has [`HIST_BINS`] entries, `edges` one more.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Histogram {
    pub counts: Vec<u64>,
    pub edges: Vec<f64>,
}

/// Location and spread statistics of a simulated market distribution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub q1: f64,
    pub q3: f64,
    pub hist: Histogram,
}

/// Summarize a non-empty price vector.
pub fn summarize(prices: ArrayView1<'_, f64>) -> Result<MarketSummary> {
    if prices.is_empty() {
        return Err(AqariyError::DataError(
            "cannot summarize an empty price distribution".to_string(),
        ));
    }

    let mut sorted: Vec<f64> = prices.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let min = sorted[0];
    let max = sorted[sorted.len() - 1];
    let mean = sorted.iter().sum::<f64>() / sorted.len() as f64;

    Ok(MarketSummary {
        min,
        max,
        mean,
        median: percentile(&sorted, 50.0),
        q1: percentile(&sorted, 25.0),
        q3: percentile(&sorted, 75.0),
        hist: histogram(&sorted, min, max),
    })
}

/// Linear-interpolated percentile over an ascending-sorted slice.
fn percentile(sorted: &[f64], pct: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    if sorted.len() == 1 {
        return sorted[0];
    }
    let rank = pct / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let frac = rank - lower as f64;
    sorted[lower] + frac * (sorted[upper] - sorted[lower])
}

/// Equal-width histogram over [min, max], max-inclusive in the last bin.
///
/// A zero-width range expands to [v - 0.5, v + 0.5] so the edges stay
/// strictly increasing and every sample lands in one bin.
fn histogram(sorted: &[f64], min: f64, max: f64) -> Histogram {
    let (lo, hi) = if max > min {
        (min, max)
    } else {
        (min - 0.5, max + 0.5)
    };
    let width = (hi - lo) / HIST_BINS as f64;

    let edges: Vec<f64> = (0..=HIST_BINS)
        .map(|i| lo + i as f64 * (hi - lo) / HIST_BINS as f64)
        .collect();

    let mut counts = vec![0u64; HIST_BINS];
    for &price in sorted {
        let bin = (((price - lo) / width) as usize).min(HIST_BINS - 1);
        counts[bin] += 1;
    }

    Histogram { counts, edges }
}

/// Round to 2 decimal places, the precision of every numeric response field.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array1;

    fn summary_of(values: &[f64]) -> MarketSummary {
        summarize(Array1::from_vec(values.to_vec()).view()).unwrap()
    }

    #[test]
    fn test_basic_statistics() {
        let s = summary_of(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(s.min, 1.0);
        assert_eq!(s.max, 5.0);
        assert_eq!(s.mean, 3.0);
        assert_eq!(s.median, 3.0);
        assert_eq!(s.q1, 2.0);
        assert_eq!(s.q3, 4.0);
    }

    #[test]
    fn test_percentile_interpolation() {
        // rank = 0.25 * 3 = 0.75 -> 1 + 0.75 * (2 - 1)
        let s = summary_of(&[1.0, 2.0, 3.0, 4.0]);
        assert!((s.q1 - 1.75).abs() < 1e-12);
        assert!((s.median - 2.5).abs() < 1e-12);
        assert!((s.q3 - 3.25).abs() < 1e-12);
    }

    #[test]
    fn test_histogram_conserves_counts() {
        let values: Vec<f64> = (0..4320).map(|i| (i % 97) as f64).collect();
        let s = summary_of(&values);
        assert_eq!(s.hist.counts.len(), HIST_BINS);
        assert_eq!(s.hist.edges.len(), HIST_BINS + 1);
        assert_eq!(s.hist.counts.iter().sum::<u64>(), 4320);
    }

    #[test]
    fn test_histogram_max_lands_in_last_bin() {
        let s = summary_of(&[0.0, 1.0, 2.0, 10.0]);
        assert_eq!(*s.hist.counts.last().unwrap(), 1);
    }

    #[test]
    fn test_degenerate_distribution() {
        let s = summary_of(&[42.0; 16]);
        assert_eq!(s.min, 42.0);
        assert_eq!(s.max, 42.0);
        assert_eq!(s.mean, 42.0);
        assert_eq!(s.median, 42.0);
        assert_eq!(s.q1, 42.0);
        assert_eq!(s.q3, 42.0);

        // Edges expand around the single value and stay strictly increasing
        assert_eq!(s.hist.edges[0], 41.5);
        assert_eq!(*s.hist.edges.last().unwrap(), 42.5);
        assert!(s.hist.edges.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(s.hist.counts.iter().sum::<u64>(), 16);
    }

    #[test]
    fn test_percentile_ordering() {
        let values: Vec<f64> = (0..1000).map(|i| ((i * 7919) % 1031) as f64).collect();
        let s = summary_of(&values);
        assert!(s.min <= s.q1);
        assert!(s.q1 <= s.median);
        assert!(s.median <= s.q3);
        assert!(s.q3 <= s.max);
    }

    #[test]
    fn test_empty_rejected() {
        assert!(summarize(Array1::<f64>::zeros(0).view()).is_err());
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(3.14159), 3.14);
        assert_eq!(round2(1.0 / 3.0), 0.33);
        assert_eq!(round2(2.0 / 3.0), 0.67);
        assert_eq!(round2(-1.2345), -1.23);
    }
}
