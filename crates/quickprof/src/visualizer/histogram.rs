//! Histogram binning and kernel density estimation.

use crate::profiler::sample_std;

/// Upper bound on the number of bins of one histogram.
const MAX_BINS: usize = 200;

/// Points at which the density curve is evaluated.
const KDE_POINTS: usize = 200;

/// Bound on either end of the binned range; keeps every bin edge finite.
const RANGE_LIMIT: f64 = f64::MAX / 4.0;

/// Equal-width bins over the observed range of the finite values.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Histogram {
    pub start: f64,
    pub bin_width: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn from_values(values: &[f64]) -> Self {
        let values = finite_values(values);
        let (lo, hi) = value_range(&values);
        let bins = bin_count(&values);
        let bin_width = (hi - lo) / bins as f64;

        let mut counts = vec![0; bins];
        for value in &values {
            // Values beyond a clamped range land in the edge bins.
            let idx = ((value - lo) / bin_width).floor() as usize;
            counts[idx.min(bins - 1)] += 1;
        }

        Self {
            start: lo,
            bin_width,
            counts,
        }
    }

    pub fn end(&self) -> f64 {
        self.start + self.bin_width * self.counts.len() as f64
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// `(left edge, right edge, count)` of every bin.
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, usize)> + '_ {
        self.counts.iter().enumerate().map(|(i, count)| {
            let left = self.start + self.bin_width * i as f64;
            (left, left + self.bin_width, *count)
        })
    }
}

fn finite_values(values: &[f64]) -> Vec<f64> {
    values.iter().copied().filter(|v| v.is_finite()).collect()
}

/// Observed range clamped to [`RANGE_LIMIT`], widened around a single
/// repeated value.
fn value_range(values: &[f64]) -> (f64, f64) {
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }

    let lo = lo.clamp(-RANGE_LIMIT, RANGE_LIMIT);
    let hi = hi.clamp(-RANGE_LIMIT, RANGE_LIMIT);
    if lo == hi {
        let pad = (lo.abs() * 0.05).max(0.5);
        (lo - pad, hi + pad)
    } else {
        (lo, hi)
    }
}

/// Number of bins: the larger of the Sturges and Freedman-Diaconis estimates.
pub(crate) fn bin_count(values: &[f64]) -> usize {
    let n = values.len();
    if n < 2 {
        return 1;
    }

    let sturges = (n as f64).log2().ceil() as usize + 1;

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let iqr = percentile(&sorted, 0.75) - percentile(&sorted, 0.25);
    let span = sorted[n - 1] - sorted[0];
    let fd_width = 2.0 * iqr / (n as f64).cbrt();
    let freedman_diaconis = if fd_width > 0.0 && span > 0.0 {
        (span / fd_width).ceil() as usize
    } else {
        0
    };

    sturges.max(freedman_diaconis).clamp(1, MAX_BINS)
}

fn percentile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    sorted[lower] + (sorted[upper] - sorted[lower]) * (pos - lower as f64)
}

/// Gaussian density estimate over the histogram range, scaled to bin counts.
///
/// Uses Scott's bandwidth over the finite values. Empty when they have no
/// spread or their spread overflows.
pub(crate) fn kde_curve(values: &[f64], histogram: &Histogram) -> Vec<(f64, f64)> {
    let values = finite_values(values);
    let n = values.len();
    if n < 2 {
        return Vec::new();
    }
    let std = sample_std(&values);
    if !std.is_finite() || std == 0.0 {
        return Vec::new();
    }

    let bandwidth = std * (n as f64).powf(-0.2);
    let norm = 1.0 / (n as f64 * bandwidth * (2.0 * std::f64::consts::PI).sqrt());
    let scale = n as f64 * histogram.bin_width;
    let (start, end) = (histogram.start, histogram.end());
    let step = (end - start) / (KDE_POINTS - 1) as f64;

    (0..KDE_POINTS)
        .map(|i| {
            let x = start + step * i as f64;
            let density: f64 = values
                .iter()
                .map(|v| (-0.5 * ((x - v) / bandwidth).powi(2)).exp())
                .sum::<f64>()
                * norm;
            (x, density * scale)
        })
        .collect()
}
