//! # Derived Statistics
//!
//! The small set of statistics the figures are built from: quantile
//! thresholds over a grid, the hotspot mask, annual means of the monthly
//! mass-anomaly series, gap filling and a seasonal-trend decomposition.

use crate::input::HotspotParams;
use ndarray::Array2;
use polars::prelude::*;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("input contains no finite values")]
    EmptyInput,

    #[error("seasonal period must be at least 2, got {0}")]
    InvalidPeriod(usize),

    #[error("series of length {len} is too short for period {period}")]
    SeriesTooShort { len: usize, period: usize },
}

/// Linear-interpolation quantile over the finite values of `values`,
/// matching NumPy's default method. Returns `None` when no finite value
/// is present or `q` is outside [0, 1].
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if !(0.0..=1.0).contains(&q) {
        return None;
    }
    let mut finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return None;
    }
    finite.sort_by(f64::total_cmp);
    let h = q * (finite.len() - 1) as f64;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    let frac = h - lo as f64;
    Some(finite[lo] + frac * (finite[hi] - finite[lo]))
}

/// Lower/upper quantile thresholds of a grid, per the hotspot parameters.
pub fn decile_thresholds(
    grid: &Array2<f64>,
    params: &HotspotParams,
) -> Result<(f64, f64), StatsError> {
    let values: Vec<f64> = grid.iter().copied().collect();
    let lo = quantile(&values, params.lower).ok_or(StatsError::EmptyInput)?;
    let hi = quantile(&values, params.upper).ok_or(StatsError::EmptyInput)?;
    Ok((lo, hi))
}

/// Binary hotspot mask: 1 where the value sits in the tails (at or below
/// `lo`, at or above `hi`), 0 elsewhere. Non-finite cells map to 0.
pub fn hotspot_mask(grid: &Array2<f64>, lo: f64, hi: f64) -> Array2<u8> {
    grid.mapv(|v| {
        if v.is_finite() && (v <= lo || v >= hi) {
            1
        } else {
            0
        }
    })
}

/// Annual means of `value_col` grouped by the year of `date_col`.
///
/// `date_col` must already carry a date dtype (the CSV reader parses it
/// when `try_parse_dates` is on). The result has a `year` column and the
/// averaged value column, sorted by year.
pub fn annual_means(
    df: &DataFrame,
    date_col: &str,
    value_col: &str,
) -> PolarsResult<DataFrame> {
    df.clone()
        .lazy()
        .with_column(col(date_col).dt().year().alias("year"))
        .group_by([col("year")])
        .agg([col(value_col).mean()])
        .sort(["year"], Default::default())
        .collect()
}

/// Fills NaN gaps in place by linear interpolation between the nearest
/// finite neighbors; leading and trailing gaps take the nearest finite
/// value. A slice with no finite value is left untouched.
pub fn fill_gaps_linear(values: &mut [f64]) {
    let first_finite = match values.iter().position(|v| v.is_finite()) {
        Some(i) => i,
        None => return,
    };
    let last_finite = values.iter().rposition(|v| v.is_finite()).unwrap();

    let head = values[first_finite];
    for v in values.iter_mut().take(first_finite) {
        *v = head;
    }
    let tail = values[last_finite];
    for v in values.iter_mut().skip(last_finite + 1) {
        *v = tail;
    }

    let mut i = first_finite;
    while i < last_finite {
        if values[i + 1].is_finite() {
            i += 1;
            continue;
        }
        // gap runs from i+1 to j-1, with finite anchors at i and j
        let j = (i + 1..=last_finite)
            .find(|&k| values[k].is_finite())
            .unwrap();
        let span = (j - i) as f64;
        let (a, b) = (values[i], values[j]);
        for k in i + 1..j {
            let t = (k - i) as f64 / span;
            values[k] = a + t * (b - a);
        }
        i = j;
    }
}

/// Components of a seasonal-trend decomposition. All three have the same
/// length as the input series and sum back to it.
#[derive(Debug, Clone)]
pub struct Decomposition {
    pub trend: Vec<f64>,
    pub seasonal: Vec<f64>,
    pub remainder: Vec<f64>,
}

/// Decomposes a regularly sampled series into trend, seasonal and
/// remainder components.
///
/// The trend is a centered moving average of width `period` (windows
/// shrink at the edges so the trend stays finite everywhere); the
/// seasonal component is the phase-wise mean of the detrended series,
/// normalized to zero mean; the remainder is what is left over.
pub fn seasonal_decompose(values: &[f64], period: usize) -> Result<Decomposition, StatsError> {
    if period < 2 {
        return Err(StatsError::InvalidPeriod(period));
    }
    let n = values.len();
    if n < 2 * period {
        return Err(StatsError::SeriesTooShort { len: n, period });
    }

    let half = period / 2;
    let mut trend = Vec::with_capacity(n);
    for i in 0..n {
        let lo = i.saturating_sub(half);
        let hi = usize::min(n - 1, i + half);
        let window = &values[lo..=hi];
        trend.push(window.iter().sum::<f64>() / window.len() as f64);
    }

    let mut phase_sums = vec![0.0; period];
    let mut phase_counts = vec![0usize; period];
    for i in 0..n {
        let detrended = values[i] - trend[i];
        phase_sums[i % period] += detrended;
        phase_counts[i % period] += 1;
    }
    let mut phase_means: Vec<f64> = phase_sums
        .iter()
        .zip(&phase_counts)
        .map(|(s, &c)| s / c as f64)
        .collect();
    let grand = phase_means.iter().sum::<f64>() / period as f64;
    for m in phase_means.iter_mut() {
        *m -= grand;
    }

    let seasonal: Vec<f64> = (0..n).map(|i| phase_means[i % period]).collect();
    let remainder: Vec<f64> = (0..n)
        .map(|i| values[i] - trend[i] - seasonal[i])
        .collect();

    Ok(Decomposition {
        trend,
        seasonal,
        remainder,
    })
}
