//! Least-squares trendline and parallel price channel.

use trendchart_core::error::InputError;
use trendchart_core::traits::Indicator;
use trendchart_core::types::TrendChannel;

/// Fit `close = slope * index + intercept` by ordinary least squares.
///
/// A single point has no slope; it is fitted as a flat line through itself.
pub fn linear_fit(closes: &[f64]) -> Result<(f64, f64), InputError> {
    LinearTrend.validate_data(closes)?;

    let n = closes.len();
    if n == 1 {
        return Ok((0.0, closes[0]));
    }

    let n_f64 = n as f64;
    let x_mean = (n_f64 - 1.0) / 2.0;
    let y_mean = closes.iter().sum::<f64>() / n_f64;

    let mut covariance = 0.0;
    let mut variance = 0.0;
    for (i, &y) in closes.iter().enumerate() {
        let dx = i as f64 - x_mean;
        covariance += dx * (y - y_mean);
        variance += dx * dx;
    }

    let slope = covariance / variance;
    let intercept = y_mean - slope * x_mean;
    Ok((slope, intercept))
}

/// Evaluate the least-squares line at every index of `closes`.
pub fn fit_trend(closes: &[f64]) -> Result<Vec<f64>, InputError> {
    let (slope, intercept) = linear_fit(closes)?;
    Ok(evaluate(slope, intercept, closes.len()))
}

/// Offset the trend by the largest and smallest close deviation.
///
/// Returns `(upper, lower)`. Both bands are the trend shifted by a single
/// constant, so every close lies between them. The offsets are widened by
/// whole ulps where rounding in `trend + offset` would otherwise land on the
/// wrong side of a close, which keeps the containment exact in `f64`.
pub fn channel_bands(closes: &[f64], trend: &[f64]) -> Result<(Vec<f64>, Vec<f64>), InputError> {
    if closes.len() != trend.len() {
        return Err(InputError::LengthMismatch {
            expected: closes.len(),
            actual: trend.len(),
        });
    }
    if closes.is_empty() {
        return Err(InputError::EmptySeries);
    }

    let (min_diff, max_diff) = closes.iter().zip(trend).fold(
        (f64::INFINITY, f64::NEG_INFINITY),
        |(lo, hi), (c, t)| {
            let diff = c - t;
            (lo.min(diff), hi.max(diff))
        },
    );

    // Least-squares residuals straddle zero; clamping keeps the trend inside
    let mut max_diff = max_diff.max(0.0);
    let mut min_diff = min_diff.min(0.0);
    for (&c, &t) in closes.iter().zip(trend) {
        while t + max_diff < c {
            max_diff = next_up(max_diff);
        }
        while t + min_diff > c {
            min_diff = next_down(min_diff);
        }
    }

    let upper = trend.iter().map(|t| t + max_diff).collect();
    let lower = trend.iter().map(|t| t + min_diff).collect();
    Ok((upper, lower))
}

/// Smallest `f64` greater than a finite `x`.
fn next_up(x: f64) -> f64 {
    if x == 0.0 {
        f64::from_bits(1)
    } else if x > 0.0 {
        f64::from_bits(x.to_bits() + 1)
    } else {
        f64::from_bits(x.to_bits() - 1)
    }
}

fn next_down(x: f64) -> f64 {
    -next_up(-x)
}

fn evaluate(slope: f64, intercept: f64, len: usize) -> Vec<f64> {
    (0..len).map(|i| slope * i as f64 + intercept).collect()
}

/// Fit the trendline and derive its channel from closing prices.
pub fn trend_channel(closes: &[f64]) -> Result<TrendChannel, InputError> {
    let (slope, intercept) = linear_fit(closes)?;
    let trend = evaluate(slope, intercept, closes.len());
    let (upper, lower) = channel_bands(closes, &trend)?;

    Ok(TrendChannel {
        slope,
        intercept,
        trend,
        upper,
        lower,
    })
}

/// Trendline as an [`Indicator`] over closing prices.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearTrend;

impl Indicator for LinearTrend {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Result<Vec<f64>, InputError> {
        fit_trend(data)
    }

    fn period(&self) -> usize {
        1
    }

    fn name(&self) -> &str {
        "Trendline"
    }
}
