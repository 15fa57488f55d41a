//! Moving average indicators.

use trendchart_core::error::InputError;
use trendchart_core::traits::Indicator;
use trendchart_core::types::MovingAverages;

/// Trailing arithmetic mean over `window` points.
///
/// The output has one entry per input point; the first `window - 1`
/// entries are `None`. A window longer than the data yields all `None`.
pub fn rolling_mean(closes: &[f64], window: usize) -> Result<Vec<Option<f64>>, InputError> {
    if window == 0 {
        return Err(InputError::InvalidWindow(window));
    }

    let mut result = vec![None; closes.len()];
    if closes.len() < window {
        return Ok(result);
    }

    let window_f64 = window as f64;

    // Initial sum
    let mut sum: f64 = closes[..window].iter().sum();
    result[window - 1] = Some(sum / window_f64);

    // Sliding window
    for i in window..closes.len() {
        sum = sum - closes[i - window] + closes[i];
        result[i] = Some(sum / window_f64);
    }

    Ok(result)
}

/// Compute one rolling mean per requested window.
pub fn moving_averages(closes: &[f64], windows: &[usize]) -> Result<MovingAverages, InputError> {
    let mut averages = MovingAverages::new();
    for &window in windows {
        averages.insert(window, rolling_mean(closes, window)?);
    }
    Ok(averages)
}

/// Simple Moving Average (SMA).
///
/// Calculates the arithmetic mean of the last N values.
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
}

impl Sma {
    /// Create a new SMA with the specified period.
    pub fn new(period: usize) -> Result<Self, InputError> {
        if period == 0 {
            return Err(InputError::InvalidWindow(period));
        }
        Ok(Self { period })
    }
}

impl Indicator for Sma {
    type Output = Option<f64>;

    fn calculate(&self, data: &[f64]) -> Result<Vec<Option<f64>>, InputError> {
        rolling_mean(data, self.period)
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "SMA"
    }
}
