//! Chart renderer trait definition.

use crate::error::RenderError;
use crate::types::ChartSpec;

/// Serializes a composed chart into embeddable markup.
pub trait ChartRenderer: Send + Sync {
    /// Render the chart.
    ///
    /// Fails when an overlay's length disagrees with the price series.
    fn render(&self, spec: &ChartSpec<'_>) -> Result<String, RenderError>;

    /// Get the renderer name.
    fn name(&self) -> &str;

    /// Check that every overlay has one value per bar.
    fn validate_spec(&self, spec: &ChartSpec<'_>) -> Result<(), RenderError> {
        let expected = spec.series.len();
        if expected == 0 {
            return Err(RenderError::EmptySeries);
        }

        let mismatch = |series: &str, actual: usize| -> Result<(), RenderError> {
            if actual != expected {
                return Err(RenderError::LengthMismatch {
                    series: series.to_string(),
                    expected,
                    actual,
                });
            }
            Ok(())
        };

        if let Some(channel) = spec.channel {
            mismatch("trend", channel.trend.len())?;
            mismatch("upper channel", channel.upper.len())?;
            mismatch("lower channel", channel.lower.len())?;
        }
        for (window, values) in &spec.moving_averages {
            mismatch(&format!("{}-day MA", window), values.len())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MovingAverages, PriceBar, PriceSeries, TrendChannel};
    use chrono::NaiveDate;

    struct CountingRenderer;

    impl ChartRenderer for CountingRenderer {
        fn render(&self, spec: &ChartSpec<'_>) -> Result<String, RenderError> {
            self.validate_spec(spec)?;
            Ok(format!("{} bars", spec.series.len()))
        }

        fn name(&self) -> &str {
            "counting"
        }
    }

    fn series(n: u32) -> PriceSeries {
        let bars = (1..=n)
            .map(|d| {
                let date = NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
                PriceBar::new(date, 10.0, 11.0, 9.0, 10.0, 100)
            })
            .collect();
        PriceSeries::new("TEST", bars).unwrap()
    }

    #[test]
    fn test_validate_spec_accepts_aligned_overlays() {
        let s = series(3);
        let mut spec = ChartSpec::candles("TEST", &s);
        spec.moving_averages.insert(2, vec![None, Some(10.0), Some(10.0)]);

        assert_eq!(CountingRenderer.render(&spec).unwrap(), "3 bars");
    }

    #[test]
    fn test_validate_spec_rejects_short_channel() {
        let s = series(3);
        let channel = TrendChannel {
            slope: 0.0,
            intercept: 10.0,
            trend: vec![10.0, 10.0],
            upper: vec![10.0, 10.0],
            lower: vec![10.0, 10.0],
        };
        let spec = ChartSpec {
            title: "TEST".into(),
            series: &s,
            channel: Some(&channel),
            moving_averages: MovingAverages::new(),
            show_volume: true,
        };

        let err = CountingRenderer.render(&spec).unwrap_err();
        assert_eq!(
            err,
            RenderError::LengthMismatch {
                series: "trend".into(),
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn test_validate_spec_rejects_empty_series() {
        let s = PriceSeries::new("TEST", Vec::new()).unwrap();
        let spec = ChartSpec::candles("TEST", &s);
        assert_eq!(CountingRenderer.render(&spec), Err(RenderError::EmptySeries));
    }
}
