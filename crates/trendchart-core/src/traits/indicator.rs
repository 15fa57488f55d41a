//! Indicator trait definitions.

use crate::error::InputError;

/// Trait for technical indicators over a price slice.
///
/// Output is aligned with the input: one value per data point, so
/// overlays can be drawn against the same dates as the bars.
pub trait Indicator: Send + Sync {
    /// The output type of the indicator.
    type Output;

    /// Calculate indicator values for the given data.
    ///
    /// # Arguments
    /// * `data` - Input data (typically closing prices)
    ///
    /// # Returns
    /// A vector with exactly `data.len()` values
    fn calculate(&self, data: &[f64]) -> Result<Vec<Self::Output>, InputError>;

    /// Get the number of points before the first defined value.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;

    /// Reject empty or non-finite input.
    fn validate_data(&self, data: &[f64]) -> Result<(), InputError> {
        if data.is_empty() {
            return Err(InputError::EmptySeries);
        }
        if let Some(index) = data.iter().position(|v| !v.is_finite()) {
            return Err(InputError::NonFinite { index });
        }
        Ok(())
    }
}
