//! Linear interpolation.

use super::{check_range, find_segment, validate_grid, Interpolator};
use crate::error::MathResult;

/// Linear interpolation between data points.
///
/// Consecutive points are connected with straight lines. With extrapolation
/// allowed, the first and last segments are extended.
///
/// # Example
///
/// ```rust
/// use orion_math::interpolation::{Interpolator, LinearInterpolator};
///
/// let xs = vec![0.0, 1.0, 2.0, 3.0];
/// let ys = vec![0.0, 1.0, 4.0, 9.0];
///
/// let interp = LinearInterpolator::new(xs, ys).unwrap();
/// assert_eq!(interp.value_at(1.5, false).unwrap(), 2.5);
/// assert!(interp.value_at(4.0, false).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct LinearInterpolator {
    xs: Vec<f64>,
    ys: Vec<f64>,
    allow_extrapolation: bool,
}

impl LinearInterpolator {
    /// Creates a new linear interpolator.
    ///
    /// # Arguments
    ///
    /// * `xs` - X coordinates (must be sorted in ascending order)
    /// * `ys` - Y coordinates
    ///
    /// # Errors
    ///
    /// Returns an error if there are fewer than 2 points or if lengths differ.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        validate_grid(&xs, &ys, 2)?;
        Ok(Self {
            xs,
            ys,
            allow_extrapolation: false,
        })
    }

    /// Enables extrapolation beyond the data range.
    #[must_use]
    pub fn with_extrapolation(mut self) -> Self {
        self.allow_extrapolation = true;
        self
    }

    /// The x coordinates.
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    /// The y values.
    pub fn ys(&self) -> &[f64] {
        &self.ys
    }
}

impl Interpolator for LinearInterpolator {
    fn value_at(&self, x: f64, allow_extrapolation: bool) -> MathResult<f64> {
        check_range(x, self.min_x(), self.max_x(), allow_extrapolation)?;

        let i = find_segment(&self.xs, x);
        let x0 = self.xs[i];
        let x1 = self.xs[i + 1];
        let y0 = self.ys[i];
        let y1 = self.ys[i + 1];

        let t = (x - x0) / (x1 - x0);
        Ok(y0 + t * (y1 - y0))
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        check_range(x, self.min_x(), self.max_x(), self.allow_extrapolation)?;

        let i = find_segment(&self.xs, x);
        Ok((self.ys[i + 1] - self.ys[i]) / (self.xs[i + 1] - self.xs[i]))
    }

    fn allows_extrapolation(&self) -> bool {
        self.allow_extrapolation
    }

    fn min_x(&self) -> f64 {
        self.xs[0]
    }

    fn max_x(&self) -> f64 {
        self.xs[self.xs.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MathError;
    use approx::assert_relative_eq;

    #[test]
    fn test_linear_interpolation() {
        let xs = vec![0.0, 1.0, 2.0];
        let ys = vec![0.0, 2.0, 6.0];
        let interp = LinearInterpolator::new(xs, ys).unwrap();

        assert_relative_eq!(interp.value_at(0.5, false).unwrap(), 1.0);
        assert_relative_eq!(interp.value_at(1.5, false).unwrap(), 4.0);
        assert_relative_eq!(interp.derivative(1.5).unwrap(), 4.0);
    }

    #[test]
    fn test_extrapolation_extends_end_segments() {
        let interp = LinearInterpolator::new(vec![1.0, 2.0, 3.0], vec![1.0, 2.0, 4.0]).unwrap();

        assert!(matches!(
            interp.value_at(4.0, false),
            Err(MathError::ExtrapolationNotAllowed { .. })
        ));
        assert_relative_eq!(interp.value_at(4.0, true).unwrap(), 6.0);
        assert_relative_eq!(interp.value_at(0.0, true).unwrap(), 0.0);

        let lenient = interp.with_extrapolation();
        assert!(lenient.interpolate(10.0).is_ok());
    }

    #[test]
    fn test_rejects_unsorted() {
        assert!(LinearInterpolator::new(vec![0.0, 2.0, 1.0], vec![0.0, 1.0, 2.0]).is_err());
    }
}
