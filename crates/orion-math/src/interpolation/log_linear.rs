//! Log-linear interpolation.
//!
//! Interpolates the logarithm of values, so discount factor curves
//! interpolate multiplicatively and stay positive.

use super::{check_range, find_segment, validate_grid, Interpolator};
use crate::error::{MathError, MathResult};

/// Log-linear interpolation between data points.
///
/// The interpolation formula is:
/// ```text
/// y(x) = exp(linear_interpolate(x, ln(y)))
/// ```
///
/// # Example
///
/// ```rust
/// use orion_math::interpolation::{Interpolator, LogLinearInterpolator};
///
/// let times = vec![0.0, 1.0, 2.0, 3.0];
/// let discount_factors = vec![1.0, 0.97, 0.94, 0.91];
///
/// let interp = LogLinearInterpolator::new(times, discount_factors).unwrap();
/// let df = interp.value_at(1.5, false).unwrap();
/// assert!(df > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct LogLinearInterpolator {
    xs: Vec<f64>,
    ys: Vec<f64>,
    /// Precomputed log(y) values
    log_ys: Vec<f64>,
    allow_extrapolation: bool,
}

impl LogLinearInterpolator {
    /// Creates a new log-linear interpolator.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - There are fewer than 2 points
    /// - Lengths differ
    /// - Any y value is non-positive
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        validate_grid(&xs, &ys, 2)?;

        let mut log_ys = Vec::with_capacity(ys.len());
        for (i, &y) in ys.iter().enumerate() {
            if y <= 0.0 {
                return Err(MathError::invalid_input(format!(
                    "y values must be positive for log-linear interpolation, got {y} at index {i}"
                )));
            }
            log_ys.push(y.ln());
        }

        Ok(Self {
            xs,
            ys,
            log_ys,
            allow_extrapolation: false,
        })
    }

    /// Enables extrapolation beyond the data range.
    #[must_use]
    pub fn with_extrapolation(mut self) -> Self {
        self.allow_extrapolation = true;
        self
    }

    /// The y values.
    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    fn log_value(&self, x: f64) -> (f64, f64) {
        let i = find_segment(&self.xs, x);
        let x0 = self.xs[i];
        let x1 = self.xs[i + 1];
        let slope = (self.log_ys[i + 1] - self.log_ys[i]) / (x1 - x0);
        (self.log_ys[i] + slope * (x - x0), slope)
    }
}

impl Interpolator for LogLinearInterpolator {
    fn value_at(&self, x: f64, allow_extrapolation: bool) -> MathResult<f64> {
        check_range(x, self.min_x(), self.max_x(), allow_extrapolation)?;
        Ok(self.log_value(x).0.exp())
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        check_range(x, self.min_x(), self.max_x(), self.allow_extrapolation)?;
        let (log_y, slope) = self.log_value(x);
        Ok(log_y.exp() * slope)
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
