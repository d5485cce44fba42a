//! Interpolation strategies.
//!
//! Every strategy is initialised from coordinate/value arrays whose
//! coordinates are strictly ascending, and answers
//! [`value_at`](Interpolator::value_at) for any query inside the grid. Queries
//! outside the grid succeed only when extrapolation is allowed.
//!
//! # Available Methods
//!
//! - [`LinearInterpolator`]: straight lines between nodes
//! - [`LogLinearInterpolator`]: linear in `ln(y)`, for discount factors
//! - [`CubicSpline`]: natural cubic spline
//! - [`SabrInterpolator`]: SABR smile calibrated to (strike, vol) nodes
//! - [`WingInterpolator`]: quadratic wing smile in log-moneyness

mod cubic_spline;
mod linear;
mod log_linear;
mod sabr;
mod wing;

pub use cubic_spline::CubicSpline;
pub use linear::LinearInterpolator;
pub use log_linear::LogLinearInterpolator;
pub use sabr::{fit_sabr, SabrInterpolator, SabrParams, DEFAULT_SABR_BETA};
pub use wing::WingInterpolator;

use std::fmt;

use crate::error::{MathError, MathResult};

/// Trait for interpolation methods.
///
/// All interpolation methods implement this trait, providing a unified
/// interface for curves and surfaces.
pub trait Interpolator: Send + Sync + fmt::Debug {
    /// Value at `x`, failing outside the grid unless `allow_extrapolation` is set.
    fn value_at(&self, x: f64, allow_extrapolation: bool) -> MathResult<f64>;

    /// Value at `x` using the interpolator's own extrapolation setting.
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        self.value_at(x, self.allows_extrapolation())
    }

    /// Returns the first derivative at x.
    ///
    /// The default is a central finite difference.
    fn derivative(&self, x: f64) -> MathResult<f64> {
        let h = 1e-6 * x.abs().max(1.0);
        let up = self.value_at(x + h, true)?;
        let down = self.value_at(x - h, true)?;
        Ok((up - down) / (2.0 * h))
    }

    /// Returns true if extrapolation is allowed.
    fn allows_extrapolation(&self) -> bool {
        false
    }

    /// Returns the minimum x value in the data.
    fn min_x(&self) -> f64;

    /// Returns the maximum x value in the data.
    fn max_x(&self) -> f64;

    /// Checks if x is within the interpolation range.
    fn in_range(&self, x: f64) -> bool {
        x >= self.min_x() && x <= self.max_x()
    }
}

/// Validates a grid: equal lengths, at least `min_points`, strictly ascending xs.
pub(crate) fn validate_grid(xs: &[f64], ys: &[f64], min_points: usize) -> MathResult<()> {
    if xs.len() < min_points {
        return Err(MathError::insufficient_data(min_points, xs.len()));
    }
    if xs.len() != ys.len() {
        return Err(MathError::invalid_input(format!(
            "xs and ys must have same length: {} vs {}",
            xs.len(),
            ys.len()
        )));
    }
    if xs.windows(2).any(|pair| pair[1] <= pair[0]) {
        return Err(MathError::invalid_input(
            "x values must be strictly increasing",
        ));
    }
    if xs.iter().chain(ys).any(|v| !v.is_finite()) {
        return Err(MathError::invalid_input("grid values must be finite"));
    }
    Ok(())
}

/// Fails when `x` lies outside `[min, max]` and extrapolation is off.
pub(crate) fn check_range(x: f64, min: f64, max: f64, allow_extrapolation: bool) -> MathResult<()> {
    if !allow_extrapolation && (x < min || x > max) {
        return Err(MathError::extrapolation_not_allowed(x, min, max));
    }
    Ok(())
}

/// Finds the index i such that xs[i] <= x < xs[i+1], clamped to the first
/// and last segments.
pub(crate) fn find_segment(xs: &[f64], x: f64) -> usize {
    let last = xs.len().saturating_sub(2);
    match xs.binary_search_by(|probe| probe.partial_cmp(&x).unwrap_or(std::cmp::Ordering::Equal)) {
        Ok(i) => i.min(last),
        Err(i) => i.saturating_sub(1).min(last),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_all_interpolators_through_points() {
        let times = vec![0.5, 1.0, 2.0, 3.0, 5.0];
        let rates = vec![0.02, 0.025, 0.03, 0.035, 0.04];

        let linear = LinearInterpolator::new(times.clone(), rates.clone()).unwrap();
        for (t, r) in times.iter().zip(rates.iter()) {
            assert_relative_eq!(linear.value_at(*t, false).unwrap(), *r, epsilon = 1e-12);
        }

        let spline = CubicSpline::new(times.clone(), rates.clone()).unwrap();
        for (t, r) in times.iter().zip(rates.iter()) {
            assert_relative_eq!(spline.value_at(*t, false).unwrap(), *r, epsilon = 1e-12);
        }

        let dfs: Vec<f64> = times
            .iter()
            .zip(rates.iter())
            .map(|(t, r)| (-r * t).exp())
            .collect();
        let log_linear = LogLinearInterpolator::new(times.clone(), dfs.clone()).unwrap();
        for (t, df) in times.iter().zip(dfs.iter()) {
            assert_relative_eq!(log_linear.value_at(*t, false).unwrap(), *df, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_derivative_consistency() {
        let times = vec![0.5, 1.0, 2.0, 3.0, 5.0];
        let rates = vec![0.02, 0.025, 0.03, 0.035, 0.04];

        let linear = LinearInterpolator::new(times.clone(), rates.clone()).unwrap();
        check_derivative(&linear, 1.5, "Linear");

        let spline = CubicSpline::new(times.clone(), rates).unwrap();
        check_derivative(&spline, 1.5, "CubicSpline");
    }

    fn check_derivative(interp: &dyn Interpolator, t: f64, name: &str) {
        let h = 1e-6;
        let y_plus = interp.value_at(t + h, false).unwrap();
        let y_minus = interp.value_at(t - h, false).unwrap();
        let numerical = (y_plus - y_minus) / (2.0 * h);

        let analytical = interp.derivative(t).unwrap();

        assert!(
            (analytical - numerical).abs() < 1e-4,
            "{} derivative at t={}: analytical={}, numerical={}",
            name,
            t,
            analytical,
            numerical
        );
    }

    #[test]
    fn test_validate_grid() {
        assert!(validate_grid(&[0.0, 1.0], &[1.0, 2.0], 2).is_ok());
        assert!(matches!(
            validate_grid(&[0.0], &[1.0], 2),
            Err(MathError::InsufficientData { required: 2, actual: 1 })
        ));
        assert!(validate_grid(&[0.0, 1.0], &[1.0], 2).is_err());
        assert!(validate_grid(&[1.0, 1.0], &[1.0, 2.0], 2).is_err());
        assert!(validate_grid(&[0.0, f64::NAN], &[1.0, 2.0], 2).is_err());
    }

    #[test]
    fn test_find_segment_clamps() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        assert_eq!(find_segment(&xs, -5.0), 0);
        assert_eq!(find_segment(&xs, 0.0), 0);
        assert_eq!(find_segment(&xs, 1.5), 1);
        assert_eq!(find_segment(&xs, 3.0), 2);
        assert_eq!(find_segment(&xs, 9.0), 2);
    }
}
