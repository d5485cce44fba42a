//! Wing-model smile interpolation.

use nalgebra::{DMatrix, DVector};

use super::{check_range, validate_grid, Interpolator};
use crate::error::{MathError, MathResult};
use crate::optimization::linear_least_squares;

/// Quadratic wing smile in log-moneyness.
///
/// The volatility at strike `k` is `a + b·m + c·m²` with `m = ln(k / forward)`,
/// fitted to the nodes by least squares. When an ATM volatility is supplied it
/// fixes `a` and only the wing slopes are fitted. Fewer nodes than free
/// coefficients reduce the polynomial degree, so a single node gives a flat
/// smile through that node.
///
/// Outside the strike range the smile is held flat at the boundary value.
///
/// # Example
///
/// ```rust
/// use orion_math::interpolation::{Interpolator, WingInterpolator};
///
/// let strikes = vec![80.0, 90.0, 100.0, 110.0, 120.0];
/// let vols = vec![0.28, 0.24, 0.21, 0.20, 0.205];
/// let smile = WingInterpolator::new(strikes, vols, 100.0, None).unwrap();
///
/// let atm = smile.value_at(100.0, false).unwrap();
/// assert!(atm > 0.19 && atm < 0.23);
/// ```
#[derive(Debug, Clone)]
pub struct WingInterpolator {
    strikes: Vec<f64>,
    vols: Vec<f64>,
    forward: f64,
    coefficients: [f64; 3],
    allow_extrapolation: bool,
}

impl WingInterpolator {
    /// Fits the wing smile to (strike, vol) nodes around `forward`.
    pub fn new(
        strikes: Vec<f64>,
        vols: Vec<f64>,
        forward: f64,
        atm_volatility: Option<f64>,
    ) -> MathResult<Self> {
        validate_grid(&strikes, &vols, 1)?;
        if forward <= 0.0 || strikes[0] <= 0.0 {
            return Err(MathError::invalid_input(
                "wing model needs a positive forward and positive strikes",
            ));
        }

        let moneyness: Vec<f64> = strikes.iter().map(|k| (k / forward).ln()).collect();
        let coefficients = match atm_volatility {
            Some(atm) => {
                let degree = strikes.len().min(2);
                let targets: Vec<f64> = vols.iter().map(|v| v - atm).collect();
                let slopes = fit_polynomial(&moneyness, &targets, degree, 1)?;
                [atm, slopes[0], slopes.get(1).copied().unwrap_or(0.0)]
            }
            None => {
                let degree = (strikes.len() - 1).min(2);
                let fitted = fit_polynomial(&moneyness, &vols, degree, 0)?;
                let mut coefficients = [0.0; 3];
                coefficients[..fitted.len()].copy_from_slice(&fitted);
                coefficients
            }
        };

        Ok(Self {
            strikes,
            vols,
            forward,
            coefficients,
            allow_extrapolation: false,
        })
    }

    /// Enables extrapolation beyond the strike range.
    #[must_use]
    pub fn with_extrapolation(mut self) -> Self {
        self.allow_extrapolation = true;
        self
    }

    /// The smile coefficients `[a, b, c]`.
    pub fn coefficients(&self) -> [f64; 3] {
        self.coefficients
    }

    /// The forward used for moneyness.
    pub fn forward(&self) -> f64 {
        self.forward
    }

    /// The calibration volatilities.
    pub fn vols(&self) -> &[f64] {
        &self.vols
    }

    fn smile(&self, strike: f64) -> f64 {
        let m = (strike / self.forward).ln();
        let [a, b, c] = self.coefficients;
        a + b * m + c * m * m
    }
}

/// Least-squares polynomial fit of `ys` on powers `first_power..=degree` of `xs`.
fn fit_polynomial(xs: &[f64], ys: &[f64], degree: usize, first_power: usize) -> MathResult<Vec<f64>> {
    let columns = degree + 1 - first_power;
    let powers: Vec<i32> = (first_power..=degree)
        .map(|p| i32::try_from(p).unwrap_or(i32::MAX))
        .collect();
    let design = DMatrix::from_fn(xs.len(), columns, |row, col| xs[row].powi(powers[col]));
    let rhs = DVector::from_column_slice(ys);
    let solution = linear_least_squares(&design, &rhs)?;
    Ok(solution.iter().copied().collect())
}

impl Interpolator for WingInterpolator {
    fn value_at(&self, x: f64, allow_extrapolation: bool) -> MathResult<f64> {
        check_range(x, self.min_x(), self.max_x(), allow_extrapolation)?;
        Ok(self.smile(x.clamp(self.min_x(), self.max_x())))
    }

    fn allows_extrapolation(&self) -> bool {
        self.allow_extrapolation
    }

    fn min_x(&self) -> f64 {
        self.strikes[0]
    }

    fn max_x(&self) -> f64 {
        self.strikes[self.strikes.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_recovers_exact_quadratic() {
        let forward = 100.0;
        let strikes = vec![70.0, 85.0, 100.0, 115.0, 130.0];
        let vols: Vec<f64> = strikes
            .iter()
            .map(|k: &f64| {
                let m = (k / forward).ln();
                0.2 - 0.1 * m + 0.5 * m * m
            })
            .collect();

        let smile = WingInterpolator::new(strikes.clone(), vols.clone(), forward, None).unwrap();
        let [a, b, c] = smile.coefficients();
        assert_relative_eq!(a, 0.2, epsilon = 1e-10);
        assert_relative_eq!(b, -0.1, epsilon = 1e-10);
        assert_relative_eq!(c, 0.5, epsilon = 1e-10);
        for (k, v) in strikes.iter().zip(vols.iter()) {
            assert_relative_eq!(smile.value_at(*k, false).unwrap(), *v, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_single_strike_is_flat() {
        let smile = WingInterpolator::new(vec![100.0], vec![0.3], 100.0, None).unwrap();
        assert_relative_eq!(smile.value_at(100.0, false).unwrap(), 0.3, epsilon = 1e-12);
        assert_relative_eq!(smile.value_at(150.0, true).unwrap(), 0.3, epsilon = 1e-12);
    }

    #[test]
    fn test_atm_fixes_level() {
        let strikes = vec![80.0, 120.0];
        let vols = vec![0.3, 0.25];
        let smile = WingInterpolator::new(strikes, vols, 100.0, Some(0.22)).unwrap();
        assert_relative_eq!(smile.value_at(100.0, false).unwrap(), 0.22, epsilon = 1e-12);
    }

    #[test]
    fn test_flat_beyond_range() {
        let strikes = vec![80.0, 90.0, 100.0, 110.0, 120.0];
        let vols = vec![0.28, 0.24, 0.21, 0.20, 0.205];
        let smile = WingInterpolator::new(strikes, vols, 100.0, None).unwrap();

        assert!(smile.value_at(200.0, false).is_err());
        let edge = smile.value_at(120.0, false).unwrap();
        assert_relative_eq!(smile.value_at(200.0, true).unwrap(), edge, epsilon = 1e-12);
    }

    #[test]
    fn test_rejects_non_positive_forward() {
        assert!(WingInterpolator::new(vec![100.0], vec![0.2], 0.0, None).is_err());
    }
}
