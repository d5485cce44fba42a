//! SABR smile interpolation.
//!
//! The smile is calibrated to (strike, volatility) nodes with the Hagan et al.
//! (2002) lognormal expansion. `beta` is fixed by the caller; `alpha`, `rho`
//! and `nu` are fitted by Levenberg-Marquardt from a grid of starting points.

use super::{check_range, validate_grid, Interpolator};
use crate::error::{MathError, MathResult};
use crate::optimization::{levenberg_marquardt, OptimizationConfig};

/// Beta used when the caller does not supply one.
pub const DEFAULT_SABR_BETA: f64 = 0.85;

const ALPHA_BOUNDS: (f64, f64) = (1e-8, 10.0);
const RHO_BOUND: f64 = 0.999;
const NU_BOUNDS: (f64, f64) = (1e-8, 10.0);

/// SABR model parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SabrParams {
    /// Initial volatility level.
    pub alpha: f64,
    /// CEV exponent in `[0, 1]`.
    pub beta: f64,
    /// Correlation between forward and volatility.
    pub rho: f64,
    /// Volatility of volatility.
    pub nu: f64,
}

impl SabrParams {
    /// Hagan lognormal implied volatility for strike `k`, forward `f` and
    /// expiry `t` in years.
    ///
    /// Returns `NaN` for non-positive forward, strike or expiry.
    pub fn implied_vol(&self, f: f64, k: f64, t: f64) -> f64 {
        if f <= 0.0 || k <= 0.0 || t <= 0.0 {
            return f64::NAN;
        }
        let Self {
            alpha,
            beta,
            rho,
            nu,
        } = *self;

        let one_minus_beta = 1.0 - beta;
        let log_fk = (f / k).ln();
        let fk_beta = (f * k).powf(0.5 * one_minus_beta);
        let z = nu / alpha * fk_beta * log_fk;

        let omb2 = one_minus_beta * one_minus_beta;
        let denom = fk_beta
            * (1.0 + omb2 / 24.0 * log_fk * log_fk + omb2 * omb2 / 1920.0 * log_fk.powi(4));
        let correction = 1.0
            + (omb2 / 24.0 * alpha * alpha / (fk_beta * fk_beta)
                + 0.25 * rho * beta * nu * alpha / fk_beta
                + (2.0 - 3.0 * rho * rho) / 24.0 * nu * nu)
                * t;

        alpha / denom * z_over_xz(z, rho) * correction
    }

    fn project(&mut self) {
        self.alpha = self.alpha.clamp(ALPHA_BOUNDS.0, ALPHA_BOUNDS.1);
        self.rho = self.rho.clamp(-RHO_BOUND, RHO_BOUND);
        self.nu = self.nu.clamp(NU_BOUNDS.0, NU_BOUNDS.1);
    }
}

/// `z / x(z)` with a series expansion near zero.
fn z_over_xz(z: f64, rho: f64) -> f64 {
    if z.abs() < 1e-8 {
        return 1.0 - 0.5 * rho * z;
    }
    let sqrt_term = (1.0 - 2.0 * rho * z + z * z).sqrt();
    let xz = ((sqrt_term + z - rho) / (1.0 - rho)).ln();
    if xz.abs() < f64::EPSILON {
        1.0
    } else {
        z / xz
    }
}

fn objective(params: &SabrParams, forward: f64, strikes: &[f64], vols: &[f64], t: f64) -> f64 {
    let sum: f64 = strikes
        .iter()
        .zip(vols)
        .map(|(&k, &v)| {
            let diff = params.implied_vol(forward, k, t) - v;
            diff * diff
        })
        .sum();
    if sum.is_finite() {
        sum / strikes.len() as f64
    } else {
        f64::INFINITY
    }
}

fn clamp_vector(p: &mut [f64]) {
    p[0] = p[0].clamp(ALPHA_BOUNDS.0, ALPHA_BOUNDS.1);
    p[1] = p[1].clamp(-RHO_BOUND, RHO_BOUND);
    p[2] = p[2].clamp(NU_BOUNDS.0, NU_BOUNDS.1);
}

/// Calibrates SABR parameters to a smile with fixed `beta`.
///
/// Starts from a grid of (alpha, rho, nu) guesses, refines the best few with
/// Levenberg-Marquardt and keeps the fit with the lowest mean squared error.
pub fn fit_sabr(
    forward: f64,
    strikes: &[f64],
    vols: &[f64],
    t: f64,
    beta: f64,
) -> MathResult<SabrParams> {
    if strikes.len() != vols.len() {
        return Err(MathError::invalid_input(format!(
            "strikes and vols must have same length: {} vs {}",
            strikes.len(),
            vols.len()
        )));
    }
    if strikes.is_empty() {
        return Err(MathError::insufficient_data(1, 0));
    }
    if forward <= 0.0 || t <= 0.0 {
        return Err(MathError::invalid_input(
            "SABR calibration needs a positive forward and expiry",
        ));
    }
    if !(0.0..=1.0).contains(&beta) {
        return Err(MathError::invalid_input(format!(
            "SABR beta must lie in [0, 1], got {beta}"
        )));
    }
    if strikes.iter().chain(vols).any(|v| !v.is_finite() || *v <= 0.0) {
        return Err(MathError::invalid_input(
            "SABR strikes and vols must be positive",
        ));
    }

    let atm_index = strikes
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            (*a - forward)
                .abs()
                .partial_cmp(&(*b - forward).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map_or(0, |(i, _)| i);
    let alpha_guess = vols[atm_index] * forward.powf(1.0 - beta);

    let mut starts = Vec::new();
    for alpha_mult in [0.5, 0.75, 1.0, 1.25, 1.5] {
        for rho in [-0.75, -0.5, -0.25, 0.0, 0.25, 0.5] {
            for nu in [0.15, 0.3, 0.5, 0.8, 1.2] {
                let mut p = SabrParams {
                    alpha: alpha_guess * alpha_mult,
                    beta,
                    rho,
                    nu,
                };
                p.project();
                let obj = objective(&p, forward, strikes, vols, t);
                starts.push((p, obj));
            }
        }
    }
    starts.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    let config = OptimizationConfig::default();
    let residuals = |p: &[f64]| -> Vec<f64> {
        let params = SabrParams {
            alpha: p[0],
            beta,
            rho: p[1],
            nu: p[2],
        };
        strikes
            .iter()
            .zip(vols)
            .map(|(&k, &v)| {
                let r = params.implied_vol(forward, k, t) - v;
                if r.is_finite() {
                    r
                } else {
                    1e6
                }
            })
            .collect()
    };

    let mut best: Option<(SabrParams, f64)> = None;
    for (start, start_obj) in starts.into_iter().take(8) {
        let (candidate, candidate_obj) = match levenberg_marquardt(
            residuals,
            &[start.alpha, start.rho, start.nu],
            clamp_vector,
            &config,
        ) {
            Ok(result) => (
                SabrParams {
                    alpha: result.parameters[0],
                    beta,
                    rho: result.parameters[1],
                    nu: result.parameters[2],
                },
                result.objective_value,
            ),
            Err(_) => (start, start_obj),
        };
        if best.as_ref().map_or(true, |(_, obj)| candidate_obj < *obj) {
            best = Some((candidate, candidate_obj));
        }
    }

    best.map(|(params, obj)| {
        log::debug!(
            "SABR fit alpha={:.6} rho={:.4} nu={:.4} mse={:.3e}",
            params.alpha,
            params.rho,
            params.nu,
            obj
        );
        params
    })
    .ok_or_else(|| MathError::convergence_failed(config.max_iterations, f64::INFINITY))
}

#[derive(Debug, Clone, Copy)]
enum SmileFit {
    /// A single strike: the smile is flat at that volatility.
    Flat(f64),
    Sabr(SabrParams),
}

/// SABR smile over strikes.
///
/// Built from (strike, vol) nodes plus the forward and expiry of the smile.
/// A single node degrades to a flat smile at that volatility. An optional
/// ATM volatility is added to the calibration set as the node `(forward, atm)`.
///
/// # Example
///
/// ```rust
/// use orion_math::interpolation::{Interpolator, SabrInterpolator, SabrParams};
///
/// let params = SabrParams { alpha: 0.04, beta: 0.5, rho: -0.3, nu: 0.4 };
/// let strikes = vec![0.02, 0.03, 0.04, 0.05, 0.06];
/// let vols: Vec<f64> = strikes.iter().map(|&k| params.implied_vol(0.04, k, 2.0)).collect();
///
/// let smile = SabrInterpolator::new(strikes, vols.clone(), 0.04, 2.0, 0.5).unwrap();
/// assert!((smile.value_at(0.04, false).unwrap() - vols[2]).abs() < 1e-4);
/// ```
#[derive(Debug, Clone)]
pub struct SabrInterpolator {
    strikes: Vec<f64>,
    vols: Vec<f64>,
    forward: f64,
    expiry: f64,
    fit: SmileFit,
    allow_extrapolation: bool,
}

impl SabrInterpolator {
    /// Calibrates a smile to the given nodes.
    pub fn new(
        strikes: Vec<f64>,
        vols: Vec<f64>,
        forward: f64,
        expiry: f64,
        beta: f64,
    ) -> MathResult<Self> {
        Self::calibrate(strikes, vols, forward, expiry, beta, None)
    }

    /// Calibrates a smile to the given nodes plus an ATM volatility quote.
    pub fn with_atm_volatility(
        strikes: Vec<f64>,
        vols: Vec<f64>,
        forward: f64,
        expiry: f64,
        beta: f64,
        atm_volatility: f64,
    ) -> MathResult<Self> {
        Self::calibrate(strikes, vols, forward, expiry, beta, Some(atm_volatility))
    }

    fn calibrate(
        strikes: Vec<f64>,
        vols: Vec<f64>,
        forward: f64,
        expiry: f64,
        beta: f64,
        atm_volatility: Option<f64>,
    ) -> MathResult<Self> {
        validate_grid(&strikes, &vols, 1)?;

        let fit = if strikes.len() == 1 {
            SmileFit::Flat(vols[0])
        } else {
            let mut cal_strikes = strikes.clone();
            let mut cal_vols = vols.clone();
            if let Some(atm) = atm_volatility {
                match cal_strikes
                    .iter()
                    .position(|k| (k - forward).abs() < 1e-12)
                {
                    Some(i) => cal_vols[i] = atm,
                    None => {
                        cal_strikes.push(forward);
                        cal_vols.push(atm);
                    }
                }
            }
            SmileFit::Sabr(fit_sabr(forward, &cal_strikes, &cal_vols, expiry, beta)?)
        };

        Ok(Self {
            strikes,
            vols,
            forward,
            expiry,
            fit,
            allow_extrapolation: false,
        })
    }

    /// Enables extrapolation beyond the strike range.
    #[must_use]
    pub fn with_extrapolation(mut self) -> Self {
        self.allow_extrapolation = true;
        self
    }

    /// The calibrated parameters, or `None` for a flat single-strike smile.
    pub fn params(&self) -> Option<SabrParams> {
        match self.fit {
            SmileFit::Flat(_) => None,
            SmileFit::Sabr(params) => Some(params),
        }
    }

    /// The forward the smile was calibrated against.
    pub fn forward(&self) -> f64 {
        self.forward
    }

    /// The expiry in years.
    pub fn expiry(&self) -> f64 {
        self.expiry
    }

    /// The calibration strikes.
    pub fn strikes(&self) -> &[f64] {
        &self.strikes
    }

    /// The calibration volatilities.
    pub fn vols(&self) -> &[f64] {
        &self.vols
    }
}

impl Interpolator for SabrInterpolator {
    fn value_at(&self, x: f64, allow_extrapolation: bool) -> MathResult<f64> {
        match self.fit {
            SmileFit::Flat(vol) => Ok(vol),
            SmileFit::Sabr(params) => {
                check_range(x, self.min_x(), self.max_x(), allow_extrapolation)?;
                let vol = params.implied_vol(self.forward, x, self.expiry);
                if vol.is_finite() {
                    Ok(vol)
                } else {
                    Err(MathError::invalid_input(format!(
                        "SABR volatility undefined at strike {x}"
                    )))
                }
            }
        }
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

    fn market_smile(params: &SabrParams, forward: f64, t: f64) -> (Vec<f64>, Vec<f64>) {
        let strikes: Vec<f64> = (0..9).map(|i| forward * (0.6 + 0.1 * f64::from(i))).collect();
        let vols = strikes
            .iter()
            .map(|&k| params.implied_vol(forward, k, t))
            .collect();
        (strikes, vols)
    }

    #[test]
    fn test_atm_limit_is_continuous() {
        let params = SabrParams {
            alpha: 0.2,
            beta: 0.7,
            rho: -0.2,
            nu: 0.5,
        };
        let atm = params.implied_vol(100.0, 100.0, 1.0);
        let near = params.implied_vol(100.0, 100.0 + 1e-6, 1.0);
        assert!(atm.is_finite());
        assert_relative_eq!(atm, near, epsilon = 1e-6);
    }

    #[test]
    fn test_invalid_inputs_are_nan() {
        let params = SabrParams {
            alpha: 0.2,
            beta: 0.7,
            rho: -0.2,
            nu: 0.5,
        };
        assert!(params.implied_vol(0.0, 100.0, 1.0).is_nan());
        assert!(params.implied_vol(100.0, -1.0, 1.0).is_nan());
        assert!(params.implied_vol(100.0, 100.0, 0.0).is_nan());
    }

    #[test]
    fn test_fit_recovers_synthetic_smile() {
        let truth = SabrParams {
            alpha: 0.04,
            beta: 0.5,
            rho: -0.25,
            nu: 0.45,
        };
        let forward = 0.035;
        let (strikes, vols) = market_smile(&truth, forward, 2.0);

        let fitted = fit_sabr(forward, &strikes, &vols, 2.0, 0.5).unwrap();
        for (&k, &v) in strikes.iter().zip(vols.iter()) {
            assert_relative_eq!(fitted.implied_vol(forward, k, 2.0), v, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_fit_rejects_bad_input() {
        assert!(fit_sabr(100.0, &[90.0, 100.0], &[0.2], 1.0, 0.5).is_err());
        assert!(fit_sabr(100.0, &[], &[], 1.0, 0.5).is_err());
        assert!(fit_sabr(-1.0, &[90.0], &[0.2], 1.0, 0.5).is_err());
        assert!(fit_sabr(100.0, &[90.0], &[0.2], 1.0, 1.5).is_err());
    }

    #[test]
    fn test_single_strike_is_flat() {
        let smile = SabrInterpolator::new(vec![100.0], vec![0.22], 100.0, 1.0, 0.85).unwrap();
        assert!(smile.params().is_none());
        assert_relative_eq!(smile.value_at(100.0, false).unwrap(), 0.22);
        assert_relative_eq!(smile.value_at(50.0, false).unwrap(), 0.22);
    }

    #[test]
    fn test_extrapolation_gating() {
        let truth = SabrParams {
            alpha: 2.0,
            beta: 0.5,
            rho: -0.3,
            nu: 0.6,
        };
        let (strikes, vols) = market_smile(&truth, 100.0, 1.0);
        let smile = SabrInterpolator::new(strikes, vols, 100.0, 1.0, 0.5).unwrap();

        assert!(matches!(
            smile.value_at(200.0, false),
            Err(MathError::ExtrapolationNotAllowed { .. })
        ));
        assert!(smile.value_at(200.0, true).unwrap().is_finite());
        assert!(smile.with_extrapolation().interpolate(200.0).is_ok());
    }

    #[test]
    fn test_atm_volatility_is_honoured() {
        let truth = SabrParams {
            alpha: 2.0,
            beta: 0.5,
            rho: -0.3,
            nu: 0.6,
        };
        let forward = 100.0;
        let strikes = vec![80.0, 90.0, 110.0, 120.0];
        let vols: Vec<f64> = strikes
            .iter()
            .map(|&k| truth.implied_vol(forward, k, 1.0))
            .collect();
        let atm = truth.implied_vol(forward, forward, 1.0);

        let smile =
            SabrInterpolator::with_atm_volatility(strikes, vols, forward, 1.0, 0.5, atm).unwrap();
        assert_relative_eq!(smile.value_at(forward, false).unwrap(), atm, epsilon = 1e-4);
    }
}
