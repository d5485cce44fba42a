//! Optimization algorithms.
//!
//! This module provides the least-squares routines used to calibrate
//! parametric volatility smiles.

use nalgebra::{DMatrix, DVector};

use crate::error::{MathError, MathResult};

/// Configuration for optimization algorithms.
#[derive(Debug, Clone, Copy)]
pub struct OptimizationConfig {
    /// Tolerance for convergence.
    pub tolerance: f64,
    /// Maximum number of iterations.
    pub max_iterations: u32,
    /// Relative step size for numerical derivatives.
    pub step_size: f64,
}

impl Default for OptimizationConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-14,
            max_iterations: 250,
            step_size: 1e-4,
        }
    }
}

/// Result of an optimization run.
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    /// Optimal parameters found.
    pub parameters: Vec<f64>,
    /// Final objective function value (mean squared residual).
    pub objective_value: f64,
    /// Number of iterations used.
    pub iterations: u32,
    /// Whether the optimization converged.
    pub converged: bool,
}

fn mean_square(residuals: &[f64]) -> f64 {
    if residuals.is_empty() {
        return f64::INFINITY;
    }
    let sum: f64 = residuals.iter().map(|r| r * r).sum();
    if sum.is_finite() {
        sum / residuals.len() as f64
    } else {
        f64::INFINITY
    }
}

/// Levenberg-Marquardt nonlinear least squares.
///
/// Minimises the mean square of `residuals(p)`. The Jacobian is built with
/// central differences; `project` clamps a candidate parameter vector back
/// into its feasible region after every step.
pub fn levenberg_marquardt<R, P>(
    residuals: R,
    initial: &[f64],
    project: P,
    config: &OptimizationConfig,
) -> MathResult<OptimizationResult>
where
    R: Fn(&[f64]) -> Vec<f64>,
    P: Fn(&mut [f64]),
{
    let n_params = initial.len();
    if n_params == 0 {
        return Err(MathError::invalid_input("no parameters to optimise"));
    }

    let mut params = initial.to_vec();
    project(&mut params);
    let mut current = residuals(&params);
    let n_obs = current.len();
    if n_obs == 0 {
        return Err(MathError::insufficient_data(1, 0));
    }
    let mut objective = mean_square(&current);
    let mut lambda = 1e-3;

    for iteration in 0..config.max_iterations {
        let mut jacobian = DMatrix::<f64>::zeros(n_obs, n_params);
        for j in 0..n_params {
            let eps = (params[j].abs() * config.step_size).max(1e-6);
            let mut up = params.clone();
            up[j] += eps;
            project(&mut up);
            let mut down = params.clone();
            down[j] -= eps;
            project(&mut down);
            let width = up[j] - down[j];
            if width.abs() < f64::EPSILON {
                continue;
            }
            let r_up = residuals(&up);
            let r_down = residuals(&down);
            for i in 0..n_obs {
                jacobian[(i, j)] = (r_up[i] - r_down[i]) / width;
            }
        }

        let r = DVector::from_column_slice(&current);
        let jt = jacobian.transpose();
        let mut normal = &jt * &jacobian;
        for d in 0..n_params {
            normal[(d, d)] += lambda;
        }
        let gradient = &jt * &r;

        let Some(delta) = normal.lu().solve(&gradient) else {
            lambda *= 10.0;
            if lambda > 1e8 {
                break;
            }
            continue;
        };

        let mut candidate: Vec<f64> = params.iter().zip(delta.iter()).map(|(p, d)| p - d).collect();
        project(&mut candidate);
        let candidate_residuals = residuals(&candidate);
        let candidate_objective = mean_square(&candidate_residuals);

        if candidate_objective < objective {
            let improvement = objective - candidate_objective;
            params = candidate;
            current = candidate_residuals;
            objective = candidate_objective;
            lambda = (lambda * 0.5).max(1e-8);
            if improvement < config.tolerance || delta.norm() < 1e-10 {
                return Ok(OptimizationResult {
                    parameters: params,
                    objective_value: objective,
                    iterations: iteration + 1,
                    converged: true,
                });
            }
        } else {
            lambda = (lambda * 2.0).min(1e8);
        }
    }

    log::debug!(
        "levenberg_marquardt stopped after {} iterations, objective {:.3e}",
        config.max_iterations,
        objective
    );
    Ok(OptimizationResult {
        parameters: params,
        objective_value: objective,
        iterations: config.max_iterations,
        converged: false,
    })
}

/// Ordinary least squares: the `x` minimising `|design * x - rhs|`.
pub fn linear_least_squares(design: &DMatrix<f64>, rhs: &DVector<f64>) -> MathResult<DVector<f64>> {
    if design.nrows() != rhs.len() {
        return Err(MathError::invalid_input(format!(
            "design has {} rows but rhs has {}",
            design.nrows(),
            rhs.len()
        )));
    }
    design
        .clone()
        .svd(true, true)
        .solve(rhs, 1e-12)
        .map_err(|_| MathError::SingularMatrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_levenberg_marquardt_exponential_fit() {
        // y = a * exp(b * x) with a = 2, b = -0.5
        let xs: Vec<f64> = (0..10).map(|i| f64::from(i) * 0.5).collect();
        let ys: Vec<f64> = xs.iter().map(|x| 2.0 * (-0.5 * x).exp()).collect();

        let residuals = |p: &[f64]| -> Vec<f64> {
            xs.iter()
                .zip(ys.iter())
                .map(|(x, y)| p[0] * (p[1] * x).exp() - y)
                .collect()
        };
        let result = levenberg_marquardt(residuals, &[1.0, 0.0], |_| {}, &OptimizationConfig::default())
            .unwrap();

        assert_relative_eq!(result.parameters[0], 2.0, epsilon = 1e-5);
        assert_relative_eq!(result.parameters[1], -0.5, epsilon = 1e-5);
        assert!(result.objective_value < 1e-10);
    }

    #[test]
    fn test_projection_is_respected() {
        // Unconstrained minimum at -3, clamped to >= 0
        let residuals = |p: &[f64]| vec![p[0] + 3.0];
        let project = |p: &mut [f64]| p[0] = p[0].max(0.0);
        let result =
            levenberg_marquardt(residuals, &[1.0], project, &OptimizationConfig::default()).unwrap();
        assert!(result.parameters[0] >= 0.0);
        assert!(result.parameters[0] < 1.0);
    }

    #[test]
    fn test_linear_least_squares_line() {
        let design = DMatrix::from_row_slice(4, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0, 1.0, 3.0]);
        let rhs = DVector::from_column_slice(&[1.0, 3.0, 5.0, 7.0]);
        let x = linear_least_squares(&design, &rhs).unwrap();
        assert_relative_eq!(x[0], 1.0, epsilon = 1e-10);
        assert_relative_eq!(x[1], 2.0, epsilon = 1e-10);
    }
}
