//! Spread interpolation over a reference curve.

use std::fmt;
use std::sync::Arc;

use orion_math::interpolation::Interpolator;
use orion_math::{MathError, MathResult};

use super::discrete::DiscreteCurve;
use super::interpolated::InterpolatedCurve;
use super::kind::{build_interpolator, InterpolationKind};
use crate::error::{CurveError, CurveResult};

/// How a spread combines with its reference curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpreadCombination {
    /// `reference + spread`, for rate curves.
    #[default]
    Additive,
    /// `reference × spread`, for discount-factor and price curves.
    Multiplicative,
}

/// Interpolates a spread grid and combines it with a reference curve.
///
/// The reference is shared, so many spread curves can sit on one base
/// curve without copying it.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use orion_curves::spaces::{
///     DiscreteCurve, InterpolatedCurve, InterpolationKind, SpreadCombination, SpreadInterpolation,
/// };
/// use orion_math::interpolation::Interpolator;
///
/// let base = DiscreteCurve::new(vec![1.0, 5.0], vec![0.03, 0.04]).unwrap();
/// let base = Arc::new(InterpolatedCurve::new(base, InterpolationKind::Linear, false).unwrap());
/// let spreads = DiscreteCurve::new(vec![1.0, 5.0], vec![0.001, 0.002]).unwrap();
///
/// let curve = SpreadInterpolation::new(base, &spreads, InterpolationKind::Linear, SpreadCombination::Additive)
///     .unwrap();
/// assert!((curve.value_at(1.0, false).unwrap() - 0.031).abs() < 1e-12);
/// ```
#[derive(Clone)]
pub struct SpreadInterpolation {
    reference: Arc<InterpolatedCurve>,
    spreads: Arc<dyn Interpolator>,
    spread_kind: InterpolationKind,
    combination: SpreadCombination,
    min_x: f64,
    max_x: f64,
}

impl fmt::Debug for SpreadInterpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpreadInterpolation")
            .field("reference", &self.reference)
            .field("spread_kind", &self.spread_kind)
            .field("combination", &self.combination)
            .finish_non_exhaustive()
    }
}

impl SpreadInterpolation {
    /// Builds the spread interpolation.
    pub fn new(
        reference: Arc<InterpolatedCurve>,
        spreads: &DiscreteCurve,
        spread_kind: InterpolationKind,
        combination: SpreadCombination,
    ) -> CurveResult<Self> {
        let interpolator = build_interpolator(spread_kind, spreads.xs(), spreads.values())?;
        let xs = spreads.xs();
        Ok(Self {
            reference,
            spreads: interpolator,
            spread_kind,
            combination,
            min_x: xs[0],
            max_x: xs[xs.len() - 1],
        })
    }

    /// The reference curve.
    pub fn reference(&self) -> &InterpolatedCurve {
        &self.reference
    }

    /// The combination rule.
    pub fn combination(&self) -> SpreadCombination {
        self.combination
    }

    /// The interpolated spread alone at `x`.
    pub fn spread_at(&self, x: f64, allow_extrapolation: bool) -> MathResult<f64> {
        self.spreads.value_at(x, allow_extrapolation)
    }
}

impl Interpolator for SpreadInterpolation {
    fn value_at(&self, x: f64, allow_extrapolation: bool) -> MathResult<f64> {
        let spread = self.spreads.value_at(x, allow_extrapolation)?;
        let base = self
            .reference
            .value_at(x, allow_extrapolation)
            .map_err(|e| match e {
                CurveError::Math(inner) => inner,
                other => MathError::invalid_input(other.to_string()),
            })?;
        Ok(match self.combination {
            SpreadCombination::Additive => base + spread,
            SpreadCombination::Multiplicative => base * spread,
        })
    }

    fn allows_extrapolation(&self) -> bool {
        self.reference.allows_extrapolation()
    }

    fn min_x(&self) -> f64 {
        self.min_x
    }

    fn max_x(&self) -> f64 {
        self.max_x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn base_curve() -> Arc<InterpolatedCurve> {
        let grid = DiscreteCurve::new(vec![1.0, 2.0, 5.0], vec![0.97, 0.94, 0.85]).unwrap();
        Arc::new(InterpolatedCurve::new(grid, InterpolationKind::LogLinear, false).unwrap())
    }

    #[test]
    fn test_additive_spread() {
        let spreads = DiscreteCurve::new(vec![1.0, 5.0], vec![0.01, 0.02]).unwrap();
        let curve = SpreadInterpolation::new(
            base_curve(),
            &spreads,
            InterpolationKind::Linear,
            SpreadCombination::Additive,
        )
        .unwrap();
        assert_relative_eq!(curve.value_at(2.0, false).unwrap(), 0.94 + 0.0125, epsilon = 1e-12);
    }

    #[test]
    fn test_multiplicative_spread() {
        let spreads = DiscreteCurve::new(vec![1.0, 5.0], vec![0.99, 0.95]).unwrap();
        let curve = SpreadInterpolation::new(
            base_curve(),
            &spreads,
            InterpolationKind::Linear,
            SpreadCombination::Multiplicative,
        )
        .unwrap();
        assert_relative_eq!(curve.value_at(5.0, false).unwrap(), 0.85 * 0.95, epsilon = 1e-12);
        assert!(curve.value_at(6.0, false).is_err());
        assert_relative_eq!(curve.spread_at(1.0, false).unwrap(), 0.99);
    }
}
