//! Interpolated curves and surfaces.
//!
//! An interpolated space binds a discrete grid to an interpolation kind. The
//! extrapolation flag is fixed at construction and spaces are never mutated;
//! perturbation returns a new instance.

use std::fmt;
use std::sync::Arc;

use orion_math::interpolation::{
    Interpolator, LinearInterpolator, SabrInterpolator, WingInterpolator,
};
use orion_math::MathError;

use super::discrete::{DiscreteCurve, DiscreteSurface};
use super::kind::{build_interpolator, InterpolationKind};
use super::point::{Point1D, Point2D};
use crate::error::{CurveError, CurveResult};

/// A curve: a discrete grid plus an interpolation kind.
///
/// # Example
///
/// ```rust
/// use orion_curves::spaces::{DiscreteCurve, InterpolatedCurve, InterpolationKind};
///
/// let grid = DiscreteCurve::new(vec![1.0, 2.0], vec![0.98, 0.95]).unwrap();
/// let curve = InterpolatedCurve::new(grid, InterpolationKind::LogLinear, false).unwrap();
///
/// let df = curve.value(1.5).unwrap();
/// assert!(df < 0.98 && df > 0.95);
/// assert!(curve.value(3.0).is_err());
/// ```
#[derive(Clone)]
pub struct InterpolatedCurve {
    space: DiscreteCurve,
    kind: InterpolationKind,
    interpolator: Arc<dyn Interpolator>,
    allow_extrapolation: bool,
}

impl fmt::Debug for InterpolatedCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterpolatedCurve")
            .field("space", &self.space)
            .field("kind", &self.kind)
            .field("allow_extrapolation", &self.allow_extrapolation)
            .finish_non_exhaustive()
    }
}

impl InterpolatedCurve {
    /// Binds `kind` to the grid.
    pub fn new(
        space: DiscreteCurve,
        kind: InterpolationKind,
        allow_extrapolation: bool,
    ) -> CurveResult<Self> {
        let interpolator = build_interpolator(kind, space.xs(), space.values())?;
        Ok(Self {
            space,
            kind,
            interpolator,
            allow_extrapolation,
        })
    }

    /// Interpolated value at `x`.
    pub fn value(&self, x: f64) -> CurveResult<f64> {
        self.value_at(x, self.allow_extrapolation)
    }

    /// Interpolated value at `x` with an explicit extrapolation flag.
    pub fn value_at(&self, x: f64, allow_extrapolation: bool) -> CurveResult<f64> {
        Ok(self.interpolator.value_at(x, allow_extrapolation)?)
    }

    /// The underlying grid.
    pub fn space(&self) -> &DiscreteCurve {
        &self.space
    }

    /// The interpolation kind.
    pub fn kind(&self) -> InterpolationKind {
        self.kind
    }

    /// Whether queries outside the grid succeed.
    pub fn allows_extrapolation(&self) -> bool {
        self.allow_extrapolation
    }

    /// The bracketing grid points, or `None` when `x` is a node.
    pub fn closest_values(&self, x: f64) -> Option<(Point1D, Point1D)> {
        self.space.closest_values(x)
    }

    /// A new curve with the listed grid values shifted.
    pub fn perturbed_copy(&self, deltas: &[(usize, f64)]) -> CurveResult<Self> {
        Self::new(self.space.perturbed(deltas)?, self.kind, self.allow_extrapolation)
    }

    /// A new curve with every grid value shifted by `delta`.
    pub fn parallel_shift(&self, delta: f64) -> CurveResult<Self> {
        Self::new(self.space.shifted(delta), self.kind, self.allow_extrapolation)
    }
}

/// A surface interpolated in two passes.
///
/// Each column is interpolated along the rows (first coordinate) with the
/// `x` kind; the resulting values are then interpolated across the columns
/// (second coordinate) with the `y` kind.
#[derive(Clone)]
pub struct InterpolatedSurface {
    space: DiscreteSurface,
    x_kind: InterpolationKind,
    y_kind: InterpolationKind,
    columns: Vec<Arc<dyn Interpolator>>,
    allow_extrapolation: bool,
}

impl fmt::Debug for InterpolatedSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterpolatedSurface")
            .field("space", &self.space)
            .field("x_kind", &self.x_kind)
            .field("y_kind", &self.y_kind)
            .field("allow_extrapolation", &self.allow_extrapolation)
            .finish_non_exhaustive()
    }
}

fn column_interpolators(
    space: &DiscreteSurface,
    kind: InterpolationKind,
) -> CurveResult<Vec<Arc<dyn Interpolator>>> {
    if kind.is_smile() {
        return Err(CurveError::unsupported_interpolation(
            "smile models interpolate strikes, not the row dimension",
        ));
    }
    (0..space.ys().len())
        .map(|j| build_interpolator(kind, space.xs(), &space.column(j)))
        .collect()
}

impl InterpolatedSurface {
    /// Binds the two interpolation kinds to the grid.
    pub fn new(
        space: DiscreteSurface,
        x_kind: InterpolationKind,
        y_kind: InterpolationKind,
        allow_extrapolation: bool,
    ) -> CurveResult<Self> {
        let columns = column_interpolators(&space, x_kind)?;
        Ok(Self {
            space,
            x_kind,
            y_kind,
            columns,
            allow_extrapolation,
        })
    }

    /// Interpolated value at `(x, y)`.
    pub fn value(&self, x: f64, y: f64) -> CurveResult<f64> {
        let across = self
            .columns
            .iter()
            .map(|column| column.value_at(x, self.allow_extrapolation))
            .collect::<Result<Vec<_>, _>>()?;
        let row = build_interpolator(self.y_kind, self.space.ys(), &across)?;
        Ok(row.value_at(y, self.allow_extrapolation)?)
    }

    /// The underlying grid.
    pub fn space(&self) -> &DiscreteSurface {
        &self.space
    }

    /// The grid corners around `(x, y)`, or `None` when the query is a node.
    pub fn closest_values(&self, x: f64, y: f64) -> Option<Vec<Point2D>> {
        self.space.closest_values(x, y)
    }

    /// A new surface with the listed `(row, column)` values shifted.
    pub fn perturbed_copy(&self, deltas: &[(usize, usize, f64)]) -> CurveResult<Self> {
        Self::new(
            self.space.perturbed(deltas)?,
            self.x_kind,
            self.y_kind,
            self.allow_extrapolation,
        )
    }
}

/// Smile model used across strikes by an [`ExtendedInterpolatedSurface`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SmileModel {
    /// SABR calibrated per expiry row.
    Sabr {
        /// Fixed CEV exponent.
        beta: f64,
    },
    /// Wing model fitted across strikes after interpolating in time.
    Wing,
}

/// A volatility surface over (expiry, strike) with a smile model across
/// strikes and a forward curve built from spot plus one forward per expiry.
///
/// In SABR mode each expiry row is calibrated once against its forward and
/// a query interpolates the row smiles linearly in expiry. In wing mode each
/// strike column is interpolated to the query expiry with the time kind, then
/// the wing model is fitted across strikes around the forward at that expiry.
#[derive(Clone)]
pub struct ExtendedInterpolatedSurface {
    space: DiscreteSurface,
    time_kind: InterpolationKind,
    model: SmileModel,
    spot: f64,
    forwards: Vec<f64>,
    forward_curve: LinearInterpolator,
    columns: Vec<Arc<dyn Interpolator>>,
    row_smiles: Vec<SabrInterpolator>,
    allow_extrapolation: bool,
}

impl fmt::Debug for ExtendedInterpolatedSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtendedInterpolatedSurface")
            .field("space", &self.space)
            .field("time_kind", &self.time_kind)
            .field("model", &self.model)
            .field("spot", &self.spot)
            .field("forwards", &self.forwards)
            .field("allow_extrapolation", &self.allow_extrapolation)
            .finish_non_exhaustive()
    }
}

impl ExtendedInterpolatedSurface {
    /// Builds the surface.
    ///
    /// `forwards` holds one more element than there are expiries: the first is
    /// spot, the rest are the forwards to each expiry.
    pub fn new(
        space: DiscreteSurface,
        time_kind: InterpolationKind,
        model: SmileModel,
        forwards: Vec<f64>,
        allow_extrapolation: bool,
    ) -> CurveResult<Self> {
        let expiries = space.xs().to_vec();
        if forwards.len() != expiries.len() + 1 {
            return Err(CurveError::invalid_grid(format!(
                "expected {} forwards (spot first), got {}",
                expiries.len() + 1,
                forwards.len()
            )));
        }
        if forwards.iter().any(|f| !f.is_finite() || *f <= 0.0) {
            return Err(CurveError::invalid_value("forwards must be positive"));
        }
        let spot = forwards[0];
        let row_forwards = forwards[1..].to_vec();

        let (curve_times, curve_values) = if expiries[0] > 0.0 {
            let mut times = vec![0.0];
            times.extend_from_slice(&expiries);
            (times, forwards.clone())
        } else {
            (expiries.clone(), row_forwards.clone())
        };
        let forward_curve = if curve_times.len() == 1 {
            let t = curve_times[0];
            LinearInterpolator::new(vec![t, t + 1.0], vec![curve_values[0]; 2])?
        } else {
            LinearInterpolator::new(curve_times, curve_values)?
        };
        let forward_curve = forward_curve.with_extrapolation();

        let (columns, row_smiles) = match model {
            SmileModel::Wing => (column_interpolators(&space, time_kind)?, Vec::new()),
            SmileModel::Sabr { beta } => {
                let smiles = expiries
                    .iter()
                    .enumerate()
                    .map(|(i, &expiry)| {
                        SabrInterpolator::new(
                            space.ys().to_vec(),
                            space.row(i),
                            row_forwards[i],
                            expiry,
                            beta,
                        )
                        .map(SabrInterpolator::with_extrapolation)
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                (Vec::new(), smiles)
            }
        };

        Ok(Self {
            space,
            time_kind,
            model,
            spot,
            forwards,
            forward_curve,
            columns,
            row_smiles,
            allow_extrapolation,
        })
    }

    /// Spot, the first element of the forwards.
    pub fn spot(&self) -> f64 {
        self.spot
    }

    /// The forwards as supplied, spot first.
    pub fn forwards(&self) -> &[f64] {
        &self.forwards
    }

    /// The smile model.
    pub fn model(&self) -> SmileModel {
        self.model
    }

    /// The underlying grid.
    pub fn space(&self) -> &DiscreteSurface {
        &self.space
    }

    /// Forward at `expiry`, linear between spot and the expiry forwards.
    pub fn forward(&self, expiry: f64) -> CurveResult<f64> {
        Ok(self.forward_curve.value_at(expiry, true)?)
    }

    /// Volatility at (`expiry`, `strike`).
    pub fn value(&self, expiry: f64, strike: f64) -> CurveResult<f64> {
        let strikes = self.space.ys();
        let lo = strikes[0];
        let hi = strikes[strikes.len() - 1];
        if !self.allow_extrapolation && (strike < lo || strike > hi) {
            return Err(MathError::extrapolation_not_allowed(strike, lo, hi).into());
        }
        match self.model {
            SmileModel::Sabr { .. } => self.sabr_value(expiry, strike),
            SmileModel::Wing => self.wing_value(expiry, strike),
        }
    }

    fn sabr_value(&self, expiry: f64, strike: f64) -> CurveResult<f64> {
        let smile_vols = self
            .row_smiles
            .iter()
            .map(|smile| smile.value_at(strike, true))
            .collect::<Result<Vec<_>, _>>()?;
        let in_time = build_interpolator(InterpolationKind::Linear, self.space.xs(), &smile_vols)?;
        Ok(in_time.value_at(expiry, self.allow_extrapolation)?)
    }

    fn wing_value(&self, expiry: f64, strike: f64) -> CurveResult<f64> {
        let vols = self
            .columns
            .iter()
            .map(|column| column.value_at(expiry, self.allow_extrapolation))
            .collect::<Result<Vec<_>, _>>()?;
        let forward = self.forward(expiry)?;
        let smile = WingInterpolator::new(self.space.ys().to_vec(), vols, forward, None)?;
        Ok(smile.value_at(strike, true)?)
    }
}
