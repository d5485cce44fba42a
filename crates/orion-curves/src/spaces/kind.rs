//! Interpolation kinds and their construction over a grid.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use orion_math::interpolation::{
    CubicSpline, Interpolator, LinearInterpolator, LogLinearInterpolator, SabrInterpolator,
    WingInterpolator, DEFAULT_SABR_BETA,
};
use orion_math::{MathError, MathResult};

use crate::error::{CurveError, CurveResult};

/// Interpolation strategy applied to a grid axis.
///
/// The smile models carry the side inputs they are calibrated with.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InterpolationKind {
    /// Straight lines between nodes.
    #[default]
    Linear,
    /// Linear in the logarithm of the values.
    LogLinear,
    /// Natural cubic spline.
    CubicSpline,
    /// SABR smile over strikes.
    Sabr {
        /// Forward (asset price) of the smile.
        forward: f64,
        /// Expiry in years.
        expiry: f64,
        /// Fixed CEV exponent.
        beta: f64,
        /// Optional ATM volatility quote.
        atm_volatility: Option<f64>,
    },
    /// Quadratic wing smile over strikes.
    Wing {
        /// Forward used for moneyness.
        forward: f64,
        /// Optional ATM volatility fixing the smile level.
        atm_volatility: Option<f64>,
    },
}

impl InterpolationKind {
    /// A SABR kind with the default beta and no ATM quote.
    #[must_use]
    pub fn sabr(forward: f64, expiry: f64) -> Self {
        Self::Sabr {
            forward,
            expiry,
            beta: DEFAULT_SABR_BETA,
            atm_volatility: None,
        }
    }

    /// Returns true for the calibrated smile models.
    pub fn is_smile(&self) -> bool {
        matches!(self, Self::Sabr { .. } | Self::Wing { .. })
    }
}

impl fmt::Display for InterpolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Linear => "LinearInterpolation",
            Self::LogLinear => "LogLinearInterpolation",
            Self::CubicSpline => "CubicSplineInterpolation",
            Self::Sabr { .. } => "SABRModelInterpolation",
            Self::Wing { .. } => "WingModelInterpolation",
        };
        write!(f, "{name}")
    }
}

impl FromStr for InterpolationKind {
    type Err = CurveError;

    /// Parses the non-parametric kinds. Smile kinds need side inputs and are
    /// built directly.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" | "linearinterpolation" => Ok(Self::Linear),
            "loglinear" | "loglinearinterpolation" | "discountfactorinterpolation" => {
                Ok(Self::LogLinear)
            }
            "cubicspline" | "cubicsplineinterpolation" | "naturalcubicsplineinterpolation" => {
                Ok(Self::CubicSpline)
            }
            _ => Err(CurveError::unsupported_interpolation(format!(
                "'{s}' cannot be parsed into an interpolation kind"
            ))),
        }
    }
}

/// A single-node grid answers its one value everywhere.
#[derive(Debug, Clone, Copy)]
struct SingleNode {
    x: f64,
    value: f64,
}

impl Interpolator for SingleNode {
    fn value_at(&self, x: f64, allow_extrapolation: bool) -> MathResult<f64> {
        if !allow_extrapolation && (x - self.x).abs() > 0.0 {
            return Err(MathError::extrapolation_not_allowed(x, self.x, self.x));
        }
        Ok(self.value)
    }

    fn min_x(&self) -> f64 {
        self.x
    }

    fn max_x(&self) -> f64 {
        self.x
    }
}

/// Builds the interpolator for `kind` over `(xs, ys)`.
///
/// A single node yields a constant for every kind.
pub fn build_interpolator(
    kind: InterpolationKind,
    xs: &[f64],
    ys: &[f64],
) -> CurveResult<Arc<dyn Interpolator>> {
    if xs.len() == 1 && ys.len() == 1 && !kind.is_smile() {
        return Ok(Arc::new(SingleNode {
            x: xs[0],
            value: ys[0],
        }));
    }
    let xs = xs.to_vec();
    let ys = ys.to_vec();
    let interpolator: Arc<dyn Interpolator> = match kind {
        InterpolationKind::Linear => Arc::new(LinearInterpolator::new(xs, ys)?),
        InterpolationKind::LogLinear => Arc::new(LogLinearInterpolator::new(xs, ys)?),
        InterpolationKind::CubicSpline => Arc::new(CubicSpline::new(xs, ys)?),
        InterpolationKind::Sabr {
            forward,
            expiry,
            beta,
            atm_volatility,
        } => match atm_volatility {
            Some(atm) => Arc::new(SabrInterpolator::with_atm_volatility(
                xs, ys, forward, expiry, beta, atm,
            )?),
            None => Arc::new(SabrInterpolator::new(xs, ys, forward, expiry, beta)?),
        },
        InterpolationKind::Wing {
            forward,
            atm_volatility,
        } => Arc::new(WingInterpolator::new(xs, ys, forward, atm_volatility)?),
    };
    Ok(interpolator)
}
