//! Discrete spaces and the interpolated curves and surfaces built on them.

mod discrete;
mod interpolated;
mod kind;
mod point;
mod spread;

pub use discrete::{Bracket, DiscreteCube, DiscreteCurve, DiscreteSurface};
pub use interpolated::{
    ExtendedInterpolatedSurface, InterpolatedCurve, InterpolatedSurface, SmileModel,
};
pub use kind::{build_interpolator, InterpolationKind};
pub use point::{Point, Point1D, Point2D, Point3D};
pub use spread::{SpreadCombination, SpreadInterpolation};
