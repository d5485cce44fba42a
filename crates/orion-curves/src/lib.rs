//! # Orion Curves
//!
//! Curves, surfaces and their addressing for the Orion analytics library.
//!
//! This crate provides:
//!
//! - **Discrete spaces**: the raw (coordinate, value) grids of curves,
//!   surfaces and cubes, with bracketing-point lookup
//! - **Interpolated spaces**: curves and two-pass surfaces bound to an
//!   [`InterpolationKind`], volatility surfaces with a SABR or wing smile, and
//!   spread curves over a shared reference curve
//! - **Typed curves**: [`Curve<K>`] tagged with the kind of value it holds,
//!   and free functions such as [`discount_factor`] and [`forward_rate`]
//! - **Identifiers**: the `Type.CurveName[.BaseDate[.Algorithm]]` keys used to
//!   address curves in the object cache
//!
//! ## Example
//!
//! ```rust
//! use orion_core::types::Date;
//! use orion_curves::prelude::*;
//!
//! let base = Date::from_ymd(2024, 1, 15).unwrap();
//! let curve = Curve::<ZeroRate>::from_times(
//!     base,
//!     vec![1.0, 2.0, 5.0],
//!     vec![0.03, 0.035, 0.04],
//!     InterpolationKind::Linear,
//!     false,
//! )
//! .unwrap();
//!
//! let df = discount_factor(&curve, 2.0).unwrap();
//! assert!((df - (-0.07f64).exp()).abs() < 1e-12);
//! ```
//!
//! [`InterpolationKind`]: spaces::InterpolationKind
//! [`Curve<K>`]: curve::Curve
//! [`discount_factor`]: curve::discount_factor
//! [`forward_rate`]: curve::forward_rate

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::float_cmp)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::uninlined_format_args)]

pub mod curve;
pub mod error;
pub mod identifiers;
pub mod spaces;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::curve::{
        bond_yield, caplet_volatility, discount_factor, exchange_traded_price, forward_rate,
        spread_value, zero_rate, Curve, DiscountFactor, Discounting, Price, Spread, ValueKind,
        Volatility, Yield, ZeroRate,
    };
    pub use crate::error::{CurveError, CurveResult};
    pub use crate::identifiers::{
        parse_curve_name, CurveName, PricingStructureIdentifier, PricingStructureType,
    };
    pub use crate::spaces::{
        DiscreteCube, DiscreteCurve, DiscreteSurface, ExtendedInterpolatedSurface,
        InterpolatedCurve, InterpolatedSurface, InterpolationKind, Point, Point1D, Point2D,
        Point3D, SmileModel, SpreadCombination, SpreadInterpolation,
    };
}

pub use error::{CurveError, CurveResult};
