//! # Orion Math
//!
//! Numerical routines for the Orion analytics library.
//!
//! This crate provides:
//!
//! - **Interpolation**: linear, log-linear, natural cubic spline, and the
//!   SABR and wing volatility smile models, all behind one [`Interpolator`]
//!   contract with explicit extrapolation control
//! - **Optimization**: Levenberg-Marquardt nonlinear least squares and linear
//!   least squares used to calibrate the smile models
//!
//! [`Interpolator`]: interpolation::Interpolator

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
#![allow(clippy::many_single_char_names)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::uninlined_format_args)]

pub mod error;
pub mod interpolation;
pub mod optimization;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::interpolation::{
        CubicSpline, Interpolator, LinearInterpolator, LogLinearInterpolator, SabrInterpolator,
        SabrParams, WingInterpolator,
    };
    pub use crate::optimization::{
        levenberg_marquardt, linear_least_squares, OptimizationConfig, OptimizationResult,
    };
}

pub use error::{MathError, MathResult};
