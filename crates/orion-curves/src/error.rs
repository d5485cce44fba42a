//! Error types for curve operations.

use orion_core::CoreError;
use orion_math::MathError;
use thiserror::Error;

/// A specialized Result type for curve operations.
pub type CurveResult<T> = Result<T, CurveError>;

/// Error types for curve operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    /// Coordinates are not strictly ascending or shapes disagree.
    #[error("Invalid grid: {reason}")]
    InvalidGrid {
        /// Description of the grid problem.
        reason: String,
    },

    /// Not enough data points for the operation.
    #[error("Insufficient points: need at least {required}, got {got}")]
    InsufficientPoints {
        /// Minimum required points.
        required: usize,
        /// Actual number of points provided.
        got: usize,
    },

    /// A perturbation referenced a grid index that does not exist.
    #[error("Grid index {index} out of range for {len} points")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of points in the grid.
        len: usize,
    },

    /// Interpolation kind cannot be used in this context.
    #[error("Unsupported interpolation: {reason}")]
    UnsupportedInterpolation {
        /// Description of the unsupported usage.
        reason: String,
    },

    /// A pricing-structure identifier could not be parsed.
    #[error("Invalid pricingStructureId {id} - unable to parse")]
    InvalidIdentifier {
        /// The offending identifier.
        id: String,
    },

    /// Unknown pricing-structure type name.
    #[error("Unknown pricing structure type: {value}")]
    UnknownPricingStructureType {
        /// The unrecognised name.
        value: String,
    },

    /// Invalid value (NaN, Inf, or domain error).
    #[error("Invalid value: {reason}")]
    InvalidValue {
        /// Description of why value is invalid.
        reason: String,
    },

    /// Error raised by an interpolation strategy.
    #[error(transparent)]
    Math(#[from] MathError),

    /// Error raised by date or period arithmetic.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl CurveError {
    /// Creates an invalid grid error.
    #[must_use]
    pub fn invalid_grid(reason: impl Into<String>) -> Self {
        Self::InvalidGrid {
            reason: reason.into(),
        }
    }

    /// Creates an insufficient points error.
    #[must_use]
    pub fn insufficient_points(required: usize, got: usize) -> Self {
        Self::InsufficientPoints { required, got }
    }

    /// Creates an index out of range error.
    #[must_use]
    pub fn index_out_of_range(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }

    /// Creates an unsupported interpolation error.
    #[must_use]
    pub fn unsupported_interpolation(reason: impl Into<String>) -> Self {
        Self::UnsupportedInterpolation {
            reason: reason.into(),
        }
    }

    /// Creates an invalid identifier error.
    #[must_use]
    pub fn invalid_identifier(id: impl Into<String>) -> Self {
        Self::InvalidIdentifier { id: id.into() }
    }

    /// Creates an unknown pricing structure type error.
    #[must_use]
    pub fn unknown_pricing_structure_type(value: impl Into<String>) -> Self {
        Self::UnknownPricingStructureType {
            value: value.into(),
        }
    }

    /// Creates an invalid value error.
    #[must_use]
    pub fn invalid_value(reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CurveError::invalid_identifier("Bogus");
        assert_eq!(err.to_string(), "Invalid pricingStructureId Bogus - unable to parse");

        let err = CurveError::insufficient_points(2, 1);
        assert!(err.to_string().contains("need at least 2"));
    }

    #[test]
    fn test_from_math_error() {
        let err: CurveError = MathError::insufficient_data(2, 0).into();
        assert!(matches!(err, CurveError::Math(_)));
    }
}
