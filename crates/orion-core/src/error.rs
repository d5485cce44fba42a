//! Error types for the Orion core crate.
//!
//! This module defines the error types used for date, period and calendar
//! operations, providing structured error handling with context.

use thiserror::Error;

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// The main error type for core operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Error in date calculations or invalid date.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// A period or offset string could not be parsed.
    #[error("Invalid period: {value}")]
    InvalidPeriod {
        /// The offending input.
        value: String,
    },

    /// A convention name was not recognised or cannot be applied.
    #[error("{message}")]
    InvalidConvention {
        /// Description of the problem.
        message: String,
    },

    /// An argument was outside its accepted domain.
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the problem.
        message: String,
    },

    /// An index or selector was outside its valid range.
    #[error("Argument out of range: {message}")]
    OutOfRange {
        /// Description of the valid range.
        message: String,
    },

    /// The requested day type / period combination is not implemented.
    #[error("{reason}")]
    NotSupported {
        /// Diagnostic naming the offending values.
        reason: String,
    },

    /// Period arithmetic that does not divide evenly.
    #[error("Arithmetic error: {message}")]
    Arithmetic {
        /// Description of the error.
        message: String,
    },
}

impl CoreError {
    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }

    /// Creates an invalid period error.
    #[must_use]
    pub fn invalid_period(value: impl Into<String>) -> Self {
        Self::InvalidPeriod {
            value: value.into(),
        }
    }

    /// Creates an invalid convention error.
    #[must_use]
    pub fn invalid_convention(message: impl Into<String>) -> Self {
        Self::InvalidConvention {
            message: message.into(),
        }
    }

    /// Creates an invalid argument error.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates an out of range error.
    #[must_use]
    pub fn out_of_range(message: impl Into<String>) -> Self {
        Self::OutOfRange {
            message: message.into(),
        }
    }

    /// Creates a not supported error.
    #[must_use]
    pub fn not_supported(reason: impl Into<String>) -> Self {
        Self::NotSupported {
            reason: reason.into(),
        }
    }

    /// Creates an arithmetic error.
    #[must_use]
    pub fn arithmetic(message: impl Into<String>) -> Self {
        Self::Arithmetic {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::invalid_date("2024-02-30 is not a valid date");
        assert!(err.to_string().contains("Invalid date"));
    }

    #[test]
    fn test_not_supported_message_is_verbatim() {
        let err = CoreError::not_supported("W not supported in conjunction with 'Business day type'");
        assert_eq!(
            err.to_string(),
            "W not supported in conjunction with 'Business day type'"
        );
    }
}
