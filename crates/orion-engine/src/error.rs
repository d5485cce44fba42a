//! Engine error types.

use orion_core::CoreError;
use thiserror::Error;

/// A specialized Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Engine error type.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    /// Required reference data is absent from the object cache.
    #[error("The search using the query '{query}' yielded no results.")]
    ConfigurationMissing {
        /// The query or key that found nothing.
        query: String,
    },

    /// The requested combination of inputs is not implemented.
    #[error("{reason}")]
    NotSupported {
        /// Diagnostic naming the offending values.
        reason: String,
    },

    /// An argument was outside its accepted range.
    #[error("Argument value is out of range. {message}")]
    OutOfRange {
        /// Description of the valid range.
        message: String,
    },

    /// An argument could not be used.
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the problem.
        message: String,
    },

    /// A cached payload could not be converted to or from its record type.
    #[error("serialization error: {message}")]
    Serialization {
        /// Underlying serde message.
        message: String,
    },

    /// Engine configuration could not be read.
    #[error("configuration error: {message}")]
    Config {
        /// Description of the problem.
        message: String,
    },

    /// Error raised by date, period or calendar arithmetic.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl EngineError {
    /// Creates a configuration missing error.
    #[must_use]
    pub fn configuration_missing(query: impl Into<String>) -> Self {
        Self::ConfigurationMissing {
            query: query.into(),
        }
    }

    /// Creates a not supported error.
    #[must_use]
    pub fn not_supported(reason: impl Into<String>) -> Self {
        Self::NotSupported {
            reason: reason.into(),
        }
    }

    /// Creates an out of range error.
    #[must_use]
    pub fn out_of_range(message: impl Into<String>) -> Self {
        Self::OutOfRange {
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

    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(e: serde_json::Error) -> Self {
        EngineError::serialization(e.to_string())
    }
}

impl From<toml::de::Error> for EngineError {
    fn from(e: toml::de::Error) -> Self {
        EngineError::config(e.to_string())
    }
}

impl From<std::io::Error> for EngineError {
    fn from(e: std::io::Error) -> Self {
        EngineError::config(e.to_string())
    }
}
