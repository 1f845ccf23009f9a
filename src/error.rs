//! Error types for parameter validation, projection and loading

use thiserror::Error;

/// Failure of a single feasibility run
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FeasibilityError {
    /// Input rejected before any projection work begins
    #[error("invalid parameter `{field}`: {reason}")]
    InvalidParameter { field: String, reason: String },

    /// Summary ratio whose denominator is zero
    #[error("{metric} is undefined (zero denominator)")]
    UndefinedRatio { metric: &'static str },
}

impl FeasibilityError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn undefined(metric: &'static str) -> Self {
        Self::UndefinedRatio { metric }
    }
}

/// Failure while reading project inputs from disk
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON parameters: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed unit CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Invalid(#[from] FeasibilityError),
}
