//! Error types for experiment simulation and analysis

use thiserror::Error;

/// Errors surfaced by the simulator and analyzer
///
/// Every error is a caller contract violation: inputs are deterministic, so
/// retrying with the same arguments produces the same error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExperimentError {
    /// Group size of zero, probability outside [0, 1], counts exceeding the
    /// group size, or an invalid configuration value
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Lift was requested while the control conversion rate is zero
    #[error("Lift is undefined: control conversion rate is zero")]
    DivisionUndefined,
}

impl ExperimentError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        ExperimentError::InvalidInput(msg.into())
    }
}

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, ExperimentError>;
