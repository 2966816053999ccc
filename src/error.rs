//! Error kinds raised before a simulation run begins.
//!
//! The simulator itself is total over validated input; every failure is
//! detected while loading the profile or validating the configuration.

use thiserror::Error;

/// Errors produced by profile loading and configuration validation.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SizingError {
    /// The profile is empty after filtering, or its source could not be read.
    #[error("invalid profile: {0}")]
    InvalidProfile(String),

    /// A configuration field violates its constraint.
    #[error("invalid config: {field} {reason}")]
    InvalidConfig {
        /// Field name (e.g. `"cylinder_capacity"`).
        field: String,
        /// Human-readable constraint description.
        reason: String,
    },

    /// The bundled reference profile is missing or unreadable.
    #[error("default profile unavailable at \"{path}\": {reason}")]
    DataUnavailable {
        /// Location the asset was expected at.
        path: String,
        /// Underlying I/O failure.
        reason: String,
    },
}

impl SizingError {
    /// Shorthand for an [`SizingError::InvalidConfig`] value.
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Name of the offending field for configuration errors.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::InvalidConfig { field, .. } => Some(field),
            _ => None,
        }
    }
}
