//! Error types for the todo domain.

use thiserror::Error;

/// Errors returned to callers of the todo store
///
/// Empty labels and unknown keys are not errors: those operations are
/// silently ignored. Only values that cannot be represented at all are
/// rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TodoError {
    /// A filter name other than `all`, `active` or `done`
    #[error("invalid filter {0:?}: expected one of all, active, done")]
    InvalidFilter(String),

    /// A label policy name other than `exact` or `trim`
    #[error("invalid label policy {0:?}: expected exact or trim")]
    InvalidLabelPolicy(String),

    /// A configuration value that could not be parsed
    #[error("invalid value {value:?} for {key}")]
    InvalidConfig {
        /// Name of the setting
        key: &'static str,
        /// Raw value as provided
        value: String,
    },
}
