//! Error types for sthana-park.
//!
//! Nothing in the per-tick path fails: detection and scoring anomalies degrade to
//! logged no-ops. Errors only exist at the edges, when a configuration is loaded
//! or when a raw policy action is decoded.

use thiserror::Error;

/// Failure while loading or validating a [`ParkConfig`](crate::config::ParkConfig).
#[derive(Error, Debug)]
pub enum ConfigLoadError {
    /// Config file could not be read.
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid YAML for the expected schema.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Config parsed but holds an unusable value.
    #[error("Invalid config value `{field}`: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl ConfigLoadError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Failure while decoding a discrete policy action.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionError {
    /// Action index is not one of the five movement commands.
    #[error("Action index {0} is outside 0..=4")]
    OutOfRange(i32),
}

/// Crate-level error.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration could not be loaded or failed validation.
    #[error(transparent)]
    Config(#[from] ConfigLoadError),

    /// Policy action could not be decoded.
    #[error(transparent)]
    Action(#[from] ActionError),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
