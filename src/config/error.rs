//! Configuration error types.

use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Port value is outside valid range (1-65535).
    #[error("invalid port '{value}': must be between 1 and 65535")]
    InvalidPort { value: String },

    /// Port string could not be parsed as a number.
    #[error("failed to parse port '{value}': {source}")]
    PortParseError {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// Bind address string could not be parsed.
    #[error("failed to parse bind address '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    /// A numeric setting could not be parsed as a float.
    #[error("failed to parse {name}='{value}': {source}")]
    FloatParseError {
        name: &'static str,
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    /// Score bounds are not finite or not strictly ordered.
    #[error("invalid score range [{min}, {max}]: bounds must be finite and min < max")]
    InvalidScoreRange { min: f64, max: f64 },

    /// Low-quality threshold is not a finite number.
    #[error("invalid low-quality threshold {value}: must be finite")]
    InvalidThreshold { value: f64 },

    /// Completion timeout is zero or not an integer number of seconds.
    #[error("invalid completion timeout '{value}': must be a positive number of seconds")]
    InvalidTimeout { value: String },
}
