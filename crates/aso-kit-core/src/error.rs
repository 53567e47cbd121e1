//! Error types for aso-kit-core.
//!
//! The keyword engine itself is total over its inputs and never returns an
//! error. Only the edges that touch configuration and record text can fail.

use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),

    /// Configuration file not found after searching all locations.
    #[error("no configuration file found")]
    NotFound,

    /// A policy table holds a value the engine cannot work with.
    #[error("invalid policy value for `{field}`: {reason}")]
    InvalidPolicy {
        /// Dotted path of the offending setting (e.g. `priority.high_cutoff`).
        field: String,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur when reading an app record.
#[derive(Error, Debug)]
pub enum RecordError {
    /// The record text could not be parsed into an app record.
    #[error("invalid app record: {0}")]
    Parse(#[from] Box<figment::Error>),

    /// The record format could not be determined from the file extension.
    #[error("unsupported record format: {0}. Use: toml, yaml, yml, json")]
    UnsupportedFormat(String),
}

/// Result type alias using [`RecordError`].
pub type RecordResult<T> = Result<T, RecordError>;
