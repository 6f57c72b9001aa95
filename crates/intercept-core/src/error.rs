//! Error types.
//!
//! Setup failures are fatal and surface from fallible constructors. Invalid
//! requests during play (firing from an empty launcher, selecting a destroyed
//! one) are not errors at all; they are ignored and logged at `debug`.

use thiserror::Error;

/// Errors raised by configuration loading, validation and page navigation.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A collaborator the simulation cannot run without is absent.
    #[error("missing required {0}")]
    MissingReference(&'static str),

    /// A configuration value is out of range or inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// An explicitly invalid index or argument was requested.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Reading a configuration file failed.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing a configuration document failed.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Convenience alias for results in this crate.
pub type Result<T> = std::result::Result<T, CoreError>;
