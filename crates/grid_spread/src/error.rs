//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. The
//! pattern engine itself never fails; errors only surface at the configuration boundary
//! (grid construction, parameter validation, name parsing).
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid grid: {0}")]
    InvalidGrid(String),

    #[error("unknown pattern '{name}'")]
    UnknownPattern { name: String },

    #[error("unknown channel '{name}'")]
    UnknownChannel { name: String },

    #[error("{0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}
