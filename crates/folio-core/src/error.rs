#![forbid(unsafe_code)]

//! Crate-level error type.

use std::fmt;

use crate::config::ConfigError;
use crate::flags::FlagError;

/// Any error `folio-core` can return.
#[derive(Debug)]
pub enum Error {
    Config(ConfigError),
    Flag(FlagError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "configuration error: {err}"),
            Self::Flag(err) => write!(f, "flag storage error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Flag(err) => Some(err),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<FlagError> for Error {
    fn from(err: FlagError) -> Self {
        Self::Flag(err)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
