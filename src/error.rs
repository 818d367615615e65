#![warn(missing_docs)]
//! ndispers specific error structures
use std::{error::Error, fmt::Display};

/// ndispers specific Result type
pub type NdResult<T> = std::result::Result<T, DispersionError>;

/// Errors that can be returned by the dispersion functions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispersionError {
    /// the requested polarization / quantity combination has no formula for this medium (e.g. an
    /// extraordinary ray in a glass or the walk-off angle of an ordinary ray)
    UnsupportedPolarization(String),
    /// wavelength, angle and temperature inputs cannot be broadcast to a common shape
    ShapeMismatch(String),
    /// a derivative order that has no meaning for the dispersion formula
    UndefinedDerivative(String),
    /// errors while reading or validating a medium configuration
    Config(String),
    /// errors concerning the command line interface
    Console(String),
    /// errors not falling in one of the categories above
    Other(String),
}

impl Display for DispersionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedPolarization(m) => {
                write!(f, "UnsupportedPolarization:{m}")
            }
            Self::ShapeMismatch(m) => {
                write!(f, "ShapeMismatch:{m}")
            }
            Self::UndefinedDerivative(m) => {
                write!(f, "UndefinedDerivative:{m}")
            }
            Self::Config(m) => {
                write!(f, "Config:{m}")
            }
            Self::Console(m) => {
                write!(f, "Console:{m}")
            }
            Self::Other(m) => write!(f, "ndispers Error:Other:{m}"),
        }
    }
}
impl Error for DispersionError {}

impl std::convert::From<String> for DispersionError {
    fn from(msg: String) -> Self {
        Self::Other(msg)
    }
}
