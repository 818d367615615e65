#![warn(missing_docs)]
//! The fixed set of symbols every dispersion formula is written in.
//!
//! All media share the same four variables. A symbol is identified by its name only, so two
//! formulas referring to [`Symbol::Wavelength`] always refer to the same physical quantity and
//! differentiation or substitution across formulas is consistent.
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::expr::Expr;

/// Number of symbols, i.e. the number of arguments of every compiled evaluator.
pub const SYMBOL_COUNT: usize = 4;

/// A named variable of a dispersion formula.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    Display,
)]
pub enum Symbol {
    /// vacuum wavelength in µm
    #[strum(serialize = "wl")]
    Wavelength,
    /// polar angle between wave vector and z axis in rad
    #[strum(serialize = "theta")]
    Theta,
    /// azimuthal angle between wave vector projection and x axis in rad
    #[strum(serialize = "phi")]
    Phi,
    /// crystal temperature in °C
    #[strum(serialize = "T")]
    Temperature,
}

impl Symbol {
    /// All symbols in evaluator argument order `(wl, theta, phi, T)`.
    pub const ALL: [Self; SYMBOL_COUNT] =
        [Self::Wavelength, Self::Theta, Self::Phi, Self::Temperature];

    /// Position of this symbol in the argument list of a compiled evaluator.
    #[must_use]
    pub const fn position(self) -> usize {
        match self {
            Self::Wavelength => 0,
            Self::Theta => 1,
            Self::Phi => 2,
            Self::Temperature => 3,
        }
    }
    /// Canonical name of the symbol as used in formula texts.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Wavelength => "wl",
            Self::Theta => "theta",
            Self::Phi => "phi",
            Self::Temperature => "T",
        }
    }
    /// Create an expression consisting of this symbol only.
    #[must_use]
    pub fn expr(self) -> Expr {
        Expr::symbol(self)
    }
}

/// The wavelength symbol as expression.
#[must_use]
pub fn wl() -> Expr {
    Symbol::Wavelength.expr()
}
/// The polar angle symbol as expression.
#[must_use]
pub fn theta() -> Expr {
    Symbol::Theta.expr()
}
/// The azimuthal angle symbol as expression.
#[must_use]
pub fn phi() -> Expr {
    Symbol::Phi.expr()
}
/// The temperature symbol as expression.
#[must_use]
pub fn temperature() -> Expr {
    Symbol::Temperature.expr()
}
