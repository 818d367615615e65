#![warn(missing_docs)]
//! Derived dispersion quantities.
//!
//! Every quantity that can be requested from a [`Medium`](crate::medium::Medium) is a
//! [`QuantityKind`]. Each kind maps (through a static table, see [`QuantityKind::rule`]) to a
//! function building the symbolic expression of the quantity from the index expression
//! `n(wl, theta, phi, T)` of one polarization branch.
//!
//! Units: wavelength in µm, angles in rad, temperature in °C. Group delay is reported in fs/mm,
//! group velocity in µm/fs, GVD in fs²/mm and TOD in fs³/mm.
use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use uom::si::{
    f64::{Time, Velocity},
    length::micrometer,
    time::femtosecond,
    velocity::meter_per_second,
};

use crate::{
    error::{DispersionError, NdResult},
    expr::Expr,
    symbol::{wl, Symbol},
};

/// Speed of light in vacuum (SI, m/s).
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;

/// Highest supported order of a plain wavelength derivative `d^k n / d wl^k`.
pub const MAX_WAVELENGTH_ORDER: u8 = 3;

/// Conversion from "per µm" of crystal length to "per mm".
const PER_MM: f64 = 1e3;

/// Speed of light in µm/fs, the natural unit for wavelengths in µm.
#[must_use]
pub fn speed_of_light() -> f64 {
    let c = Velocity::new::<meter_per_second>(SPEED_OF_LIGHT);
    (c * Time::new::<femtosecond>(1.0)).get::<micrometer>()
}

/// Signature of a derivative rule: builds the expression of a quantity from the index expression
/// and the requested order.
pub type DerivativeRule = fn(&Expr, u8) -> Expr;

/// The quantities derivable from an index expression.
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
pub enum QuantityKind {
    /// refractive index `n`
    #[strum(serialize = "n")]
    Index,
    /// plain wavelength derivative `d^k n / d wl^k` (1/µm^k)
    #[strum(serialize = "dn_wl")]
    WavelengthDerivative,
    /// group delay (fs/mm)
    #[strum(serialize = "gd")]
    GroupDelay,
    /// group velocity (µm/fs)
    #[strum(serialize = "gv")]
    GroupVelocity,
    /// group index
    #[strum(serialize = "ng")]
    GroupIndex,
    /// group velocity dispersion (fs²/mm)
    #[strum(serialize = "gvd")]
    Gvd,
    /// third order dispersion (fs³/mm)
    #[strum(serialize = "tod")]
    Tod,
    /// polar walk-off angle (rad)
    #[strum(serialize = "woa_theta")]
    WalkOffTheta,
    /// azimuthal walk-off angle (rad)
    #[strum(serialize = "woa_phi")]
    WalkOffPhi,
    /// thermo-optic coefficient `dn/dT` (1/°C)
    #[strum(serialize = "dndT")]
    ThermoOptic,
}

impl QuantityKind {
    /// The derivative order implied by this kind, used as part of the cache key.
    ///
    /// For [`QuantityKind::WavelengthDerivative`] the order is chosen by the caller; `1` is
    /// returned as default.
    #[must_use]
    pub const fn implied_order(self) -> u8 {
        match self {
            Self::Index => 0,
            Self::WavelengthDerivative
            | Self::GroupDelay
            | Self::GroupVelocity
            | Self::GroupIndex
            | Self::WalkOffTheta
            | Self::WalkOffPhi
            | Self::ThermoOptic => 1,
            Self::Gvd => 2,
            Self::Tod => 3,
        }
    }
    /// The angle a walk-off kind is taken with respect to.
    #[must_use]
    pub const fn walk_off_angle(self) -> Option<Symbol> {
        match self {
            Self::WalkOffTheta => Some(Symbol::Theta),
            Self::WalkOffPhi => Some(Symbol::Phi),
            _ => None,
        }
    }
    /// Physical unit of the quantity.
    #[must_use]
    pub const fn unit(self) -> &'static str {
        match self {
            Self::Index | Self::GroupIndex => "",
            Self::WavelengthDerivative => "1/µm^k",
            Self::GroupDelay => "fs/mm",
            Self::GroupVelocity => "µm/fs",
            Self::Gvd => "fs²/mm",
            Self::Tod => "fs³/mm",
            Self::WalkOffTheta | Self::WalkOffPhi => "rad",
            Self::ThermoOptic => "1/°C",
        }
    }
    /// Checks the requested order against the kind.
    ///
    /// # Errors
    ///
    /// This function returns [`DispersionError::UndefinedDerivative`] if a wavelength derivative
    /// of order `0` or above [`MAX_WAVELENGTH_ORDER`] is requested or if the order does not match
    /// the implied order of any other kind.
    pub fn check_order(self, order: u8) -> NdResult<()> {
        match self {
            Self::WavelengthDerivative if order == 0 || order > MAX_WAVELENGTH_ORDER => {
                Err(DispersionError::UndefinedDerivative(format!(
                    "wavelength derivative of order {order} is not defined \
                     (allowed: 1..={MAX_WAVELENGTH_ORDER})"
                )))
            }
            Self::WavelengthDerivative => Ok(()),
            _ if order != self.implied_order() => Err(DispersionError::UndefinedDerivative(
                format!("{self} has no derivative of order {order}"),
            )),
            _ => Ok(()),
        }
    }
    /// The derivative construction function of this kind.
    #[must_use]
    pub const fn rule(self) -> DerivativeRule {
        match self {
            Self::Index => index,
            Self::WavelengthDerivative => wavelength_derivative,
            Self::GroupDelay => group_delay,
            Self::GroupVelocity => group_velocity,
            Self::GroupIndex => group_index,
            Self::Gvd => gvd,
            Self::Tod => tod,
            Self::WalkOffTheta => walk_off_theta,
            Self::WalkOffPhi => walk_off_phi,
            Self::ThermoOptic => thermo_optic,
        }
    }
    /// Build the expression of this quantity from the index expression `n`.
    #[must_use]
    pub fn build(self, n: &Expr, order: u8) -> Expr {
        (self.rule())(n, order)
    }
}

/// The index expression itself.
#[must_use]
pub fn index(n: &Expr, _order: u8) -> Expr {
    n.clone()
}
/// `d^order n / d wl^order`
#[must_use]
pub fn wavelength_derivative(n: &Expr, order: u8) -> Expr {
    n.diff_n(Symbol::Wavelength, usize::from(order))
}
/// group index `n - wl dn/dwl`
#[must_use]
pub fn group_index(n: &Expr, _order: u8) -> Expr {
    n - &(wl() * n.diff(Symbol::Wavelength))
}
/// group delay `(n - wl dn/dwl) / c` in fs/mm
#[must_use]
pub fn group_delay(n: &Expr, order: u8) -> Expr {
    group_index(n, order) * (PER_MM / speed_of_light())
}
/// group velocity `c / n_g` in µm/fs
#[must_use]
pub fn group_velocity(n: &Expr, order: u8) -> Expr {
    speed_of_light() / group_index(n, order)
}
/// group velocity dispersion `wl³ / (2π c²) d²n/dwl²` in fs²/mm
#[must_use]
pub fn gvd(n: &Expr, _order: u8) -> Expr {
    let c = speed_of_light();
    let d2n = n.diff_n(Symbol::Wavelength, 2);
    wl().powi(3) * (PER_MM / (2.0 * PI * c * c)) * d2n
}
/// third order dispersion `-wl⁴ / (4π² c³) (3 d²n/dwl² + wl d³n/dwl³)` in fs³/mm
#[must_use]
pub fn tod(n: &Expr, _order: u8) -> Expr {
    let c = speed_of_light();
    let d2n = n.diff_n(Symbol::Wavelength, 2);
    let d3n = d2n.diff(Symbol::Wavelength);
    let scale = -PER_MM / (4.0 * PI * PI * c.powi(3));
    wl().powi(4) * scale * (3.0 * d2n + wl() * d3n)
}
fn walk_off(n: &Expr, angle: Symbol) -> Expr {
    (-(n.diff(angle) / n.clone())).atan()
}
/// polar walk-off angle `atan(-1/n dn/dtheta)` in rad
#[must_use]
pub fn walk_off_theta(n: &Expr, _order: u8) -> Expr {
    walk_off(n, Symbol::Theta)
}
/// azimuthal walk-off angle `atan(-1/n dn/dphi)` in rad
#[must_use]
pub fn walk_off_phi(n: &Expr, _order: u8) -> Expr {
    walk_off(n, Symbol::Phi)
}
/// thermo-optic coefficient `dn/dT` in 1/°C
#[must_use]
pub fn thermo_optic(n: &Expr, _order: u8) -> Expr {
    n.diff(Symbol::Temperature)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::symbol::{temperature, theta};
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    fn bbo_o() -> Expr {
        (2.7405 + 0.0184 / (wl().powi(2) - 0.0179) - 0.0155 * wl().powi(2)).sqrt()
            + -16.6e-6 * (temperature() - 20.0)
    }
    #[test]
    fn speed_of_light_in_um_per_fs() {
        assert_relative_eq!(speed_of_light(), 0.299_792_458, max_relative = 1e-12);
    }
    #[test]
    fn names() {
        for kind in QuantityKind::iter() {
            assert_eq!(QuantityKind::from_str(&kind.to_string()).unwrap(), kind);
        }
        assert_eq!(QuantityKind::from_str("gvd").unwrap(), QuantityKind::Gvd);
        assert!(QuantityKind::from_str("GVD2").is_err());
    }
    #[test]
    fn check_order() {
        assert!(QuantityKind::WavelengthDerivative.check_order(0).is_err());
        assert!(QuantityKind::WavelengthDerivative.check_order(1).is_ok());
        assert!(QuantityKind::WavelengthDerivative.check_order(3).is_ok());
        assert_eq!(
            QuantityKind::WavelengthDerivative.check_order(4),
            Err(DispersionError::UndefinedDerivative(
                "wavelength derivative of order 4 is not defined (allowed: 1..=3)".into()
            ))
        );
        for kind in QuantityKind::iter().filter(|k| *k != QuantityKind::WavelengthDerivative) {
            assert!(kind.check_order(kind.implied_order()).is_ok());
            assert!(kind.check_order(kind.implied_order() + 1).is_err());
        }
    }
    #[test]
    fn group_index_identity() {
        let n = bbo_o();
        let args = [0.8, 0.0, 0.0, 25.0];
        let ng = QuantityKind::GroupIndex.build(&n, 1).eval(&args);
        let dn = QuantityKind::WavelengthDerivative.build(&n, 1).eval(&args);
        assert_relative_eq!(ng, n.eval(&args) - 0.8 * dn, max_relative = 1e-12);
        let gv = QuantityKind::GroupVelocity.build(&n, 1).eval(&args);
        assert_relative_eq!(gv, speed_of_light() / ng, max_relative = 1e-12);
        let gd = QuantityKind::GroupDelay.build(&n, 1).eval(&args);
        assert_relative_eq!(gd, 1e3 / gv, max_relative = 1e-12);
    }
    #[test]
    fn bbo_gvd() {
        let gvd = QuantityKind::Gvd.build(&bbo_o(), 2);
        assert_relative_eq!(gvd.eval(&[0.8, 0.0, 0.0, 20.0]), 71.864, max_relative = 1e-4);
    }
    #[test]
    fn thermo_optic_of_linear_term() {
        let dndt = QuantityKind::ThermoOptic.build(&bbo_o(), 1);
        assert_abs_diff_eq!(dndt.as_number().unwrap(), -16.6e-6);
    }
    #[test]
    fn tod_of_dispersionless_formula_is_zero() {
        let n = 1.5 + 1e-5 * (temperature() - 20.0);
        assert!(QuantityKind::Tod.build(&n, 3).is_zero());
        assert!(QuantityKind::Gvd.build(&n, 2).is_zero());
    }
    #[test]
    fn walk_off_of_angle_free_formula_is_zero() {
        assert!(QuantityKind::WalkOffTheta.build(&bbo_o(), 1).is_zero());
        let n = bbo_o() + 0.01 * theta().sin().powi(2);
        assert!(!QuantityKind::WalkOffTheta.build(&n, 1).is_zero());
        assert!(QuantityKind::WalkOffPhi.build(&n, 1).is_zero());
    }
}
