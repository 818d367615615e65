#![warn(missing_docs)]
//! Dispersion formula families and the index ellipsoid.
//!
//! A [`Dispersion`] describes the principal refractive index of one axis (or of an isotropic
//! medium) by one of the supported closed-form families. The ellipsoid functions combine
//! principal indices into the angle dependent index of an extraordinary ray.
use std::{collections::BTreeMap, fmt::Display};

use serde::{Deserialize, Serialize};
use strum::{Display as StrumDisplay, EnumIter, EnumString};

use crate::{
    error::{DispersionError, NdResult},
    expr::Expr,
    lambdify::DEFAULT_TEMPERATURE,
    symbol::{phi, temperature, theta, wl},
};

/// Named numeric coefficients of one polarization branch (e.g. `A_o`, `B_o`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoefficientSet(BTreeMap<String, f64>);

impl CoefficientSet {
    /// Creates an empty coefficient set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// Insert a coefficient.
    pub fn insert(&mut self, name: &str, value: f64) {
        self.0.insert(name.to_owned(), value);
    }
    /// Returns the value of the given coefficient.
    ///
    /// # Errors
    ///
    /// This function returns an error if no coefficient with this name exists.
    pub fn get(&self, name: &str) -> NdResult<f64> {
        self.0
            .get(name)
            .copied()
            .ok_or_else(|| DispersionError::Other(format!("coefficient {name} not found")))
    }
    /// Iterate over all coefficients, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &f64)> {
        self.0.iter()
    }
    /// Number of coefficients.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
    /// Returns `true` if the set contains no coefficients.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    /// Merge another set into this one.
    pub fn extend(&mut self, other: &Self) {
        self.0
            .extend(other.0.iter().map(|(k, v)| (k.clone(), *v)));
    }
}
impl Display for CoefficientSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entries: Vec<String> = self.0.iter().map(|(k, v)| format!("{k} = {v}")).collect();
        write!(f, "{}", entries.join(", "))
    }
}

const fn default_reference() -> f64 {
    DEFAULT_TEMPERATURE
}

/// Wavelength and temperature dependent thermo-optic coefficient
///
/// `dn/dT = Σ_k w_k wl^k + Σ_k v_k wl^-k + t (T - T_ref)`
///
/// The index at `T` is the room temperature index plus the integral of `dn/dT` from `T_ref` to
/// `T`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThermoOptic {
    /// temperature at which the room temperature formula holds (°C)
    #[serde(default = "default_reference")]
    pub reference: f64,
    /// `w_k`, coefficients of `wl^k` for k = 0, 1, 2, ...
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub wavelength: Vec<f64>,
    /// `v_k`, coefficients of `wl^-k` for k = 1, 2, ...
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inverse_wavelength: Vec<f64>,
    /// `t`, linear temperature dependence of `dn/dT` (1/°C²)
    #[serde(default)]
    pub temperature: f64,
}

impl ThermoOptic {
    /// Index change `∫ dn/dT dT` between the reference temperature and `T`.
    #[must_use]
    pub fn index_shift(&self) -> Expr {
        let dt = temperature() - self.reference;
        let coefficient = self
            .wavelength
            .iter()
            .zip(0..)
            .fold(Expr::number(0.0), |sum, (w, k)| sum + *w * wl().powi(k));
        let coefficient = self
            .inverse_wavelength
            .iter()
            .zip(1..)
            .fold(coefficient, |sum, (v, k)| sum + *v / wl().powi(k));
        coefficient * dt.clone() + 0.5 * self.temperature * dt.powi(2)
    }
    fn coefficients(&self, suffix: &str, set: &mut CoefficientSet) {
        set.insert(&format!("Tref{suffix}"), self.reference);
        for (k, w) in self.wavelength.iter().enumerate() {
            set.insert(&format!("dndT_wl{k}{suffix}"), *w);
        }
        for (k, v) in self.inverse_wavelength.iter().enumerate() {
            set.insert(&format!("dndT_wl-{}{suffix}", k + 1), *v);
        }
        set.insert(&format!("dndT_T{suffix}"), self.temperature);
    }
}

/// Closed-form dispersion formula of a principal refractive index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum Dispersion {
    /// `n = sqrt(A + B/(wl² - C) - D wl²) + dn/dT (T - 20)`
    SellmeierThermo {
        /// constant term
        a: f64,
        /// pole strength
        b: f64,
        /// pole position (µm²)
        c: f64,
        /// infrared correction (1/µm²)
        d: f64,
        /// thermo-optic coefficient (1/°C)
        #[serde(default)]
        dn_dt: f64,
    },
    /// `n = sqrt(A + B/(wl² - C) - D wl²) + ∫ dn/dT dT`, with a wavelength and temperature
    /// dependent [`ThermoOptic`] coefficient
    SellmeierThermoPoly {
        /// constant term
        a: f64,
        /// pole strength
        b: f64,
        /// pole position (µm²)
        c: f64,
        /// infrared correction (1/µm²)
        d: f64,
        /// thermo-optic coefficient
        thermo: ThermoOptic,
    },
    /// `n = sqrt(A + B/(wl² - C) + D wl²/(wl² - E))`, an ultraviolet and an infrared pole
    SellmeierIr {
        /// constant term
        a: f64,
        /// ultraviolet pole strength
        b: f64,
        /// ultraviolet pole position (µm²)
        c: f64,
        /// infrared pole strength
        d: f64,
        /// infrared pole position (µm²)
        e: f64,
    },
    /// `n = sqrt(1 + Σ B_i wl² / (wl² - C_i))`
    Sellmeier {
        /// oscillator strengths
        b: [f64; 3],
        /// resonance wavelengths squared (µm²)
        c: [f64; 3],
    },
    /// wavelength independent index
    Constant {
        /// refractive index
        n: f64,
    },
}

impl Dispersion {
    /// Build the symbolic expression of this formula.
    #[must_use]
    pub fn expr(&self) -> Expr {
        match self {
            Self::SellmeierThermo { a, b, c, d, dn_dt } => {
                let wl2 = wl().powi(2);
                (*a + *b / (wl2.clone() - *c) - *d * wl2).sqrt()
                    + *dn_dt * (temperature() - DEFAULT_TEMPERATURE)
            }
            Self::SellmeierThermoPoly { a, b, c, d, thermo } => {
                let wl2 = wl().powi(2);
                (*a + *b / (wl2.clone() - *c) - *d * wl2).sqrt() + thermo.index_shift()
            }
            Self::SellmeierIr { a, b, c, d, e } => {
                let wl2 = wl().powi(2);
                (*a + *b / (wl2.clone() - *c) + *d * wl2.clone() / (wl2 - *e)).sqrt()
            }
            Self::Sellmeier { b, c } => {
                let wl2 = wl().powi(2);
                b.iter()
                    .zip(c.iter())
                    .fold(Expr::number(1.0), |sum, (b, c)| {
                        sum + *b * wl2.clone() / (wl2.clone() - *c)
                    })
                    .sqrt()
            }
            Self::Constant { n } => Expr::number(*n),
        }
    }
    /// The coefficients of this formula, each name carrying the given suffix (e.g. `_o`).
    #[must_use]
    pub fn coefficients(&self, suffix: &str) -> CoefficientSet {
        let mut set = CoefficientSet::new();
        match self {
            Self::SellmeierThermo { a, b, c, d, dn_dt } => {
                for (name, value) in [("A", a), ("B", b), ("C", c), ("D", d), ("dndT", dn_dt)] {
                    set.insert(&format!("{name}{suffix}"), *value);
                }
            }
            Self::SellmeierThermoPoly { a, b, c, d, thermo } => {
                for (name, value) in [("A", a), ("B", b), ("C", c), ("D", d)] {
                    set.insert(&format!("{name}{suffix}"), *value);
                }
                thermo.coefficients(suffix, &mut set);
            }
            Self::SellmeierIr { a, b, c, d, e } => {
                for (name, value) in [("A", a), ("B", b), ("C", c), ("D", d), ("E", e)] {
                    set.insert(&format!("{name}{suffix}"), *value);
                }
            }
            Self::Sellmeier { b, c } => {
                for (i, (b, c)) in b.iter().zip(c.iter()).enumerate() {
                    set.insert(&format!("B{}{suffix}", i + 1), *b);
                    set.insert(&format!("C{}{suffix}", i + 1), *c);
                }
            }
            Self::Constant { n } => set.insert(&format!("n{suffix}"), *n),
        }
        set
    }
    /// Generic text form of the formula family.
    #[must_use]
    pub const fn text(&self) -> &'static str {
        match self {
            Self::SellmeierThermo { .. } => {
                "n(wl, T) = sqrt(A + B/(wl**2 - C) - D*wl**2) + dndT*(T - 20)"
            }
            Self::SellmeierThermoPoly { .. } => {
                "n(wl, T) = sqrt(A + B/(wl**2 - C) - D*wl**2) + integral(dndT, Tref..T), \
                 dndT = sum_k dndT_wlk*wl**k + dndT_T*(T - Tref)"
            }
            Self::SellmeierIr { .. } => "n(wl) = sqrt(A + B/(wl**2 - C) + D*wl**2/(wl**2 - E))",
            Self::Sellmeier { .. } => "n(wl) = sqrt(1 + sum_i B_i*wl**2/(wl**2 - C_i)), i = 1..3",
            Self::Constant { .. } => "n = const",
        }
    }
    /// Checks the coefficients for values which cannot describe a physical medium.
    ///
    /// # Errors
    ///
    /// This function returns a [`DispersionError::Config`] if a coefficient is not finite or a
    /// constant index is below 1.
    pub fn validate(&self) -> NdResult<()> {
        let values: Vec<f64> = self.coefficients("").iter().map(|(_, v)| *v).collect();
        if values.iter().any(|v| !v.is_finite()) {
            return Err(DispersionError::Config(
                "dispersion coefficients must be finite".into(),
            ));
        }
        if let Self::Constant { n } = self {
            if *n < 1.0 {
                return Err(DispersionError::Config(format!(
                    "constant refractive index must be >= 1, got {n}"
                )));
            }
        }
        Ok(())
    }
}

/// Principal planes of a biaxial crystal.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    StrumDisplay,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PrincipalPlane {
    /// wave vector in the xy plane (θ = π/2), angle φ
    Xy,
    /// wave vector in the yz plane (φ = π/2), angle θ
    Yz,
    /// wave vector in the zx plane (φ = 0), angle θ
    Zx,
}

impl PrincipalPlane {
    /// The angle that is fixed by the plane as `(theta, phi)`; the other one is variable.
    #[must_use]
    pub const fn fixed_angles(self) -> (Option<f64>, Option<f64>) {
        match self {
            Self::Xy => (Some(std::f64::consts::FRAC_PI_2), None),
            Self::Yz => (None, Some(std::f64::consts::FRAC_PI_2)),
            Self::Zx => (None, Some(0.0)),
        }
    }
    /// Ordinary and extraordinary index expressions in this plane from the principal indices.
    ///
    /// The ordinary ray is polarized along the axis normal to the plane.
    #[must_use]
    pub fn indices(self, nx: &Expr, ny: &Expr, nz: &Expr) -> (Expr, Expr) {
        match self {
            Self::Xy => (nz.clone(), ellipse(nx, ny, &phi())),
            Self::Yz => (nx.clone(), ellipse(nz, ny, &theta())),
            Self::Zx => (ny.clone(), ellipse(nz, nx, &theta())),
        }
    }
}

/// Index of a ray in the plane of the axes `a` and `b` at `angle` from `a`:
/// `n_a n_b / sqrt(n_a² cos² + n_b² sin²)`.
fn ellipse(na: &Expr, nb: &Expr, angle: &Expr) -> Expr {
    let cos2 = angle.clone().cos().powi(2);
    let sin2 = angle.clone().sin().powi(2);
    na * nb / (na.clone().powi(2) * cos2 + nb.clone().powi(2) * sin2).sqrt()
}

/// Extraordinary index of a uniaxial crystal at angle θ to the optic axis:
/// `n_e(θ) = n_E / sqrt(sin²θ + (n_E/n_O)² cos²θ)`.
///
/// At θ = 0 this reduces to the ordinary index.
#[must_use]
pub fn uniaxial_extraordinary(no: &Expr, ne: &Expr) -> Expr {
    let ratio = (ne / no).powi(2);
    ne.clone() / (theta().sin().powi(2) + ratio * theta().cos().powi(2)).sqrt()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::symbol::Symbol;
    use approx::assert_relative_eq;
    use assert_matches::assert_matches;
    use std::f64::consts::FRAC_PI_2;

    fn bbo() -> (Dispersion, Dispersion) {
        (
            Dispersion::SellmeierThermo {
                a: 2.7405,
                b: 0.0184,
                c: 0.0179,
                d: 0.0155,
                dn_dt: -16.6e-6,
            },
            Dispersion::SellmeierThermo {
                a: 2.3730,
                b: 0.0128,
                c: 0.0156,
                d: 0.0044,
                dn_dt: -9.3e-6,
            },
        )
    }
    #[test]
    fn sellmeier_thermo() {
        let (o, _) = bbo();
        assert_relative_eq!(o.expr().eval(&[0.532, 0.0, 0.0, 25.0]), 1.674_884, epsilon = 1e-6);
    }
    #[test]
    fn sellmeier() {
        let silica = Dispersion::Sellmeier {
            b: [0.696_166_3, 0.407_942_6, 0.897_479_4],
            c: [0.068_404_3_f64.powi(2), 0.116_241_4_f64.powi(2), 9.896_161_f64.powi(2)],
        };
        let n = silica.expr();
        assert!(!n.depends_on(Symbol::Temperature));
        assert_relative_eq!(n.eval(&[0.8, 0.0, 0.0, 20.0]), 1.453_317, epsilon = 1e-6);
    }
    #[test]
    fn wavelength_dependent_thermo_optic() {
        let clbo = Dispersion::SellmeierThermoPoly {
            a: 2.2104,
            b: 0.01018,
            c: 0.01424,
            d: 0.01258,
            thermo: ThermoOptic {
                reference: 20.0,
                wavelength: vec![-12.48e-6],
                inverse_wavelength: vec![-0.328e-6],
                temperature: 0.0,
            },
        };
        let n = clbo.expr();
        assert_relative_eq!(n.eval(&[0.532, 0.0, 0.0, 20.0]), 1.498_236_9, epsilon = 1e-7);
        assert_relative_eq!(n.eval(&[0.532, 0.0, 0.0, 120.0]), 1.496_927_3, epsilon = 1e-7);
        let set = clbo.coefficients("_o");
        assert_eq!(set.get("dndT_wl-1_o").unwrap(), -0.328e-6);
        assert_eq!(set.get("Tref_o").unwrap(), 20.0);
    }
    #[test]
    fn quadratic_temperature_dependence() {
        let thermo = ThermoOptic {
            reference: 25.0,
            wavelength: vec![1e-5],
            inverse_wavelength: vec![],
            temperature: -2e-8,
        };
        let shift = thermo.index_shift();
        assert_eq!(shift.eval(&[0.5, 0.0, 0.0, 25.0]), 0.0);
        assert_relative_eq!(
            shift.eval(&[0.5, 0.0, 0.0, 45.0]),
            1e-5 * 20.0 - 1e-8 * 400.0,
            max_relative = 1e-12
        );
    }
    #[test]
    fn infrared_pole() {
        let kdp = Dispersion::SellmeierIr {
            a: 2.259_276,
            b: 0.010_089_56,
            c: 0.012_942_625,
            d: 13.005_22,
            e: 400.0,
        };
        assert_relative_eq!(kdp.expr().eval(&[1.064, 0.0, 0.0, 20.0]), 1.493_780_1, epsilon = 1e-7);
        assert_eq!(kdp.coefficients("").len(), 5);
        let yaml = serde_yaml::to_string(&kdp).unwrap();
        assert!(yaml.contains("family: sellmeier_ir"));
    }
    #[test]
    fn coefficients() {
        let (o, _) = bbo();
        let set = o.coefficients("_o");
        assert_eq!(set.len(), 5);
        assert_eq!(set.get("A_o").unwrap(), 2.7405);
        assert_eq!(set.get("dndT_o").unwrap(), -16.6e-6);
        assert!(set.get("A_e").is_err());
        let c = Dispersion::Constant { n: 1.5 }.coefficients("");
        assert_eq!(format!("{c}"), "n = 1.5");
    }
    #[test]
    fn validate() {
        assert!(bbo().0.validate().is_ok());
        assert_matches!(
            Dispersion::Constant { n: 0.5 }.validate(),
            Err(DispersionError::Config(_))
        );
        assert_matches!(
            Dispersion::Constant { n: f64::NAN }.validate(),
            Err(DispersionError::Config(_))
        );
    }
    #[test]
    fn uniaxial_zero_angle() {
        let (o, e) = bbo();
        let (no, ne) = (o.expr(), e.expr());
        let ne_theta = uniaxial_extraordinary(&no, &ne);
        let args = [0.532, 0.0, 0.0, 25.0];
        assert_relative_eq!(ne_theta.eval(&args), no.eval(&args), max_relative = 1e-14);
        let args = [0.532, FRAC_PI_2, 0.0, 25.0];
        assert_relative_eq!(ne_theta.eval(&args), 1.555_466, epsilon = 1e-6);
    }
    #[test]
    fn principal_planes() {
        let (nx, ny, nz) = (Expr::number(1.7), Expr::number(1.8), Expr::number(1.9));
        let (o, e) = PrincipalPlane::Xy.indices(&nx, &ny, &nz);
        assert_eq!(o.as_number(), Some(1.9));
        assert_relative_eq!(e.eval(&[1.0, 0.0, 0.0, 20.0]), 1.8, max_relative = 1e-12);
        assert_relative_eq!(e.eval(&[1.0, 0.0, FRAC_PI_2, 20.0]), 1.7, max_relative = 1e-12);
        let (o, e) = PrincipalPlane::Yz.indices(&nx, &ny, &nz);
        assert_eq!(o.as_number(), Some(1.7));
        assert_relative_eq!(e.eval(&[1.0, 0.0, 0.0, 20.0]), 1.8, max_relative = 1e-12);
        assert_relative_eq!(e.eval(&[1.0, FRAC_PI_2, 0.0, 20.0]), 1.9, max_relative = 1e-12);
        let (o, e) = PrincipalPlane::Zx.indices(&nx, &ny, &nz);
        assert_eq!(o.as_number(), Some(1.8));
        assert_relative_eq!(e.eval(&[1.0, 0.0, 0.0, 20.0]), 1.7, max_relative = 1e-12);
        assert_relative_eq!(e.eval(&[1.0, FRAC_PI_2, 0.0, 20.0]), 1.9, max_relative = 1e-12);
        assert!(!e.depends_on(Symbol::Phi));
    }
    #[test]
    fn plane_names() {
        assert_eq!(PrincipalPlane::Zx.to_string(), "zx");
        assert_eq!("yz".parse::<PrincipalPlane>().unwrap(), PrincipalPlane::Yz);
    }
}
