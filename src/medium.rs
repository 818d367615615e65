#![warn(missing_docs)]
//! The user facing medium object.
//!
//! A [`Medium`] bundles the dispersion formulas of an optical medium (one per polarization
//! branch), its descriptive metadata and an [`EvaluatorCache`]. All quantity methods
//! ([`Medium::n`], [`Medium::gvd`], [`Medium::woa_theta`], ...) resolve a [`DerivativeKey`],
//! compile the corresponding derivative on the first call and evaluate it on the given
//! [`Inputs`].
//!
//! ```
//! use ndarray::IxDyn;
//! use ndispers::{Catalog, Inputs, Polarization};
//!
//! let bbo = Catalog::BetaBboEimerl1987.medium().unwrap();
//! let n = bbo.n(&Inputs::new(0.532).temperature(25.0), Polarization::Ordinary).unwrap();
//! assert!((n[IxDyn(&[])] - 1.6749).abs() < 1e-3);
//! ```
use std::{fmt::Display, ops::Range, sync::Arc};

use log::warn;
use ndarray::ArrayD;
use serde::{Deserialize, Serialize};
use strum::{Display as StrumDisplay, EnumIter, EnumString};
use uom::si::f64::Length;

use crate::{
    cache::{DerivativeKey, EvaluatorCache},
    derivative::QuantityKind,
    error::{DispersionError, NdResult},
    expr::Expr,
    formula::{CoefficientSet, PrincipalPlane},
    lambdify::{Inputs, DEFAULT_TEMPERATURE},
    symbol::Symbol,
    utils::unit_format::format_wavelength_range,
};

/// Polarization eigenmode of a ray.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    StrumDisplay,
)]
pub enum Polarization {
    /// ordinary ray
    #[default]
    #[serde(rename = "o")]
    #[strum(serialize = "o")]
    Ordinary,
    /// extraordinary ray
    #[serde(rename = "e")]
    #[strum(serialize = "e")]
    Extraordinary,
}

/// How a propagation angle enters the formulas of a medium.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AngleSpec {
    /// the formulas depend on the angle
    Variable,
    /// the formulas do not depend on the angle; any value may be given
    Arbitrary,
    /// the angle is fixed to the given value (rad); given values are ignored
    Fixed(f64),
}

impl Display for AngleSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Variable => write!(f, "variable"),
            Self::Arbitrary => write!(f, "arbitrary"),
            Self::Fixed(v) => write!(f, "fixed to {v} rad"),
        }
    }
}

/// Propagation geometry of a medium.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Angles {
    /// principal plane of a biaxial crystal
    pub plane: Option<PrincipalPlane>,
    /// polar angle θ
    pub theta: AngleSpec,
    /// azimuthal angle φ
    pub phi: AngleSpec,
}

impl Angles {
    /// Both angles arbitrary (isotropic media).
    #[must_use]
    pub const fn arbitrary() -> Self {
        Self {
            plane: None,
            theta: AngleSpec::Arbitrary,
            phi: AngleSpec::Arbitrary,
        }
    }
    /// Variable θ, arbitrary φ (uniaxial crystals).
    #[must_use]
    pub const fn uniaxial() -> Self {
        Self {
            plane: None,
            theta: AngleSpec::Variable,
            phi: AngleSpec::Arbitrary,
        }
    }
    /// Geometry of a biaxial principal plane.
    #[must_use]
    pub const fn principal_plane(plane: PrincipalPlane) -> Self {
        let (theta, phi) = plane.fixed_angles();
        Self {
            plane: Some(plane),
            theta: match theta {
                Some(v) => AngleSpec::Fixed(v),
                None => AngleSpec::Variable,
            },
            phi: match phi {
                Some(v) => AngleSpec::Fixed(v),
                None => AngleSpec::Variable,
            },
        }
    }
    fn apply(&self, expr: &Expr) -> Expr {
        let mut expr = expr.clone();
        if let AngleSpec::Fixed(v) = self.theta {
            expr = expr.subs(Symbol::Theta, v);
        }
        if let AngleSpec::Fixed(v) = self.phi {
            expr = expr.subs(Symbol::Phi, v);
        }
        expr
    }
}

impl Display for Angles {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(plane) = self.plane {
            write!(f, "plane {plane}, ")?;
        }
        write!(f, "theta {}, phi {}", self.theta, self.phi)
    }
}

/// Static, descriptive information about a medium.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediumInfo {
    /// unique identifier, also used as cache key
    pub id: String,
    /// full name
    pub name: String,
    /// crystallographic point group
    pub point_group: Option<String>,
    /// crystal system
    pub crystal_system: Option<String>,
    /// orientation of the dielectric principal axes
    pub axes: Option<String>,
    /// transparency range
    pub transparency: Option<Range<Length>>,
    /// wavelength range in which the dispersion formula is valid
    pub validity: Option<Range<Length>>,
    /// dispersion formula as text
    pub formula: String,
    /// literature references
    pub references: Vec<String>,
}

impl Display for MediumInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} ({})", self.name, self.id)?;
        let optional = [
            ("point group", self.point_group.clone()),
            ("crystal system", self.crystal_system.clone()),
            ("axes", self.axes.clone()),
            (
                "transparency",
                self.transparency.as_ref().map(format_wavelength_range),
            ),
            (
                "validity",
                self.validity.as_ref().map(format_wavelength_range),
            ),
        ];
        for (label, value) in optional {
            if let Some(value) = value {
                writeln!(f, "  {label:<15}: {value}")?;
            }
        }
        writeln!(f, "  {:<15}: {}", "formula", self.formula)?;
        if !self.references.is_empty() {
            writeln!(f, "  references:")?;
            for reference in &self.references {
                writeln!(f, "    - {reference}")?;
            }
        }
        Ok(())
    }
}

/// Dispersion formula of one polarization branch.
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    coefficients: CoefficientSet,
    expr: Expr,
    fingerprint: u64,
}

impl Formula {
    /// Creates a new [`Formula`].
    #[must_use]
    pub fn new(coefficients: CoefficientSet, expr: Expr) -> Self {
        let fingerprint = expr.fingerprint();
        Self {
            coefficients,
            expr,
            fingerprint,
        }
    }
    /// The numeric coefficients the expression was built from.
    #[must_use]
    pub const fn coefficients(&self) -> &CoefficientSet {
        &self.coefficients
    }
    /// The symbolic index expression.
    #[must_use]
    pub const fn expr(&self) -> &Expr {
        &self.expr
    }
    /// Structural hash of the expression, part of every cache key derived from this formula.
    #[must_use]
    pub const fn fingerprint(&self) -> u64 {
        self.fingerprint
    }
    fn with_angles(&self, angles: &Angles) -> Self {
        Self::new(self.coefficients.clone(), angles.apply(&self.expr))
    }
}

/// An optical medium with its dispersion formulas.
///
/// A medium is immutable after construction. It is `Send + Sync` and can be shared between
/// threads; the cache is the only shared mutable state.
#[derive(Debug, Clone)]
pub struct Medium {
    info: MediumInfo,
    ordinary: Formula,
    extraordinary: Option<Formula>,
    angles: Angles,
    cache: Arc<EvaluatorCache>,
}

impl Medium {
    /// Creates a new medium with an ordinary (or isotropic) formula only and arbitrary angles.
    #[must_use]
    pub fn new(info: MediumInfo, ordinary: Formula) -> Self {
        check_formula(&info, Polarization::Ordinary, &ordinary);
        Self {
            info,
            ordinary,
            extraordinary: None,
            angles: Angles::arbitrary(),
            cache: Arc::new(EvaluatorCache::new()),
        }
    }
    /// Add the formula of the extraordinary branch.
    ///
    /// The medium gets a new, empty cache; evaluators compiled for the previous formulas are not
    /// reused.
    #[must_use]
    pub fn with_extraordinary(mut self, extraordinary: Formula) -> Self {
        check_formula(&self.info, Polarization::Extraordinary, &extraordinary);
        self.extraordinary = Some(extraordinary);
        self.cache = Arc::new(EvaluatorCache::new());
        self
    }
    /// Set the propagation geometry. Fixed angles are substituted into the formulas.
    ///
    /// The medium gets a new, empty cache, like [`Medium::with_extraordinary`].
    #[must_use]
    pub fn with_angles(mut self, angles: Angles) -> Self {
        self.ordinary = self.ordinary.with_angles(&angles);
        self.extraordinary = self.extraordinary.map(|e| e.with_angles(&angles));
        self.angles = angles;
        self.cache = Arc::new(EvaluatorCache::new());
        self
    }
    /// Use the given (possibly shared) cache instead of a private one.
    ///
    /// Cache keys include the formula fingerprint, so media with equal identifiers but
    /// different formulas can share a cache.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<EvaluatorCache>) -> Self {
        self.cache = cache;
        self
    }
    /// Unique identifier of this medium.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.info.id
    }
    /// Descriptive metadata.
    #[must_use]
    pub const fn help(&self) -> &MediumInfo {
        &self.info
    }
    /// Propagation geometry (principal plane, fixed or variable angles).
    #[must_use]
    pub const fn angles(&self) -> &Angles {
        &self.angles
    }
    /// All coefficients of the medium (of both polarization branches).
    #[must_use]
    pub fn constants(&self) -> CoefficientSet {
        let mut set = self.ordinary.coefficients.clone();
        if let Some(e) = &self.extraordinary {
            set.extend(&e.coefficients);
        }
        set
    }
    /// The polarization branches this medium defines.
    #[must_use]
    pub fn polarizations(&self) -> Vec<Polarization> {
        if self.extraordinary.is_some() {
            vec![Polarization::Ordinary, Polarization::Extraordinary]
        } else {
            vec![Polarization::Ordinary]
        }
    }
    /// The formula of the given branch.
    ///
    /// # Errors
    ///
    /// This function returns [`DispersionError::UnsupportedPolarization`] if the medium has no
    /// extraordinary branch.
    pub fn formula(&self, polarization: Polarization) -> NdResult<&Formula> {
        match polarization {
            Polarization::Ordinary => Ok(&self.ordinary),
            Polarization::Extraordinary => self.extraordinary.as_ref().ok_or_else(|| {
                DispersionError::UnsupportedPolarization(format!(
                    "{} does not define an extraordinary ray",
                    self.info.id
                ))
            }),
        }
    }
    /// The shared evaluator cache.
    #[must_use]
    pub const fn cache(&self) -> &Arc<EvaluatorCache> {
        &self.cache
    }
    /// Drop all compiled evaluators of the cache.
    pub fn clear(&self) {
        self.cache.clear();
    }
    /// The cache key of a quantity of the given order.
    ///
    /// # Errors
    ///
    /// This function returns [`DispersionError::UnsupportedPolarization`] if the medium has no
    /// extraordinary branch.
    pub fn key(
        &self,
        kind: QuantityKind,
        order: u8,
        polarization: Polarization,
    ) -> NdResult<DerivativeKey> {
        let formula = self.formula(polarization)?;
        Ok(DerivativeKey::new(
            &self.info.id,
            formula.fingerprint,
            polarization,
            kind,
            order,
        ))
    }
    /// Evaluate a quantity of the given order.
    ///
    /// On the first request of a (quantity, order, polarization) combination the derivative is
    /// built symbolically and compiled; later requests only evaluate.
    ///
    /// # Errors
    ///
    /// This function returns an error if
    ///  - the polarization is not defined for this medium or a walk-off angle is requested for a
    ///    branch not depending on that angle ([`DispersionError::UnsupportedPolarization`]).
    ///  - the derivative order is not supported ([`DispersionError::UndefinedDerivative`]).
    ///  - the inputs cannot be broadcast ([`DispersionError::ShapeMismatch`]).
    pub fn evaluate(
        &self,
        kind: QuantityKind,
        order: u8,
        inputs: &Inputs,
        polarization: Polarization,
    ) -> NdResult<ArrayD<f64>> {
        let key = self.key(kind, order, polarization)?;
        let evaluator = if let Some(evaluator) = self.cache.get(&key) {
            evaluator
        } else {
            kind.check_order(order)?;
            let n = self.formula(polarization)?.expr.clone();
            if let Some(angle) = kind.walk_off_angle() {
                if !n.depends_on(angle) {
                    return Err(DispersionError::UnsupportedPolarization(format!(
                        "{kind} is not defined for the {polarization}-ray of {}: \
                         index does not depend on {angle}",
                        self.info.id
                    )));
                }
            }
            self.cache.get_or_compile(&key, || kind.build(&n, order))
        };
        evaluator.evaluate_inputs(inputs)
    }
    fn quantity(
        &self,
        kind: QuantityKind,
        inputs: &Inputs,
        polarization: Polarization,
    ) -> NdResult<ArrayD<f64>> {
        self.evaluate(kind, kind.implied_order(), inputs, polarization)
    }
    /// Refractive index.
    ///
    /// # Errors
    ///
    /// See [`Medium::evaluate`].
    pub fn n(&self, inputs: &Inputs, polarization: Polarization) -> NdResult<ArrayD<f64>> {
        self.quantity(QuantityKind::Index, inputs, polarization)
    }
    /// `order`-th derivative of the index with respect to wavelength (1/µm^order).
    ///
    /// # Errors
    ///
    /// This function returns [`DispersionError::UndefinedDerivative`] for orders outside `1..=3`.
    /// See [`Medium::evaluate`] for further errors.
    pub fn wavelength_derivative(
        &self,
        order: u8,
        inputs: &Inputs,
        polarization: Polarization,
    ) -> NdResult<ArrayD<f64>> {
        self.evaluate(QuantityKind::WavelengthDerivative, order, inputs, polarization)
    }
    /// `dn/dwl` (1/µm).
    ///
    /// # Errors
    ///
    /// See [`Medium::evaluate`].
    pub fn dn_wl(&self, inputs: &Inputs, polarization: Polarization) -> NdResult<ArrayD<f64>> {
        self.wavelength_derivative(1, inputs, polarization)
    }
    /// `d²n/dwl²` (1/µm²).
    ///
    /// # Errors
    ///
    /// See [`Medium::evaluate`].
    pub fn d2n_wl(&self, inputs: &Inputs, polarization: Polarization) -> NdResult<ArrayD<f64>> {
        self.wavelength_derivative(2, inputs, polarization)
    }
    /// `d³n/dwl³` (1/µm³).
    ///
    /// # Errors
    ///
    /// See [`Medium::evaluate`].
    pub fn d3n_wl(&self, inputs: &Inputs, polarization: Polarization) -> NdResult<ArrayD<f64>> {
        self.wavelength_derivative(3, inputs, polarization)
    }
    /// Group delay (fs/mm).
    ///
    /// # Errors
    ///
    /// See [`Medium::evaluate`].
    pub fn group_delay(
        &self,
        inputs: &Inputs,
        polarization: Polarization,
    ) -> NdResult<ArrayD<f64>> {
        self.quantity(QuantityKind::GroupDelay, inputs, polarization)
    }
    /// Group velocity (µm/fs).
    ///
    /// # Errors
    ///
    /// See [`Medium::evaluate`].
    pub fn group_velocity(
        &self,
        inputs: &Inputs,
        polarization: Polarization,
    ) -> NdResult<ArrayD<f64>> {
        self.quantity(QuantityKind::GroupVelocity, inputs, polarization)
    }
    /// Group index `n - wl dn/dwl`.
    ///
    /// # Errors
    ///
    /// See [`Medium::evaluate`].
    pub fn group_index(
        &self,
        inputs: &Inputs,
        polarization: Polarization,
    ) -> NdResult<ArrayD<f64>> {
        self.quantity(QuantityKind::GroupIndex, inputs, polarization)
    }
    /// Group velocity dispersion (fs²/mm).
    ///
    /// # Errors
    ///
    /// See [`Medium::evaluate`].
    pub fn gvd(&self, inputs: &Inputs, polarization: Polarization) -> NdResult<ArrayD<f64>> {
        self.quantity(QuantityKind::Gvd, inputs, polarization)
    }
    /// Third order dispersion (fs³/mm).
    ///
    /// # Errors
    ///
    /// See [`Medium::evaluate`].
    pub fn tod(&self, inputs: &Inputs, polarization: Polarization) -> NdResult<ArrayD<f64>> {
        self.quantity(QuantityKind::Tod, inputs, polarization)
    }
    /// Polar walk-off angle (rad).
    ///
    /// # Errors
    ///
    /// This function returns [`DispersionError::UnsupportedPolarization`] if the index of the
    /// requested branch does not depend on θ (e.g. the ordinary ray of a uniaxial crystal).
    pub fn woa_theta(&self, inputs: &Inputs, polarization: Polarization) -> NdResult<ArrayD<f64>> {
        self.quantity(QuantityKind::WalkOffTheta, inputs, polarization)
    }
    /// Azimuthal walk-off angle (rad).
    ///
    /// # Errors
    ///
    /// This function returns [`DispersionError::UnsupportedPolarization`] if the index of the
    /// requested branch does not depend on φ.
    pub fn woa_phi(&self, inputs: &Inputs, polarization: Polarization) -> NdResult<ArrayD<f64>> {
        self.quantity(QuantityKind::WalkOffPhi, inputs, polarization)
    }
    /// Thermo-optic coefficient `dn/dT` (1/°C).
    ///
    /// # Errors
    ///
    /// See [`Medium::evaluate`].
    pub fn dn_dt(&self, inputs: &Inputs, polarization: Polarization) -> NdResult<ArrayD<f64>> {
        self.quantity(QuantityKind::ThermoOptic, inputs, polarization)
    }
}

impl PartialEq for Medium {
    /// Two media are equal if their metadata, geometry and formulas are equal; caches are not
    /// compared.
    fn eq(&self, other: &Self) -> bool {
        self.info == other.info
            && self.angles == other.angles
            && self.ordinary == other.ordinary
            && self.extraordinary == other.extraordinary
    }
}

/// Warn about formulas giving a non-physical index in the middle of their validity range.
fn check_formula(info: &MediumInfo, polarization: Polarization, formula: &Formula) {
    let wavelength = info.validity.as_ref().map_or(1.0, |r| {
        0.5 * (r.start + r.end).get::<uom::si::length::micrometer>()
    });
    let n = formula
        .expr
        .eval(&[wavelength, 0.0, 0.0, DEFAULT_TEMPERATURE]);
    if !n.is_finite() || n < 1.0 {
        warn!(
            "{}: index of the {polarization}-ray at {wavelength} µm is {n}, \
             check the dispersion formula",
            info.id
        );
    }
}
