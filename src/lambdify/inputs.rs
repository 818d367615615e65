//! Scalar or array valued arguments of a dispersion evaluation.
use ndarray::{Array1, ArrayD, IxDyn};

use crate::{
    error::{DispersionError, NdResult},
    symbol::{Symbol, SYMBOL_COUNT},
};

/// Temperature used if none is given (°C).
pub const DEFAULT_TEMPERATURE: f64 = 20.0;

/// Conversion into an `n`-dimensional argument array.
///
/// Scalars become 0-dimensional arrays, vectors and slices 1-dimensional ones.
pub trait IntoInput {
    /// Convert into an array.
    fn into_input(self) -> ArrayD<f64>;
}

impl IntoInput for f64 {
    fn into_input(self) -> ArrayD<f64> {
        ArrayD::from_elem(IxDyn(&[]), self)
    }
}
impl IntoInput for Vec<f64> {
    fn into_input(self) -> ArrayD<f64> {
        Array1::from(self).into_dyn()
    }
}
impl IntoInput for &[f64] {
    fn into_input(self) -> ArrayD<f64> {
        Array1::from(self.to_vec()).into_dyn()
    }
}
impl<const N: usize> IntoInput for [f64; N] {
    fn into_input(self) -> ArrayD<f64> {
        Array1::from(self.to_vec()).into_dyn()
    }
}
impl IntoInput for Array1<f64> {
    fn into_input(self) -> ArrayD<f64> {
        self.into_dyn()
    }
}
impl IntoInput for ArrayD<f64> {
    fn into_input(self) -> ArrayD<f64> {
        self
    }
}

/// Wavelength (µm), polar angle θ (rad), azimuthal angle φ (rad) and temperature (°C) of an
/// evaluation.
///
/// Each argument may be a scalar or an array. The arrays are broadcast against each other
/// following the `NumPy` rules.
///
/// ```
/// use ndispers::Inputs;
///
/// let inputs = Inputs::new(vec![0.4, 0.8, 1.2]).theta(0.3).temperature(25.0);
/// assert_eq!(inputs.shape().unwrap(), vec![3]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Inputs {
    args: [ArrayD<f64>; SYMBOL_COUNT],
}

impl Inputs {
    /// Create new inputs for the given wavelength(s) with θ = 0, φ = 0 and T = 20 °C.
    #[must_use]
    pub fn new(wavelength: impl IntoInput) -> Self {
        Self {
            args: [
                wavelength.into_input(),
                0.0.into_input(),
                0.0.into_input(),
                DEFAULT_TEMPERATURE.into_input(),
            ],
        }
    }
    /// Set the polar angle(s) θ in rad.
    #[must_use]
    pub fn theta(self, theta: impl IntoInput) -> Self {
        self.with(Symbol::Theta, theta)
    }
    /// Set the azimuthal angle(s) φ in rad.
    #[must_use]
    pub fn phi(self, phi: impl IntoInput) -> Self {
        self.with(Symbol::Phi, phi)
    }
    /// Set the crystal temperature(s) in °C.
    #[must_use]
    pub fn temperature(self, temperature: impl IntoInput) -> Self {
        self.with(Symbol::Temperature, temperature)
    }
    /// Replace the argument belonging to `symbol`.
    #[must_use]
    pub fn with(mut self, symbol: Symbol, value: impl IntoInput) -> Self {
        self.args[symbol.position()] = value.into_input();
        self
    }
    /// Returns the argument array belonging to `symbol`.
    #[must_use]
    pub fn get(&self, symbol: Symbol) -> &ArrayD<f64> {
        &self.args[symbol.position()]
    }
    /// All argument arrays in evaluator order `(wl, theta, phi, T)`.
    #[must_use]
    pub const fn args(&self) -> &[ArrayD<f64>; SYMBOL_COUNT] {
        &self.args
    }
    /// The common (broadcast) shape of all arguments.
    ///
    /// # Errors
    ///
    /// This function returns [`DispersionError::ShapeMismatch`] if the argument shapes are not
    /// compatible.
    pub fn shape(&self) -> NdResult<Vec<usize>> {
        let shapes: Vec<&[usize]> = self.args.iter().map(|a| a.shape()).collect();
        broadcast_shape(&shapes)
    }
}

/// Broadcast a list of shapes to their common shape.
///
/// Shapes are aligned at their trailing dimensions; two dimensions are compatible if they are
/// equal or one of them is `1`.
///
/// # Errors
///
/// This function returns [`DispersionError::ShapeMismatch`] if two dimensions are incompatible.
pub fn broadcast_shape(shapes: &[&[usize]]) -> NdResult<Vec<usize>> {
    let ndim = shapes.iter().map(|s| s.len()).max().unwrap_or(0);
    let mut out = vec![1usize; ndim];
    for shape in shapes {
        let offset = ndim - shape.len();
        for (axis, dim) in shape.iter().enumerate() {
            let target = &mut out[offset + axis];
            if *target == 1 {
                *target = *dim;
            } else if *dim != 1 && dim != target {
                return Err(DispersionError::ShapeMismatch(format!(
                    "shapes {} cannot be broadcast together",
                    shapes
                        .iter()
                        .map(|s| format!("{s:?}"))
                        .collect::<Vec<_>>()
                        .join(", ")
                )));
            }
        }
    }
    Ok(out)
}
