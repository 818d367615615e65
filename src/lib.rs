//! This is the documentation for the **ndispers** package. **ndispers** computes the dispersion
//! properties of optical media: refractive index, group delay, group velocity, group index, group
//! velocity dispersion (GVD), third order dispersion (TOD), walk-off angles and thermo-optic
//! coefficients as functions of wavelength, propagation angles, temperature and polarization.
//!
//! The dispersion formula of a medium is held as a symbolic expression. Derived quantities are
//! obtained by symbolic differentiation, compiled once into a numeric evaluator and cached per
//! medium, quantity and polarization. Evaluation broadcasts over scalar or array inputs.
//!
//! ```
//! use ndispers::{Catalog, Inputs, Polarization};
//!
//! let silica = Catalog::FusedSilica.medium().unwrap();
//! let gvd = silica.gvd(&Inputs::new(vec![0.8, 1.0]), Polarization::Ordinary).unwrap();
//! assert_eq!(gvd.shape(), &[2]);
//! ```
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod config;
pub mod console;
pub mod derivative;
pub mod error;
pub mod expr;
pub mod formula;
pub mod lambdify;
pub mod media;
pub mod medium;
pub mod symbol;
pub mod utils;

pub use cache::{DerivativeKey, EvaluatorCache};
pub use config::MediumConfig;
pub use derivative::QuantityKind;
pub use error::{DispersionError, NdResult};
pub use lambdify::{CompiledEvaluator, Inputs};
pub use media::Catalog;
pub use medium::{Medium, MediumInfo, Polarization};
pub use symbol::Symbol;
