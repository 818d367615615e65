#![warn(missing_docs)]
//! YAML definitions of media.
//!
//! A [`MediumConfig`] describes a medium by its metadata, its symmetry and the dispersion formulas
//! of its principal indices:
//!
//! ```yaml
//! id: my-glass
//! name: My glass
//! validity_um: [0.4, 1.6]
//! symmetry:
//!   kind: isotropic
//!   index:
//!     family: sellmeier
//!     b: [0.6961663, 0.4079426, 0.8974794]
//!     c: [0.00467914826, 0.0135120631, 97.9340025]
//! ```
use std::{
    fs::{self, File},
    io::Write,
    path::Path,
};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::{
    error::{DispersionError, NdResult},
    formula::{uniaxial_extraordinary, CoefficientSet, Dispersion, PrincipalPlane},
    medium::{Angles, Formula, Medium, MediumInfo},
    micrometer,
};

/// Symmetry of a medium together with the dispersion of its principal indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Symmetry {
    /// glasses and cubic crystals, one index
    Isotropic {
        /// dispersion of the index
        index: Dispersion,
    },
    /// uniaxial crystal with the optic axis along z
    Uniaxial {
        /// dispersion of the ordinary index
        ordinary: Dispersion,
        /// dispersion of the extraordinary index (θ = π/2)
        extraordinary: Dispersion,
    },
    /// biaxial crystal, propagating in one of the principal planes
    Biaxial {
        /// principal plane
        plane: PrincipalPlane,
        /// dispersion of `n_x`
        x: Dispersion,
        /// dispersion of `n_y`
        y: Dispersion,
        /// dispersion of `n_z`
        z: Dispersion,
    },
}

impl Symmetry {
    fn dispersions(&self) -> Vec<&Dispersion> {
        match self {
            Self::Isotropic { index } => vec![index],
            Self::Uniaxial {
                ordinary,
                extraordinary,
            } => vec![ordinary, extraordinary],
            Self::Biaxial { x, y, z, .. } => vec![x, y, z],
        }
    }
    /// Text form of the dispersion formula(s).
    #[must_use]
    pub fn formula_text(&self) -> String {
        match self {
            Self::Isotropic { index } => index.text().to_owned(),
            Self::Uniaxial { ordinary, .. } => format!(
                "{} for i = o, e; n_e(theta) = n_e/sqrt(sin(theta)**2 + (n_e/n_o)**2*cos(theta)**2)",
                ordinary.text()
            ),
            Self::Biaxial { plane, x, .. } => {
                let ellipse = match plane {
                    PrincipalPlane::Xy => {
                        "n_o = n_z, n_e(phi) = n_x*n_y/sqrt(n_x**2*cos(phi)**2 + n_y**2*sin(phi)**2)"
                    }
                    PrincipalPlane::Yz => {
                        "n_o = n_x, n_e(theta) = n_y*n_z/sqrt(n_z**2*cos(theta)**2 + n_y**2*sin(theta)**2)"
                    }
                    PrincipalPlane::Zx => {
                        "n_o = n_y, n_e(theta) = n_x*n_z/sqrt(n_z**2*cos(theta)**2 + n_x**2*sin(theta)**2)"
                    }
                };
                format!("{} for i = x, y, z; {ellipse}", x.text())
            }
        }
    }
}

/// Serializable definition of a medium.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediumConfig {
    /// unique identifier
    pub id: String,
    /// full name
    pub name: String,
    /// crystallographic point group
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point_group: Option<String>,
    /// crystal system
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crystal_system: Option<String>,
    /// orientation of the dielectric principal axes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axes: Option<String>,
    /// transparency range (µm)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transparency_um: Option<[f64; 2]>,
    /// validity range of the formulas (µm)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validity_um: Option<[f64; 2]>,
    /// literature references
    #[serde(default)]
    pub references: Vec<String>,
    /// symmetry and dispersion formulas
    pub symmetry: Symmetry,
}

impl MediumConfig {
    /// Read a medium definition from a YAML string.
    ///
    /// # Errors
    ///
    /// This function returns [`DispersionError::Config`] if the string cannot be parsed or the
    /// definition is invalid.
    pub fn from_string(yaml: &str) -> NdResult<Self> {
        let config: Self = serde_yaml::from_str(yaml).map_err(|e| {
            DispersionError::Config(format!("parsing of medium definition failed: {e}"))
        })?;
        config.validate()?;
        info!("medium definition '{}' loaded", config.id);
        Ok(config)
    }
    /// Read a medium definition from a YAML file.
    ///
    /// # Errors
    ///
    /// This function returns [`DispersionError::Config`] if the file cannot be read or parsed or
    /// the definition is invalid.
    pub fn from_file(path: &Path) -> NdResult<Self> {
        info!("reading medium definition from {}", path.display());
        let contents = fs::read_to_string(path).map_err(|e| {
            DispersionError::Config(format!("cannot read file {} : {}", path.display(), e))
        })?;
        Self::from_string(&contents)
    }
    /// Serialize this definition to a YAML string.
    ///
    /// # Errors
    ///
    /// This function returns [`DispersionError::Config`] if the serialization fails.
    pub fn to_yaml(&self) -> NdResult<String> {
        serde_yaml::to_string(self).map_err(|e| {
            DispersionError::Config(format!("serialization of medium definition failed: {e}"))
        })
    }
    /// Save this definition to a YAML file.
    ///
    /// # Errors
    ///
    /// This function returns [`DispersionError::Config`] if the file cannot be written.
    pub fn save_to_file(&self, path: &Path) -> NdResult<()> {
        let serialized = self.to_yaml()?;
        let mut output = File::create(path).map_err(|e| {
            DispersionError::Config(format!("could not create file {}: {}", path.display(), e))
        })?;
        write!(output, "{serialized}").map_err(|e| {
            DispersionError::Config(format!("writing to file {} failed: {}", path.display(), e))
        })?;
        Ok(())
    }
    /// Checks the definition for consistency.
    ///
    /// # Errors
    ///
    /// This function returns [`DispersionError::Config`] if the identifier is empty, a wavelength
    /// range is empty or negative or a dispersion formula is invalid.
    pub fn validate(&self) -> NdResult<()> {
        if self.id.trim().is_empty() {
            return Err(DispersionError::Config("medium id must not be empty".into()));
        }
        for (label, range) in [
            ("transparency", self.transparency_um),
            ("validity", self.validity_um),
        ] {
            if let Some([start, end]) = range {
                if !(start > 0.0 && end > start) {
                    return Err(DispersionError::Config(format!(
                        "{label} range {start}..{end} µm of {} is invalid",
                        self.id
                    )));
                }
            }
        }
        for dispersion in self.symmetry.dispersions() {
            dispersion.validate()?;
        }
        if let (Some([t0, t1]), Some([v0, v1])) = (self.transparency_um, self.validity_um) {
            if v0 < t0 || v1 > t1 {
                warn!(
                    "{}: validity range exceeds the transparency range",
                    self.id
                );
            }
        }
        Ok(())
    }
    fn info(&self) -> MediumInfo {
        MediumInfo {
            id: self.id.clone(),
            name: self.name.clone(),
            point_group: self.point_group.clone(),
            crystal_system: self.crystal_system.clone(),
            axes: self.axes.clone(),
            transparency: self.transparency_um.map(|[a, b]| micrometer!(a, b)),
            validity: self.validity_um.map(|[a, b]| micrometer!(a, b)),
            formula: self.symmetry.formula_text(),
            references: self.references.clone(),
        }
    }
    /// Build the [`Medium`] described by this definition.
    ///
    /// # Errors
    ///
    /// This function returns [`DispersionError::Config`] if the definition is invalid.
    pub fn build(&self) -> NdResult<Medium> {
        self.validate()?;
        let info = self.info();
        let medium = match &self.symmetry {
            Symmetry::Isotropic { index } => {
                Medium::new(info, Formula::new(index.coefficients(""), index.expr()))
            }
            Symmetry::Uniaxial {
                ordinary,
                extraordinary,
            } => {
                let no = ordinary.expr();
                let ne = extraordinary.expr();
                Medium::new(info, Formula::new(ordinary.coefficients("_o"), no.clone()))
                    .with_extraordinary(Formula::new(
                        extraordinary.coefficients("_e"),
                        uniaxial_extraordinary(&no, &ne),
                    ))
                    .with_angles(Angles::uniaxial())
            }
            Symmetry::Biaxial { plane, x, y, z } => {
                let (nx, ny, nz) = (x.expr(), y.expr(), z.expr());
                let (o, e) = plane.indices(&nx, &ny, &nz);
                let (cx, cy, cz) = (
                    x.coefficients("_x"),
                    y.coefficients("_y"),
                    z.coefficients("_z"),
                );
                let (o_coefficients, e_coefficients) = match plane {
                    PrincipalPlane::Xy => (cz, merge(&cx, &cy)),
                    PrincipalPlane::Yz => (cx, merge(&cy, &cz)),
                    PrincipalPlane::Zx => (cy, merge(&cx, &cz)),
                };
                Medium::new(info, Formula::new(o_coefficients, o))
                    .with_extraordinary(Formula::new(e_coefficients, e))
                    .with_angles(Angles::principal_plane(*plane))
            }
        };
        Ok(medium)
    }
}

fn merge(a: &CoefficientSet, b: &CoefficientSet) -> CoefficientSet {
    let mut set = a.clone();
    set.extend(b);
    set
}
