#![warn(missing_docs)]
//! Catalog of media shipped with the crate.
//!
//! Each entry is defined as a [`MediumConfig`] so that the catalog media and media loaded from
//! YAML files go through the same construction path.
mod alpha_bbo;
mod beta_bbo;
mod beta_bbo_2018;
mod caf2;
mod clbo;
mod fused_silica;
mod kdp;
mod ktp;
mod lb4;
mod lbo;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::{
    config::MediumConfig,
    error::NdResult,
    formula::{Dispersion, PrincipalPlane},
    medium::Medium,
};

/// Four coefficient Sellmeier formula without temperature dependence.
const fn sellmeier(a: f64, b: f64, c: f64, d: f64) -> Dispersion {
    Dispersion::SellmeierThermo {
        a,
        b,
        c,
        d,
        dn_dt: 0.0,
    }
}

/// The media of the catalog.
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
    Display,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Catalog {
    /// β-BaB₂O₄, Eimerl et al. 1987
    #[strum(serialize = "beta-bbo-eimerl1987")]
    #[serde(rename = "beta-bbo-eimerl1987")]
    BetaBboEimerl1987,
    /// β-BaB₂O₄, Tamošauskas et al. 2018, valid up to 5.2 µm
    #[strum(serialize = "beta-bbo-tamosauskas2018")]
    #[serde(rename = "beta-bbo-tamosauskas2018")]
    BetaBboTamosauskas2018,
    /// α-BaB₂O₄
    AlphaBbo,
    /// fused silica, Malitson 1965
    FusedSilica,
    /// calcium fluoride
    #[strum(serialize = "caf2")]
    #[serde(rename = "caf2")]
    CaF2,
    /// KTiOPO₄ (Kato 1991), wave vector in the xy plane
    KtpXy,
    /// KTiOPO₄ (Kato 1991), wave vector in the yz plane
    KtpYz,
    /// KTiOPO₄ (Kato 1991), wave vector in the zx plane
    KtpZx,
    /// LiB₃O₅ (Kato 1990), wave vector in the xy plane
    LboXy,
    /// LiB₃O₅ (Kato 1990), wave vector in the yz plane
    LboYz,
    /// LiB₃O₅ (Kato 1990), wave vector in the zx plane
    LboZx,
    /// KH₂PO₄, Zernike 1964
    Kdp,
    /// CsLiB₆O₁₀ with wavelength dependent thermo-optic coefficients
    Clbo,
    /// Li₂B₄O₇ with temperature dependent thermo-optic coefficients
    #[strum(serialize = "lb4")]
    #[serde(rename = "lb4")]
    Lb4,
}

impl Catalog {
    /// The definition of this medium.
    #[must_use]
    pub fn config(self) -> MediumConfig {
        match self {
            Self::BetaBboEimerl1987 => beta_bbo::config(),
            Self::BetaBboTamosauskas2018 => beta_bbo_2018::config(),
            Self::AlphaBbo => alpha_bbo::config(),
            Self::FusedSilica => fused_silica::config(),
            Self::CaF2 => caf2::config(),
            Self::KtpXy => ktp::config(PrincipalPlane::Xy),
            Self::KtpYz => ktp::config(PrincipalPlane::Yz),
            Self::KtpZx => ktp::config(PrincipalPlane::Zx),
            Self::LboXy => lbo::config(PrincipalPlane::Xy),
            Self::LboYz => lbo::config(PrincipalPlane::Yz),
            Self::LboZx => lbo::config(PrincipalPlane::Zx),
            Self::Kdp => kdp::config(),
            Self::Clbo => clbo::config(),
            Self::Lb4 => lb4::config(),
        }
    }
    /// Build a new [`Medium`] (with its own, empty cache).
    ///
    /// # Errors
    ///
    /// This function returns an error if the catalog definition is invalid.
    pub fn medium(self) -> NdResult<Medium> {
        self.config().build()
    }
}
