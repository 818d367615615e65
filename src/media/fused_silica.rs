use crate::{
    config::{MediumConfig, Symmetry},
    formula::Dispersion,
};

pub fn config() -> MediumConfig {
    MediumConfig {
        id: "fused-silica".into(),
        name: "Fused silica (SiO₂ glass)".into(),
        point_group: None,
        crystal_system: None,
        axes: None,
        transparency_um: None,
        validity_um: Some([0.21, 3.71]),
        references: vec![
            "W. S. Rodney and R. J. Spindler, \"Index of refraction of fused-quartz glass for \
             ultraviolet, visible, and infrared wavelengths\", \
             J. Res. Nat. Bur. Stand. 53, 185 (1954)"
                .into(),
            "I. H. Malitson, \"Interspecimen comparison of the refractive index of fused silica\", \
             J. Opt. Soc. Am. 55, 1205 (1965)"
                .into(),
        ],
        symmetry: Symmetry::Isotropic {
            index: Dispersion::Sellmeier {
                b: [0.696_166_3, 0.407_942_6, 0.897_479_4],
                c: [
                    0.068_404_3_f64.powi(2),
                    0.116_241_4_f64.powi(2),
                    9.896_161_f64.powi(2),
                ],
            },
        },
    }
}
