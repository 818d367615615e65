use crate::{
    config::{MediumConfig, Symmetry},
    formula::Dispersion,
};

pub fn config() -> MediumConfig {
    MediumConfig {
        id: "beta-bbo-tamosauskas2018".into(),
        name: "β-BBO (β-BaB₂O₄), Tamošauskas 2018".into(),
        point_group: Some("3m (C3v)".into()),
        crystal_system: Some("trigonal".into()),
        axes: Some("z // c, x and y arbitrary; negative uniaxial, optic axis // z".into()),
        transparency_um: None,
        validity_um: Some([0.188, 5.2]),
        references: vec![
            "G. Tamošauskas et al., \"Transmittance and phase matching of BBO crystal in the \
             3-5 µm range and its application for the characterization of mid-infrared laser \
             pulses\", Opt. Mater. Express 8, 1410 (2018)"
                .into(),
        ],
        symmetry: Symmetry::Uniaxial {
            ordinary: Dispersion::Sellmeier {
                b: [0.90291, 0.83155, 0.76536],
                c: [0.003926, 0.018786, 60.01],
            },
            extraordinary: Dispersion::Sellmeier {
                b: [1.151075, 0.21803, 0.656],
                c: [0.007142, 0.02259, 263.0],
            },
        },
    }
}
