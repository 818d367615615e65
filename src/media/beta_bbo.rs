use crate::{
    config::{MediumConfig, Symmetry},
    formula::Dispersion,
};

pub fn config() -> MediumConfig {
    MediumConfig {
        id: "beta-bbo-eimerl1987".into(),
        name: "β-BBO (β-BaB₂O₄), Eimerl 1987".into(),
        point_group: Some("3m (C3v)".into()),
        crystal_system: Some("trigonal".into()),
        axes: Some("z // c, x and y arbitrary; negative uniaxial, optic axis // z".into()),
        transparency_um: Some([0.19, 2.6]),
        validity_um: Some([0.22, 1.06]),
        references: vec![
            "D. Eimerl et al., \"Optical, mechanical, and thermal properties of barium borate\", \
             J. Appl. Phys. 62, 1968 (1987)"
                .into(),
            "D. N. Nikogosyan, \"Beta barium borate (BBO)\", Appl. Phys. A 52, 359 (1991)".into(),
        ],
        symmetry: Symmetry::Uniaxial {
            ordinary: Dispersion::SellmeierThermo {
                a: 2.7405,
                b: 0.0184,
                c: 0.0179,
                d: 0.0155,
                dn_dt: -16.6e-6,
            },
            extraordinary: Dispersion::SellmeierThermo {
                a: 2.3730,
                b: 0.0128,
                c: 0.0156,
                d: 0.0044,
                dn_dt: -9.3e-6,
            },
        },
    }
}
