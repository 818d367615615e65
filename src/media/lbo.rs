use super::sellmeier;
use crate::{
    config::{MediumConfig, Symmetry},
    formula::PrincipalPlane,
};

pub fn config(plane: PrincipalPlane) -> MediumConfig {
    MediumConfig {
        id: format!("lbo-{plane}"),
        name: format!("LBO (LiB₃O₅), Kato 1990, {plane} plane"),
        point_group: Some("mm2".into()),
        crystal_system: Some("orthorhombic".into()),
        axes: Some("x // a, y // -c, z // b; biaxial, optic axes in the xz plane".into()),
        transparency_um: None,
        validity_um: Some([0.22, 1.32]),
        references: vec![
            "K. Kato, \"Tunable UV generation to 0.2325 µm in LiB₃O₅\", \
             IEEE J. Quantum Electron. 26, 1173 (1990)"
                .into(),
        ],
        symmetry: Symmetry::Biaxial {
            plane,
            x: sellmeier(2.4542, 0.01125, 0.01135, 0.01388),
            y: sellmeier(2.5390, 0.01277, 0.01189, 0.01848),
            z: sellmeier(2.5865, 0.01310, 0.01223, 0.01861),
        },
    }
}
