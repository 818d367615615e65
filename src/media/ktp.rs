use super::sellmeier;
use crate::{
    config::{MediumConfig, Symmetry},
    formula::PrincipalPlane,
};

pub fn config(plane: PrincipalPlane) -> MediumConfig {
    MediumConfig {
        id: format!("ktp-{plane}"),
        name: format!("KTP (KTiOPO₄), Kato 1991, {plane} plane"),
        point_group: Some("mm2".into()),
        crystal_system: Some("orthorhombic".into()),
        axes: Some("x // a, y // b, z // c; biaxial, optic axes in the xz plane".into()),
        transparency_um: Some([0.35, 4.5]),
        validity_um: None,
        references: vec![
            "K. Kato, \"Parametric oscillation at 3.2 µm in KTP pumped at 1.064 µm\", \
             IEEE J. Quantum Electron. 27, 1137 (1991)"
                .into(),
        ],
        symmetry: Symmetry::Biaxial {
            plane,
            x: sellmeier(3.00065, 0.03901, 0.04251, 0.01327),
            y: sellmeier(3.0333, 0.04154, 0.04547, 0.01408),
            z: sellmeier(3.3134, 0.05694, 0.05658, 0.01682),
        },
    }
}
