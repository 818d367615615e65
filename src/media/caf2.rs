use crate::{
    config::{MediumConfig, Symmetry},
    formula::Dispersion,
};

pub fn config() -> MediumConfig {
    MediumConfig {
        id: "caf2".into(),
        name: "Calcium fluoride (CaF₂)".into(),
        point_group: Some("m3m (Oh)".into()),
        crystal_system: Some("cubic".into()),
        axes: None,
        transparency_um: None,
        validity_um: None,
        references: vec!["Nihon Kessho Kogaku, optical crystal catalog, CaF2".into()],
        symmetry: Symmetry::Isotropic {
            index: Dispersion::Sellmeier {
                b: [6.254_288_046e-1, 4.132_684_951e-1, 3.409_193_892],
                c: [2.813_183_822e-3, 1.066_206_606e-2, 1.065_596_428e3],
            },
        },
    }
}
