use super::sellmeier;
use crate::config::{MediumConfig, Symmetry};

pub fn config() -> MediumConfig {
    MediumConfig {
        id: "alpha-bbo".into(),
        name: "α-BBO (α-BaB₂O₄)".into(),
        point_group: Some("3m".into()),
        crystal_system: Some("trigonal".into()),
        axes: Some("z // c, x and y arbitrary; negative uniaxial, optic axis // z".into()),
        transparency_um: None,
        validity_um: None,
        references: vec!["CASTECH, α-BBO crystal data sheet".into()],
        symmetry: Symmetry::Uniaxial {
            ordinary: sellmeier(2.7471, 0.01878, 0.01822, 0.01354),
            extraordinary: sellmeier(2.37153, 0.01224, 0.01667, 0.01516),
        },
    }
}
