use crate::{
    config::{MediumConfig, Symmetry},
    formula::{Dispersion, ThermoOptic},
};

/// The room temperature formula holds at 25 °C.
const REFERENCE_TEMPERATURE: f64 = 25.0;

fn thermo(polynomial: [f64; 4], temperature: f64) -> ThermoOptic {
    ThermoOptic {
        reference: REFERENCE_TEMPERATURE,
        wavelength: polynomial.to_vec(),
        inverse_wavelength: Vec::new(),
        temperature,
    }
}

pub fn config() -> MediumConfig {
    MediumConfig {
        id: "lb4".into(),
        name: "LB4 (Li₂B₄O₇, lithium tetraborate)".into(),
        point_group: Some("4mm".into()),
        crystal_system: Some("tetragonal".into()),
        axes: Some("z // c, x and y arbitrary; negative uniaxial, optic axis // z".into()),
        transparency_um: Some([0.16, 3.6]),
        validity_um: Some([0.18, 2.3]),
        references: vec![
            "T. Sugawara, R. Komatsu and S. Uda, \"Linear and nonlinear optical properties of \
             lithium tetraborate\", Solid State Commun. 107, 233 (1998)"
                .into(),
        ],
        symmetry: Symmetry::Uniaxial {
            ordinary: Dispersion::SellmeierThermoPoly {
                a: 2.564310,
                b: 0.012337,
                c: 0.114467 * 0.114467,
                d: 0.019075,
                thermo: thermo([1.893e-5, -88.17e-6, 1.497e-4, -8.643e-5], -2.55e-8),
            },
            extraordinary: Dispersion::SellmeierThermoPoly {
                a: 2.386510,
                b: 0.010664,
                c: 0.113483 * 0.113483,
                d: 0.012813,
                thermo: thermo([1.297e-5, -45.50e-6, 0.714e-4, -3.868e-5], -2.08e-8),
            },
        },
    }
}
