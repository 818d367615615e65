use crate::{
    config::{MediumConfig, Symmetry},
    formula::{Dispersion, ThermoOptic},
};

pub fn config() -> MediumConfig {
    MediumConfig {
        id: "clbo".into(),
        name: "CLBO (CsLiB₆O₁₀)".into(),
        point_group: Some("-42m".into()),
        crystal_system: Some("tetragonal".into()),
        axes: Some("z // c, x and y arbitrary; negative uniaxial, optic axis // z".into()),
        transparency_um: Some([0.18, 2.75]),
        validity_um: Some([0.1914, 2.09]),
        references: vec![
            "N. Umemura et al., \"New data on the phase-matching properties of CsLiB6O10\", \
             Advanced Solid State Lasers, OSA (1999)"
                .into(),
        ],
        symmetry: Symmetry::Uniaxial {
            ordinary: Dispersion::SellmeierThermoPoly {
                a: 2.2104,
                b: 0.01018,
                c: 0.01424,
                d: 0.01258,
                thermo: ThermoOptic {
                    reference: 20.0,
                    wavelength: vec![-12.48e-6],
                    inverse_wavelength: vec![-0.328e-6],
                    temperature: 0.0,
                },
            },
            extraordinary: Dispersion::SellmeierThermoPoly {
                a: 2.0588,
                b: 0.00838,
                c: 0.01363,
                d: 0.00607,
                thermo: ThermoOptic {
                    reference: 20.0,
                    wavelength: vec![-8.36e-6],
                    inverse_wavelength: vec![0.047e-6, 0.039e-6, 0.014e-6],
                    temperature: 0.0,
                },
            },
        },
    }
}
