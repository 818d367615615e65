use crate::{
    config::{MediumConfig, Symmetry},
    formula::Dispersion,
};

/// Zernike's formula, infrared pole at 400 µm².
const fn zernike(a: f64, b: f64, c: f64, d: f64) -> Dispersion {
    Dispersion::SellmeierIr { a, b, c, d, e: 400.0 }
}

pub fn config() -> MediumConfig {
    MediumConfig {
        id: "kdp".into(),
        name: "KDP (KH₂PO₄)".into(),
        point_group: Some("-42m".into()),
        crystal_system: Some("tetragonal".into()),
        axes: Some("z // c, x and y arbitrary; negative uniaxial, optic axis // z".into()),
        transparency_um: Some([0.174, 1.57]),
        validity_um: None,
        references: vec![
            "F. Zernike, \"Refractive indices of ammonium dihydrogen phosphate and potassium \
             dihydrogen phosphate between 2000 Å and 1.5 µm\", J. Opt. Soc. Am. 54, 1215 (1964)"
                .into(),
        ],
        symmetry: Symmetry::Uniaxial {
            ordinary: zernike(2.259276, 0.01008956, 0.012942625, 13.00522),
            extraordinary: zernike(2.132668, 0.00863749, 0.012281043, 3.22799),
        },
    }
}
