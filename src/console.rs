//! Handling the ndispers CLI
//!
//! This module handles the command line parsing, the validation of the arguments and the output
//! of the evaluated quantities as text table or CSV file.
use std::{
    io::Write,
    path::{Path, PathBuf},
    str::FromStr,
};

use clap::Parser;
use itertools::Itertools;
use log::info;
use ndarray::ArrayD;
use strum::IntoEnumIterator;

use crate::{
    config::MediumConfig,
    derivative::QuantityKind,
    error::{DispersionError, NdResult},
    lambdify::{Inputs, DEFAULT_TEMPERATURE},
    media::Catalog,
    medium::{Medium, Polarization},
};

/// Raw command line arguments of the ndispers application.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct PartialArgs {
    /// medium from the catalog (see --list)
    #[arg(short, long)]
    medium: Option<String>,

    /// YAML file with a medium definition, used instead of a catalog medium
    #[arg(short, long)]
    file: Option<String>,

    /// quantity to evaluate (n, dn_wl, gd, gv, ng, gvd, tod, woa_theta, woa_phi, dndT)
    #[arg(short, long, default_value = "n")]
    quantity: String,

    /// order of the wavelength derivative (only for dn_wl)
    #[arg(long, default_value_t = 1)]
    order: u8,

    /// comma separated list of wavelengths in µm
    #[arg(short, long, value_delimiter = ',')]
    wavelength: Vec<f64>,

    /// wavelength range in µm as start:stop:step
    #[arg(long)]
    wl_range: Option<String>,

    /// polar angle theta
    #[arg(short, long, default_value_t = 0.0, allow_negative_numbers = true)]
    theta: f64,

    /// azimuthal angle phi
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    phi: f64,

    /// angles are given in degrees instead of radians
    #[arg(long)]
    deg: bool,

    /// crystal temperature in °C
    #[arg(short = 'T', long, default_value_t = DEFAULT_TEMPERATURE, allow_negative_numbers = true)]
    temperature: f64,

    /// polarization (o or e)
    #[arg(short, long, default_value = "o")]
    pol: String,

    /// write the result to this CSV file instead of printing a table
    #[arg(short, long)]
    output: Option<String>,

    /// list the media of the catalog
    #[arg(long)]
    list: bool,

    /// print the description of the medium
    #[arg(long)]
    info: bool,
}

/// Where a medium comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediumSource {
    /// a catalog entry
    Catalog(Catalog),
    /// a YAML definition file
    File(PathBuf),
}

impl MediumSource {
    /// Build the medium.
    ///
    /// # Errors
    ///
    /// This function returns an error if the definition file cannot be read or is invalid.
    pub fn load(&self) -> NdResult<Medium> {
        match self {
            Self::Catalog(c) => c.medium(),
            Self::File(path) => MediumConfig::from_file(path)?.build(),
        }
    }
}

/// A validated evaluation request.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// the medium
    pub source: MediumSource,
    /// quantity to evaluate
    pub quantity: QuantityKind,
    /// derivative order
    pub order: u8,
    /// wavelengths in µm
    pub wavelengths: Vec<f64>,
    /// polar angle in rad
    pub theta: f64,
    /// azimuthal angle in rad
    pub phi: f64,
    /// temperature in °C
    pub temperature: f64,
    /// polarization
    pub polarization: Polarization,
    /// optional CSV output file
    pub csv: Option<PathBuf>,
}

/// Validated command line arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum Args {
    /// print the catalog
    List,
    /// print the description of a medium
    Info(MediumSource),
    /// evaluate a quantity
    Evaluate(Evaluation),
}

fn medium_source(args: &PartialArgs) -> NdResult<MediumSource> {
    match (&args.medium, &args.file) {
        (Some(_), Some(_)) => Err(DispersionError::Console(
            "either a catalog medium or a definition file must be given, not both".into(),
        )),
        (Some(name), None) => Catalog::from_str(name).map(MediumSource::Catalog).map_err(|_| {
            DispersionError::Console(format!(
                "unknown medium '{name}', available: {}",
                Catalog::iter().join(", ")
            ))
        }),
        (None, Some(path)) => Ok(MediumSource::File(PathBuf::from(path))),
        (None, None) => Err(DispersionError::Console(
            "no medium given, use --medium or --file".into(),
        )),
    }
}

/// Upper bound of the number of wavelengths a `start:stop:step` range may expand to.
pub const MAX_RANGE_POINTS: usize = 1_000_000;

/// Parse a wavelength range `start:stop:step` into the list of wavelengths (stop included).
///
/// # Errors
///
/// This function returns [`DispersionError::Console`] if the string is malformed, a value is not
/// finite, the step is not positive, stop is smaller than start or the range would contain more
/// than [`MAX_RANGE_POINTS`] wavelengths.
pub fn parse_wavelength_range(range: &str) -> NdResult<Vec<f64>> {
    let invalid = || {
        DispersionError::Console(format!(
            "invalid wavelength range '{range}', expected start:stop:step"
        ))
    };
    let values: Vec<f64> = range
        .split(':')
        .map(|v| v.trim().parse::<f64>().map_err(|_| invalid()))
        .collect::<NdResult<_>>()?;
    let [start, stop, step] = values[..] else {
        return Err(invalid());
    };
    if !(start.is_finite() && stop.is_finite() && step.is_finite()) {
        return Err(invalid());
    }
    if !(step > 0.0 && stop >= start) {
        return Err(invalid());
    }
    let intervals = ((stop - start) / step + 1e-9).floor();
    #[allow(clippy::cast_precision_loss)]
    let limit = MAX_RANGE_POINTS as f64;
    if intervals >= limit {
        return Err(DispersionError::Console(format!(
            "wavelength range '{range}' exceeds {MAX_RANGE_POINTS} points"
        )));
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let count = intervals as usize;
    #[allow(clippy::cast_precision_loss)]
    let wavelengths = (0..=count)
        .map(|i| step.mul_add(i as f64, start))
        .collect();
    Ok(wavelengths)
}

impl TryFrom<PartialArgs> for Args {
    type Error = DispersionError;

    fn try_from(args: PartialArgs) -> NdResult<Self> {
        if args.list {
            return Ok(Self::List);
        }
        let source = medium_source(&args)?;
        if args.info {
            return Ok(Self::Info(source));
        }
        let quantity = QuantityKind::from_str(&args.quantity).map_err(|_| {
            DispersionError::Console(format!(
                "unknown quantity '{}', available: {}",
                args.quantity,
                QuantityKind::iter().join(", ")
            ))
        })?;
        let order = if quantity == QuantityKind::WavelengthDerivative {
            args.order
        } else {
            quantity.implied_order()
        };
        let polarization = Polarization::from_str(&args.pol).map_err(|_| {
            DispersionError::Console(format!("unknown polarization '{}', use o or e", args.pol))
        })?;
        let mut wavelengths = args.wavelength.clone();
        if let Some(range) = &args.wl_range {
            wavelengths.extend(parse_wavelength_range(range)?);
        }
        if wavelengths.is_empty() {
            return Err(DispersionError::Console(
                "no wavelength given, use --wavelength or --wl-range".into(),
            ));
        }
        let angle = |v: f64| if args.deg { v.to_radians() } else { v };
        Ok(Self::Evaluate(Evaluation {
            source,
            quantity,
            order,
            wavelengths,
            theta: angle(args.theta),
            phi: angle(args.phi),
            temperature: args.temperature,
            polarization,
            csv: args.output.as_ref().map(PathBuf::from),
        }))
    }
}

impl Evaluation {
    /// Evaluate the requested quantity for all wavelengths.
    ///
    /// # Errors
    ///
    /// This function returns an error if the medium cannot be loaded or the quantity is not
    /// defined for it.
    pub fn evaluate(&self) -> NdResult<(Medium, ArrayD<f64>)> {
        let medium = self.source.load()?;
        let inputs = Inputs::new(self.wavelengths.clone())
            .theta(self.theta)
            .phi(self.phi)
            .temperature(self.temperature);
        let values = medium.evaluate(self.quantity, self.order, &inputs, self.polarization)?;
        Ok((medium, values))
    }
    fn column_name(&self) -> String {
        if self.quantity == QuantityKind::WavelengthDerivative {
            format!("{}{}", self.quantity, self.order)
        } else {
            self.quantity.to_string()
        }
    }
    fn write_table(
        &self,
        medium: &Medium,
        values: &ArrayD<f64>,
        writer: &mut impl Write,
    ) -> NdResult<()> {
        let io =
            |e: std::io::Error| DispersionError::Console(format!("writing output failed: {e}"));
        let unit = self.quantity.unit();
        writeln!(
            writer,
            "# {}, {}-ray, theta = {} rad, phi = {} rad, T = {} °C",
            medium.id(),
            self.polarization,
            self.theta,
            self.phi,
            self.temperature
        )
        .map_err(io)?;
        let header = if unit.is_empty() {
            self.column_name()
        } else {
            format!("{} ({unit})", self.column_name())
        };
        writeln!(writer, "{:>12} {:>20}", "wl (µm)", header)
        .map_err(io)?;
        for (wl, value) in self.wavelengths.iter().zip(values.iter()) {
            writeln!(writer, "{wl:>12.4} {value:>20.10}").map_err(io)?;
        }
        Ok(())
    }
    fn write_csv(&self, path: &Path, values: &ArrayD<f64>) -> NdResult<()> {
        let csv_error = |e: csv::Error| {
            DispersionError::Console(format!("writing csv file {} failed: {e}", path.display()))
        };
        let column = self.column_name();
        let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;
        writer
            .write_record(["wl_um", "theta_rad", "phi_rad", "T_degC", column.as_str()])
            .map_err(csv_error)?;
        for (wl, value) in self.wavelengths.iter().zip(values.iter()) {
            writer
                .write_record(
                    [*wl, self.theta, self.phi, self.temperature, *value].map(|v| v.to_string()),
                )
                .map_err(csv_error)?;
        }
        writer
            .flush()
            .map_err(|e| DispersionError::Console(format!("writing csv file failed: {e}")))?;
        info!("result written to {}", path.display());
        Ok(())
    }
}

/// Execute the command.
///
/// # Errors
///
/// This function returns an error if the evaluation fails or the output cannot be written.
pub fn run(args: &Args, writer: &mut impl Write) -> NdResult<()> {
    let io = |e: std::io::Error| DispersionError::Console(format!("writing output failed: {e}"));
    match args {
        Args::List => {
            writeln!(writer, "{}", Catalog::iter().join("\n")).map_err(io)?;
        }
        Args::Info(source) => {
            let medium = source.load()?;
            write!(writer, "{}", medium.help()).map_err(io)?;
            writeln!(writer, "  {:<15}: {}", "angles", medium.angles()).map_err(io)?;
            writeln!(writer, "  {:<15}: {}", "constants", medium.constants()).map_err(io)?;
        }
        Args::Evaluate(evaluation) => {
            let (medium, values) = evaluation.evaluate()?;
            if let Some(path) = &evaluation.csv {
                evaluation.write_csv(path, &values)?;
            } else {
                evaluation.write_table(&medium, &values, writer)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;
    use assert_matches::assert_matches;
    use std::f64::consts::FRAC_PI_2;
    use tempfile::NamedTempFile;

    fn args(cli: &[&str]) -> NdResult<Args> {
        let mut all = vec!["ndispers"];
        all.extend_from_slice(cli);
        Args::try_from(PartialArgs::try_parse_from(all).unwrap())
    }
    fn output(cli: &[&str]) -> String {
        let mut buffer = Vec::new();
        run(&args(cli).unwrap(), &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }
    #[test]
    fn wavelength_range() {
        assert_eq!(parse_wavelength_range("0.2:1.4:0.2").unwrap().len(), 7);
        let wl = parse_wavelength_range("1:2:0.5").unwrap();
        assert_eq!(wl, vec![1.0, 1.5, 2.0]);
        assert_matches!(parse_wavelength_range("1:2"), Err(DispersionError::Console(_)));
        assert_matches!(parse_wavelength_range("2:1:0.1"), Err(DispersionError::Console(_)));
        assert_matches!(parse_wavelength_range("1:2:0"), Err(DispersionError::Console(_)));
        assert_matches!(parse_wavelength_range("a:2:1"), Err(DispersionError::Console(_)));
    }
    #[test]
    fn wavelength_range_limits() {
        for range in ["0.4:inf:0.1", "-inf:1:0.1", "0.4:1:inf", "0.4:NaN:0.1"] {
            assert_matches!(
                parse_wavelength_range(range),
                Err(DispersionError::Console(_))
            );
        }
        assert_eq!(
            parse_wavelength_range("0.4:1:1e-300"),
            Err(DispersionError::Console(
                "wavelength range '0.4:1:1e-300' exceeds 1000000 points".into()
            ))
        );
        assert_eq!(parse_wavelength_range("1:2:0.001").unwrap().len(), 1001);
    }
    #[test]
    fn try_from() {
        assert_eq!(args(&["--list"]).unwrap(), Args::List);
        assert_eq!(
            args(&["-m", "caf2", "--info"]).unwrap(),
            Args::Info(MediumSource::Catalog(Catalog::CaF2))
        );
        let Args::Evaluate(e) = args(&[
            "-m",
            "beta-bbo-eimerl1987",
            "-q",
            "gvd",
            "-w",
            "0.4,0.8",
            "--theta",
            "90",
            "--deg",
            "-p",
            "e",
        ])
        .unwrap() else {
            panic!("expected an evaluation");
        };
        assert_eq!(e.quantity, QuantityKind::Gvd);
        assert_eq!(e.order, 2);
        assert_eq!(e.wavelengths, vec![0.4, 0.8]);
        assert_relative_eq!(e.theta, FRAC_PI_2);
        assert_eq!(e.polarization, Polarization::Extraordinary);
        assert_eq!(e.temperature, 20.0);
    }
    #[test]
    fn invalid_args() {
        assert_matches!(args(&["-w", "0.8"]), Err(DispersionError::Console(_)));
        assert_matches!(args(&["-m", "bbo", "-w", "0.8"]), Err(DispersionError::Console(_)));
        assert_matches!(args(&["-m", "caf2"]), Err(DispersionError::Console(_)));
        assert_matches!(
            args(&["-m", "caf2", "-f", "x.yaml", "-w", "0.8"]),
            Err(DispersionError::Console(_))
        );
        assert_matches!(
            args(&["-m", "caf2", "-q", "gdd", "-w", "0.8"]),
            Err(DispersionError::Console(_))
        );
        assert_matches!(
            args(&["-m", "caf2", "-p", "x", "-w", "0.8"]),
            Err(DispersionError::Console(_))
        );
    }
    #[test]
    fn list() {
        let text = output(&["--list"]);
        assert!(text.starts_with("beta-bbo-eimerl1987\nbeta-bbo-tamosauskas2018\n"));
        assert_eq!(text.lines().count(), 14);
        assert!(text.contains("\nlbo-zx\nkdp\nclbo\nlb4\n"));
    }
    #[test]
    fn info() {
        let text = output(&["-m", "ktp-xy", "--info"]);
        assert!(text.starts_with("KTP (KTiOPO₄), Kato 1991, xy plane (ktp-xy)\n"));
        assert!(text.contains("angles         : plane xy, theta fixed to"));
        assert!(text.contains("A_x = 3.00065"));
    }
    #[test]
    fn table() {
        let text = output(&["-m", "fused-silica", "-q", "gvd", "-w", "0.8,1.0"]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "# fused-silica, o-ray, theta = 0 rad, phi = 0 rad, T = 20 °C");
        assert!(lines[1].ends_with("gvd (fs²/mm)"));
        assert!(lines[2].trim_start().starts_with("0.8000"));
        assert!(lines[2].contains("36.16"));
    }
    #[test]
    fn unsupported_quantity() {
        let result = run(
            &args(&["-m", "beta-bbo-eimerl1987", "-q", "woa_theta", "-w", "0.8"]).unwrap(),
            &mut Vec::new(),
        );
        assert_matches!(result, Err(DispersionError::UnsupportedPolarization(_)));
    }
    #[test]
    fn csv_output() {
        let file = NamedTempFile::new().unwrap();
        let path = file.into_temp_path();
        let path_str = path.to_str().unwrap().to_owned();
        let text = output(&[
            "-m",
            "caf2",
            "-q",
            "dn_wl",
            "--order",
            "2",
            "--wl-range",
            "0.5:0.7:0.1",
            "-o",
            &path_str,
        ]);
        assert!(text.is_empty());
        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            vec!["wl_um", "theta_rad", "phi_rad", "T_degC", "dn_wl2"]
        );
        assert_eq!(reader.records().count(), 3);
        path.close().unwrap();
    }
}
