//! Formatting of wavelengths and wavelength ranges for help texts and tables.
use std::ops::Range;

use uom::si::{
    f64::Length,
    length::{micrometer, nanometer},
};

/// Format a wavelength in µm, switching to nm below 100 nm.
///
/// # Example
/// ```
/// use ndispers::{micrometer, utils::unit_format::format_wavelength};
///
/// assert_eq!(format_wavelength(micrometer!(1.064)), "1.064 µm");
/// assert_eq!(format_wavelength(micrometer!(0.05)), "50 nm");
/// ```
#[must_use]
pub fn format_wavelength(wavelength: Length) -> String {
    let um = wavelength.get::<micrometer>();
    if um.abs() < 0.1 && um != 0.0 {
        format!("{} nm", round_digits(wavelength.get::<nanometer>()))
    } else {
        format!("{} µm", round_digits(um))
    }
}
/// Format a wavelength range as `start - end`.
#[must_use]
pub fn format_wavelength_range(range: &Range<Length>) -> String {
    format!(
        "{} - {}",
        format_wavelength(range.start),
        format_wavelength(range.end)
    )
}
fn round_digits(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}
