#![warn(missing_docs)]
//! Module for uom macros that facilitate the creation of wavelength values and ranges
/// helper macro to create the units
#[macro_export]
macro_rules! uom_unit_creator {
    ($unit:ident, $unit_type:ident, $val1:expr) => {
        $unit_type::new::<$unit>($val1)
    };
    ($unit:ident, $unit_type:ident, $val1:expr, $val2:expr) => {
        $unit_type::new::<$unit>($val1)..$unit_type::new::<$unit>($val2)
    };
}
/// macro to create a Length in micrometer
///
/// One value creates a single `Length`, two values a `Range<Length>`.
#[macro_export]
macro_rules! micrometer {
    ($( $x:expr ),*) => {
        {
            use uom::si::{f64::Length, length::micrometer};
            $crate::uom_unit_creator![micrometer, Length, $( $x ),*]
        }
    };
}
