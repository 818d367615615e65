//! Helper functions and macros used throughout the crate
pub mod test_helper;
pub mod unit_format;
pub mod uom_macros;
