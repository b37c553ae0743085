//! ICS document generation.
//!
//! Documents follow RFC 5545 line conventions but keep a fixed field order
//! that calendar importers have been tested against.

mod generate;
pub mod timezone;

pub use generate::{PRODID, generate_ics, render_ics, validate};
