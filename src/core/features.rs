//! Features
//!
//! `unit_converter` is the pure conversion engine; `assistant` wraps the
//! remote language model used for explained conversions.

pub mod assistant;
pub mod unit_converter;
