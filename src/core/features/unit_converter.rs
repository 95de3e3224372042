//! Unit converter feature
//!
//! Pure conversion engine: `convert(value, from, to)` resolves both unit names
//! against the static registry, checks that they measure the same physical
//! dimension and maps the value through the SI base unit. No I/O, no state.

pub mod parsing;
pub mod registry;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

pub use parsing::{parse_conversion_query, ConversionQuery, ParseError};
pub use registry::{Dimension, Unit};

// ============================================================================
// Errors
// ============================================================================

/// Recoverable conversion failures.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum ConversionError {
    /// The unit name is not in the registry.
    #[error("Unknown unit: '{unit}'")]
    UnknownUnit { unit: String },

    /// Both units are known but measure different physical quantities.
    #[error("Cannot convert {from} ({from_dimension}) to {to} ({to_dimension})")]
    Incompatible {
        from: String,
        to: String,
        from_dimension: Dimension,
        to_dimension: Dimension,
    },
}

// ============================================================================
// Categories
// ============================================================================

/// Named group of units offered together for selection.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct UnitCategory {
    pub name: &'static str,
    pub units: &'static [&'static str],
}

static UNIT_CATEGORIES: &[UnitCategory] = &[
    UnitCategory {
        name: "Length",
        units: &["meter", "kilometer", "centimeter", "millimeter", "mile", "yard", "foot", "inch"],
    },
    UnitCategory {
        name: "Weight",
        units: &["gram", "kilogram", "milligram", "metric ton", "pound", "ounce"],
    },
    UnitCategory {
        name: "Temperature",
        units: &["celsius", "fahrenheit", "kelvin"],
    },
    UnitCategory {
        name: "Area",
        units: &[
            "square meter",
            "square kilometer",
            "square mile",
            "square yard",
            "square foot",
            "square inch",
        ],
    },
    UnitCategory {
        name: "Volume",
        units: &["liter", "milliliter", "gallon", "quart", "pint"],
    },
    UnitCategory {
        name: "Speed",
        units: &["miles per hour", "kilometers per hour", "meters per second"],
    },
];

/// The static category table, in display order.
pub fn unit_categories() -> &'static [UnitCategory] {
    UNIT_CATEGORIES
}

/// Find a category by name, ignoring case.
pub fn find_category(name: &str) -> Option<&'static UnitCategory> {
    let name = name.trim();
    UNIT_CATEGORIES
        .iter()
        .find(|category| category.name.eq_ignore_ascii_case(name))
}

/// First category whose units share the dimension of `unit`.
pub fn category_for_unit(unit: &str) -> Option<&'static UnitCategory> {
    let dimension = dimension_of(unit).ok()?;
    UNIT_CATEGORIES.iter().find(|category| {
        category
            .units
            .first()
            .and_then(|first| registry::resolve(first))
            .is_some_and(|u| u.dimension == dimension)
    })
}

// ============================================================================
// Conversion
// ============================================================================

/// Converted magnitude expressed in the target unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionResult {
    pub magnitude: f64,
    pub unit: String,
}

/// Resolve a unit name, failing with `UnknownUnit`.
pub fn lookup_unit(name: &str) -> Result<Unit, ConversionError> {
    registry::resolve(name).ok_or_else(|| ConversionError::UnknownUnit {
        unit: name.trim().to_string(),
    })
}

/// Physical dimension of a unit name.
pub fn dimension_of(name: &str) -> Result<Dimension, ConversionError> {
    lookup_unit(name).map(|unit| unit.dimension)
}

/// Convert `value` from `from_unit` to `to_unit`.
///
/// Ratio units scale linearly through the SI base unit; affine units
/// (Celsius, Fahrenheit) apply their offset on the way in and out. Both names
/// are resolved before dimensions are compared, so an unknown name always
/// wins over a dimension mismatch.
pub fn convert(value: f64, from_unit: &str, to_unit: &str) -> Result<ConversionResult, ConversionError> {
    let from = lookup_unit(from_unit)?;
    let to = lookup_unit(to_unit)?;

    if from.dimension != to.dimension {
        debug!(
            from = %from.name,
            to = %to.name,
            from_dimension = %from.dimension,
            to_dimension = %to.dimension,
            "dimension mismatch"
        );
        return Err(ConversionError::Incompatible {
            from: from_unit.trim().to_string(),
            to: to_unit.trim().to_string(),
            from_dimension: from.dimension,
            to_dimension: to.dimension,
        });
    }

    // Same unit: hand the value back untouched rather than round-tripping it
    let magnitude = if from.is_equivalent(&to) {
        value
    } else {
        to.from_base(from.to_base(value))
    };

    debug!(value, from = %from.name, to = %to.name, magnitude, "converted");

    Ok(ConversionResult {
        magnitude,
        unit: to_unit.trim().to_string(),
    })
}

// ============================================================================
// Presentation helpers
// ============================================================================

/// Magnitudes at or above this are shown in scientific notation.
const SCIENTIFIC_ABOVE: f64 = 1e15;
/// Non-zero input values below this are shown in scientific notation.
const SCIENTIFIC_BELOW: f64 = 1e-6;

/// Fixed-point rendering used for results (4 places) and history (2 places).
/// Very large magnitudes switch to `1.2345e20` with the same precision.
pub fn format_magnitude(value: f64, decimals: usize) -> String {
    if value.abs() >= SCIENTIFIC_ABOVE {
        return format!("{:.*e}", decimals, value);
    }
    let formatted = format!("{:.*}", decimals, value);
    // "-0.00" reads as a sign error to users
    if formatted.starts_with('-') && formatted[1..].chars().all(|c| c == '0' || c == '.') {
        return formatted[1..].to_string();
    }
    formatted
}

/// Render an input value the way users typed it: no trailing zeros, and
/// scientific notation for extreme magnitudes.
pub fn format_value(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude >= SCIENTIFIC_ABOVE || (magnitude != 0.0 && magnitude < SCIENTIFIC_BELOW) {
        format!("{:e}", value)
    } else {
        format!("{}", value)
    }
}
