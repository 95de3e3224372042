//! Unit registry
//!
//! Static table of known units. Every unit is described by its physical
//! dimension and an affine map onto the SI base unit of that dimension:
//! `base_value = value * scale + offset`. Pure ratio units have a zero offset.
//!
//! Names are resolved in two passes: an exact alias lookup (symbols such as
//! `K` or `mL` are case-sensitive) followed by a case-insensitive lookup.
//! Compound names (`square foot`, `cubic meter`, `miles per hour`, `m/s`,
//! `ft^2`) are built from simple units at resolution time.

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use serde::Serialize;

// ============================================================================
// Dimensions
// ============================================================================

/// Exponents over the base quantities a unit is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Dimension {
    pub length: i8,
    pub mass: i8,
    pub time: i8,
    pub temperature: i8,
}

impl Dimension {
    pub const NONE: Dimension = Dimension::new(0, 0, 0, 0);
    pub const LENGTH: Dimension = Dimension::new(1, 0, 0, 0);
    pub const MASS: Dimension = Dimension::new(0, 1, 0, 0);
    pub const TIME: Dimension = Dimension::new(0, 0, 1, 0);
    pub const TEMPERATURE: Dimension = Dimension::new(0, 0, 0, 1);
    pub const AREA: Dimension = Dimension::new(2, 0, 0, 0);
    pub const VOLUME: Dimension = Dimension::new(3, 0, 0, 0);
    pub const SPEED: Dimension = Dimension::new(1, 0, -1, 0);

    pub const fn new(length: i8, mass: i8, time: i8, temperature: i8) -> Self {
        Self {
            length,
            mass,
            time,
            temperature,
        }
    }

    /// Multiply every exponent by `power` (`square` = 2, `cubic` = 3).
    /// `None` when an exponent leaves the `i8` range.
    pub fn powi(self, power: i8) -> Option<Self> {
        Some(Self::new(
            self.length.checked_mul(power)?,
            self.mass.checked_mul(power)?,
            self.time.checked_mul(power)?,
            self.temperature.checked_mul(power)?,
        ))
    }

    /// Dimension of `self / other`, `None` on exponent overflow.
    pub fn per(self, other: Dimension) -> Option<Self> {
        Some(Self::new(
            self.length.checked_sub(other.length)?,
            self.mass.checked_sub(other.mass)?,
            self.time.checked_sub(other.time)?,
            self.temperature.checked_sub(other.temperature)?,
        ))
    }

    /// Common name of the dimension, if it has one.
    pub fn name(&self) -> Option<&'static str> {
        let name = match *self {
            Dimension::NONE => "dimensionless",
            Dimension::LENGTH => "length",
            Dimension::MASS => "mass",
            Dimension::TIME => "time",
            Dimension::TEMPERATURE => "temperature",
            Dimension::AREA => "area",
            Dimension::VOLUME => "volume",
            Dimension::SPEED => "speed",
            _ => return None,
        };
        Some(name)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = self.name() {
            return f.write_str(name);
        }

        let factors: Vec<String> = [
            ("length", self.length),
            ("mass", self.mass),
            ("time", self.time),
            ("temperature", self.temperature),
        ]
        .iter()
        .filter(|(_, exp)| *exp != 0)
        .map(|(base, exp)| match exp {
            1 => (*base).to_string(),
            _ => format!("{}^{}", base, exp),
        })
        .collect();

        f.write_str(&factors.join("·"))
    }
}

// ============================================================================
// Resolved units
// ============================================================================

/// A unit resolved from the registry, possibly compound.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Unit {
    pub name: String,
    pub dimension: Dimension,
    pub scale: f64,
    pub offset: f64,
}

impl Unit {
    /// Affine units (Celsius, Fahrenheit) have a non-zero offset.
    pub fn is_affine(&self) -> bool {
        self.offset != 0.0
    }

    pub fn to_base(&self, value: f64) -> f64 {
        value * self.scale + self.offset
    }

    pub fn from_base(&self, base_value: f64) -> f64 {
        (base_value - self.offset) / self.scale
    }

    /// True when both units describe exactly the same quantity scale.
    pub fn is_equivalent(&self, other: &Unit) -> bool {
        self.dimension == other.dimension && self.scale == other.scale && self.offset == other.offset
    }

    fn powi(&self, power: i8, name: String) -> Option<Unit> {
        if self.is_affine() {
            return None;
        }
        Some(Unit {
            name,
            dimension: self.dimension.powi(power)?,
            scale: self.scale.powi(i32::from(power)),
            offset: 0.0,
        })
    }

    fn per(&self, denominator: &Unit, name: String) -> Option<Unit> {
        if self.is_affine() || denominator.is_affine() {
            return None;
        }
        Some(Unit {
            name,
            dimension: self.dimension.per(denominator.dimension)?,
            scale: self.scale / denominator.scale,
            offset: 0.0,
        })
    }
}

// ============================================================================
// Static definitions
// ============================================================================

/// Simple (non-compound) unit known to the registry.
#[derive(Debug, Clone)]
pub struct UnitDefinition {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub dimension: Dimension,
    pub scale: f64,
    pub offset: f64,
}

impl UnitDefinition {
    fn to_unit(&self) -> Unit {
        Unit {
            name: self.name.to_string(),
            dimension: self.dimension,
            scale: self.scale,
            offset: self.offset,
        }
    }
}

const fn ratio(
    name: &'static str,
    aliases: &'static [&'static str],
    dimension: Dimension,
    scale: f64,
) -> UnitDefinition {
    UnitDefinition {
        name,
        aliases,
        dimension,
        scale,
        offset: 0.0,
    }
}

// Temperatures are expressed against kelvin: K = value * scale + offset
const FAHRENHEIT_SCALE: f64 = 5.0 / 9.0;
const FAHRENHEIT_OFFSET: f64 = 459.67 * 5.0 / 9.0;

static DEFINITIONS: &[UnitDefinition] = &[
    // Length (base: meter)
    ratio("meter", &["m", "meters", "metre", "metres"], Dimension::LENGTH, 1.0),
    ratio("kilometer", &["km", "kilometers", "kilometre", "kilometres"], Dimension::LENGTH, 1000.0),
    ratio("centimeter", &["cm", "centimeters", "centimetre", "centimetres"], Dimension::LENGTH, 0.01),
    ratio("millimeter", &["mm", "millimeters", "millimetre", "millimetres"], Dimension::LENGTH, 0.001),
    ratio("micrometer", &["µm", "um", "micrometers", "micron", "microns"], Dimension::LENGTH, 1e-6),
    ratio("mile", &["mi", "miles"], Dimension::LENGTH, 1609.344),
    ratio("yard", &["yd", "yards"], Dimension::LENGTH, 0.9144),
    ratio("foot", &["ft", "feet", "'"], Dimension::LENGTH, 0.3048),
    ratio("inch", &["in", "inches", "\""], Dimension::LENGTH, 0.0254),
    ratio("nautical mile", &["nmi", "nautical miles"], Dimension::LENGTH, 1852.0),
    // Mass (base: kilogram)
    ratio("gram", &["g", "grams", "gramme", "grammes"], Dimension::MASS, 1e-3),
    ratio("kilogram", &["kg", "kilograms", "kilo", "kilos"], Dimension::MASS, 1.0),
    ratio("milligram", &["mg", "milligrams"], Dimension::MASS, 1e-6),
    ratio("metric ton", &["t", "tonne", "tonnes", "metric tons", "metric tonne"], Dimension::MASS, 1000.0),
    ratio("pound", &["lb", "lbs", "pounds"], Dimension::MASS, 0.453_592_37),
    ratio("ounce", &["oz", "ounces"], Dimension::MASS, 0.028_349_523_125),
    ratio("stone", &["st", "stones"], Dimension::MASS, 6.350_293_18),
    // Temperature (base: kelvin)
    ratio("kelvin", &["K", "kelvins", "degK"], Dimension::TEMPERATURE, 1.0),
    UnitDefinition {
        name: "celsius",
        aliases: &["°C", "degC", "C", "degree celsius", "degrees celsius", "centigrade"],
        dimension: Dimension::TEMPERATURE,
        scale: 1.0,
        offset: 273.15,
    },
    UnitDefinition {
        name: "fahrenheit",
        aliases: &["°F", "degF", "F", "degree fahrenheit", "degrees fahrenheit"],
        dimension: Dimension::TEMPERATURE,
        scale: FAHRENHEIT_SCALE,
        offset: FAHRENHEIT_OFFSET,
    },
    ratio("rankine", &["°R", "degR", "R"], Dimension::TEMPERATURE, FAHRENHEIT_SCALE),
    // Time (base: second)
    ratio("second", &["s", "sec", "secs", "seconds"], Dimension::TIME, 1.0),
    ratio("minute", &["min", "mins", "minutes"], Dimension::TIME, 60.0),
    ratio("hour", &["h", "hr", "hrs", "hours"], Dimension::TIME, 3600.0),
    ratio("day", &["d", "days"], Dimension::TIME, 86_400.0),
    // Area (base: square meter). Squares of lengths are compound.
    ratio("hectare", &["ha", "hectares"], Dimension::AREA, 1e4),
    ratio("acre", &["ac", "acres"], Dimension::AREA, 4_046.856_422_4),
    // Volume (base: cubic meter). US customary measures.
    ratio("liter", &["L", "l", "liters", "litre", "litres"], Dimension::VOLUME, 1e-3),
    ratio("milliliter", &["mL", "ml", "milliliters", "millilitre", "millilitres"], Dimension::VOLUME, 1e-6),
    ratio("gallon", &["gal", "gallons"], Dimension::VOLUME, 3.785_411_784e-3),
    ratio("quart", &["qt", "quarts"], Dimension::VOLUME, 9.463_529_46e-4),
    ratio("pint", &["pt", "pints"], Dimension::VOLUME, 4.731_764_73e-4),
    ratio("cup", &["cups"], Dimension::VOLUME, 2.365_882_365e-4),
    ratio("fluid ounce", &["fl oz", "floz", "fl-oz", "fluid ounces"], Dimension::VOLUME, 2.957_352_956_25e-5),
    ratio("tablespoon", &["tbsp", "tablespoons"], Dimension::VOLUME, 1.478_676_478_125e-5),
    ratio("teaspoon", &["tsp", "teaspoons"], Dimension::VOLUME, 4.928_921_593_75e-6),
    // Speed (base: meter per second). Other speeds are compound.
    ratio("mile per hour", &["mph"], Dimension::SPEED, 0.447_04),
    ratio("kilometer per hour", &["kph", "kmh"], Dimension::SPEED, 1.0 / 3.6),
    ratio("knot", &["kn", "kt", "knots"], Dimension::SPEED, 1852.0 / 3600.0),
];

/// Exact-spelling index: canonical names and aliases as written.
static EXACT_INDEX: Lazy<HashMap<&'static str, &'static UnitDefinition>> = Lazy::new(|| {
    let mut index = HashMap::new();
    for def in DEFINITIONS {
        index.insert(def.name, def);
        for alias in def.aliases {
            index.insert(*alias, def);
        }
    }
    index
});

/// Case-insensitive index. The first definition claiming a lowercase key wins.
static FOLDED_INDEX: Lazy<HashMap<String, &'static UnitDefinition>> = Lazy::new(|| {
    let mut index = HashMap::new();
    for def in DEFINITIONS {
        for key in std::iter::once(&def.name).chain(def.aliases.iter()) {
            index.entry(key.to_lowercase()).or_insert(def);
        }
    }
    index
});

/// All simple unit definitions, in declaration order.
pub fn definitions() -> &'static [UnitDefinition] {
    DEFINITIONS
}

// ============================================================================
// Name resolution
// ============================================================================

/// Collapse whitespace and underscores to single spaces.
fn normalize_name(name: &str) -> String {
    name.replace('_', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn lookup_simple(name: &str) -> Option<Unit> {
    EXACT_INDEX
        .get(name)
        .or_else(|| FOLDED_INDEX.get(&name.to_lowercase()))
        .map(|def| def.to_unit())
}

const SQUARE_PREFIXES: &[&str] = &["square ", "sq "];
const CUBIC_PREFIXES: &[&str] = &["cubic ", "cu "];
const SQUARE_SUFFIXES: &[&str] = &[" squared", "^2", "²", "2"];
const CUBIC_SUFFIXES: &[&str] = &[" cubed", "^3", "³", "3"];

/// Split off a power marker (`square foot`, `ft^2`, `m³`).
fn split_power(name: &str) -> Option<(i8, &str)> {
    for (power, prefixes) in [(2, SQUARE_PREFIXES), (3, CUBIC_PREFIXES)] {
        for prefix in prefixes {
            let matches = name
                .get(..prefix.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(prefix));
            if matches {
                return Some((power, name[prefix.len()..].trim()));
            }
        }
    }
    for (power, suffixes) in [(2, SQUARE_SUFFIXES), (3, CUBIC_SUFFIXES)] {
        for suffix in suffixes {
            if let Some(base) = name.strip_suffix(suffix) {
                if !base.trim().is_empty() {
                    return Some((power, base.trim()));
                }
            }
        }
    }
    None
}

/// Split `a per b` or `a/b` at the last separator so chains associate left.
fn split_quotient(name: &str) -> Option<(&str, &str)> {
    // ASCII folding keeps byte offsets aligned with `name`
    let lower = name.to_ascii_lowercase();
    if let Some(pos) = lower.rfind(" per ") {
        return Some((name[..pos].trim(), name[pos + " per ".len()..].trim()));
    }
    name.rfind('/')
        .map(|pos| (name[..pos].trim(), name[pos + 1..].trim()))
}

/// Longest `per` chain a compound name may contain.
const MAX_QUOTIENT_DEPTH: usize = 8;

fn resolve_normalized(name: &str, depth: usize) -> Option<Unit> {
    if name.is_empty() || depth > MAX_QUOTIENT_DEPTH {
        return None;
    }

    if let Some(unit) = lookup_simple(name) {
        return Some(unit);
    }

    if let Some((numerator, denominator)) = split_quotient(name) {
        if numerator.is_empty() || denominator.is_empty() {
            return None;
        }
        let num = resolve_normalized(numerator, depth + 1)?;
        let den = resolve_normalized(denominator, depth + 1)?;
        return num.per(&den, name.to_string());
    }

    if let Some((power, base)) = split_power(name) {
        let base_unit = lookup_simple(base)?;
        return base_unit.powi(power, name.to_string());
    }

    None
}

/// Resolve a unit name (simple or compound) against the registry.
///
/// Returns `None` for unknown names, for compound names built from affine
/// units (which have no meaningful power or quotient) and for chains too
/// long to describe with the exponent range.
pub fn resolve(name: &str) -> Option<Unit> {
    resolve_normalized(&normalize_name(name), 0)
}
