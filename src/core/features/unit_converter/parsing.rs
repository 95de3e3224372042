//! Free-text conversion queries
//!
//! Parses inputs such as `5 feet to meters`, `12km in mi` or `-40 °F → °C`
//! into a value and two unit names. Unit names are not validated here; the
//! engine reports unknown names with its own error.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Empty query")]
    Empty,

    #[error("Expected '<value> <unit> to <unit>', got '{0}'")]
    InvalidFormat(String),

    #[error("Invalid number: '{0}'")]
    InvalidNumber(String),
}

/// A query split into its three parts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionQuery {
    pub value: f64,
    pub from_unit: String,
    pub to_unit: String,
}

// Compiled once; the patterns are literals so construction cannot fail at runtime
static QUERY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*(?:convert\s+)?([+-]?)([\d.,]*\d[\d.,]*)(e[+-]?\d+)?\s*(.+?)\s+(?:to|in|into|as|->|→|=>)\s+(.+?)\s*$",
    )
    .expect("query pattern is valid")
});

static THOUSANDS_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[1-9]\d{0,2}(?:,\d{3})+$").expect("thousands pattern is valid"));

/// Turn the digits of a number into something `f64::from_str` accepts.
///
/// Commas are thousands separators when they group the integer part in
/// threes (`1,000`, `12,345.5`). A single comma that does not fit that
/// shape is a decimal separator (`2,5`, `0,125`). Anything else is ambiguous.
fn normalize_digits(raw: &str) -> Option<String> {
    if raw.matches('.').count() > 1 {
        return None;
    }
    if !raw.contains(',') {
        return Some(raw.to_string());
    }

    let (integer, fraction) = match raw.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (raw, None),
    };

    if THOUSANDS_PATTERN.is_match(integer) {
        let mut digits = integer.replace(',', "");
        if let Some(fraction) = fraction {
            if fraction.contains(',') {
                return None;
            }
            digits.push('.');
            digits.push_str(fraction);
        }
        return Some(digits);
    }

    if fraction.is_none() && raw.matches(',').count() == 1 {
        return Some(raw.replace(',', "."));
    }

    None
}

/// Parse `<value> <from unit> (to|in|into|as|->|→|=>) <to unit>`.
pub fn parse_conversion_query(text: &str) -> Result<ConversionQuery, ParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ParseError::Empty);
    }

    let caps = QUERY_PATTERN
        .captures(text)
        .ok_or_else(|| ParseError::InvalidFormat(text.to_string()))?;

    let sign = &caps[1];
    let digits = &caps[2];
    let exponent = caps.get(3).map_or("", |m| m.as_str());
    let raw_value = format!("{}{}{}", sign, digits, exponent);

    let value: f64 = normalize_digits(digits)
        .and_then(|digits| format!("{}{}{}", sign, digits, exponent).parse().ok())
        .ok_or(ParseError::InvalidNumber(raw_value))?;

    Ok(ConversionQuery {
        value,
        from_unit: caps[4].trim().to_string(),
        to_unit: caps[5].trim().to_string(),
    })
}
