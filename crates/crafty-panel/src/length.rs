#![forbid(unsafe_code)]

//! Typed lengths from the measurement box.
//!
//! Accepted forms, all optionally signed:
//!
//! | Input        | Meaning                    |
//! |--------------|----------------------------|
//! | `3`          | 3 in the default unit      |
//! | `0.75"`      | 0.75 in                    |
//! | `1 1/2 in`   | 1.5 in                     |
//! | `19mm`       | 19 mm                      |
//! | `2'`         | 2 ft                       |
//! | `3'6"`       | 3 ft 6 in                  |
//!
//! Results are always in inches.

use std::fmt;

/// Units understood by [`parse_length`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LengthUnit {
    #[default]
    Inches,
    Feet,
    Millimeters,
    Centimeters,
    Meters,
}

impl LengthUnit {
    /// Unit for a suffix such as `mm` or `"`. Case-insensitive.
    #[must_use]
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix.to_ascii_lowercase().as_str() {
            "\"" | "in" | "inch" | "inches" => Some(Self::Inches),
            "'" | "ft" | "foot" | "feet" => Some(Self::Feet),
            "mm" => Some(Self::Millimeters),
            "cm" => Some(Self::Centimeters),
            "m" => Some(Self::Meters),
            _ => None,
        }
    }

    /// Inches per one of this unit.
    #[must_use]
    pub const fn inches(self) -> f64 {
        match self {
            Self::Inches => 1.0,
            Self::Feet => 12.0,
            Self::Millimeters => 1.0 / 25.4,
            Self::Centimeters => 1.0 / 2.54,
            Self::Meters => 1.0 / 0.0254,
        }
    }
}

/// Why a typed length was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LengthParseError {
    #[error("no length given")]
    Empty,

    #[error("`{0}` is not a number")]
    InvalidNumber(String),

    #[error("unknown unit `{0}`")]
    UnknownUnit(String),
}

/// Parse a typed length into inches.
///
/// Bare numbers are read in `default_unit`.
pub fn parse_length(text: &str, default_unit: LengthUnit) -> Result<f64, LengthParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(LengthParseError::Empty);
    }
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, text.strip_prefix('+').unwrap_or(text).trim_start()),
    };

    // Feet followed by inches, e.g. 3'6".
    let inches = match body.split_once('\'') {
        Some((feet, rest)) if !rest.trim().is_empty() => {
            let feet = parse_number(feet.trim())? * LengthUnit::Feet.inches();
            feet + parse_quantity(rest.trim(), LengthUnit::Inches)?
        }
        _ => parse_quantity(body, default_unit)?,
    };
    Ok(if negative { -inches } else { inches })
}

/// Format a length in inches the way the measurement box shows it.
#[must_use]
pub fn format_inches(inches: f64) -> String {
    let rounded = format!("{inches:.4}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    let trimmed = if trimmed == "-0" { "0" } else { trimmed };
    format!("{trimmed}\"")
}

/// A number with an optional unit suffix.
fn parse_quantity(text: &str, default_unit: LengthUnit) -> Result<f64, LengthParseError> {
    let split = text
        .find(|c: char| c.is_ascii_alphabetic() || c == '"' || c == '\'')
        .unwrap_or(text.len());
    let (number, suffix) = text.split_at(split);
    let suffix = suffix.trim();
    let unit = if suffix.is_empty() {
        default_unit
    } else {
        LengthUnit::from_suffix(suffix).ok_or_else(|| LengthParseError::UnknownUnit(suffix.to_owned()))?
    };
    Ok(parse_number(number.trim())? * unit.inches())
}

/// A decimal, a fraction `a/b`, or a mixed number `n a/b`.
fn parse_number(text: &str) -> Result<f64, LengthParseError> {
    let invalid = || LengthParseError::InvalidNumber(text.to_owned());
    let decimal = |s: &str| -> Result<f64, LengthParseError> {
        let value: f64 = s.parse().map_err(|_| invalid())?;
        if value.is_finite() { Ok(value) } else { Err(invalid()) }
    };
    let fraction = |s: &str| -> Result<f64, LengthParseError> {
        match s.split_once('/') {
            Some((num, den)) => {
                let den = decimal(den.trim())?;
                if den == 0.0 {
                    return Err(invalid());
                }
                Ok(decimal(num.trim())? / den)
            }
            None => decimal(s),
        }
    };

    let mut parts = text.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(whole), Some(frac), None) if frac.contains('/') && !whole.contains('/') => {
            Ok(decimal(whole)? + fraction(frac)?)
        }
        (Some(single), None, None) => fraction(single),
        _ => Err(invalid()),
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Inches => "in",
            Self::Feet => "ft",
            Self::Millimeters => "mm",
            Self::Centimeters => "cm",
            Self::Meters => "m",
        })
    }
}
