/// Unit and locale converters shared by the source parsers.
///
/// Upstream pages mix decimal commas, inline unit suffixes, Beaufort
/// annotations and three different wind units. Everything here is a pure
/// function; the parsers decide which one applies to which column.

use regex::Regex;
use std::sync::LazyLock;

use crate::model::{RelayError, Result};

// ---------------------------------------------------------------------------
// Conversion factors
// ---------------------------------------------------------------------------

/// Knots per metre-per-second.
pub const MPS_TO_KNOTS: f64 = 1.943844;

/// Kilometres per nautical mile; km/h ÷ this = knots.
pub const KMH_PER_KNOT: f64 = 1.852;

/// Factor the Meteohub-style weather tables are calibrated with. Not the
/// same as 1 / KMH_PER_KNOT and must stay separate from it.
pub const GUST_TABLE_KMH_TO_KNOTS: f64 = 0.54;

/// Wind speed units seen upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedUnit {
    Knots,
    MetersPerSecond,
    KilometersPerHour,
    /// km/h as printed by the station weather tables, converted with
    /// `GUST_TABLE_KMH_TO_KNOTS`.
    CalibratedKilometersPerHour,
}

impl SpeedUnit {
    fn to_knots(self, value: f64) -> f64 {
        match self {
            SpeedUnit::Knots => value,
            SpeedUnit::MetersPerSecond => value * MPS_TO_KNOTS,
            SpeedUnit::KilometersPerHour => value / KMH_PER_KNOT,
            SpeedUnit::CalibratedKilometersPerHour => value * GUST_TABLE_KMH_TO_KNOTS,
        }
    }

    fn from_knots(self, knots: f64) -> f64 {
        match self {
            SpeedUnit::Knots => knots,
            SpeedUnit::MetersPerSecond => knots / MPS_TO_KNOTS,
            SpeedUnit::KilometersPerHour => knots * KMH_PER_KNOT,
            SpeedUnit::CalibratedKilometersPerHour => knots / GUST_TABLE_KMH_TO_KNOTS,
        }
    }
}

/// Converts a speed between units, going through knots.
pub fn convert(value: f64, from: SpeedUnit, to: SpeedUnit) -> f64 {
    if from == to {
        return value;
    }
    to.from_knots(from.to_knots(value))
}

// ---------------------------------------------------------------------------
// Locale-formatted text
// ---------------------------------------------------------------------------

/// Parses a number such as `"12,4 °C"` or `"1013.2 hPa"`.
///
/// The decimal comma becomes a point, everything from the first whitespace
/// on is treated as the unit, and any non-numeric tail glued to the number
/// (`"87%"`) is dropped.
pub fn parse_locale_decimal(s: &str) -> Result<f64> {
    let normalized = s.trim().replace(',', ".");
    let token = normalized.split_whitespace().next().unwrap_or("");

    let prefix_len = token
        .char_indices()
        .take_while(|&(i, c)| c.is_ascii_digit() || c == '.' || (i == 0 && (c == '-' || c == '+')))
        .map(|(i, c)| i + c.len_utf8())
        .last()
        .unwrap_or(0);

    let prefix = &token[..prefix_len];
    prefix
        .parse::<f64>()
        .map_err(|_| RelayError::Parse(format!("no numeric value in '{}'", s.trim())))
}

/// Units that appear in Beaufort-annotated wind columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotatedUnit {
    KilometersPerHour,
    Knots,
}

static KMH_ANNOTATED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:[.,]\d+)?)\s*km/h\s*\((\d+)\s*Bft\)").expect("static regex")
});

static KTS_ANNOTATED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:[.,]\d+)?)\s*kts\s*\((\d+)\s*Bft\)").expect("static regex")
});

/// Extracts the magnitude from `"<number> <unit> (<n> Bft)"`.
///
/// # Errors
/// `RelayError::Parse` when the text does not have that shape. There is no
/// fallback value.
pub fn parse_unit_annotated(s: &str, unit: AnnotatedUnit) -> Result<f64> {
    let pattern = match unit {
        AnnotatedUnit::KilometersPerHour => &*KMH_ANNOTATED,
        AnnotatedUnit::Knots => &*KTS_ANNOTATED,
    };

    let caps = pattern
        .captures(s)
        .ok_or_else(|| RelayError::Parse(format!("'{}' is not a {:?} Beaufort reading", s.trim(), unit)))?;

    caps[1]
        .replace(',', ".")
        .parse::<f64>()
        .map_err(|e| RelayError::Parse(format!("bad magnitude in '{}': {}", s.trim(), e)))
}

// ---------------------------------------------------------------------------
// Compass sectors
// ---------------------------------------------------------------------------

/// Maps a compass sector code to a bearing.
///
/// 0 means "no direction". 1 and 9 are both north. Codes outside the table
/// are unset.
pub fn sector_to_degrees(sector: i64) -> Option<f64> {
    match sector {
        1 | 9 => Some(0.0),
        2 => Some(45.0),
        3 => Some(90.0),
        4 => Some(135.0),
        5 => Some(180.0),
        6 => Some(225.0),
        7 => Some(270.0),
        8 => Some(315.0),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
