/// Meteo-services gateway parser.
///
/// The gateway page is loosely formatted text (sometimes wrapped in HTML)
/// consisting of `token value` pairs such as `t2m 8.1` or `wxtime 1740055800`.
/// The page layout changes often, so instead of relying on position every
/// pair is scanned into a map and the known tokens are picked out. A token
/// that is missing leaves its field unset.
///
/// Token        Meaning
/// wxtime       observation time, epoch seconds
/// t2m          air temperature (°C)
/// relhum       relative humidity (%)
/// press        pressure (hPa)
/// rainrate     precipitation (mm)
/// windspeed    mean wind (m/s)
/// winddir      wind direction (deg)
/// windgust     gust (m/s)

use regex::Regex;
use scraper::Html;
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::convert::SpeedUnit;
use crate::model::{RawObservation, RawTimestamp, Result, Speed};

static TOKEN_PAIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w+)\s*(-?\d+(\.\d+)?)").expect("static regex"));

/// Parses a gateway page. Never fails on missing tokens; an absent `wxtime`
/// surfaces later as a validation error.
pub fn parse_gateway(page: &str) -> Result<RawObservation> {
    let tokens = scan_tokens(&page_text(page));

    let value = |name: &str| tokens.get(name).copied();
    let speed = |name: &str| value(name).map(|v| Speed::new(v, SpeedUnit::MetersPerSecond));

    let timestamp = match value("wxtime") {
        Some(secs) => RawTimestamp::EpochSeconds(secs as i64),
        None => RawTimestamp::Missing,
    };

    Ok(RawObservation {
        timestamp,
        temperature_c: value("t2m"),
        humidity_percent: value("relhum"),
        air_pressure_hpa: value("press"),
        rain_mm: value("rainrate"),
        wind_speed: speed("windspeed"),
        wind_gust: speed("windgust"),
        wind_direction_degrees: value("winddir"),
    })
}

/// Visible text of the page, text nodes separated by spaces.
fn page_text(page: &str) -> String {
    Html::parse_document(page)
        .root_element()
        .text()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Every `token number` pair in the text. A repeated token keeps its last value.
pub fn scan_tokens(text: &str) -> HashMap<String, f64> {
    TOKEN_PAIR
        .captures_iter(text)
        .filter_map(|caps| {
            let value = caps[2].parse::<f64>().ok()?;
            Some((caps[1].to_string(), value))
        })
        .collect()
}
