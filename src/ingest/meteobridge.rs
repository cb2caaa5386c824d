/// Meteobridge live data XML parser.
///
/// `livedataxml.cgi` returns one element per sensor under the root, with
/// every reading as a string attribute:
///
///   WIND  wind, gust (m/s), dir (deg), date (YYYYMMDDhhmmss, UTC)
///   TH    temp (°C), hum (%)
///   THB   press (hPa)
///   RAIN  rate (mm)
///
/// The WIND timestamp is used for the whole observation since it is the
/// most frequently updated sensor.

use chrono::NaiveDateTime;
use roxmltree::{Document, Node};

use crate::convert::SpeedUnit;
use crate::model::{RawObservation, RawTimestamp, RelayError, Result, Speed};

const ORIGIN: &str = "meteobridge";
const DATE_FORMAT: &str = "%Y%m%d%H%M%S";

/// Parses a Meteobridge live data document.
///
/// # Errors
/// - `RelayError::SourceFormat` when the XML is malformed or a sensor tag
///   or attribute is missing.
/// - `RelayError::Parse` when an attribute is present but not a number or
///   the date is not `YYYYMMDDhhmmss`.
pub fn parse_livedata(xml: &str) -> Result<RawObservation> {
    let doc = Document::parse(xml)
        .map_err(|e| RelayError::source_format(ORIGIN, format!("invalid XML: {}", e), xml))?;
    let root = doc.root_element();

    let wind = child(root, "WIND", xml)?;
    let th = child(root, "TH", xml)?;
    let thb = child(root, "THB", xml)?;
    let rain = child(root, "RAIN", xml)?;

    let date = attribute(wind, "date", xml)?;
    let timestamp = NaiveDateTime::parse_from_str(date, DATE_FORMAT)
        .map_err(|e| RelayError::Parse(format!("WIND date '{}': {}", date, e)))?
        .and_utc();

    Ok(RawObservation {
        timestamp: RawTimestamp::Zoned(timestamp),
        temperature_c: Some(number(th, "temp", xml)?),
        humidity_percent: Some(number(th, "hum", xml)?),
        air_pressure_hpa: Some(number(thb, "press", xml)?),
        rain_mm: Some(number(rain, "rate", xml)?),
        wind_speed: Some(Speed::new(number(wind, "wind", xml)?, SpeedUnit::MetersPerSecond)),
        wind_gust: Some(Speed::new(number(wind, "gust", xml)?, SpeedUnit::MetersPerSecond)),
        wind_direction_degrees: Some(number(wind, "dir", xml)?),
    })
}

fn child<'a, 'input>(root: Node<'a, 'input>, tag: &str, xml: &str) -> Result<Node<'a, 'input>> {
    root.children()
        .find(|n| n.has_tag_name(tag))
        .ok_or_else(|| RelayError::source_format(ORIGIN, format!("missing tag {}", tag), xml))
}

fn attribute<'a>(node: Node<'a, '_>, name: &str, xml: &str) -> Result<&'a str> {
    node.attribute(name).ok_or_else(|| {
        RelayError::source_format(
            ORIGIN,
            format!("{} has no '{}' attribute", node.tag_name().name(), name),
            &xml[node.range()],
        )
    })
}

fn number(node: Node<'_, '_>, name: &str, xml: &str) -> Result<f64> {
    let raw = attribute(node, name, xml)?;
    raw.trim().parse::<f64>().map_err(|_| {
        RelayError::Parse(format!(
            "{} {}='{}' is not a number",
            node.tag_name().name(),
            name,
            raw
        ))
    })
}
