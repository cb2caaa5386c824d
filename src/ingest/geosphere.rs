/// GeoSphere Austria (formerly ZAMG) station/current API parser.
///
/// API Documentation: https://dataset.api.hub.geosphere.at/v1/docs/
///
/// Response shape (GeoJSON FeatureCollection):
///   timestamps[]                          — "YYYY-MM-DDThh:mm+hh:mm"
///   features[].properties.parameters.{P}  — one series per requested parameter
///     .data[]                             — values aligned with timestamps, may be null
///
/// TAWES parameters used:
///   TL    air temperature (°C)
///   RFAM  relative humidity, arithmetic mean (%)
///   P     air pressure (hPa)
///   RR    precipitation, last 10 minutes (mm)
///   FFAM  wind speed, arithmetic mean (m/s)
///   DD    wind direction, last 10 minutes (deg)
///   FFX   gust (m/s)

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;

use crate::convert::SpeedUnit;
use crate::model::{RawObservation, RawTimestamp, RelayError, Result, Speed};

const ORIGIN: &str = "geosphere";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M%z";

// ---------------------------------------------------------------------------
// Serde structures
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct CurrentResponse {
    timestamps: Vec<String>,
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    properties: Properties,
}

#[derive(Deserialize)]
struct Properties {
    parameters: HashMap<String, Parameter>,
}

#[derive(Deserialize)]
struct Parameter {
    data: Vec<Option<f64>>,
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Parses a station/current response, taking the first timestamp and the
/// first data point of each parameter.
///
/// # Errors
/// - `RelayError::SourceFormat` for malformed JSON, no features, a missing
///   parameter, or an empty `timestamps`/`data` array.
/// - `RelayError::Parse` if the timestamp is not `%Y-%m-%dT%H:%M%z`.
pub fn parse_current(json: &str) -> Result<RawObservation> {
    let response: CurrentResponse = serde_json::from_str(json)
        .map_err(|e| RelayError::source_format(ORIGIN, format!("JSON deserialization failed: {}", e), json))?;

    let ts = response
        .timestamps
        .first()
        .ok_or_else(|| RelayError::source_format(ORIGIN, "empty timestamps array", json))?;
    let timestamp = DateTime::parse_from_str(ts, TIMESTAMP_FORMAT)
        .map_err(|e| RelayError::Parse(format!("timestamp '{}': {}", ts, e)))?
        .with_timezone(&Utc);

    let parameters = &response
        .features
        .first()
        .ok_or_else(|| RelayError::source_format(ORIGIN, "no features in response", json))?
        .properties
        .parameters;

    let first = |name: &str| -> Result<Option<f64>> {
        let series = parameters.get(name).ok_or_else(|| {
            RelayError::source_format(ORIGIN, format!("missing parameter {}", name), json)
        })?;
        series.data.first().copied().ok_or_else(|| {
            RelayError::source_format(ORIGIN, format!("parameter {} has no data", name), json)
        })
    };
    let speed = |name: &str| -> Result<Option<Speed>> {
        Ok(first(name)?.map(|v| Speed::new(v, SpeedUnit::MetersPerSecond)))
    };

    Ok(RawObservation {
        timestamp: RawTimestamp::Zoned(timestamp),
        temperature_c: first("TL")?,
        humidity_percent: first("RFAM")?,
        air_pressure_hpa: first("P")?,
        rain_mm: first("RR")?,
        wind_speed: speed("FFAM")?,
        wind_gust: speed("FFX")?,
        wind_direction_degrees: first("DD")?,
    })
}
