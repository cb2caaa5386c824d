/// IPMA (Instituto Português do Mar e da Atmosfera) observations parser.
///
/// Source: https://api.ipma.pt/open-data/observation/meteorology/stations/observations.json
/// Updated hourly. The payload is keyed by observation hour, then by station:
///
///   { "YYYY-mm-ddThh:mi": { "<idEstacao>": { ... } | null, ... }, ... }
///
/// Station record fields used:
///   temperatura       air temperature, hourly mean (°C)
///   humidade          relative humidity, hourly mean (%)
///   pressao           mean sea-level pressure, hourly mean (hPa)
///   precAcumulada     precipitation accumulated over the hour (mm)
///   intensidadeVento  wind speed at 10 m (m/s)
///   idDireccVento     prevailing wind direction class, see `sector_to_degrees`
///
/// `-99.0` in any field means no data for that field only.

use chrono::NaiveDateTime;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

use crate::convert::{sector_to_degrees, SpeedUnit};
use crate::model::{RawObservation, RawTimestamp, RelayError, Result, Speed};

const ORIGIN: &str = "ipma";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// IPMA's "no data" marker.
pub const SENTINEL: f64 = -99.0;

// ---------------------------------------------------------------------------
// Serde structures
// ---------------------------------------------------------------------------

/// Hour key → station id → record. A BTreeMap so the greatest key is the
/// latest hour; keys are zero-padded so lexicographic order is chronological.
/// Records stay untyped until the station has been selected, so a malformed
/// record elsewhere in the network does not affect ours.
type ObservationsFeed = BTreeMap<String, HashMap<String, serde_json::Value>>;

#[derive(Debug, Deserialize)]
struct StationRecord {
    #[serde(rename = "temperatura")]
    temperature: Option<f64>,
    #[serde(rename = "humidade")]
    humidity: Option<f64>,
    #[serde(rename = "pressao")]
    pressure: Option<f64>,
    #[serde(rename = "precAcumulada")]
    precipitation: Option<f64>,
    #[serde(rename = "intensidadeVento")]
    wind_speed_ms: Option<f64>,
    #[serde(rename = "idDireccVento")]
    wind_direction_class: Option<f64>,
}

fn unless_sentinel(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != SENTINEL)
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Parses the observations feed for `station_id`, using the latest hour.
///
/// # Errors
/// - `RelayError::SourceFormat` for malformed JSON, an empty feed, or a
///   station with no usable record in the latest hour.
/// - `RelayError::Parse` if the hour key is not `YYYY-mm-ddThh:mi`.
pub fn parse_observations(json: &str, station_id: &str) -> Result<RawObservation> {
    let feed: ObservationsFeed = serde_json::from_str(json)
        .map_err(|e| RelayError::source_format(ORIGIN, format!("JSON deserialization failed: {}", e), json))?;

    let (hour, stations) = feed
        .last_key_value()
        .ok_or_else(|| RelayError::source_format(ORIGIN, "no observation hours", json))?;

    let entry = stations
        .get(station_id)
        .filter(|v| !v.is_null())
        .ok_or_else(|| {
            RelayError::source_format(
                ORIGIN,
                format!("no record for station {} at {}", station_id, hour),
                json,
            )
        })?;

    let record = StationRecord::deserialize(entry).map_err(|e| {
        RelayError::source_format(
            ORIGIN,
            format!("record for station {} at {}: {}", station_id, hour, e),
            &entry.to_string(),
        )
    })?;

    let timestamp = NaiveDateTime::parse_from_str(hour, TIMESTAMP_FORMAT)
        .map_err(|e| RelayError::Parse(format!("hour key '{}': {}", hour, e)))?
        .and_utc();

    Ok(RawObservation {
        timestamp: RawTimestamp::Zoned(timestamp),
        temperature_c: unless_sentinel(record.temperature),
        humidity_percent: unless_sentinel(record.humidity),
        air_pressure_hpa: unless_sentinel(record.pressure),
        rain_mm: unless_sentinel(record.precipitation),
        wind_speed: unless_sentinel(record.wind_speed_ms)
            .map(|v| Speed::new(v, SpeedUnit::MetersPerSecond)),
        wind_gust: None,
        wind_direction_degrees: direction(record.wind_direction_class),
    })
}

fn direction(class: Option<f64>) -> Option<f64> {
    let class = unless_sentinel(class)?;
    let sector = class as i64;
    if sector as f64 != class || !(0..=9).contains(&sector) {
        warn!(class, "unknown IPMA wind direction class");
        return None;
    }
    sector_to_degrees(sector)
}
