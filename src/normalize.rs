/// Record normalizer.
///
/// Turns a parser's `RawObservation` into a `CanonicalObservation`:
///   - the timestamp is resolved to an absolute UTC instant
///   - wind speed and gust are converted to knots
///   - wind direction is wrapped into [0, 360)
///   - every measurement is finite or `None`
///
/// Wall-clock table timestamps carry no zone and are anchored as UTC.

use chrono::{DateTime, Utc};

use crate::config::StationConfig;
use crate::convert::{convert, SpeedUnit};
use crate::model::{CanonicalObservation, RawObservation, RawTimestamp, RelayError, Result, Speed};

/// Normalizes one parsed observation for `station`.
///
/// # Errors
/// `RelayError::Validation` when the timestamp is missing or out of range,
/// or when any measurement is NaN or infinite.
pub fn normalize(raw: RawObservation, station: &StationConfig) -> Result<CanonicalObservation> {
    let timestamp = resolve_timestamp(raw.timestamp)?;

    Ok(CanonicalObservation {
        station_id: station.id.clone(),
        timestamp,
        sampling_interval_seconds: station.interval_seconds,
        temperature_c: finite("temperature", raw.temperature_c)?,
        humidity_percent: finite("humidity", raw.humidity_percent)?,
        air_pressure_hpa: finite("air pressure", raw.air_pressure_hpa)?,
        rain_mm: finite("rain", raw.rain_mm)?,
        wind_speed_knots: knots("wind speed", raw.wind_speed)?,
        wind_gust_knots: knots("wind gust", raw.wind_gust)?,
        wind_direction_degrees: finite("wind direction", raw.wind_direction_degrees)?
            .map(wrap_degrees),
    })
}

/// Resolves any upstream time representation to UTC.
pub fn resolve_timestamp(ts: RawTimestamp) -> Result<DateTime<Utc>> {
    match ts {
        RawTimestamp::Zoned(dt) => Ok(dt),
        RawTimestamp::Naive(naive) => Ok(DateTime::from_naive_utc_and_offset(naive, Utc)),
        RawTimestamp::EpochSeconds(secs) => DateTime::from_timestamp(secs, 0)
            .ok_or_else(|| RelayError::Validation(format!("epoch seconds {} out of range", secs))),
        RawTimestamp::EpochMillis(ms) => DateTime::from_timestamp_millis(ms)
            .ok_or_else(|| RelayError::Validation(format!("epoch millis {} out of range", ms))),
        RawTimestamp::Missing => Err(RelayError::Validation(
            "observation has no timestamp".to_string(),
        )),
    }
}

fn finite(field: &str, value: Option<f64>) -> Result<Option<f64>> {
    match value {
        Some(v) if !v.is_finite() => Err(RelayError::Validation(format!(
            "{} is not a finite number ({})",
            field, v
        ))),
        other => Ok(other),
    }
}

fn knots(field: &str, speed: Option<Speed>) -> Result<Option<f64>> {
    let converted = speed.map(|s| convert(s.value, s.unit, SpeedUnit::Knots));
    finite(field, converted)
}

fn wrap_degrees(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}
