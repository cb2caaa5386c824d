/// MeteoSwiss measured-values stationsTable client and parser.
///
/// MeteoSwiss publishes one JSON table per measurement kind, each listing
/// the latest 10-minute value of every station in the network:
///
///   {base}/messwerte-lufttemperatur-10min/stationsTable.messwerte-lufttemperatur-10min.en.json
///
///   stations[]
///     .id                       — three-letter station code ("ARH")
///     .current.date             — epoch milliseconds
///     .current.value            — number, or a string in some tables
///     .current.wind_direction   — only in the wind speed table (deg)
///
/// An observation is assembled from the union of all six tables. Wind and
/// gust are km/h.

use serde::Deserialize;

use crate::convert::SpeedUnit;
use crate::fetch::{self, Transport};
use crate::ingest::RawPayload;
use crate::model::{RawObservation, RawTimestamp, RelayError, Result, Speed};

const ORIGIN: &str = "meteoswiss";

/// One stationsTable endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Temperature,
    Humidity,
    Pressure,
    Rain,
    Wind,
    Gust,
}

impl TableKind {
    pub const ALL: [TableKind; 6] = [
        TableKind::Temperature,
        TableKind::Humidity,
        TableKind::Pressure,
        TableKind::Rain,
        TableKind::Wind,
        TableKind::Gust,
    ];

    /// Path of this table relative to the stationsTable base URL.
    pub fn path(&self) -> &'static str {
        match self {
            TableKind::Temperature => "messwerte-lufttemperatur-10min/stationsTable.messwerte-lufttemperatur-10min.en.json",
            TableKind::Humidity => "messwerte-luftfeuchtigkeit-10min/stationsTable.messwerte-luftfeuchtigkeit-10min.en.json",
            TableKind::Pressure => "messwerte-luftdruck-qfe-10min/stationsTable.messwerte-luftdruck-qfe-10min.en.json",
            TableKind::Rain => "messwerte-niederschlag-10min/stationsTable.messwerte-niederschlag-10min.en.json",
            TableKind::Wind => "messwerte-windgeschwindigkeit-kmh-10min/stationsTable.messwerte-windgeschwindigkeit-kmh-10min.en.json",
            TableKind::Gust => "messwerte-wind-boeenspitze-kmh-10min/stationsTable.messwerte-wind-boeenspitze-kmh-10min.en.json",
        }
    }
}

/// Joins the base path and a table path.
pub fn build_table_url(base_url: &str, kind: TableKind) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), kind.path())
}

/// Fetches every table, one request after the other.
pub fn fetch_tables(transport: &dyn Transport, base_url: &str) -> Result<RawPayload> {
    let mut tables = Vec::with_capacity(TableKind::ALL.len());
    for kind in TableKind::ALL {
        let body = fetch::get_text(transport, &build_table_url(base_url, kind))?;
        tables.push((kind, body));
    }
    Ok(RawPayload::Tables(tables))
}

// ---------------------------------------------------------------------------
// Serde structures
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct StationsTable {
    #[serde(default)]
    stations: Vec<TableStation>,
}

#[derive(Deserialize)]
struct TableStation {
    id: String,
    current: Option<Current>,
}

#[derive(Deserialize)]
struct Current {
    date: Option<i64>,
    value: Option<Reading>,
    wind_direction: Option<Reading>,
}

/// Values arrive as JSON numbers in most tables and as strings in others.
#[derive(Deserialize)]
#[serde(untagged)]
enum Reading {
    Number(f64),
    Text(String),
}

impl Reading {
    /// `"-"` and empty strings mean no measurement.
    fn value(&self) -> Result<Option<f64>> {
        match self {
            Reading::Number(v) => Ok(Some(*v)),
            Reading::Text(s) => {
                let s = s.trim();
                if s.is_empty() || s == "-" {
                    return Ok(None);
                }
                s.parse::<f64>()
                    .map(Some)
                    .map_err(|_| RelayError::Parse(format!("'{}' is not a number", s)))
            }
        }
    }
}

fn reading(r: &Option<Reading>) -> Result<Option<f64>> {
    match r {
        Some(r) => r.value(),
        None => Ok(None),
    }
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Assembles one observation for `station_id` from the fetched tables.
///
/// The observation time is the latest `current.date` across the tables.
///
/// # Errors
/// `RelayError::SourceFormat` when a table is not valid JSON, does not list
/// the station, or the station has no `current` block.
pub fn parse_tables(tables: &[(TableKind, String)], station_id: &str) -> Result<RawObservation> {
    let mut obs = RawObservation::empty(RawTimestamp::Missing);
    let mut latest_ms: Option<i64> = None;

    for (kind, body) in tables {
        let table: StationsTable = serde_json::from_str(body).map_err(|e| {
            RelayError::source_format(ORIGIN, format!("{:?} table: {}", kind, e), body)
        })?;

        let current = table
            .stations
            .iter()
            .find(|s| s.id == station_id)
            .ok_or_else(|| {
                RelayError::source_format(
                    ORIGIN,
                    format!("station {} not in {:?} table", station_id, kind),
                    body,
                )
            })?
            .current
            .as_ref()
            .ok_or_else(|| {
                RelayError::source_format(
                    ORIGIN,
                    format!("station {} has no current {:?} value", station_id, kind),
                    body,
                )
            })?;

        if let Some(ms) = current.date {
            latest_ms = Some(latest_ms.map_or(ms, |prev| prev.max(ms)));
        }

        let value = reading(&current.value)?;
        let kmh = |v: Option<f64>| v.map(|v| Speed::new(v, SpeedUnit::KilometersPerHour));

        match kind {
            TableKind::Temperature => obs.temperature_c = value,
            TableKind::Humidity => obs.humidity_percent = value,
            TableKind::Pressure => obs.air_pressure_hpa = value,
            TableKind::Rain => obs.rain_mm = value,
            TableKind::Wind => {
                obs.wind_speed = kmh(value);
                obs.wind_direction_degrees = reading(&current.wind_direction)?;
            }
            TableKind::Gust => obs.wind_gust = kmh(value),
        }
    }

    if let Some(ms) = latest_ms {
        obs.timestamp = RawTimestamp::EpochMillis(ms);
    }

    Ok(obs)
}
