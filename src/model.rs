/// CanonicalObservation, RawObservation, RelayError
///
/// Core data types for the station relay.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no I/O: only the record types that flow from the source
/// parsers through the normalizer to the upload dispatcher, and the error
/// taxonomy every stage reports through.

use chrono::{DateTime, NaiveDateTime, Utc};
use thiserror::Error;

use crate::convert::SpeedUnit;

// ---------------------------------------------------------------------------
// Canonical record
// ---------------------------------------------------------------------------

/// The unit-normalized observation produced for one station fetch.
///
/// Every measurement is either a finite value in the canonical unit or
/// `None`. Upstream "no data" never becomes zero.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalObservation {
    pub station_id: String,
    pub timestamp: DateTime<Utc>,
    pub sampling_interval_seconds: u32,
    pub temperature_c: Option<f64>,
    pub humidity_percent: Option<f64>,
    pub air_pressure_hpa: Option<f64>,
    pub rain_mm: Option<f64>,
    pub wind_speed_knots: Option<f64>,
    pub wind_gust_knots: Option<f64>,
    pub wind_direction_degrees: Option<f64>, // [0, 360)
}

impl CanonicalObservation {
    /// Seconds since the Unix epoch, as sent to the upload API.
    pub fn unixtime(&self) -> i64 {
        self.timestamp.timestamp()
    }
}

// ---------------------------------------------------------------------------
// Parser output
// ---------------------------------------------------------------------------

/// A wind speed as the upstream reported it, tagged with its unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Speed {
    pub value: f64,
    pub unit: SpeedUnit,
}

impl Speed {
    pub fn new(value: f64, unit: SpeedUnit) -> Self {
        Self { value, unit }
    }
}

/// Observation time in whatever shape the source provides it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawTimestamp {
    /// Already anchored (explicit UTC or a parsed offset).
    Zoned(DateTime<Utc>),
    /// Wall-clock date and time with no zone attached.
    Naive(NaiveDateTime),
    EpochSeconds(i64),
    EpochMillis(i64),
    /// The source carried no usable time.
    Missing,
}

/// What a source parser extracts before normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct RawObservation {
    pub timestamp: RawTimestamp,
    pub temperature_c: Option<f64>,
    pub humidity_percent: Option<f64>,
    pub air_pressure_hpa: Option<f64>,
    pub rain_mm: Option<f64>,
    pub wind_speed: Option<Speed>,
    pub wind_gust: Option<Speed>,
    pub wind_direction_degrees: Option<f64>,
}

impl RawObservation {
    /// An observation with every measurement unset.
    pub fn empty(timestamp: RawTimestamp) -> Self {
        Self {
            timestamp,
            temperature_c: None,
            humidity_percent: None,
            air_pressure_hpa: None,
            rain_mm: None,
            wind_speed: None,
            wind_gust: None,
            wind_direction_degrees: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise while relaying one station observation.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Malformed numeric or unit-annotated text.
    #[error("parse error: {0}")]
    Parse(String),

    /// The upstream payload no longer has the expected structure.
    #[error("unexpected {origin} payload: {detail} (near `{fragment}`)")]
    SourceFormat {
        origin: &'static str,
        detail: String,
        fragment: String,
    },

    /// The requested station identifier is not configured.
    #[error("unknown station '{0}'")]
    UnknownStation(String),

    /// A parsed record could not be normalized.
    #[error("validation error: {0}")]
    Validation(String),

    /// The ingestion endpoint did not acknowledge the upload.
    #[error("upload rejected (HTTP {status}): {body:?}")]
    Upload { status: u16, body: String },

    /// The request never produced a usable response.
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl RelayError {
    /// Builds a `SourceFormat` error, truncating the fragment so a whole
    /// page never ends up in a log line.
    pub fn source_format(origin: &'static str, detail: impl Into<String>, fragment: &str) -> Self {
        const MAX_FRAGMENT: usize = 120;
        let fragment = match fragment.char_indices().nth(MAX_FRAGMENT) {
            Some((cut, _)) => format!("{}…", &fragment[..cut]),
            None => fragment.to_string(),
        };
        RelayError::SourceFormat {
            origin,
            detail: detail.into(),
            fragment,
        }
    }
}

impl From<reqwest::Error> for RelayError {
    fn from(e: reqwest::Error) -> Self {
        RelayError::Http(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;
