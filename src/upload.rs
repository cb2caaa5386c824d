/// Windguru station upload API dispatcher.
///
/// API Documentation: https://stations.windguru.cz/upload_api.php
///
/// An upload is a single GET with the observation as query parameters and
/// a per-request signature: a random `salt` plus `hash = md5(salt + uid +
/// secret)` as lowercase hex. The API answers HTTP 200 with the body `OK`
/// on success; anything else is a rejection.

use tracing::debug;

use crate::fetch::Transport;
use crate::model::{CanonicalObservation, RelayError, Result};

pub const WINDGURU_UPLOAD_URL: &str = "https://www.windguru.cz/upload/api.php";

// ---------------------------------------------------------------------------
// Signature
// ---------------------------------------------------------------------------

/// 8 random bytes as 16 hex characters.
pub fn generate_salt() -> String {
    let bytes: [u8; 8] = rand::random();
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Lowercase hex MD5 of `salt + station_id + secret`.
pub fn credential_hash(salt: &str, station_id: &str, secret: &str) -> String {
    let digest = md5::compute(format!("{}{}{}", salt, station_id, secret));
    format!("{:x}", digest)
}

// ---------------------------------------------------------------------------
// Request construction
// ---------------------------------------------------------------------------

/// Formats a measurement for the query string: rounded to two decimals,
/// empty when unset. Values that round to zero are sent as `0`, never `-0`.
fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{}", (v * 100.0).round() / 100.0 + 0.0),
        None => String::new(),
    }
}

/// Query parameters for one upload, in the order they are sent.
pub fn build_upload_params(
    obs: &CanonicalObservation,
    salt: &str,
    hash: &str,
) -> Vec<(&'static str, String)> {
    vec![
        ("uid", obs.station_id.clone()),
        ("interval", obs.sampling_interval_seconds.to_string()),
        ("unixtime", obs.unixtime().to_string()),
        ("wind_avg", format_value(obs.wind_speed_knots)),
        ("wind_max", format_value(obs.wind_gust_knots)),
        ("wind_direction", format_value(obs.wind_direction_degrees)),
        ("temperature", format_value(obs.temperature_c)),
        ("rh", format_value(obs.humidity_percent)),
        ("mslp", format_value(obs.air_pressure_hpa)),
        ("precip_interval", format_value(obs.rain_mm)),
        ("salt", salt.to_string()),
        ("hash", hash.to_string()),
    ]
}

/// Builds the full upload URL with percent-encoded parameters.
pub fn build_upload_url(endpoint: &str, params: &[(&str, String)]) -> String {
    let query = params
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");
    format!("{}?{}", endpoint, query)
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Uploads `obs` with a fresh salt.
pub fn upload(
    transport: &dyn Transport,
    endpoint: &str,
    obs: &CanonicalObservation,
    secret: &str,
) -> Result<()> {
    send_upload(transport, endpoint, obs, secret, &generate_salt())
}

/// Uploads `obs` signed with the given salt.
///
/// # Errors
/// - `RelayError::Upload` if the response is not HTTP 200 with body `OK`.
/// - `RelayError::Http` if the request itself failed.
pub fn send_upload(
    transport: &dyn Transport,
    endpoint: &str,
    obs: &CanonicalObservation,
    secret: &str,
    salt: &str,
) -> Result<()> {
    let hash = credential_hash(salt, &obs.station_id, secret);
    let url = build_upload_url(endpoint, &build_upload_params(obs, salt, &hash));
    debug!(%url, "uploading observation");

    let response = transport.get(&url)?;

    if response.status != 200 || response.body != "OK" {
        return Err(RelayError::Upload {
            status: response.status,
            body: response.body,
        });
    }

    Ok(())
}
