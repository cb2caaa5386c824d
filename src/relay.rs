/// One relay cycle: look up the station, fetch and parse its current
/// observation, and upload it.
///
/// Fetch, parse, validation and configuration failures abort the cycle with
/// an error. A rejected upload does not: it is logged together with the
/// record that was attempted and reported as `RelayOutcome::Rejected`.

use tracing::{error, info};

use crate::config::Registry;
use crate::fetch::Transport;
use crate::ingest;
use crate::model::{CanonicalObservation, RelayError, Result};
use crate::upload;

/// How a relay cycle ended.
#[derive(Debug)]
pub enum RelayOutcome {
    /// The endpoint acknowledged the upload.
    Uploaded(CanonicalObservation),
    /// Fetched and parsed only; nothing was sent.
    DryRun(CanonicalObservation),
    /// The upload was attempted and failed.
    Rejected {
        observation: CanonicalObservation,
        error: RelayError,
    },
}

/// Runs one fetch → parse → upload cycle for `station_id`.
pub fn relay_station(
    transport: &dyn Transport,
    registry: &Registry,
    station_id: &str,
    dry_run: bool,
) -> Result<RelayOutcome> {
    let station = registry.lookup(station_id)?;
    info!(station = %station.id, source = station.source.name(), "fetching observation");

    let observation = ingest::fetch_observation(transport, station)?;
    info!(
        station = %observation.station_id,
        time = %observation.timestamp,
        wind_kt = ?observation.wind_speed_knots,
        gust_kt = ?observation.wind_gust_knots,
        "observation parsed"
    );

    if dry_run {
        return Ok(RelayOutcome::DryRun(observation));
    }

    let secret = station.secret.as_deref().ok_or_else(|| {
        RelayError::Config(format!(
            "no upload secret for '{}': set {}",
            station.id, station.secret_env
        ))
    })?;

    match upload::upload(transport, registry.upload_url(), &observation, secret) {
        Ok(()) => {
            info!(station = %observation.station_id, "upload accepted");
            Ok(RelayOutcome::Uploaded(observation))
        }
        Err(e) => {
            error!(error = %e, record = ?observation, "failed to upload observation");
            Ok(RelayOutcome::Rejected {
                observation,
                error: e,
            })
        }
    }
}
