/// Upstream source parsers.
///
/// Each station is read from one kind of upstream. `SourceKind` is the tag
/// stored in the station configuration; it knows how to fetch the raw
/// payload for its source and which parser turns that payload into an
/// observation. Parsers only extract and tag units, `normalize` does the rest.

pub mod fixtures;
pub mod gateway;
pub mod geosphere;
pub mod ipma;
pub mod meteobridge;
pub mod meteoswiss;
pub mod weather_table;

use serde::Deserialize;

use crate::config::StationConfig;
use crate::convert::AnnotatedUnit;
use crate::fetch::{self, Transport};
use crate::model::{CanonicalObservation, RawObservation, RelayError, Result};
use crate::normalize;

use meteoswiss::TableKind;

/// The shape of upstream a station is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Meteobridge `livedataxml.cgi` attribute XML.
    MeteobridgeXml,
    /// Station homepage table with km/h Beaufort wind columns.
    WeatherTableKmh,
    /// Station homepage table with knot Beaufort wind columns.
    WeatherTableKts,
    /// Meteo-services gateway page of `token value` pairs.
    GatewayText,
    /// GeoSphere Austria station/current JSON.
    Geosphere,
    /// MeteoSwiss per-measurement stationsTable JSON.
    MeteoSwiss,
    /// IPMA hourly observations JSON.
    Ipma,
}

/// What was downloaded for one observation.
#[derive(Debug, Clone, PartialEq)]
pub enum RawPayload {
    /// A single document (HTML, XML or JSON).
    Document(String),
    /// One document per MeteoSwiss measurement table.
    Tables(Vec<(TableKind, String)>),
}

impl SourceKind {
    pub fn name(&self) -> &'static str {
        match self {
            SourceKind::MeteobridgeXml => "meteobridge_xml",
            SourceKind::WeatherTableKmh => "weather_table_kmh",
            SourceKind::WeatherTableKts => "weather_table_kts",
            SourceKind::GatewayText => "gateway_text",
            SourceKind::Geosphere => "geosphere",
            SourceKind::MeteoSwiss => "meteoswiss",
            SourceKind::Ipma => "ipma",
        }
    }

    /// Sources whose payload lists many stations need the upstream id.
    pub fn requires_remote_id(&self) -> bool {
        matches!(self, SourceKind::MeteoSwiss | SourceKind::Ipma)
    }

    /// Downloads everything the parser for this source needs.
    pub fn fetch(&self, transport: &dyn Transport, station: &StationConfig) -> Result<RawPayload> {
        match self {
            SourceKind::MeteoSwiss => meteoswiss::fetch_tables(transport, &station.url),
            _ => Ok(RawPayload::Document(fetch::get_text(transport, &station.url)?)),
        }
    }

    /// Runs the source-specific parser without normalizing.
    pub fn extract(&self, payload: &RawPayload, station: &StationConfig) -> Result<RawObservation> {
        match (self, payload) {
            (SourceKind::MeteobridgeXml, RawPayload::Document(body)) => {
                meteobridge::parse_livedata(body)
            }
            (SourceKind::WeatherTableKmh, RawPayload::Document(body)) => {
                weather_table::parse_table(body, AnnotatedUnit::KilometersPerHour)
            }
            (SourceKind::WeatherTableKts, RawPayload::Document(body)) => {
                weather_table::parse_table(body, AnnotatedUnit::Knots)
            }
            (SourceKind::GatewayText, RawPayload::Document(body)) => gateway::parse_gateway(body),
            (SourceKind::Geosphere, RawPayload::Document(body)) => geosphere::parse_current(body),
            (SourceKind::MeteoSwiss, RawPayload::Tables(tables)) => {
                meteoswiss::parse_tables(tables, station.require_remote_id()?)
            }
            (SourceKind::Ipma, RawPayload::Document(body)) => {
                ipma::parse_observations(body, station.require_remote_id()?)
            }
            (kind, _) => Err(RelayError::Config(format!(
                "payload shape does not match source {}",
                kind.name()
            ))),
        }
    }

    /// Parses a payload into the canonical record for `station`.
    pub fn parse(&self, payload: &RawPayload, station: &StationConfig) -> Result<CanonicalObservation> {
        let raw = self.extract(payload, station)?;
        normalize::normalize(raw, station)
    }
}

/// Fetches and parses the current observation for one station.
pub fn fetch_observation(
    transport: &dyn Transport,
    station: &StationConfig,
) -> Result<CanonicalObservation> {
    let payload = station.source.fetch(transport, station)?;
    station.source.parse(&payload, station)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Registry;
    use crate::fetch::HttpResponse;
    use std::cell::RefCell;

    struct Canned {
        body: &'static str,
        requested: RefCell<Vec<String>>,
    }

    impl Transport for Canned {
        fn get(&self, url: &str) -> Result<HttpResponse> {
            self.requested.borrow_mut().push(url.to_string());
            Ok(HttpResponse {
                status: 200,
                body: self.body.to_string(),
            })
        }
    }

    fn registry() -> Registry {
        Registry::builtin(|_| None)
    }

    #[test]
    fn test_source_kind_deserializes_from_snake_case() {
        #[derive(Deserialize)]
        struct Wrapper {
            source: SourceKind,
        }
        let w: Wrapper = toml::from_str(r#"source = "weather_table_kts""#).unwrap();
        assert_eq!(w.source, SourceKind::WeatherTableKts);
        assert_eq!(w.source.name(), "weather_table_kts");
    }

    #[test]
    fn test_fetch_observation_uses_station_url() {
        let registry = registry();
        let station = registry.lookup("rohrspitz").unwrap();
        let transport = Canned {
            body: fixtures::fixture_meteobridge_xml(),
            requested: RefCell::new(Vec::new()),
        };

        let obs = fetch_observation(&transport, station).unwrap();

        assert_eq!(*transport.requested.borrow(), vec![station.url.clone()]);
        assert_eq!(obs.station_id, "rohrspitz");
        assert_eq!(obs.sampling_interval_seconds, 60);
    }

    #[test]
    fn test_mismatched_payload_shape_is_rejected() {
        let registry = registry();
        let station = registry.lookup("altenrhein").unwrap();
        let payload = RawPayload::Document("{}".to_string());
        assert!(matches!(
            SourceKind::MeteoSwiss.extract(&payload, station),
            Err(RelayError::Config(_))
        ));
    }

    #[test]
    fn test_every_source_reports_wind_in_knots() {
        let registry = registry();
        let cases: Vec<(&str, RawPayload, f64)> = vec![
            // 5.1 m/s
            ("rohrspitz", RawPayload::Document(fixtures::fixture_meteobridge_xml().into()), 5.1 * 1.943844),
            // 14.8 km/h through the table calibration
            ("kressbronn", RawPayload::Document(fixtures::fixture_weather_table_kmh().into()), 14.8 * 0.54),
            // already knots
            ("rohrspitz-old", RawPayload::Document(fixtures::fixture_weather_table_kts().into()), 12.4),
            // 4.2 m/s
            ("lindau-lsc", RawPayload::Document(fixtures::fixture_gateway_text().into()), 4.2 * 1.943844),
            // 4.3 m/s
            ("rohrspitz-zamg", RawPayload::Document(fixtures::fixture_geosphere_json().into()), 4.3 * 1.943844),
            // 5.0 m/s
            ("praia-da-rainha", RawPayload::Document(fixtures::fixture_ipma_json().into()), 5.0 * 1.943844),
            // 18.5 km/h standard conversion
            (
                "altenrhein",
                RawPayload::Tables(vec![(
                    TableKind::Wind,
                    fixtures::fixture_meteoswiss_table("18.5", Some("240")),
                )]),
                18.5 / 1.852,
            ),
        ];

        for (id, payload, expected) in cases {
            let station = registry.lookup(id).unwrap();
            let obs = station.source.parse(&payload, station).unwrap();
            let wind = obs.wind_speed_knots.expect("wind should be set");
            assert!(
                (wind - expected).abs() < 1e-9,
                "{}: expected {} kt, got {}",
                id,
                expected,
                wind
            );
        }
    }
}
