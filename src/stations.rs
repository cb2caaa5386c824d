/// Built-in station registry.
///
/// Defines the stations this relay uploads for out of the box, with the
/// upstream source each one is read from. The upload secret is never stored
/// here, only the name of the environment variable that holds it.
/// `config` layers an optional stations.toml over this table.

use crate::ingest::SourceKind;

// ---------------------------------------------------------------------------
// Station metadata
// ---------------------------------------------------------------------------

/// Static description of one relayed station.
pub struct Station {
    /// Station identifier, also the `uid` sent to the upload API.
    pub id: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// Source URL. For MeteoSwiss this is the base path the per-measurement
    /// tables hang off.
    pub url: &'static str,
    /// Averaging interval reported with every upload.
    pub interval_seconds: u32,
    pub source: SourceKind,
    /// The upstream's own identifier, for payloads that list many stations.
    pub remote_id: Option<&'static str>,
    /// Environment variable holding the upload secret.
    pub secret_env: &'static str,
}

pub static BUILTIN_STATIONS: &[Station] = &[
    Station {
        id: "altenrhein",
        name: "Altenrhein (MeteoSwiss ARH)",
        url: "https://www.meteoswiss.admin.ch/product/output/measured-values/stationsTable/",
        interval_seconds: 300,
        source: SourceKind::MeteoSwiss,
        remote_id: Some("ARH"),
        secret_env: "WINDSPEED_PASS_ALTENRHEIN",
    },
    Station {
        id: "rohrspitz-old",
        name: "Rohrspitz (kite-connection weather page)",
        url: "https://www.kite-connection.at/weatherstation/aktuell.htm",
        interval_seconds: 300,
        source: SourceKind::WeatherTableKts,
        remote_id: None,
        secret_env: "WINDSPEED_PASS_ROHRSPITZ",
    },
    Station {
        id: "rohrspitz",
        name: "Rohrspitz (Meteobridge live data)",
        url: "https://admin.meteobridge.com/1bf5f40ad1e757d85cc41a993112a638/public/livedataxml.cgi",
        interval_seconds: 60,
        source: SourceKind::MeteobridgeXml,
        remote_id: None,
        secret_env: "WINDSPEED_PASS_ROHRSPITZ",
    },
    Station {
        id: "rohrspitz-zamg",
        name: "Rohrspitz (GeoSphere Austria TAWES 11299)",
        url: "https://dataset.api.hub.geosphere.at/v1/station/current/tawes-v1-10min?station_ids=11299&parameters=DD,FFAM,FFX,P,RFAM,RR,TL",
        interval_seconds: 600,
        source: SourceKind::Geosphere,
        remote_id: None,
        secret_env: "WINDSPEED_PASS_ROHRSPITZ_ZAMG",
    },
    Station {
        id: "lindau-lsc",
        name: "Lindau Segel-Club",
        url: "https://stations.meteo-services.com/wetterstation/gatewaytest.php?station_id=3816&uw=kmh&ut=C&lp=0",
        interval_seconds: 300,
        source: SourceKind::GatewayText,
        remote_id: None,
        secret_env: "WINDSPEED_PASS_LINDAU_LSC",
    },
    Station {
        id: "kressbronn",
        name: "Kressbronn",
        url: "https://www.wetter-kressbronn.de/wetter/aktuell.htm",
        interval_seconds: 120,
        source: SourceKind::WeatherTableKmh,
        remote_id: None,
        secret_env: "WINDSPEED_PASS_KRESSBRONN",
    },
    Station {
        id: "praia-da-rainha",
        name: "Praia da Rainha (IPMA Almada)",
        url: "https://api.ipma.pt/open-data/observation/meteorology/stations/observations.json",
        interval_seconds: 300,
        source: SourceKind::Ipma,
        remote_id: Some("1210773"),
        secret_env: "WINDSPEED_PASS_PRAIA_DA_RAINHA",
    },
];

/// Returns the identifiers of all built-in stations.
pub fn all_station_ids() -> Vec<&'static str> {
    BUILTIN_STATIONS.iter().map(|s| s.id).collect()
}

/// Looks up a built-in station by identifier. Returns `None` if not found.
pub fn find_station(id: &str) -> Option<&'static Station> {
    BUILTIN_STATIONS.iter().find(|s| s.id == id)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_duplicate_station_ids() {
        let mut seen = std::collections::HashSet::new();
        for station in BUILTIN_STATIONS {
            assert!(
                seen.insert(station.id),
                "duplicate station id '{}' found in BUILTIN_STATIONS",
                station.id
            );
        }
    }

    #[test]
    fn test_registry_contains_all_expected_stations() {
        let expected = [
            "altenrhein",
            "rohrspitz-old",
            "rohrspitz",
            "rohrspitz-zamg",
            "lindau-lsc",
            "kressbronn",
            "praia-da-rainha",
        ];
        let ids = all_station_ids();
        for expected_id in &expected {
            assert!(ids.contains(expected_id), "BUILTIN_STATIONS missing '{}'", expected_id);
        }
        assert_eq!(ids.len(), expected.len());
    }

    #[test]
    fn test_multi_station_sources_carry_remote_id() {
        // Without the upstream id the parser cannot pick the right record
        // out of a payload listing every station in the network.
        for station in BUILTIN_STATIONS {
            if station.source.requires_remote_id() {
                assert!(station.remote_id.is_some(), "{} needs a remote_id", station.id);
            }
        }
    }

    #[test]
    fn test_intervals_and_urls_are_set() {
        for station in BUILTIN_STATIONS {
            assert!(station.interval_seconds > 0, "{} has no interval", station.id);
            assert!(station.url.starts_with("https://"), "{} url should be https", station.id);
            assert!(station.secret_env.starts_with("WINDSPEED_PASS_"));
        }
    }

    #[test]
    fn test_find_station() {
        let station = find_station("kressbronn").expect("kressbronn should be built in");
        assert_eq!(station.interval_seconds, 120);
        assert_eq!(station.source, SourceKind::WeatherTableKmh);
        assert!(find_station("atlantis").is_none());
    }
}
