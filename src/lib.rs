/// windrelay: relays current weather-station observations to the Windguru
/// station upload API.
///
/// # Module structure
///
/// ```text
/// windrelay
/// ├── model       — shared data types (CanonicalObservation, RawObservation, RelayError)
/// ├── convert     — decimal-comma parsing, Beaufort-annotated wind, unit factors, sectors
/// ├── stations    — built-in station table
/// ├── config      — Registry: built-ins + stations.toml + secrets from the environment
/// ├── fetch       — blocking HTTP Transport seam (reqwest)
/// ├── ingest
/// │   ├── meteobridge   — Meteobridge live data XML
/// │   ├── weather_table — station homepage HTML table
/// │   ├── gateway       — meteo-services free-text gateway
/// │   ├── geosphere     — GeoSphere Austria station/current JSON
/// │   ├── meteoswiss    — MeteoSwiss per-measurement stationsTable JSON
/// │   ├── ipma          — IPMA hourly observations JSON
/// │   └── fixtures (test only) — representative upstream payloads
/// ├── normalize   — RawObservation → CanonicalObservation (UTC, knots, finite)
/// ├── upload      — signed Windguru upload request
/// └── relay       — one fetch → parse → upload cycle
/// ```

/// Public modules
pub mod config;
pub mod convert;
pub mod fetch;
pub mod ingest;
pub mod model;
pub mod normalize;
pub mod relay;
pub mod stations;
pub mod upload;
