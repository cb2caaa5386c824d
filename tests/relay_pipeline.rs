/// Integration tests for the full relay cycle
///
/// These tests drive registry lookup → fetch → parse → normalize → upload
/// through a fake network, so no upstream or Windguru access is needed:
/// 1. Successful upload with a correctly signed request
/// 2. Rejected upload is reported, not fatal
/// 3. Dry run never touches the upload endpoint
/// 4. Configuration failures (unknown station, missing secret)
/// 5. Multi-request sources (MeteoSwiss) and sentinel handling (IPMA)
///
/// Run with: cargo test --test relay_pipeline

use std::cell::RefCell;

use windrelay::config::Registry;
use windrelay::fetch::{HttpResponse, Transport};
use windrelay::model::{RelayError, Result};
use windrelay::relay::{relay_station, RelayOutcome};
use windrelay::upload::{credential_hash, WINDGURU_UPLOAD_URL};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

const METEOBRIDGE_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<logger>
  <THB id="thb0" date="20250220120000" temp="8.4" hum="71" press="1016.2" seapress="1018.9"/>
  <TH id="th0" date="20250220120000" temp="7.9" hum="74" dew="3.5"/>
  <WIND id="wind0" date="20250220120000" dir="180" gust="8.3" wind="5.1" chill="4.6"/>
  <RAIN id="rain0" date="20250220115500" rate="0.0" total="412.6"/>
</logger>"#;

const IPMA_JSON: &str = r#"{
  "2025-02-20T16:00": {
    "1210773": { "temperatura": 16.0, "humidade": 70.0, "pressao": 1019.0, "precAcumulada": 0.0,
                 "intensidadeVento": 2.8, "intensidadeVentoKM": 10.1, "idDireccVento": 2, "radiacao": 1.0 }
  },
  "2025-02-20T17:00": {
    "1210773": { "temperatura": 17.4, "humidade": -99.0, "pressao": -99.0, "precAcumulada": 0.2,
                 "intensidadeVento": 5.0, "intensidadeVentoKM": 18.0, "idDireccVento": 0, "radiacao": 1.0 }
  }
}"#;

fn meteoswiss_table(value: &str) -> String {
    format!(
        r#"{{ "stations": [
              {{ "id": "ARH", "current": {{ "date": 1740052800000, "value": {}, "wind_direction": 240 }} }}
           ] }}"#,
        value
    )
}

/// Fake network answering by URL prefix and recording every request.
struct FakeNet {
    routes: Vec<(String, u16, String)>,
    requests: RefCell<Vec<String>>,
}

impl FakeNet {
    fn new() -> Self {
        Self {
            routes: Vec::new(),
            requests: RefCell::new(Vec::new()),
        }
    }

    fn route(mut self, prefix: &str, status: u16, body: &str) -> Self {
        self.routes.push((prefix.to_string(), status, body.to_string()));
        self
    }

    fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    fn upload_requests(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .filter(|u| u.starts_with(WINDGURU_UPLOAD_URL))
            .collect()
    }
}

impl Transport for FakeNet {
    fn get(&self, url: &str) -> Result<HttpResponse> {
        self.requests.borrow_mut().push(url.to_string());
        self.routes
            .iter()
            .find(|(prefix, _, _)| url.starts_with(prefix.as_str()))
            .map(|(_, status, body)| HttpResponse {
                status: *status,
                body: body.clone(),
            })
            .ok_or_else(|| RelayError::Http(format!("no route for {}", url)))
    }
}

fn registry_with_secrets() -> Registry {
    Registry::builtin(|name| Some(format!("pw-{}", name)))
}

fn query_param(url: &str, key: &str) -> String {
    let query = url.split_once('?').map(|(_, q)| q).unwrap_or("");
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v.to_string())
        .unwrap_or_else(|| panic!("{} missing from {}", key, url))
}

// ---------------------------------------------------------------------------
// 1. Successful upload
// ---------------------------------------------------------------------------

#[test]
fn test_meteobridge_station_is_uploaded_with_signed_request() {
    let registry = registry_with_secrets();
    let station = registry.lookup("rohrspitz").unwrap();
    let net = FakeNet::new()
        .route(&station.url, 200, METEOBRIDGE_XML)
        .route(WINDGURU_UPLOAD_URL, 200, "OK");

    let outcome = relay_station(&net, &registry, "rohrspitz", false).unwrap();

    let obs = match outcome {
        RelayOutcome::Uploaded(obs) => obs,
        other => panic!("expected upload, got {:?}", other),
    };
    assert_eq!(obs.timestamp.timestamp(), 1_740_052_800);
    assert_eq!(obs.wind_direction_degrees, Some(180.0));

    let uploads = net.upload_requests();
    assert_eq!(uploads.len(), 1);
    let url = &uploads[0];
    assert_eq!(query_param(url, "uid"), "rohrspitz");
    assert_eq!(query_param(url, "interval"), "60");
    assert_eq!(query_param(url, "unixtime"), "1740052800");
    assert_eq!(query_param(url, "wind_avg"), "9.91");
    assert_eq!(query_param(url, "wind_max"), "16.13");
    assert_eq!(query_param(url, "wind_direction"), "180");
    assert_eq!(query_param(url, "temperature"), "7.9");
    assert_eq!(query_param(url, "rh"), "74");
    assert_eq!(query_param(url, "mslp"), "1016.2");

    let salt = query_param(url, "salt");
    assert_eq!(salt.len(), 16);
    assert_eq!(
        query_param(url, "hash"),
        credential_hash(&salt, "rohrspitz", "pw-WINDSPEED_PASS_ROHRSPITZ")
    );
}

// ---------------------------------------------------------------------------
// 2. Rejected upload
// ---------------------------------------------------------------------------

#[test]
fn test_rejected_upload_is_reported_not_fatal() {
    let registry = registry_with_secrets();
    let station = registry.lookup("rohrspitz").unwrap();
    let net = FakeNet::new()
        .route(&station.url, 200, METEOBRIDGE_XML)
        .route(WINDGURU_UPLOAD_URL, 200, "Error: wrong hash");

    match relay_station(&net, &registry, "rohrspitz", false).unwrap() {
        RelayOutcome::Rejected { observation, error } => {
            assert_eq!(observation.station_id, "rohrspitz");
            assert!(matches!(error, RelayError::Upload { status: 200, .. }));
        }
        other => panic!("expected rejection, got {:?}", other),
    }
    // No retry
    assert_eq!(net.upload_requests().len(), 1);
}

// ---------------------------------------------------------------------------
// 3. Dry run
// ---------------------------------------------------------------------------

#[test]
fn test_dry_run_skips_upload() {
    let registry = Registry::builtin(|_| None);
    let station = registry.lookup("rohrspitz").unwrap();
    let net = FakeNet::new().route(&station.url, 200, METEOBRIDGE_XML);

    let outcome = relay_station(&net, &registry, "rohrspitz", true).unwrap();

    assert!(matches!(outcome, RelayOutcome::DryRun(_)));
    assert!(net.upload_requests().is_empty());
}

// ---------------------------------------------------------------------------
// 4. Configuration failures
// ---------------------------------------------------------------------------

#[test]
fn test_unknown_station_fails_before_any_request() {
    let registry = registry_with_secrets();
    let net = FakeNet::new();

    let result = relay_station(&net, &registry, "atlantis", false);

    assert!(matches!(result, Err(RelayError::UnknownStation(_))));
    assert!(net.requests().is_empty());
}

#[test]
fn test_missing_secret_is_config_error_without_upload() {
    let registry = Registry::builtin(|_| None);
    let station = registry.lookup("rohrspitz").unwrap();
    let net = FakeNet::new()
        .route(&station.url, 200, METEOBRIDGE_XML)
        .route(WINDGURU_UPLOAD_URL, 200, "OK");

    match relay_station(&net, &registry, "rohrspitz", false) {
        Err(RelayError::Config(msg)) => assert!(msg.contains("WINDSPEED_PASS_ROHRSPITZ")),
        other => panic!("expected Config error, got {:?}", other),
    }
    assert!(net.upload_requests().is_empty());
}

#[test]
fn test_blank_secret_is_config_error_without_upload() {
    // As left behind by an unfilled .env template line
    let registry = Registry::builtin(|name| match name {
        "WINDSPEED_PASS_ROHRSPITZ" => Some(String::new()),
        _ => Some("pw".to_string()),
    });
    let station = registry.lookup("rohrspitz").unwrap();
    let net = FakeNet::new()
        .route(&station.url, 200, METEOBRIDGE_XML)
        .route(WINDGURU_UPLOAD_URL, 200, "OK");

    let result = relay_station(&net, &registry, "rohrspitz", false);

    assert!(matches!(result, Err(RelayError::Config(_))));
    assert!(net.upload_requests().is_empty());
}

#[test]
fn test_upstream_error_status_is_fatal() {
    let registry = registry_with_secrets();
    let station = registry.lookup("rohrspitz").unwrap();
    let net = FakeNet::new()
        .route(&station.url, 502, "Bad Gateway")
        .route(WINDGURU_UPLOAD_URL, 200, "OK");

    let result = relay_station(&net, &registry, "rohrspitz", false);

    assert!(matches!(result, Err(RelayError::Http(_))));
    assert!(net.upload_requests().is_empty());
}

#[test]
fn test_malformed_payload_is_never_uploaded() {
    let registry = registry_with_secrets();
    let station = registry.lookup("rohrspitz").unwrap();
    let net = FakeNet::new()
        .route(&station.url, 200, "<logger><TH temp=\"1\" hum=\"2\"/></logger>")
        .route(WINDGURU_UPLOAD_URL, 200, "OK");

    let result = relay_station(&net, &registry, "rohrspitz", false);

    assert!(matches!(result, Err(RelayError::SourceFormat { .. })));
    assert!(net.upload_requests().is_empty());
}

// ---------------------------------------------------------------------------
// 5. Multi-request and sentinel sources
// ---------------------------------------------------------------------------

#[test]
fn test_meteoswiss_station_fetches_every_table() {
    let toml = r#"
        [[station]]
        id = "altenrhein"
        url = "http://meteoswiss.test/stationsTable/"
        interval_seconds = 600
        source = "meteoswiss"
        remote_id = "ARH"
    "#;
    let registry = Registry::from_toml_str(toml, |_| Some("pw".to_string())).unwrap();
    let base = "http://meteoswiss.test/stationsTable/";
    let net = FakeNet::new()
        .route(&format!("{}messwerte-lufttemperatur", base), 200, &meteoswiss_table("6.1"))
        .route(&format!("{}messwerte-luftfeuchtigkeit", base), 200, &meteoswiss_table("78"))
        .route(&format!("{}messwerte-luftdruck", base), 200, &meteoswiss_table("970.2"))
        .route(&format!("{}messwerte-niederschlag", base), 200, &meteoswiss_table("0"))
        .route(&format!("{}messwerte-windgeschwindigkeit", base), 200, &meteoswiss_table("18.52"))
        .route(&format!("{}messwerte-wind-boeenspitze", base), 200, &meteoswiss_table("37.04"))
        .route(WINDGURU_UPLOAD_URL, 200, "OK");

    let outcome = relay_station(&net, &registry, "altenrhein", false).unwrap();

    assert_eq!(net.requests().len(), 7);
    match outcome {
        RelayOutcome::Uploaded(obs) => {
            assert_eq!(obs.sampling_interval_seconds, 600);
            assert!((obs.wind_speed_knots.unwrap() - 10.0).abs() < 1e-9);
            assert!((obs.wind_gust_knots.unwrap() - 20.0).abs() < 1e-9);
            assert_eq!(obs.wind_direction_degrees, Some(240.0));
            assert_eq!(obs.timestamp.timestamp(), 1_740_052_800);
        }
        other => panic!("expected upload, got {:?}", other),
    }
}

#[test]
fn test_ipma_sentinels_are_sent_as_empty_parameters() {
    let registry = registry_with_secrets();
    let station = registry.lookup("praia-da-rainha").unwrap();
    let net = FakeNet::new()
        .route(&station.url, 200, IPMA_JSON)
        .route(WINDGURU_UPLOAD_URL, 200, "OK");

    let outcome = relay_station(&net, &registry, "praia-da-rainha", false).unwrap();
    assert!(matches!(outcome, RelayOutcome::Uploaded(_)));

    let uploads = net.upload_requests();
    let url = &uploads[0];
    assert_eq!(query_param(url, "unixtime"), "1740070800");
    assert_eq!(query_param(url, "temperature"), "17.4");
    assert_eq!(query_param(url, "rh"), "");
    assert_eq!(query_param(url, "mslp"), "");
    assert_eq!(query_param(url, "precip_interval"), "0.2");
    assert_eq!(query_param(url, "wind_avg"), "9.72");
    assert_eq!(query_param(url, "wind_max"), "");
    assert_eq!(query_param(url, "wind_direction"), "");
}
