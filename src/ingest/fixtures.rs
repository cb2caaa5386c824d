/// Test fixtures: representative upstream payloads, one set per source.
///
/// These are trimmed to what the parsers read but keep the surrounding
/// structure (extra attributes, extra columns, sibling stations) the real
/// pages carry, so the parsers are exercised against realistic noise.

// ---------------------------------------------------------------------------
// Meteobridge live data XML
// ---------------------------------------------------------------------------

/// Meteobridge `livedataxml.cgi` output. Wind and gust in m/s.
#[cfg(test)]
pub(crate) fn fixture_meteobridge_xml() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<logger>
  <THB id="thb0" date="20250220120000" temp="8.4" hum="71" dew="3.4" press="1016.2" seapress="1018.9" fc="2" lowbat="0"/>
  <TH id="th0" date="20250220120000" temp="7.9" hum="74" dew="3.5" lowbat="0"/>
  <WIND id="wind0" date="20250220120000" dir="180" gust="8.3" wind="5.1" chill="4.6" lowbat="0"/>
  <RAIN id="rain0" date="20250220115500" rate="0.2" total="412.6" delta="0.0" lowbat="0"/>
  <UV id="uv0" date="20250220120000" index="1.2" lowbat="0"/>
</logger>"#
}

/// Same logger with the TH sensor missing.
#[cfg(test)]
pub(crate) fn fixture_meteobridge_xml_no_th() -> &'static str {
    r#"<logger>
  <THB id="thb0" date="20250220120000" temp="8.4" hum="71" press="1016.2"/>
  <WIND id="wind0" date="20250220120000" dir="180" gust="8.3" wind="5.1"/>
  <RAIN id="rain0" date="20250220115500" rate="0.2"/>
</logger>"#
}

// ---------------------------------------------------------------------------
// Weather table HTML (aktuell.htm)
// ---------------------------------------------------------------------------

/// Kressbronn-style current conditions table: a short caption row followed
/// by one 25-column data row. Wind columns in km/h with Beaufort.
#[cfg(test)]
pub(crate) fn fixture_weather_table_kmh() -> &'static str {
    r#"<html><head><title>Wetter aktuell</title></head><body>
<h1>Aktuelle Wetterdaten</h1>
<table border="0"><tr><td>Navigation</td></tr></table>
<table border="1">
  <tr><td>Datum</td><td>Zeit</td><td>Temperatur</td><td>Feuchte</td><td>Luftdruck</td><td>Wind</td></tr>
  <tr>
    <td>20.02.2025</td><td>12:50</td><td>8,4 &deg;C</td><td>3,1 &deg;C</td><td>7,2 &deg;C</td>
    <td>9,0 &deg;C</td><td>2,5 &deg;C</td><td>0,4 K/h</td><td>71 %</td><td>65 %</td>
    <td>80 %</td><td>3,4 &deg;C</td><td>6,9 g/m&sup3;</td><td>12 W/m&sup2;</td><td>1016,2 hPa</td>
    <td>0,0 mm</td><td>14,8 km/h (3 Bft)</td><td>SSW</td><td>202 &deg;</td><td>11,2 km/h (2 Bft)</td>
    <td>SW</td><td>225 &deg;</td><td>18,0 km/h (3 Bft)</td><td>12:41</td><td>25,9 km/h (4 Bft)</td>
  </tr>
</table>
</body></html>"#
}

/// Legacy kite-connection page: same layout, wind columns in knots, and a
/// malformed row ahead of the data row that must be skipped.
#[cfg(test)]
pub(crate) fn fixture_weather_table_kts() -> &'static str {
    r#"<html><body>
<table border="1">
  <tr><td colspan="25">Rohrspitz Kite Station</td></tr>
  <tr><td>20.02.2025</td><td>12:45</td><td>7,6 &deg;C</td></tr>
  <tr>
    <td>20.02.2025</td><td>12:50</td><td>7,9 &deg;C</td><td>2,8 &deg;C</td><td>6,9 &deg;C</td>
    <td>8,8 &deg;C</td><td>2,1 &deg;C</td><td>0,2 K/h</td><td>74 %</td><td>68 %</td>
    <td>81 %</td><td>3,5 &deg;C</td><td>6,8 g/m&sup3;</td><td>15 W/m&sup2;</td><td>1016,4 hPa</td>
    <td>0,2 mm</td><td>12,4 kts (4 Bft)</td><td>NW</td><td>315 &deg;</td><td>10,1 kts (3 Bft)</td>
    <td>NW</td><td>310 &deg;</td><td>15,0 kts (4 Bft)</td><td>12:33</td><td>18,7 kts (5 Bft)</td>
  </tr>
</table>
</body></html>"#
}

/// A page where the table has lost its data columns.
#[cfg(test)]
pub(crate) fn fixture_weather_table_short_rows() -> &'static str {
    r#"<html><body><table border="1">
  <tr><td>Datum</td><td>Zeit</td></tr>
  <tr><td>20.02.2025</td><td>12:50</td><td>8,4 &deg;C</td></tr>
</table></body></html>"#
}

// ---------------------------------------------------------------------------
// Meteo-services gateway (free text)
// ---------------------------------------------------------------------------

/// `gatewaytest.php` output: token/value pairs as loose text.
#[cfg(test)]
pub(crate) fn fixture_gateway_text() -> &'static str {
    r#"<html><body>
wxtime 1740055800<br>
t2m 8.1<br>
relhum 70<br>
press 1016.4<br>
rainrate 0.0<br>
windspeed 4.2<br>
winddir 210<br>
windgust 6.8<br>
</body></html>"#
}

/// Gateway output with the gust and rain sensors offline.
#[cfg(test)]
pub(crate) fn fixture_gateway_text_partial() -> &'static str {
    "wxtime 1740055800\nt2m -1.5\nrelhum 93\npress 1021.0\nwindspeed 1.0\nwinddir 45\n"
}

// ---------------------------------------------------------------------------
// GeoSphere Austria station/current
// ---------------------------------------------------------------------------

/// TAWES 10-minute current values for station 11299. Wind in m/s.
#[cfg(test)]
pub(crate) fn fixture_geosphere_json() -> &'static str {
    r#"{
      "media_type": "application/json",
      "type": "FeatureCollection",
      "version": "v1",
      "timestamps": ["2025-02-20T12:00+00:00"],
      "features": [{
        "type": "Feature",
        "geometry": { "type": "Point", "coordinates": [9.6667, 47.5167] },
        "properties": {
          "parameters": {
            "DD":   { "name": "Windrichtung", "unit": "°", "data": [245.0] },
            "FFAM": { "name": "Windgeschwindigkeit", "unit": "m/s", "data": [4.3] },
            "FFX":  { "name": "Windspitze", "unit": "m/s", "data": [7.9] },
            "P":    { "name": "Luftdruck", "unit": "hPa", "data": [968.3] },
            "RFAM": { "name": "Relative Feuchte", "unit": "%", "data": [76.0] },
            "RR":   { "name": "Niederschlag", "unit": "mm", "data": [0.0] },
            "TL":   { "name": "Lufttemperatur", "unit": "°C", "data": [6.4] }
          },
          "station": "11299"
        }
      }]
    }"#
}

/// Same station with a null gust reading and a +01:00 timestamp.
#[cfg(test)]
pub(crate) fn fixture_geosphere_json_null_gust() -> &'static str {
    r#"{
      "timestamps": ["2025-02-20T13:00+01:00"],
      "features": [{
        "properties": {
          "parameters": {
            "DD":   { "data": [250.0] },
            "FFAM": { "data": [4.0] },
            "FFX":  { "data": [null] },
            "P":    { "data": [968.1] },
            "RFAM": { "data": [77.0] },
            "RR":   { "data": [0.1] },
            "TL":   { "data": [6.5] }
          }
        }
      }]
    }"#
}

// ---------------------------------------------------------------------------
// MeteoSwiss stationsTable
// ---------------------------------------------------------------------------

/// Builds one MeteoSwiss stationsTable payload with ARH plus a neighbour.
#[cfg(test)]
pub(crate) fn fixture_meteoswiss_table(value: &str, wind_direction: Option<&str>) -> String {
    let direction = wind_direction
        .map(|d| format!(r#", "wind_direction": {}"#, d))
        .unwrap_or_default();
    format!(
        r#"{{
          "stations": [
            {{ "id": "SAE", "name": "Säntis", "current": {{ "date": 1740052200000, "value": 99.9 }} }},
            {{ "id": "ARH", "name": "Altenrhein", "canton": "SG",
               "current": {{ "date": 1740052800000, "value": {}{} }} }}
          ]
        }}"#,
        value, direction
    )
}

// ---------------------------------------------------------------------------
// IPMA observations
// ---------------------------------------------------------------------------

/// IPMA hourly observations for two hours, keys deliberately out of order.
/// Station 1210773 reports -99.0 for humidity and pressure in the latest hour.
#[cfg(test)]
pub(crate) fn fixture_ipma_json() -> &'static str {
    r#"{
      "2025-02-20T16:00": {
        "1210773": {
          "intensidadeVentoKM": 10.1, "temperatura": 16.0, "radiacao": 410.2,
          "idDireccVento": 2, "precAcumulada": 0.0, "intensidadeVento": 2.8,
          "humidade": 70.0, "pressao": 1019.0
        }
      },
      "2025-02-20T17:00": {
        "1210881": {
          "intensidadeVentoKM": 5.0, "temperatura": 17.1, "radiacao": 335.7,
          "idDireccVento": 6, "precAcumulada": 0.0, "intensidadeVento": 1.4,
          "humidade": -99.0, "pressao": -99.0
        },
        "1210773": {
          "intensidadeVentoKM": 18.0, "temperatura": 17.4, "radiacao": 330.1,
          "idDireccVento": 7, "precAcumulada": 0.2, "intensidadeVento": 5.0,
          "humidade": -99.0, "pressao": -99.0
        },
        "1200545": null
      }
    }"#
}

/// Latest hour with every value at the sentinel and sector 0 (calm).
#[cfg(test)]
pub(crate) fn fixture_ipma_json_all_sentinel() -> &'static str {
    r#"{
      "2025-02-20T17:00": {
        "1210773": {
          "intensidadeVentoKM": -99.0, "temperatura": -99.0, "radiacao": -99.0,
          "idDireccVento": 0, "precAcumulada": -99.0, "intensidadeVento": -99.0,
          "humidade": -99.0, "pressao": -99.0
        }
      }
    }"#
}
