/// Station homepage table parser (aktuell.htm).
///
/// The weather-station software behind these pages renders the current
/// conditions as a single bordered table. The data row has a fixed layout of
/// 25 cells; anything else (caption rows, partially rendered rows) is
/// skipped. Values are German-formatted: decimal commas with a unit suffix,
/// and wind columns like `"14,8 km/h (3 Bft)"`.
///
/// Date and time are separate wall-clock columns with no zone.

use chrono::{NaiveDate, NaiveTime};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::convert::{parse_locale_decimal, parse_unit_annotated, AnnotatedUnit, SpeedUnit};
use crate::model::{RawObservation, RawTimestamp, RelayError, Result, Speed};

const ORIGIN: &str = "weather table";

/// Cells in a data row.
pub const EXPECTED_COLUMNS: usize = 25;

// Column indices within the data row
const COL_DATE: usize = 0;
const COL_TIME: usize = 1;
const COL_TEMPERATURE: usize = 2;
const COL_HUMIDITY: usize = 8;
const COL_PRESSURE: usize = 14;
const COL_RAIN: usize = 15;
const COL_WIND: usize = 16;
const COL_WIND_DIRECTION: usize = 18;
const COL_GUST: usize = 24;

fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("static selector")
}

/// Parses the current-conditions table.
///
/// `wind_unit` says how the wind and gust columns are annotated. km/h
/// readings go through the table calibration factor, knots are taken as is.
///
/// # Errors
/// - `RelayError::SourceFormat` if there is no `table[border="1"]` or no
///   row with exactly `EXPECTED_COLUMNS` cells.
/// - `RelayError::Parse` if a cell does not hold the expected number.
pub fn parse_table(html: &str, wind_unit: AnnotatedUnit) -> Result<RawObservation> {
    let document = Html::parse_document(html);

    let table = document
        .select(&selector(r#"table[border="1"]"#))
        .next()
        .ok_or_else(|| RelayError::source_format(ORIGIN, "no table with border=1", html))?;

    let cells = data_row(table)?;
    let cell = |i: usize| cells[i].as_str();

    let date = NaiveDate::parse_from_str(cell(COL_DATE), "%d.%m.%Y")
        .map_err(|e| RelayError::Parse(format!("date cell '{}': {}", cell(COL_DATE), e)))?;
    let time = NaiveTime::parse_from_str(cell(COL_TIME), "%H:%M")
        .map_err(|e| RelayError::Parse(format!("time cell '{}': {}", cell(COL_TIME), e)))?;

    let speed_unit = match wind_unit {
        AnnotatedUnit::KilometersPerHour => SpeedUnit::CalibratedKilometersPerHour,
        AnnotatedUnit::Knots => SpeedUnit::Knots,
    };
    let wind = parse_unit_annotated(cell(COL_WIND), wind_unit)?;
    let gust = parse_unit_annotated(cell(COL_GUST), wind_unit)?;

    Ok(RawObservation {
        timestamp: RawTimestamp::Naive(date.and_time(time)),
        temperature_c: Some(parse_locale_decimal(cell(COL_TEMPERATURE))?),
        humidity_percent: Some(parse_locale_decimal(cell(COL_HUMIDITY))?),
        air_pressure_hpa: Some(parse_locale_decimal(cell(COL_PRESSURE))?),
        rain_mm: Some(parse_locale_decimal(cell(COL_RAIN))?),
        wind_speed: Some(Speed::new(wind, speed_unit)),
        wind_gust: Some(Speed::new(gust, speed_unit)),
        wind_direction_degrees: Some(parse_locale_decimal(cell(COL_WIND_DIRECTION))?),
    })
}

/// Trimmed cell texts of the first row with the expected layout.
fn data_row(table: ElementRef<'_>) -> Result<Vec<String>> {
    let row_selector = selector("tr");
    let cell_selector = selector("td");

    for (index, row) in table.select(&row_selector).enumerate() {
        let cells: Vec<String> = row
            .select(&cell_selector)
            .map(|td| td.text().collect::<String>().trim().to_string())
            .collect();

        if cells.len() == EXPECTED_COLUMNS {
            return Ok(cells);
        }
        debug!(row = index, columns = cells.len(), "skipping table row");
    }

    Err(RelayError::source_format(
        ORIGIN,
        format!("no row with {} columns", EXPECTED_COLUMNS),
        &table.html(),
    ))
}
