// crates/metrorank-core/src/compile.rs

//! Population table → JSON city list.

use crate::coerce::{parse_count, parse_opt_f64};
use crate::error::Result;
use crate::loader::{read_table, Row};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// One entry of the compiled city list.
///
/// Every field has a default so that incomplete lists still deserialize and
/// can be reported by [`crate::validate`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompiledCity {
    pub id: String,
    pub city: String,
    pub country: String,
    pub country_code: String,
    pub population: i64,
    pub coordinates: Option<Coordinates>,
    pub timezone: Option<String>,
}

/// `"<city lowercased, spaces → _>-<code lowercased>"`.
///
/// ```rust
/// use metrorank_core::compile::city_id;
///
/// assert_eq!(city_id("New York", "US"), "new_york-us");
/// ```
pub fn city_id(city: &str, country_code: &str) -> String {
    format!(
        "{}-{}",
        city.to_lowercase().replace(' ', "_"),
        country_code.to_lowercase()
    )
}

impl CompiledCity {
    pub fn from_row(row: &Row) -> Self {
        let city = row.field("city").unwrap_or("");
        let country_code = row.field_any(&["countryCode", "iso2"]).unwrap_or("");
        let lat = parse_opt_f64(row.field_any(&["lat", "latitude"]));
        let lng = parse_opt_f64(row.field_any(&["lng", "longitude"]));

        Self {
            id: city_id(city, country_code),
            city: city.to_string(),
            country: row.field("country").unwrap_or("").to_string(),
            country_code: country_code.to_string(),
            population: parse_count(row.field("population")).value,
            coordinates: lat.zip(lng).map(|(lat, lng)| Coordinates { lat, lng }),
            timezone: row.field_any(&["timezone", "time_zone"]).map(str::to_string),
        }
    }
}

/// Compiles every row; incomplete rows are kept for validation to flag.
pub fn compile_rows(rows: &[Row]) -> Vec<CompiledCity> {
    rows.iter().map(CompiledCity::from_row).collect()
}

pub fn compile_file(path: impl AsRef<Path>) -> Result<Vec<CompiledCity>> {
    let rows = read_table(path)?;
    Ok(compile_rows(&rows))
}

/// Writes the list as pretty-printed JSON, creating parent directories.
pub fn write_json(path: impl AsRef<Path>, cities: &[CompiledCity]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, cities)?;
    writer.flush()?;
    tracing::info!(path = %path.display(), cities = cities.len(), "city list compiled");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_compiles_with_coordinates() {
        let row = Row::from_pairs([
            ("city", "Rio de Janeiro"),
            ("country", "Brazil"),
            ("iso2", "BR"),
            ("population", "12,592,000"),
            ("lat", "-22.9111"),
            ("lng", "-43.2056"),
        ]);
        let city = CompiledCity::from_row(&row);
        assert_eq!(city.id, "rio_de_janeiro-br");
        assert_eq!(city.country_code, "BR");
        assert_eq!(city.population, 12_592_000);
        assert_eq!(
            city.coordinates,
            Some(Coordinates {
                lat: -22.9111,
                lng: -43.2056
            })
        );
        assert_eq!(city.timezone, None);
    }

    #[test]
    fn partial_coordinates_are_dropped() {
        let row = Row::from_pairs([("city", "Lima"), ("countryCode", "PE"), ("lat", "-12.04")]);
        let city = CompiledCity::from_row(&row);
        assert_eq!(city.coordinates, None);
        assert_eq!(city.population, 0);
    }

    #[test]
    fn json_uses_camel_case() {
        let city = CompiledCity {
            id: "oslo-no".into(),
            city: "Oslo".into(),
            country: "Norway".into(),
            country_code: "NO".into(),
            population: 1,
            coordinates: None,
            timezone: Some("Europe/Oslo".into()),
        };
        let json = serde_json::to_value(&city).expect("json");
        assert_eq!(json["countryCode"], "NO");
        assert!(json["coordinates"].is_null());
    }

    #[test]
    fn write_json_round_trips_through_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("processed/cities.json");
        let rows = vec![Row::from_pairs([("city", "Oslo"), ("iso2", "NO"), ("population", "1")])];
        write_json(&path, &compile_rows(&rows)).expect("write");
        let back: Vec<CompiledCity> =
            serde_json::from_str(&fs::read_to_string(&path).expect("read")).expect("parse");
        assert_eq!(back[0].id, "oslo-no");
    }
}
