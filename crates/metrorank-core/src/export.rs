// crates/metrorank-core/src/export.rs

//! CSV writers for the two ranking forms.
//!
//! Floats are rendered with `Display` (`79`, `10300000`, `6.9`), not the
//! serializer's float form (`79.0`).

use crate::error::Result;
use crate::model::MetroRanking;
use crate::rank::RankedCity;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

pub const CITY_HEADER: [&str; 9] = [
    "city",
    "country",
    "iso2",
    "population",
    "totalPassengers",
    "internationalPassengers",
    "cargoTraffic",
    "intangible",
    "finalScore",
];

pub const METRO_HEADER: [&str; 11] = [
    "metro_code",
    "name",
    "country",
    "airport_system",
    "num_airports",
    "total_score",
    "aviation_score",
    "economic_score",
    "connectivity_score",
    "latitude",
    "longitude",
];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CityRow<'a> {
    city: &'a str,
    country: &'a str,
    iso2: String,
    population: i64,
    total_passengers: i64,
    international_passengers: i64,
    cargo_traffic: i64,
    intangible: String,
    final_score: String,
}

impl<'a> From<&'a RankedCity> for CityRow<'a> {
    fn from(c: &'a RankedCity) -> Self {
        Self {
            city: &c.city,
            country: &c.country,
            iso2: c.iso2.to_uppercase(),
            population: c.population,
            total_passengers: c.traffic.total_passengers,
            international_passengers: c.traffic.international_passengers,
            cargo_traffic: c.traffic.cargo_traffic,
            intangible: opt_number(c.intangible),
            final_score: opt_number(c.final_score),
        }
    }
}

#[derive(Debug, Serialize)]
struct MetroRow<'a> {
    metro_code: &'a str,
    name: &'a str,
    country: &'a str,
    airport_system: String,
    num_airports: usize,
    total_score: String,
    aviation_score: String,
    economic_score: String,
    connectivity_score: String,
    latitude: String,
    longitude: String,
}

impl<'a> From<&'a MetroRanking> for MetroRow<'a> {
    fn from(m: &'a MetroRanking) -> Self {
        Self {
            metro_code: &m.metro_code,
            name: &m.name,
            country: &m.country,
            airport_system: m.airport_system(),
            num_airports: m.airports.len(),
            total_score: number(m.total_score),
            aviation_score: number(m.components.aviation),
            economic_score: number(m.components.economic),
            connectivity_score: number(m.components.connectivity),
            latitude: number(m.location.latitude),
            longitude: number(m.location.longitude),
        }
    }
}

fn number(v: f64) -> String {
    format!("{v}")
}

fn opt_number(v: Option<f64>) -> String {
    v.map(number).unwrap_or_default()
}

// -----------------------------------------------------------------------------
// WRITERS
// -----------------------------------------------------------------------------

/// Writes the city ranking with its header. An empty list still gets one.
pub fn write_cities<W: Write>(writer: W, cities: &[RankedCity]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(CITY_HEADER)?;
    for city in cities {
        wtr.serialize(CityRow::from(city))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes the metro ranking with its header.
pub fn write_metros<W: Write>(writer: W, metros: &[MetroRanking]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(METRO_HEADER)?;
    for metro in metros {
        wtr.serialize(MetroRow::from(metro))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_cities_to_path(path: impl AsRef<Path>, cities: &[RankedCity]) -> Result<()> {
    let file = create_file(path.as_ref())?;
    write_cities(file, cities)?;
    tracing::info!(path = %path.as_ref().display(), rows = cities.len(), "city ranking written");
    Ok(())
}

pub fn write_metros_to_path(path: impl AsRef<Path>, metros: &[MetroRanking]) -> Result<()> {
    let file = create_file(path.as_ref())?;
    write_metros(file, metros)?;
    tracing::info!(path = %path.as_ref().display(), rows = metros.len(), "metro ranking written");
    Ok(())
}

fn create_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(File::create(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AirportSummary, Location, MetroMetrics, ScoreComponents, TrafficRecord};

    fn city(name: &str, score: Option<f64>) -> RankedCity {
        RankedCity {
            city: name.into(),
            country: "United Kingdom".into(),
            iso2: "gb".into(),
            population: 9_000_000,
            traffic: TrafficRecord {
                total_passengers: 79_200_000,
                international_passengers: 74_000_000,
                cargo_traffic: 1_400_000,
            },
            intangible: score.map(|_| 9.5),
            final_score: score,
            pinned: score.is_none(),
        }
    }

    fn render_cities(cities: &[RankedCity]) -> String {
        let mut buf = Vec::new();
        write_cities(&mut buf, cities).expect("write");
        String::from_utf8(buf).expect("utf8")
    }

    #[test]
    fn city_rows_use_plain_numbers_and_upper_iso2() {
        let out = render_cities(&[city("London", Some(79.0)), city("Pinned, Town", None)]);
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], CITY_HEADER.join(","));
        assert_eq!(
            lines[1],
            "London,United Kingdom,GB,9000000,79200000,74000000,1400000,9.5,79"
        );
        assert_eq!(
            lines[2],
            "\"Pinned, Town\",United Kingdom,GB,9000000,79200000,74000000,1400000,,"
        );
    }

    #[test]
    fn empty_ranking_still_has_header() {
        assert_eq!(render_cities(&[]).trim_end(), CITY_HEADER.join(","));
    }

    #[test]
    fn metro_rows_join_airport_codes() {
        let summary = |code: &str| AirportSummary {
            code: code.into(),
            name: String::new(),
            kind: "AP".into(),
            icao: String::new(),
        };
        let ranking = MetroRanking {
            metro_code: "NYC".into(),
            name: "New York".into(),
            country: "US".into(),
            location: Location {
                latitude: 40.71,
                longitude: -74.0,
            },
            airports: vec![summary("JFK"), summary("LGA"), summary("EWR")],
            metrics: MetroMetrics::default(),
            components: ScoreComponents {
                aviation: 100.0,
                economic: 80.0,
                connectivity: 60.0,
            },
            total_score: 82.0,
        };
        let mut buf = Vec::new();
        write_metros(&mut buf, &[ranking]).expect("write");
        let out = String::from_utf8(buf).expect("utf8");
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], METRO_HEADER.join(","));
        assert_eq!(lines[1], "NYC,New York,US,JFK/LGA/EWR,3,82,100,80,60,40.71,-74");
    }

    #[test]
    fn path_writer_creates_parent_dirs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested/out/cities.csv");
        write_cities_to_path(&path, &[city("London", Some(1.5))]).expect("write");
        let text = fs::read_to_string(&path).expect("read back");
        assert!(text.ends_with(",9.5,1.5\n"));
    }
}
