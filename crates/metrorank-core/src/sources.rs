// crates/metrorank-core/src/sources.rs

//! Per-source row transforms.
//!
//! Each source table has its own column names and its own idea of which
//! fields are mandatory. The transforms here map a [`Row`] to a typed record
//! and apply the lenient numeric coercion from [`crate::coerce`].

use crate::coerce::{parse_count, parse_float, parse_opt_f64};
use crate::error::Result;
use crate::loader::{read_table, Row};
use crate::model::{
    AirportRecord, IntangibleScore, Location, PinnedCity, PopulationRecord, RawTrafficRow,
    ReferenceRecord, TrafficRecord,
};
use crate::traits::FromRow;
use std::path::Path;

// -----------------------------------------------------------------------------
// COLUMN NAMES
// -----------------------------------------------------------------------------

pub const COL_TRAFFIC_CITY: &str = "City/Airport";
pub const COL_TRAFFIC_CITY_CODE: &str = "IATA City Code";
pub const COL_TRAFFIC_TOTAL: &str = "Total Passengers 2023";
pub const COL_TRAFFIC_INTERNATIONAL: &str = "International Passengers 2023";
pub const COL_TRAFFIC_CARGO: &str = "Cargo Traffic 2023 (tons)";

const COUNTRY_CODE_COLUMNS: &[&str] = &["iso2", "countryCode", "Country Code"];

// -----------------------------------------------------------------------------
// GENERIC LOADING
// -----------------------------------------------------------------------------

/// Reads a table and keeps every row the transform accepts.
///
/// A source that yields no usable rows is suspicious but not fatal; it is
/// logged as a warning.
pub fn load_records<T: FromRow>(path: impl AsRef<Path>) -> Result<Vec<T>> {
    let path = path.as_ref();
    let rows = read_table(path)?;
    let total = rows.len();
    let records = records_from_rows::<T>(&rows);

    let skipped = total - records.len();
    if records.is_empty() {
        tracing::warn!(source = T::SOURCE, path = %path.display(), "source produced no usable rows");
    } else {
        tracing::info!(source = T::SOURCE, rows = records.len(), skipped, "source loaded");
    }
    Ok(records)
}

/// Applies the transform to already-parsed rows.
pub fn records_from_rows<T: FromRow>(rows: &[Row]) -> Vec<T> {
    rows.iter()
        .filter_map(|row| {
            let record = T::from_row(row);
            if record.is_none() {
                tracing::debug!(source = T::SOURCE, "skipping row without mandatory fields");
            }
            record
        })
        .collect()
}

// -----------------------------------------------------------------------------
// TRANSFORMS
// -----------------------------------------------------------------------------

impl FromRow for PopulationRecord {
    const SOURCE: &'static str = "population";

    /// Needs `city`, a country code and a non-zero population.
    fn from_row(row: &Row) -> Option<Self> {
        let name = row.field("city")?;
        let code = row.field_any(COUNTRY_CODE_COLUMNS)?;
        let population = parse_count(row.field("population")).value;
        if population == 0 {
            return None;
        }

        Some(Self {
            name: name.to_string(),
            country: row.field("country").unwrap_or("").to_string(),
            country_code: code.to_lowercase(),
            population,
            latitude: parse_opt_f64(row.field_any(&["lat", "latitude"])),
            longitude: parse_opt_f64(row.field_any(&["lng", "longitude"])),
        })
    }
}

impl FromRow for RawTrafficRow {
    const SOURCE: &'static str = "traffic";

    /// `City/Airport` may read `"Name/Suffix"`; only the name part is kept.
    fn from_row(row: &Row) -> Option<Self> {
        let name = row
            .raw(COL_TRAFFIC_CITY)?
            .split('/')
            .next()
            .unwrap_or("")
            .trim();
        if name.is_empty() {
            return None;
        }

        Some(Self {
            name: name.to_string(),
            city_code: row.field(COL_TRAFFIC_CITY_CODE).map(str::to_string),
            country_code: row.field_any(COUNTRY_CODE_COLUMNS).map(str::to_lowercase),
            traffic: TrafficRecord {
                total_passengers: parse_count(row.field(COL_TRAFFIC_TOTAL)).value,
                international_passengers: parse_count(row.field(COL_TRAFFIC_INTERNATIONAL)).value,
                cargo_traffic: parse_count(row.field(COL_TRAFFIC_CARGO)).value,
            },
        })
    }
}

fn location_from(row: &Row) -> Location {
    Location {
        latitude: parse_float(row.field("latitude")).value,
        longitude: parse_float(row.field("longitude")).value,
    }
}

impl FromRow for ReferenceRecord {
    const SOURCE: &'static str = "city codes";

    fn from_row(row: &Row) -> Option<Self> {
        let code = row.field("code")?;
        Some(Self {
            code: code.to_string(),
            name: row.field("name").unwrap_or("").to_string(),
            country: row.field("country").unwrap_or("").to_string(),
            kind: row.field("type").unwrap_or("").to_string(),
            location: location_from(row),
        })
    }
}

impl FromRow for AirportRecord {
    const SOURCE: &'static str = "airports";

    fn from_row(row: &Row) -> Option<Self> {
        let code = row.field("code")?;
        Some(Self {
            code: code.to_string(),
            name: row.field("name").unwrap_or("").to_string(),
            city_code: row.field("city_code").map(str::to_string),
            country: row.field("country").unwrap_or("").to_string(),
            kind: row.field("type").unwrap_or("").to_string(),
            location: location_from(row),
            elevation: parse_float(row.field("elevation")).value,
            time_zone: row.field("time_zone").unwrap_or("").to_string(),
            icao: row.field("icao").unwrap_or("").to_string(),
        })
    }
}

impl FromRow for IntangibleScore {
    const SOURCE: &'static str = "intangible scores";

    fn from_row(row: &Row) -> Option<Self> {
        let city = row.field("city")?;
        let code = row.field_any(&["iso2", "countryCode"])?;
        Some(Self {
            city: city.to_string(),
            country_code: code.to_string(),
            score: parse_float(row.field_any(&["score", "aiScore"])).value,
            rationale: row.field_any(&["reason", "rationale"]).unwrap_or("").to_string(),
        })
    }
}

impl FromRow for PinnedCity {
    const SOURCE: &'static str = "pinned core list";

    fn from_row(row: &Row) -> Option<Self> {
        let city = row.field("city")?;
        let country = row.field("country")?;
        Some(Self {
            city: city.to_string(),
            country: country.to_string(),
            country_code: row.field("iso2").unwrap_or("").to_lowercase(),
            population: parse_count(row.field("population")).value,
            traffic: TrafficRecord {
                total_passengers: parse_count(row.field("totalPassengers")).value,
                international_passengers: parse_count(row.field("internationalPassengers")).value,
                cargo_traffic: parse_count(row.field("cargoTraffic")).value,
            },
            intangible: parse_opt_f64(row.field("intangible")),
            final_score: parse_opt_f64(row.field("finalScore")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn population_row_requires_name_code_and_population() {
        let ok = Row::from_pairs([
            ("city", "Tokyo"),
            ("country", "Japan"),
            ("iso2", "JP"),
            ("population", "37,732,000"),
        ]);
        let rec = PopulationRecord::from_row(&ok).expect("valid row");
        assert_eq!(rec.country_code, "jp");
        assert_eq!(rec.population, 37_732_000);

        let no_code = Row::from_pairs([("city", "Tokyo"), ("population", "1")]);
        assert!(PopulationRecord::from_row(&no_code).is_none());

        let bad_pop = Row::from_pairs([("city", "Tokyo"), ("iso2", "JP"), ("population", "?")]);
        assert!(PopulationRecord::from_row(&bad_pop).is_none());
    }

    #[test]
    fn population_row_accepts_country_code_alias() {
        let row = Row::from_pairs([
            ("city", "Lagos"),
            ("countryCode", "NG"),
            ("population", "15388000"),
        ]);
        let rec = PopulationRecord::from_row(&row).expect("valid row");
        assert_eq!(rec.country_code, "ng");
        assert_eq!(rec.country, "");
    }

    #[test]
    fn traffic_row_keeps_name_before_slash() {
        let row = Row::from_pairs([
            (COL_TRAFFIC_CITY, "London/Heathrow"),
            (COL_TRAFFIC_CITY_CODE, "LON"),
            (COL_TRAFFIC_TOTAL, "79,200,000"),
            (COL_TRAFFIC_INTERNATIONAL, "bad"),
        ]);
        let rec = RawTrafficRow::from_row(&row).expect("valid row");
        assert_eq!(rec.name, "London");
        assert_eq!(rec.city_code.as_deref(), Some("LON"));
        assert_eq!(rec.traffic.total_passengers, 79_200_000);
        assert_eq!(rec.traffic.international_passengers, 0);
        assert_eq!(rec.traffic.cargo_traffic, 0);
    }

    #[test]
    fn traffic_row_without_name_is_skipped() {
        let row = Row::from_pairs([(COL_TRAFFIC_CITY, " /JFK")]);
        assert!(RawTrafficRow::from_row(&row).is_none());
    }

    #[test]
    fn reference_rows_only_need_a_code() {
        let row = Row::from_pairs([("code", "PAR"), ("type", "CC"), ("latitude", "48.85")]);
        let rec = ReferenceRecord::from_row(&row).expect("valid row");
        assert!(rec.is_metro_area());
        assert_eq!(rec.location.latitude, 48.85);
        assert_eq!(rec.location.longitude, 0.0);
        assert!(ReferenceRecord::from_row(&Row::from_pairs([("name", "Paris")])).is_none());
    }

    #[test]
    fn pinned_row_keeps_missing_scores_absent() {
        let row = Row::from_pairs([
            ("city", "Paris"),
            ("country", "France"),
            ("iso2", "FR"),
            ("population", "11060000"),
            ("totalPassengers", "67400000"),
        ]);
        let pinned = PinnedCity::from_row(&row).expect("valid row");
        assert_eq!(pinned.country_code, "fr");
        assert_eq!(pinned.traffic.total_passengers, 67_400_000);
        assert_eq!(pinned.intangible, None);
        assert_eq!(pinned.final_score, None);
    }
}
