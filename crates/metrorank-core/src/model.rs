// crates/metrorank-core/src/model.rs

//! Domain records.
//!
//! Source records are produced once per run by the loaders and never mutated
//! afterwards. Merged entities and metro areas are built by the merge step
//! and read by scoring and export.

use crate::text::CanonicalKey;
use serde::{Deserialize, Serialize};

/// A city row from one of the population tables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PopulationRecord {
    pub name: String,
    /// Display name of the country (may be empty in sparse tables).
    pub country: String,
    /// Lower-cased ISO2 code.
    pub country_code: String,
    pub population: i64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Traffic figures attached to a city.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficRecord {
    pub total_passengers: i64,
    pub international_passengers: i64,
    pub cargo_traffic: i64,
}

/// A traffic table row before it has been resolved to a city key.
#[derive(Clone, Debug, PartialEq)]
pub struct RawTrafficRow {
    /// Leading part of `City/Airport`, before any `/`.
    pub name: String,
    pub city_code: Option<String>,
    pub country_code: Option<String>,
    pub traffic: TrafficRecord,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// Type tag of a metropolitan-area code in the reference tables.
pub const METRO_AREA_TYPE: &str = "CC";

/// An entry of the city-code reference table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRecord {
    pub code: String,
    pub name: String,
    pub country: String,
    pub kind: String,
    pub location: Location,
}

impl ReferenceRecord {
    pub fn is_metro_area(&self) -> bool {
        self.kind == METRO_AREA_TYPE
    }
}

/// An entry of the airport reference table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AirportRecord {
    pub code: String,
    pub name: String,
    pub city_code: Option<String>,
    pub country: String,
    pub kind: String,
    pub location: Location,
    pub elevation: f64,
    pub time_zone: String,
    pub icao: String,
}

/// A curated prestige rating (0-10) for a city.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntangibleScore {
    pub city: String,
    pub country_code: String,
    pub score: f64,
    pub rationale: String,
}

/// A row of the pinned "core" list, emitted verbatim ahead of the ranking.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PinnedCity {
    pub city: String,
    pub country: String,
    pub country_code: String,
    pub population: i64,
    pub traffic: TrafficRecord,
    pub intangible: Option<f64>,
    pub final_score: Option<f64>,
}

/// One place after all sources have been reconciled under its key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MergedCityEntity {
    pub key: CanonicalKey,
    pub name: String,
    pub country: String,
    pub country_code: String,
    pub population: i64,
    pub traffic: TrafficRecord,
    pub intangible: f64,
    pub score: f64,
}

/// Aggregate figures for a metro area.
///
/// The merge does not populate these yet; they are carried so the export
/// schema stays stable once route data is wired in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MetroMetrics {
    pub total_passengers: i64,
    pub international_routes: i64,
    pub cargo_tons: i64,
}

/// A city's whole airport system under one reference code.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetroArea {
    pub code: String,
    pub name: String,
    pub country: String,
    pub location: Location,
    /// Airport codes in insertion order, without duplicates.
    pub airports: Vec<String>,
    pub metrics: MetroMetrics,
}

impl MetroArea {
    pub fn from_reference(reference: &ReferenceRecord) -> Self {
        Self {
            code: reference.code.clone(),
            name: reference.name.clone(),
            country: reference.country.clone(),
            location: reference.location,
            airports: Vec::new(),
            metrics: MetroMetrics::default(),
        }
    }

    /// Adds an airport code unless it is already listed.
    pub fn attach_airport(&mut self, code: &str) {
        if !self.airports.iter().any(|a| a == code) {
            self.airports.push(code.to_string());
        }
    }
}

/// The three sub-scores of the component strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponents {
    pub aviation: f64,
    pub economic: f64,
    pub connectivity: f64,
}

/// A scored metro area ready for export.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetroRanking {
    pub metro_code: String,
    pub name: String,
    pub country: String,
    pub location: Location,
    pub airports: Vec<AirportSummary>,
    pub metrics: MetroMetrics,
    pub components: ScoreComponents,
    pub total_score: f64,
}

impl MetroRanking {
    /// Airport codes joined with `/`, e.g. `"JFK/LGA/EWR"`.
    pub fn airport_system(&self) -> String {
        self.airports
            .iter()
            .map(|a| a.code.as_str())
            .collect::<Vec<_>>()
            .join("/")
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AirportSummary {
    pub code: String,
    pub name: String,
    pub kind: String,
    pub icao: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attach_airport_keeps_insertion_order_without_duplicates() {
        let reference = ReferenceRecord {
            code: "NYC".into(),
            name: "New York".into(),
            country: "US".into(),
            kind: METRO_AREA_TYPE.into(),
            location: Location::default(),
        };
        let mut metro = MetroArea::from_reference(&reference);
        metro.attach_airport("JFK");
        metro.attach_airport("LGA");
        metro.attach_airport("JFK");
        metro.attach_airport("EWR");
        assert_eq!(metro.airports, vec!["JFK", "LGA", "EWR"]);
        assert!(reference.is_metro_area());
    }
}
