//! Basic usage example for metrorank-rs
//!
//! Builds a tiny city ranking from in-memory records, then scores a
//! two-airport metro area.

use metrorank_rs::model::{
    AirportRecord, Location, PopulationRecord, RawTrafficRow, ReferenceRecord, TrafficRecord,
};
use metrorank_rs::prelude::*;
use metrorank_rs::{CityPipelineConfig, IntangibleScores};

fn city(name: &str, country: &str, iso2: &str, population: i64) -> PopulationRecord {
    PopulationRecord {
        name: name.into(),
        country: country.into(),
        country_code: iso2.into(),
        population,
        latitude: None,
        longitude: None,
    }
}

fn main() -> Result<()> {
    println!("=== metrorank basic usage ===\n");

    // --- Cities ---
    let inputs = CityInputs {
        population: vec![
            city("Tokyo", "Japan", "jp", 37_115_000),
            city("Paris", "France", "fr", 11_142_000),
            city("Lagos", "Nigeria", "ng", 15_946_000),
        ],
        traffic: vec![RawTrafficRow {
            name: "Paris Charles de Gaulle".into(),
            city_code: Some("PAR".into()),
            country_code: None,
            traffic: TrafficRecord {
                total_passengers: 67_400_000,
                international_passengers: 61_000_000,
                cargo_traffic: 2_000_000,
            },
        }],
        intangible: IntangibleScores::builtin().clone(),
        ..CityInputs::default()
    };
    let config = CityPipelineConfig {
        target_size: None,
        ..CityPipelineConfig::default()
    };
    let ranking = build_city_table(inputs, &config);
    for (i, c) in ranking.cities.iter().enumerate() {
        println!("{}. {} ({}) {}", i + 1, c.city, c.country, c.final_score.unwrap_or_default());
    }
    println!();

    // --- Metros ---
    let paris = ReferenceRecord {
        code: "PAR".into(),
        name: "Paris".into(),
        country: "FR".into(),
        kind: "CC".into(),
        location: Location {
            latitude: 48.85,
            longitude: 2.35,
        },
    };
    let airport = |code: &str, name: &str| AirportRecord {
        code: code.into(),
        name: name.into(),
        city_code: Some("PAR".into()),
        country: "FR".into(),
        kind: "AP".into(),
        location: Location::default(),
        elevation: 0.0,
        time_zone: "Europe/Paris".into(),
        icao: String::new(),
    };
    let run = build_metro_rankings(
        vec![paris],
        vec![airport("CDG", "Charles de Gaulle"), airport("ORY", "Orly")],
        &ComponentPolicy::default(),
    );
    for m in &run.rankings {
        println!("{} [{}] total {}", m.name, m.airport_system(), m.total_score);
    }

    Ok(())
}
