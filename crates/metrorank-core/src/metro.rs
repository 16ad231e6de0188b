// crates/metrorank-core/src/metro.rs

//! Airport-centric projection: metro areas and their airport systems.

use crate::model::{AirportRecord, AirportSummary, MetroArea, MetroRanking, ReferenceRecord};
use crate::rank::sort_by_score_desc;
use crate::score::{ComponentPolicy, MetroProfile};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Simple aggregate counts for the metro index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetroStats {
    pub metro_areas: usize,
    pub airports: usize,
    pub city_codes: usize,
}

/// City codes, airports and the metro areas built from them.
#[derive(Debug, Clone, Default)]
pub struct MetroIndex {
    city_codes: HashMap<String, ReferenceRecord>,
    airports: HashMap<String, AirportRecord>,
    /// Metro areas in first-seen order.
    metro_areas: Vec<MetroArea>,
    metro_pos: HashMap<String, usize>,
}

impl MetroIndex {
    /// City codes are processed before airports so every airport can find
    /// its metro area.
    pub fn build(city_codes: Vec<ReferenceRecord>, airports: Vec<AirportRecord>) -> Self {
        let mut index = Self::default();
        for record in city_codes {
            index.add_city_code(record);
        }
        for airport in airports {
            index.add_airport(airport);
        }

        tracing::info!(
            metro_areas = index.metro_areas.len(),
            airports = index.airports.len(),
            city_codes = index.city_codes.len(),
            "metro index built"
        );
        index
    }

    fn add_city_code(&mut self, record: ReferenceRecord) {
        if record.is_metro_area() {
            // A repeated code replaces the metro but keeps its position.
            let metro = MetroArea::from_reference(&record);
            match self.metro_pos.get(&record.code) {
                Some(&pos) => self.metro_areas[pos] = metro,
                None => {
                    self.metro_pos
                        .insert(record.code.clone(), self.metro_areas.len());
                    self.metro_areas.push(metro);
                }
            }
        }
        self.city_codes.insert(record.code.clone(), record);
    }

    fn add_airport(&mut self, airport: AirportRecord) {
        if let Some(pos) = airport
            .city_code
            .as_deref()
            .and_then(|c| self.metro_pos.get(c).copied())
        {
            self.metro_areas[pos].attach_airport(&airport.code);
        }
        self.airports.insert(airport.code.clone(), airport);
    }

    pub fn stats(&self) -> MetroStats {
        MetroStats {
            metro_areas: self.metro_areas.len(),
            airports: self.airports.len(),
            city_codes: self.city_codes.len(),
        }
    }

    pub fn metro_areas(&self) -> &[MetroArea] {
        &self.metro_areas
    }

    pub fn metro_area(&self, code: &str) -> Option<&MetroArea> {
        self.metro_pos.get(code).map(|&pos| &self.metro_areas[pos])
    }

    pub fn airport(&self, code: &str) -> Option<&AirportRecord> {
        self.airports.get(code)
    }

    pub fn city_code(&self, code: &str) -> Option<&ReferenceRecord> {
        self.city_codes.get(code)
    }

    pub fn profile<'a>(&'a self, metro: &'a MetroArea) -> MetroProfile<'a> {
        MetroProfile {
            metro,
            airport_kinds: metro
                .airports
                .iter()
                .map(|code| self.airports.get(code).map(|a| a.kind.as_str()))
                .collect(),
        }
    }

    /// Scores every metro area that has at least one airport and returns
    /// them best first. Ties keep index order.
    pub fn rankings(&self, policy: &ComponentPolicy) -> Vec<MetroRanking> {
        let mut rankings: Vec<MetroRanking> = self
            .metro_areas
            .iter()
            .filter(|m| !m.airports.is_empty())
            .map(|metro| {
                let profile = self.profile(metro);
                let components = policy.components(&profile);
                MetroRanking {
                    metro_code: metro.code.clone(),
                    name: metro.name.clone(),
                    country: metro.country.clone(),
                    location: metro.location,
                    airports: metro
                        .airports
                        .iter()
                        .map(|code| self.airport_summary(code))
                        .collect(),
                    metrics: metro.metrics,
                    components,
                    total_score: policy.total(&components),
                }
            })
            .collect();

        sort_by_score_desc(&mut rankings);
        rankings
    }

    fn airport_summary(&self, code: &str) -> AirportSummary {
        match self.airports.get(code) {
            Some(a) => AirportSummary {
                code: code.to_string(),
                name: a.name.clone(),
                kind: a.kind.clone(),
                icao: a.icao.clone(),
            },
            None => AirportSummary {
                code: code.to_string(),
                name: String::new(),
                kind: String::new(),
                icao: String::new(),
            },
        }
    }
}
