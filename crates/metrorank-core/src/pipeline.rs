// crates/metrorank-core/src/pipeline.rs

//! # Pipeline
//!
//! Load → merge → score → rank, strictly in that order. The `build_*`
//! functions are pure and take already-loaded records; the `run_*`
//! functions add file loading around them.

use crate::config::{CityPipelineConfig, MetroPipelineConfig, RankConfig};
use crate::error::Result;
use crate::export;
use crate::intangible::IntangibleScores;
use crate::merge::{merge_sources, MergeStats};
use crate::metro::{MetroIndex, MetroStats};
use crate::model::{
    AirportRecord, MetroRanking, PinnedCity, PopulationRecord, RawTrafficRow, ReferenceRecord,
};
use crate::rank::{select_with_pinned, RankedCity, Summary};
use crate::score::{ComponentPolicy, ScoreStrategy};
use crate::sources::load_records;
use crate::traits::Scorer;
use std::io::Write;
use std::path::Path;

/// Finished city ranking plus the merge counters behind it.
#[derive(Debug, Clone, Default)]
pub struct CityRanking {
    pub cities: Vec<RankedCity>,
    pub stats: MergeStats,
}

/// Finished metro ranking plus index counters.
#[derive(Debug, Clone, Default)]
pub struct MetroRankingRun {
    pub rankings: Vec<MetroRanking>,
    pub stats: MetroStats,
}

// -----------------------------------------------------------------------------
// CITIES
// -----------------------------------------------------------------------------

/// Raw inputs of the city ranking.
#[derive(Debug, Clone, Default)]
pub struct CityInputs {
    pub population: Vec<PopulationRecord>,
    pub traffic: Vec<RawTrafficRow>,
    pub city_codes: Vec<ReferenceRecord>,
    pub intangible: IntangibleScores,
    pub pinned: Vec<PinnedCity>,
}

impl CityInputs {
    /// Reads every source the configuration names.
    ///
    /// Population tables are concatenated in order. Optional sources that
    /// are not configured stay empty; the built-in intangible list is used
    /// when no replacement is given.
    pub fn load(config: &CityPipelineConfig) -> Result<Self> {
        let mut population = Vec::new();
        for path in &config.population {
            population.extend(load_records::<PopulationRecord>(path)?);
        }

        let traffic = load_records::<RawTrafficRow>(&config.traffic)?;

        let city_codes = match &config.city_codes {
            Some(path) => load_records::<ReferenceRecord>(path)?,
            None => Vec::new(),
        };

        let intangible = match &config.intangible {
            Some(path) => IntangibleScores::load(path)?,
            None => IntangibleScores::builtin().clone(),
        };

        let pinned = match &config.pinned {
            Some(path) => load_records::<PinnedCity>(path)?,
            None => Vec::new(),
        };

        Ok(Self {
            population,
            traffic,
            city_codes,
            intangible,
            pinned,
        })
    }
}

/// Merges, scores and ranks already-loaded city inputs.
pub fn build_city_table(inputs: CityInputs, config: &CityPipelineConfig) -> CityRanking {
    // 1. Merge
    let table = merge_sources(
        inputs.population,
        &inputs.traffic,
        &inputs.city_codes,
        &inputs.intangible,
        &config.rules,
    );

    // 2. Score
    let scorer = config.weights.scorer();
    let mut entities = table.entities;
    for entity in &mut entities {
        entity.score = scorer.score(entity);
    }

    // 3. Rank
    let pinned = inputs.pinned.len();
    let cities = select_with_pinned(inputs.pinned, entities, config.target_size);
    tracing::info!(rows = cities.len(), pinned, "city ranking built");

    CityRanking {
        cities,
        stats: table.stats,
    }
}

pub fn run_city_pipeline(config: &CityPipelineConfig) -> Result<CityRanking> {
    let inputs = CityInputs::load(config)?;
    Ok(build_city_table(inputs, config))
}

// -----------------------------------------------------------------------------
// METROS
// -----------------------------------------------------------------------------

/// Builds the metro index and scores it.
pub fn build_metro_rankings(
    city_codes: Vec<ReferenceRecord>,
    airports: Vec<AirportRecord>,
    policy: &ComponentPolicy,
) -> MetroRankingRun {
    let index = MetroIndex::build(city_codes, airports);
    MetroRankingRun {
        rankings: index.rankings(policy),
        stats: index.stats(),
    }
}

pub fn run_metro_pipeline(config: &MetroPipelineConfig) -> Result<MetroRankingRun> {
    let city_codes = load_records::<ReferenceRecord>(&config.city_codes)?;
    let airports = load_records::<AirportRecord>(&config.airports)?;
    Ok(build_metro_rankings(city_codes, airports, &config.policy))
}

// -----------------------------------------------------------------------------
// DISPATCH
// -----------------------------------------------------------------------------

/// Output of a run under either strategy.
#[derive(Debug, Clone)]
pub enum Ranking {
    Cities(CityRanking),
    Metros(MetroRankingRun),
}

impl Ranking {
    pub fn summary(&self) -> Summary {
        match self {
            Ranking::Cities(r) => Summary::of(&r.cities),
            Ranking::Metros(r) => Summary::of(&r.rankings),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Ranking::Cities(r) => r.cities.len(),
            Ranking::Metros(r) => r.rankings.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        match self {
            Ranking::Cities(r) => export::write_cities(writer, &r.cities),
            Ranking::Metros(r) => export::write_metros(writer, &r.rankings),
        }
    }

    pub fn write_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        match self {
            Ranking::Cities(r) => export::write_cities_to_path(path, &r.cities),
            Ranking::Metros(r) => export::write_metros_to_path(path, &r.rankings),
        }
    }
}

/// Runs the strategy the configuration selects.
pub fn run(config: &RankConfig) -> Result<Ranking> {
    match config.strategy {
        ScoreStrategy::WeightedSum => run_city_pipeline(&config.cities).map(Ranking::Cities),
        ScoreStrategy::Component => run_metro_pipeline(&config.metros).map(Ranking::Metros),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{IntangibleScore, Location, TrafficRecord};

    fn pop(name: &str, code: &str, population: i64) -> PopulationRecord {
        PopulationRecord {
            name: name.into(),
            country: "Land".into(),
            country_code: code.into(),
            population,
            latitude: None,
            longitude: None,
        }
    }

    fn config(target: Option<usize>) -> CityPipelineConfig {
        CityPipelineConfig {
            target_size: target,
            ..CityPipelineConfig::default()
        }
    }

    #[test]
    fn build_city_table_scores_and_orders() {
        let inputs = CityInputs {
            population: vec![pop("Small", "aa", 10), pop("Big", "aa", 1000), pop("Mid", "aa", 100)],
            intangible: IntangibleScores::from_records(vec![IntangibleScore {
                city: "Small".into(),
                country_code: "aa".into(),
                score: 1.0,
                rationale: String::new(),
            }]),
            ..CityInputs::default()
        };
        let ranking = build_city_table(inputs, &config(None));
        let names: Vec<_> = ranking.cities.iter().map(|c| c.city.as_str()).collect();
        assert_eq!(names, vec!["Small", "Big", "Mid"]);
        assert_eq!(ranking.cities[0].final_score, Some(10.0 * 0.3 + 2_000_000.0));
        assert_eq!(ranking.stats.candidates, 3);
    }

    #[test]
    fn pinned_rows_count_toward_target() {
        let inputs = CityInputs {
            population: vec![pop("A", "aa", 3), pop("B", "aa", 2), pop("C", "aa", 1)],
            pinned: vec![PinnedCity {
                city: "B".into(),
                country: "Land".into(),
                country_code: "aa".into(),
                population: 2,
                traffic: TrafficRecord::default(),
                intangible: None,
                final_score: None,
            }],
            ..CityInputs::default()
        };
        let ranking = build_city_table(inputs, &config(Some(2)));
        let names: Vec<_> = ranking.cities.iter().map(|c| c.city.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[test]
    fn metro_rankings_are_built_from_records() {
        let cc = ReferenceRecord {
            code: "PAR".into(),
            name: "Paris".into(),
            country: "FR".into(),
            kind: "CC".into(),
            location: Location {
                latitude: 48.85,
                longitude: 2.35,
            },
        };
        let ap = |code: &str| AirportRecord {
            code: code.into(),
            name: code.into(),
            city_code: Some("PAR".into()),
            country: "FR".into(),
            kind: "AP".into(),
            location: Location::default(),
            elevation: 0.0,
            time_zone: String::new(),
            icao: String::new(),
        };
        let run = build_metro_rankings(vec![cc], vec![ap("CDG"), ap("ORY")], &ComponentPolicy::default());
        assert_eq!(run.stats.metro_areas, 1);
        let ranking = Ranking::Metros(run);
        assert_eq!(ranking.len(), 1);

        let mut buf = Vec::new();
        ranking.write_csv(&mut buf).expect("write");
        let text = String::from_utf8(buf).expect("utf8");
        assert!(text.lines().nth(1).is_some_and(|l| l.starts_with("PAR,Paris,FR,CDG/ORY,2,")));
    }
}
