// crates/metrorank-core/src/score.rs

//! # Score Calculator
//!
//! Two strategies share the pipeline:
//!
//! - [`WeightedSumPolicy`] scores merged city entities from raw counts.
//! - [`ComponentPolicy`] scores metro areas from their airport systems.
//!
//! Both are plain configuration values. Summation order follows the
//! documented formulas so results are bit-for-bit reproducible.

use crate::model::{MergedCityEntity, MetroArea, ScoreComponents};
use crate::text::{canonical_key, CanonicalKey};
use crate::traits::Scorer;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Which strategy a pipeline run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScoreStrategy {
    /// City ranking from population, traffic and intangible scores.
    #[default]
    WeightedSum,
    /// Metro-area ranking from airport systems.
    Component,
}

// -----------------------------------------------------------------------------
// WEIGHTED SUM
// -----------------------------------------------------------------------------

/// A city identified by display name and ISO2 code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityRef {
    pub city: String,
    pub iso2: String,
}

impl CityRef {
    pub fn new(city: &str, iso2: &str) -> Self {
        Self {
            city: city.to_string(),
            iso2: iso2.to_string(),
        }
    }

    pub fn key(&self) -> CanonicalKey {
        canonical_key(&self.city, &self.iso2)
    }
}

/// Post-multiplier applied to a listed city's weighted sum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportanceMultiplier {
    pub city: String,
    pub iso2: String,
    pub multiplier: f64,
}

/// Weights for the weighted-sum strategy.
///
/// `score = population*w_pop + total*w_total + international*w_intl
///        + cargo*w_cargo + intangible*w_intangible [+ capital_bonus]`,
/// then multiplied by the city's importance multiplier (1.0 if unlisted).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightedSumPolicy {
    pub population: f64,
    pub total_passengers: f64,
    pub international_passengers: f64,
    pub cargo_traffic: f64,
    pub intangible: f64,
    pub capital_bonus: f64,
    pub capitals: Vec<CityRef>,
    pub importance: Vec<ImportanceMultiplier>,
}

impl Default for WeightedSumPolicy {
    fn default() -> Self {
        Self::master()
    }
}

impl WeightedSumPolicy {
    /// Weights of the master city list: no capital bonus, no multipliers.
    pub fn master() -> Self {
        Self {
            population: 0.3,
            total_passengers: 0.2,
            international_passengers: 0.2,
            cargo_traffic: 10.0,
            intangible: 2_000_000.0,
            capital_bonus: 0.0,
            capitals: Vec::new(),
            importance: Vec::new(),
        }
    }

    /// Master weights plus a political-capital bonus and a small
    /// global-importance table for the handful of alpha cities.
    pub fn global() -> Self {
        let capitals = [
            ("Washington", "us"),
            ("London", "gb"),
            ("Paris", "fr"),
            ("Tokyo", "jp"),
            ("Beijing", "cn"),
            ("Berlin", "de"),
            ("Moscow", "ru"),
            ("Brussels", "be"),
            ("New Delhi", "in"),
        ]
        .iter()
        .map(|(c, i)| CityRef::new(c, i))
        .collect();

        let importance = [
            ("London", "gb", 1.25),
            ("New York", "us", 1.25),
            ("Paris", "fr", 1.15),
            ("Tokyo", "jp", 1.15),
            ("Singapore", "sg", 1.1),
            ("Hong Kong", "hk", 1.1),
        ]
        .iter()
        .map(|(c, i, m)| ImportanceMultiplier {
            city: c.to_string(),
            iso2: i.to_string(),
            multiplier: *m,
        })
        .collect();

        Self {
            capital_bonus: 5_000_000.0,
            capitals,
            importance,
            ..Self::master()
        }
    }

    /// Looks up a named preset (`master`, `global`).
    pub fn preset(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "master" => Some(Self::master()),
            "global" => Some(Self::global()),
            _ => None,
        }
    }

    /// Indexes the capital and multiplier tables by key.
    pub fn scorer(&self) -> WeightedSumScorer<'_> {
        WeightedSumScorer {
            policy: self,
            capitals: self.capitals.iter().map(CityRef::key).collect(),
            multipliers: self
                .importance
                .iter()
                .map(|m| (canonical_key(&m.city, &m.iso2), m.multiplier))
                .collect(),
        }
    }
}

/// [`WeightedSumPolicy`] with its lookup tables keyed for fast access.
#[derive(Debug, Clone)]
pub struct WeightedSumScorer<'a> {
    policy: &'a WeightedSumPolicy,
    capitals: HashSet<CanonicalKey>,
    multipliers: HashMap<CanonicalKey, f64>,
}

impl WeightedSumScorer<'_> {
    pub fn multiplier_for(&self, key: &CanonicalKey) -> f64 {
        self.multipliers.get(key).copied().unwrap_or(1.0)
    }

    pub fn is_capital(&self, key: &CanonicalKey) -> bool {
        self.capitals.contains(key)
    }
}

impl Scorer<MergedCityEntity> for WeightedSumScorer<'_> {
    fn score(&self, e: &MergedCityEntity) -> f64 {
        let w = self.policy;
        let mut score = e.population as f64 * w.population
            + e.traffic.total_passengers as f64 * w.total_passengers
            + e.traffic.international_passengers as f64 * w.international_passengers
            + e.traffic.cargo_traffic as f64 * w.cargo_traffic
            + e.intangible * w.intangible;

        if self.is_capital(&e.key) {
            score += w.capital_bonus;
        }

        score * self.multiplier_for(&e.key)
    }
}

// -----------------------------------------------------------------------------
// COMPONENT SCORE
// -----------------------------------------------------------------------------

/// Sub-score weights for the component strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentWeights {
    pub aviation: f64,
    pub economic: f64,
    pub connectivity: f64,
}

impl Default for ComponentWeights {
    fn default() -> Self {
        Self {
            aviation: 0.4,
            economic: 0.3,
            connectivity: 0.3,
        }
    }
}

/// An open latitude/longitude box (bounds exclusive).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionBox {
    pub name: String,
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl RegionBox {
    fn new(name: &str, min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Self {
        Self {
            name: name.to_string(),
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        }
    }

    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        latitude > self.min_lat
            && latitude < self.max_lat
            && longitude > self.min_lon
            && longitude < self.max_lon
    }
}

/// Parameters of the component strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentPolicy {
    pub weights: ComponentWeights,
    /// Airport type tag treated as "has international routes".
    pub primary_airport_type: String,
    pub regions: Vec<RegionBox>,
    pub region_bonus: f64,
    pub other_region_bonus: f64,
}

impl Default for ComponentPolicy {
    fn default() -> Self {
        Self {
            weights: ComponentWeights::default(),
            primary_airport_type: "AP".to_string(),
            regions: vec![
                RegionBox::new("Europe", 35.0, 60.0, -10.0, 40.0),
                RegionBox::new("North America", 25.0, 50.0, -130.0, -60.0),
                RegionBox::new("East Asia", 20.0, 45.0, 100.0, 145.0),
            ],
            region_bonus: 30.0,
            other_region_bonus: 15.0,
        }
    }
}

const SCORE_CAP: f64 = 100.0;
const CONNECTIVITY_AIRPORT_CAP: f64 = 50.0;
const ECONOMIC_BASE: f64 = 50.0;

/// A metro area together with the type tags of its airports.
///
/// `None` marks an airport code that has no record in the airports table.
#[derive(Debug, Clone)]
pub struct MetroProfile<'a> {
    pub metro: &'a MetroArea,
    pub airport_kinds: Vec<Option<&'a str>>,
}

impl MetroProfile<'_> {
    fn airport_count(&self) -> f64 {
        self.metro.airports.len() as f64
    }
}

impl ComponentPolicy {
    /// `min(100, min(100, n*25) + intl*10 + 5*distinct_types)`.
    pub fn aviation(&self, profile: &MetroProfile<'_>) -> f64 {
        let base = (profile.airport_count() * 25.0).min(SCORE_CAP);
        let international = profile
            .airport_kinds
            .iter()
            .filter(|k| **k == Some(self.primary_airport_type.as_str()))
            .count() as f64;
        let distinct: HashSet<Option<&str>> = profile.airport_kinds.iter().copied().collect();
        let diversity = distinct.len() as f64 * 5.0;

        (base + international * 10.0 + diversity).min(SCORE_CAP)
    }

    /// Stand-in for real economic indicators: `min(100, 50 + n*10)`.
    pub fn economic(&self, profile: &MetroProfile<'_>) -> f64 {
        (ECONOMIC_BASE + profile.airport_count() * 10.0).min(SCORE_CAP)
    }

    /// `min(100, min(50, n*10) + region_bonus)`.
    pub fn connectivity(&self, profile: &MetroProfile<'_>) -> f64 {
        let airports = (profile.airport_count() * 10.0).min(CONNECTIVITY_AIRPORT_CAP);
        let location = profile.metro.location;
        (airports + self.location_bonus(location.latitude, location.longitude)).min(SCORE_CAP)
    }

    pub fn location_bonus(&self, latitude: f64, longitude: f64) -> f64 {
        if self.regions.iter().any(|r| r.contains(latitude, longitude)) {
            self.region_bonus
        } else {
            self.other_region_bonus
        }
    }

    pub fn components(&self, profile: &MetroProfile<'_>) -> ScoreComponents {
        ScoreComponents {
            aviation: self.aviation(profile),
            economic: self.economic(profile),
            connectivity: self.connectivity(profile),
        }
    }

    /// Weighted total, accumulated aviation, economic, connectivity.
    pub fn total(&self, c: &ScoreComponents) -> f64 {
        let w = self.weights;
        let mut total = 0.0;
        total += c.aviation * w.aviation;
        total += c.economic * w.economic;
        total += c.connectivity * w.connectivity;
        total
    }
}

impl Scorer<MetroProfile<'_>> for ComponentPolicy {
    fn score(&self, profile: &MetroProfile<'_>) -> f64 {
        self.total(&self.components(profile))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Location, MetroMetrics, TrafficRecord};

    fn entity(name: &str, iso2: &str, population: i64, intangible: f64) -> MergedCityEntity {
        MergedCityEntity {
            key: canonical_key(name, iso2),
            name: name.into(),
            country: "Somewhere".into(),
            country_code: iso2.into(),
            population,
            traffic: TrafficRecord::default(),
            intangible,
            score: 0.0,
        }
    }

    fn metro(n: usize, lat: f64, lon: f64) -> MetroArea {
        MetroArea {
            code: "XXX".into(),
            name: "Test".into(),
            country: "ZZ".into(),
            location: Location {
                latitude: lat,
                longitude: lon,
            },
            airports: (0..n).map(|i| format!("A{i:02}")).collect(),
            metrics: MetroMetrics::default(),
        }
    }

    #[test]
    fn master_weights_reproduce_documented_score() {
        let policy = WeightedSumPolicy::master();
        let e = entity("Testville", "tv", 1_000_000, 5.0);
        assert_eq!(policy.scorer().score(&e), 10_300_000.0);
    }

    #[test]
    fn traffic_terms_are_weighted() {
        let policy = WeightedSumPolicy::master();
        let mut e = entity("Hub", "hb", 0, 0.0);
        e.traffic = TrafficRecord {
            total_passengers: 1000,
            international_passengers: 500,
            cargo_traffic: 3,
        };
        assert_eq!(policy.scorer().score(&e), 1000.0 * 0.2 + 500.0 * 0.2 + 30.0);
    }

    #[test]
    fn capital_bonus_and_multiplier_apply_in_order() {
        let policy = WeightedSumPolicy {
            capital_bonus: 100.0,
            capitals: vec![CityRef::new("Capitol", "CP")],
            importance: vec![ImportanceMultiplier {
                city: "Capitol".into(),
                iso2: "cp".into(),
                multiplier: 2.0,
            }],
            population: 1.0,
            ..WeightedSumPolicy::master()
        };
        let scorer = policy.scorer();
        let capital = entity("Capitol", "cp", 50, 0.0);
        assert_eq!(scorer.score(&capital), (50.0 + 100.0) * 2.0);

        let other = entity("Elsewhere", "cp", 50, 0.0);
        assert_eq!(scorer.score(&other), 50.0);
    }

    #[test]
    fn presets_resolve_by_name() {
        assert_eq!(WeightedSumPolicy::preset("MASTER"), Some(WeightedSumPolicy::master()));
        assert!(WeightedSumPolicy::preset("global").is_some());
        assert!(WeightedSumPolicy::preset("bogus").is_none());
    }

    #[test]
    fn aviation_is_capped_at_100() {
        let policy = ComponentPolicy::default();
        let m = metro(10, 0.0, 0.0);
        let profile = MetroProfile {
            metro: &m,
            airport_kinds: vec![Some("AP"); 10],
        };
        assert_eq!(policy.aviation(&profile), 100.0);
    }

    #[test]
    fn single_airport_components() {
        let policy = ComponentPolicy::default();
        // London-ish coordinates: inside the Europe box.
        let m = metro(1, 51.5, -0.12);
        let profile = MetroProfile {
            metro: &m,
            airport_kinds: vec![Some("AP")],
        };
        let c = policy.components(&profile);
        assert_eq!(c.aviation, 25.0 + 10.0 + 5.0);
        assert_eq!(c.economic, 60.0);
        assert_eq!(c.connectivity, 10.0 + 30.0);
        assert_eq!(policy.total(&c), 0.0 + 40.0 * 0.4 + 60.0 * 0.3 + 40.0 * 0.3);
        assert_eq!(policy.score(&profile), policy.total(&c));
    }

    #[test]
    fn diversity_counts_distinct_types_including_unknown() {
        let policy = ComponentPolicy::default();
        let m = metro(3, -30.0, 150.0);
        let profile = MetroProfile {
            metro: &m,
            airport_kinds: vec![Some("AP"), Some("HP"), None],
        };
        // base 75 + 1 international * 10 + 3 distinct * 5 = 100
        assert_eq!(policy.aviation(&profile), 100.0);
        // outside every region box
        assert_eq!(policy.connectivity(&profile), 30.0 + 15.0);
    }

    #[test]
    fn region_bounds_are_exclusive() {
        let policy = ComponentPolicy::default();
        assert_eq!(policy.location_bonus(35.0, 10.0), 15.0);
        assert_eq!(policy.location_bonus(35.1, 10.0), 30.0);
        assert_eq!(policy.location_bonus(40.7, -74.0), 30.0);
        assert_eq!(policy.location_bonus(35.7, 139.7), 30.0);
        assert_eq!(policy.location_bonus(-33.9, 151.2), 15.0);
    }

    #[test]
    fn economic_saturates() {
        let policy = ComponentPolicy::default();
        let m = metro(7, 0.0, 0.0);
        let profile = MetroProfile {
            metro: &m,
            airport_kinds: vec![Some("AP"); 7],
        };
        assert_eq!(policy.economic(&profile), 100.0);
        assert_eq!(policy.connectivity(&profile), 50.0 + 15.0);
    }
}
