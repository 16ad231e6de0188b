// crates/metrorank-core/src/merge.rs

//! # Record Merger
//!
//! Reconciles population, traffic and intangible records under a shared
//! [`CanonicalKey`]. The merge is the only writer of the entity table; once
//! built, scoring and export only read it.
//!
//! Precedence rules:
//! - population: the largest figure seen for a key wins;
//! - traffic: override table first, then a direct country code, then the
//!   city-code reference table; unresolved rows are dropped;
//! - supplementary traffic figures are seeded first and lose to the file;
//! - intangible: looked up by key, `0.0` when absent.

use crate::intangible::IntangibleScores;
use crate::model::{
    MergedCityEntity, MetroArea, PopulationRecord, RawTrafficRow, ReferenceRecord, TrafficRecord,
};
use crate::text::{canonical_key, CanonicalKey};
use crate::traits::NameMatch;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// -----------------------------------------------------------------------------
// RULE TABLES
// -----------------------------------------------------------------------------

/// Correction for a traffic row that the generic lookup gets wrong.
///
/// A row matches when its folded name contains `pattern`. The row is then
/// credited to `city` (or its own name when unset) in `iso2`, each metric
/// scaled by its weight and rounded to the nearest integer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficOverride {
    pub pattern: String,
    #[serde(default)]
    pub city: Option<String>,
    pub iso2: String,
    #[serde(default = "unit_weight")]
    pub total_weight: f64,
    #[serde(default = "unit_weight")]
    pub international_weight: f64,
    #[serde(default = "unit_weight")]
    pub cargo_weight: f64,
}

fn unit_weight() -> f64 {
    1.0
}

impl TrafficOverride {
    pub fn new(pattern: &str, city: &str, iso2: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            city: Some(city.to_string()),
            iso2: iso2.to_string(),
            total_weight: 1.0,
            international_weight: 1.0,
            cargo_weight: 1.0,
        }
    }

    pub fn with_weights(mut self, total: f64, international: f64, cargo: f64) -> Self {
        self.total_weight = total;
        self.international_weight = international;
        self.cargo_weight = cargo;
        self
    }

    fn key_for(&self, row: &RawTrafficRow) -> CanonicalKey {
        let name = self.city.as_deref().unwrap_or(&row.name);
        canonical_key(name, &self.iso2)
    }

    fn adjust(&self, raw: TrafficRecord) -> TrafficRecord {
        let scale = |v: i64, w: f64| (v as f64 * w).round() as i64;
        TrafficRecord {
            total_passengers: scale(raw.total_passengers, self.total_weight),
            international_passengers: scale(raw.international_passengers, self.international_weight),
            cargo_traffic: scale(raw.cargo_traffic, self.cargo_weight),
        }
    }
}

/// Hardcoded figures for a city the traffic file is known to miss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplementaryTraffic {
    pub city: String,
    pub iso2: String,
    #[serde(flatten)]
    pub traffic: TrafficRecord,
}

/// Override and supplementary tables used while resolving traffic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeRules {
    pub overrides: Vec<TrafficOverride>,
    pub supplementary: Vec<SupplementaryTraffic>,
}

impl Default for MergeRules {
    /// Major hubs whose traffic rows are labelled by airport rather than by
    /// city, mapped to the city name used by the population tables.
    ///
    /// The stock overrides only rename: every weight is 1.0, so figures pass
    /// through unchanged. The supplementary table is empty. Corrections and
    /// extra figures come from the configuration file.
    fn default() -> Self {
        let overrides = [
            ("london", "London", "gb"),
            ("new york", "New York", "us"),
            ("tokyo", "Tokyo", "jp"),
            ("paris", "Paris", "fr"),
            ("dubai", "Dubai", "ae"),
            ("hong kong", "Hong Kong", "hk"),
            ("istanbul", "Istanbul", "tr"),
            ("singapore", "Singapore", "sg"),
            ("madrid", "Madrid", "es"),
            ("rome", "Rome", "it"),
            ("frankfurt", "Frankfurt", "de"),
        ]
        .iter()
        .map(|(p, c, i)| TrafficOverride::new(p, c, i))
        .collect();

        Self {
            overrides,
            supplementary: Vec::new(),
        }
    }
}

// -----------------------------------------------------------------------------
// ORDERED TABLE
// -----------------------------------------------------------------------------

/// Map that remembers the order in which keys were first inserted.
///
/// Overwriting a key keeps its original position.
#[derive(Debug, Clone)]
pub struct KeyedTable<T> {
    order: Vec<CanonicalKey>,
    values: HashMap<CanonicalKey, T>,
}

impl<T> Default for KeyedTable<T> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            values: HashMap::new(),
        }
    }
}

impl<T> KeyedTable<T> {
    pub fn insert(&mut self, key: CanonicalKey, value: T) {
        if !self.values.contains_key(&key) {
            self.order.push(key.clone());
        }
        self.values.insert(key, value);
    }

    pub fn get(&self, key: &CanonicalKey) -> Option<&T> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &CanonicalKey) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &CanonicalKey> {
        self.order.iter()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CanonicalKey, &T)> {
        self.order
            .iter()
            .filter_map(move |k| self.values.get(k).map(|v| (k, v)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

// -----------------------------------------------------------------------------
// STATISTICS
// -----------------------------------------------------------------------------

/// Counters collected while merging, for the run report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeStats {
    pub population_rows: usize,
    pub population_keys: usize,
    pub traffic_rows: usize,
    pub traffic_supplementary: usize,
    pub traffic_override: usize,
    pub traffic_direct: usize,
    pub traffic_indirect: usize,
    pub traffic_dropped: usize,
    pub candidates: usize,
    pub dropped_incomplete: usize,
}

// -----------------------------------------------------------------------------
// POPULATION
// -----------------------------------------------------------------------------

/// Max-merges population records by key.
pub fn merge_population(
    records: impl IntoIterator<Item = PopulationRecord>,
    stats: &mut MergeStats,
) -> KeyedTable<PopulationRecord> {
    let mut table: KeyedTable<PopulationRecord> = KeyedTable::default();

    for record in records {
        stats.population_rows += 1;
        let key = canonical_key(&record.name, &record.country_code);
        if key.is_empty() {
            continue;
        }
        let replace = match table.get(&key) {
            Some(existing) => record.population > existing.population,
            None => true,
        };
        if replace {
            table.insert(key, record);
        }
    }

    stats.population_keys = table.len();
    table
}

// -----------------------------------------------------------------------------
// TRAFFIC
// -----------------------------------------------------------------------------

/// How a traffic row found its city.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrafficMatch {
    Override,
    Direct,
    Indirect,
}

/// Indexes the city-code reference table by code. Later rows win.
pub fn index_city_codes(records: &[ReferenceRecord]) -> HashMap<String, ReferenceRecord> {
    records
        .iter()
        .map(|r| (r.code.clone(), r.clone()))
        .collect()
}

/// Works out the key and figures a traffic row should be credited with.
pub fn resolve_traffic_row(
    row: &RawTrafficRow,
    city_codes: &HashMap<String, ReferenceRecord>,
    rules: &MergeRules,
) -> Option<(CanonicalKey, TrafficRecord, TrafficMatch)> {
    // 1. Override table. A hit never falls through to the code lookup.
    if let Some(ov) = rules.overrides.iter().find(|o| row.name_contains(&o.pattern)) {
        let key = ov.key_for(row);
        if key.is_empty() {
            return None;
        }
        return Some((key, ov.adjust(row.traffic), TrafficMatch::Override));
    }

    // 2. Direct: the row names its own country.
    if let Some(code) = row.country_code.as_deref() {
        let key = canonical_key(&row.name, code);
        if !key.is_empty() {
            return Some((key, row.traffic, TrafficMatch::Direct));
        }
    }

    // 3. Indirect: resolve the IATA city code through the reference table.
    let reference = row.city_code.as_deref().and_then(|c| city_codes.get(c))?;
    let key = canonical_key(&reference.name, &reference.country);
    if key.is_empty() {
        return None;
    }
    Some((key, row.traffic, TrafficMatch::Indirect))
}

/// Builds the traffic table: supplementary figures first, then the file.
pub fn merge_traffic(
    rows: &[RawTrafficRow],
    city_codes: &HashMap<String, ReferenceRecord>,
    rules: &MergeRules,
    stats: &mut MergeStats,
) -> KeyedTable<TrafficRecord> {
    let mut table: KeyedTable<TrafficRecord> = KeyedTable::default();

    for extra in &rules.supplementary {
        let key = canonical_key(&extra.city, &extra.iso2);
        if !key.is_empty() {
            table.insert(key, extra.traffic);
            stats.traffic_supplementary += 1;
        }
    }

    for row in rows {
        stats.traffic_rows += 1;
        match resolve_traffic_row(row, city_codes, rules) {
            Some((key, traffic, how)) => {
                match how {
                    TrafficMatch::Override => stats.traffic_override += 1,
                    TrafficMatch::Direct => stats.traffic_direct += 1,
                    TrafficMatch::Indirect => stats.traffic_indirect += 1,
                }
                table.insert(key, traffic);
            }
            None => {
                stats.traffic_dropped += 1;
                tracing::debug!(name = %row.name, code = ?row.city_code, "traffic row matched no city");
            }
        }
    }

    table
}

// -----------------------------------------------------------------------------
// ENTITIES
// -----------------------------------------------------------------------------

/// The reconciled entity table plus merge counters.
#[derive(Debug, Clone, Default)]
pub struct MergedTable {
    pub entities: Vec<MergedCityEntity>,
    pub stats: MergeStats,
}

impl MergedTable {
    pub fn get(&self, key: &CanonicalKey) -> Option<&MergedCityEntity> {
        self.entities.iter().find(|e| &e.key == key)
    }

    /// Accent- and case-insensitive substring search on entity names.
    pub fn find_by_name(&self, query: &str) -> Vec<&MergedCityEntity> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        self.entities
            .iter()
            .filter(|e| e.name_contains(query))
            .collect()
    }
}

/// Joins population, traffic and intangible data into unscored entities.
///
/// Keys are visited population-first, then traffic-only keys; an entity
/// with no population entry has no name or country and is dropped.
pub fn merge_entities(
    population: &KeyedTable<PopulationRecord>,
    traffic: &KeyedTable<TrafficRecord>,
    intangible: &IntangibleScores,
    stats: &mut MergeStats,
) -> Vec<MergedCityEntity> {
    let traffic_only = traffic.keys().filter(|k| !population.contains_key(k));
    let all_keys: Vec<&CanonicalKey> = population.keys().chain(traffic_only).collect();

    let mut entities = Vec::with_capacity(all_keys.len());
    for key in all_keys {
        let complete = population
            .get(key)
            .filter(|p| !p.name.is_empty() && !p.country.is_empty());
        let Some(pop) = complete else {
            stats.dropped_incomplete += 1;
            continue;
        };

        entities.push(MergedCityEntity {
            key: key.clone(),
            name: pop.name.clone(),
            country: pop.country.clone(),
            country_code: pop.country_code.clone(),
            population: pop.population,
            traffic: traffic.get(key).copied().unwrap_or_default(),
            intangible: intangible.score_for(key),
            score: 0.0,
        });
    }

    stats.candidates = entities.len();
    entities
}

/// Runs the full merge over already-loaded sources.
pub fn merge_sources(
    population: Vec<PopulationRecord>,
    traffic_rows: &[RawTrafficRow],
    city_codes: &[ReferenceRecord],
    intangible: &IntangibleScores,
    rules: &MergeRules,
) -> MergedTable {
    let mut stats = MergeStats::default();
    let population = merge_population(population, &mut stats);
    let code_index = index_city_codes(city_codes);
    let traffic = merge_traffic(traffic_rows, &code_index, rules, &mut stats);
    let entities = merge_entities(&population, &traffic, intangible, &mut stats);

    tracing::info!(
        candidates = stats.candidates,
        dropped = stats.dropped_incomplete,
        traffic_dropped = stats.traffic_dropped,
        "merge complete"
    );
    MergedTable { entities, stats }
}

// -----------------------------------------------------------------------------
// NAME MATCHING
// -----------------------------------------------------------------------------

impl NameMatch for MergedCityEntity {
    fn name_str(&self) -> &str {
        &self.name
    }
}

impl NameMatch for PopulationRecord {
    fn name_str(&self) -> &str {
        &self.name
    }
}

impl NameMatch for RawTrafficRow {
    fn name_str(&self) -> &str {
        &self.name
    }
}

impl NameMatch for MetroArea {
    fn name_str(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{IntangibleScore, Location};

    fn pop(name: &str, code: &str, population: i64) -> PopulationRecord {
        PopulationRecord {
            name: name.into(),
            country: "Country".into(),
            country_code: code.into(),
            population,
            latitude: None,
            longitude: None,
        }
    }

    fn traffic_row(name: &str, city_code: Option<&str>, total: i64) -> RawTrafficRow {
        RawTrafficRow {
            name: name.into(),
            city_code: city_code.map(str::to_string),
            country_code: None,
            traffic: TrafficRecord {
                total_passengers: total,
                international_passengers: total / 2,
                cargo_traffic: total / 10,
            },
        }
    }

    fn reference(code: &str, name: &str, country: &str) -> ReferenceRecord {
        ReferenceRecord {
            code: code.into(),
            name: name.into(),
            country: country.into(),
            kind: "CC".into(),
            location: Location::default(),
        }
    }

    #[test]
    fn population_keeps_max_regardless_of_order() {
        for records in [
            vec![pop("Lagos", "ng", 100), pop("LAGOS", "ng", 250)],
            vec![pop("LAGOS", "ng", 250), pop("Lagos", "ng", 100)],
        ] {
            let mut stats = MergeStats::default();
            let table = merge_population(records, &mut stats);
            assert_eq!(table.len(), 1);
            let key = canonical_key("Lagos", "ng");
            assert_eq!(table.get(&key).map(|p| p.population), Some(250));
            assert_eq!(stats.population_rows, 2);
        }
    }

    #[test]
    fn override_scales_and_skips_indirect_lookup() {
        let rules = MergeRules {
            overrides: vec![TrafficOverride::new("london", "London", "gb").with_weights(0.5, 0.5, 0.5)],
            supplementary: Vec::new(),
        };
        // The code would resolve to a different city if the lookup ran.
        let codes = index_city_codes(&[reference("LON", "Londonderry", "gb")]);
        let row = traffic_row("London Heathrow", Some("LON"), 1000);

        let (key, traffic, how) = resolve_traffic_row(&row, &codes, &rules).expect("match");
        assert_eq!(how, TrafficMatch::Override);
        assert_eq!(key, canonical_key("London", "gb"));
        assert_eq!(traffic.total_passengers, 500);
        assert_eq!(traffic.international_passengers, 250);
        assert_eq!(traffic.cargo_traffic, 50);

        let mut stats = MergeStats::default();
        let table = merge_traffic(&[row], &codes, &rules, &mut stats);
        assert_eq!(table.len(), 1);
        assert!(!table.contains_key(&canonical_key("Londonderry", "gb")));
        assert_eq!(stats.traffic_override, 1);
        assert_eq!(stats.traffic_indirect, 0);
    }

    #[test]
    fn override_rounds_to_nearest() {
        let ov = TrafficOverride::new("x", "X", "xx").with_weights(0.333, 1.5, 0.0);
        let adjusted = ov.adjust(TrafficRecord {
            total_passengers: 1000,
            international_passengers: 3,
            cargo_traffic: 99,
        });
        assert_eq!(adjusted.total_passengers, 333);
        assert_eq!(adjusted.international_passengers, 5);
        assert_eq!(adjusted.cargo_traffic, 0);
    }

    #[test]
    fn stock_rules_rename_hubs_without_scaling() {
        let rules = MergeRules::default();
        assert!(rules.supplementary.is_empty());
        assert!(rules.overrides.iter().all(|o| {
            o.total_weight == 1.0 && o.international_weight == 1.0 && o.cargo_weight == 1.0
        }));

        let row = traffic_row("Tokyo Haneda", None, 78_719_302);
        let (key, traffic, how) =
            resolve_traffic_row(&row, &HashMap::new(), &rules).expect("tokyo override");
        assert_eq!(how, TrafficMatch::Override);
        assert_eq!(key, canonical_key("Tokyo", "jp"));
        assert_eq!(traffic, row.traffic);
    }

    #[test]
    fn direct_country_code_beats_code_lookup() {
        let rules = MergeRules {
            overrides: Vec::new(),
            supplementary: Vec::new(),
        };
        let codes = index_city_codes(&[reference("OSA", "Osaka", "jp")]);
        let mut row = traffic_row("Kansai", Some("OSA"), 10);
        row.country_code = Some("jp".into());
        let (key, _, how) = resolve_traffic_row(&row, &codes, &rules).expect("match");
        assert_eq!(how, TrafficMatch::Direct);
        assert_eq!(key, canonical_key("Kansai", "jp"));
    }

    #[test]
    fn unresolvable_row_is_dropped() {
        let rules = MergeRules {
            overrides: Vec::new(),
            supplementary: Vec::new(),
        };
        let mut stats = MergeStats::default();
        let table = merge_traffic(
            &[traffic_row("Nowhere", Some("ZZZ"), 5), traffic_row("Nocode", None, 5)],
            &HashMap::new(),
            &rules,
            &mut stats,
        );
        assert!(table.is_empty());
        assert_eq!(stats.traffic_dropped, 2);
    }

    #[test]
    fn file_rows_overwrite_supplementary_figures() {
        let rules = MergeRules {
            overrides: Vec::new(),
            supplementary: vec![
                SupplementaryTraffic {
                    city: "Osaka".into(),
                    iso2: "jp".into(),
                    traffic: TrafficRecord {
                        total_passengers: 1,
                        international_passengers: 1,
                        cargo_traffic: 1,
                    },
                },
                SupplementaryTraffic {
                    city: "Lahore".into(),
                    iso2: "pk".into(),
                    traffic: TrafficRecord {
                        total_passengers: 7,
                        international_passengers: 3,
                        cargo_traffic: 0,
                    },
                },
            ],
        };
        let codes = index_city_codes(&[reference("OSA", "Osaka", "jp")]);
        let mut stats = MergeStats::default();
        let table = merge_traffic(&[traffic_row("Kansai", Some("OSA"), 100)], &codes, &rules, &mut stats);

        let osaka = table.get(&canonical_key("Osaka", "jp")).expect("osaka");
        assert_eq!(osaka.total_passengers, 100);
        let lahore = table.get(&canonical_key("Lahore", "pk")).expect("lahore");
        assert_eq!(lahore.total_passengers, 7);
        // Overwriting keeps the first-seen position.
        let keys: Vec<_> = table.keys().map(|k| k.as_str().to_string()).collect();
        assert_eq!(keys, vec!["osakajp", "lahorepk"]);
    }

    #[test]
    fn entities_without_population_are_dropped() {
        let rules = MergeRules::default();
        let intangible = IntangibleScores::from_records(vec![IntangibleScore {
            city: "Nairobi".into(),
            country_code: "KE".into(),
            score: 6.9,
            rationale: String::new(),
        }]);
        let mut nameless = pop("Mombasa", "ke", 1_200_000);
        nameless.country = String::new();

        let table = merge_sources(
            vec![pop("Nairobi", "ke", 4_400_000), nameless],
            &[RawTrafficRow {
                country_code: Some("ke".into()),
                ..traffic_row("Kisumu", None, 10)
            }],
            &[],
            &intangible,
            &rules,
        );

        assert_eq!(table.entities.len(), 1);
        let nairobi = &table.entities[0];
        assert_eq!(nairobi.name, "Nairobi");
        assert_eq!(nairobi.intangible, 6.9);
        assert_eq!(nairobi.traffic, TrafficRecord::default());
        assert_eq!(table.stats.dropped_incomplete, 2);
        assert_eq!(table.find_by_name("nairo").len(), 1);
        assert!(table.find_by_name("  ").is_empty());
    }
}
