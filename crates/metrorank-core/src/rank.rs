// crates/metrorank-core/src/rank.rs

//! # Ranker
//!
//! Ordering, pinned-set handling, truncation and summary statistics.

use crate::model::{MergedCityEntity, MetroRanking, PinnedCity, TrafficRecord};
use crate::text::{canonical_key, CanonicalKey};
use crate::traits::{NameMatch, Ranked};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

/// Stable sort, best score first. Rows without a score go last.
///
/// Equal scores keep their input order.
pub fn sort_by_score_desc<T: Ranked>(items: &mut [T]) {
    items.sort_by(|a, b| compare_desc(a.rank_score(), b.rank_score()));
}

fn compare_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// A row of the city ranking, either pinned or scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCity {
    pub city: String,
    pub country: String,
    /// Lower-cased ISO2 code.
    pub iso2: String,
    pub population: i64,
    pub traffic: TrafficRecord,
    pub intangible: Option<f64>,
    pub final_score: Option<f64>,
    pub pinned: bool,
}

impl From<PinnedCity> for RankedCity {
    fn from(p: PinnedCity) -> Self {
        Self {
            city: p.city,
            country: p.country,
            iso2: p.country_code,
            population: p.population,
            traffic: p.traffic,
            intangible: p.intangible,
            final_score: p.final_score,
            pinned: true,
        }
    }
}

impl From<MergedCityEntity> for RankedCity {
    fn from(e: MergedCityEntity) -> Self {
        Self {
            city: e.name,
            country: e.country,
            iso2: e.country_code,
            population: e.population,
            traffic: e.traffic,
            intangible: Some(e.intangible),
            final_score: Some(e.score),
            pinned: false,
        }
    }
}

impl Ranked for RankedCity {
    fn rank_score(&self) -> Option<f64> {
        self.final_score
    }

    fn country_label(&self) -> &str {
        &self.country
    }
}

impl NameMatch for RankedCity {
    fn name_str(&self) -> &str {
        &self.city
    }
}

impl Ranked for MergedCityEntity {
    fn rank_score(&self) -> Option<f64> {
        Some(self.score)
    }

    fn country_label(&self) -> &str {
        &self.country
    }
}

impl Ranked for MetroRanking {
    fn rank_score(&self) -> Option<f64> {
        Some(self.total_score)
    }

    fn country_label(&self) -> &str {
        &self.country
    }
}

/// Builds the final city list.
///
/// Pinned rows come first, verbatim and in file order. Candidates sharing a
/// key with a pinned row are removed, the rest are ranked and cut so the
/// whole list holds at most `target_size` rows (`None` keeps everything).
pub fn select_with_pinned(
    pinned: Vec<PinnedCity>,
    candidates: Vec<MergedCityEntity>,
    target_size: Option<usize>,
) -> Vec<RankedCity> {
    let pinned_keys: HashSet<CanonicalKey> = pinned
        .iter()
        .map(|p| canonical_key(&p.city, &p.country_code))
        .collect();

    let mut pool: Vec<MergedCityEntity> = candidates
        .into_iter()
        .filter(|c| !pinned_keys.contains(&c.key))
        .collect();
    sort_by_score_desc(&mut pool);

    if let Some(target) = target_size {
        pool.truncate(target.saturating_sub(pinned.len()));
    }

    pinned
        .into_iter()
        .map(RankedCity::from)
        .chain(pool.into_iter().map(RankedCity::from))
        .collect()
}

// -----------------------------------------------------------------------------
// SUMMARY
// -----------------------------------------------------------------------------

/// Mean, minimum and maximum of the scores in a list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreStats {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

/// Aggregate view of a finished ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub entries: usize,
    /// `None` when no entry carries a score.
    pub scores: Option<ScoreStats>,
    /// Entries per country, most first; ties keep first-seen order.
    pub by_country: Vec<(String, usize)>,
}

impl Summary {
    pub fn of<T: Ranked>(items: &[T]) -> Self {
        let scores: Vec<f64> = items.iter().filter_map(Ranked::rank_score).collect();
        let stats = if scores.is_empty() {
            None
        } else {
            let sum: f64 = scores.iter().sum();
            Some(ScoreStats {
                mean: sum / scores.len() as f64,
                min: scores.iter().copied().fold(f64::INFINITY, f64::min),
                max: scores.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            })
        };

        let mut order: Vec<String> = Vec::new();
        let mut counts: HashMap<String, usize> = HashMap::new();
        for item in items {
            let country = item.country_label();
            match counts.get_mut(country) {
                Some(n) => *n += 1,
                None => {
                    order.push(country.to_string());
                    counts.insert(country.to_string(), 1);
                }
            }
        }
        let mut by_country: Vec<(String, usize)> = order
            .into_iter()
            .map(|c| {
                let n = counts.get(&c).copied().unwrap_or(0);
                (c, n)
            })
            .collect();
        by_country.sort_by(|a, b| b.1.cmp(&a.1));

        Self {
            entries: items.len(),
            scores: stats,
            by_country,
        }
    }

    /// The `n` countries with the most entries.
    pub fn top_countries(&self, n: usize) -> &[(String, usize)] {
        &self.by_country[..n.min(self.by_country.len())]
    }
}
