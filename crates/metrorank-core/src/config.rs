// crates/metrorank-core/src/config.rs

//! Run configuration.
//!
//! Every table the merger and scorers consult lives here as a plain value.
//! Defaults reproduce the stock data layout and weights; a JSON file may
//! override any subset of fields.

use crate::error::{RankError, Result};
use crate::merge::MergeRules;
use crate::score::{ComponentPolicy, ScoreStrategy, WeightedSumPolicy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Inputs and parameters for the city ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CityPipelineConfig {
    /// Population tables, merged in order.
    pub population: Vec<PathBuf>,
    pub traffic: PathBuf,
    /// City-code reference table for indirect traffic resolution.
    pub city_codes: Option<PathBuf>,
    /// Replacement intangible list; the built-in list when unset.
    pub intangible: Option<PathBuf>,
    /// Pinned core list, emitted ahead of the ranking.
    pub pinned: Option<PathBuf>,
    pub output: PathBuf,
    /// Total rows in the output, pinned rows included. `None` keeps all.
    pub target_size: Option<usize>,
    pub weights: WeightedSumPolicy,
    pub rules: MergeRules,
}

impl Default for CityPipelineConfig {
    fn default() -> Self {
        Self {
            population: vec![
                PathBuf::from("data/raw_data/simplemaps-worldcities.csv"),
                PathBuf::from("data/raw_data/pico/worldcities.csv"),
            ],
            traffic: PathBuf::from("data/2023-airport-traffic.csv"),
            city_codes: Some(PathBuf::from("data/airports-data/citycodes.csv")),
            intangible: None,
            pinned: Some(PathBuf::from("data/core25.csv")),
            output: PathBuf::from("data/2024-city-master.csv"),
            target_size: Some(100),
            weights: WeightedSumPolicy::default(),
            rules: MergeRules::default(),
        }
    }
}

/// Inputs and parameters for the metro-area ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetroPipelineConfig {
    pub airports: PathBuf,
    pub city_codes: PathBuf,
    pub output: PathBuf,
    /// Metros printed in the console report.
    pub report_top: usize,
    pub policy: ComponentPolicy,
}

impl Default for MetroPipelineConfig {
    fn default() -> Self {
        Self {
            airports: PathBuf::from("data/airports-data/airports.csv"),
            city_codes: PathBuf::from("data/airports-data/citycodes.csv"),
            output: PathBuf::from("data/rankings.csv"),
            report_top: 20,
            policy: ComponentPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankConfig {
    pub strategy: ScoreStrategy,
    pub cities: CityPipelineConfig,
    pub metros: MetroPipelineConfig,
    /// Extra AP-style name overrides, merged over the built-in table.
    pub ap_overrides: BTreeMap<String, String>,
}

impl RankConfig {
    /// Reads a JSON configuration file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| RankError::NotFound(format!("{}: {e}", path.display())))?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Rejects values no run could use.
    pub fn validate(&self) -> Result<()> {
        let c = &self.cities;
        if c.population.is_empty() {
            return Err(RankError::Config("at least one population table is required".into()));
        }
        let w = &c.weights;
        let weights = [
            ("population", w.population),
            ("total_passengers", w.total_passengers),
            ("international_passengers", w.international_passengers),
            ("cargo_traffic", w.cargo_traffic),
            ("intangible", w.intangible),
            ("capital_bonus", w.capital_bonus),
        ];
        for (name, value) in weights {
            if !value.is_finite() {
                return Err(RankError::Config(format!("weight `{name}` must be finite")));
            }
        }
        if let Some(m) = w.importance.iter().find(|m| !m.multiplier.is_finite()) {
            return Err(RankError::Config(format!(
                "importance multiplier for `{}` must be finite",
                m.city
            )));
        }
        if let Some(o) = c.rules.overrides.iter().find(|o| o.pattern.trim().is_empty()) {
            return Err(RankError::Config(format!(
                "traffic override for `{}` has an empty pattern",
                o.iso2
            )));
        }
        if let Some(r) = self
            .metros
            .policy
            .regions
            .iter()
            .find(|r| r.min_lat >= r.max_lat || r.min_lon >= r.max_lon)
        {
            return Err(RankError::Config(format!("region `{}` has empty bounds", r.name)));
        }
        Ok(())
    }
}
