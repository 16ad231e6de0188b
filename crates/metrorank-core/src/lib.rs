// crates/metrorank-core/src/lib.rs

//! metrorank-core
//! ==============
//!
//! Reconciles city records from population tables, airport traffic
//! statistics, airport/city-code reference tables and a curated
//! "intangible" prestige list under one canonical key, scores them and
//! emits a ranked CSV.
//!
//! Two strategies share the pipeline: a weighted sum over merged city
//! entities, and a component score over metropolitan airport systems.

pub mod ap_style;
pub mod coerce;
pub mod compile;
pub mod config;
pub mod error;
pub mod export;
pub mod intangible;
pub mod loader; // CSV / gzip table reader
pub mod merge;
pub mod metro;
pub mod model;
pub mod pipeline;
pub mod rank;
pub mod score;
pub mod sources; // Per-source row transforms
pub mod text;
pub mod traits;
pub mod validate;

// Re-exports
pub use crate::config::{CityPipelineConfig, MetroPipelineConfig, RankConfig};
pub use crate::error::{RankError, Result};
pub use crate::intangible::IntangibleScores;
pub use crate::merge::{MergeRules, MergeStats, MergedTable};
pub use crate::metro::{MetroIndex, MetroStats};
pub use crate::model::{MergedCityEntity, MetroArea, MetroRanking, TrafficRecord};
pub use crate::pipeline::{run, CityRanking, MetroRankingRun, Ranking};
pub use crate::rank::{RankedCity, Summary};
pub use crate::score::{ComponentPolicy, ScoreStrategy, WeightedSumPolicy};
pub use crate::text::{canonical_key, fold_key, CanonicalKey};

pub mod prelude {
    pub use crate::config::RankConfig;
    pub use crate::error::{RankError, Result};
    pub use crate::pipeline::{
        build_city_table, build_metro_rankings, run, run_city_pipeline, run_metro_pipeline,
        CityInputs, Ranking,
    };
    pub use crate::rank::{RankedCity, Summary};
    pub use crate::score::{ComponentPolicy, ScoreStrategy, WeightedSumPolicy};
    pub use crate::traits::{NameMatch, Ranked, Scorer};
}
