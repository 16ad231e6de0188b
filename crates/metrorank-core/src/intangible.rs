// crates/metrorank-core/src/intangible.rs

//! Curated "intangible" prestige scores.
//!
//! The list is hand-maintained and versioned with the crate
//! (`data/intangible_scores.csv`). A replacement list with the same columns
//! can be loaded from disk.

use crate::error::Result;
use crate::loader::read_table_from_reader;
use crate::model::IntangibleScore;
use crate::sources::{load_records, records_from_rows};
use crate::text::{canonical_key, fold_key, CanonicalKey};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

const BUILTIN_CSV: &str = include_str!("../data/intangible_scores.csv");

static BUILTIN: Lazy<IntangibleScores> = Lazy::new(|| parse_embedded(BUILTIN_CSV.as_bytes()));

/// Parses an embedded list. An unreadable list is logged and treated as
/// empty.
fn parse_embedded<R: Read>(reader: R) -> IntangibleScores {
    match read_table_from_reader(reader) {
        Ok(rows) => IntangibleScores::from_records(records_from_rows(&rows)),
        Err(e) => {
            tracing::warn!(error = %e, "built-in intangible list unreadable, using an empty list");
            IntangibleScores::default()
        }
    }
}

/// Sorted, de-duplicated intangible scores with a key index.
#[derive(Debug, Clone, Default)]
pub struct IntangibleScores {
    entries: Vec<IntangibleScore>,
    by_key: HashMap<CanonicalKey, f64>,
}

impl IntangibleScores {
    /// The list shipped with the crate.
    pub fn builtin() -> &'static IntangibleScores {
        &BUILTIN
    }

    /// Loads a replacement list (`city,iso2,score,reason`).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_records(load_records(path)?))
    }

    /// Sorts by name, then drops repeated display names.
    ///
    /// The sort runs first and is stable, so the first entry for a name in
    /// sorted order is the one that survives.
    pub fn from_records(mut records: Vec<IntangibleScore>) -> Self {
        records.sort_by_cached_key(|r| fold_key(&r.city));

        let mut entries: Vec<IntangibleScore> = Vec::with_capacity(records.len());
        for record in records {
            if !entries.iter().any(|e| e.city == record.city) {
                entries.push(record);
            }
        }

        let by_key = entries
            .iter()
            .map(|e| (canonical_key(&e.city, &e.country_code), e.score))
            .filter(|(k, _)| !k.is_empty())
            .collect();

        Self { entries, by_key }
    }

    pub fn entries(&self) -> &[IntangibleScore] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Score for a key, `0.0` when the city is not listed.
    pub fn score_for(&self, key: &CanonicalKey) -> f64 {
        self.by_key.get(key).copied().unwrap_or(0.0)
    }
}
