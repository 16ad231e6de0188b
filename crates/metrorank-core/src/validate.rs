// crates/metrorank-core/src/validate.rs

//! Sanity checks for a compiled city list.

use crate::compile::CompiledCity;
use crate::error::{RankError, Result};
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::Path;

/// A problem found in one entry of the list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationIssue {
    /// One of `city`, `country`, `countryCode` is empty or population is 0.
    MissingFields { index: usize, id: String },
    /// Coordinates present but `lat` or `lng` is zero.
    InvalidCoordinates { index: usize, city: String },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::MissingFields { index, id } => {
                write!(f, "entry {index} ({id}): missing required fields")
            }
            ValidationIssue::InvalidCoordinates { index, city } => {
                write!(f, "entry {index} ({city}): invalid coordinates")
            }
        }
    }
}

/// Checks every entry. An empty result means the list is valid.
pub fn validate_cities(cities: &[CompiledCity]) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    for (index, c) in cities.iter().enumerate() {
        if c.city.is_empty() || c.country.is_empty() || c.country_code.is_empty() || c.population == 0
        {
            issues.push(ValidationIssue::MissingFields {
                index,
                id: c.id.clone(),
            });
        }
        if let Some(coords) = c.coordinates {
            if coords.lat == 0.0 || coords.lng == 0.0 {
                issues.push(ValidationIssue::InvalidCoordinates {
                    index,
                    city: c.city.clone(),
                });
            }
        }
    }
    issues
}

/// Reads a compiled JSON list and validates it.
pub fn validate_file(path: impl AsRef<Path>) -> Result<Vec<ValidationIssue>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .map_err(|e| RankError::NotFound(format!("{}: {e}", path.display())))?;
    let cities: Vec<CompiledCity> = serde_json::from_str(&text)?;
    let issues = validate_cities(&cities);
    tracing::info!(cities = cities.len(), issues = issues.len(), "city list validated");
    Ok(issues)
}
