// crates/metrorank-core/src/error.rs
use thiserror::Error;

/// Errors surfaced by the ranking pipeline.
///
/// Only whole-file problems are errors. Row-level problems (missing
/// identifying fields, unparseable numbers) are absorbed by the loaders and
/// reported through statistics and logs instead.
#[derive(Debug, Error)]
pub enum RankError {
    /// A required input file is missing or cannot be opened.
    #[error("not found: {0}")]
    NotFound(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, RankError>;
